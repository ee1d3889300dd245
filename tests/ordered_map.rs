use std::collections::BTreeMap as StdBTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use keyspan::{BTreeMap, Key, OrderedMap, RbTreeMap, SkipListMap, Value};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a band narrow enough to force collisions and removals
/// of present keys.
fn key_strategy() -> impl Strategy<Value = Key> {
    -500i32..500i32
}

fn value_strategy() -> impl Strategy<Value = Value> {
    any::<i32>()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(Key, Value),
    Remove(Key),
    Get(Key),
    Floor(Key),
    Ceiling(Key),
    Min,
    Max,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Floor),
        1 => key_strategy().prop_map(MapOp::Ceiling),
        1 => Just(MapOp::Min),
        1 => Just(MapOp::Max),
    ]
}

/// Applies one operation and returns its observable result, encoded
/// uniformly so backends can be compared step by step.
fn apply<M: OrderedMap>(map: &mut M, op: &MapOp) -> Option<i32> {
    match *op {
        MapOp::Insert(k, v) => map.insert(k, v).expect("allocation failure in test"),
        MapOp::Remove(k) => map.remove(k),
        MapOp::Get(k) => map.get(k),
        MapOp::Floor(k) => map.floor(k),
        MapOp::Ceiling(k) => map.ceiling(k),
        MapOp::Min => map.min(),
        MapOp::Max => map.max(),
    }
}

/// The same operation against the std model.
fn apply_model(model: &mut StdBTreeMap<Key, Value>, op: &MapOp) -> Option<i32> {
    match *op {
        MapOp::Insert(k, v) => model.insert(k, v),
        MapOp::Remove(k) => model.remove(&k),
        MapOp::Get(k) => model.get(&k).copied(),
        MapOp::Floor(k) => model.range(..=k).next_back().map(|(&k, _)| k),
        MapOp::Ceiling(k) => model.range(k..).next().map(|(&k, _)| k),
        MapOp::Min => model.keys().next().copied(),
        MapOp::Max => model.keys().next_back().copied(),
    }
}

fn full_range<M: OrderedMap>(map: &M) -> Vec<Key> {
    let mut out = vec![0; map.len() + 1];
    let n = map.range(Key::MIN, Key::MAX, &mut out);
    out.truncate(n);
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Replays a random operation sequence on each backend and on
    /// std::collections::BTreeMap, asserting identical observable results
    /// at every step and a valid structure throughout.
    #[test]
    fn backends_match_std_model(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb = RbTreeMap::new();
        let mut bt = BTreeMap::new();
        let mut sl = SkipListMap::with_seed(0.5, 0xfeed);
        let mut model = StdBTreeMap::new();

        for (step, op) in ops.iter().enumerate() {
            let expected = apply_model(&mut model, op);
            prop_assert_eq!(apply(&mut rb, op), expected, "rb step {} {:?}", step, op);
            prop_assert_eq!(apply(&mut bt, op), expected, "bt step {} {:?}", step, op);
            prop_assert_eq!(apply(&mut sl, op), expected, "sl step {} {:?}", step, op);

            prop_assert_eq!(rb.len(), model.len());
            prop_assert_eq!(bt.len(), model.len());
            prop_assert_eq!(sl.len(), model.len());

            if step % 251 == 0 {
                prop_assert!(rb.validate(), "rb invalid at step {}", step);
                prop_assert!(bt.validate(), "bt invalid at step {}", step);
                prop_assert!(sl.validate(), "sl invalid at step {}", step);
            }
        }

        // Final ordering check: every backend enumerates the model's keys.
        let expected: Vec<Key> = model.keys().copied().collect();
        prop_assert_eq!(full_range(&rb), expected.clone());
        prop_assert_eq!(full_range(&bt), expected.clone());
        prop_assert_eq!(full_range(&sl), expected);

        prop_assert!(rb.validate());
        prop_assert!(bt.validate());
        prop_assert!(sl.validate());
    }

    /// Partial range windows agree with the model for every backend.
    #[test]
    fn range_windows_match_model(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..300),
        lo in key_strategy(),
        hi in key_strategy(),
    ) {
        let mut rb = RbTreeMap::new();
        let mut bt = BTreeMap::with_min_degree(2);
        let mut sl = SkipListMap::with_seed(0.5, 7);
        let mut model = StdBTreeMap::new();
        for &(k, v) in &entries {
            rb.insert(k, v).unwrap();
            bt.insert(k, v).unwrap();
            sl.insert(k, v).unwrap();
            model.insert(k, v);
        }

        let expected: Vec<Key> = if lo <= hi {
            model.range(lo..=hi).map(|(&k, _)| k).collect()
        } else {
            Vec::new()
        };

        let mut out = vec![0; entries.len() + 1];
        for (name, map) in [
            ("rb", &rb as &dyn OrderedMap),
            ("bt", &bt as &dyn OrderedMap),
            ("sl", &sl as &dyn OrderedMap),
        ] {
            let n = map.range(lo, hi, &mut out);
            prop_assert_eq!(&out[..n], expected.as_slice(), "{} window [{}, {}]", name, lo, hi);
        }
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

fn scenario_basic<M: OrderedMap>(map: &mut M) {
    for k in [50, 30, 70, 20, 40, 60, 80] {
        assert_eq!(map.insert(k, k * 10).unwrap(), None);
    }
    assert_eq!(full_range(map), vec![20, 30, 40, 50, 60, 70, 80]);
    assert_eq!(map.floor(45), Some(40));
    assert_eq!(map.ceiling(45), Some(50));
    assert_eq!(map.min(), Some(20));
    assert_eq!(map.max(), Some(80));

    assert_eq!(map.remove(50), Some(500));
    assert_eq!(full_range(map), vec![20, 30, 40, 60, 70, 80]);
    assert_eq!(map.get(50), None);
    assert!(map.validate());

    // Re-inserting an identical entry leaves size and order unchanged.
    map.insert(30, 300).unwrap();
    assert_eq!(map.len(), 6);
    assert_eq!(full_range(map), vec![20, 30, 40, 60, 70, 80]);
}

#[test]
fn scenario_basic_all_backends() {
    scenario_basic(&mut RbTreeMap::new());
    scenario_basic(&mut BTreeMap::new());
    scenario_basic(&mut BTreeMap::with_min_degree(2));
    scenario_basic(&mut SkipListMap::with_seed(0.5, 31));
}

#[test]
fn scenario_btree_split_growth() {
    let mut map = BTreeMap::with_min_degree(2);
    for k in 1..=3 {
        map.insert(k, k).unwrap();
    }
    assert_eq!(map.height(), 1, "root not yet split");
    map.insert(4, 4).unwrap();
    assert_eq!(map.height(), 2, "insert of 4 splits the root");

    for k in 5..=10 {
        map.insert(k, k).unwrap();
    }
    assert_eq!(map.height(), 3);
    assert!(map.validate(), "leaves at equal depth, key counts in bounds");
}

#[test]
fn scenario_rbtree_ascending_validity() {
    let mut map = RbTreeMap::new();
    for k in 1..=16 {
        map.insert(k, k).unwrap();
        assert!(map.validate(), "invalid after inserting {k}");
    }
    // height <= 2 * log2(n + 1) = 2 * log2(17)
    assert!(map.height() <= 8, "height {} exceeds the red-black bound", map.height());
}

#[test]
fn scenario_skiplist_determinism() {
    let seed = 0x5eed;
    let mut first = SkipListMap::with_seed(0.5, seed);
    let mut second = SkipListMap::with_seed(0.5, seed);

    for k in 1..=100 {
        first.insert(k, k).unwrap();
        second.insert(k, k).unwrap();
        assert_eq!(first.height(), second.height(), "tower divergence at key {k}");
    }

    let mut out = vec![0; 60];
    let n = first.range(25, 75, &mut out);
    let expected: Vec<Key> = (25..=75).collect();
    assert_eq!(&out[..n], expected.as_slice());
}

/// Size accounting: S inserts, of which U updates, and D removes leave
/// S - U - D entries.
#[test]
fn size_consistency() {
    fn run<M: OrderedMap>(map: &mut M) {
        let mut inserts = 0;
        let mut updates = 0;
        let mut removes = 0;
        for k in 0..100 {
            if map.insert(k % 60, k).unwrap().is_some() {
                updates += 1;
            }
            inserts += 1;
        }
        for k in (0..100).step_by(7) {
            if map.remove(k).is_some() {
                removes += 1;
            }
        }
        assert_eq!(map.len(), inserts - updates - removes);
    }
    run(&mut RbTreeMap::new());
    run(&mut BTreeMap::new());
    run(&mut SkipListMap::with_seed(0.5, 2));
}

#[test]
fn clear_then_reuse_all_backends() {
    fn run<M: OrderedMap>(map: &mut M) {
        for k in 0..50 {
            map.insert(k, k).unwrap();
        }
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.min(), None);
        assert!(map.validate());
        map.insert(5, 55).unwrap();
        assert_eq!(map.get(5), Some(55));
        assert_eq!(map.len(), 1);
    }
    run(&mut RbTreeMap::new());
    run(&mut BTreeMap::with_min_degree(2));
    run(&mut SkipListMap::with_seed(0.5, 77));
}
