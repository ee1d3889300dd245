use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by the map backends and the TTL cache.
///
/// Allocation failure is the only reportable error: it surfaces from
/// operations that allocate nodes (`insert`, `put`) when the backing arena
/// cannot grow. Invalid arguments (an inverted range, an empty output
/// buffer) and plain absence are contract-defined sentinel results, not
/// errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("allocation failure: unable to reserve a node")]
    AllocationFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failure_display() {
        let err = Error::AllocationFailure;
        assert_eq!(err.to_string(), "allocation failure: unable to reserve a node");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
