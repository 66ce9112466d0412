use std::collections::TryReserveError;

#[derive(Debug, thiserror::Error)]
pub enum ArrayError {
    #[error("rank {rank} out of bounds for size {size}")]
    IndexOutOfBounds { rank: usize, size: usize },

    #[error("invalid range [{lo}, {hi}) for size {size}")]
    InvalidRange { lo: usize, hi: usize, size: usize },

    #[error("out of memory reserving {requested} slots")]
    OutOfMemory {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("unknown sort strategy: {0}")]
    UnknownStrategy(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn messages_name_the_offending_values() {
        let err = ArrayError::IndexOutOfBounds { rank: 7, size: 3 };
        assert_eq!(err.to_string(), "rank 7 out of bounds for size 3");

        let err = ArrayError::InvalidRange { lo: 4, hi: 2, size: 5 };
        assert_eq!(err.to_string(), "invalid range [4, 2) for size 5");

        let err = ArrayError::UnknownStrategy("shell".to_string());
        assert_eq!(err.to_string(), "unknown sort strategy: shell");
    }

    #[test]
    fn out_of_memory_keeps_reserve_error_as_source() {
        let source = Vec::<u64>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let err = ArrayError::OutOfMemory {
            requested: usize::MAX,
            source,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("out of memory"));
    }
}
