//! Errors reported by [`KeyChainTree`](crate::KeyChainTree) operations.
//!
//! A chain that cannot be resolved is never an error: lookups report it as
//! `None` and removals treat it as a no-op. Only contract violations by the
//! caller end up here.

use thiserror::Error;

/// Errors returned by the fallible operations of the tree.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument did not satisfy the contract of the operation.
    /// Raised before the tree is mutated.
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: &'static str,
    },
}

impl Error {
    pub(crate) const fn empty_key_chain() -> Self {
        Error::InvalidArgument {
            argument: "keys",
            reason: "at least one key must be provided",
        }
    }

    /// Returns `true` if this error was caused by an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }
}

/// Result type for key chain operations.
pub type Result<T> = core::result::Result<T, Error>;
