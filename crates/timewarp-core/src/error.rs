use thiserror::Error;

/// Raised when a slot is given anything other than exactly one element child.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidChildError {
    #[error("slot expects a single element child, got none")]
    Empty,
    #[error("slot expects a single element child, got {0} children")]
    Many(usize),
    #[error("slot expects a single element child, got text {0:?}")]
    Text(String),
}
