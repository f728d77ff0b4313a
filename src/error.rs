use thiserror::Error;

// Error taxonomy for the service layer. The cache itself has no fallible
// operations; absence and eviction are normal control flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

pub(crate) fn require_non_blank(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!(
            "{field} must not be blank"
        )));
    }
    Ok(())
}
