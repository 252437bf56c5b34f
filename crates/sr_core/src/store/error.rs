use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Not found: {entity}")]
    NotFound { entity: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Transport(_) => true,
            StoreError::NotFound { .. } => false,
            StoreError::Validation(_) => false,
        }
    }
}
