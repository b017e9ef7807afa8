use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A notification cooldown is still running for the recipient.
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: i64 },

    /// The cart resolves to neither a guest email nor a user email.
    #[error("Cart {cart_id} has no recipient email")]
    MissingRecipient { cart_id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The transactional email collaborator rejected or failed the send.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap a storage-layer failure (database, driver) as an internal error.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Internal(format!("storage: {err}"))
    }
}
