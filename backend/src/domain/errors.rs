/// Errors the billing domain reports to its callers.
///
/// Services return `anyhow::Result` carrying these values; callers that need
/// to tell them apart use `err.downcast_ref::<BillingError>()`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BillingError {
    #[error("{0}")]
    Validation(String),
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),
    #[error("Invalid credentials or account not approved")]
    InvalidCredentials,
    #[error("Unrecognized import format: {0}")]
    UnrecognizedImportFormat(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("No milk data for shop: {0}")]
    NoMilkData(String),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }

    /// The `BillingError` inside an `anyhow::Error`, if there is one.
    pub fn classify(err: &anyhow::Error) -> Option<&BillingError> {
        err.downcast_ref::<BillingError>()
    }
}
