/// Failures the binary reports to the user instead of treating them as
/// bugs. They travel inside `anyhow::Error` and are recovered with
/// `downcast_ref`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CenvError {
    /// Invalid input that the user can fix
    #[error("{0}")]
    User(String),

    /// Input data that is degenerate for the algorithm
    #[error("{0}")]
    Value(String),
}

pub fn user_error(msg: impl Into<String>) -> anyhow::Error {
    CenvError::User(msg.into()).into()
}

pub fn value_error(msg: impl Into<String>) -> anyhow::Error {
    CenvError::Value(msg.into()).into()
}

/// Find the typed failure anywhere in the error chain
pub fn as_cenv_error(err: &anyhow::Error) -> Option<&CenvError> {
    err.chain().find_map(|cause| cause.downcast_ref::<CenvError>())
}
