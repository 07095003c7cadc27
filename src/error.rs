use thiserror::Error;

use crate::domain::FormField;

/// Remote operations whose failure surfaces as the error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    Fetch,
    Add,
    Update,
    Delete,
}

impl RemoteOperation {
    /// Fixed user-facing message for a failed call.
    pub fn failure_message(self) -> &'static str {
        match self {
            RemoteOperation::Fetch => "Failed to fetch users.",
            RemoteOperation::Add => "Failed to add user. Please try again.",
            RemoteOperation::Update => "Failed to update user. Please try again.",
            RemoteOperation::Delete => "Failed to delete user. Please try again.",
        }
    }
}

/// Errors raised by the remote user API client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Deserialization(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Why a submit was refused before any remote call was made.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitRejected {
    #[error("Missing or invalid fields: {}", join_fields(.0))]
    InvalidFields(Vec<FormField>),
    #[error("A submission is already in flight")]
    InFlight,
    #[error("Form is in edit mode without a user id")]
    MissingId,
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors returned by [`crate::clients::UserManagerClient`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ManagerError {
    #[error("Submit rejected: {0}")]
    Rejected(#[from] SubmitRejected),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Errors from parsing a terminal command line.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Unknown field: {0} (expected firstName, lastName, email or department)")]
    UnknownField(String),
    #[error("Missing argument for `{0}`")]
    MissingArgument(&'static str),
    #[error("Invalid user id: {0}")]
    InvalidId(String),
}

/// Errors from loading configuration out of the environment.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be an http(s) URL, got {value:?}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages_are_fixed() {
        assert_eq!(RemoteOperation::Fetch.failure_message(), "Failed to fetch users.");
        assert_eq!(
            RemoteOperation::Delete.failure_message(),
            "Failed to delete user. Please try again."
        );
    }

    #[test]
    fn test_rejected_lists_fields() {
        let err = ManagerError::from(SubmitRejected::InvalidFields(vec![
            FormField::FirstName,
            FormField::Email,
        ]));
        assert_eq!(
            err.to_string(),
            "Submit rejected: Missing or invalid fields: firstName, email"
        );
    }
}
