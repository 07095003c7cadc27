//! # Mock Framework
//!
//! Utilities for testing the manager without a network.
//!
//! Use [`create_mock_api`] to get a [`UserApi`] and a receiver. Every call the
//! manager makes arrives on the receiver together with a responder, so a test
//! decides when and how each remote call completes. Helpers like
//! [`expect_create`] assert the kind of the next call.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::api::UserApi;
use crate::domain::{User, UserId};
use crate::error::ApiError;

pub type Responder<T> = oneshot::Sender<Result<T, ApiError>>;

#[derive(Debug)]
pub enum ApiRequest {
    List { respond_to: Responder<Vec<User>> },
    Create { user: User, respond_to: Responder<()> },
    Update { user: User, respond_to: Responder<()> },
    Delete { id: UserId, respond_to: Responder<()> },
}

/// Forwards every call to the test's receiver.
pub struct MockUserApi {
    sender: mpsc::Sender<ApiRequest>,
}

impl MockUserApi {
    async fn call<T>(&self, request: impl FnOnce(Responder<T>) -> ApiRequest) -> Result<T, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| ApiError::Network("mock receiver dropped".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Network("mock responder dropped".to_string()))?
    }
}

#[async_trait]
impl UserApi for MockUserApi {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.call(|respond_to| ApiRequest::List { respond_to }).await
    }

    async fn create_user(&self, user: &User) -> Result<(), ApiError> {
        let user = user.clone();
        self.call(|respond_to| ApiRequest::Create { user, respond_to }).await
    }

    async fn update_user(&self, user: &User) -> Result<(), ApiError> {
        let user = user.clone();
        self.call(|respond_to| ApiRequest::Update { user, respond_to }).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.call(|respond_to| ApiRequest::Delete { id, respond_to }).await
    }
}

/// Creates a mock API and a receiver for asserting the calls made against it.
pub fn create_mock_api(buffer_size: usize) -> (MockUserApi, mpsc::Receiver<ApiRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockUserApi { sender }, receiver)
}

/// Helper to verify that the next call is a list request
pub async fn expect_list(receiver: &mut mpsc::Receiver<ApiRequest>) -> Option<Responder<Vec<User>>> {
    match receiver.recv().await {
        Some(ApiRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next call is a create request
pub async fn expect_create(receiver: &mut mpsc::Receiver<ApiRequest>) -> Option<(User, Responder<()>)> {
    match receiver.recv().await {
        Some(ApiRequest::Create { user, respond_to }) => Some((user, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is an update request
pub async fn expect_update(receiver: &mut mpsc::Receiver<ApiRequest>) -> Option<(User, Responder<()>)> {
    match receiver.recv().await {
        Some(ApiRequest::Update { user, respond_to }) => Some((user, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a delete request
pub async fn expect_delete(receiver: &mut mpsc::Receiver<ApiRequest>) -> Option<(UserId, Responder<()>)> {
    match receiver.recv().await {
        Some(ApiRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_api() {
        let (api, mut receiver) = create_mock_api(10);

        let delete_task = tokio::spawn(async move { api.delete_user(7).await });

        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(id, 7);
        responder.send(Err(ApiError::Status(503))).unwrap();

        let result = delete_task.await.unwrap();
        assert_eq!(result, Err(ApiError::Status(503)));
    }
}
