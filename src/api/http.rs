use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use tracing::{debug, instrument};

use super::UserApi;
use crate::domain::{User, UserId};
use crate::error::ApiError;

/// `reqwest`-backed client for the remote user collection.
#[derive(Debug, Clone)]
pub struct HttpUserApi {
    base_url: String,
    client: Client,
}

impl HttpUserApi {
    /// `base_url` is the collection endpoint itself, e.g.
    /// `https://jsonplaceholder.typicode.com/users`.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn member_url(&self, id: UserId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Sends the request, treating any non-2xx status as a failure.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        debug!(status = status.as_u16(), "Remote call succeeded");
        Ok(response)
    }

    async fn send_user(&self, method: Method, url: String, user: &User) -> Result<(), ApiError> {
        self.send(self.client.request(method, url).json(user)).await?;
        Ok(())
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let response = self.send(self.client.get(&self.base_url)).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn create_user(&self, user: &User) -> Result<(), ApiError> {
        self.send_user(Method::POST, self.base_url.clone(), user).await
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn update_user(&self, user: &User) -> Result<(), ApiError> {
        self.send_user(Method::PUT, self.member_url(user.id), user).await
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.send(self.client.delete(self.member_url(id))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Log = Arc<Mutex<Vec<String>>>;

    async fn list(State(log): State<Log>) -> Json<Value> {
        log.lock().unwrap().push("GET /users".to_string());
        Json(json!([
            { "id": 1, "name": "Leanne Graham", "email": "Sincere@april.biz", "phone": "1-770" },
            { "id": 2, "firstName": "Ann", "lastName": "Lee", "email": "a@x.com", "department": "Eng" }
        ]))
    }

    async fn create(State(log): State<Log>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        log.lock().unwrap().push(format!("POST /users {}", body));
        (StatusCode::CREATED, Json(json!({ "id": 11 })))
    }

    async fn update(
        State(log): State<Log>,
        Path(id): Path<u64>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        log.lock().unwrap().push(format!("PUT /users/{} {}", id, body));
        if id == 404 {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        }
    }

    async fn remove(State(log): State<Log>, Path(id): Path<u64>) -> StatusCode {
        log.lock().unwrap().push(format!("DELETE /users/{}", id));
        if id == 500 {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    }

    async fn spawn_stub() -> (HttpUserApi, Log) {
        let log: Log = Arc::default();
        let app = Router::new()
            .route("/users", get(list).post(create))
            .route("/users/{id}", put(update).delete(remove))
            .with_state(log.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let api = HttpUserApi::new(format!("http://{}/users/", addr), Some(Duration::from_secs(5))).unwrap();
        (api, log)
    }

    fn ann() -> User {
        User {
            id: 3,
            first_name: Some("Ann".into()),
            last_name: Some("Lee".into()),
            name: None,
            email: "a@x.com".into(),
            department: Some("Eng".into()),
        }
    }

    #[tokio::test]
    async fn test_list_users_decodes_seed_and_local_records() {
        let (api, _log) = spawn_stub().await;
        let users = api.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name.as_deref(), Some("Leanne Graham"));
        assert_eq!(users[0].department, None);
        assert_eq!(users[1].first_name.as_deref(), Some("Ann"));
    }

    #[tokio::test]
    async fn test_mutations_hit_collection_and_member_urls() {
        let (api, log) = spawn_stub().await;
        assert!(api.base_url().ends_with("/users"));

        api.create_user(&ann()).await.unwrap();
        api.update_user(&ann()).await.unwrap();
        api.delete_user(3).await.unwrap();

        let log = log.lock().unwrap().clone();
        assert_eq!(log.len(), 3);
        assert!(log[0].starts_with("POST /users "));
        assert!(log[0].contains("\"firstName\":\"Ann\""));
        assert!(!log[0].contains("\"name\""));
        assert!(log[1].starts_with("PUT /users/3 "));
        assert_eq!(log[2], "DELETE /users/3");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let (api, _log) = spawn_stub().await;
        let mut missing = ann();
        missing.id = 404;
        assert_eq!(api.update_user(&missing).await, Err(ApiError::Status(404)));
        assert_eq!(api.delete_user(500).await, Err(ApiError::Status(500)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = HttpUserApi::new(format!("http://{}/users", addr), None).unwrap();
        assert!(matches!(api.list_users().await, Err(ApiError::Network(_))));
    }
}
