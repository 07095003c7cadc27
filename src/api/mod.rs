//! Remote user collection.
//!
//! [`UserApi`] is the seam between the manager actor and the network: the
//! actor only ever talks to `Arc<dyn UserApi>`, production wires in
//! [`HttpUserApi`], tests wire in the channel-backed mock.

pub mod http;

use async_trait::async_trait;

use crate::domain::{User, UserId};
use crate::error::ApiError;

pub use http::HttpUserApi;

/// Thin async wrappers over the four calls the collection endpoint supports.
///
/// Response bodies of the mutating calls are discarded.
#[async_trait]
pub trait UserApi: Send + Sync + 'static {
    /// `GET {base}`
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// `POST {base}`
    async fn create_user(&self, user: &User) -> Result<(), ApiError>;

    /// `PUT {base}/{id}`
    async fn update_user(&self, user: &User) -> Result<(), ApiError>;

    /// `DELETE {base}/{id}`
    async fn delete_user(&self, id: UserId) -> Result<(), ApiError>;
}
