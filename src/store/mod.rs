//! Document store gateway.
//!
//! Handlers talk to a [`Store`] trait object shared through [`SharedStore`];
//! [`MongoStore`] is the production implementation. Every call returns a
//! [`StoreError`] on failure. Turning that into an HTTP status is the API
//! layer's job.

mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::models::{InvalidId, Post, User};

pub use mongo::MongoStore;

pub const USER_COLLECTION: &str = "user";
pub const POST_COLLECTION: &str = "post";

/// A store handle shared by every request.
pub type SharedStore = Arc<dyn Store>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no document {id} in `{collection}`")]
    NotFound { collection: &'static str, id: ObjectId },

    /// A stored reference is not a well-formed identifier.
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    /// A user lists a post that does not exist.
    #[error("referenced post {0} does not exist")]
    DanglingReference(ObjectId),

    /// The backend could not be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("mongodb: {0}")]
    Backend(#[from] mongodb::error::Error),
}

#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Round-trips to the backend. Used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_user(&self, id: ObjectId) -> Result<User, StoreError>;

    async fn find_post(&self, id: ObjectId) -> Result<Post, StoreError>;

    /// Fetches every post in `ids`, returned in the same order (duplicates
    /// included). All-or-nothing: one missing id fails the whole call with
    /// [`StoreError::DanglingReference`].
    async fn find_posts(&self, ids: &[ObjectId]) -> Result<Vec<Post>, StoreError>;

    async fn insert_user(&self, user: User) -> Result<ObjectId, StoreError>;

    async fn insert_post(&self, post: Post) -> Result<ObjectId, StoreError>;
}
