//! MongoDB-backed [`Store`].

use std::collections::HashMap;

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use futures_util::TryStreamExt;
use mongodb::{Client, Collection, Database};
use tracing::debug;

use super::{Store, StoreError, POST_COLLECTION, USER_COLLECTION};
use crate::models::{Post, User};

/// One long-lived client for the whole process.
///
/// The driver pools connections internally and connects lazily, so
/// [`MongoStore::connect`] only fails on a malformed connection string. An
/// unreachable server shows up later as [`StoreError::Backend`] on the
/// request that needed it.
#[derive(Clone, Debug)]
pub struct MongoStore {
    db: Database,
    users: Collection<User>,
    posts: Collection<Post>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        debug!(database, "mongodb client created");

        Ok(Self {
            users: db.collection(USER_COLLECTION),
            posts: db.collection(POST_COLLECTION),
            db,
        })
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn find_user(&self, id: ObjectId) -> Result<User, StoreError> {
        self.users
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or(StoreError::NotFound { collection: USER_COLLECTION, id })
    }

    async fn find_post(&self, id: ObjectId) -> Result<Post, StoreError> {
        self.posts
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or(StoreError::NotFound { collection: POST_COLLECTION, id })
    }

    async fn find_posts(&self, ids: &[ObjectId]) -> Result<Vec<Post>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self.posts
            .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await?;
        let found: Vec<Post> = cursor.try_collect().await?;
        in_list_order(ids, found)
    }

    async fn insert_user(&self, user: User) -> Result<ObjectId, StoreError> {
        let id = user.id;
        self.users.insert_one(user, None).await?;
        Ok(id)
    }

    async fn insert_post(&self, post: Post) -> Result<ObjectId, StoreError> {
        let id = post.id;
        self.posts.insert_one(post, None).await?;
        Ok(id)
    }
}

/// Lays `found` out in the order of `ids`, repeating a post for each
/// occurrence of its id. `$in` returns each match once, in no useful order.
fn in_list_order(ids: &[ObjectId], found: Vec<Post>) -> Result<Vec<Post>, StoreError> {
    let by_id: HashMap<ObjectId, Post> = found.into_iter().map(|p| (p.id, p)).collect();
    ids.iter()
        .map(|id| by_id.get(id).cloned().ok_or(StoreError::DanglingReference(*id)))
        .collect()
}
