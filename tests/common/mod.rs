//! Shared fixtures: an in-memory store and request helpers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bson::oid::ObjectId;

use postbox::models::{Post, User};
use postbox::store::{Store, StoreError, POST_COLLECTION, USER_COLLECTION};
use postbox::{Request, Response, Router};

/// A [`Store`] backed by two hash maps, counting every call it receives.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<ObjectId, User>>,
    posts: Mutex<HashMap<ObjectId, Post>>,
    calls: AtomicUsize,
    down: bool,
}

#[allow(dead_code)]
impl MemoryStore {
    /// A store whose every call fails, as if the database were unreachable.
    pub fn unreachable() -> Self {
        Self { down: true, ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Writes a user document directly, bypassing request validation.
    pub fn put_user(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.enter()
    }

    async fn find_user(&self, id: ObjectId) -> Result<User, StoreError> {
        self.enter()?;
        self.users.lock().unwrap().get(&id).cloned()
            .ok_or(StoreError::NotFound { collection: USER_COLLECTION, id })
    }

    async fn find_post(&self, id: ObjectId) -> Result<Post, StoreError> {
        self.enter()?;
        self.posts.lock().unwrap().get(&id).cloned()
            .ok_or(StoreError::NotFound { collection: POST_COLLECTION, id })
    }

    async fn find_posts(&self, ids: &[ObjectId]) -> Result<Vec<Post>, StoreError> {
        self.enter()?;
        let posts = self.posts.lock().unwrap();
        ids.iter()
            .map(|id| posts.get(id).cloned().ok_or(StoreError::DanglingReference(*id)))
            .collect()
    }

    async fn insert_user(&self, user: User) -> Result<ObjectId, StoreError> {
        self.enter()?;
        let id = user.id;
        self.users.lock().unwrap().insert(id, user);
        Ok(id)
    }

    async fn insert_post(&self, post: Post) -> Result<ObjectId, StoreError> {
        self.enter()?;
        let id = post.id;
        self.posts.lock().unwrap().insert(id, post);
        Ok(id)
    }
}

/// Routes over a fresh [`MemoryStore`], returning both.
#[allow(dead_code)]
pub fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (postbox::api::routes(store.clone()), store)
}

#[allow(dead_code)]
pub async fn get(router: &Router, path: &str) -> Response {
    router.respond(Request::new("GET", path, Vec::new())).await
}

#[allow(dead_code)]
pub async fn post(router: &Router, path: &str, body: &str) -> Response {
    router.respond(Request::new("POST", path, body.as_bytes().to_vec())).await
}

#[allow(dead_code)]
pub fn json(res: &Response) -> serde_json::Value {
    serde_json::from_slice(res.body()).expect("response body is json")
}
