//! User and post endpoints.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET  | `/users/{id}`       | 200 user |
//! | GET  | `/posts/{id}`       | 200 post |
//! | GET  | `/posts/users/{id}` | 200 array of the user's posts, in list order |
//! | POST | `/users`            | 201 `{"id": …}` + `location` |
//! | POST | `/posts`            | 201 `{"id": …}` + `location` |
//!
//! Handlers return `Result<Response, ApiError>`. Store failures are
//! classified into [`ApiError`] here and nowhere else.

use std::future::Future;
use std::sync::Arc;

use bson::oid::ObjectId;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::health;
use crate::method::Method;
use crate::models::{parse_id, Created, NewPost, NewUser, PostView, UserView};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::{SharedStore, StoreError};

/// Builds the full routing table over `store`.
pub fn routes(store: SharedStore) -> Router {
    Router::new()
        .on(Method::Get,  "/users/{id}",       with_store(&store, get_user))
        .on(Method::Get,  "/posts/{id}",       with_store(&store, get_post))
        .on(Method::Get,  "/posts/users/{id}", with_store(&store, get_user_posts))
        .on(Method::Post, "/users",            with_store(&store, create_user))
        .on(Method::Post, "/posts",            with_store(&store, create_post))
        .on(Method::Get,  "/healthz",          health::liveness)
        .on(Method::Get,  "/readyz",           with_store(&store, health::readiness))
}

/// Adapts a `(store, request)` handler to the router's `request`-only shape.
fn with_store<F, Fut>(
    store: &SharedStore,
    handler: F,
) -> impl Fn(Request) -> Fut + Send + Sync + 'static + use<F, Fut>
where
    F: Fn(SharedStore, Request) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
{
    let store = Arc::clone(store);
    move |req| handler(Arc::clone(&store), req)
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    /// The detail is logged, never sent.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            Self::BadRequest(_) => Status::BadRequest,
            Self::NotFound => Status::NotFound,
            Self::Internal(_) => Status::InternalServerError,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Internal(detail) => {
                error!(%detail, "request failed");
                "internal server error".to_owned()
            }
            other => other.to_string(),
        };
        let body = json!({ "error": message }).to_string().into_bytes();
        Response::builder().status(self.status()).json(body)
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

// GET /users/{id}
async fn get_user(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let user = store.find_user(path_id(&req)?).await?;
    json_body(Status::Ok, &UserView::from(user))
}

// GET /posts/{id}
async fn get_post(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let post = store.find_post(path_id(&req)?).await?;
    json_body(Status::Ok, &PostView::from(post))
}

// GET /posts/users/{id}
//
// Every post is fetched before anything is serialised, so a dangling
// reference yields a clean 500 instead of a truncated 200.
async fn get_user_posts(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let user = store.find_user(path_id(&req)?).await?;
    let ids = user.post_ids().map_err(StoreError::from)?;
    let posts = store.find_posts(&ids).await?;

    let views: Vec<PostView> = posts.into_iter().map(PostView::from).collect();
    json_body(Status::Ok, &views)
}

// POST /users
async fn create_user(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let input: NewUser = parse_body(&req)?;
    let user = input.into_user().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let id = store.insert_user(user).await?;
    created("/users", id)
}

// POST /posts
async fn create_post(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let input: NewPost = parse_body(&req)?;
    let id = store.insert_post(input.into_post()).await?;
    created("/posts", id)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A path id that cannot be an `ObjectId` cannot name a document either.
fn path_id(req: &Request) -> Result<ObjectId, ApiError> {
    req.param("id")
        .and_then(|raw| parse_id(raw).ok())
        .ok_or(ApiError::NotFound)
}

fn parse_body<T: serde::de::DeserializeOwned>(req: &Request) -> Result<T, ApiError> {
    serde_json::from_slice(req.body())
        .map_err(|e| ApiError::BadRequest(format!("malformed json body: {e}")))
}

fn json_body<T: Serialize>(status: Status, value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(value).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Response::builder().status(status).json(body))
}

fn created(collection_path: &str, id: ObjectId) -> Result<Response, ApiError> {
    let id = id.to_hex();
    let body = serde_json::to_vec(&Created { id: id.clone() })
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Response::builder()
        .status(Status::Created)
        .header("location", &format!("{collection_path}/{id}"))
        .json(body))
}
