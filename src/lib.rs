//! # postbox
//!
//! Users and their posts, stored in MongoDB and served over HTTP.
//!
//! ## Layers
//!
//! - **HTTP**: [`Router`] (one `matchit` radix tree per method) and [`Server`]
//!   (hyper, HTTP/1.1 + HTTP/2, graceful shutdown on SIGTERM / Ctrl-C).
//! - **API**: [`api::routes`] wires the user and post handlers into a router.
//! - **Store**: the [`store::Store`] trait, implemented by
//!   [`store::MongoStore`] over one long-lived client shared by all requests.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use postbox::{api, store::MongoStore, Server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = MongoStore::connect("mongodb://localhost:27017", "appointydb").await?;
//!     let app = api::routes(Arc::new(store));
//!
//!     Server::bind("127.0.0.1:8080".parse()?).await?.serve(app).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod handler;
mod method;
mod middleware;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod config;
pub mod health;
pub mod logging;
pub mod models;
pub mod store;

pub use error::Error;
pub use handler::Handler;
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
