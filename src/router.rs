//! Radix-tree request router.
//!
//! One tree per HTTP method. A rule is `(method, pattern, handler)`; patterns
//! are literal segments and `{name}` captures.
//!
//! # Precedence
//!
//! At every segment a literal beats a capture, whatever order the rules were
//! registered in. `GET /posts/users/abc123` therefore reaches
//! `/posts/users/{id}` and never `/posts/{id}`.
//!
//! # Path normalisation
//!
//! Trailing slashes are ignored, so `/users`, `/users/` and `/users//` are the
//! same path. Captured segments must be word characters (`[A-Za-z0-9_]`);
//! anything else is treated as no match.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::trace;
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup and hand it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// ```rust,no_run
    /// # use postbox::{Method, Request, Response, Router};
    /// # async fn get_post(_: Request) -> Response { Response::text("") }
    /// # async fn create_post(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/posts/{id}", get_post)
    ///     .on(Method::Post, "/posts",      create_post);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with a rule already
    /// registered for `method`. Rules are static, so this fires at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Routes one request and produces one response.
    ///
    /// Unmatched requests get [`Response::not_found`] without any handler
    /// running.
    pub async fn respond(&self, req: Request) -> Response {
        let started = Instant::now();
        let method = req.method.clone();
        let path = req.path.clone();

        let response = match self.lookup(&method, &path) {
            Some((handler, params)) => handler.call(req.with_params(params)).await,
            None => Response::not_found(),
        };

        trace::record(&method, &path, response.status, started.elapsed());
        response
    }

    fn lookup(&self, method: &str, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let method: Method = method.parse().ok()?;
        let tree = self.routes.get(&method)?;
        let matched = tree.at(normalize(path)).ok()?;

        let mut params = HashMap::new();
        for (k, v) in matched.params.iter() {
            if !is_word(v) {
                return None;
            }
            params.insert(k.to_owned(), v.to_owned());
        }
        Some((Arc::clone(matched.value), params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

fn normalize(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn is_word(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
