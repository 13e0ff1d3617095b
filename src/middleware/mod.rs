//! Middleware layer.
//!
//! Cross-cutting concerns that run around every dispatched request. Today
//! that is request tracing; the router calls into it once per response.

pub(crate) mod trace;
