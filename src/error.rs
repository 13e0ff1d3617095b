//! Unified error type.

use std::net::SocketAddr;

/// The error type returned by the server's fallible operations.
///
/// Per-request failures (400, 404, 500) are HTTP
/// [`Response`](crate::Response) values built from
/// [`ApiError`](crate::api::ApiError), and store setup fails with
/// [`StoreError`](crate::store::StoreError). This type covers the listener.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
