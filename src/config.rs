//! Runtime configuration.
//!
//! Every option is a command-line flag with an environment fallback:
//!
//! | Flag | Env | Default |
//! |---|---|---|
//! | `--mongo-uri`  | `POSTBOX_MONGO_URI`  | `mongodb://localhost:27017` |
//! | `--database`   | `POSTBOX_DATABASE`   | `appointydb` |
//! | `--listen`     | `POSTBOX_LISTEN`     | `127.0.0.1:8080` |
//! | `--log-format` | `POSTBOX_LOG_FORMAT` | `pretty` |

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(name = "postbox", version, about = "Users and posts over MongoDB")]
pub struct Config {
    /// MongoDB connection string.
    #[arg(long, env = "POSTBOX_MONGO_URI", default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    /// Database holding the `user` and `post` collections.
    #[arg(long, env = "POSTBOX_DATABASE", default_value = "appointydb")]
    pub database: String,

    /// Address the HTTP server binds.
    #[arg(long, env = "POSTBOX_LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    #[arg(long, env = "POSTBOX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, for local runs.
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}
