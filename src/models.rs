//! User and post records.
//!
//! Each entity has three shapes:
//!
//! | Shape | Used for | Identifier |
//! |---|---|---|
//! | `User` / `Post` | stored document | `_id: ObjectId` |
//! | `NewUser` / `NewPost` | request body | none, assigned on insert |
//! | `UserView` / `PostView` | response body | `id`: 24-char hex string |
//!
//! Passwords are accepted and stored but never appear in a view.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A string that is not a hex-encoded `ObjectId`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier `{0}`")]
pub struct InvalidId(pub String);

/// Parses a 24-character hex identifier.
pub fn parse_id(s: &str) -> Result<ObjectId, InvalidId> {
    ObjectId::parse_str(s).map_err(|_| InvalidId(s.to_owned()))
}

// ── User ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Hex ids of the user's posts, in the order they were given.
    #[serde(default)]
    pub posts: Vec<String>,
}

impl User {
    /// Parses every stored post reference, failing on the first bad one.
    pub fn post_ids(&self) -> Result<Vec<ObjectId>, InvalidId> {
        self.posts.iter().map(|p| parse_id(p)).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub posts: Vec<String>,
}

impl NewUser {
    /// Assigns a fresh identifier. Post references must already be valid
    /// ids; they are stored in canonical lowercase hex.
    pub fn into_user(self) -> Result<User, InvalidId> {
        let posts = self.posts.iter()
            .map(|p| parse_id(p).map(|oid| oid.to_hex()))
            .collect::<Result<_, _>>()?;

        Ok(User {
            id: ObjectId::new(),
            name: self.name,
            email: self.email,
            password: self.password,
            posts,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub posts: Vec<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            email: user.email,
            posts: user.posts,
        }
    }
}

// ── Post ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub url: String,
    /// Free-form; never parsed.
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPost {
    pub caption: String,
    pub url: String,
    pub timestamp: String,
}

impl NewPost {
    pub fn into_post(self) -> Post {
        Post {
            id: ObjectId::new(),
            caption: self.caption,
            url: self.url,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub caption: String,
    pub url: String,
    pub timestamp: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_hex(),
            caption: post.caption,
            url: post.url,
            timestamp: post.timestamp,
        }
    }
}

/// Body of a successful create: the new resource's identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
}
