use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Post identifier as the API sends it; numbers and strings both accepted.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        PostId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        PostId::new(id)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        PostId(id.to_string())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Unsigned(u64),
            Int(i64),
            Float(f64),
            Text(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Unsigned(n) => PostId(n.to_string()),
            Raw::Int(n) => PostId(n.to_string()),
            Raw::Float(n) => PostId(n.to_string()),
            Raw::Text(s) => PostId(s),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Post {
    pub id: PostId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub likes: u64,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /posts` and `PUT /posts/{id}`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
}

/// `GET /posts` answers either `{"posts": [...]}` or a bare array.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum PostList {
    Paged { posts: Vec<Post> },
    Bare(Vec<Post>),
}

impl PostList {
    pub fn into_posts(self) -> Vec<Post> {
        match self {
            PostList::Paged { posts } | PostList::Bare(posts) => posts,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct TokenData {
    pub token: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LikeData {
    pub likes: Option<u64>,
}
