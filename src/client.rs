use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::errors::{error_message_from_body, ClientError};
use crate::core::helpers::{join_url, post_path};
use crate::core::query_params::{encode_pairs, with_query, PostQuery};
use crate::models::models::{Credentials, LikeData, Post, PostDraft, PostId, PostList, TokenData};

/// JSON-over-HTTP access to the posts API.
///
/// Every response status is checked before the body is trusted: a non-2xx
/// answer becomes [`ClientError::Api`] carrying the server's message.
#[derive(Clone, Default)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        ApiClient { http }
    }

    pub async fn request<T, B>(
        &self,
        base_url: &str,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = join_url(base_url, path);
        tracing::debug!(%method, %url, authenticated = token.is_some(), "api request");

        let mut req = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "api request failed to complete");
            ClientError::Network(e)
        })?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let message = error_message_from_body(status, &bytes);
            tracing::warn!(%method, %url, status = status.as_u16(), %message, "api request rejected");
            return Err(ClientError::api(status, message));
        }

        let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(bytes).map_err(ClientError::Decode)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        base_url: &str,
        token: Option<&str>,
        path: &str,
    ) -> Result<T, ClientError> {
        self.request::<T, ()>(base_url, Method::GET, path, token, None).await
    }

    pub async fn list_posts(
        &self,
        base_url: &str,
        token: Option<&str>,
        query: &PostQuery,
    ) -> Result<Vec<Post>, ClientError> {
        let path = with_query("/posts", &query.to_query_string());
        let list: PostList = self.get(base_url, token, &path).await?;
        Ok(list.into_posts())
    }

    pub async fn search_posts(
        &self,
        base_url: &str,
        token: Option<&str>,
        q: &str,
    ) -> Result<Vec<Post>, ClientError> {
        let path = with_query("/posts/search", &encode_pairs(&[("q", q)]));
        let list: PostList = self.get(base_url, token, &path).await?;
        Ok(list.into_posts())
    }

    pub async fn create_post(
        &self,
        base_url: &str,
        token: Option<&str>,
        draft: &PostDraft,
    ) -> Result<serde_json::Value, ClientError> {
        self.request(base_url, Method::POST, "/posts", token, Some(draft)).await
    }

    pub async fn update_post(
        &self,
        base_url: &str,
        token: Option<&str>,
        id: &PostId,
        draft: &PostDraft,
    ) -> Result<serde_json::Value, ClientError> {
        self.request(base_url, Method::PUT, &post_path(id.as_str()), token, Some(draft))
            .await
    }

    pub async fn delete_post(
        &self,
        base_url: &str,
        token: Option<&str>,
        id: &PostId,
    ) -> Result<serde_json::Value, ClientError> {
        self.request::<_, ()>(base_url, Method::DELETE, &post_path(id.as_str()), token, None)
            .await
    }

    pub async fn like_post(
        &self,
        base_url: &str,
        token: Option<&str>,
        id: &PostId,
    ) -> Result<LikeData, ClientError> {
        let path = format!("{}/like", post_path(id.as_str()));
        let data: Option<LikeData> = self
            .request::<_, ()>(base_url, Method::POST, &path, token, None)
            .await?;
        Ok(data.unwrap_or_default())
    }

    pub async fn categories(
        &self,
        base_url: &str,
        token: Option<&str>,
    ) -> Result<Vec<String>, ClientError> {
        self.get(base_url, token, "/categories").await
    }

    pub async fn login(&self, base_url: &str, creds: &Credentials<'_>) -> Result<TokenData, ClientError> {
        self.request(base_url, Method::POST, "/login", None, Some(creds)).await
    }

    pub async fn register(
        &self,
        base_url: &str,
        creds: &Credentials<'_>,
    ) -> Result<serde_json::Value, ClientError> {
        self.request(base_url, Method::POST, "/register", None, Some(creds)).await
    }
}
