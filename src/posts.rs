//! Backend posts API client: the read side the home, posts, and categories
//! pages consume.

use crate::auth::ApiResponse;
use crate::error::ApiError;
use crate::retry::{with_retry_if, RetryConfig};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// A post summary as the list endpoints return it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Author>,
    pub created_at: DateTime<Utc>,
}

/// The `data` payload of the post list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PostList {
    pub count: i64,
    pub list: Vec<Post>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryList {
    pub list: Vec<Category>,
}

/// Query parameters for [`PostsClient::fetch_posts`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(rename = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// Client for the frontend-facing posts endpoints.
pub struct PostsClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl PostsClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            retry: RetryConfig::api_call(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let endpoint = self.endpoint(path);
        // Envelope first, payload second: error envelopes carry a null
        // `data` that must not be decoded as the success type.
        let response = with_retry_if(
            &self.retry,
            path,
            ApiError::is_transient,
            || async {
                let response = self
                    .http
                    .get(&endpoint)
                    .query(query)
                    .send()
                    .await
                    .map_err(|source| ApiError::Transport {
                        endpoint: endpoint.clone(),
                        source,
                    })?;
                response
                    .json::<ApiResponse<serde_json::Value>>()
                    .await
                    .map_err(|source| ApiError::Decode {
                        endpoint: endpoint.clone(),
                        source,
                    })
            },
        )
        .await?;

        if response.code != 200 {
            return Err(ApiError::Backend {
                endpoint: path.to_string(),
                code: response.code,
                message: response.message,
            });
        }
        serde_json::from_value(response.data).map_err(|source| ApiError::Payload {
            endpoint: path.to_string(),
            source,
        })
    }

    /// Fetch one page of posts, newest first, optionally filtered by
    /// category.
    pub async fn fetch_posts(&self, query: &PostQuery) -> Result<PostList, ApiError> {
        self.get_json("/api/frontend/posts", query).await
    }

    /// Fetch the category list for the categories page.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let no_query: [(&str, &str); 0] = [];
        let data: CategoryList = self
            .get_json("/api/frontend/categories", &no_query)
            .await?;
        Ok(data.list)
    }
}
