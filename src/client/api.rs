//! Hollywood Stars API 的 HTTP 客户端

use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use crate::app::stars::model::{ListQuery, NewStar, Star, StarId, StarPatch};
use crate::core::response::{MessageResponse, Paginated};

const COLLECTION: &str = "hollywoodStars";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct StarsClient {
    http: reqwest::Client,
    base_url: String,
}

impl StarsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, COLLECTION)
    }

    fn star_url(&self, id: StarId) -> String {
        format!("{}/{}/{}", self.base_url, COLLECTION, id)
    }

    /// 获取分页列表，未设置的查询参数不会出现在请求中
    pub async fn list(&self, query: &ListQuery) -> Result<Paginated<Star>, ClientError> {
        let response = self.http.get(self.collection_url()).query(query).send().await?;
        decode(response).await
    }

    pub async fn get(&self, id: StarId) -> Result<Star, ClientError> {
        let response = self.http.get(self.star_url(id)).send().await?;
        decode(response).await
    }

    pub async fn create(&self, payload: &NewStar) -> Result<Star, ClientError> {
        let response = self
            .http
            .post(self.collection_url())
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update(&self, id: StarId, patch: &StarPatch) -> Result<MessageResponse, ClientError> {
        let response = self.http.put(self.star_url(id)).json(patch).send().await?;
        decode(response).await
    }

    pub async fn delete(&self, id: StarId) -> Result<MessageResponse, ClientError> {
        let response = self.http.delete(self.star_url(id)).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    Err(ClientError::Api { status, message })
}
