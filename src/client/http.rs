use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};

use super::{ClientError, ClientResult, MatchApi};
use crate::{
    dao::models::MatchId,
    dto::matches::{CreateMatchRequest, MatchDto, UpdateMatchRequest},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// [`MatchApi`] over HTTP against a running scoreboard server.
#[derive(Clone)]
pub struct HttpMatchApi {
    client: Client,
    base_url: Arc<str>,
}

/// `{message, field}` body the server attaches to every error.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
    #[serde(default)]
    field: Option<String>,
}

impl HttpMatchApi {
    /// Build a client for the API rooted at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ClientError::Transport {
                path: base_url.to_owned(),
                source: Box::new(source),
            })?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        self.client.request(method, url)
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> ClientResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                path: path.to_owned(),
                source: Box::new(source),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        match response.json::<ErrorPayload>().await {
            Ok(payload) => Err(ClientError::Api {
                status: status_code,
                message: payload.message,
                field: payload.field,
            }),
            Err(_) => Err(ClientError::Api {
                status: status_code,
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_owned(),
                field: None,
            }),
        }
    }

    async fn json<T>(&self, builder: RequestBuilder, path: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(builder, path).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode {
                path: path.to_owned(),
                source: Box::new(source),
            })
    }
}

impl MatchApi for HttpMatchApi {
    fn list(&self) -> BoxFuture<'static, ClientResult<Vec<MatchDto>>> {
        let api = self.clone();
        Box::pin(async move {
            let path = "/matches";
            api.json(api.request(Method::GET, path), path).await
        })
    }

    fn get(&self, id: MatchId) -> BoxFuture<'static, ClientResult<MatchDto>> {
        let api = self.clone();
        Box::pin(async move {
            let path = format!("/matches/{id}");
            api.json(api.request(Method::GET, &path), &path).await
        })
    }

    fn create(&self, request: CreateMatchRequest) -> BoxFuture<'static, ClientResult<MatchDto>> {
        let api = self.clone();
        Box::pin(async move {
            let path = "/matches";
            api.json(api.request(Method::POST, path).json(&request), path)
                .await
        })
    }

    fn update(
        &self,
        id: MatchId,
        request: UpdateMatchRequest,
    ) -> BoxFuture<'static, ClientResult<MatchDto>> {
        let api = self.clone();
        Box::pin(async move {
            let path = format!("/matches/{id}");
            api.json(api.request(Method::PUT, &path).json(&request), &path)
                .await
        })
    }

    fn delete(&self, id: MatchId) -> BoxFuture<'static, ClientResult<()>> {
        let api = self.clone();
        Box::pin(async move {
            let path = format!("/matches/{id}");
            api.send(api.request(Method::DELETE, &path), &path).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = HttpMatchApi::new("http://localhost:8080/").unwrap();
        let request = api.request(Method::GET, "/matches").build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/matches");
    }
}
