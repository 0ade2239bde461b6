//! HTTP implementation of [`DeskSource`] over the REST content API.
//!
//! Collections follow the `{"_items": [...], "_meta": {...}}` envelope and
//! accept `page` / `max_results` query parameters.

use std::time::Duration;

use async_trait::async_trait;
use newsdesk_models::{Collection, Desk, User};
use newsdesk_util::href;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{ApiError, DeskSource};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    root: Url,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`
    /// (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let root = href::api_root(base_url)?;
        if root.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            root,
            token: None,
            timeout: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        tracing::debug!(%url, ?query, "GET");
        let mut builder = self.http.get(url.clone());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "API request failed");
            return Err(ApiError::from_status(status, body));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DeskSource for ApiClient {
    async fn query_desks(&self, max_results: u32) -> Result<Collection<Desk>, ApiError> {
        let url = self.endpoint(&["desks"]);
        self.get_json(url, &[("max_results", max_results.to_string())])
            .await
    }

    async fn list_users(&self, page: u32, max_results: u32) -> Result<Collection<User>, ApiError> {
        let url = self.endpoint(&["users"]);
        self.get_json(
            url,
            &[
                ("page", page.to_string()),
                ("max_results", max_results.to_string()),
            ],
        )
        .await
    }

    async fn get_desk(&self, id: &str) -> Result<Desk, ApiError> {
        let url = self.endpoint(&["desks", id]);
        self.get_json(url, &[]).await
    }

    async fn get_desks_by_href(&self, link: &str) -> Result<Collection<Desk>, ApiError> {
        let url = href::resolve(&self.root, link)?;
        self.get_json(url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&format!("{}/api", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn queries_desks_with_page_bound() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/desks"))
            .and(query_param("max_results", "500"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_items": [
                    {"_id": "d1", "name": "Sports", "members": [{"user": "u1"}]}
                ],
                "_meta": {"page": 1, "max_results": 500, "total": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let desks = client_for(&server).await.query_desks(500).await.unwrap();
        assert_eq!(desks.items.len(), 1);
        assert_eq!(desks.items[0].name, "Sports");
        assert_eq!(desks.items[0].member_ids().collect::<Vec<_>>(), vec!["u1"]);
    }

    #[tokio::test]
    async fn lists_first_user_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("page", "1"))
            .and(query_param("max_results", "500"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_items": [{"_id": "u1", "username": "jdoe"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let users = client_for(&server).await.list_users(1, 500).await.unwrap();
        assert_eq!(users.items[0].name(), "jdoe");
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/desks/d1"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "d1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await.with_token("secret");
        let desk = client.get_desk("d1").await.unwrap();
        assert_eq!(desk.id, "d1");
    }

    #[tokio::test]
    async fn follows_relative_href() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/u1/desks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_items": [{"_id": "d2", "name": "Features"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let desks = client_for(&server)
            .await
            .get_desks_by_href("users/u1/desks")
            .await
            .unwrap();
        assert_eq!(desks.items[0].id, "d2");
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/desks/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/desks/locked"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/desks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(
            client.get_desk("missing").await,
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            client.get_desk("locked").await,
            Err(ApiError::Unauthorized)
        ));
        match client.query_desks(500).await {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/desks"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.query_desks(10).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("no scheme here"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn endpoint_escapes_ids() {
        let client = ApiClient::new("http://localhost:5000/api").unwrap();
        let url = client.endpoint(&["desks", "a b"]);
        assert_eq!(url.as_str(), "http://localhost:5000/api/desks/a%20b");
    }
}
