//! HTTP client for the hosted PostgREST data API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::{DataService, Filter, RemoteError, Select, Table};

/// Connect timeout for the remote API. No request timeout is applied.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of response-body characters kept in error messages.
const ERROR_BODY_LIMIT: usize = 500;

/// What a write sends back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefer {
    /// The written rows. Requires read access to them.
    Representation,
    /// Nothing.
    Minimal,
}

impl Prefer {
    const fn header_value(self) -> &'static str {
        match self {
            Self::Representation => "return=representation",
            Self::Minimal => "return=minimal",
        }
    }
}

/// Client for the remote data API (`{REMOTE_URL}/rest/v1`).
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    rest_url: Url,
    anon_key: SecretString,
}

impl RestClient {
    /// Create a client for the project at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the endpoint URL
    /// cannot be derived from `base_url`.
    pub fn new(base_url: &Url, anon_key: SecretString) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        let rest_url = base_url.join("rest/v1/")?;

        Ok(Self {
            inner: Arc::new(RestClientInner {
                client,
                rest_url,
                anon_key,
            }),
        })
    }

    /// URL for `table` with the given filters applied.
    fn table_url(&self, table: Table, filters: &[Filter]) -> Result<Url, RemoteError> {
        let mut url = self.inner.rest_url.join(table.name())?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            for filter in filters {
                pairs.append_pair(filter.column(), &filter.operator_value());
            }
        }
        Ok(url)
    }

    /// Start a request carrying the API key and bearer token.
    fn request(&self, method: Method, url: Url, bearer: Option<&str>) -> RequestBuilder {
        let anon_key = self.inner.anon_key.expose_secret();
        let token = bearer.unwrap_or(anon_key);
        self.inner
            .client
            .request(method, url)
            .header("apikey", anon_key)
            .bearer_auth(token)
    }

    /// Start a write that asks for `prefer` in the response.
    fn write(
        &self,
        method: Method,
        url: Url,
        bearer: Option<&str>,
        prefer: Prefer,
    ) -> RequestBuilder {
        self.request(method, url, bearer).header("Prefer", prefer.header_value())
    }

    /// POST `row` to `table` without a `select`, so no read access is needed.
    fn minimal_insert(
        &self,
        table: Table,
        row: &Value,
        bearer: Option<&str>,
    ) -> Result<RequestBuilder, RemoteError> {
        let url = self.inner.rest_url.join(table.name())?;
        Ok(self.write(Method::POST, url, bearer, Prefer::Minimal).json(row))
    }

    /// Send a request and return the body of a successful response.
    async fn send(request: RequestBuilder) -> Result<String, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            tracing::warn!(status = %status, body = %message, "Remote API returned non-success status");
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// Decode a `return=representation` body into rows.
    fn rows(body: &str) -> Result<Vec<Value>, RemoteError> {
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(body)?)
    }
}

#[async_trait]
impl DataService for RestClient {
    #[instrument(skip(self, bearer), fields(table = %query.table))]
    async fn select(
        &self,
        query: &Select,
        bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError> {
        let mut url = self.table_url(query.table, &query.filters)?;
        if let Some(order) = &query.order {
            url.query_pairs_mut()
                .append_pair("order", &order.query_value());
        }

        let body = Self::send(self.request(Method::GET, url, bearer)).await?;
        Self::rows(&body)
    }

    #[instrument(skip(self, row, bearer), fields(table = %table))]
    async fn insert(
        &self,
        table: Table,
        row: Value,
        bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError> {
        let url = self.table_url(table, &[])?;
        let request = self
            .write(Method::POST, url, bearer, Prefer::Representation)
            .json(&row);

        let body = Self::send(request).await?;
        Self::rows(&body)
    }

    #[instrument(skip(self, row, bearer), fields(table = %table))]
    async fn insert_without_return(
        &self,
        table: Table,
        row: Value,
        bearer: Option<&str>,
    ) -> Result<(), RemoteError> {
        let request = self.minimal_insert(table, &row, bearer)?;
        Self::send(request).await?;
        Ok(())
    }

    #[instrument(skip(self, patch, bearer), fields(table = %table))]
    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
        bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError> {
        let url = self.table_url(table, filters)?;
        let request = self
            .write(Method::PATCH, url, bearer, Prefer::Representation)
            .json(&patch);

        let body = Self::send(request).await?;
        Self::rows(&body)
    }

    #[instrument(skip(self, bearer), fields(table = %table))]
    async fn delete(
        &self,
        table: Table,
        filters: &[Filter],
        bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError> {
        let url = self.table_url(table, filters)?;
        let request = self.write(Method::DELETE, url, bearer, Prefer::Representation);

        let body = Self::send(request).await?;
        Self::rows(&body)
    }

    async fn ping(&self) -> Result<(), RemoteError> {
        let url = self.inner.rest_url.clone();
        Self::send(self.request(Method::GET, url, None)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> RestClient {
        let base = Url::parse("https://project.example.co").unwrap();
        RestClient::new(&base, SecretString::from("anon-key")).unwrap()
    }

    #[test]
    fn test_table_url_encodes_filters() {
        let url = client()
            .table_url(Table::BusinessInfo, &[Filter::eq("is_active", true)])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.example.co/rest/v1/business_info?select=*&is_active=eq.true"
        );
    }

    #[test]
    fn test_minimal_insert_asks_for_no_rows() {
        let request = client()
            .minimal_insert(Table::ContactMessages, &serde_json::json!({"name": "Pat"}), None)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://project.example.co/rest/v1/contact_messages"
        );
        assert_eq!(request.headers()["prefer"], "return=minimal");
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_rows_accepts_empty_body() {
        assert!(RestClient::rows("").unwrap().is_empty());
        assert_eq!(RestClient::rows(r#"[{"id":"a"}]"#).unwrap().len(), 1);
        assert!(RestClient::rows("not json").is_err());
    }
}
