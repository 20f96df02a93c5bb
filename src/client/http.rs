//! HTTP implementation of the query client.

use super::{
    ClientError, ErrorResponse, NamesResponse, QueryClient, QueryResponse, ResultSet, VersionResponse,
};
use crate::query::QueryRequest;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

const API_PREFIX: &str = "/api/v1";

/// Client for a KairosDB-compatible REST API.
#[derive(Debug, Clone)]
pub struct KairosClient {
    base_url: String,
    http: reqwest::Client,
}

impl KairosClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Names of all stored metrics.
    pub async fn metric_names(&self) -> Result<Vec<String>, ClientError> {
        self.get_names("/metricnames").await
    }

    /// Names of all tags.
    pub async fn tag_names(&self) -> Result<Vec<String>, ClientError> {
        self.get_names("/tagnames").await
    }

    /// Values of all tags.
    pub async fn tag_values(&self) -> Result<Vec<String>, ClientError> {
        self.get_names("/tagvalues").await
    }

    pub async fn version(&self) -> Result<String, ClientError> {
        let response = self.http.get(self.url("/version")).send().await?;
        let body: VersionResponse = decode(response).await?;
        Ok(body.version)
    }

    async fn get_names(&self, path: &str) -> Result<Vec<String>, ClientError> {
        let response = self.http.get(self.url(path)).send().await?;
        let body: NamesResponse = decode(response).await?;
        Ok(body.results)
    }
}

impl QueryClient for KairosClient {
    async fn query(&self, request: &QueryRequest) -> Result<Vec<ResultSet>, ClientError> {
        tracing::debug!("Querying {} metrics at {}", request.metrics.len(), self.base_url);

        let response = self
            .http
            .post(self.url("/datapoints/query"))
            .json(request)
            .send()
            .await?;

        let body: QueryResponse = decode(response).await?;
        Ok(body.queries)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(service_error(status, &text));
    }

    serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
}

fn service_error(status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(e) if !e.errors.is_empty() => ClientError::Service(e.errors.join("; ")),
        _ => ClientError::Service(format!("service returned {}", status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = KairosClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.url("/datapoints/query"),
            "http://localhost:8080/api/v1/datapoints/query"
        );
    }

    #[test]
    fn test_service_error_joins_messages() {
        let err = service_error(
            StatusCode::BAD_REQUEST,
            r#"{"errors":["metric[0].name may not be empty.","bad unit"]}"#,
        );
        assert_eq!(err.to_string(), "metric[0].name may not be empty.; bad unit");

        let err = service_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(err.to_string(), "service returned 500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_query_unreachable_service() {
        let client = KairosClient::new("http://256.256.256.256");
        let request = QueryRequest::from_json(
            r#"{"metrics":[{"name":"m"}],"start_relative":{"value":1,"unit":"hours"}}"#,
        )
        .unwrap();
        assert!(matches!(client.query(&request).await, Err(ClientError::Http(_))));
    }
}
