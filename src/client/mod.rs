//! Client for the remote time-series service.

mod http;
mod response;

pub use http::*;
pub use response::*;

use crate::query::QueryRequest;
use std::future::Future;
use thiserror::Error;

/// Client error types.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Service(String),
    #[error("invalid response: {0}")]
    Decode(String),
}

/// Issues queries against the time-series service.
pub trait QueryClient {
    /// Run a query and return its result-sets in query order.
    fn query(&self, request: &QueryRequest) -> impl Future<Output = Result<Vec<ResultSet>, ClientError>> + Send;
}
