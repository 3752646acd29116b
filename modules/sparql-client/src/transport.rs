use std::time::Duration;

use async_trait::async_trait;
use lodlens_common::ConnectionConfig;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SparqlError};

/// Executes a SELECT query and hands back the decoded JSON body.
#[async_trait]
pub trait SparqlTransport: Send + Sync {
    async fn select(&self, query: &str) -> Result<Value>;
}

/// SPARQL protocol over HTTP GET.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    accept: String,
    params: Vec<(String, String)>,
}

impl HttpTransport {
    pub fn new(connection: &ConnectionConfig) -> Result<Self> {
        if connection.endpoint.trim().is_empty() {
            return Err(SparqlError::Config("no SPARQL endpoint configured".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(connection.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: connection.endpoint.clone(),
            accept: connection.accept.clone(),
            params: connection
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SparqlTransport for HttpTransport {
    async fn select(&self, query: &str) -> Result<Value> {
        debug!(endpoint = %self.endpoint, "SPARQL request");

        let resp = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, &self.accept)
            .query(&[("query", query)])
            .query(&self.params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SparqlError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}
