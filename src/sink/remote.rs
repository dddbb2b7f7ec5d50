//! Remote sink: the summary as one document in an external collection.
//!
//! The store is reached through an HTTP document gateway. The contract is:
//!
//! - `POST http://{address}:{port}/{database}/{collection}`
//! - `Authorization: Basic base64({username}:{password})`
//! - `Content-Type: application/json`, body is the flat summary document
//! - any 2xx status means the document was inserted; every other status is
//!   a [`MonitorError::Sink`] carrying the status and response body
//!
//! The HTTP client is created on the first emit and kept for the sink's
//! lifetime; each sampler owns its own sink, so clients are not shared.

use crate::config::RemoteSinkConfig;
use crate::error::{MonitorError, Result};
use crate::monitor::ObservationSummary;
use crate::sink::ObservationSink;
use reqwest::blocking::Client;
use std::time::Duration;

/// Default timeout for the single insert request
pub const DEFAULT_INSERT_TIMEOUT: Duration = Duration::from_secs(10);

/// Inserts summaries into a remote document collection.
#[derive(Debug)]
pub struct RemoteDocumentSink {
    config: RemoteSinkConfig,
    timeout: Duration,
    client: Option<Client>,
}

impl RemoteDocumentSink {
    pub fn new(config: RemoteSinkConfig) -> Self {
        Self {
            config,
            timeout: DEFAULT_INSERT_TIMEOUT,
            client: None,
        }
    }

    /// Override the insert request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &RemoteSinkConfig {
        &self.config
    }

    /// Whether the client has been created yet.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn connect(slot: &mut Option<Client>, timeout: Duration) -> Result<&Client> {
        let client = match slot.take() {
            Some(client) => client,
            None => Client::builder().timeout(timeout).build()?,
        };
        Ok(slot.insert(client))
    }
}

impl ObservationSink for RemoteDocumentSink {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn emit(&mut self, summary: &ObservationSummary) -> Result<()> {
        let endpoint = self.config.endpoint();
        let client = Self::connect(&mut self.client, self.timeout)?;

        let resp = client
            .post(&endpoint)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(summary)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(MonitorError::Sink(format!(
                "insert into {}.{} rejected with {}: {}",
                self.config.database, self.config.collection, status, body
            )));
        }

        tracing::debug!(
            endpoint = %endpoint,
            status = %status,
            "inserted observation document",
        );

        Ok(())
    }
}
