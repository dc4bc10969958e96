//! Session backed by a plain HTTP client.
//!
//! Covers navigation-only journeys (page loads, redirects, page text) without
//! a browser. Snapshots are the raw HTML of the last page.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::{FlowError, FlowResult};
use crate::session::Session;

/// Configuration for the HTTP session
#[derive(Debug, Clone)]
pub struct HttpSessionConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("flowcheck/{}", flowcheck_common::VERSION),
        }
    }
}

struct Page {
    url: String,
    body: Vec<u8>,
}

pub struct HttpSession {
    client: reqwest::Client,
    page: Option<Page>,
    closed: bool,
}

impl HttpSession {
    pub fn new(config: HttpSessionConfig) -> FlowResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            client,
            page: None,
            closed: false,
        })
    }

    fn page(&self) -> FlowResult<&Page> {
        if self.closed {
            return Err(FlowError::SessionClosed);
        }
        self.page.as_ref().ok_or(FlowError::NoPage)
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn navigate(&mut self, url: &str) -> FlowResult<()> {
        if self.closed {
            return Err(FlowError::SessionClosed);
        }

        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(FlowError::StepFailed {
                step: format!("navigate:{}", url),
                reason: format!("HTTP {}", status),
            });
        }

        let body = response.bytes().await?.to_vec();
        self.page = Some(Page {
            url: final_url,
            body,
        });
        Ok(())
    }

    async fn current_url(&mut self) -> FlowResult<String> {
        Ok(self.page()?.url.clone())
    }

    async fn page_source(&mut self) -> FlowResult<String> {
        Ok(String::from_utf8_lossy(&self.page()?.body).into_owned())
    }

    async fn snapshot(&mut self) -> FlowResult<Vec<u8>> {
        Ok(self.page()?.body.clone())
    }

    fn artifact_extension(&self) -> &'static str {
        "html"
    }

    async fn close(&mut self) -> FlowResult<()> {
        self.closed = true;
        self.page = None;
        Ok(())
    }
}
