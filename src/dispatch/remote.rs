use tracing::debug;

use crate::error::RunError;
use crate::model::CommandParams;

/// Carries the current list filter to remote extensions.
pub const QUERY_HEADER: &str = "X-Sunbeam-Query";

#[derive(Clone, Debug, PartialEq)]
pub struct RemoteRequest {
    pub url: String,
    pub params: CommandParams,
    pub query: String,
}

impl RemoteRequest {
    pub(super) fn new(base_url: &str, command: &str, params: CommandParams, query: &str) -> Self {
        Self {
            url: format!("{}/{}", base_url.trim_end_matches('/'), command),
            params,
            query: query.to_string(),
        }
    }

    pub fn send(&self) -> Result<Vec<u8>, RunError> {
        debug!(url = %self.url, "post remote command");
        let client = reqwest::blocking::Client::builder()
            .user_agent("sunbeam")
            .build()
            .map_err(|err| RunError::transport("build http client", err))?;
        let resp = client
            .post(&self.url)
            .header(QUERY_HEADER, &self.query)
            .json(&self.params)
            .send()
            .map_err(|err| RunError::transport(&format!("POST {}", self.url), err))?;

        if resp.status() != reqwest::StatusCode::OK {
            return Err(RunError::Status(resp.status().to_string()));
        }
        let body = resp
            .bytes()
            .map_err(|err| RunError::transport("read response body", err))?;
        Ok(body.to_vec())
    }
}
