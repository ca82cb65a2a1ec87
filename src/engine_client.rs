use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::engine::{hex_address, Address, DebugEngine, EngineError, SymbolEntry};

// Data structures for the engine's HTTP API
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DebuggingResponse {
    pub debugging: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnumerateSymbolsRequest {
    #[serde(with = "hex_address")]
    pub base: Address,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnumerateSymbolsResponse {
    pub symbols: Vec<SymbolEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecRequest {
    pub command: String,
    /// `false` queues the command and returns immediately.
    pub wait: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecResponse {
    pub success: bool,
}

/// A debugger engine reached over HTTP.
pub struct RemoteEngine {
    client: Client,
    base_url: String,
}

impl RemoteEngine {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn ping(&self) -> Result<(), EngineError> {
        debug!("Pinging debugger engine");

        let response = self
            .client
            .get(format!("{}/ping", self.base_url))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send ping request: {}", e);
                EngineError::Unreachable(format!("Network error: {e}"))
            })?;

        let ping: PingResponse = Self::parse(Self::check_status(response, "ping").await?, "ping").await?;
        if ping.status == "ok" {
            debug!("Engine ping successful.");
            Ok(())
        } else {
            let err_msg = format!("Ping response status was not 'ok': {}", ping.status);
            error!("{}", err_msg);
            Err(EngineError::Other(err_msg))
        }
    }

    async fn check_status(response: Response, what: &str) -> Result<Response, EngineError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        error!("{} request failed with status {}: {}", what, status, error_text);
        Err(EngineError::BadStatus {
            status: status.as_u16(),
            message: error_text,
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response, what: &str) -> Result<T, EngineError> {
        response.json().await.map_err(|e| {
            error!("Failed to parse {} response: {}", what, e);
            EngineError::MalformedResponse(format!("Failed to parse {what} response: {e}"))
        })
    }

    async fn post_exec(&self, command: &str, wait: bool) -> Result<bool, EngineError> {
        let request = ExecRequest {
            command: command.to_string(),
            wait,
        };

        debug!("Sending exec request: {:?}", request);

        let response = self
            .client
            .post(format!("{}/exec", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send exec request: {}", e);
                EngineError::Unreachable(format!("Network error: {e}"))
            })?;

        let exec: ExecResponse = Self::parse(Self::check_status(response, "exec").await?, "exec").await?;
        Ok(exec.success)
    }
}

#[async_trait]
impl DebugEngine for RemoteEngine {
    async fn is_debugging(&self) -> bool {
        let response = match self
            .client
            .get(format!("{}/debugging", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                debug!("Engine unreachable, treating as not debugging: {}", e);
                return false;
            }
        };
        let response = match Self::check_status(response, "debugging").await {
            Ok(resp) => resp,
            Err(_) => return false,
        };
        Self::parse::<DebuggingResponse>(response, "debugging")
            .await
            .map(|r| r.debugging)
            .unwrap_or(false)
    }

    async fn enumerate_symbols(
        &self,
        base: Address,
        sink: &mut (dyn FnMut(SymbolEntry) + Send),
    ) -> Result<(), EngineError> {
        info!("Requesting symbols for module at 0x{:X}", base);

        let response = self
            .client
            .post(format!("{}/symbols/enumerate", self.base_url))
            .json(&EnumerateSymbolsRequest { base })
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send enumerate request: {}", e);
                EngineError::EnumerationFailed {
                    base,
                    reason: format!("Network error: {e}"),
                }
            })?;

        let response = Self::check_status(response, "enumerate").await?;
        let symbols: EnumerateSymbolsResponse = Self::parse(response, "enumerate").await?;

        debug!(count = symbols.symbols.len(), "Received symbols");
        for symbol in symbols.symbols {
            sink(symbol);
        }
        Ok(())
    }

    async fn exec_direct(&self, command: &str) -> Result<bool, EngineError> {
        self.post_exec(command, true).await
    }

    async fn exec(&self, command: &str) -> Result<(), EngineError> {
        self.post_exec(command, false).await.map(|_| ())
    }
}
