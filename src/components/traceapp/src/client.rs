//!
//! Contract clients: how a gateway reaches the ledger host
//!

use crate::identity::Identity;
use baseapp::BaseApp;
use std::{error, fmt, sync::Arc};
use tp_storage::LedgerDB;
use tp_types::{transaction::Invocation, ContractError};

pub const MSP_ID_HEADER: &str = "X-Msp-Id";
pub const CHANNEL_HEADER: &str = "X-Channel";
pub const CHAINCODE_HEADER: &str = "X-Chaincode";

/// Failure of a contract call as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// The contract ran and rejected the call.
    Contract(ContractError),
    /// The ledger host could not be reached or answered garbage.
    Transport(String),
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvokeError::Contract(e) => write!(f, "{}", e),
            InvokeError::Transport(m) => write!(f, "transport error: {}", m),
        }
    }
}

impl error::Error for InvokeError {}

impl From<ContractError> for InvokeError {
    fn from(e: ContractError) -> Self {
        InvokeError::Contract(e)
    }
}

/// Blocking access to one deployed contract.
pub trait ContractClient: Send + Sync {
    /// Runs `inv` and commits its writes.
    fn submit(&self, who: &Identity, inv: &Invocation) -> Result<Vec<u8>, InvokeError>;

    /// Runs `inv` without committing anything.
    fn evaluate(&self, who: &Identity, inv: &Invocation)
        -> Result<Vec<u8>, InvokeError>;
}

/// A ledger host living in the same process.
pub struct LocalContract<D: LedgerDB> {
    app: Arc<BaseApp<D>>,
}

impl<D: LedgerDB> LocalContract<D> {
    pub fn new(app: Arc<BaseApp<D>>) -> Self {
        LocalContract { app }
    }
}

impl<D: LedgerDB> ContractClient for LocalContract<D> {
    fn submit(&self, who: &Identity, inv: &Invocation) -> Result<Vec<u8>, InvokeError> {
        self.app.submit(&who.msp_id, inv).map_err(InvokeError::from)
    }

    fn evaluate(
        &self,
        who: &Identity,
        inv: &Invocation,
    ) -> Result<Vec<u8>, InvokeError> {
        self.app.evaluate(&who.msp_id, inv).map_err(InvokeError::from)
    }
}

/// A ledger host reached through its peer API.
pub struct RemoteContract {
    endpoint: String,
    channel: String,
    chaincode: String,
}

impl RemoteContract {
    pub fn new(endpoint: &str, channel: &str, chaincode: &str) -> Self {
        RemoteContract {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            channel: channel.to_owned(),
            chaincode: chaincode.to_owned(),
        }
    }

    /// Liveness of the remote peer.
    pub fn ping(&self) -> Result<String, InvokeError> {
        globutils::http_get_request(&format!("{}/ping", self.endpoint))
            .map_err(|e| InvokeError::Transport(e.to_string()))
    }

    fn call(
        &self,
        path: &str,
        who: &Identity,
        inv: &Invocation,
    ) -> Result<Vec<u8>, InvokeError> {
        let url = format!("{}/{}", self.endpoint, path);
        let headers = [
            (MSP_ID_HEADER, who.msp_id.clone()),
            (CHANNEL_HEADER, self.channel.clone()),
            (CHAINCODE_HEADER, self.chaincode.clone()),
        ];
        let (status, body) = globutils::http_post_json(&url, &headers, inv)
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        if (200..300).contains(&status) {
            return Ok(body);
        }
        match serde_json::from_slice::<ContractError>(&body) {
            Ok(e) => Err(InvokeError::Contract(e)),
            Err(_) => Err(InvokeError::Transport(format!(
                "{} answered {}: {}",
                url,
                status,
                String::from_utf8_lossy(&body)
            ))),
        }
    }
}

impl ContractClient for RemoteContract {
    fn submit(&self, who: &Identity, inv: &Invocation) -> Result<Vec<u8>, InvokeError> {
        self.call("submit", who, inv)
    }

    fn evaluate(
        &self,
        who: &Identity,
        inv: &Invocation,
    ) -> Result<Vec<u8>, InvokeError> {
        self.call("evaluate", who, inv)
    }
}
