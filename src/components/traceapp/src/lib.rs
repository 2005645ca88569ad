//!
//! HTTP surfaces of toma-trace: the peer API in front of the ledger host
//! and the REST gateways the organizations talk to.
//!

#![deny(missing_docs)]
#![allow(clippy::needless_borrow)]

#[allow(missing_docs)]
pub mod api;
#[allow(missing_docs)]
pub mod client;
#[allow(missing_docs)]
pub mod config;
#[allow(missing_docs)]
pub mod identity;

use {
    api::{
        gateway::{Gateway, GatewayApi},
        peer_server::{PeerApi, PeerServer},
    },
    baseapp::BaseApp,
    client::{ContractClient, LocalContract, RemoteContract},
    config::{Backend, GatewayConfig, PeerConfig, DEFAULT_CHAINCODE, DEFAULT_CHANNEL},
    identity::Identity,
    log::{info, warn},
    ruc::*,
    std::{path::Path, sync::Arc},
    tp_storage::{LedgerDB, MemoryDB, SledDB},
};

/// Identity used to seed the sample assets when the peer starts.
pub const SEEDING_MSP: &str = "Org1MSP";

/// Opens the configured world state and serves the peer API on it.
pub async fn run_peer(cfg: &PeerConfig) -> Result<()> {
    match cfg.ledger_dir.as_deref() {
        Some(dir) => {
            let app = BaseApp::<SledDB>::open(Path::new(dir)).c(d!())?;
            info!("world state opened at {}", dir);
            serve_peer(app, cfg).await
        }
        None => {
            info!("world state kept in memory");
            serve_peer(BaseApp::<MemoryDB>::new_in_memory(), cfg).await
        }
    }
}

async fn serve_peer<D: 'static + LedgerDB>(
    app: BaseApp<D>,
    cfg: &PeerConfig,
) -> Result<()> {
    if cfg.init_ledger {
        app.init_ledger(SEEDING_MSP).c(d!())?;
    }
    info!(
        "{} {} at height {}",
        app.name,
        app.version,
        app.height().c(d!())?
    );

    let server = PeerServer::new(Arc::new(app), DEFAULT_CHANNEL, DEFAULT_CHAINCODE);
    PeerApi::run(server, &cfg.host, cfg.port).await
}

/// Builds the contract client named by `cfg`, ready to be shared by handlers.
pub fn connect(cfg: &GatewayConfig) -> Result<Arc<dyn ContractClient>> {
    let client: Arc<dyn ContractClient> = match &cfg.backend {
        Backend::Remote(endpoint) => {
            let remote = RemoteContract::new(endpoint, &cfg.channel, &cfg.chaincode);
            if let Err(e) = remote.ping() {
                warn!("peer at {} is not answering yet: {}", endpoint, e);
            }
            Arc::new(remote)
        }
        Backend::Memory => Arc::new(LocalContract::new(Arc::new(
            BaseApp::<MemoryDB>::new_in_memory(),
        ))),
        Backend::Sled(dir) => {
            let app = BaseApp::<SledDB>::open(Path::new(dir)).c(d!())?;
            Arc::new(LocalContract::new(Arc::new(app)))
        }
    };
    Ok(client)
}

/// Loads the gateway identity, connects to the ledger and serves the role routes.
pub async fn run_gateway(cfg: &GatewayConfig) -> Result<()> {
    let identity = Identity::load(&cfg.msp_id, cfg.cert_path.as_deref()).c(d!())?;
    let client = connect(cfg).c(d!())?;
    info!(
        "{} gateway on channel {} contract {} via {:?}",
        cfg.role, cfg.channel, cfg.chaincode, cfg.backend
    );

    GatewayApi::run(Gateway::new(cfg.role, identity, client), cfg).await
}
