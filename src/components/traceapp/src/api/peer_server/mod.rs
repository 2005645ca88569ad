//!
//! Peer API: runs contract invocations against the local ledger host
//!


use super::{ping, status_of};
use crate::client::{CHAINCODE_HEADER, CHANNEL_HEADER, MSP_ID_HEADER};
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use baseapp::BaseApp;
use globutils::NetworkRoute;
use log::info;
use ruc::*;
use std::{result::Result as StdResult, sync::Arc};
use tp_storage::LedgerDB;
use tp_types::{transaction::Invocation, ContractError};

/// The ledger host as served over HTTP, bound to one channel and contract.
pub struct PeerServer<D: LedgerDB> {
    pub app: Arc<BaseApp<D>>,
    pub channel: String,
    pub chaincode: String,
}

impl<D: LedgerDB> PeerServer<D> {
    pub fn new(app: Arc<BaseApp<D>>, channel: &str, chaincode: &str) -> Self {
        PeerServer {
            app,
            channel: channel.to_owned(),
            chaincode: chaincode.to_owned(),
        }
    }

    // Returns the caller's MSP id once the request targets this channel and contract.
    fn admit(&self, req: &HttpRequest) -> StdResult<String, ContractError> {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_owned())
        };
        if let Some(channel) = header(CHANNEL_HEADER) {
            if channel != self.channel {
                return Err(ContractError::InvalidArgument(format!(
                    "channel {} is not served here",
                    channel
                )));
            }
        }
        if let Some(chaincode) = header(CHAINCODE_HEADER) {
            if chaincode != self.chaincode {
                return Err(ContractError::InvalidArgument(format!(
                    "contract {} is not deployed on channel {}",
                    chaincode, self.channel
                )));
            }
        }
        match header(MSP_ID_HEADER) {
            Some(msp_id) if !msp_id.is_empty() => Ok(msp_id),
            _ => Err(ContractError::InvalidArgument(format!(
                "missing {} header",
                MSP_ID_HEADER
            ))),
        }
    }
}

fn reply(res: StdResult<Vec<u8>, ContractError>) -> HttpResponse {
    match res {
        Ok(payload) => HttpResponse::Ok()
            .content_type("application/json")
            .body(payload),
        Err(e) => HttpResponse::build(status_of(&e)).json(&e),
    }
}

async fn invoke<D: 'static + LedgerDB>(
    data: web::Data<PeerServer<D>>,
    req: HttpRequest,
    body: web::Json<Invocation>,
    submit: bool,
) -> HttpResponse {
    let creator = match data.admit(&req) {
        Ok(c) => c,
        Err(e) => return reply(Err(e)),
    };
    let inv = body.into_inner();
    let server = data.into_inner();

    let res = web::block(move || {
        if submit {
            server.app.submit(&creator, &inv)
        } else {
            server.app.evaluate(&creator, &inv)
        }
    })
    .await
    .unwrap_or_else(|e| Err(ContractError::Store(e.to_string())));

    reply(res)
}

/// Runs the invocation and commits its writes.
pub async fn submit<D: 'static + LedgerDB>(
    data: web::Data<PeerServer<D>>,
    req: HttpRequest,
    body: web::Json<Invocation>,
) -> HttpResponse {
    invoke(data, req, body, true).await
}

/// Runs the invocation and discards its writes.
pub async fn evaluate<D: 'static + LedgerDB>(
    data: web::Data<PeerServer<D>>,
    req: HttpRequest,
    body: web::Json<Invocation>,
) -> HttpResponse {
    invoke(data, req, body, false).await
}

/// Returns the name, version and current height of the ledger host
pub async fn version<D: 'static + LedgerDB>(
    data: web::Data<PeerServer<D>>,
) -> actix_web::Result<String> {
    let server = data.clone().into_inner();
    let height = web::block(move || server.app.height().map_err(|e| e.to_string()))
        .await?
        .map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(format!(
        "Build: {} {} height {}",
        data.app.name, data.app.version, height
    ))
}

pub enum PeerRoutes {
    Submit,
    Evaluate,
    Ping,
    Version,
}

impl NetworkRoute for PeerRoutes {
    fn route(&self) -> String {
        let endpoint = match *self {
            PeerRoutes::Submit => "submit",
            PeerRoutes::Evaluate => "evaluate",
            PeerRoutes::Ping => "ping",
            PeerRoutes::Version => "version",
        };
        "/".to_owned() + endpoint
    }
}

/// Registers the peer routes for a host over `D`.
pub fn configure<D: 'static + LedgerDB>(cfg: &mut web::ServiceConfig) {
    cfg.route(&PeerRoutes::Submit.route(), web::post().to(submit::<D>))
        .route(&PeerRoutes::Evaluate.route(), web::post().to(evaluate::<D>))
        .route(&PeerRoutes::Ping.route(), web::get().to(ping))
        .route(&PeerRoutes::Version.route(), web::get().to(version::<D>));
}

pub struct PeerApi;

impl PeerApi {
    /// Serves `server` on `host:port` until the process is stopped.
    pub async fn run<D: 'static + LedgerDB>(
        server: PeerServer<D>,
        host: &str,
        port: u16,
    ) -> Result<()> {
        let data = web::Data::new(server);

        let http = HttpServer::new(move || {
            App::new()
                .wrap(middleware::Logger::default())
                .wrap(Cors::permissive())
                .app_data(web::JsonConfig::default().limit(1024 * 512))
                .app_data(data.clone())
                .configure(configure::<D>)
        })
        .bind(&format!("{}:{}", host, port))
        .c(d!())?
        .run();

        info!("Peer API listening on {}:{}", host, port);

        http.await.c(d!())
    }
}
