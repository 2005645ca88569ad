//!
//! Role-scoped REST gateway: one process per organization
//!
//! Writes go out as submitted transactions, reads as evaluations. Stage
//! updates read the current record, overlay the non-empty fields of the
//! request and submit the merged record as a whole.
//!

#[cfg(test)]
mod test;

use super::{ping, ApiError};
use crate::{
    client::ContractClient,
    config::{GatewayConfig, Role},
    identity::Identity,
};
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use globutils::NetworkRoute;
use log::{debug, info};
use ruc::*;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::{result::Result as StdResult, sync::Arc};
use tp_types::{actions::asset::Action, Asset};

/// Page size used by `/getPage` when the caller does not name one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// What a gateway needs to act for its organization.
pub struct Gateway {
    pub role: Role,
    pub identity: Identity,
    pub client: Arc<dyn ContractClient>,
}

impl Gateway {
    pub fn new(role: Role, identity: Identity, client: Arc<dyn ContractClient>) -> Self {
        Gateway {
            role,
            identity,
            client,
        }
    }
}

async fn call(
    gw: web::Data<Gateway>,
    action: Action,
    submit: bool,
) -> StdResult<Vec<u8>, ApiError> {
    let gw = gw.into_inner();
    let inv = action.into_invocation();
    debug!(
        target: "gateway",
        "{} {} as {}",
        if submit { "submit" } else { "evaluate" },
        inv.function,
        gw.identity.msp_id
    );
    let res = web::block(move || {
        if submit {
            gw.client.submit(&gw.identity, &inv)
        } else {
            gw.client.evaluate(&gw.identity, &inv)
        }
    })
    .await?;
    res.map_err(ApiError::from)
}

fn json_reply(payload: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(payload)
}

fn require_id(id: &str) -> StdResult<(), ApiError> {
    if id.is_empty() {
        return Err(ApiError::BadRequest("field 'id' is missing".to_owned()));
    }
    Ok(())
}

fn overlay(field: &mut String, value: String) {
    if !value.is_empty() {
        *field = value;
    }
}

/// A request that changes the fields owned by one stage of the chain.
pub trait StageUpdate {
    fn id(&self) -> &str;

    /// Writes the non-empty fields of the request over `asset`.
    fn apply(self, asset: &mut Asset);
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEntryRequest {
    pub id: String,
    pub farmer_id: String,
    pub farmer_name: String,
    pub farm_location: String,
    pub variety: String,
    pub batch_no: String,
    pub harvest_date: String,
    pub price: String,
    pub quantity: String,
}

impl From<NewEntryRequest> for Asset {
    fn from(r: NewEntryRequest) -> Self {
        Asset {
            id: r.id,
            farmer_id: r.farmer_id,
            farmer_name: r.farmer_name,
            farm_location: r.farm_location,
            variety: r.variety,
            batch_no: r.batch_no,
            harvest_date: r.harvest_date,
            price: r.price,
            quantity: r.quantity,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FarmerUpdateRequest {
    pub id: String,
    pub farmer_id: String,
    pub farmer_name: String,
    pub farm_location: String,
    pub variety: String,
    pub batch_no: String,
    pub harvest_date: String,
    pub price: String,
    pub quantity: String,
}

impl StageUpdate for FarmerUpdateRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply(self, asset: &mut Asset) {
        overlay(&mut asset.farmer_id, self.farmer_id);
        overlay(&mut asset.farmer_name, self.farmer_name);
        overlay(&mut asset.farm_location, self.farm_location);
        overlay(&mut asset.variety, self.variety);
        overlay(&mut asset.batch_no, self.batch_no);
        overlay(&mut asset.harvest_date, self.harvest_date);
        overlay(&mut asset.price, self.price);
        overlay(&mut asset.quantity, self.quantity);
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WholesalerUpdateRequest {
    pub id: String,
    pub wholesaler_id: String,
    pub wholesaler_name: String,
    pub wholesaler_price: String,
    pub wholesaler_buy_date: String,
}

impl StageUpdate for WholesalerUpdateRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply(self, asset: &mut Asset) {
        overlay(&mut asset.wholesaler_id, self.wholesaler_id);
        overlay(&mut asset.wholesaler_name, self.wholesaler_name);
        overlay(&mut asset.wholesaler_price, self.wholesaler_price);
        overlay(&mut asset.wholesaler_buy_date, self.wholesaler_buy_date);
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetailerUpdateRequest {
    pub id: String,
    pub retailer_id: String,
    // older clients send the lower-case spelling
    #[serde(alias = "retailername")]
    pub retailer_name: String,
    pub retailer_buy_date: String,
}

impl StageUpdate for RetailerUpdateRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply(self, asset: &mut Asset) {
        overlay(&mut asset.retailer_id, self.retailer_id);
        overlay(&mut asset.retailer_name, self.retailer_name);
        overlay(&mut asset.retailer_buy_date, self.retailer_buy_date);
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_size: Option<String>,
    pub bookmark: Option<String>,
}

/// Creates a farmer-stage record with every later stage empty.
pub async fn new_entry(
    gw: web::Data<Gateway>,
    body: web::Json<NewEntryRequest>,
) -> StdResult<HttpResponse, ApiError> {
    let asset = Asset::from(body.into_inner());
    require_id(&asset.id)?;
    let id = asset.id.clone();

    call(gw, Action::CreateAsset(asset), true).await?;
    info!(target: "gateway", "asset {} created", id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Asset created successfully",
        "id": id,
    })))
}

/// Read current record, overlay the stage fields, submit the merged record.
pub async fn stage_update<U: 'static + StageUpdate + DeserializeOwned>(
    gw: web::Data<Gateway>,
    body: web::Json<U>,
) -> StdResult<HttpResponse, ApiError> {
    let update = body.into_inner();
    require_id(update.id())?;
    let id = update.id().to_owned();

    let current = call(gw.clone(), Action::ReadAsset(id.clone()), false).await?;
    let mut asset: Asset = serde_json::from_slice(&current).map_err(|e| {
        ApiError::Internal(format!("stored asset {} is unreadable: {}", id, e))
    })?;
    update.apply(&mut asset);

    call(gw, Action::UpdateAsset(asset), true).await?;
    info!(target: "gateway", "asset {} updated", id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Asset updated successfully",
        "id": id,
    })))
}

pub async fn get_all(gw: web::Data<Gateway>) -> StdResult<HttpResponse, ApiError> {
    call(gw, Action::GetAllAssets, false).await.map(json_reply)
}

pub async fn get_entry(
    gw: web::Data<Gateway>,
    query: web::Query<EntryQuery>,
) -> StdResult<HttpResponse, ApiError> {
    let id = match query.into_inner().id {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Err(ApiError::BadRequest(
                "Query parameter 'id' is missing".to_owned(),
            ))
        }
    };
    call(gw, Action::ReadAsset(id), false).await.map(json_reply)
}

pub async fn get_page(
    gw: web::Data<Gateway>,
    query: web::Query<PageQuery>,
) -> StdResult<HttpResponse, ApiError> {
    let query = query.into_inner();
    let page_size = match query.page_size.as_deref() {
        None | Some("") => DEFAULT_PAGE_SIZE,
        Some(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "pageSize must be a positive integer, got {:?}",
                raw
            ))
        })?,
    };
    let action = Action::GetAssetsWithPagination {
        page_size,
        bookmark: query.bookmark.unwrap_or_default(),
    };
    call(gw, action, false).await.map(json_reply)
}

pub enum GatewayRoutes {
    NewEntry,
    FarmerUpdate,
    WholesalerUpdate,
    RetailerUpdate,
    GetAll,
    GetEntry,
    GetPage,
    Ping,
}

impl NetworkRoute for GatewayRoutes {
    fn route(&self) -> String {
        let endpoint = match *self {
            GatewayRoutes::NewEntry => "newEntry",
            GatewayRoutes::FarmerUpdate => "farmerUpdate",
            GatewayRoutes::WholesalerUpdate => "wholesalerUpdate",
            GatewayRoutes::RetailerUpdate => "retailerUpdate",
            GatewayRoutes::GetAll => "getAll",
            GatewayRoutes::GetEntry => "getEntry",
            GatewayRoutes::GetPage => "getPage",
            GatewayRoutes::Ping => "ping",
        };
        "/".to_owned() + endpoint
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 64)
        .error_handler(|err, _| {
            ApiError::BadRequest(format!("JSON decode error: {}", err)).into()
        })
}

/// Registers the shared read routes plus the write routes `role` owns.
pub fn configure(cfg: &mut web::ServiceConfig, role: Role) {
    cfg.app_data(json_config())
        .route(&GatewayRoutes::GetAll.route(), web::get().to(get_all))
        .route(&GatewayRoutes::GetEntry.route(), web::get().to(get_entry))
        .route(&GatewayRoutes::GetPage.route(), web::get().to(get_page))
        .route(&GatewayRoutes::Ping.route(), web::get().to(ping));

    match role {
        Role::Farmer => {
            cfg.route(&GatewayRoutes::NewEntry.route(), web::post().to(new_entry))
                .route(
                    &GatewayRoutes::FarmerUpdate.route(),
                    web::post().to(stage_update::<FarmerUpdateRequest>),
                );
        }
        Role::Wholesaler => {
            cfg.route(
                &GatewayRoutes::WholesalerUpdate.route(),
                web::post().to(stage_update::<WholesalerUpdateRequest>),
            );
        }
        Role::Retailer => {
            cfg.route(
                &GatewayRoutes::RetailerUpdate.route(),
                web::post().to(stage_update::<RetailerUpdateRequest>),
            );
        }
    }
}

pub struct GatewayApi;

impl GatewayApi {
    /// Serves `gateway` on the address named by `cfg` until the process is stopped.
    pub async fn run(gateway: Gateway, cfg: &GatewayConfig) -> Result<()> {
        let role = gateway.role;
        let data = web::Data::new(gateway);

        let http = HttpServer::new(move || {
            App::new()
                .wrap(middleware::Logger::default())
                .wrap(Cors::permissive())
                .app_data(data.clone())
                .configure(|c| configure(c, role))
        })
        .bind(&format!("{}:{}", cfg.host, cfg.port))
        .c(d!())?
        .run();

        info!(
            "{} gateway for {} listening on {}:{}",
            role, cfg.msp_id, cfg.host, cfg.port
        );

        http.await.c(d!())
    }
}
