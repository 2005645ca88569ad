use super::*;
use crate::client::LocalContract;
use actix_web::{http::StatusCode, test};
use baseapp::BaseApp;
use serde_json::Value;
use tp_mocks::{MemoryDB, FARMER_MSP};
use tp_types::transaction::PaginatedAssets;

fn gateway(role: Role, host: &Arc<BaseApp<MemoryDB>>) -> web::Data<Gateway> {
    let client = Arc::new(LocalContract::new(host.clone()));
    web::Data::new(Gateway::new(
        role,
        Identity::new(role.default_msp_id()),
        client,
    ))
}

fn seeded_host() -> Arc<BaseApp<MemoryDB>> {
    let host = Arc::new(BaseApp::<MemoryDB>::new_in_memory());
    host.init_ledger(FARMER_MSP).unwrap();
    host
}

macro_rules! service {
    ($data: expr, $role: expr) => {
        test::init_service(
            App::new()
                .app_data($data.clone())
                .configure(|c| configure(c, $role)),
        )
        .await
    };
}

fn post_json(route: GatewayRoutes, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(&route.route()).set_json(body)
}

#[actix_rt::test]
async fn new_entry_then_read() {
    let host = Arc::new(BaseApp::<MemoryDB>::new_in_memory());
    let app = service!(gateway(Role::Farmer, &host), Role::Farmer);

    let req = post_json(
        GatewayRoutes::NewEntry,
        json!({
            "id": "asset21",
            "farmerId": "F021",
            "farmerName": "Sunrise Farms",
            "farmLocation": "Pune",
            "variety": "Cherry",
            "batchNo": "B021",
            "harvestDate": "2024-06-01",
            "price": "1200",
            "quantity": "80"
        }),
    )
    .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        reply,
        json!({ "message": "Asset created successfully", "id": "asset21" })
    );

    let req = test::TestRequest::get()
        .uri("/getEntry?id=asset21")
        .to_request();
    let asset: Asset = test::call_and_read_body_json(&app, req).await;
    assert_eq!(asset.farmer_name, "Sunrise Farms");
    assert_eq!(asset.quantity, "80");
    assert!(asset.wholesaler_id.is_empty());
    assert!(asset.retailer_name.is_empty());

    let req = post_json(GatewayRoutes::NewEntry, json!({ "id": "asset21" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn stage_updates_merge_over_stored_record() {
    let host = seeded_host();
    let wholesaler = service!(gateway(Role::Wholesaler, &host), Role::Wholesaler);
    let retailer = service!(gateway(Role::Retailer, &host), Role::Retailer);

    let req = post_json(
        GatewayRoutes::WholesalerUpdate,
        json!({
            "id": "asset2",
            "wholesalerId": "W002",
            "wholesalerName": "Metro Traders",
            "wholesalerPrice": "1400",
            "wholesalerBuyDate": "2023-02-10"
        }),
    )
    .to_request();
    let reply: Value = test::call_and_read_body_json(&wholesaler, req).await;
    assert_eq!(reply["message"], "Asset updated successfully");
    assert_eq!(reply["id"], "asset2");

    let req = post_json(
        GatewayRoutes::RetailerUpdate,
        json!({
            "id": "asset2",
            "retailerId": "R002",
            "retailername": "Corner Store",
            "retailerBuyDate": ""
        }),
    )
    .to_request();
    let resp = test::call_service(&retailer, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/getEntry?id=asset2")
        .to_request();
    let asset: Asset = test::call_and_read_body_json(&retailer, req).await;
    assert_eq!(asset.farmer_id, "F002");
    assert_eq!(asset.price, "1100");
    assert_eq!(asset.wholesaler_name, "Metro Traders");
    assert_eq!(asset.wholesaler_buy_date, "2023-02-10");
    assert_eq!(asset.retailer_id, "R002");
    assert_eq!(asset.retailer_name, "Corner Store");
    assert!(asset.retailer_buy_date.is_empty());
}

#[actix_rt::test]
async fn farmer_update_keeps_untouched_fields() {
    let host = seeded_host();
    let app = service!(gateway(Role::Farmer, &host), Role::Farmer);

    let req = post_json(
        GatewayRoutes::FarmerUpdate,
        json!({ "id": "asset3", "price": "999", "variety": "" }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/getEntry?id=asset3")
        .to_request();
    let asset: Asset = test::call_and_read_body_json(&app, req).await;
    assert_eq!(asset.price, "999");
    assert_eq!(asset.variety, "Variety3");
    assert_eq!(asset.batch_no, "B003");
}

#[actix_rt::test]
async fn update_of_unknown_asset_is_not_found() {
    let host = seeded_host();
    let app = service!(gateway(Role::Wholesaler, &host), Role::Wholesaler);
    let height = host.height().unwrap();

    let req = post_json(
        GatewayRoutes::WholesalerUpdate,
        json!({ "id": "asset99", "wholesalerId": "W099" }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "the asset asset99 does not exist");
    assert_eq!(host.height().unwrap(), height);
}

#[actix_rt::test]
async fn routes_are_scoped_by_role() {
    let host = seeded_host();
    let app = service!(gateway(Role::Retailer, &host), Role::Retailer);

    for route in [
        GatewayRoutes::NewEntry,
        GatewayRoutes::FarmerUpdate,
        GatewayRoutes::WholesalerUpdate,
    ] {
        let req = post_json(route, json!({ "id": "asset1" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let req = test::TestRequest::get().uri("/getAll").to_request();
    let all: Vec<Asset> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 4);
}

#[actix_rt::test]
async fn bad_requests() {
    let host = seeded_host();
    let app = service!(gateway(Role::Farmer, &host), Role::Farmer);

    let req = test::TestRequest::get().uri("/getEntry").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Query parameter 'id' is missing");

    let req = test::TestRequest::post()
        .uri(&GatewayRoutes::NewEntry.route())
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"id\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = post_json(GatewayRoutes::FarmerUpdate, json!({ "price": "1" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/getPage?pageSize=zero")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn paging_through_the_ledger() {
    let host = seeded_host();
    let app = service!(gateway(Role::Wholesaler, &host), Role::Wholesaler);

    let req = test::TestRequest::get()
        .uri("/getPage?pageSize=3")
        .to_request();
    let first: PaginatedAssets = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first.metadata.fetched_records_count, 3);
    assert_eq!(first.metadata.bookmark, "asset4");

    let req = test::TestRequest::get()
        .uri(&format!("/getPage?pageSize=3&bookmark={}", first.metadata.bookmark))
        .to_request();
    let last: PaginatedAssets = test::call_and_read_body_json(&app, req).await;
    assert_eq!(last.records.len(), 1);
    assert_eq!(last.records[0].id, "asset4");
    assert!(last.metadata.bookmark.is_empty());

    let req = test::TestRequest::get().uri("/getPage").to_request();
    let all: PaginatedAssets = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.records.len(), 4);
}

#[::core::prelude::v1::test]
fn retailer_request_accepts_both_spellings() {
    let old: RetailerUpdateRequest =
        serde_json::from_value(json!({ "id": "a", "retailername": "Shop" })).unwrap();
    let new: RetailerUpdateRequest =
        serde_json::from_value(json!({ "id": "a", "retailerName": "Shop" })).unwrap();
    assert_eq!(old.retailer_name, "Shop");
    assert_eq!(new.retailer_name, "Shop");
}
