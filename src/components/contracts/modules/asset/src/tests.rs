use crate::*;
use tp_core::{context::Context, module::AppModuleBasic};
use tp_mocks::{farmer_asset, mock_context, MockStub};
use tp_types::{
    transaction::{Invocation, PaginatedAssets},
    Asset, ContractError,
};

type AssetApp = App<()>;

fn stub_ctx() -> Context<MockStub> {
    mock_context(MockStub::new())
}

fn seeded_ctx() -> Context<MockStub> {
    let mut ctx = stub_ctx();
    AssetApp::init_ledger(&mut ctx).unwrap();
    ctx
}

#[test]
fn init_ledger_seeds_four_assets() {
    let mut ctx = seeded_ctx();
    let all = AssetApp::get_all_assets(&mut ctx).unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(
        all.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
        vec!["asset1", "asset2", "asset3", "asset4"]
    );

    let a2 = AssetApp::read_asset(&mut ctx, "asset2").unwrap();
    assert_eq!(a2.farmer_id, "F002");
    assert_eq!(a2.farm_location, "Location2");
    assert_eq!(a2.harvest_date, "2023-02-01");
    assert_eq!(a2.price, "1100");
    assert_eq!(a2.quantity, "150");
    assert!(a2.wholesaler_id.is_empty());
    assert!(a2.retailer_buy_date.is_empty());
}

#[test]
fn init_ledger_overwrites_existing_seed() {
    let mut stub = MockStub::new();
    stub.insert_json(
        "asset1",
        &Asset {
            id: "asset1".into(),
            farmer_id: "OLD".into(),
            ..Default::default()
        },
    );
    let mut ctx = mock_context(stub);
    AssetApp::init_ledger(&mut ctx).unwrap();
    assert_eq!(
        AssetApp::read_asset(&mut ctx, "asset1").unwrap().farmer_id,
        "F001"
    );
}

#[test]
fn init_ledger_stops_at_first_failed_put() {
    let mut stub = MockStub::new();
    stub.fail_put
        .insert("asset3".into(), "disk full".into());
    let mut ctx = mock_context(stub);

    let err = AssetApp::init_ledger(&mut ctx).unwrap_err();
    assert!(matches!(err, ContractError::Store(_)));
    assert!(err.message().starts_with("failed to put asset asset3"));
    assert!(err.message().contains("disk full"));

    assert!(ctx.stub.state.contains_key("asset1"));
    assert!(ctx.stub.state.contains_key("asset2"));
    assert!(!ctx.stub.state.contains_key("asset3"));
    assert!(!ctx.stub.state.contains_key("asset4"));
}

#[test]
fn create_then_read() {
    let mut ctx = stub_ctx();
    let asset = farmer_asset("asset9");
    AssetApp::create_asset(&mut ctx, asset.clone()).unwrap();
    assert_eq!(AssetApp::read_asset(&mut ctx, "asset9").unwrap(), asset);
    assert!(AssetApp::asset_exists(&mut ctx, "asset9").unwrap());
}

#[test]
fn create_duplicate_fails() {
    let mut ctx = seeded_ctx();
    let before = ctx.stub.state.get("asset1").cloned();
    let err = AssetApp::create_asset(&mut ctx, farmer_asset("asset1")).unwrap_err();
    assert_eq!(err, ContractError::already_exists("asset1"));
    assert_eq!(err.to_string(), "the asset asset1 already exists");
    assert_eq!(ctx.stub.state.get("asset1").cloned(), before);
}

#[test]
fn read_missing_asset() {
    let mut ctx = seeded_ctx();
    let err = AssetApp::read_asset(&mut ctx, "asset99").unwrap_err();
    assert_eq!(err.to_string(), "the asset asset99 does not exist");
    assert!(!AssetApp::asset_exists(&mut ctx, "asset99").unwrap());
}

#[test]
fn read_store_failure() {
    let mut stub = MockStub::new();
    stub.fail_get = Some("peer unavailable".into());
    let mut ctx = mock_context(stub);
    let err = AssetApp::read_asset(&mut ctx, "asset1").unwrap_err();
    assert!(matches!(err, ContractError::Store(_)));
    assert!(err
        .message()
        .starts_with("failed to read asset asset1 from world state"));
    assert!(AssetApp::asset_exists(&mut ctx, "asset1").is_err());
}

#[test]
fn read_undecodable_asset() {
    let mut stub = MockStub::new();
    stub.insert_raw("asset1", b"not json");
    let mut ctx = mock_context(stub);
    assert!(matches!(
        AssetApp::read_asset(&mut ctx, "asset1"),
        Err(ContractError::Decode(_))
    ));
}

#[test]
fn update_replaces_whole_record() {
    let mut ctx = seeded_ctx();
    let update = Asset {
        id: "asset1".into(),
        wholesaler_id: "W001".into(),
        wholesaler_price: "1500".into(),
        ..Default::default()
    };
    AssetApp::update_asset(&mut ctx, update.clone()).unwrap();

    let stored = AssetApp::read_asset(&mut ctx, "asset1").unwrap();
    assert_eq!(stored, update);
    assert!(stored.farmer_id.is_empty());
}

#[test]
fn update_missing_asset_fails() {
    let mut ctx = stub_ctx();
    let err = AssetApp::update_asset(&mut ctx, farmer_asset("ghost")).unwrap_err();
    assert_eq!(err, ContractError::not_found("ghost"));
    assert!(ctx.stub.state.is_empty());
}

#[test]
fn get_all_on_empty_ledger() {
    let mut ctx = stub_ctx();
    let payload = AssetApp::invoke(&Invocation::new("GetAllAssets", vec![]), &mut ctx)
        .unwrap();
    assert_eq!(payload.data, b"[]".to_vec());
}

#[test]
fn get_all_fails_on_bad_record() {
    let mut ctx = seeded_ctx();
    ctx.stub.insert_raw("asset2", b"{broken");
    let err = AssetApp::get_all_assets(&mut ctx).unwrap_err();
    assert!(matches!(err, ContractError::Decode(_)));
    assert!(err.message().contains("asset2"));
}

#[test]
fn get_all_scan_failures() {
    let mut ctx = seeded_ctx();
    ctx.stub.fail_range = Some("range refused".into());
    assert!(matches!(
        AssetApp::get_all_assets(&mut ctx),
        Err(ContractError::Scan(_))
    ));

    ctx.stub.fail_range = None;
    ctx.stub.fail_iter_at = Some(1);
    assert!(matches!(
        AssetApp::get_all_assets(&mut ctx),
        Err(ContractError::Scan(_))
    ));
}

#[test]
fn scan_iterator_is_closed_on_every_exit() {
    use crate::impls::collect_assets;
    use tp_core::world_state::WorldState;

    let mut stub = MockStub::with_assets(&[farmer_asset("asset1"), farmer_asset("asset2")]);

    let mut iter = stub.get_state_by_range("", "").unwrap();
    assert_eq!(collect_assets(&mut iter).unwrap().len(), 2);
    assert!(iter.is_closed());

    stub.insert_raw("asset3", b"{broken");
    stub.insert_json("asset4", &farmer_asset("asset4"));
    let mut iter = stub.get_state_by_range("", "").unwrap();
    assert!(matches!(
        collect_assets(&mut iter),
        Err(ContractError::Decode(_))
    ));
    assert!(iter.is_closed());
    assert!(!iter.has_next());

    stub.state.remove("asset3");
    stub.fail_iter_at = Some(0);
    let mut iter = stub.get_state_by_range("", "").unwrap();
    assert!(matches!(
        collect_assets(&mut iter),
        Err(ContractError::Scan(_))
    ));
    assert!(iter.is_closed());
    assert!(iter.next().is_none());
}

#[test]
fn get_assets_by_range_bounds() {
    let mut ctx = seeded_ctx();
    let ids = AssetApp::get_assets_by_range(&mut ctx, "asset2", "asset4")
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["asset2", "asset3"]);
}

#[test]
fn pagination_covers_every_asset() {
    let mut ctx = seeded_ctx();
    AssetApp::create_asset(&mut ctx, farmer_asset("asset5")).unwrap();

    let first = AssetApp::get_assets_with_pagination(&mut ctx, 2, "").unwrap();
    assert_eq!(first.metadata.fetched_records_count, 2);
    assert_eq!(first.metadata.bookmark, "asset3");

    let second =
        AssetApp::get_assets_with_pagination(&mut ctx, 2, &first.metadata.bookmark)
            .unwrap();
    assert_eq!(second.records[0].id, "asset3");
    assert_eq!(second.metadata.bookmark, "asset5");

    let last =
        AssetApp::get_assets_with_pagination(&mut ctx, 2, &second.metadata.bookmark)
            .unwrap();
    assert_eq!(last.records.len(), 1);
    assert_eq!(last.metadata.bookmark, "");

    assert!(matches!(
        AssetApp::get_assets_with_pagination(&mut ctx, 0, ""),
        Err(ContractError::InvalidArgument(_))
    ));
}

#[test]
fn invoke_payloads() {
    let mut ctx = seeded_ctx();

    let res = AssetApp::invoke(
        &Invocation::new("AssetExists", vec!["asset4".into()]),
        &mut ctx,
    )
    .unwrap();
    assert_eq!(res.data, b"true".to_vec());

    let res = AssetApp::invoke(
        &Invocation::new("GetAssetsWithPagination", vec!["3".into(), "".into()]),
        &mut ctx,
    )
    .unwrap();
    let page: PaginatedAssets = serde_json::from_slice(&res.data).unwrap();
    assert_eq!(page.records.len(), 3);
    assert_eq!(page.metadata.bookmark, "asset4");

    let res = AssetApp::invoke(
        &Invocation::new("CreateAsset", farmer_asset("asset7").to_args()),
        &mut ctx,
    )
    .unwrap();
    assert_eq!(res.data, b"null".to_vec());

    assert!(matches!(
        AssetApp::invoke(&Invocation::new("CreateAsset", vec!["x".into()]), &mut ctx),
        Err(ContractError::InvalidArgument(_))
    ));
}

#[test]
fn module_basics() {
    assert_eq!(AssetApp::name(), MODULE_NAME);
    assert_eq!(AssetApp::functions().len(), 8);
    assert!(AssetApp::default().answers("GetAllAssets"));
    assert!(!AssetApp::default().answers("DeleteAsset"));
}
