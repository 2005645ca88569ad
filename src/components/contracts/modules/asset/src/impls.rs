use crate::{App, Config, MODULE_NAME};
use tp_core::{context::Context, ensure, macros::Get, world_state::WorldState};
use tp_storage::StateIterator;
use tp_types::{transaction::PaginatedAssets, Asset, ContractError};

impl<C: Config> App<C> {
    /// Seeds the genesis assets, overwriting whatever is stored under their ids.
    pub fn init_ledger<S: WorldState>(ctx: &mut Context<S>) -> Result<(), ContractError> {
        for asset in C::GenesisAssets::get() {
            Self::put_asset(ctx, &asset)?;
        }
        Ok(())
    }

    pub fn create_asset<S: WorldState>(
        ctx: &mut Context<S>,
        asset: Asset,
    ) -> Result<(), ContractError> {
        ensure!(
            !Self::asset_exists(ctx, &asset.id)?,
            ContractError::already_exists(&asset.id)
        );
        Self::put_asset(ctx, &asset)?;
        log::info!(target: MODULE_NAME, "asset {} created by {}", asset.id, ctx.creator());
        Ok(())
    }

    pub fn read_asset<S: WorldState>(
        ctx: &mut Context<S>,
        id: &str,
    ) -> Result<Asset, ContractError> {
        let raw = Self::fetch(ctx, id)?.ok_or_else(|| ContractError::not_found(id))?;
        serde_json::from_slice(&raw).map_err(|e| {
            ContractError::Decode(format!("failed to decode asset {}: {}", id, e))
        })
    }

    /// Replaces the stored record with exactly the supplied fields.
    pub fn update_asset<S: WorldState>(
        ctx: &mut Context<S>,
        asset: Asset,
    ) -> Result<(), ContractError> {
        ensure!(
            Self::asset_exists(ctx, &asset.id)?,
            ContractError::not_found(&asset.id)
        );
        Self::put_asset(ctx, &asset)?;
        log::info!(target: MODULE_NAME, "asset {} updated by {}", asset.id, ctx.creator());
        Ok(())
    }

    pub fn asset_exists<S: WorldState>(
        ctx: &mut Context<S>,
        id: &str,
    ) -> Result<bool, ContractError> {
        Self::fetch(ctx, id).map(|v| v.is_some())
    }

    pub fn get_all_assets<S: WorldState>(
        ctx: &mut Context<S>,
    ) -> Result<Vec<Asset>, ContractError> {
        Self::get_assets_by_range(ctx, "", "")
    }

    /// Assets with ids in `[start, end)`; empty bounds are open.
    pub fn get_assets_by_range<S: WorldState>(
        ctx: &mut Context<S>,
        start: &str,
        end: &str,
    ) -> Result<Vec<Asset>, ContractError> {
        let mut iter = ctx.stub.get_state_by_range(start, end).map_err(|e| {
            ContractError::Scan(format!("failed to start range scan: {}", e))
        })?;
        collect_assets(&mut iter)
    }

    pub fn get_assets_with_pagination<S: WorldState>(
        ctx: &mut Context<S>,
        page_size: u32,
        bookmark: &str,
    ) -> Result<PaginatedAssets, ContractError> {
        ensure!(
            page_size > 0,
            ContractError::InvalidArgument("page size must be a positive integer".into())
        );
        let (mut iter, metadata) = ctx
            .stub
            .get_state_by_range_with_pagination("", "", page_size, bookmark)
            .map_err(|e| {
                ContractError::Scan(format!("failed to start range scan: {}", e))
            })?;
        let records = collect_assets(&mut iter)?;
        Ok(PaginatedAssets { records, metadata })
    }

    fn fetch<S: WorldState>(
        ctx: &mut Context<S>,
        id: &str,
    ) -> Result<Option<Vec<u8>>, ContractError> {
        ctx.stub.get_state(id).map_err(|e| {
            ContractError::Store(format!(
                "failed to read asset {} from world state: {}",
                id, e
            ))
        })
    }

    fn put_asset<S: WorldState>(
        ctx: &mut Context<S>,
        asset: &Asset,
    ) -> Result<(), ContractError> {
        let bytes = serde_json::to_vec(asset).map_err(|e| {
            ContractError::Encode(format!("failed to encode asset {}: {}", asset.id, e))
        })?;
        ctx.stub.put_state(&asset.id, bytes).map_err(|e| {
            ContractError::Store(format!("failed to put asset {}: {}", asset.id, e))
        })
    }
}

/// Decodes every entry of a scan, closing the iterator whatever happens.
pub(crate) fn collect_assets(
    iter: &mut StateIterator,
) -> Result<Vec<Asset>, ContractError> {
    let res = decode_all(iter);
    iter.close();
    res
}

fn decode_all(iter: &mut StateIterator) -> Result<Vec<Asset>, ContractError> {
    let mut assets = vec![];
    for kv in iter {
        let (key, value) = kv.map_err(|e| {
            ContractError::Scan(format!("failed to iterate world state: {}", e))
        })?;
        let asset = serde_json::from_slice::<Asset>(&value).map_err(|e| {
            ContractError::Decode(format!("failed to decode asset {}: {}", key, e))
        })?;
        assets.push(asset);
    }
    Ok(assets)
}
