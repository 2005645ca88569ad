#![allow(missing_docs)]

mod genesis;
mod impls;

#[cfg(test)]
mod tests;

pub use genesis::{sample_assets, DefaultGenesisAssets};

use std::marker::PhantomData;
use tp_core::{
    context::Context,
    macros::Get,
    module::AppModuleBasic,
    transaction::{ActionResult, Executable},
    world_state::WorldState,
};
use tp_types::{
    actions::asset::{self as names, Action},
    transaction::Invocation,
    Asset, ContractError,
};

pub const MODULE_NAME: &str = "asset";

pub trait Config {
    /// Records written by `InitLedger`.
    type GenesisAssets: Get<Vec<Asset>>;
}

impl Config for () {
    type GenesisAssets = DefaultGenesisAssets;
}

pub struct App<C> {
    phantom: PhantomData<C>,
}

impl<C: Config> Default for App<C> {
    fn default() -> Self {
        App {
            phantom: Default::default(),
        }
    }
}

impl<C: Config> AppModuleBasic for App<C> {
    fn name() -> String {
        MODULE_NAME.into()
    }

    fn functions() -> Vec<&'static str> {
        vec![
            names::INIT_LEDGER,
            names::CREATE_ASSET,
            names::READ_ASSET,
            names::UPDATE_ASSET,
            names::ASSET_EXISTS,
            names::GET_ALL_ASSETS,
            names::GET_ASSETS_BY_RANGE,
            names::GET_ASSETS_WITH_PAGINATION,
        ]
    }
}

impl<C: Config> Executable for App<C> {
    type Call = Action;

    fn execute<S: WorldState>(
        call: Self::Call,
        ctx: &mut Context<S>,
    ) -> Result<ActionResult, ContractError> {
        match call {
            Action::InitLedger => {
                Self::init_ledger(ctx).map(|()| ActionResult::null())
            }
            Action::CreateAsset(asset) => {
                Self::create_asset(ctx, asset).map(|()| ActionResult::null())
            }
            Action::ReadAsset(id) => {
                Self::read_asset(ctx, &id).and_then(|a| ActionResult::json(&a))
            }
            Action::UpdateAsset(asset) => {
                Self::update_asset(ctx, asset).map(|()| ActionResult::null())
            }
            Action::AssetExists(id) => {
                Self::asset_exists(ctx, &id).and_then(|b| ActionResult::json(&b))
            }
            Action::GetAllAssets => {
                Self::get_all_assets(ctx).and_then(|v| ActionResult::json(&v))
            }
            Action::GetAssetsByRange { start, end } => {
                Self::get_assets_by_range(ctx, &start, &end)
                    .and_then(|v| ActionResult::json(&v))
            }
            Action::GetAssetsWithPagination {
                page_size,
                bookmark,
            } => Self::get_assets_with_pagination(ctx, page_size, &bookmark)
                .and_then(|p| ActionResult::json(&p)),
        }
    }
}

impl<C: Config> App<C> {
    pub fn answers(&self, function: &str) -> bool {
        Self::functions().contains(&function)
    }

    /// Resolves a by-name invocation and runs it.
    pub fn invoke<S: WorldState>(
        inv: &Invocation,
        ctx: &mut Context<S>,
    ) -> Result<ActionResult, ContractError> {
        let action = Action::from_invocation(inv)?;
        log::debug!(target: MODULE_NAME, "{} tx {}", action.function(), ctx.tx_id());
        Self::execute(action, ctx)
    }
}
