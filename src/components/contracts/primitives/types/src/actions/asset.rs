use crate::{
    asset::Asset, errors::ContractError, transaction::Invocation,
};
use serde::{Deserialize, Serialize};

pub const INIT_LEDGER: &str = "InitLedger";
pub const CREATE_ASSET: &str = "CreateAsset";
pub const READ_ASSET: &str = "ReadAsset";
pub const UPDATE_ASSET: &str = "UpdateAsset";
pub const ASSET_EXISTS: &str = "AssetExists";
pub const GET_ALL_ASSETS: &str = "GetAllAssets";
pub const GET_ASSETS_BY_RANGE: &str = "GetAssetsByRange";
pub const GET_ASSETS_WITH_PAGINATION: &str = "GetAssetsWithPagination";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    InitLedger,
    CreateAsset(Asset),
    ReadAsset(String),
    UpdateAsset(Asset),
    AssetExists(String),
    GetAllAssets,
    GetAssetsByRange { start: String, end: String },
    GetAssetsWithPagination { page_size: u32, bookmark: String },
}

impl Action {
    /// Resolve a by-name invocation into a typed action.
    pub fn from_invocation(inv: &Invocation) -> Result<Self, ContractError> {
        let args = inv.args.as_slice();
        match inv.function.as_str() {
            INIT_LEDGER => expect_args(inv, 0).map(|_| Action::InitLedger),
            CREATE_ASSET => Asset::from_args(args).map(Action::CreateAsset),
            READ_ASSET => expect_args(inv, 1).map(|_| Action::ReadAsset(args[0].clone())),
            UPDATE_ASSET => Asset::from_args(args).map(Action::UpdateAsset),
            ASSET_EXISTS => {
                expect_args(inv, 1).map(|_| Action::AssetExists(args[0].clone()))
            }
            GET_ALL_ASSETS => expect_args(inv, 0).map(|_| Action::GetAllAssets),
            GET_ASSETS_BY_RANGE => {
                expect_args(inv, 2).map(|_| Action::GetAssetsByRange {
                    start: args[0].clone(),
                    end: args[1].clone(),
                })
            }
            GET_ASSETS_WITH_PAGINATION => {
                expect_args(inv, 2)?;
                let page_size = args[0]
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| {
                        ContractError::InvalidArgument(format!(
                            "page size must be a positive integer, got {:?}",
                            args[0]
                        ))
                    })?;
                Ok(Action::GetAssetsWithPagination {
                    page_size,
                    bookmark: args[1].clone(),
                })
            }
            other => Err(ContractError::UnknownFunction(format!(
                "function {} not found in contract",
                other
            ))),
        }
    }

    pub fn function(&self) -> &'static str {
        match self {
            Action::InitLedger => INIT_LEDGER,
            Action::CreateAsset(_) => CREATE_ASSET,
            Action::ReadAsset(_) => READ_ASSET,
            Action::UpdateAsset(_) => UPDATE_ASSET,
            Action::AssetExists(_) => ASSET_EXISTS,
            Action::GetAllAssets => GET_ALL_ASSETS,
            Action::GetAssetsByRange { .. } => GET_ASSETS_BY_RANGE,
            Action::GetAssetsWithPagination { .. } => GET_ASSETS_WITH_PAGINATION,
        }
    }

    pub fn into_invocation(self) -> Invocation {
        let function = self.function();
        let args = match self {
            Action::InitLedger | Action::GetAllAssets => vec![],
            Action::CreateAsset(asset) | Action::UpdateAsset(asset) => asset.to_args(),
            Action::ReadAsset(id) | Action::AssetExists(id) => vec![id],
            Action::GetAssetsByRange { start, end } => vec![start, end],
            Action::GetAssetsWithPagination {
                page_size,
                bookmark,
            } => vec![page_size.to_string(), bookmark],
        };
        Invocation::new(function, args)
    }
}

fn expect_args(inv: &Invocation, n: usize) -> Result<(), ContractError> {
    if inv.args.len() == n {
        Ok(())
    } else {
        Err(ContractError::InvalidArgument(format!(
            "{}: incorrect number of arguments, expecting {}, got {}",
            inv.function,
            n,
            inv.args.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_named_functions() {
        let inv = Invocation::new(READ_ASSET, vec!["asset1".into()]);
        assert_eq!(
            Action::from_invocation(&inv).unwrap(),
            Action::ReadAsset("asset1".into())
        );

        let action = Action::GetAssetsWithPagination {
            page_size: 2,
            bookmark: "asset3".into(),
        };
        let inv = action.clone().into_invocation();
        assert_eq!(inv.args, vec!["2".to_string(), "asset3".to_string()]);
        assert_eq!(Action::from_invocation(&inv).unwrap(), action);
    }

    #[test]
    fn rejects_bad_invocations() {
        let inv = Invocation::new("DeleteAsset", vec!["asset1".into()]);
        assert!(matches!(
            Action::from_invocation(&inv),
            Err(ContractError::UnknownFunction(_))
        ));

        let inv = Invocation::new(READ_ASSET, vec![]);
        assert!(matches!(
            Action::from_invocation(&inv),
            Err(ContractError::InvalidArgument(_))
        ));

        let inv = Invocation::new(GET_ASSETS_WITH_PAGINATION, vec!["0".into(), "".into()]);
        assert!(matches!(
            Action::from_invocation(&inv),
            Err(ContractError::InvalidArgument(_))
        ));
    }
}
