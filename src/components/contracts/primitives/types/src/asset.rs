use crate::errors::ContractError;
use serde::{Deserialize, Serialize};

/// Number of string arguments carried by `CreateAsset` and `UpdateAsset`,
/// one per field in declaration order.
pub const ASSET_FIELD_COUNT: usize = 16;

/// A produce batch tracked from the farm through the wholesaler to the retailer.
///
/// Every field is an opaque string. Fields belonging to a stage that has not
/// transacted yet are empty, and fields missing from stored JSON decode as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Asset {
    #[serde(rename = "ID")]
    pub id: String,

    // farmer stage
    pub farmer_id: String,
    pub farmer_name: String,
    pub farm_location: String,
    pub variety: String,
    pub batch_no: String,
    pub harvest_date: String,
    pub price: String,
    pub quantity: String,

    // wholesaler stage
    pub wholesaler_id: String,
    pub wholesaler_name: String,
    pub wholesaler_price: String,
    pub wholesaler_buy_date: String,

    // retailer stage
    pub retailer_id: String,
    pub retailer_name: String,
    pub retailer_buy_date: String,
}

impl Asset {
    /// Build an asset from positional invocation arguments.
    pub fn from_args(args: &[String]) -> Result<Self, ContractError> {
        if args.len() != ASSET_FIELD_COUNT {
            return Err(ContractError::InvalidArgument(format!(
                "incorrect number of arguments, expecting {}, got {}",
                ASSET_FIELD_COUNT,
                args.len()
            )));
        }
        let mut it = args.iter().cloned();
        let mut next = || it.next().unwrap_or_default();

        Ok(Asset {
            id: next(),
            farmer_id: next(),
            farmer_name: next(),
            farm_location: next(),
            variety: next(),
            batch_no: next(),
            harvest_date: next(),
            price: next(),
            quantity: next(),
            wholesaler_id: next(),
            wholesaler_name: next(),
            wholesaler_price: next(),
            wholesaler_buy_date: next(),
            retailer_id: next(),
            retailer_name: next(),
            retailer_buy_date: next(),
        })
    }

    /// Positional arguments in the order `from_args` expects them.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.farmer_id.clone(),
            self.farmer_name.clone(),
            self.farm_location.clone(),
            self.variety.clone(),
            self.batch_no.clone(),
            self.harvest_date.clone(),
            self.price.clone(),
            self.quantity.clone(),
            self.wholesaler_id.clone(),
            self.wholesaler_name.clone(),
            self.wholesaler_price.clone(),
            self.wholesaler_buy_date.clone(),
            self.retailer_id.clone(),
            self.retailer_name.clone(),
            self.retailer_buy_date.clone(),
        ]
    }
}
