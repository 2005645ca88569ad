use crate::asset::Asset;
use serde::{Deserialize, Serialize};

/// A call of a named contract function with positional string arguments,
/// as it travels from a gateway to the ledger host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<S: Into<String>>(function: S, args: Vec<String>) -> Self {
        Invocation {
            function: function.into(),
            args,
        }
    }
}

/// Metadata returned next to one page of a paginated range scan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponseMetadata {
    pub fetched_records_count: u32,
    /// Key of the first record of the next page, empty once the range is exhausted.
    pub bookmark: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedAssets {
    pub records: Vec<Asset>,
    #[serde(flatten)]
    pub metadata: QueryResponseMetadata,
}
