use tp_core::parameter_types;
use tp_types::Asset;

parameter_types! {
    pub DefaultGenesisAssets: Vec<Asset> = sample_assets();
}

/// The four batches every fresh ledger starts with. Only the farmer stage is filled in.
pub fn sample_assets() -> Vec<Asset> {
    (1..=4u32)
        .map(|i| Asset {
            id: format!("asset{}", i),
            farmer_id: format!("F00{}", i),
            farm_location: format!("Location{}", i),
            variety: format!("Variety{}", i),
            batch_no: format!("B00{}", i),
            harvest_date: format!("2023-0{}-01", i),
            price: (900 + 100 * i).to_string(),
            quantity: (50 + 50 * i).to_string(),
            ..Default::default()
        })
        .collect()
}
