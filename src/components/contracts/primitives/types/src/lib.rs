#![allow(missing_docs)]

pub mod actions;
pub mod asset;
pub mod errors;
pub mod transaction;

pub use asset::Asset;
pub use errors::ContractError;
