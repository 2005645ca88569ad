#![allow(missing_docs)]

pub mod context;
pub mod macros;
pub mod module;
pub mod transaction;
pub mod world_state;
