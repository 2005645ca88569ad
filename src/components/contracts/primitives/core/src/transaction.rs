use crate::{context::Context, world_state::WorldState};
use serde::{Deserialize, Serialize};
use tp_types::ContractError;

/// A action (module function and argument values) that can be executed.
pub trait Executable {
    /// The call to execute
    type Call;

    /// Actually execute this action and return the result of it.
    fn execute<S: WorldState>(
        call: Self::Call,
        ctx: &mut Context<S>,
    ) -> Result<ActionResult, ContractError>;
}

/// The payload a contract function hands back to its caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// JSON-encoded return value
    pub data: Vec<u8>,
}

impl ActionResult {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ContractError> {
        serde_json::to_vec(value)
            .map(|data| ActionResult { data })
            .map_err(|e| ContractError::Encode(e.to_string()))
    }

    /// The reply of a function with no return value.
    pub fn null() -> Self {
        ActionResult {
            data: b"null".to_vec(),
        }
    }
}
