use crate::BaseApp;
use tp_core::{
    context::Context, module::AppModuleBasic, transaction::ActionResult,
    world_state::WorldState,
};
use tp_storage::LedgerDB;
use tp_types::{transaction::Invocation, ContractError};

pub struct ModuleManager<D: LedgerDB> {
    // Ordered module list
    pub(crate) asset_module: module_asset::App<BaseApp<D>>,
}

impl<D: LedgerDB> Default for ModuleManager<D> {
    fn default() -> Self {
        ModuleManager {
            asset_module: Default::default(),
        }
    }
}

impl<D: LedgerDB> ModuleManager<D> {
    /// Name of the module that answers to `function`.
    pub fn module_of(&self, function: &str) -> Option<String> {
        // Note: adding new modules needs to be updated.
        if self.asset_module.answers(function) {
            Some(module_asset::App::<BaseApp<D>>::name())
        } else {
            None
        }
    }

    pub fn process_invocation<S: WorldState>(
        &self,
        inv: &Invocation,
        ctx: &mut Context<S>,
    ) -> Result<ActionResult, ContractError> {
        match self.module_of(&inv.function).as_deref() {
            Some(module_asset::MODULE_NAME) => {
                module_asset::App::<BaseApp<D>>::invoke(inv, ctx)
            }
            _ => Err(ContractError::UnknownFunction(format!(
                "function {} not found in contract",
                inv.function
            ))),
        }
    }
}
