use crate::BaseApp;
use log::{debug, info, warn};
use tp_core::context::{Context, RunTxMode};
use tp_storage::{LedgerDB, ReadWriteSet, State};
use tp_types::{actions::asset::INIT_LEDGER, transaction::Invocation, ContractError};

/// Result of running an invocation against a snapshot of the world state.
#[derive(Clone, Debug)]
pub struct SimulatedTx {
    pub tx_id: String,
    pub function: String,
    pub creator: String,
    /// JSON payload returned by the contract
    pub payload: Vec<u8>,
    pub rwset: ReadWriteSet,
}

fn store_err(e: impl std::fmt::Display) -> ContractError {
    ContractError::Store(e.to_string())
}

impl<D: LedgerDB> BaseApp<D> {
    /// Executes `inv` against the committed state without changing it.
    pub fn simulate(
        &self,
        creator: &str,
        inv: &Invocation,
        mode: RunTxMode,
    ) -> Result<SimulatedTx, ContractError> {
        let tx_id = self.next_tx_id(creator, inv);
        let state = State::new(self.chain_state.clone());
        let mut ctx = Context::new(state, mode, tx_id.clone(), creator.to_owned());

        match self.modules.process_invocation(inv, &mut ctx) {
            Ok(result) => Ok(SimulatedTx {
                tx_id,
                function: inv.function.clone(),
                creator: creator.to_owned(),
                payload: result.data,
                rwset: ctx.into_stub().into_rwset(),
            }),
            Err(e) => {
                debug!(target: "baseapp", "tx {} {} failed: {}", tx_id, inv.function, e);
                Err(e)
            }
        }
    }

    /// Validates the read set of `tx` and applies its writes at the next height.
    pub fn commit(&self, tx: SimulatedTx) -> Result<u64, ContractError> {
        let mut cs = self.chain_state.write();

        let code = cs.validate(&tx.rwset).map_err(store_err)?;
        if !code.is_valid() {
            warn!(target: "baseapp", "tx {} {} rejected: {:?}", tx.tx_id, tx.function, code);
            return Err(ContractError::Conflict(format!(
                "transaction {} failed validation: {:?}",
                tx.tx_id, code
            )));
        }

        if tx.rwset.is_read_only() {
            return cs.height().map_err(store_err);
        }

        let height = cs.height().map_err(store_err)? + 1;
        cs.commit(tx.rwset.writes, height, self.flush)
            .map_err(store_err)?;
        info!(
            target: "baseapp",
            "tx {} {} from {} committed at height {}",
            tx.tx_id, tx.function, tx.creator, height
        );
        Ok(height)
    }

    /// Simulate and commit; returns the contract payload.
    pub fn submit(
        &self,
        creator: &str,
        inv: &Invocation,
    ) -> Result<Vec<u8>, ContractError> {
        let mut tx = self.simulate(creator, inv, RunTxMode::Submit)?;
        let payload = std::mem::take(&mut tx.payload);
        self.commit(tx)?;
        Ok(payload)
    }

    /// Simulate only; writes are discarded.
    pub fn evaluate(
        &self,
        creator: &str,
        inv: &Invocation,
    ) -> Result<Vec<u8>, ContractError> {
        self.simulate(creator, inv, RunTxMode::Evaluate)
            .map(|tx| tx.payload)
    }

    pub fn init_ledger(&self, creator: &str) -> Result<(), ContractError> {
        self.submit(creator, &Invocation::new(INIT_LEDGER, vec![]))
            .map(|_| ())
    }
}
