//! Scoped transaction guard.
//!
//! A [`TxGuard`] owns a transaction handle from `begin` until either
//! [`TxGuard::commit`] consumes it or the guard is dropped. Dropping an
//! uncommitted guard rolls the transaction back, which covers early
//! `?` returns and unwinding panics alike; the panic keeps propagating.

use appgrid_core::StoreResult;
use appgrid_core::ports::TransactionManager;
use tracing::{debug, warn};

pub struct TxGuard<'a, Tx> {
    manager: &'a dyn TransactionManager<Tx>,
    tx: Option<Tx>,
}

impl<'a, Tx> TxGuard<'a, Tx> {
    pub fn begin(manager: &'a dyn TransactionManager<Tx>) -> StoreResult<Self> {
        let tx = manager.begin_tx()?;
        Ok(Self {
            manager,
            tx: Some(tx),
        })
    }

    /// The open transaction handle.
    pub fn tx(&mut self) -> &mut Tx {
        // Only `commit` takes the handle, and it consumes the guard.
        self.tx.as_mut().expect("transaction is open until commit")
    }

    pub fn commit(mut self) -> StoreResult<()> {
        match self.tx.take() {
            Some(tx) => self.manager.commit(tx),
            None => Ok(()),
        }
    }
}

impl<Tx> Drop for TxGuard<'_, Tx> {
    fn drop(&mut self) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        if std::thread::panicking() {
            warn!("rolling back transaction after panic");
        }
        match self.manager.rollback(tx) {
            Ok(()) => debug!("transaction rolled back"),
            Err(e) => warn!(error = %e, "transaction rollback failed"),
        }
    }
}
