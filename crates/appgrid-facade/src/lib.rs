//! appgrid-facade: application lifecycle orchestration.
//!
//! The [`Facade`] keeps applications, their cron records, node placement,
//! the application → node index and generated configurations consistent
//! across create, update and delete. It is generic over the transaction
//! handle of its collaborators (see [`appgrid_core::ports`]) and never
//! touches storage directly.
//!
//! ```ignore
//! let store = Arc::new(StateStore::open("appgrid.redb")?);
//! let facade = Facade::new(Stores::from_shared(store));
//! let app = facade.create_app("default", None, app, &configs)?;
//! ```

pub mod diagnostics;
pub mod error;
pub mod facade;
pub mod reconcile;
pub mod tx;

pub use diagnostics::{DirtyData, DirtyDataSink, MemorySink};
pub use error::{FacadeError, FacadeResult};
pub use facade::{Facade, Stores};
pub use reconcile::orphaned_generated_configs;
pub use tx::TxGuard;
