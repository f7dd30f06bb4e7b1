pub mod descriptor;
pub mod reconcile;
pub mod synchronizer;

pub use descriptor::{DependentLink, EntityDescriptor, RollupSpec};
pub use reconcile::{ReconciliationReport, Reconciler};
pub use synchronizer::EntitySynchronizer;
