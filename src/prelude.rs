//! Recommended API entrypoints grouped by abstraction level.
//!
//! `api` is the stable default for application code driving entity
//! lifecycles. `backend` is the seam for wiring real store adapters.

pub mod api {
    //! Stable high-level surface: engine, synchronizer, descriptors,
    //! filters, and the pure geo/stats helpers.
    pub use crate::{
        CoreRecord, EntityDescriptor, EntitySynchronizer, FieldPatch, FilterCriteria, GeoPoint,
        HydratedRecord, NewRecord, Op, ProximityHit, Result, SyncConfig, SyncEngine, SyncError,
        Value, entities, summarize,
    };
}

pub mod backend {
    //! Adapter seam: implement these traits to plug in real stores; the
    //! in-memory pair is the reference behavior.
    pub use crate::{
        CoreRepository, DetailDocument, DetailRef, DetailStore, InMemoryCoreRepository,
        InMemoryDetailStore, Reconciler,
    };
}
