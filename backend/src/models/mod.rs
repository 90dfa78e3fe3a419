//! Domain models for the intersection

pub mod direction;
pub mod event;
pub mod phase;
pub mod queue;
pub mod signal;
pub mod vehicle;

// Re-exports
pub use direction::{
    ConflictGroup, Direction, MovementId, MovementKind, MovementSet, UnknownName,
};
pub use event::{Event, EventLog, NoTrace, TraceSink};
pub use phase::Phase;
pub use queue::{MovementQueue, MovementQueues};
pub use signal::{Signal, SignalState};
pub use vehicle::{Vehicle, VehicleClass};
