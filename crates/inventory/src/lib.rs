//! Inventory rebalancing domain module.
//!
//! This crate contains the transfer allocation engine, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage):
//! snapshot → gaps → allocation → simulation → availability.

pub mod allocator;
pub mod availability;
pub mod gap;
pub mod simulator;
pub mod snapshot;
pub mod transfer;

pub use allocator::allocate;
pub use availability::{AvailabilityDelta, availability};
pub use gap::{GapClass, Threshold, gaps};
pub use simulator::{Simulation, TransferSide, UnmatchedPolicy, UnmatchedTransfer, simulate};
pub use snapshot::{InventoryRecord, PeriodSelection, PeriodicInventory, Snapshot};
pub use transfer::{TransferFilter, TransferRecord};
