//! `smartstock-engine`
//!
//! **Responsibility:** orchestration boundary around the allocation engine.
//!
//! - Maps named-column tables onto canonical inventory records.
//! - Hosts the forecasting seam (the model itself is an external collaborator).
//! - Runs the snapshot → allocation → simulation → availability pipeline as a job
//!   and returns a report; it never mutates its input.

pub mod config;
pub mod error;
pub mod forecast;
pub mod job;
pub mod rebalance;
pub mod report;
pub mod table;

pub use config::RebalanceConfig;
pub use error::EngineError;
pub use forecast::{CachedForecaster, DemandForecaster, StockLevel, attach_forecasts};
pub use job::Job;
pub use rebalance::{PlanEvaluationJob, RebalanceJob};
pub use report::RebalanceReport;
pub use table::{ColumnMapping, parse_rows, parse_transfer_rows, transfer_rows};
