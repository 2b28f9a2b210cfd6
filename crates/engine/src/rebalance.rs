use chrono::Utc;
use tracing::{info, warn};

use smartstock_core::PlanId;
use smartstock_inventory::{
    AvailabilityDelta, PeriodicInventory, Snapshot, TransferRecord, allocate, simulate,
};

use crate::config::RebalanceConfig;
use crate::error::EngineError;
use crate::job::Job;
use crate::report::RebalanceReport;

/// Deterministic rebalancing job: allocate transfers for one period, simulate
/// them, and report availability before and after.
#[derive(Debug, Clone)]
pub struct RebalanceJob {
    plan_id: PlanId,
    input: PeriodicInventory,
    config: RebalanceConfig,
}

impl RebalanceJob {
    pub fn new(input: PeriodicInventory) -> Self {
        Self {
            plan_id: PlanId::new(),
            input,
            config: RebalanceConfig::default(),
        }
    }

    /// Single-period convenience constructor.
    pub fn for_snapshot(snapshot: Snapshot) -> Self {
        Self::new(snapshot.into_records().into_iter().map(|r| (0, r)).collect())
    }

    pub fn with_config(mut self, config: RebalanceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_plan_id(mut self, plan_id: PlanId) -> Self {
        self.plan_id = plan_id;
        self
    }
}

impl Job for RebalanceJob {
    type Input = PeriodicInventory;
    type Output = RebalanceReport;

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn run(&self) -> Result<RebalanceReport, EngineError> {
        let (period, snapshot) = self.input.select(self.config.period)?;
        let transfers = allocate(&snapshot, self.config.threshold);
        evaluate(self.plan_id, period, &snapshot, transfers, &self.config)
    }
}

/// Evaluate an externally supplied transfer list against one period.
///
/// Same simulation and availability steps as [`RebalanceJob`], without
/// allocation. Useful for reviewing a previously exported plan.
#[derive(Debug, Clone)]
pub struct PlanEvaluationJob {
    plan_id: PlanId,
    input: PeriodicInventory,
    transfers: Vec<TransferRecord>,
    config: RebalanceConfig,
}

impl PlanEvaluationJob {
    pub fn new(input: PeriodicInventory, transfers: Vec<TransferRecord>) -> Self {
        Self {
            plan_id: PlanId::new(),
            input,
            transfers,
            config: RebalanceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RebalanceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_plan_id(mut self, plan_id: PlanId) -> Self {
        self.plan_id = plan_id;
        self
    }
}

impl Job for PlanEvaluationJob {
    type Input = PeriodicInventory;
    type Output = RebalanceReport;

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn run(&self) -> Result<RebalanceReport, EngineError> {
        let (period, snapshot) = self.input.select(self.config.period)?;
        evaluate(
            self.plan_id,
            period,
            &snapshot,
            self.transfers.clone(),
            &self.config,
        )
    }
}

fn evaluate(
    plan_id: PlanId,
    period: i64,
    snapshot: &Snapshot,
    transfers: Vec<TransferRecord>,
    config: &RebalanceConfig,
) -> Result<RebalanceReport, EngineError> {
    let simulation = simulate(snapshot, &transfers, config.unmatched_policy)?;
    let availability = AvailabilityDelta::compare(snapshot, &simulation.snapshot)?;

    if !simulation.unmatched.is_empty() {
        warn!(
            plan = %plan_id,
            unmatched = simulation.unmatched.len(),
            "plan references stores/products missing from the snapshot"
        );
    }

    info!(
        plan = %plan_id,
        period,
        rows = snapshot.len(),
        transfers = transfers.len(),
        before = availability.before,
        after = availability.after,
        "rebalance evaluated"
    );

    Ok(RebalanceReport {
        plan_id,
        generated_at: Utc::now(),
        period,
        threshold: config.threshold,
        transfers,
        availability_before: availability.before,
        availability_after: availability.after,
        unmatched: simulation.unmatched,
        stores: snapshot.stores(),
        products: snapshot.products(),
    })
}
