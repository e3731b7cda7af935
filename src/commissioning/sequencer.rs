//! Commissioning sequencer.
//!
//! Runs a device family's plan against a freshly joined device: every bind,
//! then every reporting rule, strictly in plan order and one call at a time.
//! Individual failures are recorded and never stop the run; the sequencer does
//! not retry.

use super::plan::CommissioningPlan;
use super::transport::{CommissioningTransport, TransportCall};
use crate::error::CommissioningWarning;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissioningState {
    #[default]
    Idle,
    Binding,
    ConfiguringReports,
    Complete,
}

/// Outcome of one commissioning run.
#[derive(Debug, Clone, Serialize)]
pub struct CommissioningReport {
    pub run_id: Uuid,
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub successes: Vec<TransportCall>,
    pub failures: Vec<CommissioningWarning>,
}

impl CommissioningReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.successes.len() + self.failures.len()
    }
}

/// Per-device sequencer. Holds only the state of the current run; the plan is
/// shared and immutable.
pub struct Sequencer<'a> {
    model: &'a str,
    plan: &'a CommissioningPlan,
    state: CommissioningState,
}

impl<'a> Sequencer<'a> {
    pub fn new(model: &'a str, plan: &'a CommissioningPlan) -> Self {
        Self {
            model,
            plan,
            state: CommissioningState::Idle,
        }
    }

    pub fn state(&self) -> CommissioningState {
        self.state
    }

    fn transition(&mut self, next: CommissioningState, run_id: &Uuid) {
        info!(
            "[Commission] {} run {}: {:?} -> {:?}",
            self.model, run_id, self.state, next
        );
        self.state = next;
    }

    /// Handle a join or rejoin signal: run the whole plan against `transport`.
    pub async fn on_join<T>(&mut self, transport: &T) -> CommissioningReport
    where
        T: CommissioningTransport + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let mut report = CommissioningReport {
            run_id,
            model: self.model.to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            successes: Vec::new(),
            failures: Vec::new(),
        };

        self.transition(CommissioningState::Binding, &run_id);
        for cluster in self.plan.bind_targets() {
            match transport.bind(cluster).await {
                Ok(()) => report.successes.push(TransportCall::Bind { cluster }),
                Err(source) => {
                    let failure = CommissioningWarning::BindFailure { cluster, source };
                    warn!("[Commission] {}: {}", self.model, failure);
                    report.failures.push(failure);
                }
            }
        }

        self.transition(CommissioningState::ConfiguringReports, &run_id);
        for rule in self.plan.reporting_rules() {
            let cluster = rule.cluster;
            let attribute = rule.attribute;
            match transport.configure_reporting(cluster, rule).await {
                Ok(()) => report
                    .successes
                    .push(TransportCall::ConfigureReporting { cluster, attribute }),
                Err(source) => {
                    let failure = CommissioningWarning::ConfigureFailure {
                        cluster,
                        attribute,
                        source,
                    };
                    warn!("[Commission] {}: {}", self.model, failure);
                    report.failures.push(failure);
                }
            }
        }

        self.transition(CommissioningState::Complete, &run_id);
        report.finished_at = Utc::now();
        info!(
            "[Commission] {} run {} complete: {} succeeded, {} failed",
            self.model,
            run_id,
            report.successes.len(),
            report.failures.len()
        );
        report
    }
}

/// Run `plan` once against `transport` with a fresh sequencer.
pub async fn run_commissioning<T>(
    model: &str,
    plan: &CommissioningPlan,
    transport: &T,
) -> CommissioningReport
where
    T: CommissioningTransport + ?Sized,
{
    Sequencer::new(model, plan).on_join(transport).await
}
