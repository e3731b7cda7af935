//! Transport seam for commissioning calls.
//!
//! The host bridge owns the radio; it hands the sequencer a handle that can
//! bind a cluster to the coordinator and install a reporting rule. Retries and
//! timeouts live behind this trait.

use super::plan::ReportingRule;
use crate::error::TransportError;
use crate::zcl::{AttributeId, Cluster};
use async_trait::async_trait;
use log::info;
use parking_lot::Mutex;
use serde::Serialize;

#[async_trait]
pub trait CommissioningTransport: Send + Sync {
    /// Bind `cluster` on the device endpoint to the coordinator.
    async fn bind(&self, cluster: Cluster) -> Result<(), TransportError>;

    /// Install one attribute reporting rule on `cluster`.
    async fn configure_reporting(
        &self,
        cluster: Cluster,
        rule: &ReportingRule,
    ) -> Result<(), TransportError>;
}

/// One call issued against a transport.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum TransportCall {
    Bind {
        cluster: Cluster,
    },
    ConfigureReporting {
        cluster: Cluster,
        attribute: AttributeId,
    },
}

/// Transport that performs no I/O: it records every call in order and fails
/// the calls it was told to fail. Used for dry runs and tests.
pub struct RecordingTransport {
    endpoint: u8,
    coordinator_endpoint: u8,
    calls: Mutex<Vec<TransportCall>>,
    failing: Mutex<Vec<TransportCall>>,
}

impl RecordingTransport {
    pub fn new(endpoint: u8, coordinator_endpoint: u8) -> Self {
        Self {
            endpoint,
            coordinator_endpoint,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
        }
    }

    /// Make every future occurrence of `call` fail.
    pub fn fail_on(self, call: TransportCall) -> Self {
        self.failing.lock().push(call);
        self
    }

    /// Calls issued so far, in order.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: TransportCall) -> Result<(), TransportError> {
        self.calls.lock().push(call);
        if self.failing.lock().contains(&call) {
            return Err(TransportError::new("injected failure"));
        }
        Ok(())
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[async_trait]
impl CommissioningTransport for RecordingTransport {
    async fn bind(&self, cluster: Cluster) -> Result<(), TransportError> {
        info!(
            "[Transport] bind {} ep{} -> coordinator ep{}",
            cluster, self.endpoint, self.coordinator_endpoint
        );
        self.record(TransportCall::Bind { cluster })
    }

    async fn configure_reporting(
        &self,
        cluster: Cluster,
        rule: &ReportingRule,
    ) -> Result<(), TransportError> {
        info!(
            "[Transport] configureReporting {} ep{} attr 0x{:04X} type 0x{:02X} min {}s max {}s change {}",
            cluster,
            self.endpoint,
            rule.attribute,
            rule.data_type.tag(),
            rule.min_interval,
            rule.max_interval,
            rule.reportable_change
        );
        self.record(TransportCall::ConfigureReporting {
            cluster,
            attribute: rule.attribute,
        })
    }
}
