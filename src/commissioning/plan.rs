//! Commissioning plans: the clusters to bind and the reporting rules to
//! install when a device joins.

use crate::zcl::{AttributeId, Cluster, DataType};
use serde::Serialize;

/// Attribute reporting configuration for one attribute.
///
/// A `reportable_change` of zero installs an interval-only rule: the device
/// reports on any change, bounded by the two intervals.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ReportingRule {
    pub cluster: Cluster,
    pub attribute: AttributeId,
    pub data_type: DataType,
    /// Seconds.
    pub min_interval: u16,
    /// Seconds.
    pub max_interval: u16,
    pub reportable_change: u32,
}

impl ReportingRule {
    pub const fn new(
        cluster: Cluster,
        attribute: AttributeId,
        data_type: DataType,
        min_interval: u16,
        max_interval: u16,
        reportable_change: u32,
    ) -> Self {
        Self {
            cluster,
            attribute,
            data_type,
            min_interval,
            max_interval,
            reportable_change,
        }
    }

    pub fn is_interval_only(&self) -> bool {
        self.reportable_change == 0
    }
}

/// Ordered bind list followed by ordered reporting rules. The order of both
/// lists is part of the device family's contract.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct CommissioningPlan {
    binds: &'static [Cluster],
    reporting: &'static [ReportingRule],
}

impl CommissioningPlan {
    pub const fn new(binds: &'static [Cluster], reporting: &'static [ReportingRule]) -> Self {
        Self { binds, reporting }
    }

    /// Distinct clusters to bind, in first-declared order.
    pub fn bind_targets(&self) -> Vec<Cluster> {
        let mut targets: Vec<Cluster> = Vec::with_capacity(self.binds.len());
        for &cluster in self.binds {
            if !targets.contains(&cluster) {
                targets.push(cluster);
            }
        }
        targets
    }

    pub fn reporting_rules(&self) -> &'static [ReportingRule] {
        self.reporting
    }

    /// Reporting rules whose cluster is never bound.
    pub fn unbound_rules(&self) -> impl Iterator<Item = &'static ReportingRule> {
        let binds = self.binds;
        self.reporting
            .iter()
            .filter(move |rule| !binds.contains(&rule.cluster))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &[ReportingRule] = &[
        ReportingRule::new(Cluster::TemperatureMeasurement, 0x0000, DataType::Int16, 0, 1800, 0),
        ReportingRule::new(Cluster::PowerConfiguration, 0x0021, DataType::Uint8, 0, 7200, 2),
    ];

    #[test]
    fn test_bind_targets_dedup_in_order() {
        let plan = CommissioningPlan::new(
            &[
                Cluster::PowerConfiguration,
                Cluster::TemperatureMeasurement,
                Cluster::PowerConfiguration,
            ],
            RULES,
        );
        assert_eq!(
            plan.bind_targets(),
            vec![Cluster::PowerConfiguration, Cluster::TemperatureMeasurement]
        );
        assert_eq!(plan.unbound_rules().count(), 0);
    }

    #[test]
    fn test_unbound_rules() {
        let plan = CommissioningPlan::new(&[Cluster::TemperatureMeasurement], RULES);
        let unbound: Vec<_> = plan.unbound_rules().collect();
        assert_eq!(unbound.len(), 1);
        assert_eq!(unbound[0].cluster, Cluster::PowerConfiguration);
    }

    #[test]
    fn test_interval_only() {
        assert!(RULES[0].is_interval_only());
        assert!(!RULES[1].is_interval_only());
    }
}
