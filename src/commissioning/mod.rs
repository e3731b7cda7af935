//! Device bring-up: cluster binding and attribute reporting configuration.

pub mod plan;
pub mod sequencer;
pub mod transport;

pub use plan::{CommissioningPlan, ReportingRule};
pub use sequencer::{CommissioningReport, CommissioningState, Sequencer, run_commissioning};
pub use transport::{CommissioningTransport, RecordingTransport, TransportCall};
