//! Process details feature channel.
//!
//! - [`ProcessDetailsDriver`]: the operations the view needs
//! - [`ProcessDetailsChannelApiImpl`]: host side, forwards to the host's driver
//! - [`ProcessDetailsEnvelopeDriver`]: envelope side, forwards to the host

pub mod channel_api;
pub mod driver;
pub mod envelope_driver;

pub use channel_api::ProcessDetailsChannelApiImpl;
pub use driver::ProcessDetailsDriver;
pub use envelope_driver::ProcessDetailsEnvelopeDriver;

/// Feature prefix on the wire.
pub const PROCESS_DETAILS_PREFIX: &str = "processDetails";

/// Operation names (the part after `processDetails__`).
pub mod ops {
    pub const GET_PROCESS_DIAGRAM: &str = "getProcessDiagram";
    pub const HANDLE_PROCESS_ABORT: &str = "handleProcessAbort";
    pub const CANCEL_JOB: &str = "cancelJob";
    pub const RESCHEDULE_JOB: &str = "rescheduleJob";
    pub const GET_TRIGGERABLE_NODES: &str = "getTriggerableNodes";
    pub const HANDLE_NODE_TRIGGER: &str = "handleNodeTrigger";
    pub const HANDLE_PROCESS_VARIABLE_UPDATE: &str = "handleProcessVariableUpdate";
    pub const PROCESS_DETAILS_QUERY: &str = "processDetailsQuery";
    pub const JOBS_QUERY: &str = "jobsQuery";
    pub const OPEN_PROCESS_DETAILS: &str = "openProcessDetails";
    pub const HANDLE_PROCESS_RETRY: &str = "handleProcessRetry";
    pub const HANDLE_NODE_INSTANCE_CANCEL: &str = "handleNodeInstanceCancel";
    pub const HANDLE_PROCESS_SKIP: &str = "handleProcessSkip";
    pub const HANDLE_NODE_INSTANCE_RETRIGGER: &str = "handleNodeInstanceRetrigger";
}
