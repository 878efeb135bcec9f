//! Shared test doubles for the bridge integration tests.
//!
//! - `RecordingView`: an envelope view that logs every setter call, with a
//!   configurable set of optional capabilities
//! - `ScriptedDriver`: a process details driver that records its inputs and
//!   answers from fixtures, or rejects everything
//! - `CapturingFormDriver`: a cloud event form driver that records requests

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use console_envelope::cloud_event_form::CloudEventFormDriver;
use console_envelope::envelope::view::{
    AvailablePagesCapability, CustomLabelsCapability, DiagramPreviewSizeCapability,
    HostUrlCapability, OmittedTimelineEventsCapability, OpenApiPathCapability, StunnerCapability,
};
use console_envelope::envelope::EnvelopeView;
use console_envelope::process_details::ProcessDetailsDriver;
use console_envelope::transport::encode;
use console_envelope::{BridgeError, InitArgs, Result};
use console_types::{
    CloudEventRequest, CustomLabels, DiagramPreviewSize, DriverError, Job, JobCancel, JobRef,
    JobReschedule, JobStatus, NodeInstance, NodeInstanceRef, ProcessInstance,
    ProcessInstanceState, RepeatValue, SvgResponse, TriggerableNode, User,
};

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary. `RUST_LOG` controls output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

// ---------------------------------------------------------------------------
// Recording view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    DataSourceUrl(String),
    SecondaryServiceUrl(String),
    Users(Vec<User>),
    NavigateTo(String),
    HostUrl(String),
    OpenApiPath(String),
    AvailablePages(Vec<String>),
    CustomLabels(CustomLabels),
    OmittedTimelineEvents(Vec<String>),
    DiagramPreviewSize(DiagramPreviewSize),
    Stunner(bool),
    ProcessEnabled(bool),
    TracingEnabled(bool),
}

impl ViewCall {
    pub fn is_optional(&self) -> bool {
        !matches!(
            self,
            Self::DataSourceUrl(_)
                | Self::SecondaryServiceUrl(_)
                | Self::Users(_)
                | Self::NavigateTo(_)
                | Self::ProcessEnabled(_)
                | Self::TracingEnabled(_)
        )
    }
}

/// Which optional capabilities a `RecordingView` exposes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Capabilities {
    pub host_url: bool,
    pub open_api_path: bool,
    pub available_pages: bool,
    pub custom_labels: bool,
    pub omitted_timeline_events: bool,
    pub diagram_preview_size: bool,
    pub stunner: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            host_url: true,
            open_api_path: true,
            available_pages: true,
            custom_labels: true,
            omitted_timeline_events: true,
            diagram_preview_size: true,
            stunner: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

pub struct RecordingView {
    capabilities: Capabilities,
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn new(capabilities: Capabilities) -> Arc<Self> {
        Arc::new(Self {
            capabilities,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl EnvelopeView for RecordingView {
    fn set_data_source_url(&self, url: &str) {
        self.record(ViewCall::DataSourceUrl(url.to_string()));
    }

    fn set_secondary_service_url(&self, url: &str) {
        self.record(ViewCall::SecondaryServiceUrl(url.to_string()));
    }

    fn set_users(&self, users: &[User]) {
        self.record(ViewCall::Users(users.to_vec()));
    }

    fn navigate_to(&self, page: &str) {
        self.record(ViewCall::NavigateTo(page.to_string()));
    }

    fn set_process_enabled(&self, enabled: bool) {
        self.record(ViewCall::ProcessEnabled(enabled));
    }

    fn set_tracing_enabled(&self, enabled: bool) {
        self.record(ViewCall::TracingEnabled(enabled));
    }

    fn host_url(&self) -> Option<&dyn HostUrlCapability> {
        self.capabilities
            .host_url
            .then_some(self as &dyn HostUrlCapability)
    }

    fn open_api_path(&self) -> Option<&dyn OpenApiPathCapability> {
        self.capabilities
            .open_api_path
            .then_some(self as &dyn OpenApiPathCapability)
    }

    fn available_pages(&self) -> Option<&dyn AvailablePagesCapability> {
        self.capabilities
            .available_pages
            .then_some(self as &dyn AvailablePagesCapability)
    }

    fn custom_labels(&self) -> Option<&dyn CustomLabelsCapability> {
        self.capabilities
            .custom_labels
            .then_some(self as &dyn CustomLabelsCapability)
    }

    fn omitted_timeline_events(&self) -> Option<&dyn OmittedTimelineEventsCapability> {
        self.capabilities
            .omitted_timeline_events
            .then_some(self as &dyn OmittedTimelineEventsCapability)
    }

    fn diagram_preview_size(&self) -> Option<&dyn DiagramPreviewSizeCapability> {
        self.capabilities
            .diagram_preview_size
            .then_some(self as &dyn DiagramPreviewSizeCapability)
    }

    fn stunner(&self) -> Option<&dyn StunnerCapability> {
        self.capabilities
            .stunner
            .then_some(self as &dyn StunnerCapability)
    }
}

impl HostUrlCapability for RecordingView {
    fn set_host_url(&self, url: &str) {
        self.record(ViewCall::HostUrl(url.to_string()));
    }
}

impl OpenApiPathCapability for RecordingView {
    fn set_open_api_path(&self, path: &str) {
        self.record(ViewCall::OpenApiPath(path.to_string()));
    }
}

impl AvailablePagesCapability for RecordingView {
    fn set_available_pages(&self, pages: &[String]) {
        self.record(ViewCall::AvailablePages(pages.to_vec()));
    }
}

impl CustomLabelsCapability for RecordingView {
    fn set_custom_labels(&self, labels: &CustomLabels) {
        self.record(ViewCall::CustomLabels(labels.clone()));
    }
}

impl OmittedTimelineEventsCapability for RecordingView {
    fn set_omitted_timeline_event_kinds(&self, kinds: &[String]) {
        self.record(ViewCall::OmittedTimelineEvents(kinds.to_vec()));
    }
}

impl DiagramPreviewSizeCapability for RecordingView {
    fn set_diagram_preview_size(&self, size: DiagramPreviewSize) {
        self.record(ViewCall::DiagramPreviewSize(size));
    }
}

impl StunnerCapability for RecordingView {
    fn set_stunner_enabled(&self, enabled: bool) {
        self.record(ViewCall::Stunner(enabled));
    }
}

// ---------------------------------------------------------------------------
// Init argument fixtures
// ---------------------------------------------------------------------------

pub fn minimal_init_args() -> InitArgs {
    InitArgs::new("http://di", "http://trusty", "Processes")
        .with_users(vec![User::new("u1")])
        .with_process_enabled(true)
}

/// Every optional field present.
pub fn full_init_args() -> InitArgs {
    minimal_init_args()
        .with_host_url("http://localhost:8080/q/dev-ui")
        .with_open_api_path("/q/openapi.json")
        .with_available_pages(vec!["Processes".into(), "Jobs".into()])
        .with_custom_labels(CustomLabels {
            singular_process_label: "Workflow".into(),
            plural_process_label: "Workflows".into(),
        })
        .with_omitted_timeline_event_kinds(vec!["BoundaryEvent".into()])
        .with_diagram_preview_size(DiagramPreviewSize {
            width: 800,
            height: 600,
        })
        .with_stunner_enabled(true)
        .with_tracing_enabled(true)
}

// ---------------------------------------------------------------------------
// Process details fixtures
// ---------------------------------------------------------------------------

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
}

pub fn process_instance(id: &str) -> ProcessInstance {
    let mut pi = ProcessInstance::new(
        id,
        "travels",
        "http://localhost:8080/travels",
        ProcessInstanceState::Active,
        start_time(),
    );
    pi.business_key = Some("T-1001".into());
    pi.add_ons = vec!["process-management".into()];
    pi.node_instances = vec![node_instance("ni-1")];
    pi
}

pub fn node_instance(id: &str) -> NodeInstance {
    NodeInstance {
        id: id.to_string(),
        node_id: "2".into(),
        definition_id: "_BookFlight".into(),
        name: "Book Flight".into(),
        node_type: "WorkItemNode".into(),
        enter: start_time(),
        exit: None,
        retrigger: false,
    }
}

pub fn triggerable_node() -> TriggerableNode {
    TriggerableNode {
        id: 3,
        name: "Confirm Travel".into(),
        node_type: "HumanTaskNode".into(),
        unique_id: "3".into(),
        node_definition_id: "_ConfirmTravel".into(),
    }
}

pub fn job(id: &str) -> Job {
    Job {
        id: id.to_string(),
        process_id: "travels".into(),
        process_instance_id: "pi-1".into(),
        root_process_instance_id: None,
        root_process_id: None,
        status: JobStatus::Scheduled,
        expiration_time: Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        priority: 0,
        callback_endpoint: None,
        repeat_interval: Some(1),
        repeat_limit: Some(3),
        scheduled_id: None,
        retries: 0,
        last_update: None,
        execution_counter: None,
        endpoint: "http://localhost:8080/jobs".into(),
        node_instance_id: Some("ni-1".into()),
    }
}

pub fn svg() -> SvgResponse {
    SvgResponse::Success {
        svg: "<svg/>".into(),
    }
}

pub fn job_cancel() -> JobCancel {
    JobCancel {
        modal_title: "success".into(),
        modal_content: "The job was cancelled successfully".into(),
    }
}

pub fn job_reschedule() -> JobReschedule {
    JobReschedule {
        modal_title: "success".into(),
        modal_content: "Reschedule of job: j-1 is successful".into(),
    }
}

// ---------------------------------------------------------------------------
// Scripted process details driver
// ---------------------------------------------------------------------------

/// One driver invocation: operation name plus its arguments as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub operation: &'static str,
    pub args: Vec<Value>,
}

pub struct ScriptedDriver {
    failure: Option<DriverError>,
    recorded: Mutex<Vec<Recorded>>,
}

impl ScriptedDriver {
    /// Answers every operation from the fixtures above.
    pub fn answering() -> Arc<Self> {
        Arc::new(Self {
            failure: None,
            recorded: Mutex::new(Vec::new()),
        })
    }

    /// Rejects every operation with `error`.
    pub fn rejecting(error: DriverError) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(error),
            recorded: Mutex::new(Vec::new()),
        })
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, args: Vec<Value>) -> Result<()> {
        self.recorded
            .lock()
            .unwrap()
            .push(Recorded { operation, args });
        match &self.failure {
            Some(err) => Err(BridgeError::Driver(err.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProcessDetailsDriver for ScriptedDriver {
    async fn process_details_query(&self, id: &str) -> Result<ProcessInstance> {
        self.record("processDetailsQuery", vec![json!(id)])?;
        Ok(process_instance(id))
    }

    async fn jobs_query(&self, id: &str) -> Result<Vec<Job>> {
        self.record("jobsQuery", vec![json!(id)])?;
        Ok(vec![job("j-1"), job("j-2")])
    }

    async fn get_process_diagram(&self, pi: &ProcessInstance) -> Result<SvgResponse> {
        self.record("getProcessDiagram", vec![encode(pi)?])?;
        Ok(svg())
    }

    async fn get_triggerable_nodes(&self, pi: &ProcessInstance) -> Result<Vec<TriggerableNode>> {
        self.record("getTriggerableNodes", vec![encode(pi)?])?;
        Ok(vec![triggerable_node()])
    }

    async fn handle_process_abort(&self, pi: &ProcessInstance) -> Result<()> {
        self.record("handleProcessAbort", vec![encode(pi)?])
    }

    async fn handle_process_retry(&self, pi: &ProcessInstance) -> Result<()> {
        self.record("handleProcessRetry", vec![encode(pi)?])
    }

    async fn handle_process_skip(&self, pi: &ProcessInstance) -> Result<()> {
        self.record("handleProcessSkip", vec![encode(pi)?])
    }

    async fn handle_process_variable_update(
        &self,
        pi: &ProcessInstance,
        updated_json: &Value,
    ) -> Result<Value> {
        self.record(
            "handleProcessVariableUpdate",
            vec![encode(pi)?, updated_json.clone()],
        )?;
        Ok(updated_json.clone())
    }

    async fn handle_node_trigger(&self, pi: &ProcessInstance, node: &TriggerableNode) -> Result<()> {
        self.record("handleNodeTrigger", vec![encode(pi)?, encode(node)?])
    }

    async fn handle_node_instance_cancel(
        &self,
        pi: &ProcessInstance,
        node: &NodeInstance,
    ) -> Result<()> {
        self.record("handleNodeInstanceCancel", vec![encode(pi)?, encode(node)?])
    }

    async fn handle_node_instance_retrigger(
        &self,
        pi: &ProcessInstance,
        node: &NodeInstanceRef,
    ) -> Result<()> {
        self.record(
            "handleNodeInstanceRetrigger",
            vec![encode(pi)?, encode(node)?],
        )
    }

    async fn cancel_job(&self, job: &JobRef) -> Result<JobCancel> {
        self.record("cancelJob", vec![encode(job)?])?;
        Ok(job_cancel())
    }

    async fn reschedule_job(
        &self,
        job: &Job,
        repeat_interval: &RepeatValue,
        repeat_limit: &RepeatValue,
        schedule_date: DateTime<Utc>,
    ) -> Result<JobReschedule> {
        self.record(
            "rescheduleJob",
            vec![
                encode(job)?,
                encode(repeat_interval)?,
                encode(repeat_limit)?,
                encode(&schedule_date)?,
            ],
        )?;
        Ok(job_reschedule())
    }

    fn open_process_instance_details(&self, id: &str) {
        let _ = self.record("openProcessDetails", vec![json!(id)]);
    }
}

// ---------------------------------------------------------------------------
// Cloud event form driver
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CapturingFormDriver {
    requests: Mutex<Vec<CloudEventRequest>>,
}

impl CapturingFormDriver {
    pub fn requests(&self) -> Vec<CloudEventRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudEventFormDriver for CapturingFormDriver {
    async fn trigger_cloud_event(&self, request: &CloudEventRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}
