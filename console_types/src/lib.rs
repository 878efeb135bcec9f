//! Console Types - Foundation Types shared by host and envelope
//!
//! Pure data structures exchanged across the envelope bridge. Both the host
//! side (channel API, drivers) and the embedded side (envelope API, views)
//! depend on this crate; it depends on nothing else in the workspace.
//!
//! ## Contents
//!
//! - Association and init arguments (the one-time init request payload)
//! - Process-details entities (process instances, jobs, node instances)
//! - Cloud event request records
//! - The driver error payload
//!
//! Every type is serde-serializable: arguments cross the bridge as plain
//! JSON records. Field names follow the console's camelCase wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// ASSOCIATION
// ============================================================================

/// Binds an embedded session to the host that created it.
///
/// Replies from the envelope are routed using `origin` + `channel_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    /// Origin of the host page.
    pub origin: String,
    /// Host-side channel identifier.
    #[serde(alias = "envelopeServerId")]
    pub channel_id: String,
}

impl Association {
    pub fn new(origin: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            channel_id: channel_id.into(),
        }
    }
}

impl std::fmt::Display for Association {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.origin, self.channel_id)
    }
}

// ============================================================================
// USERS
// ============================================================================

/// A console user the embedded view can impersonate (task inbox).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

// ============================================================================
// INIT ARGUMENTS
// ============================================================================

/// Labels used in place of "Process" / "Processes" in the console views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLabels {
    pub singular_process_label: String,
    pub plural_process_label: String,
}

/// Size of the process diagram preview panel, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramPreviewSize {
    pub width: u32,
    pub height: u32,
}

/// Configuration pushed from the host to the embedded view exactly once.
///
/// Optional fields may be missing when the host is an older release; the
/// original host field names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitArgs {
    /// Data index (GraphQL) endpoint.
    #[serde(alias = "dataIndexUrl")]
    pub data_source_url: String,
    /// Trusty (explainability) service endpoint.
    #[serde(alias = "trustyServiceUrl")]
    pub secondary_service_url: String,
    #[serde(default, alias = "userList")]
    pub users: Vec<User>,
    /// Page the view opens on.
    #[serde(alias = "page")]
    pub navigation_target: String,

    #[serde(default, alias = "devUIUrl", skip_serializing_if = "Option::is_none")]
    pub host_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_api_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_pages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_labels: Option<CustomLabels>,
    #[serde(
        default,
        alias = "omittedProcessTimelineEvents",
        skip_serializing_if = "Option::is_none"
    )]
    pub omitted_timeline_event_kinds: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram_preview_size: Option<DiagramPreviewSize>,
    #[serde(
        default,
        alias = "isStunnerEnabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub stunner_enabled: Option<bool>,

    /// Whether the data index is reachable (process pages enabled).
    #[serde(default, alias = "isDataIndexAvailable")]
    pub process_enabled: bool,
    #[serde(default, alias = "isTracingEnabled")]
    pub tracing_enabled: bool,
}

impl InitArgs {
    /// Create a bundle with the mandatory fields; everything else is absent.
    pub fn new(
        data_source_url: impl Into<String>,
        secondary_service_url: impl Into<String>,
        navigation_target: impl Into<String>,
    ) -> Self {
        Self {
            data_source_url: data_source_url.into(),
            secondary_service_url: secondary_service_url.into(),
            users: Vec::new(),
            navigation_target: navigation_target.into(),
            host_url: None,
            open_api_path: None,
            available_pages: None,
            custom_labels: None,
            omitted_timeline_event_kinds: None,
            diagram_preview_size: None,
            stunner_enabled: None,
            process_enabled: false,
            tracing_enabled: false,
        }
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn with_host_url(mut self, url: impl Into<String>) -> Self {
        self.host_url = Some(url.into());
        self
    }

    pub fn with_open_api_path(mut self, path: impl Into<String>) -> Self {
        self.open_api_path = Some(path.into());
        self
    }

    pub fn with_available_pages(mut self, pages: Vec<String>) -> Self {
        self.available_pages = Some(pages);
        self
    }

    pub fn with_custom_labels(mut self, labels: CustomLabels) -> Self {
        self.custom_labels = Some(labels);
        self
    }

    pub fn with_omitted_timeline_event_kinds(mut self, kinds: Vec<String>) -> Self {
        self.omitted_timeline_event_kinds = Some(kinds);
        self
    }

    pub fn with_diagram_preview_size(mut self, size: DiagramPreviewSize) -> Self {
        self.diagram_preview_size = Some(size);
        self
    }

    pub fn with_stunner_enabled(mut self, enabled: bool) -> Self {
        self.stunner_enabled = Some(enabled);
        self
    }

    pub fn with_process_enabled(mut self, enabled: bool) -> Self {
        self.process_enabled = enabled;
        self
    }

    pub fn with_tracing_enabled(mut self, enabled: bool) -> Self {
        self.tracing_enabled = enabled;
        self
    }
}

// ============================================================================
// PROCESS INSTANCES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessInstanceState {
    Pending,
    Active,
    Completed,
    Aborted,
    Suspended,
    Error,
}

impl ProcessInstanceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Aborted => "ABORTED",
            Self::Suspended => "SUSPENDED",
            Self::Error => "ERROR",
        }
    }

    /// Completed and aborted instances accept no further commands.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

/// Error recorded on a process instance in `ERROR` state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstanceError {
    pub node_definition_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// One executed (or executing) node of a process instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInstance {
    pub id: String,
    pub node_id: String,
    pub definition_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub enter: DateTime<Utc>,
    #[serde(default)]
    pub exit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub retrigger: bool,
}

/// Identifier-only projection of a [`NodeInstance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInstanceRef {
    pub id: String,
}

impl From<&NodeInstance> for NodeInstanceRef {
    fn from(node: &NodeInstance) -> Self {
        Self {
            id: node.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstance {
    pub id: String,
    pub process_id: String,
    #[serde(default)]
    pub process_name: Option<String>,
    #[serde(default)]
    pub business_key: Option<String>,
    #[serde(default)]
    pub parent_process_instance_id: Option<String>,
    #[serde(default)]
    pub root_process_instance_id: Option<String>,
    #[serde(default)]
    pub root_process_id: Option<String>,
    pub state: ProcessInstanceState,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    /// Runtime endpoint that owns the instance.
    pub endpoint: String,
    #[serde(default)]
    pub service_url: Option<String>,
    #[serde(default)]
    pub add_ons: Vec<String>,
    #[serde(default)]
    pub node_instances: Vec<NodeInstance>,
    #[serde(default)]
    pub variables: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ProcessInstanceError>,
}

impl ProcessInstance {
    pub fn new(
        id: impl Into<String>,
        process_id: impl Into<String>,
        endpoint: impl Into<String>,
        state: ProcessInstanceState,
        start: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            process_id: process_id.into(),
            process_name: None,
            business_key: None,
            parent_process_instance_id: None,
            root_process_instance_id: None,
            root_process_id: None,
            state,
            start,
            end: None,
            last_update: None,
            endpoint: endpoint.into(),
            service_url: None,
            add_ons: Vec::new(),
            node_instances: Vec::new(),
            variables: None,
            error: None,
        }
    }

    pub fn has_add_on(&self, add_on: &str) -> bool {
        self.add_ons.iter().any(|a| a == add_on)
    }
}

/// A node that can be (re)triggered on a running instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerableNode {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub unique_id: String,
    pub node_definition_id: String,
}

/// Result of rendering a process diagram: either the SVG or the error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SvgResponse {
    Success { svg: String },
    Error { error: String },
}

// ============================================================================
// JOBS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Error,
    Executed,
    Scheduled,
    Retry,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub process_id: String,
    pub process_instance_id: String,
    #[serde(default)]
    pub root_process_instance_id: Option<String>,
    #[serde(default)]
    pub root_process_id: Option<String>,
    pub status: JobStatus,
    pub expiration_time: DateTime<Utc>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub callback_endpoint: Option<String>,
    #[serde(default)]
    pub repeat_interval: Option<i64>,
    #[serde(default)]
    pub repeat_limit: Option<i32>,
    #[serde(default)]
    pub scheduled_id: Option<String>,
    #[serde(default)]
    pub retries: u32,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub execution_counter: Option<u32>,
    /// Jobs service endpoint that owns the job.
    pub endpoint: String,
    #[serde(default)]
    pub node_instance_id: Option<String>,
}

/// The `id` + `endpoint` projection of a [`Job`], enough to cancel it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRef {
    pub id: String,
    pub endpoint: String,
}

impl From<&Job> for JobRef {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            endpoint: job.endpoint.clone(),
        }
    }
}

/// Modal text shown after a cancel attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCancel {
    pub modal_title: String,
    pub modal_content: String,
}

/// Modal text shown after a reschedule attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReschedule {
    pub modal_title: String,
    pub modal_content: String,
}

/// Repeat interval / limit as entered in the reschedule form: a number, or
/// the raw text when the field was left as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepeatValue {
    Number(i64),
    Text(String),
}

impl From<i64> for RepeatValue {
    fn from(v: i64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for RepeatValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

// ============================================================================
// CLOUD EVENTS
// ============================================================================

/// Extension attribute carrying the business key of a new instance.
pub const KOGITO_BUSINESS_KEY: &str = "kogitobusinesskey";

/// Extension attribute carrying the target process instance id.
pub const KOGITO_PROCESS_REFERENCE_ID: &str = "kogitoprocrefid";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CloudEventMethod {
    #[default]
    Post,
    Put,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudEventHeaders {
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: String,
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudEventRequest {
    pub endpoint: String,
    pub method: CloudEventMethod,
    pub data: String,
    pub headers: CloudEventHeaders,
}

/// Defaults the host passes to the cloud event form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudEventFormDefaultValues {
    #[serde(default)]
    pub cloud_event_source: Option<String>,
    #[serde(default)]
    pub instance_id: Option<String>,
}

// ============================================================================
// DRIVER ERRORS
// ============================================================================

/// Error payload a driver rejects with. Carried back to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct DriverError {
    pub kind: String,
    pub message: String,
}

impl DriverError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
