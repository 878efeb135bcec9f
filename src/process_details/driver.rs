use async_trait::async_trait;
use chrono::{DateTime, Utc};
use console_types::{
    Job, JobCancel, JobRef, JobReschedule, NodeInstance, NodeInstanceRef, ProcessInstance,
    RepeatValue, SvgResponse, TriggerableNode,
};
use serde_json::Value;

use crate::error::Result;

/// Business operations behind the process details view.
///
/// Implemented on the host by the console's data-index / runtime clients and
/// on the envelope side by [`ProcessDetailsEnvelopeDriver`](super::ProcessDetailsEnvelopeDriver),
/// which forwards every call to the host. Failures are `Err` values carrying
/// a [`DriverError`](console_types::DriverError) payload.
#[async_trait]
pub trait ProcessDetailsDriver: Send + Sync {
    // ── Queries ──

    async fn process_details_query(&self, id: &str) -> Result<ProcessInstance>;
    async fn jobs_query(&self, id: &str) -> Result<Vec<Job>>;
    async fn get_process_diagram(&self, process_instance: &ProcessInstance)
        -> Result<SvgResponse>;
    async fn get_triggerable_nodes(
        &self,
        process_instance: &ProcessInstance,
    ) -> Result<Vec<TriggerableNode>>;

    // ── Instance commands ──

    async fn handle_process_abort(&self, process_instance: &ProcessInstance) -> Result<()>;
    async fn handle_process_retry(&self, process_instance: &ProcessInstance) -> Result<()>;
    async fn handle_process_skip(&self, process_instance: &ProcessInstance) -> Result<()>;

    /// Apply edited variables; resolves to the variables as stored.
    async fn handle_process_variable_update(
        &self,
        process_instance: &ProcessInstance,
        updated_json: &Value,
    ) -> Result<Value>;

    // ── Node instances ──

    async fn handle_node_trigger(
        &self,
        process_instance: &ProcessInstance,
        node: &TriggerableNode,
    ) -> Result<()>;
    async fn handle_node_instance_cancel(
        &self,
        process_instance: &ProcessInstance,
        node: &NodeInstance,
    ) -> Result<()>;
    async fn handle_node_instance_retrigger(
        &self,
        process_instance: &ProcessInstance,
        node: &NodeInstanceRef,
    ) -> Result<()>;

    // ── Jobs ──

    async fn cancel_job(&self, job: &JobRef) -> Result<JobCancel>;
    async fn reschedule_job(
        &self,
        job: &Job,
        repeat_interval: &RepeatValue,
        repeat_limit: &RepeatValue,
        schedule_date: DateTime<Utc>,
    ) -> Result<JobReschedule>;

    // ── Navigation ──

    /// Open another instance's details page. Fire-and-forget.
    fn open_process_instance_details(&self, id: &str);
}
