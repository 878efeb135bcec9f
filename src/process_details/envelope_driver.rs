use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use console_types::{
    Job, JobCancel, JobRef, JobReschedule, NodeInstance, NodeInstanceRef, ProcessInstance,
    RepeatValue, SvgResponse, TriggerableNode,
};
use serde_json::Value;

use super::driver::ProcessDetailsDriver;
use super::{ops, PROCESS_DETAILS_PREFIX};
use crate::envelope::EnvelopeClient;
use crate::error::Result;
use crate::transport::{encode, namespaced};

/// Envelope-side driver: every operation becomes a `processDetails__*` call
/// to the host, answered by its [`ProcessDetailsChannelApiImpl`](super::ProcessDetailsChannelApiImpl).
pub struct ProcessDetailsEnvelopeDriver {
    client: Arc<EnvelopeClient>,
}

impl ProcessDetailsEnvelopeDriver {
    pub fn new(client: Arc<EnvelopeClient>) -> Self {
        Self { client }
    }

    fn method(operation: &str) -> String {
        namespaced(PROCESS_DETAILS_PREFIX, operation)
    }
}

#[async_trait]
impl ProcessDetailsDriver for ProcessDetailsEnvelopeDriver {
    async fn process_details_query(&self, id: &str) -> Result<ProcessInstance> {
        self.client
            .call(Self::method(ops::PROCESS_DETAILS_QUERY), vec![encode(id)?])
            .await
    }

    async fn jobs_query(&self, id: &str) -> Result<Vec<Job>> {
        self.client
            .call(Self::method(ops::JOBS_QUERY), vec![encode(id)?])
            .await
    }

    async fn get_process_diagram(
        &self,
        process_instance: &ProcessInstance,
    ) -> Result<SvgResponse> {
        self.client
            .call(
                Self::method(ops::GET_PROCESS_DIAGRAM),
                vec![encode(process_instance)?],
            )
            .await
    }

    async fn get_triggerable_nodes(
        &self,
        process_instance: &ProcessInstance,
    ) -> Result<Vec<TriggerableNode>> {
        self.client
            .call(
                Self::method(ops::GET_TRIGGERABLE_NODES),
                vec![encode(process_instance)?],
            )
            .await
    }

    async fn handle_process_abort(&self, process_instance: &ProcessInstance) -> Result<()> {
        self.client
            .call(
                Self::method(ops::HANDLE_PROCESS_ABORT),
                vec![encode(process_instance)?],
            )
            .await
    }

    async fn handle_process_retry(&self, process_instance: &ProcessInstance) -> Result<()> {
        self.client
            .call(
                Self::method(ops::HANDLE_PROCESS_RETRY),
                vec![encode(process_instance)?],
            )
            .await
    }

    async fn handle_process_skip(&self, process_instance: &ProcessInstance) -> Result<()> {
        self.client
            .call(
                Self::method(ops::HANDLE_PROCESS_SKIP),
                vec![encode(process_instance)?],
            )
            .await
    }

    async fn handle_process_variable_update(
        &self,
        process_instance: &ProcessInstance,
        updated_json: &Value,
    ) -> Result<Value> {
        self.client
            .call(
                Self::method(ops::HANDLE_PROCESS_VARIABLE_UPDATE),
                vec![encode(process_instance)?, updated_json.clone()],
            )
            .await
    }

    async fn handle_node_trigger(
        &self,
        process_instance: &ProcessInstance,
        node: &TriggerableNode,
    ) -> Result<()> {
        self.client
            .call(
                Self::method(ops::HANDLE_NODE_TRIGGER),
                vec![encode(process_instance)?, encode(node)?],
            )
            .await
    }

    async fn handle_node_instance_cancel(
        &self,
        process_instance: &ProcessInstance,
        node: &NodeInstance,
    ) -> Result<()> {
        self.client
            .call(
                Self::method(ops::HANDLE_NODE_INSTANCE_CANCEL),
                vec![encode(process_instance)?, encode(node)?],
            )
            .await
    }

    async fn handle_node_instance_retrigger(
        &self,
        process_instance: &ProcessInstance,
        node: &NodeInstanceRef,
    ) -> Result<()> {
        self.client
            .call(
                Self::method(ops::HANDLE_NODE_INSTANCE_RETRIGGER),
                vec![encode(process_instance)?, encode(node)?],
            )
            .await
    }

    async fn cancel_job(&self, job: &JobRef) -> Result<JobCancel> {
        self.client
            .call(Self::method(ops::CANCEL_JOB), vec![encode(job)?])
            .await
    }

    async fn reschedule_job(
        &self,
        job: &Job,
        repeat_interval: &RepeatValue,
        repeat_limit: &RepeatValue,
        schedule_date: DateTime<Utc>,
    ) -> Result<JobReschedule> {
        self.client
            .call(
                Self::method(ops::RESCHEDULE_JOB),
                vec![
                    encode(job)?,
                    encode(repeat_interval)?,
                    encode(repeat_limit)?,
                    encode(&schedule_date)?,
                ],
            )
            .await
    }

    fn open_process_instance_details(&self, id: &str) {
        let args = vec![Value::String(id.to_string())];
        if let Err(e) = self
            .client
            .notify(Self::method(ops::OPEN_PROCESS_DETAILS), args)
        {
            tracing::warn!(process_instance_id = %id, error = %e, "Could not open process details");
        }
    }
}
