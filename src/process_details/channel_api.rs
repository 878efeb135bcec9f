//! Host side of the process details channel.
//!
//! Every method hands its arguments to the driver untouched and returns the
//! driver's result untouched, including rejections. The wire handler only
//! decodes arguments and encodes results around those same methods.

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
use crate::error::Result;
use crate::transport::router::unknown_operation;
use crate::transport::{encode, ApiHandler, CallArgs};

pub struct ProcessDetailsChannelApiImpl {
    driver: Arc<dyn ProcessDetailsDriver>,
}

impl ProcessDetailsChannelApiImpl {
    pub fn new(driver: Arc<dyn ProcessDetailsDriver>) -> Self {
        Self { driver }
    }

    pub async fn get_process_diagram(&self, data: &ProcessInstance) -> Result<SvgResponse> {
        self.driver.get_process_diagram(data).await
    }

    pub async fn handle_process_abort(&self, process_instance: &ProcessInstance) -> Result<()> {
        self.driver.handle_process_abort(process_instance).await
    }

    pub async fn cancel_job(&self, job: &JobRef) -> Result<JobCancel> {
        self.driver.cancel_job(job).await
    }

    pub async fn reschedule_job(
        &self,
        job: &Job,
        repeat_interval: &RepeatValue,
        repeat_limit: &RepeatValue,
        schedule_date: DateTime<Utc>,
    ) -> Result<JobReschedule> {
        self.driver
            .reschedule_job(job, repeat_interval, repeat_limit, schedule_date)
            .await
    }

    pub async fn get_triggerable_nodes(
        &self,
        process_instance: &ProcessInstance,
    ) -> Result<Vec<TriggerableNode>> {
        self.driver.get_triggerable_nodes(process_instance).await
    }

    pub async fn handle_node_trigger(
        &self,
        process_instance: &ProcessInstance,
        node: &TriggerableNode,
    ) -> Result<()> {
        self.driver.handle_node_trigger(process_instance, node).await
    }

    pub async fn handle_process_variable_update(
        &self,
        process_instance: &ProcessInstance,
        updated_json: &Value,
    ) -> Result<Value> {
        self.driver
            .handle_process_variable_update(process_instance, updated_json)
            .await
    }

    pub async fn process_details_query(&self, id: &str) -> Result<ProcessInstance> {
        self.driver.process_details_query(id).await
    }

    pub async fn jobs_query(&self, id: &str) -> Result<Vec<Job>> {
        self.driver.jobs_query(id).await
    }

    pub fn open_process_details(&self, id: &str) {
        self.driver.open_process_instance_details(id)
    }

    pub async fn handle_process_retry(&self, process_instance: &ProcessInstance) -> Result<()> {
        self.driver.handle_process_retry(process_instance).await
    }

    pub async fn handle_node_instance_cancel(
        &self,
        process_instance: &ProcessInstance,
        node: &NodeInstance,
    ) -> Result<()> {
        self.driver
            .handle_node_instance_cancel(process_instance, node)
            .await
    }

    pub async fn handle_process_skip(&self, process_instance: &ProcessInstance) -> Result<()> {
        self.driver.handle_process_skip(process_instance).await
    }

    pub async fn handle_node_instance_retrigger(
        &self,
        process_instance: &ProcessInstance,
        node: &NodeInstanceRef,
    ) -> Result<()> {
        self.driver
            .handle_node_instance_retrigger(process_instance, node)
            .await
    }
}

#[async_trait]
impl ApiHandler for ProcessDetailsChannelApiImpl {
    fn prefix(&self) -> &'static str {
        PROCESS_DETAILS_PREFIX
    }

    async fn handle(&self, operation: &str, mut args: CallArgs) -> Result<Value> {
        match operation {
            ops::GET_PROCESS_DIAGRAM => {
                let pi: ProcessInstance = args.next()?;
                args.finish()?;
                encode(&self.get_process_diagram(&pi).await?)
            }
            ops::HANDLE_PROCESS_ABORT => {
                let pi: ProcessInstance = args.next()?;
                args.finish()?;
                encode(&self.handle_process_abort(&pi).await?)
            }
            ops::CANCEL_JOB => {
                let job: JobRef = args.next()?;
                args.finish()?;
                encode(&self.cancel_job(&job).await?)
            }
            ops::RESCHEDULE_JOB => {
                let job: Job = args.next()?;
                let repeat_interval: RepeatValue = args.next()?;
                let repeat_limit: RepeatValue = args.next()?;
                let schedule_date: DateTime<Utc> = args.next()?;
                args.finish()?;
                encode(
                    &self
                        .reschedule_job(&job, &repeat_interval, &repeat_limit, schedule_date)
                        .await?,
                )
            }
            ops::GET_TRIGGERABLE_NODES => {
                let pi: ProcessInstance = args.next()?;
                args.finish()?;
                encode(&self.get_triggerable_nodes(&pi).await?)
            }
            ops::HANDLE_NODE_TRIGGER => {
                let pi: ProcessInstance = args.next()?;
                let node: TriggerableNode = args.next()?;
                args.finish()?;
                encode(&self.handle_node_trigger(&pi, &node).await?)
            }
            ops::HANDLE_PROCESS_VARIABLE_UPDATE => {
                let pi: ProcessInstance = args.next()?;
                let updated: Value = args.next()?;
                args.finish()?;
                self.handle_process_variable_update(&pi, &updated).await
            }
            ops::PROCESS_DETAILS_QUERY => {
                let id: String = args.next()?;
                args.finish()?;
                encode(&self.process_details_query(&id).await?)
            }
            ops::JOBS_QUERY => {
                let id: String = args.next()?;
                args.finish()?;
                encode(&self.jobs_query(&id).await?)
            }
            ops::OPEN_PROCESS_DETAILS => {
                let id: String = args.next()?;
                args.finish()?;
                self.open_process_details(&id);
                Ok(Value::Null)
            }
            ops::HANDLE_PROCESS_RETRY => {
                let pi: ProcessInstance = args.next()?;
                args.finish()?;
                encode(&self.handle_process_retry(&pi).await?)
            }
            ops::HANDLE_NODE_INSTANCE_CANCEL => {
                let pi: ProcessInstance = args.next()?;
                let node: NodeInstance = args.next()?;
                args.finish()?;
                encode(&self.handle_node_instance_cancel(&pi, &node).await?)
            }
            ops::HANDLE_PROCESS_SKIP => {
                let pi: ProcessInstance = args.next()?;
                args.finish()?;
                encode(&self.handle_process_skip(&pi).await?)
            }
            ops::HANDLE_NODE_INSTANCE_RETRIGGER => {
                let pi: ProcessInstance = args.next()?;
                let node: NodeInstanceRef = args.next()?;
                args.finish()?;
                encode(&self.handle_node_instance_retrigger(&pi, &node).await?)
            }
            other => Err(unknown_operation(PROCESS_DETAILS_PREFIX, other)),
        }
    }
}
