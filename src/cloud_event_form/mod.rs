//! Cloud event form feature channel.
//!
//! Same shape as the process details channel: a driver trait, a host-side
//! channel API that forwards to it, and an envelope-side driver that turns
//! each call into a `cloudEventForm__*` message.

pub mod form;

use std::sync::Arc;

use async_trait::async_trait;
use console_types::CloudEventRequest;
use serde_json::Value;

use crate::envelope::EnvelopeClient;
use crate::error::Result;
use crate::transport::router::unknown_operation;
use crate::transport::{encode, namespaced, ApiHandler, CallArgs};

pub use form::CloudEventFormValues;

/// Feature prefix on the wire.
pub const CLOUD_EVENT_FORM_PREFIX: &str = "cloudEventForm";
pub const TRIGGER_CLOUD_EVENT: &str = "triggerCloudEvent";

#[async_trait]
pub trait CloudEventFormDriver: Send + Sync {
    async fn trigger_cloud_event(&self, request: &CloudEventRequest) -> Result<()>;
}

pub struct CloudEventFormChannelApiImpl {
    driver: Arc<dyn CloudEventFormDriver>,
}

impl CloudEventFormChannelApiImpl {
    pub fn new(driver: Arc<dyn CloudEventFormDriver>) -> Self {
        Self { driver }
    }

    pub async fn trigger_cloud_event(&self, request: &CloudEventRequest) -> Result<()> {
        self.driver.trigger_cloud_event(request).await
    }
}

#[async_trait]
impl ApiHandler for CloudEventFormChannelApiImpl {
    fn prefix(&self) -> &'static str {
        CLOUD_EVENT_FORM_PREFIX
    }

    async fn handle(&self, operation: &str, mut args: CallArgs) -> Result<Value> {
        match operation {
            TRIGGER_CLOUD_EVENT => {
                let request: CloudEventRequest = args.next()?;
                args.finish()?;
                encode(&self.trigger_cloud_event(&request).await?)
            }
            other => Err(unknown_operation(CLOUD_EVENT_FORM_PREFIX, other)),
        }
    }
}

/// Envelope-side driver forwarding to the host over the shared client.
pub struct CloudEventFormEnvelopeDriver {
    client: Arc<EnvelopeClient>,
}

impl CloudEventFormEnvelopeDriver {
    pub fn new(client: Arc<EnvelopeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CloudEventFormDriver for CloudEventFormEnvelopeDriver {
    async fn trigger_cloud_event(&self, request: &CloudEventRequest) -> Result<()> {
        tracing::debug!(
            endpoint = %request.endpoint,
            event_type = %request.headers.event_type,
            "Triggering cloud event"
        );
        self.client
            .call(
                namespaced(CLOUD_EVENT_FORM_PREFIX, TRIGGER_CLOUD_EVENT),
                vec![encode(request)?],
            )
            .await
    }
}
