use std::collections::BTreeMap;

use console_types::{
    CloudEventFormDefaultValues, CloudEventHeaders, CloudEventMethod, CloudEventRequest,
    KOGITO_BUSINESS_KEY, KOGITO_PROCESS_REFERENCE_ID,
};

use super::CloudEventFormDriver;
use crate::error::Result;

pub const DEFAULT_ENDPOINT: &str = "/";
pub const DEFAULT_EVENT_SOURCE: &str = "/from/form";

/// State of the cloud event form between edits.
///
/// Field validation belongs to the form's renderer; this only assembles the
/// request and resets after a successful trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudEventFormValues {
    pub method: CloudEventMethod,
    pub endpoint: String,
    pub instance_id: String,
    pub business_key: String,
    pub event_type: String,
    pub event_source: String,
    pub event_data: String,
    pub custom_headers: BTreeMap<String, String>,
    defaults: CloudEventFormDefaultValues,
}

impl CloudEventFormValues {
    pub fn new(defaults: CloudEventFormDefaultValues) -> Self {
        let mut values = Self {
            method: CloudEventMethod::Post,
            endpoint: String::new(),
            instance_id: String::new(),
            business_key: String::new(),
            event_type: String::new(),
            event_source: String::new(),
            event_data: String::new(),
            custom_headers: BTreeMap::new(),
            defaults,
        };
        values.reset();
        values
    }

    pub fn defaults(&self) -> &CloudEventFormDefaultValues {
        &self.defaults
    }

    /// Host pushed new defaults: only source and instance id follow them.
    pub fn apply_defaults(&mut self, defaults: CloudEventFormDefaultValues) {
        self.defaults = defaults;
        self.event_source = self.default_event_source();
        self.instance_id = self.defaults.instance_id.clone().unwrap_or_default();
    }

    pub fn reset(&mut self) {
        self.method = CloudEventMethod::Post;
        self.endpoint = DEFAULT_ENDPOINT.to_string();
        self.event_type.clear();
        self.event_source = self.default_event_source();
        self.event_data.clear();
        self.instance_id = self.defaults.instance_id.clone().unwrap_or_default();
        self.business_key.clear();
        self.custom_headers.clear();
    }

    /// Assemble the request. A new-instance event carries the business key;
    /// any other event carries the target instance id. Empty values are
    /// left out.
    pub fn to_request(&self, is_new_instance_event: bool) -> CloudEventRequest {
        let mut extensions = self.custom_headers.clone();

        if is_new_instance_event {
            if !self.business_key.is_empty() {
                extensions.insert(KOGITO_BUSINESS_KEY.to_string(), self.business_key.clone());
            }
        } else if !self.instance_id.is_empty() {
            extensions.insert(
                KOGITO_PROCESS_REFERENCE_ID.to_string(),
                self.instance_id.clone(),
            );
        }

        CloudEventRequest {
            endpoint: self.endpoint.clone(),
            method: self.method,
            data: self.event_data.clone(),
            headers: CloudEventHeaders {
                event_type: self.event_type.clone(),
                source: self.event_source.clone(),
                extensions,
            },
        }
    }

    /// Trigger the event through `driver`; the form resets only on success.
    pub async fn submit(
        &mut self,
        driver: &dyn CloudEventFormDriver,
        is_new_instance_event: bool,
    ) -> Result<()> {
        let request = self.to_request(is_new_instance_event);
        driver.trigger_cloud_event(&request).await?;
        self.reset();
        Ok(())
    }

    fn default_event_source(&self) -> String {
        self.defaults
            .cloud_event_source
            .clone()
            .unwrap_or_else(|| DEFAULT_EVENT_SOURCE.to_string())
    }
}

impl Default for CloudEventFormValues {
    fn default() -> Self {
        Self::new(CloudEventFormDefaultValues::default())
    }
}
