//! Envelope API: the embedded side's request handler.
//!
//! The host sends exactly one init request per embedded session. The first
//! one associates the envelope with the host, resolves the view and pushes
//! the init arguments into it; any later one is ignored.
//!
//! ## Configuration order
//!
//! | Step | Calls                                                              |
//! |------|--------------------------------------------------------------------|
//! | 1    | data source URL, secondary service URL, users, navigation target   |
//! | 2    | optional capabilities, each only if the view provides it           |
//! | 3    | process enabled, then tracing enabled                              |

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use console_types::{Association, InitArgs};
use serde_json::Value;

use super::client::EnvelopeClient;
use super::view::{EnvelopeView, ViewDelegate};
use crate::error::Result;
use crate::transport::router::unknown_operation;
use crate::transport::{ApiHandler, CallArgs};

/// Feature prefix of the envelope API on the wire.
pub const ENVELOPE_PREFIX: &str = "runtimeTools";

/// Operation name of the init request.
pub const INIT_REQUEST: &str = "initRequest";

#[async_trait]
pub trait EnvelopeApi: Send + Sync {
    async fn init_request(&self, association: Association, init_args: InitArgs) -> Result<()>;
}

/// How far the one-time init has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// No init request captured yet.
    Pending,
    /// Associated with a host, view not configured (still resolving, or
    /// resolution failed). Association is never rolled back.
    Associated,
    /// View fully configured.
    Configured,
}

pub struct EnvelopeApiImpl {
    client: Arc<EnvelopeClient>,
    view_delegate: Arc<dyn ViewDelegate>,
    captured_init_request: AtomicBool,
    view: OnceLock<Arc<dyn EnvelopeView>>,
}

impl EnvelopeApiImpl {
    pub fn new(client: Arc<EnvelopeClient>, view_delegate: Arc<dyn ViewDelegate>) -> Self {
        Self {
            client,
            view_delegate,
            captured_init_request: AtomicBool::new(false),
            view: OnceLock::new(),
        }
    }

    pub fn association(&self) -> Option<&Association> {
        self.client.association()
    }

    pub fn client(&self) -> &Arc<EnvelopeClient> {
        &self.client
    }

    /// The configured view, once init has completed.
    pub fn view(&self) -> Option<&Arc<dyn EnvelopeView>> {
        self.view.get()
    }

    pub fn init_state(&self) -> InitState {
        if self.view.get().is_some() {
            InitState::Configured
        } else if self.has_captured_init_request() {
            InitState::Associated
        } else {
            InitState::Pending
        }
    }

    fn has_captured_init_request(&self) -> bool {
        self.captured_init_request.load(Ordering::Acquire)
    }

    /// Flip the captured flag. `true` only for the caller that flipped it.
    fn ack_captured_init_request(&self) -> bool {
        self.captured_init_request
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[async_trait]
impl EnvelopeApi for EnvelopeApiImpl {
    async fn init_request(&self, association: Association, init_args: InitArgs) -> Result<()> {
        if self.has_captured_init_request() || !self.ack_captured_init_request() {
            tracing::debug!(
                origin = %association.origin,
                channel_id = %association.channel_id,
                "Init request already captured, ignoring"
            );
            return Ok(());
        }

        self.client
            .associate(&association.origin, &association.channel_id);

        let view = self.view_delegate.resolve().await.map_err(|e| {
            tracing::error!(
                association = %association,
                error = %e,
                "View delegate failed; envelope stays associated but unconfigured"
            );
            e
        })?;

        configure_view(view.as_ref(), &init_args);
        // Only this call got past the captured flag, so the slot is empty.
        let _ = self.view.set(view);

        tracing::info!(
            association = %association,
            navigation_target = %init_args.navigation_target,
            process_enabled = init_args.process_enabled,
            tracing_enabled = init_args.tracing_enabled,
            "Envelope view configured"
        );
        Ok(())
    }
}

/// Push `args` into `view` in the fixed order.
fn configure_view(view: &dyn EnvelopeView, args: &InitArgs) {
    view.set_data_source_url(&args.data_source_url);
    view.set_secondary_service_url(&args.secondary_service_url);
    view.set_users(&args.users);
    view.navigate_to(&args.navigation_target);

    apply_optional(
        "host_url",
        view.host_url(),
        args.host_url.as_deref(),
        |cap, url| cap.set_host_url(url),
    );
    apply_optional(
        "open_api_path",
        view.open_api_path(),
        args.open_api_path.as_deref(),
        |cap, path| cap.set_open_api_path(path),
    );
    apply_optional(
        "available_pages",
        view.available_pages(),
        args.available_pages.as_deref(),
        |cap, pages| cap.set_available_pages(pages),
    );
    apply_optional(
        "custom_labels",
        view.custom_labels(),
        args.custom_labels.as_ref(),
        |cap, labels| cap.set_custom_labels(labels),
    );
    apply_optional(
        "omitted_timeline_events",
        view.omitted_timeline_events(),
        args.omitted_timeline_event_kinds.as_deref(),
        |cap, kinds| cap.set_omitted_timeline_event_kinds(kinds),
    );
    apply_optional(
        "diagram_preview_size",
        view.diagram_preview_size(),
        args.diagram_preview_size.as_ref(),
        |cap, size| cap.set_diagram_preview_size(*size),
    );
    apply_optional(
        "stunner",
        view.stunner(),
        args.stunner_enabled.as_ref(),
        |cap, enabled| cap.set_stunner_enabled(*enabled),
    );

    // Must stay last: views re-render on these flags and read the rest of
    // their configuration when they do.
    view.set_process_enabled(args.process_enabled);
    view.set_tracing_enabled(args.tracing_enabled);
}

/// Call `apply` only when the view has the capability and the host sent a value.
fn apply_optional<C: ?Sized, V: ?Sized>(
    capability_name: &'static str,
    capability: Option<&C>,
    value: Option<&V>,
    apply: impl FnOnce(&C, &V),
) {
    match (capability, value) {
        (Some(cap), Some(value)) => apply(cap, value),
        (None, Some(_)) => {
            tracing::debug!(capability = capability_name, "View lacks capability, skipping")
        }
        (_, None) => {}
    }
}

#[async_trait]
impl ApiHandler for EnvelopeApiImpl {
    fn prefix(&self) -> &'static str {
        ENVELOPE_PREFIX
    }

    async fn handle(&self, operation: &str, mut args: CallArgs) -> Result<Value> {
        match operation {
            INIT_REQUEST => {
                let association: Association = args.next()?;
                let init_args: InitArgs = args.next()?;
                args.finish()?;
                self.init_request(association, init_args).await?;
                Ok(Value::Null)
            }
            other => Err(unknown_operation(ENVELOPE_PREFIX, other)),
        }
    }
}
