//! The rendering surface as the envelope sees it.
//!
//! Mandatory configuration lives on [`EnvelopeView`]. Everything a view may
//! or may not support is a separate capability trait, reached through an
//! accessor that returns `None` by default; the envelope probes the accessor
//! before every optional call.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use console_types::{CustomLabels, DiagramPreviewSize, User};
use tokio::sync::oneshot;

use crate::error::{BridgeError, Result};

pub trait EnvelopeView: Send + Sync {
    fn set_data_source_url(&self, url: &str);
    fn set_secondary_service_url(&self, url: &str);
    fn set_users(&self, users: &[User]);
    fn navigate_to(&self, page: &str);
    fn set_process_enabled(&self, enabled: bool);
    fn set_tracing_enabled(&self, enabled: bool);

    // ── Optional capabilities ──

    fn host_url(&self) -> Option<&dyn HostUrlCapability> {
        None
    }

    fn open_api_path(&self) -> Option<&dyn OpenApiPathCapability> {
        None
    }

    fn available_pages(&self) -> Option<&dyn AvailablePagesCapability> {
        None
    }

    fn custom_labels(&self) -> Option<&dyn CustomLabelsCapability> {
        None
    }

    fn omitted_timeline_events(&self) -> Option<&dyn OmittedTimelineEventsCapability> {
        None
    }

    fn diagram_preview_size(&self) -> Option<&dyn DiagramPreviewSizeCapability> {
        None
    }

    fn stunner(&self) -> Option<&dyn StunnerCapability> {
        None
    }
}

pub trait HostUrlCapability: Send + Sync {
    fn set_host_url(&self, url: &str);
}

pub trait OpenApiPathCapability: Send + Sync {
    fn set_open_api_path(&self, path: &str);
}

pub trait AvailablePagesCapability: Send + Sync {
    fn set_available_pages(&self, pages: &[String]);
}

pub trait CustomLabelsCapability: Send + Sync {
    fn set_custom_labels(&self, labels: &CustomLabels);
}

pub trait OmittedTimelineEventsCapability: Send + Sync {
    fn set_omitted_timeline_event_kinds(&self, kinds: &[String]);
}

pub trait DiagramPreviewSizeCapability: Send + Sync {
    fn set_diagram_preview_size(&self, size: DiagramPreviewSize);
}

pub trait StunnerCapability: Send + Sync {
    fn set_stunner_enabled(&self, enabled: bool);
}

/// Produces the view once it is ready to be configured.
#[async_trait]
pub trait ViewDelegate: Send + Sync {
    async fn resolve(&self) -> Result<Arc<dyn EnvelopeView>>;
}

/// Delegate for a view that already exists.
pub struct ReadyView(Arc<dyn EnvelopeView>);

impl ReadyView {
    pub fn new(view: Arc<dyn EnvelopeView>) -> Self {
        Self(view)
    }
}

#[async_trait]
impl ViewDelegate for ReadyView {
    async fn resolve(&self) -> Result<Arc<dyn EnvelopeView>> {
        Ok(Arc::clone(&self.0))
    }
}

/// Delegate for a view that is mounted later. Pair it with the [`ViewSlot`]
/// returned by [`pending_view`]; resolution waits until the slot is filled.
pub struct PendingView {
    rx: Mutex<Option<oneshot::Receiver<Arc<dyn EnvelopeView>>>>,
}

/// Filled by the rendering side once its view is mounted.
pub struct ViewSlot {
    tx: oneshot::Sender<Arc<dyn EnvelopeView>>,
}

impl ViewSlot {
    /// Hand the mounted view over. Returns the view back if nobody waits for it anymore.
    pub fn fill(
        self,
        view: Arc<dyn EnvelopeView>,
    ) -> std::result::Result<(), Arc<dyn EnvelopeView>> {
        self.tx.send(view)
    }
}

pub fn pending_view() -> (ViewSlot, PendingView) {
    let (tx, rx) = oneshot::channel();
    (
        ViewSlot { tx },
        PendingView {
            rx: Mutex::new(Some(rx)),
        },
    )
}

#[async_trait]
impl ViewDelegate for PendingView {
    async fn resolve(&self) -> Result<Arc<dyn EnvelopeView>> {
        let rx = self
            .rx
            .lock()
            .map_err(|_| BridgeError::DelegateUnavailable("view slot poisoned".into()))?
            .take()
            .ok_or_else(|| BridgeError::DelegateUnavailable("view already resolved".into()))?;
        rx.await.map_err(|_| {
            BridgeError::DelegateUnavailable("view slot dropped before the view was mounted".into())
        })
    }
}
