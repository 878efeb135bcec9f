use std::sync::OnceLock;

use console_types::Association;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::transport::ChannelSender;

/// The embedded side's handle on its host.
///
/// Holds the association (written once by the first init request) and the
/// channel that carries feature calls back to the host.
#[derive(Debug)]
pub struct EnvelopeClient {
    association: OnceLock<Association>,
    host: ChannelSender,
}

impl EnvelopeClient {
    pub fn new(host: ChannelSender) -> Self {
        Self {
            association: OnceLock::new(),
            host,
        }
    }

    /// Bind this envelope to a host. Only the first association sticks;
    /// returns `false` when one already existed.
    pub fn associate(&self, origin: &str, channel_id: &str) -> bool {
        match self.association.set(Association::new(origin, channel_id)) {
            Ok(()) => {
                tracing::info!(origin = %origin, channel_id = %channel_id, "Envelope associated");
                true
            }
            Err(rejected) => {
                tracing::debug!(
                    kept = %self.association.get().map(ToString::to_string).unwrap_or_default(),
                    rejected = %rejected,
                    "Envelope already associated, ignoring"
                );
                false
            }
        }
    }

    pub fn association(&self) -> Option<&Association> {
        self.association.get()
    }

    /// Call the host and wait for its reply. Fails with
    /// [`BridgeError::NotAssociated`] before the first init request.
    pub async fn call<R: DeserializeOwned>(&self, method: String, args: Vec<Value>) -> Result<R> {
        self.require_association()?;
        self.host.call(method, args).await
    }

    /// Notify the host without waiting.
    pub fn notify(&self, method: String, args: Vec<Value>) -> Result<()> {
        self.require_association()?;
        self.host.notify(method, args)
    }

    fn require_association(&self) -> Result<&Association> {
        self.association.get().ok_or(BridgeError::NotAssociated)
    }
}
