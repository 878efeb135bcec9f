use console_types::{Association, InitArgs};
use uuid::Uuid;

use super::api::{ENVELOPE_PREFIX, INIT_REQUEST};
use crate::error::Result;
use crate::transport::{encode, namespaced, ChannelSender};

/// Host-side handle on one embedded envelope.
///
/// Owns the association the envelope will be bound to and the channel the
/// init request travels on.
#[derive(Debug, Clone)]
pub struct EnvelopeServer {
    envelope: ChannelSender,
    association: Association,
}

impl EnvelopeServer {
    /// New server for `origin` with a freshly generated channel id.
    pub fn new(envelope: ChannelSender, origin: impl Into<String>) -> Self {
        Self::with_association(
            envelope,
            Association::new(origin, Uuid::new_v4().to_string()),
        )
    }

    pub fn with_association(envelope: ChannelSender, association: Association) -> Self {
        Self {
            envelope,
            association,
        }
    }

    pub fn association(&self) -> &Association {
        &self.association
    }

    /// Send the init request. Safe to resend (e.g. after a timeout on the
    /// host side): the envelope ignores every init after the first.
    pub async fn send_init_request(&self, init_args: &InitArgs) -> Result<()> {
        tracing::debug!(
            association = %self.association,
            navigation_target = %init_args.navigation_target,
            "Sending init request"
        );
        self.envelope
            .request(
                namespaced(ENVELOPE_PREFIX, INIT_REQUEST),
                vec![encode(&self.association)?, encode(init_args)?],
            )
            .await
            .map(|_| ())
    }
}
