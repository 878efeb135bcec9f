//! Envelope/channel bridge for the runtime tools console.
//!
//! A host application embeds feature views (process details, cloud event
//! form) in isolated envelopes. The two sides talk over a typed message
//! channel ([`transport`]):
//!
//! - the host initializes the envelope once with an [`InitArgs`] bundle
//!   ([`envelope::EnvelopeServer`] → [`envelope::EnvelopeApiImpl`])
//! - the embedded view calls domain operations, which the host answers with
//!   its own drivers ([`process_details`], [`cloud_event_form`])

pub mod cloud_event_form;
pub mod config;
pub mod envelope;
pub mod error;
pub mod process_details;
pub mod transport;

pub use config::HostConfig;
pub use console_types::{Association, InitArgs};
pub use envelope::{EnvelopeApi, EnvelopeApiImpl, EnvelopeClient, EnvelopeServer, EnvelopeView};
pub use error::{BridgeError, Result};
pub use transport::{channel, ApiHandler, ApiRouter, ChannelReceiver, ChannelSender};
