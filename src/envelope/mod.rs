//! Envelope: the embedded side of the bridge, plus the host-side server
//! that initializes it.

pub mod api;
pub mod client;
pub mod server;
pub mod view;

pub use api::{EnvelopeApi, EnvelopeApiImpl, InitState, ENVELOPE_PREFIX, INIT_REQUEST};
pub use client::EnvelopeClient;
pub use server::EnvelopeServer;
pub use view::{pending_view, EnvelopeView, PendingView, ReadyView, ViewDelegate, ViewSlot};
