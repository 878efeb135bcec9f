//! Typed request/response channel between the host and an embedded envelope.
//!
//! A call is a namespaced method name plus positional JSON arguments. Calls
//! that expect an answer carry a `oneshot` reply slot; notifications do not.
//! The receiving side hands calls to an [`ApiRouter`], which picks the
//! feature handler by the method's prefix.
//!
//! ## Method names
//!
//! | Wire name                         | Prefix           | Operation      |
//! |-----------------------------------|------------------|----------------|
//! | `runtimeTools__initRequest`       | `runtimeTools`   | `initRequest`  |
//! | `processDetails__cancelJob`       | `processDetails` | `cancelJob`    |
//! | `cloudEventForm__triggerCloudEvent` | `cloudEventForm` | `triggerCloudEvent` |

pub mod args;
pub mod router;

pub use args::{encode, CallArgs};
pub use router::{ApiHandler, ApiRouter};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::error::{BridgeError, Result};

/// Separates the feature prefix from the operation in a wire method name.
pub const NAMESPACE_SEPARATOR: &str = "__";

/// Build the wire name for `operation` within a feature prefix.
pub fn namespaced(prefix: &str, operation: &str) -> String {
    format!("{prefix}{NAMESPACE_SEPARATOR}{operation}")
}

/// A parsed `prefix__operation` method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodName<'a> {
    prefix: &'a str,
    operation: &'a str,
}

impl<'a> MethodName<'a> {
    pub fn parse(method: &'a str) -> Result<Self> {
        match method.split_once(NAMESPACE_SEPARATOR) {
            Some((prefix, operation)) if !prefix.is_empty() && !operation.is_empty() => {
                Ok(Self { prefix, operation })
            }
            _ => Err(BridgeError::UnknownMethod(method.to_string())),
        }
    }

    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    pub fn operation(&self) -> &'a str {
        self.operation
    }
}

type Reply = oneshot::Sender<Result<Value>>;

/// One message on the channel.
#[derive(Debug)]
pub struct ChannelCall {
    method: String,
    args: Vec<Value>,
    reply: Option<Reply>,
}

impl ChannelCall {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// `false` for fire-and-forget notifications.
    pub fn expects_reply(&self) -> bool {
        self.reply.is_some()
    }

    pub fn into_parts(self) -> (String, Vec<Value>, Responder) {
        (self.method, self.args, Responder(self.reply))
    }
}

/// Reply half of a [`ChannelCall`]. Dropping it without responding makes the
/// caller see [`BridgeError::ChannelClosed`].
#[derive(Debug)]
pub struct Responder(Option<Reply>);

impl Responder {
    pub fn respond(self, result: Result<Value>) {
        if let Some(reply) = self.0 {
            // Caller stopped waiting; nothing to deliver to.
            let _ = reply.send(result);
        }
    }
}

/// Sending half. Cheap to clone; every clone feeds the same receiver.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<ChannelCall>,
}

/// Receiving half, consumed by [`ApiRouter::serve`].
#[derive(Debug)]
pub struct ChannelReceiver {
    rx: mpsc::UnboundedReceiver<ChannelCall>,
}

/// Create a connected sender/receiver pair.
pub fn channel() -> (ChannelSender, ChannelReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSender { tx }, ChannelReceiver { rx })
}

impl ChannelSender {
    /// Send a call and wait for its reply.
    pub async fn request(&self, method: impl Into<String>, args: Vec<Value>) -> Result<Value> {
        let method = method.into();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ChannelCall {
                method: method.clone(),
                args,
                reply: Some(reply_tx),
            })
            .map_err(|_| {
                tracing::warn!(method = %method, "Request on closed channel");
                BridgeError::ChannelClosed
            })?;
        reply_rx.await.map_err(|_| BridgeError::ChannelClosed)?
    }

    /// [`request`](Self::request) and decode the reply.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: impl Into<String>,
        args: Vec<Value>,
    ) -> Result<R> {
        let value = self.request(method, args).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Queue a call without waiting for (or receiving) a reply.
    pub fn notify(&self, method: impl Into<String>, args: Vec<Value>) -> Result<()> {
        let method = method.into();
        self.tx
            .send(ChannelCall {
                method: method.clone(),
                args,
                reply: None,
            })
            .map_err(|_| {
                tracing::warn!(method = %method, "Notification on closed channel");
                BridgeError::ChannelClosed
            })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl ChannelReceiver {
    pub async fn recv(&mut self) -> Option<ChannelCall> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_namespaced_method() {
        let m = MethodName::parse("processDetails__cancelJob").unwrap();
        assert_eq!(m.prefix(), "processDetails");
        assert_eq!(m.operation(), "cancelJob");
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert_eq!(
            MethodName::parse("cancelJob"),
            Err(BridgeError::UnknownMethod("cancelJob".into()))
        );
        assert!(MethodName::parse("__cancelJob").is_err());
        assert!(MethodName::parse("processDetails__").is_err());
    }

    #[test]
    fn namespaced_joins_with_separator() {
        assert_eq!(namespaced("a", "b"), "a__b");
    }

    #[tokio::test]
    async fn request_receives_reply() {
        let (tx, mut rx) = channel();
        tokio::spawn(async move {
            let call = rx.recv().await.unwrap();
            assert!(call.expects_reply());
            assert_eq!(call.method(), "x__echo");
            let (_, args, responder) = call.into_parts();
            responder.respond(Ok(args[0].clone()));
        });
        let out = tx.request("x__echo", vec![json!(42)]).await.unwrap();
        assert_eq!(out, json!(42));
    }

    #[tokio::test]
    async fn request_on_dropped_receiver_is_channel_closed() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(tx.is_closed());
        assert_eq!(
            tx.request("x__y", vec![]).await,
            Err(BridgeError::ChannelClosed)
        );
        assert_eq!(tx.notify("x__y", vec![]), Err(BridgeError::ChannelClosed));
    }

    #[tokio::test]
    async fn dropped_responder_is_channel_closed() {
        let (tx, mut rx) = channel();
        tokio::spawn(async move {
            let call = rx.recv().await.unwrap();
            drop(call);
        });
        assert_eq!(
            tx.request("x__y", vec![]).await,
            Err(BridgeError::ChannelClosed)
        );
    }

    #[tokio::test]
    async fn notify_carries_no_reply_slot() {
        let (tx, mut rx) = channel();
        tx.notify("x__open", vec![json!("id-1")]).unwrap();
        let call = rx.recv().await.unwrap();
        assert!(!call.expects_reply());
        assert_eq!(call.args(), &[json!("id-1")]);
    }
}
