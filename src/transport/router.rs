use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{namespaced, CallArgs, ChannelReceiver, MethodName};
use crate::error::{BridgeError, Result};

/// One feature's side of the channel: decodes wire calls and invokes the
/// typed API behind them.
#[async_trait]
pub trait ApiHandler: Send + Sync {
    /// Feature prefix this handler answers for (e.g. `processDetails`).
    fn prefix(&self) -> &'static str;

    /// Handle `operation` (the part after the prefix).
    async fn handle(&self, operation: &str, args: CallArgs) -> Result<Value>;
}

/// Routes namespaced calls to the registered feature handlers.
///
/// Several features share one transport; the prefix keeps their operation
/// names apart.
#[derive(Clone, Default)]
pub struct ApiRouter {
    handlers: HashMap<&'static str, Arc<dyn ApiHandler>>,
}

impl ApiRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ApiHandler>) -> Result<()> {
        let prefix = handler.prefix();
        if self.handlers.contains_key(prefix) {
            return Err(BridgeError::DuplicatePrefix(prefix.to_string()));
        }
        self.handlers.insert(prefix, handler);
        Ok(())
    }

    pub fn with_handler(mut self, handler: Arc<dyn ApiHandler>) -> Result<Self> {
        self.register(handler)?;
        Ok(self)
    }

    /// Registered prefixes, sorted.
    pub fn prefixes(&self) -> Vec<&'static str> {
        let mut prefixes: Vec<_> = self.handlers.keys().copied().collect();
        prefixes.sort_unstable();
        prefixes
    }

    /// Dispatch one wire call to its handler.
    pub async fn dispatch(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        let name = MethodName::parse(method)?;
        let handler = self.handlers.get(name.prefix()).ok_or_else(|| {
            tracing::warn!(method = %method, "No handler registered for prefix");
            BridgeError::UnknownMethod(method.to_string())
        })?;
        tracing::debug!(
            prefix = name.prefix(),
            operation = name.operation(),
            argc = args.len(),
            "Dispatching channel call"
        );
        handler
            .handle(name.operation(), CallArgs::new(method, args))
            .await
    }

    /// Serve calls until every sender is dropped.
    ///
    /// Each call runs on its own task: calls are not serialized and may
    /// complete in any order.
    pub async fn serve(self: Arc<Self>, mut calls: ChannelReceiver) {
        while let Some(call) = calls.recv().await {
            let router = Arc::clone(&self);
            tokio::spawn(async move {
                let (method, args, responder) = call.into_parts();
                let result = router.dispatch(&method, args).await;
                if let Err(e) = &result {
                    tracing::debug!(method = %method, error = %e, "Channel call failed");
                }
                responder.respond(result);
            });
        }
        tracing::debug!(prefixes = ?self.prefixes(), "ApiRouter: channel closed, exiting");
    }
}

/// Error for an operation a handler does not know.
pub fn unknown_operation(prefix: &str, operation: &str) -> BridgeError {
    BridgeError::UnknownMethod(namespaced(prefix, operation))
}
