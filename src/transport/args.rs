use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{BridgeError, Result};

/// Encode one positional argument (or a reply) as JSON.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Positional arguments of one call, decoded in order.
#[derive(Debug)]
pub struct CallArgs {
    method: String,
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl CallArgs {
    pub fn new(method: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            values: values.into_iter(),
            position: 0,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Decode the next argument.
    pub fn next<T: DeserializeOwned>(&mut self) -> Result<T> {
        let position = self.position;
        let value = self
            .values
            .next()
            .ok_or_else(|| self.invalid(format!("missing argument #{position}")))?;
        self.position += 1;
        serde_json::from_value(value).map_err(|e| self.invalid(format!("argument #{position}: {e}")))
    }

    /// Fail if arguments remain.
    pub fn finish(self) -> Result<()> {
        let extra = self.values.len();
        if extra == 0 {
            Ok(())
        } else {
            Err(self.invalid(format!(
                "expected {} argument(s), got {}",
                self.position,
                self.position + extra
            )))
        }
    }

    fn invalid(&self, message: String) -> BridgeError {
        BridgeError::InvalidArguments {
            method: self.method.clone(),
            message,
        }
    }
}
