use serde::{Deserialize, Serialize};

/// Diagnostics that are not tied to a workflow step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    Warning {
        message: String,
        /// User-facing explanation of the underlying failure
        context: Option<String>,
    },

    /// Low-level trace such as an outgoing request
    DebugLog {
        message: String,
    },
}

impl GeneralEvent {
    pub fn warning_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::DebugLog {
            message: message.into(),
        }
    }
}
