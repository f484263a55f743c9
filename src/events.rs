use serde::{Deserialize, Serialize};

/// Lifecycle of one running operation.
///
/// Per operation the order is `Starting`, then `Advanced` with strictly
/// increasing `completed` up to `total`, then `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Starting { total: usize },
    Advanced { completed: usize },
    Finished,
}

/// User-facing outcome of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEvent {
    pub title: String,
    pub message: String,
    pub success: bool,
}

impl ResultEvent {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            success: false,
        }
    }
}

/// Element of the merged event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stream", rename_all = "snake_case")]
pub enum Event {
    Progress(ProgressEvent),
    Result(ResultEvent),
}
