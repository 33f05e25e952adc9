/// Success envelopes shared by the JSON handlers
///
/// - list: `{ "success": true, "data": [...], "count": n }`
/// - item: `{ "success": true, "data": {...} }`
/// - write: `{ "success": true, "message": "...", "data"?: {...} }`
///
/// `count` is derived from `data` at construction, so the two cannot
/// disagree.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ListEnvelope<T> {
    success: bool,
    data: Vec<T>,
    count: usize,
}

impl<T> ListEnvelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemEnvelope<T> {
    success: bool,
    data: T,
}

impl<T> ItemEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageEnvelope<T> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl MessageEnvelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

impl<T> MessageEnvelope<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Bare acknowledgement: `{ "success": true }`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Ack {
    success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
