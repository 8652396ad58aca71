//! Uniform `{status, ...payload}` response wrapper.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Outcome reported in the `status` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Failed,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
        }
    }
}

/// JSON object with a default `status` key merged with caller-supplied keys.
///
/// Extra keys are merged after `status`, so an extra `status` overrides it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    status: Status,
    extra: Map<String, Value>,
}

impl Envelope {
    /// `{"status": "ok"}`
    pub fn success() -> Self {
        Self {
            status: Status::Ok,
            extra: Map::new(),
        }
    }

    /// `{"status": "failed"}`
    pub fn failure() -> Self {
        Self {
            status: Status::Failed,
            extra: Map::new(),
        }
    }

    /// `{"status": "failed", ...extra}`
    pub fn failure_with(extra: Map<String, Value>) -> Self {
        Self {
            extra,
            ..Self::failure()
        }
    }

    /// Add (or replace) a single key
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Render the merged JSON object
    pub fn into_value(self) -> Value {
        let mut body = Map::new();
        body.insert("status".to_string(), Value::from(self.status.as_str()));
        body.extend(self.extra);
        Value::Object(body)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self.into_value()).into_response()
    }
}
