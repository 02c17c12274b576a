use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{DeviceCommand, RequestId, RequestIdCounter};

/// JSON-RPC protocol version written into every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Named request parameters.
pub type Params = Map<String, Value>;

/// One JSON-RPC 2.0 request as written to the device.
///
/// Serializes to exactly
/// `{"jsonrpc":"2.0","method":<string>,"params":<object>,"id":<integer>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Params,
    id: RequestId,
}

impl JsonRpcRequest {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn version(&self) -> &str {
        &self.jsonrpc
    }
}

/// Builds requests with ids drawn from a shared [`RequestIdCounter`].
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    ids: Arc<RequestIdCounter>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds requests from an externally owned counter.
    pub fn with_counter(ids: Arc<RequestIdCounter>) -> Self {
        Self { ids }
    }

    /// Builds a request, consuming exactly one id.
    ///
    /// Missing params are sent as an empty object.
    pub fn build(&self, method: impl Into<String>, params: Option<Params>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: params.unwrap_or_default(),
            id: self.ids.next_id(),
        }
    }

    /// Builds the request a [`DeviceCommand`] maps to.
    pub fn build_command(&self, command: DeviceCommand) -> JsonRpcRequest {
        self.build(command.method(), Some(command.params()))
    }

    pub fn counter(&self) -> &RequestIdCounter {
        &self.ids
    }
}
