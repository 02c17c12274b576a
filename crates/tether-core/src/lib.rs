//! JSON-RPC request model, id allocation and device command table for tether.

pub mod commands;
pub mod env;
pub mod errors;
pub mod ids;
pub mod protocol;
pub mod reply;

pub use commands::DeviceCommand;
pub use env::{PORT_ENV, default_port};
pub use errors::ReplyError;
pub use ids::{RequestId, RequestIdCounter};
pub use protocol::{JSONRPC_VERSION, JsonRpcRequest, Params, RequestBuilder};
pub use reply::classify_reply;
