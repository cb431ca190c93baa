pub mod attachment;
pub mod error;
pub mod gateway;
pub mod rpc;
pub mod types;

#[cfg(test)]
pub(crate) mod test_util;

pub use error::{GatewayError, InitError, ParseError, RpcError};
pub use gateway::{GatewayConfig, NodeGateway};
