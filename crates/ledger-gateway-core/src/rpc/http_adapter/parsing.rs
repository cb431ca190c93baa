use serde::de::DeserializeOwned;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{GatewayError, RpcError};

/// Decode a JSON-RPC `result` into a typed value.
pub(super) fn decode_result<T: DeserializeOwned>(
    method: &str,
    raw: serde_json::Value,
) -> Result<T, GatewayError> {
    serde_json::from_value(raw).map_err(|e| {
        RpcError::InvalidResponse(format!("invalid {method} result: {e}")).into()
    })
}

/// Parse the node clock reading.
///
/// Nodes report an RFC 3339 timestamp; a bare integer is accepted as
/// milliseconds since the Unix epoch.
pub(super) fn parse_node_time(raw: &serde_json::Value) -> Result<OffsetDateTime, GatewayError> {
    match raw {
        serde_json::Value::String(s) => OffsetDateTime::parse(s, &Rfc3339).map_err(|e| {
            RpcError::InvalidResponse(format!("invalid node time `{s}`: {e}")).into()
        }),
        serde_json::Value::Number(n) => {
            let millis = n.as_i64().ok_or_else(|| {
                GatewayError::from(RpcError::InvalidResponse(format!(
                    "invalid node time `{n}`"
                )))
            })?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).map_err(
                |e| RpcError::InvalidResponse(format!("node time out of range: {e}")).into(),
            )
        }
        other => Err(RpcError::InvalidResponse(format!(
            "expected node time string, got: {other}"
        ))
        .into()),
    }
}

/// Attachment contents travel as a hex string.
pub(super) fn parse_attachment_bytes(raw: &serde_json::Value) -> Result<Vec<u8>, GatewayError> {
    let encoded = raw.as_str().ok_or_else(|| {
        GatewayError::from(RpcError::InvalidResponse(
            "expected hex-encoded attachment contents".to_owned(),
        ))
    })?;
    hex::decode(encoded).map_err(|e| {
        RpcError::InvalidResponse(format!("invalid attachment hex: {e}")).into()
    })
}
