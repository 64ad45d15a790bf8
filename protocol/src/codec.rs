//! JSON 消息编解码

use serde::Serialize;
use serde_json::Value;

use crate::error::{ProtocolError, Result};
use crate::message::{ClientMessage, ServerMessage};

/// 解码客户端消息
///
/// 负载必须是 UTF-8 编码的 JSON 对象，且 `type` 字段为已知类型。
pub fn decode(payload: &[u8]) -> Result<ClientMessage> {
    let text = std::str::from_utf8(payload).map_err(|_| ProtocolError::WrongDataType)?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::MalformedJson(e.to_string()))?;

    let kind = match value.as_object().ok_or(ProtocolError::WrongDataType)?.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(other) => other.to_string(),
        None => "undefined".to_string(),
    };
    if !ClientMessage::TYPES.contains(&kind.as_str()) {
        return Err(ProtocolError::UnknownMessageType(kind));
    }

    serde_json::from_value(value).map_err(|e| ProtocolError::InvalidMessage {
        kind,
        reason: e.to_string(),
    })
}

/// 解码服务端消息（客户端与测试使用）
pub fn decode_server(payload: &[u8]) -> Result<ServerMessage> {
    Ok(serde_json::from_slice(payload)?)
}

/// 编码任意消息为 JSON 文本
pub fn encode<M: Serialize>(msg: &M) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(msg)?)
}
