//! 错误类型定义

use thiserror::Error;

/// 走子规则错误
///
/// `Display` 文本直接作为 `incorrectRequest` 的原因发送给客户端。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// 不是你的回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 坐标越界
    #[error("Out of field")]
    OutOfField,

    /// 起点与终点相同
    #[error("You have to move")]
    NullMove,

    /// 起点不是自己的棋子或终点已被占用
    #[error("Incorrect request: origin must hold your piece and destination must be empty")]
    IllegalOccupancy,

    /// 非斜线走子
    #[error("Incorrect request: move must be diagonal")]
    NotDiagonal,

    /// 对局未在进行中
    #[error("Game is not in progress")]
    GameNotActive,
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 负载不是 UTF-8 文本或不是 JSON 对象
    #[error("Wrong data type")]
    WrongDataType,

    /// 无法解析的 JSON
    #[error("Can't parse JSON data: {0}")]
    MalformedJson(String),

    /// 未知的消息类型
    #[error("Unknown message type: \"{0}\"")]
    UnknownMessageType(String),

    /// 类型已知但字段不合法
    #[error("Invalid \"{kind}\" message: {reason}")]
    InvalidMessage { kind: String, reason: String },

    /// 协议版本不匹配
    #[error("Protocol version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    /// 帧大小超限
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// 连接超时
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// 连接已关闭
    #[error("Connection closed")]
    ConnectionClosed,

    /// 走子规则错误
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_reasons() {
        assert_eq!(MoveError::NotYourTurn.to_string(), "Not your turn");
        assert_eq!(MoveError::OutOfField.to_string(), "Out of field");
        assert_eq!(MoveError::NullMove.to_string(), "You have to move");
        assert_eq!(
            ProtocolError::from(MoveError::NotDiagonal).to_string(),
            MoveError::NotDiagonal.to_string()
        );
    }
}
