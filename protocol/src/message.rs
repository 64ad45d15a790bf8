//! 消息类型定义
//!
//! 所有消息均为带 `type` 判别字段的 JSON 对象。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Color, Square};

/// 线上坐标：`num` 为行号，`let` 为列字母
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub num: i64,
    #[serde(rename = "let")]
    pub letter: String,
}

impl Cell {
    /// 转换为棋盘坐标，非法的行号或列字母会得到越界坐标
    pub fn to_square(&self) -> Square {
        let rank = i32::try_from(self.num).unwrap_or(0);
        Square::new_unchecked(rank, Square::file_from_letter(&self.letter))
    }
}

impl From<Square> for Cell {
    fn from(square: Square) -> Self {
        Self {
            num: square.rank as i64,
            letter: square.file_letter().map(String::from).unwrap_or_default(),
        }
    }
}

/// 客户端提交的走法描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDescriptor {
    /// 客户端界面状态，服务端忽略
    #[serde(default)]
    pub clicked: bool,
    /// 客户端声明的颜色，服务端以分配的颜色为准
    pub color: Color,
    pub from: Cell,
    pub to: Cell,
    /// 客户端声明的升变意图
    #[serde(default)]
    pub king: bool,
}

impl MoveDescriptor {
    /// 转换为内部走法
    pub fn to_move(&self) -> Move {
        Move {
            from: self.from.to_square(),
            to: self.to.to_square(),
            promote: self.king,
        }
    }
}

/// 客户端发送给服务端的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// 走棋
    PlayerMove { r#move: MoveDescriptor },
    /// 再来一局
    RepeatGame,
    /// 客户端上报的错误请求（原样回送）
    IncorrectRequest { message: String },
    /// 客户端认为服务端响应有误（仅记录日志）
    IncorrectResponse { message: String },
}

impl ClientMessage {
    /// 所有合法的客户端消息类型
    pub const TYPES: [&'static str; 4] = [
        "playerMove",
        "repeatGame",
        "incorrectRequest",
        "incorrectResponse",
    ];
}

/// 服务端发送给客户端的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// 游戏开始
    GameStarted {
        my_turn: bool,
        game_field: Board,
        color: Color,
    },
    /// 走棋完成，轮换走子方
    ChangePlayer {
        my_turn: bool,
        game_field: Board,
        color: Color,
    },
    /// 游戏结束
    GameResult { win: bool },
    /// 对局中止
    GameAborted,
    /// 请求被拒绝
    IncorrectRequest { message: String },
}

impl ServerMessage {
    /// 构造拒绝消息
    pub fn incorrect(reason: impl ToString) -> Self {
        ServerMessage::IncorrectRequest {
            message: reason.to_string(),
        }
    }
}
