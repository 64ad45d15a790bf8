//! 跳棋共享协议库
//!
//! 包含:
//! - 棋子、棋盘、坐标等核心数据结构
//! - 走法验证与胜负判定
//! - 消息类型定义 (ClientMessage, ServerMessage) 与 JSON 编解码
//! - 传输层抽象 (Connector, Connection, Listener traits)
//! - 帧编解码 (FrameReader, FrameWriter)

mod board;
pub mod codec;
mod constants;
mod error;
mod message;
mod moves;
mod outcome;
mod piece;
mod transport;

pub use board::Board;
pub use constants::*;
pub use error::{MoveError, ProtocolError, Result};
pub use message::{Cell, ClientMessage, MoveDescriptor, ServerMessage};
pub use moves::{Move, MoveEffect, MoveValidator};
pub use outcome::has_won;
pub use piece::{Color, Piece, Square};
pub use transport::{
    Connection, Connector, Listener,
    TcpConnection, TcpConnector, TcpListener,
    NetworkConfig,
    FrameReader, FrameWriter,
};
