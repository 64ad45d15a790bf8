//! 协议常量定义

use std::time::Duration;

/// 协议版本号
pub const PROTOCOL_VERSION: u8 = 1;

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 8;

/// 每方初始棋子数
pub const PIECES_PER_SIDE: usize = 12;

/// 每场对局的玩家数
pub const PLAYERS_IN_SESSION: usize = 2;

/// 消息帧最大大小
pub const MAX_FRAME_SIZE: usize = 65536;

/// 默认监听地址
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 9527;

/// 连接超时（秒）
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 连接超时 Duration
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(CONNECT_TIMEOUT_SECS);
