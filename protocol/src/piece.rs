//! 棋子与坐标定义

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;

/// 执棋方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// 白方（先手，占据 1-3 行）
    #[serde(rename = "w")]
    White,
    /// 黑方（后手，占据 6-8 行）
    #[serde(rename = "b")]
    Black,
}

impl Color {
    /// 获取对方
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 升变行：白方到达第 8 行，黑方到达第 1 行
    pub fn promotion_rank(&self) -> i32 {
        match self {
            Color::White => BOARD_SIZE as i32,
            Color::Black => 1,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    /// 是否已升变为王
    pub king: bool,
}

impl Piece {
    /// 创建普通棋子
    pub const fn man(color: Color) -> Self {
        Self { color, king: false }
    }

    /// 创建王棋
    pub const fn king(color: Color) -> Self {
        Self { color, king: true }
    }

    /// 线上编码: "w" / "b" / "wK" / "bK"
    pub fn code(&self) -> &'static str {
        match (self.color, self.king) {
            (Color::White, false) => "w",
            (Color::White, true) => "wK",
            (Color::Black, false) => "b",
            (Color::Black, true) => "bK",
        }
    }

    /// 从线上编码解析（空串不是棋子）
    pub fn from_code(code: &str) -> Option<Piece> {
        match code {
            "w" => Some(Piece::man(Color::White)),
            "wK" => Some(Piece::king(Color::White)),
            "b" => Some(Piece::man(Color::Black)),
            "bK" => Some(Piece::king(Color::Black)),
            _ => None,
        }
    }
}

/// 棋盘坐标
///
/// `rank` 为行 (1-8)，`file` 为列 (a-h 映射为 1-8)。
/// 来自客户端的坐标可能越界，越界与否由 [`Square::is_valid`] 判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub rank: i32,
    pub file: i32,
}

impl Square {
    /// 创建坐标（不检查边界）
    pub const fn new_unchecked(rank: i32, file: i32) -> Self {
        Self { rank, file }
    }

    /// 检查坐标是否在棋盘内
    pub fn is_valid(&self) -> bool {
        let range = 1..=BOARD_SIZE as i32;
        range.contains(&self.rank) && range.contains(&self.file)
    }

    /// 列字母转换为列号，非 a-h 返回 0（即越界）
    pub fn file_from_letter(letter: &str) -> i32 {
        match letter.as_bytes() {
            [c @ b'a'..=b'h'] => (c - b'a') as i32 + 1,
            _ => 0,
        }
    }

    /// 列号转换为字母
    pub fn file_letter(&self) -> Option<char> {
        (1..=BOARD_SIZE as i32)
            .contains(&self.file)
            .then(|| (b'a' + (self.file - 1) as u8) as char)
    }

    /// 转换为数组索引（行优先，第 1 行在前）
    ///
    /// 越界坐标属于调用方的前置条件错误，直接 panic。
    pub fn to_index(&self) -> usize {
        assert!(self.is_valid(), "square out of board: {}", self);
        (self.rank as usize - 1) * BOARD_SIZE + (self.file as usize - 1)
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        (index < BOARD_SIZE * BOARD_SIZE).then(|| Self {
            rank: (index / BOARD_SIZE) as i32 + 1,
            file: (index % BOARD_SIZE) as i32 + 1,
        })
    }

    /// 所有 64 个格子，行优先
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE * BOARD_SIZE).filter_map(Square::from_index)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.file_letter() {
            Some(letter) => write!(f, "{}{}", letter, self.rank),
            None => write!(f, "({}, {})", self.rank, self.file),
        }
    }
}
