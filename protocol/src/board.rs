//! 棋盘状态

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::BOARD_SIZE;
use crate::piece::{Color, Piece, Square};

/// 棋盘
///
/// 固定 8x8，索引为 (rank - 1) * 8 + (file - 1)。
/// 线上格式为 8 行 x 8 列的字符串数组，第 0 行对应第 1 行（白方底线）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; BOARD_SIZE * BOARD_SIZE],
        }
    }

    /// 创建初始棋盘
    ///
    /// 白方占 1-3 行，黑方占 6-8 行，只使用行列奇偶相同的格子。
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for square in Square::all() {
            if square.rank % 2 != square.file % 2 {
                continue;
            }
            let color = match square.rank {
                1..=3 => Color::White,
                6..=8 => Color::Black,
                _ => continue,
            };
            board.set(square, Some(Piece::man(color)));
        }

        board
    }

    /// 获取指定位置的棋子
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.to_index()]
    }

    /// 设置指定位置的棋子（不检查规则）
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.to_index()] = piece;
    }

    /// 指定方的棋子数
    pub fn count(&self, color: Color) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|piece| piece.color == color)
            .count()
    }

    /// 棋盘上的棋子总数
    pub fn total(&self) -> usize {
        self.squares.iter().flatten().count()
    }

    /// 按行输出线上编码
    pub fn rows(&self) -> Vec<Vec<&'static str>> {
        self.squares
            .chunks(BOARD_SIZE)
            .map(|row| row.iter().map(|cell| cell.map_or("", |p| p.code())).collect())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<String>>::deserialize(deserializer)?;
        if rows.len() != BOARD_SIZE || rows.iter().any(|row| row.len() != BOARD_SIZE) {
            return Err(D::Error::custom("game field must be 8x8"));
        }

        let squares = rows
            .iter()
            .flatten()
            .map(|cell| match cell.as_str() {
                "" => Ok(None),
                code => Piece::from_code(code)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("unknown cell \"{code}\""))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { squares })
    }
}
