//! 走法验证

use crate::board::Board;
use crate::error::MoveError;
use crate::piece::{Color, Piece, Square};

/// 走法请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// 起始位置
    pub from: Square,
    /// 目标位置
    pub to: Square,
    /// 客户端声明的升变意图，仅供参考，服务端自行判定
    pub promote: bool,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promote: false,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 已验证走法对棋盘的影响
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEffect {
    pub from: Square,
    pub to: Square,
    /// 落子后的棋子（可能已升变）
    pub piece: Piece,
    /// 起点与终点之间被清空的格子
    pub cleared: Vec<Square>,
    /// 本次走子是否触发升变
    pub promoted: bool,
}

impl MoveEffect {
    /// 将走法作用到棋盘上
    pub fn apply(&self, board: &mut Board) {
        for &square in &self.cleared {
            board.set(square, None);
        }
        board.set(self.from, None);
        board.set(self.to, Some(self.piece));
    }
}

/// 走法验证器
pub struct MoveValidator;

impl MoveValidator {
    /// 验证走法并计算其效果
    ///
    /// 检查依次为：回合、边界、空走、占位、斜线，遇到第一个失败即返回。
    pub fn validate(
        board: &Board,
        mover: Color,
        current_turn: Color,
        from: Square,
        to: Square,
    ) -> Result<MoveEffect, MoveError> {
        if mover != current_turn {
            return Err(MoveError::NotYourTurn);
        }

        if !from.is_valid() || !to.is_valid() {
            return Err(MoveError::OutOfField);
        }

        if from == to {
            return Err(MoveError::NullMove);
        }

        let piece = match board.get(from) {
            Some(piece) if piece.color == mover && board.get(to).is_none() => piece,
            _ => return Err(MoveError::IllegalOccupancy),
        };

        let d_rank = to.rank - from.rank;
        let d_file = to.file - from.file;
        if d_rank.abs() != d_file.abs() {
            return Err(MoveError::NotDiagonal);
        }

        // 中间格子无条件清空，不检查是否有对方棋子
        let cleared = (1..d_rank.abs())
            .map(|step| {
                Square::new_unchecked(
                    from.rank + step * d_rank.signum(),
                    from.file + step * d_file.signum(),
                )
            })
            .collect();

        let promoted = !piece.king && to.rank == piece.color.promotion_rank();
        let piece = Piece {
            king: piece.king || promoted,
            ..piece
        };

        Ok(MoveEffect {
            from,
            to,
            piece,
            cleared,
            promoted,
        })
    }

    /// 验证并执行走法
    pub fn play(
        board: &mut Board,
        mover: Color,
        current_turn: Color,
        mv: Move,
    ) -> Result<MoveEffect, MoveError> {
        let effect = Self::validate(board, mover, current_turn, mv.from, mv.to)?;
        effect.apply(board);
        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(rank: i32, file: i32) -> Square {
        Square::new_unchecked(rank, file)
    }

    #[test]
    fn test_simple_forward_move() {
        let mut board = Board::initial();
        let effect =
            MoveValidator::play(&mut board, Color::White, Color::White, Move::new(sq(3, 3), sq(4, 4)))
                .unwrap();

        assert!(effect.cleared.is_empty());
        assert!(!effect.promoted);
        assert_eq!(board.get(sq(3, 3)), None);
        assert_eq!(board.get(sq(4, 4)), Some(Piece::man(Color::White)));
        assert_eq!(board.total(), 24);
    }

    #[test]
    fn test_check_order() {
        let board = Board::initial();

        // 回合检查优先于其他所有检查
        assert_eq!(
            MoveValidator::validate(&board, Color::Black, Color::White, sq(0, 0), sq(0, 0)),
            Err(MoveError::NotYourTurn)
        );
        // 越界检查优先于空走检查
        assert_eq!(
            MoveValidator::validate(&board, Color::White, Color::White, sq(9, 1), sq(9, 1)),
            Err(MoveError::OutOfField)
        );
        assert_eq!(
            MoveValidator::validate(&board, Color::White, Color::White, sq(3, 3), sq(3, 3)),
            Err(MoveError::NullMove)
        );
        // 占位检查优先于斜线检查
        assert_eq!(
            MoveValidator::validate(&board, Color::White, Color::White, sq(4, 4), sq(4, 6)),
            Err(MoveError::IllegalOccupancy)
        );
        assert_eq!(
            MoveValidator::validate(&board, Color::White, Color::White, sq(3, 3), sq(5, 4)),
            Err(MoveError::NotDiagonal)
        );
    }

    #[test]
    fn test_illegal_occupancy() {
        let board = Board::initial();

        // 起点是对方棋子
        assert_eq!(
            MoveValidator::validate(&board, Color::White, Color::White, sq(6, 2), sq(5, 1)),
            Err(MoveError::IllegalOccupancy)
        );
        // 终点已被占用
        assert_eq!(
            MoveValidator::validate(&board, Color::White, Color::White, sq(2, 2), sq(3, 3)),
            Err(MoveError::IllegalOccupancy)
        );
    }

    #[test]
    fn test_non_diagonal_rejected() {
        let mut board = Board::empty();
        board.set(sq(4, 4), Some(Piece::man(Color::White)));

        for to in Square::all() {
            let d_rank = (to.rank - 4).abs();
            let d_file = (to.file - 4).abs();
            if to == sq(4, 4) || d_rank == d_file {
                continue;
            }
            assert_eq!(
                MoveValidator::validate(&board, Color::White, Color::White, sq(4, 4), to),
                Err(MoveError::NotDiagonal),
                "{to}"
            );
        }
    }

    #[test]
    fn test_intermediate_squares_cleared_unconditionally() {
        let mut board = Board::empty();
        board.set(sq(1, 1), Some(Piece::man(Color::White)));
        board.set(sq(2, 2), Some(Piece::man(Color::Black)));
        // 己方棋子同样会被清除
        board.set(sq(3, 3), Some(Piece::man(Color::White)));
        board.set(sq(7, 7), Some(Piece::man(Color::Black)));

        let effect =
            MoveValidator::play(&mut board, Color::White, Color::White, Move::new(sq(1, 1), sq(5, 5)))
                .unwrap();

        assert_eq!(effect.cleared, vec![sq(2, 2), sq(3, 3), sq(4, 4)]);
        assert_eq!(board.get(sq(2, 2)), None);
        assert_eq!(board.get(sq(3, 3)), None);
        assert_eq!(board.get(sq(5, 5)), Some(Piece::man(Color::White)));
        assert_eq!(board.total(), 2);
    }

    #[test]
    fn test_clearing_backwards_diagonal() {
        let mut board = Board::empty();
        board.set(sq(6, 2), Some(Piece::man(Color::Black)));
        board.set(sq(5, 3), Some(Piece::man(Color::White)));

        let effect =
            MoveValidator::play(&mut board, Color::Black, Color::Black, Move::new(sq(6, 2), sq(4, 4)))
                .unwrap();

        assert_eq!(effect.cleared, vec![sq(5, 3)]);
        assert_eq!(board.count(Color::White), 0);
        assert_eq!(board.count(Color::Black), 1);
    }

    #[test]
    fn test_promotion() {
        let mut board = Board::empty();
        board.set(sq(7, 2), Some(Piece::man(Color::White)));
        board.set(sq(2, 2), Some(Piece::man(Color::Black)));

        let effect =
            MoveValidator::play(&mut board, Color::White, Color::White, Move::new(sq(7, 2), sq(8, 1)))
                .unwrap();
        assert!(effect.promoted);
        assert_eq!(board.get(sq(8, 1)), Some(Piece::king(Color::White)));

        let effect =
            MoveValidator::play(&mut board, Color::Black, Color::Black, Move::new(sq(2, 2), sq(1, 3)))
                .unwrap();
        assert!(effect.promoted);
        assert_eq!(board.get(sq(1, 3)), Some(Piece::king(Color::Black)));
    }

    #[test]
    fn test_king_unaffected_by_promotion() {
        let mut board = Board::empty();
        board.set(sq(7, 2), Some(Piece::king(Color::White)));

        let effect =
            MoveValidator::play(&mut board, Color::White, Color::White, Move::new(sq(7, 2), sq(8, 3)))
                .unwrap();
        assert!(!effect.promoted);
        assert_eq!(board.get(sq(8, 3)), Some(Piece::king(Color::White)));

        // 白方到达第 1 行不升变
        let mut board = Board::empty();
        board.set(sq(2, 2), Some(Piece::man(Color::White)));
        MoveValidator::play(&mut board, Color::White, Color::White, Move::new(sq(2, 2), sq(1, 1)))
            .unwrap();
        assert_eq!(board.get(sq(1, 1)), Some(Piece::man(Color::White)));
    }

    #[test]
    fn test_piece_counts_monotonic() {
        let mut board = Board::initial();
        let moves = [
            (Color::White, sq(3, 3), sq(4, 4)),
            (Color::Black, sq(6, 6), sq(5, 5)),
            (Color::White, sq(4, 4), sq(6, 6)),
            (Color::Black, sq(7, 7), sq(5, 5)),
        ];

        for (color, from, to) in moves {
            let total = board.total();
            let own = board.count(color);
            MoveValidator::play(&mut board, color, color, Move::new(from, to)).unwrap();
            assert!(board.total() <= total);
            assert!(board.count(color) >= own);
        }
        assert_eq!(board.total(), 22);
    }

    #[test]
    fn test_rejected_move_leaves_board_untouched() {
        let mut board = Board::initial();
        let before = board.clone();

        let result =
            MoveValidator::play(&mut board, Color::Black, Color::White, Move::new(sq(6, 2), sq(5, 1)));
        assert_eq!(result, Err(MoveError::NotYourTurn));
        assert_eq!(board, before);
    }
}
