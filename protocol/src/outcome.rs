//! 胜负判定

use crate::board::Board;
use crate::piece::Color;

/// 棋盘上不存在任何对方棋子时，该方获胜
pub fn has_won(board: &Board, color: Color) -> bool {
    board.count(color.opponent()) == 0
}
