//! 对局引擎
//!
//! 单场对局的状态机。处理函数均为同步函数：
//! 输入 (会话, 消息)，修改会话并返回待发送的消息，不做任何 IO。

use std::collections::HashMap;

use tracing::{debug, info, warn};

use protocol::{
    has_won, Board, ClientMessage, Color, MoveDescriptor, MoveError, MoveValidator,
    ProtocolError, ServerMessage,
};

/// 参与者 ID
pub type ParticipantId = u64;

/// 对局生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// 正在建立棋盘
    Initializing,
    /// 对局进行中
    Active,
    /// 已分出胜负，可再来一局
    Finished,
    /// 已中止（终态）
    Aborted,
}

/// 发往某个参与者的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub to: ParticipantId,
    pub message: ServerMessage,
}

/// 待发送的消息
#[derive(Debug, Default)]
struct Outbox {
    messages: Vec<Envelope>,
}

impl Outbox {
    fn send(&mut self, to: ParticipantId, message: ServerMessage) {
        self.messages.push(Envelope { to, message });
    }

    fn into_messages(self) -> Vec<Envelope> {
        self.messages
    }
}

/// 对局会话
pub struct Session {
    /// 按配对顺序排列的参与者，第一位执白
    participants: Vec<ParticipantId>,
    /// 参与者 -> 颜色
    colors: HashMap<ParticipantId, Color>,
    /// 中止后释放
    board: Option<Board>,
    turn: Color,
    state: Lifecycle,
}

impl Session {
    /// 创建新会话（尚未开始）
    pub fn new(first: ParticipantId, second: ParticipantId) -> Self {
        Self {
            participants: vec![first, second],
            colors: HashMap::new(),
            board: None,
            turn: Color::White,
            state: Lifecycle::Initializing,
        }
    }

    /// 当前生命周期状态
    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// 当前走子方
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// 当前棋盘，中止后为 None
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// 参与者分配到的颜色
    pub fn color_of(&self, participant: ParticipantId) -> Option<Color> {
        self.colors.get(&participant).copied()
    }

    /// 开始（或重新开始）对局
    pub fn start(&mut self) -> Vec<Envelope> {
        if self.state == Lifecycle::Aborted {
            return Vec::new();
        }

        self.state = Lifecycle::Initializing;
        let board = Board::initial();
        self.turn = Color::White;
        self.colors = self
            .participants
            .iter()
            .zip([Color::White, Color::Black])
            .map(|(&id, color)| (id, color))
            .collect();

        let mut outbox = Outbox::default();
        for &id in &self.participants {
            let color = self.colors[&id];
            outbox.send(
                id,
                ServerMessage::GameStarted {
                    my_turn: color == self.turn,
                    game_field: board.clone(),
                    color,
                },
            );
        }

        self.board = Some(board);
        self.state = Lifecycle::Active;
        info!("Game started: {:?}", self.participants);

        outbox.into_messages()
    }

    /// 处理一条入站消息（解码失败也作为消息传入）
    pub fn handle(
        &mut self,
        from: ParticipantId,
        message: Result<ClientMessage, ProtocolError>,
    ) -> Vec<Envelope> {
        if self.state == Lifecycle::Aborted {
            return Vec::new();
        }
        if !self.colors.contains_key(&from) {
            warn!("Message from unknown participant {}", from);
            return Vec::new();
        }

        let mut outbox = Outbox::default();

        match message {
            Ok(ClientMessage::PlayerMove { r#move }) => {
                return self.on_player_move(from, &r#move);
            }
            Ok(ClientMessage::RepeatGame) => {
                info!("Participant {} requested a new game", from);
                return self.start();
            }
            Ok(ClientMessage::IncorrectRequest { message }) => {
                outbox.send(from, ServerMessage::IncorrectRequest { message });
            }
            Ok(ClientMessage::IncorrectResponse { message }) => {
                warn!("Incorrect response reported by {}: {}", from, message);
            }
            Err(e) => {
                warn!("Rejected request from {}: {}", from, e);
                outbox.send(from, ServerMessage::incorrect(e));
            }
        }

        outbox.into_messages()
    }

    /// 处理走棋
    fn on_player_move(&mut self, from: ParticipantId, descriptor: &MoveDescriptor) -> Vec<Envelope> {
        let mut outbox = Outbox::default();
        let mover = self.colors[&from];

        let board = match (self.state, self.board.as_mut()) {
            (Lifecycle::Active, Some(board)) => board,
            _ => {
                outbox.send(from, ServerMessage::incorrect(MoveError::GameNotActive));
                return outbox.into_messages();
            }
        };

        let mv = descriptor.to_move();
        let effect = match MoveValidator::play(board, mover, self.turn, mv) {
            Ok(effect) => effect,
            Err(e) => {
                warn!("Rejected move {} by {} ({}): {}", mv, from, mover, e);
                outbox.send(from, ServerMessage::incorrect(e));
                return outbox.into_messages();
            }
        };
        debug!(
            "Move {} by {}: cleared {}, promoted {}",
            mv,
            mover,
            effect.cleared.len(),
            effect.promoted
        );

        // 对每位参与者的颜色分别判定
        let results: Vec<(ParticipantId, bool)> = self
            .participants
            .iter()
            .map(|&id| (id, has_won(board, self.colors[&id])))
            .collect();

        if results.iter().any(|&(_, won)| won) {
            info!("Game finished: {:?}", results);
            for (id, win) in results {
                outbox.send(id, ServerMessage::GameResult { win });
            }
            self.state = Lifecycle::Finished;
            return outbox.into_messages();
        }

        self.turn = self.turn.opponent();
        for &id in &self.participants {
            let color = self.colors[&id];
            outbox.send(
                id,
                ServerMessage::ChangePlayer {
                    my_turn: color == self.turn,
                    game_field: board.clone(),
                    color,
                },
            );
        }

        outbox.into_messages()
    }

    /// 中止对局
    ///
    /// `closed` 为断开连接的参与者，其余参与者收到 `gameAborted`。
    /// 重复调用不产生任何效果。
    pub fn teardown(&mut self, closed: Option<ParticipantId>) -> Vec<Envelope> {
        if self.state == Lifecycle::Aborted {
            return Vec::new();
        }
        self.state = Lifecycle::Aborted;

        let mut outbox = Outbox::default();
        for &id in self.participants.iter().filter(|&&id| Some(id) != closed) {
            outbox.send(id, ServerMessage::GameAborted);
        }

        self.participants.clear();
        self.colors.clear();
        self.board = None;
        info!("Game aborted (closed by {:?})", closed);

        outbox.into_messages()
    }
}
