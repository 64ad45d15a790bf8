//! 会话执行器
//!
//! 每场对局一个事件循环：两个读任务把入站帧解码后送入同一个 mpsc 通道，
//! 循环串行地驱动 [`Session`]；每位参与者一个写任务，保证发往同一参与者的消息有序。

use std::collections::HashMap;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use protocol::{
    codec, ClientMessage, FrameReader, FrameWriter, ProtocolError, ServerMessage,
    PLAYERS_IN_SESSION,
};

use crate::session::{Envelope, Lifecycle, ParticipantId, Session};

/// 会话事件
#[derive(Debug)]
pub enum SessionEvent {
    /// 收到一帧（可能解码失败）
    Inbound {
        from: ParticipantId,
        message: Result<ClientMessage, ProtocolError>,
    },
    /// 参与者断开连接
    Closed { from: ParticipantId },
    /// 外部请求中止
    Teardown,
}

/// 读任务产出的原始帧，连接出错后不再产出
type Frame = Result<Vec<u8>, ProtocolError>;

/// 参与者连接
///
/// 创建时即启动读任务，未配对期间也能发现连接已断开。
pub struct Participant<W> {
    pub id: ParticipantId,
    frames: mpsc::UnboundedReceiver<Frame>,
    reader: JoinHandle<()>,
    writer: FrameWriter<W>,
}

impl<W> Participant<W> {
    pub fn new<R>(id: ParticipantId, reader: FrameReader<R>, writer: FrameWriter<W>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, frames) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_loop(id, reader, tx));
        Self {
            id,
            frames,
            reader,
            writer,
        }
    }

    /// 读端是否仍然可用
    pub fn is_connected(&self) -> bool {
        !self.reader.is_finished()
    }

    /// 放弃该连接，停止读任务
    pub fn close(self) {
        self.reader.abort();
    }
}

/// 运行中会话的句柄
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// 请求中止会话，可以重复调用
    pub fn teardown(&self) {
        // 会话已结束时通道已关闭，忽略即可
        let _ = self.events.send(SessionEvent::Teardown);
    }

    /// 会话是否已经结束
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// 等待会话结束
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!("Session task failed: {}", e);
        }
    }
}

/// 启动一场对局，第一位参与者执白
pub fn spawn_session<W>(first: Participant<W>, second: Participant<W>) -> SessionHandle
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let mut session = Session::new(first.id, second.id);

    let mut readers = Vec::with_capacity(2 * PLAYERS_IN_SESSION);
    let mut outboxes = HashMap::with_capacity(PLAYERS_IN_SESSION);
    for participant in [first, second] {
        readers.push(participant.reader);
        readers.push(tokio::spawn(forward_loop(
            participant.id,
            participant.frames,
            events_tx.clone(),
        )));
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(participant.id, participant.writer, rx));
        outboxes.insert(participant.id, tx);
    }

    let task = tokio::spawn(async move {
        deliver(&outboxes, session.start());
        run(&mut session, events_rx, &outboxes).await;

        for reader in readers {
            reader.abort();
        }
        // outboxes 在此释放，写任务随之退出
    });

    SessionHandle {
        events: events_tx,
        task,
    }
}

/// 事件循环，会话中止后退出
async fn run(
    session: &mut Session,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    outboxes: &HashMap<ParticipantId, mpsc::UnboundedSender<ServerMessage>>,
) {
    while let Some(event) = events.recv().await {
        let out = match event {
            SessionEvent::Inbound { from, message } => {
                debug!("Inbound from {}: {:?}", from, message);
                session.handle(from, message)
            }
            SessionEvent::Closed { from } => {
                info!("Participant {} disconnected", from);
                session.teardown(Some(from))
            }
            SessionEvent::Teardown => session.teardown(None),
        };
        deliver(outboxes, out);

        if session.state() == Lifecycle::Aborted {
            break;
        }
    }
}

/// 把消息交给对应参与者的写任务，不等待发送完成
fn deliver(
    outboxes: &HashMap<ParticipantId, mpsc::UnboundedSender<ServerMessage>>,
    envelopes: Vec<Envelope>,
) {
    for Envelope { to, message } in envelopes {
        match outboxes.get(&to) {
            Some(tx) => {
                if tx.send(message).is_err() {
                    error!("Failed to deliver message to {}: writer closed", to);
                }
            }
            None => error!("No outbox for participant {}", to),
        }
    }
}

/// 读任务：逐帧读取，出错（含断开）时上报一次后退出
async fn read_loop<R>(
    id: ParticipantId,
    mut reader: FrameReader<R>,
    frames: mpsc::UnboundedSender<Frame>,
) where
    R: AsyncRead + Unpin + Send,
{
    loop {
        let frame = reader.read_frame().await;
        if let Err(e) = &frame {
            debug!("Read from {} ended: {}", id, e);
        }
        let ended = frame.is_err();
        if frames.send(frame).is_err() || ended {
            return;
        }
    }
}

/// 转发任务：解码入站帧送入会话，读端出错时上报 Closed
async fn forward_loop(
    id: ParticipantId,
    mut frames: mpsc::UnboundedReceiver<Frame>,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    while let Some(frame) = frames.recv().await {
        let event = match frame {
            Ok(payload) => SessionEvent::Inbound {
                from: id,
                message: codec::decode(&payload),
            },
            Err(_) => {
                let _ = events.send(SessionEvent::Closed { from: id });
                return;
            }
        };

        if events.send(event).is_err() {
            return;
        }
    }
}

/// 写任务：按顺序发送，失败只记录不重试；发送 `gameAborted` 后关闭连接
async fn write_loop<W>(
    id: ParticipantId,
    mut writer: FrameWriter<W>,
    mut messages: mpsc::UnboundedReceiver<ServerMessage>,
) where
    W: AsyncWrite + Unpin + Send,
{
    while let Some(message) = messages.recv().await {
        let aborted = message == ServerMessage::GameAborted;

        if let Err(e) = writer.send(&message).await {
            error!("Failed to send message to {}: {}", id, e);
        }
        if aborted {
            break;
        }
    }

    if let Err(e) = writer.close().await {
        debug!("Closing connection of {} failed: {}", id, e);
    }
}
