//! 服务器主逻辑

use std::future::Future;

use anyhow::Context;
use tokio::net::tcp::OwnedWriteHalf;
use tracing::{info, warn};

use protocol::{Connection, Listener, NetworkConfig, TcpListener};

use crate::lobby::Lobby;

/// 跳棋服务器
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// 绑定监听地址
    pub async fn bind(config: &NetworkConfig) -> anyhow::Result<Self> {
        let addr = config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        Ok(Self { listener })
    }

    /// 实际监听地址
    pub fn local_addr(&self) -> Option<String> {
        self.listener.local_addr()
    }

    /// 接受连接并配对，直到 `shutdown` 完成
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        let mut lobby: Lobby<OwnedWriteHalf> = Lobby::new();
        tokio::pin!(shutdown);

        info!("Listening on {}", self.local_addr().unwrap_or_default());

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down, {} active sessions", lobby.active_sessions());
                    lobby.shutdown();
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => {
                        let peer = conn.peer_addr().unwrap_or_default();
                        let (reader, writer) = conn.split();
                        let id = lobby.join(reader, writer);
                        info!("Accepted {} as participant {}", peer, id);
                    }
                    Err(e) => warn!("Accept failed: {}", e),
                },
            }
        }
    }
}
