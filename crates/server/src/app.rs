use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::{config::ServerConfig, routes, AppState};

pub struct Server;

/// Handle to a running server. Call [`ServerHandle::stop`] for a graceful
/// shutdown; dropping the handle leaves the serve task running.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    serve_task: JoinHandle<Result<(), std::io::Error>>,
}

impl Server {
    pub async fn start(config: ServerConfig) -> anyhow::Result<ServerHandle> {
        let addr: SocketAddr = config
            .listen_addr
            .parse()
            .context("listen address is invalid")?;
        let listener = TcpListener::bind(addr)
            .await
            .context("failed to bind tcp listener")?;
        let addr = listener
            .local_addr()
            .context("failed to read bound address")?;

        let state = AppState::new(config);
        let router = routes::router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let serve_task = tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!(%addr, "trainer control server listening");

        Ok(ServerHandle {
            addr,
            shutdown_tx,
            serve_task,
        })
    }
}

impl ServerHandle {
    /// Address the server is actually bound to (useful with port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn stop(self) -> anyhow::Result<()> {
        let _ = self.shutdown_tx.send(());
        self.serve_task
            .await
            .context("serve task panicked")?
            .context("server failure")?;
        Ok(())
    }
}
