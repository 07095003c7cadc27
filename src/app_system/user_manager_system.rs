use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

use super::config::AppConfig;
use crate::api::{HttpUserApi, UserApi};
use crate::clients::UserManagerClient;
use crate::manager::UserManager;
use crate::view;

/// Wires the remote client, the manager actor and the renderer together.
///
/// Responsible for startup (including the initial mount fetch) and shutdown.
pub struct UserManagerSystem {
    pub client: UserManagerClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl UserManagerSystem {
    /// Starts the system against the configured HTTP endpoint, rendering every
    /// state change to `screen`.
    pub async fn start<W>(config: &AppConfig, screen: W) -> Result<Self, String>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let api = HttpUserApi::new(config.api_url.clone(), config.request_timeout)
            .map_err(|e| e.to_string())?;
        info!(api_url = %api.base_url(), "Starting user manager");
        Self::with_api(config.mailbox_size, Arc::new(api), screen).await
    }

    pub async fn with_api<W>(mailbox_size: usize, api: Arc<dyn UserApi>, screen: W) -> Result<Self, String>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (actor, client) = UserManager::new(mailbox_size, api);
        let actor_handle = tokio::spawn(actor.run());
        let render_handle = tokio::spawn(render_loop(client.clone(), screen));

        client.mount().await.map_err(|e| e.to_string())?;

        Ok(Self {
            client,
            handles: vec![actor_handle, render_handle],
        })
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        // The actor stops once the last client handle is gone; the renderer
        // then sees its watch channel close.
        drop(self.client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(format!("Task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

/// Re-renders the whole screen after every published change.
async fn render_loop<W>(client: UserManagerClient, mut screen: W)
where
    W: AsyncWrite + Unpin,
{
    let mut updates = client.subscribe();
    // Only the watch receiver is needed; holding the client would keep the
    // actor alive forever.
    drop(client);

    loop {
        let frame = view::render(&updates.borrow_and_update());
        if let Err(e) = write_frame(&mut screen, &frame).await {
            error!(error = %e, "Failed to write screen");
            break;
        }
        if updates.changed().await.is_err() {
            break;
        }
    }
}

async fn write_frame<W>(screen: &mut W, frame: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    screen.write_all(format!("\n{}", frame).as_bytes()).await?;
    screen.flush().await
}
