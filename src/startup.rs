//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::relay::{Dispatcher, Registry};
use crate::routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        // Fresh registry per process; all presence state is volatile
        let dispatcher = Arc::new(Dispatcher::new(Registry::new()));

        let state = AppState {
            dispatcher,
            settings: Arc::new(settings.clone()),
        };

        let router = routes::create_router(state);

        // Bind to address
        let addr: SocketAddr = settings
            .server_addr()
            .parse()
            .with_context(|| format!("invalid server address {}", settings.server_addr()))?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
