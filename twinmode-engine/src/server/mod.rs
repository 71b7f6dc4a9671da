//! axum front ends: the www site and the ROT-13 service it calls.

pub mod rot13;
pub mod www;

use std::net::{Ipv4Addr, SocketAddr};

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::ServerError;

/// Binds a listener on localhost. Port 0 picks a free port.
pub async fn bind(port: u16) -> Result<TcpListener, ServerError> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serves `app` until the listener fails.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
