use crate::api::api_routes;
use axum::{middleware::from_fn_with_state, Router};
use log::info;
use middleware::auth_middleware;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use veery_database::{error::BackendResult, impls::VeeryContext};

mod middleware;
pub(super) mod setup;

pub(super) async fn start_server(
    context: VeeryContext,
    override_bind: Option<SocketAddr>,
    notify_start: Option<oneshot::Sender<()>>,
) -> BackendResult<()> {
    let addr: SocketAddr = match override_bind {
        Some(addr) => addr,
        None => context.config.server.bind.parse()?,
    };

    let context = Arc::new(context);
    let app = Router::new()
        .nest("/api/v1", api_routes())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .route_layer(from_fn_with_state(context.clone(), auth_middleware))
        .with_state(context);

    info!("Listening on {}", &addr);
    let listener = TcpListener::bind(&addr).await?;
    if let Some(notify_start) = notify_start {
        notify_start
            .send(())
            .map_err(|_| anyhow::anyhow!("send start notification"))?;
    }
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
