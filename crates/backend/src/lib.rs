use log::info;
use server::{setup::setup, start_server};
use std::net::SocketAddr;
use tokio::sync::oneshot;
use veery_database::{
    common::user::LocalUserView, config::VeeryConfig, error::BackendResult, impls::VeeryContext,
};

pub mod api;
mod server;

pub async fn start(
    config: VeeryConfig,
    override_bind: Option<SocketAddr>,
    notify_start: Option<oneshot::Sender<()>>,
) -> BackendResult<()> {
    let context = VeeryContext::init(config, override_bind.is_some())?;

    if LocalUserView::read_admin(&context).is_err() {
        info!("Running setup for new instance");
        setup(&context)?;
    }

    start_server(context, override_bind, notify_start).await?;

    Ok(())
}
