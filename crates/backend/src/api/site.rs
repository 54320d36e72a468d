use axum::{extract::State, Json};
use axum_macros::debug_handler;
use moka::sync::Cache;
use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};
use veery_database::{common::SiteStats, error::BackendResult, impls::VeeryContext};

#[debug_handler]
pub(crate) async fn site_stats(
    State(context): State<Arc<VeeryContext>>,
) -> BackendResult<Json<SiteStats>> {
    let stats = if cfg!(debug_assertions) {
        SiteStats::read(&context)?
    } else {
        // Cache result of the db read in prod because it runs several
        // queries and changes slowly
        static CACHE: LazyLock<Cache<(), SiteStats>> = LazyLock::new(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(60))
                .build()
        });
        CACHE
            .try_get_with((), || SiteStats::read(&context))
            .map_err(|e| anyhow::anyhow!(e))?
    };
    Ok(Json(stats))
}
