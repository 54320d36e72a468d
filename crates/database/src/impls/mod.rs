use crate::{config::VeeryConfig, error::BackendResult, schema::jwt_secret};
use diesel::{
    r2d2::{ConnectionManager, Pool},
    PgConnection, QueryDsl, RunQueryDsl,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::debug;
use std::{env::var, ops::DerefMut};

pub mod comment;
pub mod post;
pub mod site_stats;
pub mod user;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Clone)]
pub struct VeeryContext {
    pub db_pool: DbPool,
    pub config: VeeryConfig,
}

impl VeeryContext {
    pub fn init(config: VeeryConfig, ignore_env: bool) -> BackendResult<Self> {
        let database_url = config.database.connection_url.clone();
        let database_url = if ignore_env {
            database_url
        } else {
            var("DATABASE_URL").unwrap_or(database_url)
        };
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let db_pool = Pool::builder()
            .max_size(config.database.pool_size)
            .build(manager)?;

        debug!("Running pending database migrations");
        db_pool
            .get()?
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("run migrations: {e}"))?;
        Ok(VeeryContext { db_pool, config })
    }
}

pub fn read_jwt_secret(context: &VeeryContext) -> BackendResult<String> {
    let mut conn = context.db_pool.get()?;
    Ok(jwt_secret::table
        .select(jwt_secret::dsl::secret)
        .first(conn.deref_mut())?)
}
