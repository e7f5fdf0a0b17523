use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::{debug, info};

use crate::{customer, product, transaction, user};

/// Open the pool described by `cfg`.
///
/// sqlx turns on `PRAGMA foreign_keys` for every SQLite connection it opens,
/// so the `transaksi` references are enforced by the engine.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(cfg.url());
    // every in-memory connection is its own database
    let (max, min) = if cfg.is_memory() {
        (1, 1)
    } else {
        (cfg.max_connections, cfg.min_connections)
    };
    opts.max_connections(max)
        .min_connections(min)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    info!(path = %cfg.path, max_connections = max, "database connected");
    Ok(db)
}

/// Create any missing table from its entity definition.
///
/// Parents first so the `transaksi` foreign keys resolve.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, product::Entity).await?;
    create_table(db, customer::Entity).await?;
    create_table(db, transaction::Entity).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    debug!(table = %entity.table_name(), "table ensured");
    Ok(())
}
