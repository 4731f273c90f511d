use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, error, info, trace};

/// Opens a connection, logging where it goes.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Attempting to connect to database");
    debug!("Database URL: {}", database_url);

    match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            Ok(connection)
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            Err(e.into())
        }
    }
}

/// Applies every pending migration, or rebuilds the schema from scratch
/// when `fresh` is set.
pub async fn migrate(db: &DatabaseConnection, fresh: bool) -> Result<()> {
    let outcome = if fresh {
        info!("Dropping all tables and re-running migrations");
        Migrator::fresh(db).await
    } else {
        info!("Running database migrations");
        Migrator::up(db, None).await
    };

    match outcome {
        Ok(_) => {
            debug!("All pending migrations have been applied");
            Ok(())
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            Err(e.into())
        }
    }
}

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database");

    let db = connect(database_url).await?;
    migrate(&db, false).await?;

    info!("Database initialization completed successfully!");
    Ok(())
}
