//! Ledger database migrations.

use uploadhub_core::config::AppConfig;
use uploadhub_core::error::AppError;
use uploadhub_database::DatabasePool;
use uploadhub_database::migration::run_migrations;

use crate::output;

/// Execute the migrate command
pub async fn execute(config: AppConfig) -> Result<(), AppError> {
    if config.ledger.provider != "postgres" {
        output::print_warning(&format!(
            "Ledger provider is '{}'; migrations only apply to the postgres ledger",
            config.ledger.provider
        ));
    }

    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
