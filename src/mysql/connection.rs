use crate::config::DbConfig;
use crate::util::{Result, SchemaError};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};

/// One side's database handle. Owned exclusively by the phase using
/// it; never shared across threads.
pub struct MySqlConnection {
    pool: Pool<MySql>,
}

impl MySqlConnection {
    pub async fn new(config: &DbConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.dbname)
            .charset(&config.charset);

        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                SchemaError::Connection(format!(
                    "Failed to connect to {}:{}/{}: {e}",
                    config.host, config.port, config.dbname
                ))
            })?;

        Ok(MySqlConnection { pool })
    }

    pub fn pool(&self) -> &Pool<MySql> {
        &self.pool
    }
}
