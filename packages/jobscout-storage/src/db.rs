use sqlx::{
	MySqlPool,
	mysql::{MySqlConnectOptions, MySqlPoolOptions},
};

use jobscout_config::Mysql;

use crate::{Error, Result, schema};

/// The run's single database handle. The pool is capped at one connection so every statement
/// goes through the same session.
pub struct Db {
	pub pool: MySqlPool,
}
impl Db {
	pub async fn connect(cfg: &Mysql) -> Result<Self> {
		let options = MySqlConnectOptions::new()
			.host(&cfg.host)
			.port(cfg.port)
			.username(&cfg.user)
			.password(cfg.password.expose())
			.database(&cfg.database);

		Self::connect_with(options).await
	}

	pub async fn connect_with(options: MySqlConnectOptions) -> Result<Self> {
		let pool = MySqlPoolOptions::new().max_connections(1).connect_with(options).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_table(&self, table: &str) -> Result<()> {
		if !jobscout_config::is_sql_identifier(table) {
			return Err(Error::InvalidArgument(format!("Invalid table name {table:?}.")));
		}

		sqlx::query(&schema::render_jobs_table(table)).execute(&self.pool).await?;

		Ok(())
	}

	pub async fn close(&self) {
		self.pool.close().await;
	}
}
