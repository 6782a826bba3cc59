mod error;

pub use error::{Error, Result};

use std::{env, future::Future, str::FromStr, thread};

use sqlx::{
	Connection, Executor,
	mysql::{MySqlConnectOptions, MySqlConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

pub const DSN_ENV: &str = "JOBSCOUT_MYSQL_DSN";

/// A throwaway MySQL database created for one test and dropped afterwards.
pub struct TestDatabase {
	name: String,
	admin_options: MySqlConnectOptions,
	cleaned: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options = MySqlConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse {DSN_ENV}: {err}.")))?;
		let mut admin_conn = MySqlConnection::connect_with(&base_options)
			.await
			.map_err(|err| Error::Message(format!("Failed to connect to MySQL: {err}.")))?;
		let name = format!("jobscout_test_{}", Uuid::new_v4().simple());
		let create_sql = format!("CREATE DATABASE `{name}`");

		admin_conn
			.execute(create_sql.as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create test database: {err}.")))?;

		Ok(Self { name, admin_options: base_options, cleaned: false })
	}

	/// Connect options pointing at the throwaway database.
	pub fn connect_options(&self) -> MySqlConnectOptions {
		self.admin_options.clone().database(&self.name)
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner().await
	}

	async fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		drop_database(&self.name, &self.admin_options).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let name = self.name.clone();
		let admin_options = self.admin_options.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test database cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(drop_database(&name, &admin_options)) {
				eprintln!("Test database cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok()
}

pub async fn with_test_db<F, Fut, T>(base_dsn: &str, f: F) -> Result<T>
where
	F: FnOnce(&TestDatabase) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let db = TestDatabase::new(base_dsn).await?;
	let result = f(&db).await;
	let mut db = db;

	if let Err(err) = db.cleanup_inner().await {
		eprintln!("Test database cleanup warning: {err}.");

		if result.is_ok() {
			return Err(err);
		}
	}

	result
}

async fn drop_database(name: &str, admin_options: &MySqlConnectOptions) -> Result<()> {
	let mut conn = MySqlConnection::connect_with(admin_options).await.map_err(|err| {
		Error::Message(format!("Failed to connect to MySQL for cleanup: {err}."))
	})?;
	let drop_sql = format!("DROP DATABASE IF EXISTS `{name}`");

	conn.execute(drop_sql.as_str())
		.await
		.map_err(|err| Error::Message(format!("Failed to drop test database: {err}.")))?;

	Ok(())
}
