use sqlx::{MySql, QueryBuilder};

use jobscout_domain::JobRecord;

use crate::{Error, Result, db::Db, schema::JOB_COLUMNS};

/// Inserts every record in one transaction and commits once.
///
/// Rows are written with multi-row `VALUES` statements of at most `chunk_rows` rows each. Any
/// failure (a duplicate `Id` included) rolls back the whole batch. Returns the number of rows
/// inserted; an empty batch never touches the database.
pub async fn insert_jobs(
	db: &Db,
	table: &str,
	records: &[JobRecord],
	chunk_rows: usize,
) -> Result<u64> {
	if !jobscout_config::is_sql_identifier(table) {
		return Err(Error::InvalidArgument(format!("Invalid table name {table:?}.")));
	}
	if chunk_rows == 0 {
		return Err(Error::InvalidArgument("chunk_rows must be greater than zero.".to_string()));
	}
	if records.is_empty() {
		return Ok(0);
	}

	let mut tx = db.pool.begin().await?;
	let mut inserted = 0;

	for chunk in records.chunks(chunk_rows) {
		let mut builder: QueryBuilder<MySql> =
			QueryBuilder::new(format!("INSERT INTO `{table}` ({JOB_COLUMNS}) "));

		builder.push_values(chunk, |mut row, record| {
			row.push_bind(record.id)
				.push_bind(record.url.as_str())
				.push_bind(record.role.as_str())
				.push_bind(record.company.as_str())
				.push_bind(record.description.as_str())
				.push_bind(record.experience)
				.push_bind(record.job_type);
		});

		inserted += builder.build().execute(&mut *tx).await?.rows_affected();
	}

	tx.commit().await?;

	tracing::debug!(table, rows = inserted, "Committed job batch.");

	Ok(inserted)
}
