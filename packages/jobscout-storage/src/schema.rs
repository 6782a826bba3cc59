/// Column list shared by the DDL and the insert statement, in positional order.
pub const JOB_COLUMNS: &str = "Id, Url, Role, company, description, Experience, JobType";

/// `CREATE TABLE IF NOT EXISTS` for the jobs table. The caller validates `table`.
pub fn render_jobs_table(table: &str) -> String {
	format!(
		"\
CREATE TABLE IF NOT EXISTS `{table}` (
	Id BIGINT NOT NULL PRIMARY KEY,
	Url TEXT NOT NULL,
	Role TEXT NOT NULL,
	company TEXT NOT NULL,
	description MEDIUMTEXT NOT NULL,
	Experience INT UNSIGNED NOT NULL,
	JobType INT NOT NULL
) ENGINE = InnoDB DEFAULT CHARSET = utf8mb4"
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ddl_quotes_table_and_keys_on_id() {
		let ddl = render_jobs_table("jobs");

		assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS `jobs` ("));
		assert!(ddl.contains("Id BIGINT NOT NULL PRIMARY KEY"));

		for column in JOB_COLUMNS.split(", ") {
			assert!(ddl.contains(&format!("\t{column} ")), "missing column {column}");
		}
	}
}
