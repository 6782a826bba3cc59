use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = jobscout_worker::Args::parse();

	jobscout_worker::run(args).await
}
