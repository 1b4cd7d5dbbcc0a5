use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = aci_dedup::Args::parse();

	aci_dedup::run(args).await
}
