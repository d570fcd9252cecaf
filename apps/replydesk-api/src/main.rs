use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = replydesk_api::Args::parse();

	replydesk_api::run(args).await
}
