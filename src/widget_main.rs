use agrosys_chat::cli::Args;
use agrosys_chat::widget;
use clap::Parser;
use dotenv::dotenv;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    // Quiet by default: log lines would tear the alternate screen.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    widget::run(&args.gateway_url).await
}
