pub mod backend;
pub mod cli;
pub mod errors;
pub mod models;
pub mod server;
pub mod widget;

use backend::BackendClient;
use cli::Args;
use log::info;
use server::api::AppState;
use server::Server;
use std::error::Error;
use std::time::Duration;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Backend URL: {}", args.backend_url);
    info!("Backend Timeout: {}s", args.backend_timeout_secs);
    info!("-------------------------");

    let backend = BackendClient::new(
        args.backend_url.clone(),
        Duration::from_secs(args.backend_timeout_secs)
    )?;
    let server = Server::new(args.server_addr.clone(), AppState { backend });
    server.run().await
}
