pub mod api;

use log::info;
use std::error::Error;
use std::net::SocketAddr;

pub struct Server {
    addr: String,
    state: api::AppState,
}

impl Server {
    pub fn new(addr: String, state: api::AppState) -> Self {
        Self { addr, state }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        info!("Starting HTTP gateway on: http://{}", addr);

        let app = api::router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app.into_make_service()).await?;

        Ok(())
    }
}
