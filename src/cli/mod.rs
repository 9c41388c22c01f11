use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address and port for the gateway to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// URL of the question-answering backend (expects POST {query} -> {answer}).
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8000/ask")]
    pub backend_url: String,

    /// Timeout in seconds for outbound backend requests. A timeout is treated
    /// the same as an unreachable backend and falls back to the echo reply.
    #[arg(long, env = "BACKEND_TIMEOUT_SECS", default_value = "10")]
    pub backend_timeout_secs: u64,

    /// Gateway chat endpoint used by the terminal widget.
    #[arg(long, env = "GATEWAY_URL", default_value = "http://127.0.0.1:3000/api/chat")]
    pub gateway_url: String,
}
