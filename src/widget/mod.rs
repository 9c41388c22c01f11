pub mod ui;

use crate::models::chat::{ ChatRequest, Conversation };
use async_trait::async_trait;
use crossterm::event::{ self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers };
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode,
    enable_raw_mode,
    EnterAlternateScreen,
    LeaveAlternateScreen,
};
use log::warn;
use ratatui::backend::{ Backend, CrosstermBackend };
use ratatui::Terminal;
use serde_json::Value;
use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const MSG_NO_REPLY: &str = "Pas de réponse";
pub const MSG_GATEWAY_UNREACHABLE: &str = "Erreur: impossible de joindre le backend";

/// Transport seam between the widget and the gateway. The widget only needs
/// the final reply text; errors here mean the gateway itself was unreachable.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, Box<dyn Error + Send + Sync>>;
}

pub struct HttpGatewayClient {
    http: reqwest::Client,
    url: String,
}

impl HttpGatewayClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn send(&self, message: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        let req = ChatRequest {
            message: message.to_string(),
        };
        let resp = self.http.post(&self.url).json(&req).send().await?;
        let body = resp.json::<Value>().await?;
        // Status is deliberately not checked: any body without a reply field
        // (including a 400 validation error) renders as the no-reply text.
        Ok(
            body
                .get("reply")
                .and_then(Value::as_str)
                .unwrap_or(MSG_NO_REPLY)
                .to_string()
        )
    }
}

/// In-memory state of the chat widget. `scroll` counts lines scrolled up
/// from the bottom, so 0 means pinned to the latest message.
pub struct ChatApp {
    pub conversation: Conversation,
    pub input: String,
    pub loading: bool,
    pub scroll: u16,
    pub spinner_idx: usize,
    pub should_quit: bool,
}

impl ChatApp {
    pub fn new() -> Self {
        Self {
            conversation: Conversation::new(),
            input: String::new(),
            loading: false,
            scroll: 0,
            spinner_idx: 0,
            should_quit: false,
        }
    }

    /// Starts a send if there is anything to send. Empty or whitespace-only
    /// input is a no-op, and so is any press while a request is in flight
    /// (the double-submit policy: reject, never queue). On success the user
    /// message is appended optimistically and the dispatched text returned.
    pub fn begin_send(&mut self) -> Option<String> {
        if self.loading {
            return None;
        }
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let text = trimmed.to_string();
        self.conversation.push_user(&text);
        self.input.clear();
        self.loading = true;
        self.scroll = 0;
        Some(text)
    }

    /// Lands the outcome of a send. Every path appends exactly one bot
    /// message and clears the loading flag.
    pub fn finish_send(&mut self, result: Result<String, String>) {
        match result {
            Ok(reply) => self.conversation.push_bot(reply),
            Err(e) => {
                warn!("Gateway call failed: {}", e);
                self.conversation.push_bot(MSG_GATEWAY_UNREACHABLE);
            }
        }
        self.loading = false;
        self.scroll = 0;
    }

    pub fn tick(&mut self) {
        if self.loading {
            self.spinner_idx = self.spinner_idx.wrapping_add(1);
        }
    }
}

impl Default for ChatApp {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(gateway_url: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let client: Arc<dyn GatewayClient> = Arc::new(HttpGatewayClient::new(gateway_url));
    let res = run_app(&mut terminal, client).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    client: Arc<dyn GatewayClient>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut app = ChatApp::new();
    let (tx, mut rx) = mpsc::channel::<Result<String, String>>(8);

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        while let Ok(result) = rx.try_recv() {
            app.finish_send(result);
        }

        if event::poll(Duration::from_millis(50))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key, &client, &tx);
                }
            }
        } else {
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut ChatApp,
    key: KeyEvent,
    client: &Arc<dyn GatewayClient>,
    tx: &mpsc::Sender<Result<String, String>>
) {
    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        // Shift+Enter inserts a newline; Alt+Enter is the portable variant
        // for terminals that don't report the shift modifier on Enter.
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            app.input.push('\n');
        }
        KeyCode::Enter => {
            if let Some(text) = app.begin_send() {
                let client = client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = client.send(&text).await.map_err(|e| e.to_string());
                    let _ = tx.send(result).await;
                });
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Up => {
            app.scroll = app.scroll.saturating_add(1);
        }
        KeyCode::Down => {
            app.scroll = app.scroll.saturating_sub(1);
        }
        KeyCode::Char(c) => {
            app.input.push(c);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;
    use serde_json::json;
    use wiremock::matchers::{ body_json, method };
    use wiremock::{ Mock, MockServer, ResponseTemplate };

    struct StubGateway;

    #[async_trait]
    impl GatewayClient for StubGateway {
        async fn send(&self, message: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
            Ok(format!("re: {}", message))
        }
    }

    #[test]
    fn empty_input_is_a_noop() {
        let mut app = ChatApp::new();
        app.input = "".to_string();
        assert!(app.begin_send().is_none());
        assert!(app.conversation.is_empty());
        assert!(!app.loading);
    }

    #[test]
    fn whitespace_only_input_is_a_noop() {
        let mut app = ChatApp::new();
        app.input = "   ".to_string();
        assert!(app.begin_send().is_none());
        assert!(app.conversation.is_empty());
    }

    #[test]
    fn send_while_loading_is_rejected() {
        let mut app = ChatApp::new();
        app.input = "premiere".to_string();
        assert!(app.begin_send().is_some());
        app.input = "deuxieme".to_string();
        assert!(app.begin_send().is_none());
        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.input, "deuxieme");
    }

    #[test]
    fn begin_send_appends_trimmed_user_message_and_clears_input() {
        let mut app = ChatApp::new();
        app.input = "  bonjour  ".to_string();
        let text = app.begin_send().unwrap();
        assert_eq!(text, "bonjour");
        assert!(app.input.is_empty());
        assert!(app.loading);
        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.conversation.messages[0].role, Role::User);
        assert_eq!(app.conversation.messages[0].text, "bonjour");
    }

    #[test]
    fn finish_send_failure_appends_fixed_error_message() {
        let mut app = ChatApp::new();
        app.input = "bonjour".to_string();
        app.begin_send();
        app.finish_send(Err("connection refused".to_string()));
        assert!(!app.loading);
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.conversation.messages[1].text, MSG_GATEWAY_UNREACHABLE);
    }

    #[tokio::test]
    async fn send_round_trip_appends_exactly_one_bot_message() {
        let mut app = ChatApp::new();
        app.input = "bonjour".to_string();
        let text = app.begin_send().unwrap();
        assert!(app.loading);

        let result = StubGateway.send(&text).await.map_err(|e| e.to_string());
        app.finish_send(result);

        assert!(!app.loading);
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.conversation.messages[0].role, Role::User);
        assert_eq!(app.conversation.messages[1].role, Role::Bot);
        assert_eq!(app.conversation.messages[1].text, "re: bonjour");
    }

    #[tokio::test]
    async fn http_client_extracts_reply_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"message": "bonjour"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "salut"})))
            .mount(&server)
            .await;

        let client = HttpGatewayClient::new(server.uri());
        assert_eq!(client.send("bonjour").await.unwrap(), "salut");
    }

    #[tokio::test]
    async fn http_client_falls_back_when_reply_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Missing message"}))
            )
            .mount(&server)
            .await;

        let client = HttpGatewayClient::new(server.uri());
        assert_eq!(client.send("bonjour").await.unwrap(), MSG_NO_REPLY);
    }

    #[tokio::test]
    async fn http_client_errors_when_gateway_is_unreachable() {
        let server = MockServer::start().await;
        let dead_uri = server.uri();
        drop(server);

        let client = HttpGatewayClient::new(dead_uri);
        assert!(client.send("bonjour").await.is_err());
    }
}
