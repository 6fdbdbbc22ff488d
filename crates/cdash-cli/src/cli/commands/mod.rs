//! CLI command handlers.

pub mod admin;
pub mod auth;
pub mod config;
pub mod feed;
pub mod profile;
pub mod route;
pub mod saved;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use cdash_core::api::{ApiClient, ApiError};
use cdash_core::auth::{FileTokenStore, Guard, SessionGate};
use cdash_core::config::Config;
use cdash_core::notice::{NoticeLevel, Notices};

pub const NOT_LOGGED_IN: &str = "Not logged in. Run `cdash login` first.";
pub const SESSION_REJECTED: &str = "Session expired or was rejected. Run `cdash login` again.";

/// Everything a command handler needs: the API client and the session gate.
pub struct AppContext {
    pub api: ApiClient,
    pub gate: SessionGate<FileTokenStore>,
}

impl AppContext {
    /// Resolves the session from the persisted token and builds a client
    /// carrying it.
    pub fn new(config: &Config, api_url: Option<&str>) -> Result<Self> {
        let mut gate = SessionGate::new(FileTokenStore::default());
        gate.initialize();

        let api = match api_url {
            Some(url) => ApiClient::new(url.trim(), config.request_timeout()),
            None => ApiClient::from_config(config),
        }
        .context("create API client")?
        .with_token(gate.token());

        Ok(Self { api, gate })
    }

    /// Guards a protected command.
    pub fn require_login(&self) -> Result<()> {
        match self.gate.guard(()) {
            Guard::Render(()) => Ok(()),
            Guard::RedirectToLogin => bail!(NOT_LOGGED_IN),
            Guard::Loading => bail!("Session is still loading"),
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        self.require_login()?;
        if !self.gate.is_admin() {
            bail!("This command requires an admin account");
        }
        Ok(())
    }

    /// Keeps the client's bearer token in step with the gate.
    pub fn sync_token(&mut self) {
        self.api.set_token(self.gate.token());
    }

    /// Logs out when the server answered 401 to the stored token, so the next
    /// command asks for a fresh login instead of replaying a dead session.
    pub fn end_rejected_session(&mut self, result: Result<()>) -> Result<()> {
        let rejected = result
            .as_ref()
            .err()
            .and_then(|e| e.downcast_ref::<ApiError>())
            .is_some_and(ApiError::is_auth_rejection);
        if !rejected {
            return result;
        }

        self.gate.logout();
        self.sync_token();
        result.context(SESSION_REJECTED)
    }
}

/// Prints pending notices: errors to stderr, everything else to stdout.
pub fn print_notices(notices: &mut Notices) {
    for notice in notices.drain() {
        if notice.level == NoticeLevel::Error {
            eprintln!("{notice}");
        } else {
            println!("{notice}");
        }
    }
}

/// Reads one line from stdin, prompting on stderr when interactive.
pub fn read_secret_line(prompt: &str) -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("{prompt}");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line).context("read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Shortens long text for table cells.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let prefix: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{prefix}…")
}
