//! Session gate.
//!
//! Single source of truth for "is this user authenticated, and who are they".
//! All mutations go through [`SessionGate::initialize`], [`SessionGate::set_token`]
//! and [`SessionGate::logout`]; protected views ask [`SessionGate::guard`].
//!
//! Decode failures never escape: an undecodable token resolves to the
//! unauthenticated state and its persisted copy is removed.

use tracing::{debug, info, warn};

use super::claims::{IdentityClaims, decode_claims};
use super::token_store::TokenStore;

/// Authentication state owned by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<IdentityClaims>,
    /// Raw credential token; empty means none.
    pub token: String,
    /// True until the first decode attempt after start completes.
    pub initializing: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: None,
            token: String::new(),
            initializing: true,
        }
    }
}

/// Outcome of asking the gate for a protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard<V> {
    /// Initialization has not finished; show a placeholder.
    Loading,
    /// No identity; send the user to the login view.
    RedirectToLogin,
    /// Authenticated; render the requested view.
    Render(V),
}

/// Owns the session state and its persisted token slot.
#[derive(Debug)]
pub struct SessionGate<S> {
    state: SessionState,
    store: S,
}

impl<S: TokenStore> SessionGate<S> {
    /// Creates a gate in the initializing state. Call [`Self::initialize`] next.
    pub fn new(store: S) -> Self {
        Self {
            state: SessionState::default(),
            store,
        }
    }

    /// Reads any persisted token and resolves the session.
    ///
    /// Always leaves `initializing == false`.
    pub fn initialize(&mut self) {
        let persisted = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read persisted token: {e:#}");
                None
            }
        };

        match persisted {
            Some(token) => self.apply_token(token),
            None => self.clear_local(),
        }
        self.state.initializing = false;
    }

    /// Replaces the current token and re-decodes it. Completes a login.
    ///
    /// An empty token behaves like [`Self::logout`].
    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        if token.trim().is_empty() {
            self.logout();
        } else {
            self.apply_token(token);
        }
        self.state.initializing = false;
    }

    /// Clears identity, token and the persisted copy. Idempotent.
    pub fn logout(&mut self) {
        let was_logged_in = self.state.identity.is_some();
        self.clear_local();
        self.remove_persisted();
        if was_logged_in {
            info!("Logged out");
        }
    }

    /// Decides what a protected view resolves to.
    ///
    /// The loading check comes first so a returning user is never redirected
    /// before their stored token has been decoded.
    pub fn guard<V>(&self, view: V) -> Guard<V> {
        if self.state.initializing {
            Guard::Loading
        } else if self.state.identity.is_none() {
            Guard::RedirectToLogin
        } else {
            Guard::Render(view)
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn identity(&self) -> Option<&IdentityClaims> {
        self.state.identity.as_ref()
    }

    /// The current token, or `None` when logged out.
    pub fn token(&self) -> Option<&str> {
        (!self.state.token.is_empty()).then_some(self.state.token.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.identity().is_some_and(IdentityClaims::is_admin)
    }

    /// Updates display fields of the current identity (after a profile fetch).
    /// Does nothing when logged out.
    pub fn update_display(&mut self, name: &str, email: &str) {
        if let Some(identity) = self.state.identity.as_mut() {
            identity.name = name.to_string();
            identity.email = email.to_string();
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn apply_token(&mut self, token: String) {
        match decode_claims(&token) {
            Ok(claims) => {
                debug!(role = %claims.role, "Decoded identity claims");
                if let Err(e) = self.store.save(&token) {
                    warn!("Failed to persist token: {e:#}");
                }
                self.state.identity = Some(claims);
                self.state.token = token;
            }
            Err(e) => {
                debug!("Discarding undecodable token: {e}");
                self.clear_local();
                self.remove_persisted();
            }
        }
    }

    fn clear_local(&mut self) {
        self.state.identity = None;
        self.state.token.clear();
    }

    fn remove_persisted(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to remove persisted token: {e:#}");
        }
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 16 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(12).collect();
    format!("{prefix}...")
}
