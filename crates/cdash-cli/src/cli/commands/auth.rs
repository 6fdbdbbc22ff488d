//! Auth command handlers.

use anyhow::{Context, Result, bail};
use cdash_core::auth::{TokenStore, mask_token};
use tracing::info;

use super::{AppContext, read_secret_line};

pub async fn login(ctx: &mut AppContext, email: &str) -> Result<()> {
    let email = email.trim();
    let password = read_secret_line("Password: ")?;
    if email.is_empty() || password.is_empty() {
        bail!("Email and password are required");
    }

    let res = ctx.api.login(email, &password).await.context("Login failed")?;
    ctx.gate.set_token(res.token);
    ctx.sync_token();

    let Some(identity) = ctx.gate.identity() else {
        bail!("Login failed: the server returned a token that could not be read");
    };
    info!(role = %identity.role, "Logged in");
    println!("✓ Login successful! Welcome, {}", identity.display_name());
    println!("  Token saved to: {}", ctx.gate.store().path().display());
    Ok(())
}

pub async fn register(ctx: &mut AppContext, name: &str, email: &str) -> Result<()> {
    let password = read_secret_line("Password: ")?;
    if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        bail!("Name, email and password are required");
    }

    let res = ctx
        .api
        .register(name.trim(), email.trim(), &password)
        .await
        .context("Registration failed")?;

    match res.token.filter(|t| !t.is_empty()) {
        Some(token) => {
            ctx.gate.set_token(token);
            ctx.sync_token();
            let who = ctx
                .gate
                .identity()
                .map_or_else(|| name.to_string(), |id| id.display_name().to_string());
            println!("✓ Registration successful! Welcome, {who}");
        }
        None => {
            let message = res
                .message
                .unwrap_or_else(|| "Registration successful".to_string());
            println!("✓ {message}");
            println!("  Run `cdash login --email {}` to sign in.", email.trim());
        }
    }
    Ok(())
}

pub fn logout(ctx: &mut AppContext) -> Result<()> {
    let had_token = ctx.gate.store().load()?.is_some();
    ctx.gate.logout();

    if had_token {
        println!("✓ Logged out");
        println!("  Token removed from: {}", ctx.gate.store().path().display());
    } else {
        println!("Not logged in (no token found).");
    }
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    let Some(identity) = ctx.gate.identity() else {
        println!("Not logged in.");
        return Ok(());
    };

    println!("{}", identity.display_name());
    if !identity.email.is_empty() {
        println!("  Email: {}", identity.email);
    }
    println!("  Role:  {}", identity.role);
    if !identity.id.is_empty() {
        println!("  ID:    {}", identity.id);
    }
    if let Some(expires) = identity.expires_at() {
        println!("  Token expires: {}", expires.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(token) = ctx.gate.token() {
        println!("  Token: {}", mask_token(token));
    }
    Ok(())
}
