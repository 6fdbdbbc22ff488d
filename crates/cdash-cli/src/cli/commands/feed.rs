//! Dashboard and feed command handlers.

use anyhow::{Context, Result, anyhow};
use cdash_core::api::UserAccount;
use cdash_core::dashboard::Dashboard;
use cdash_core::feed::FeedItem;
use comfy_table::{ContentArrangement, Table};

use super::{AppContext, print_notices, truncate};

pub async fn dashboard(ctx: &mut AppContext) -> Result<()> {
    ctx.require_login()?;

    let mut dashboard = Dashboard::new();
    let result = dashboard.load(&ctx.api, &ctx.gate).await;
    print_notices(&mut dashboard.notices);
    result?;

    let name = ctx.gate.identity().map_or("User", |id| id.display_name());
    println!("Welcome, {name}");
    println!("Credits: {}", dashboard.credits);
    println!();

    if dashboard.feeds.is_empty() {
        println!("No feeds available.");
    } else {
        println!("Feeds ({})", dashboard.feeds.len());
        println!("{}", feed_table(&dashboard.feeds));
    }
    println!();
    println!("Saved items: {}", dashboard.saved.len());

    if ctx.gate.is_admin() && !dashboard.users.is_empty() {
        println!();
        println!("Users ({})", dashboard.users.len());
        println!("{}", user_table(&dashboard.users));
    }
    Ok(())
}

pub async fn list(ctx: &mut AppContext) -> Result<()> {
    ctx.require_login()?;

    let mut dashboard = Dashboard::new();
    let result = dashboard.refresh_feeds(&ctx.api).await;
    print_notices(&mut dashboard.notices);
    result?;

    if dashboard.feeds.is_empty() {
        println!("No feeds available.");
    } else {
        println!("{}", feed_table(&dashboard.feeds));
    }
    Ok(())
}

pub async fn save(ctx: &mut AppContext, id: &str) -> Result<()> {
    ctx.require_login()?;

    let mut dashboard = Dashboard::new();
    let result = dashboard.refresh_feeds(&ctx.api).await;
    print_notices(&mut dashboard.notices);
    result.context("load feeds")?;

    let item = dashboard
        .find_feed(id)
        .cloned()
        .ok_or_else(|| anyhow!("Feed '{id}' not found in the current feed list"))?;

    let result = dashboard.save_feed(&ctx.api, &item).await;
    print_notices(&mut dashboard.notices);
    result?;

    println!("Credits: {}", dashboard.credits);
    Ok(())
}

pub async fn report(ctx: &mut AppContext, id: &str) -> Result<()> {
    ctx.require_login()?;

    let mut dashboard = Dashboard::new();
    let result = dashboard.report_feed(&ctx.api, id).await;
    print_notices(&mut dashboard.notices);
    result
}

pub async fn credits(ctx: &mut AppContext) -> Result<()> {
    ctx.require_login()?;

    let credits = ctx.api.credits().await.context("Failed to fetch credits")?;
    println!("Credits: {credits}");
    Ok(())
}

pub(super) fn feed_table(feeds: &[FeedItem]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Source", "Title", "Preview", "Link"]);
    for feed in feeds {
        table.add_row([
            feed.id.clone(),
            feed.source.clone(),
            truncate(&feed.title, 60),
            feed.preview.as_deref().map(|p| truncate(p, 80)).unwrap_or_default(),
            feed.link.clone(),
        ]);
    }
    table
}

pub(super) fn user_table(users: &[UserAccount]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Name", "Email", "Role", "Credits"]);
    for user in users {
        table.add_row([
            user.id.clone(),
            user.name.clone(),
            user.email.clone(),
            user.role.to_string(),
            user.credits.to_string(),
        ]);
    }
    table
}
