//! Admin command handlers.

use anyhow::Result;
use cdash_core::admin::{AdminPanel, parse_credit_amount};
use cdash_core::dashboard::Dashboard;

use super::feed::user_table;
use super::{AppContext, print_notices};

pub async fn users(ctx: &mut AppContext) -> Result<()> {
    ctx.require_admin()?;

    let mut panel = AdminPanel::default();
    let result = panel.load_users(&ctx.api).await;
    print_notices(&mut panel.notices);
    result?;

    if panel.users.is_empty() {
        println!("No users found.");
    } else {
        println!("{}", user_table(&panel.users));
    }
    Ok(())
}

pub async fn analytics(ctx: &mut AppContext) -> Result<()> {
    ctx.require_admin()?;

    let mut panel = AdminPanel::default();
    let result = panel.analytics(&ctx.api).await;
    print_notices(&mut panel.notices);
    let analytics = result?;

    println!("Total posts:    {}", analytics.total_posts);
    println!("Reported posts: {}", analytics.reported_posts);
    println!("Saved posts:    {}", analytics.saved_posts);
    println!("Active users:   {}", analytics.active_users);
    Ok(())
}

pub async fn add_credits(ctx: &mut AppContext, user_id: &str, amount: &str) -> Result<()> {
    ctx.require_admin()?;

    let mut panel = AdminPanel::default();
    let result = panel
        .add_credits(&ctx.api, user_id, parse_credit_amount(amount))
        .await;
    print_notices(&mut panel.notices);
    result
}

pub async fn toggle_role(ctx: &mut AppContext, user_id: &str) -> Result<()> {
    ctx.require_admin()?;

    let mut panel = AdminPanel::default();
    let mut result = panel.load_users(&ctx.api).await;
    if result.is_ok() {
        result = panel.toggle_role(&ctx.api, user_id).await;
    }
    print_notices(&mut panel.notices);
    result
}

pub async fn aggregate_linkedin(ctx: &mut AppContext) -> Result<()> {
    ctx.require_admin()?;

    println!("Aggregating LinkedIn feeds...");
    let mut dashboard = Dashboard::new();
    let result = dashboard.aggregate_linkedin(&ctx.api).await;
    print_notices(&mut dashboard.notices);
    result?;

    println!("Feeds now available: {}", dashboard.feeds.len());
    Ok(())
}
