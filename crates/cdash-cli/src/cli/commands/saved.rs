//! Saved feed command handlers.

use anyhow::Result;
use cdash_core::dashboard::Dashboard;

use super::feed::feed_table;
use super::{AppContext, print_notices};

pub async fn list(ctx: &mut AppContext) -> Result<()> {
    ctx.require_login()?;

    let mut dashboard = Dashboard::new();
    let result = dashboard.load_saved(&ctx.api).await;
    print_notices(&mut dashboard.notices);
    result?;

    println!("Credits: {}", dashboard.credits);
    if dashboard.saved.is_empty() {
        println!("No saved feeds yet.");
    } else {
        println!("{}", feed_table(&dashboard.saved));
    }
    Ok(())
}

pub async fn delete(ctx: &mut AppContext, id: &str) -> Result<()> {
    ctx.require_login()?;

    let mut dashboard = Dashboard::new();
    let result = dashboard.delete_saved(&ctx.api, id).await;
    print_notices(&mut dashboard.notices);
    result
}
