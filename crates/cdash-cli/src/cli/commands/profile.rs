//! Profile command handlers.

use anyhow::Result;
use cdash_core::profile::{ProfileForm, ProfilePage};

use super::{AppContext, print_notices, read_secret_line};

pub async fn show(ctx: &mut AppContext) -> Result<()> {
    ctx.require_login()?;

    let mut page = ProfilePage::new();
    let result = page.fetch(&ctx.api, &mut ctx.gate).await;
    print_notices(&mut page.notices);
    result?;

    if let Some(account) = &page.account {
        println!("{}", account.name);
        println!("  Email:   {}", account.email);
        println!("  Role:    {}", account.role);
    }
    println!("  Credits: {}", page.credits);
    Ok(())
}

/// Fields left out keep their current values.
pub async fn update(
    ctx: &mut AppContext,
    name: Option<String>,
    email: Option<String>,
    password_stdin: bool,
) -> Result<()> {
    ctx.require_login()?;

    let mut page = ProfilePage::new();
    let result = page.fetch(&ctx.api, &mut ctx.gate).await;
    print_notices(&mut page.notices);
    result?;

    let current = page.account.clone().unwrap_or_default();
    let (password, confirm_password) = if password_stdin {
        let password = read_secret_line("New password: ")?;
        let confirm = read_secret_line("Confirm password: ")?;
        (Some(password), Some(confirm))
    } else {
        (None, None)
    };

    let form = ProfileForm {
        name: name.unwrap_or(current.name),
        email: email.unwrap_or(current.email),
        password,
        confirm_password,
    };

    let result = page.update(&mut ctx.api, &mut ctx.gate, &form).await;
    print_notices(&mut page.notices);
    result?;

    println!("  Credits: {}", page.credits);
    Ok(())
}
