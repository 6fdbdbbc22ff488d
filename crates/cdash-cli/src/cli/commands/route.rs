//! Route command handler.

use anyhow::Result;
use cdash_core::auth::Guard;
use cdash_core::routes::Route;

use super::AppContext;

pub fn open(ctx: &AppContext, path: &str) -> Result<()> {
    let route: Route = path.parse()?;

    if !route.is_protected() {
        println!("{route}: public");
        return Ok(());
    }

    match ctx.gate.guard(route) {
        Guard::Loading => println!("{route}: loading"),
        Guard::RedirectToLogin => {
            println!("{route}: redirect to {}", Route::Login);
        }
        Guard::Render(route) if route.is_placeholder() => {
            println!("{route}: not available yet");
        }
        Guard::Render(route) => println!("{route}: render ({})", command_hint(route)),
    }
    Ok(())
}

fn command_hint(route: Route) -> &'static str {
    match route {
        Route::Saved => "cdash saved list",
        Route::Profile => "cdash profile show",
        Route::Login => "cdash login",
        Route::Register => "cdash register",
        Route::Dashboard | Route::Settings | Route::BuyCredits => "cdash dashboard",
    }
}
