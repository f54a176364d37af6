use serde_json::json;

use crate::cli::{emit, Context};
use crate::error::TaskboardError;
use crate::views::{LoginView, SignupView};

pub async fn run_login(ctx: &mut Context, email: &str, password: &str) -> Result<i32, TaskboardError> {
    let mut view = LoginView::new(email, password);
    let route = view.submit(&ctx.app.api, &ctx.app.session).await?;
    let nav = ctx.app.navigate(route);

    emit(
        ctx.json,
        json!({ "email": email.trim(), "route": nav.resolved.path() }),
        &format!("Logged in as {}\n", email.trim()),
    );
    Ok(0)
}

pub async fn run_signup(
    ctx: &mut Context,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<i32, TaskboardError> {
    let mut view = SignupView::new(full_name, email, password);
    let route = view.submit(&ctx.app.api).await?;
    let nav = ctx.app.navigate(route);

    emit(
        ctx.json,
        json!({ "email": email.trim(), "route": nav.resolved.path() }),
        &format!(
            "Account created for {}. Run `taskboard login` to sign in.\n",
            email.trim()
        ),
    );
    Ok(0)
}

pub fn run_logout(ctx: &mut Context) -> Result<i32, TaskboardError> {
    let had_session = ctx.app.session.is_authenticated();
    ctx.app.session.teardown()?;
    let nav = ctx.app.navigate(crate::app::Route::Login);

    emit(
        ctx.json,
        json!({ "cleared": had_session, "route": nav.resolved.path() }),
        if had_session { "Logged out\n" } else { "No active session\n" },
    );
    Ok(0)
}
