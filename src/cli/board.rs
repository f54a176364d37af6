use serde_json::json;

use crate::app::Route;
use crate::cli::{emit, enter_board, Context, EXIT_REDIRECTED};
use crate::error::TaskboardError;
use crate::output;
use crate::views::TaskBoard;

pub async fn run_board(ctx: &mut Context) -> Result<i32, TaskboardError> {
    enter_board(ctx)?;
    let mut board = TaskBoard::new();
    board.load(&ctx.app.api, &ctx.app.session).await;

    emit(
        ctx.json,
        output::json::board_json(&board),
        &output::text::board(&board, &ctx.date_format),
    );
    Ok(0)
}

pub fn run_open(ctx: &mut Context, path: &str) -> Result<i32, TaskboardError> {
    let nav = ctx.app.navigate_path(path)?;
    let view = match nav.resolved {
        Route::Login => "Login",
        Route::Signup => "Create Account",
        Route::Tasks => "Main Board",
    };
    let text = if nav.redirected() {
        format!("{} -> {} ({view}): not logged in\n", nav.requested, nav.resolved)
    } else {
        format!("{} ({view})\n", nav.resolved)
    };

    let mut data = output::json::navigation_json(&nav);
    data["view"] = json!(view);
    emit(ctx.json, data, &text);
    Ok(if nav.redirected() { EXIT_REDIRECTED } else { 0 })
}
