pub mod commands;
pub mod context;
pub mod auth;
pub mod board;
pub mod task;
pub mod shell;

pub use commands::*;
pub use context::Context;

use serde_json::Value;

use crate::app::Route;
use crate::error::{ErrorCode, TaskboardError};
use crate::output;

/// Exit code when a protected view was requested without a session.
pub const EXIT_REDIRECTED: i32 = 2;

pub async fn dispatch(cli: Cli) -> i32 {
    let json_output = cli.json;
    let mut ctx = match Context::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => return report_error(&e, json_output),
    };

    let result = match cli.command {
        Commands::Login { email, password } => auth::run_login(&mut ctx, &email, &password).await,
        Commands::Signup { full_name, email, password } => {
            auth::run_signup(&mut ctx, &full_name, &email, &password).await
        }
        Commands::Logout => auth::run_logout(&mut ctx),
        Commands::Open { path } => board::run_open(&mut ctx, &path),
        Commands::Board => board::run_board(&mut ctx).await,
        Commands::Task(cmd) => task::run(cmd, &mut ctx).await,
        Commands::Shell => shell::run(&mut ctx).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => report_error(&e, json_output),
    }
}

pub(crate) fn report_error(e: &TaskboardError, json_output: bool) -> i32 {
    if json_output {
        println!("{}", pretty(&output::json::error(e)));
    } else {
        eprintln!("Error: {}", e.message);
    }
    if e.code == ErrorCode::NotAuthenticated {
        EXIT_REDIRECTED
    } else {
        1
    }
}

/// Prints a success envelope in JSON mode, the text rendering otherwise.
pub(crate) fn emit(json_output: bool, data: Value, text: &str) {
    if json_output {
        println!("{}", pretty(&output::json::success(data)));
    } else {
        print!("{text}");
    }
}

/// Fails with `NOT_AUTHENTICATED` when the guard sends `/tasks` back to login.
pub(crate) fn enter_board(ctx: &mut Context) -> Result<(), TaskboardError> {
    let nav = ctx.app.navigate(Route::Tasks);
    if nav.redirected() {
        return Err(TaskboardError::new(
            ErrorCode::NotAuthenticated,
            format!(
                "Not logged in; redirected to {}. Run `taskboard login` first.",
                nav.resolved
            ),
        ));
    }
    Ok(())
}

fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}
