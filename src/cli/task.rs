use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::cli::{emit, enter_board, Context};
use crate::error::{ErrorCode, TaskboardError};
use crate::models::{TaskDraft, TaskStatus};
use crate::output;
use crate::views::board::{LOAD_ASSIGNED_FAILED, LOAD_TASKS_FAILED};
use crate::views::TaskBoard;

pub async fn run(cmd: TaskCommands, ctx: &mut Context) -> Result<i32, TaskboardError> {
    enter_board(ctx)?;
    match cmd {
        TaskCommands::Create { title, description, due_date, status } => {
            run_create(ctx, &title, &description, &due_date, status.as_deref()).await
        }
        TaskCommands::List => run_list(ctx).await,
        TaskCommands::Assigned => run_assigned(ctx).await,
        TaskCommands::Status { id, status } => run_status(ctx, id, parse_status(&status)?).await,
        TaskCommands::Start { id } => run_status(ctx, id, TaskStatus::InProgress).await,
        TaskCommands::Complete { id } => run_status(ctx, id, TaskStatus::Completed).await,
        TaskCommands::Edit { id, title, description, status, due_date } => {
            let mut fields = Vec::new();
            if let Some(v) = title {
                fields.push(("title", v));
            }
            if let Some(v) = description {
                fields.push(("description", v));
            }
            if let Some(v) = status {
                fields.push(("status", v));
            }
            if let Some(v) = due_date {
                fields.push(("due_date", v));
            }
            run_edit(ctx, id, &fields).await
        }
        TaskCommands::Delete { id } => run_delete(ctx, id).await,
        TaskCommands::Assign { id, email } => run_assign(ctx, id, &email).await,
    }
}

pub(crate) fn parse_status(s: &str) -> Result<TaskStatus, TaskboardError> {
    TaskStatus::from_label(s).ok_or_else(|| {
        TaskboardError::validation(format!(
            "Unknown status '{s}'. Use one of: To Do, In Progress, Completed"
        ))
    })
}

pub(crate) fn apply_fields(draft: &mut TaskDraft, fields: &[(&str, String)]) -> Result<(), TaskboardError> {
    for (field, value) in fields {
        draft.set_field(field, value).map_err(TaskboardError::validation)?;
    }
    Ok(())
}

async fn loaded_board(ctx: &Context) -> TaskBoard {
    let mut board = TaskBoard::new();
    board.load(&ctx.app.api, &ctx.app.session).await;
    board
}

/// Board with only the owned list, for commands that act on one task.
async fn owned_board(ctx: &Context) -> Result<TaskBoard, TaskboardError> {
    let mut board = TaskBoard::new();
    board.load_owned(&ctx.app.api, &ctx.app.session).await;
    if board.errors().contains(&LOAD_TASKS_FAILED) {
        return Err(TaskboardError::new(ErrorCode::LoadFailed, LOAD_TASKS_FAILED));
    }
    Ok(board)
}

fn emit_task(ctx: &Context, board: &TaskBoard, id: i64, headline: &str) {
    match board.task(id) {
        Some(t) => emit(
            ctx.json,
            json!({ "task": output::json::task_json(t) }),
            &format!("{headline}\n{}", output::text::task_card(t, &ctx.date_format)),
        ),
        None => emit(ctx.json, json!({ "id": id }), &format!("{headline}\n")),
    }
}

async fn run_create(
    ctx: &mut Context,
    title: &str,
    description: &str,
    due_date: &str,
    status: Option<&str>,
) -> Result<i32, TaskboardError> {
    let mut board = TaskBoard::new();
    board.toggle_form();
    let mut fields = vec![
        ("title", title.to_string()),
        ("description", description.to_string()),
        ("due_date", due_date.to_string()),
    ];
    if let Some(s) = status {
        fields.push(("status", s.to_string()));
    }
    apply_fields(board.new_task_mut(), &fields)?;

    board.create_task(&ctx.app.api, &ctx.app.session).await?;
    let created = board
        .tasks()
        .last()
        .ok_or_else(|| TaskboardError::decode("backend returned no task"))?;

    emit(
        ctx.json,
        json!({ "task": output::json::task_json(created) }),
        &format!(
            "Created task: {} ({})\n{}",
            created.title,
            created.id,
            output::text::task_card(created, &ctx.date_format)
        ),
    );
    Ok(0)
}

async fn run_list(ctx: &mut Context) -> Result<i32, TaskboardError> {
    let board = owned_board(ctx).await?;
    emit(
        ctx.json,
        json!({ "tasks": board.tasks().iter().map(output::json::task_json).collect::<Vec<_>>() }),
        &output::text::task_list(board.tasks(), &ctx.date_format),
    );
    Ok(0)
}

async fn run_assigned(ctx: &mut Context) -> Result<i32, TaskboardError> {
    let board = loaded_board(ctx).await;
    if board.errors().contains(&LOAD_ASSIGNED_FAILED) {
        return Err(TaskboardError::new(ErrorCode::LoadFailed, LOAD_ASSIGNED_FAILED));
    }
    emit(
        ctx.json,
        json!({ "assigned": board.assigned().iter().map(output::json::assigned_json).collect::<Vec<_>>() }),
        &output::text::assigned_list(board.assigned(), &ctx.date_format),
    );
    Ok(0)
}

async fn run_status(ctx: &mut Context, id: i64, status: TaskStatus) -> Result<i32, TaskboardError> {
    let mut board = owned_board(ctx).await?;
    board.update_status(&ctx.app.api, &ctx.app.session, id, status).await?;
    emit_task(ctx, &board, id, &format!("Task {id} → {status}"));
    Ok(0)
}

async fn run_edit(ctx: &mut Context, id: i64, fields: &[(&str, String)]) -> Result<i32, TaskboardError> {
    if fields.is_empty() {
        return Err(TaskboardError::validation(
            "Nothing to change. Pass --title, --description, --status or --due-date.",
        ));
    }
    let mut board = owned_board(ctx).await?;
    board.begin_edit(id)?;
    if let Some(draft) = board.edit_draft_mut() {
        apply_fields(draft, fields)?;
    }
    board.save_edit(&ctx.app.api, &ctx.app.session).await?;
    emit_task(ctx, &board, id, &format!("Updated task {id}"));
    Ok(0)
}

async fn run_delete(ctx: &mut Context, id: i64) -> Result<i32, TaskboardError> {
    let mut board = owned_board(ctx).await?;
    let before = board.tasks().len();
    board.delete_task(&ctx.app.api, &ctx.app.session, id).await?;
    emit(
        ctx.json,
        json!({ "deleted": id, "remaining": board.tasks().len(), "before": before }),
        &format!("Deleted task {id}\n"),
    );
    Ok(0)
}

async fn run_assign(ctx: &mut Context, id: i64, email: &str) -> Result<i32, TaskboardError> {
    let mut board = owned_board(ctx).await?;
    board.set_assign_email(id, email);
    board.assign(&ctx.app.api, &ctx.app.session, id).await?;
    emit_task(ctx, &board, id, &format!("Assigned task {id} to {}", email.trim()));
    Ok(0)
}
