//! Interactive session: one board, one event loop, commands read from stdin.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::Route;
use crate::cli::task::{apply_fields, parse_status};
use crate::cli::{enter_board, Context};
use crate::error::TaskboardError;
use crate::models::TaskStatus;
use crate::output;
use crate::views::board::Phase;
use crate::views::{LoginView, SignupView, TaskBoard};

const HELP: &str = "\
Anywhere:
  open <path>                     go to /login, /signup, /tasks or /
  login <email> <password>
  signup <email> <password> <full name...>
  logout
  help | quit
Board (/tasks):
  board                           render the board
  refresh                         reload both lists
  new                             show or hide the create form
  set <field> <value...>          fill the create form (title, description, status, due)
  create                          submit the create form
  cancel-form                     close the create form, keeping what was typed
  edit <id>                       start editing (drops any other open edit)
  draft <field> <value...>        change the open edit
  save | cancel                   submit or drop the open edit
  status <id> <status...>         To Do | In Progress | Completed
  start <id> | complete <id>
  email <id> <email>              type into a task's assign box
  assign <id> [email]             assign using the typed (or given) email
  delete <id>
  dismiss                         clear error banners
";

enum Flow {
    Continue,
    Quit,
}

struct Shell<'a> {
    ctx: &'a mut Context,
    board: TaskBoard,
}

pub async fn run(ctx: &mut Context) -> Result<i32, TaskboardError> {
    let mut shell = Shell {
        ctx,
        board: TaskBoard::new(),
    };
    shell.open(Route::Tasks.path()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        shell.prompt();
        let line = lines
            .next_line()
            .await
            .map_err(|e| TaskboardError::transport(format!("failed to read stdin: {e}")))?;
        let Some(line) = line else {
            break;
        };
        let args = split_args(&line);
        if args.is_empty() {
            continue;
        }
        match shell.exec(&args).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("! {}", e.message),
        }
    }
    shell.board.unmount();
    Ok(0)
}

impl Shell<'_> {
    fn prompt(&self) {
        print!("taskboard:{}> ", self.ctx.app.current());
        let _ = std::io::stdout().flush();
    }

    fn render(&self) {
        print!("{}", output::text::board(&self.board, &self.ctx.date_format));
    }

    async fn open(&mut self, path: &str) -> Result<(), TaskboardError> {
        let nav = self.ctx.app.navigate_path(path)?;
        match nav.resolved {
            Route::Tasks => {
                self.board.load(&self.ctx.app.api, &self.ctx.app.session).await;
                self.render();
            }
            Route::Login => {
                self.board.unmount();
                if nav.redirected() {
                    println!("Not logged in. Use `login <email> <password>`.");
                } else {
                    println!("Login. Use `login <email> <password>` or `open /signup`.");
                }
            }
            Route::Signup => {
                self.board.unmount();
                println!("Create Account. Use `signup <email> <password> <full name>`.");
            }
        }
        Ok(())
    }

    async fn exec(&mut self, args: &[String]) -> Result<Flow, TaskboardError> {
        let cmd = args[0].as_str();
        match cmd {
            "help" | "?" => print!("{HELP}"),
            "quit" | "exit" => return Ok(Flow::Quit),
            "open" => self.open(arg(args, 1, "path")?).await?,
            "login" => {
                let mut view = LoginView::new(arg(args, 1, "email")?, arg(args, 2, "password")?);
                let route = view.submit(&self.ctx.app.api, &self.ctx.app.session).await?;
                self.open(route.path()).await?;
            }
            "signup" => {
                let full_name = rest(args, 3, "full name")?;
                let mut view = SignupView::new(full_name, arg(args, 1, "email")?, arg(args, 2, "password")?);
                let route = view.submit(&self.ctx.app.api).await?;
                println!("Account created.");
                self.open(route.path()).await?;
            }
            "logout" => {
                let route = self.board.logout(&self.ctx.app.session)?;
                self.ctx.app.navigate(route);
                println!("Logged out");
            }
            _ => self.exec_board(args).await?,
        }
        Ok(Flow::Continue)
    }

    async fn exec_board(&mut self, args: &[String]) -> Result<(), TaskboardError> {
        let returning = self.ctx.app.current() != Route::Tasks;
        enter_board(self.ctx)?;
        let api = &self.ctx.app.api;
        let session = &self.ctx.app.session;
        if returning || self.board.phase() == Phase::Unmounted {
            self.board.load(api, session).await;
        }

        match args[0].as_str() {
            "board" => self.render(),
            "refresh" => {
                self.board.load(api, session).await;
                self.render();
            }
            "new" => {
                let shown = self.board.toggle_form();
                println!("{}", if shown { "Add New Task" } else { "Form closed" });
            }
            "set" => {
                let field = arg(args, 1, "field")?;
                let value = rest(args, 2, "value")?;
                apply_fields(self.board.new_task_mut(), &[(field, value)])?;
            }
            "cancel-form" => {
                if self.board.show_form() {
                    self.board.toggle_form();
                }
            }
            "create" => {
                self.board.create_task(api, session).await?;
                if let Some(t) = self.board.tasks().last() {
                    println!("Created task: {} ({})", t.title, t.id);
                }
            }
            "edit" => {
                let id = parse_id(arg(args, 1, "id")?)?;
                self.board.begin_edit(id)?;
                if let Some(editing) = self.board.editing() {
                    print!(
                        "{}",
                        output::text::draft(&format!("Editing #{id}"), &editing.draft, &self.ctx.date_format)
                    );
                }
            }
            "draft" => {
                let field = arg(args, 1, "field")?;
                let value = rest(args, 2, "value")?;
                let draft = self
                    .board
                    .edit_draft_mut()
                    .ok_or_else(|| TaskboardError::validation("no task is being edited; use `edit <id>`"))?;
                apply_fields(draft, &[(field, value)])?;
            }
            "save" => {
                self.board.save_edit(api, session).await?;
                println!("Saved");
            }
            "cancel" => {
                if self.board.cancel_edit() {
                    println!("Edit discarded");
                }
            }
            "status" => {
                let id = parse_id(arg(args, 1, "id")?)?;
                let status = parse_status(&rest(args, 2, "status")?)?;
                self.set_status(id, status).await?;
            }
            "start" => {
                let id = parse_id(arg(args, 1, "id")?)?;
                self.set_status(id, TaskStatus::InProgress).await?;
            }
            "complete" => {
                let id = parse_id(arg(args, 1, "id")?)?;
                self.set_status(id, TaskStatus::Completed).await?;
            }
            "email" => {
                let id = parse_id(arg(args, 1, "id")?)?;
                self.board.set_assign_email(id, arg(args, 2, "email")?);
            }
            "assign" => {
                let id = parse_id(arg(args, 1, "id")?)?;
                if let Some(email) = args.get(2) {
                    self.board.set_assign_email(id, email.as_str());
                }
                self.board.assign(api, session, id).await?;
                println!("Assigned task {id}");
            }
            "delete" => {
                let id = parse_id(arg(args, 1, "id")?)?;
                self.board.delete_task(api, session, id).await?;
                println!("Deleted task {id}");
            }
            "dismiss" => self.board.dismiss_errors(),
            other => {
                return Err(TaskboardError::validation(format!(
                    "unknown command '{other}' (try `help`)"
                )))
            }
        }
        Ok(())
    }

    async fn set_status(&mut self, id: i64, status: TaskStatus) -> Result<(), TaskboardError> {
        self.board
            .update_status(&self.ctx.app.api, &self.ctx.app.session, id, status)
            .await?;
        println!("Task {id} → {status}");
        Ok(())
    }
}

fn arg<'a>(args: &'a [String], idx: usize, name: &str) -> Result<&'a str, TaskboardError> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| TaskboardError::validation(format!("missing <{name}>")))
}

fn rest(args: &[String], from: usize, name: &str) -> Result<String, TaskboardError> {
    if args.len() <= from {
        return Err(TaskboardError::validation(format!("missing <{name}>")));
    }
    Ok(args[from..].join(" "))
}

fn parse_id(s: &str) -> Result<i64, TaskboardError> {
    s.trim_start_matches('#')
        .parse()
        .map_err(|_| TaskboardError::validation(format!("invalid task id: {s}")))
}

/// Whitespace split with double-quoted segments kept together.
fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}
