use std::path::PathBuf;

use clap::{Parser, Subcommand};

const VERSION: &str = env!("TASKBOARD_VERSION");

#[derive(Parser)]
#[command(
    name = "taskboard",
    version = VERSION,
    about = "Terminal client for the task board service",
    after_help = "\
CONFIG:
  Backend URL: --api-url, else TASKBOARD_API_URL, else ~/.config/taskboard/config.toml,
  else http://localhost:8080.
  Session token is kept in <config-dir>/taskboard/session.json (TASKBOARD_SESSION_PATH
  or --session-file to override). Logging via TASKBOARD_LOG (e.g. TASKBOARD_LOG=debug).

EXIT CODES:
  0  Success
  1  Error (validation, backend rejected the action, transport failure, etc.)
  2  Not logged in: the board was requested without a session token

BEHAVIOR NOTES:
  `logout` only forgets the local token; the backend is not contacted.
  `signup` does not log in. Run `login` afterwards.
  `task assign` appends the email even if it is already assigned.
  Wrong password and an unreachable backend report the same login error."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Session file holding the bearer token
    #[arg(long, global = true, value_name = "PATH")]
    pub session_file: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account (does not log in)
    Signup {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Resolve a client route (/, /login, /signup, /tasks) through the login guard
    Open {
        /// Route path
        path: String,
    },

    /// Show my tasks and tasks assigned to me
    Board,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Interactive board session reading commands from stdin
    #[command(after_help = "\
Type `help` inside the shell for the command list.
Drafts, the create form, and per-task assign inputs live for the whole session.")]
    Shell,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: String,
        /// To Do | In Progress | Completed (default: To Do)
        #[arg(long)]
        status: Option<String>,
    },
    /// List my tasks
    List,
    /// List tasks assigned to me
    Assigned,
    /// Set status (todo | in-progress | completed, or the display names)
    Status {
        id: i64,
        status: String,
    },
    /// Set status to In Progress
    Start {
        id: i64,
    },
    /// Set status to Completed
    Complete {
        id: i64,
    },
    /// Edit a task; unspecified fields keep their current values
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        due_date: Option<String>,
    },
    /// Delete a task
    Delete {
        id: i64,
    },
    /// Assign a task to a user by email
    Assign {
        id: i64,
        email: String,
    },
}
