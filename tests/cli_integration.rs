#[allow(deprecated)]
use assert_cmd::Command;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ─── mock backend ──────────────────────────────────────────────────

const EMAIL: &str = "ann@example.com";
const PASSWORD: &str = "secret";
const TOKEN: &str = "tok-ann";

#[derive(Default)]
struct Backend {
    users: Vec<(String, String)>,
    tasks: Vec<Value>,
    assigned: Value,
    next_id: i64,
    fail_my_tasks: bool,
    my_tasks_hits: usize,
    assigned_hits: usize,
}

type Shared = Arc<Mutex<Backend>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "missing or bad token").into_response()
}

async fn login(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let s = s.lock().unwrap();
    let ok = s
        .users
        .iter()
        .any(|(e, p)| body["email"] == e.as_str() && body["password"] == p.as_str());
    if ok {
        Json(json!({ "token": TOKEN })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "bad credentials").into_response()
    }
}

async fn signup(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = s.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if body["fullName"].as_str().unwrap_or_default().is_empty()
        || s.users.iter().any(|(e, _)| *e == email)
    {
        return (StatusCode::BAD_REQUEST, "cannot sign up").into_response();
    }
    let password = body["password"].as_str().unwrap_or_default().to_string();
    s.users.push((email, password));
    (StatusCode::OK, "created").into_response()
}

async fn create_task(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = s.lock().unwrap();
    s.next_id += 1;
    let task = json!({
        "id": s.next_id,
        "title": body["title"],
        "description": body["description"],
        "status": body["status"],
        "dueDate": body["dueDate"],
        "assignedToUsers": []
    });
    s.tasks.push(task.clone());
    Json(task).into_response()
}

async fn my_tasks(State(s): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = s.lock().unwrap();
    s.my_tasks_hits += 1;
    if s.fail_my_tasks {
        return (StatusCode::INTERNAL_SERVER_ERROR, "db down").into_response();
    }
    Json(Value::Array(s.tasks.clone())).into_response()
}

async fn assigned_tasks(State(s): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = s.lock().unwrap();
    s.assigned_hits += 1;
    Json(s.assigned.clone()).into_response()
}

/// Stores the raw request body as the status, quotes and all.
async fn update_status(
    State(s): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    body: String,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = s.lock().unwrap();
    match s.tasks.iter_mut().find(|t| t["id"] == id) {
        Some(t) => {
            t["status"] = json!(body);
            (StatusCode::OK, "updated").into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such task").into_response(),
    }
}

async fn update_task(
    State(s): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = s.lock().unwrap();
    match s.tasks.iter_mut().find(|t| t["id"] == id) {
        Some(t) => {
            for key in ["title", "description", "status", "dueDate"] {
                t[key] = body[key].clone();
            }
            Json(t.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such task").into_response(),
    }
}

async fn delete_task(State(s): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = s.lock().unwrap();
    let before = s.tasks.len();
    s.tasks.retain(|t| t["id"] != id);
    if s.tasks.len() == before {
        return (StatusCode::NOT_FOUND, "no such task").into_response();
    }
    (StatusCode::OK, "deleted").into_response()
}

async fn assign(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = s.lock().unwrap();
    let id = body["taskId"].as_i64().unwrap_or_default();
    match s.tasks.iter_mut().find(|t| t["id"] == id) {
        Some(t) => {
            for email in body["assignedToEmails"].as_array().cloned().unwrap_or_default() {
                t["assignedToUsers"]
                    .as_array_mut()
                    .unwrap()
                    .push(json!({ "email": email }));
            }
            Json(json!({ "status": t["status"] })).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such task").into_response(),
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/tasks/create", post(create_task))
        .route("/tasks/mytasks", get(my_tasks))
        .route("/tasks/assigned", get(assigned_tasks))
        .route("/tasks/updateStatus/:id", put(update_status))
        .route("/tasks/update/:id", put(update_task))
        .route("/tasks/delete/:id", delete(delete_task))
        .route("/tasks/assign", post(assign))
        .with_state(state)
}

fn spawn_backend(state: Shared) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    listener.set_nonblocking(true).expect("nonblocking");
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, router(state)).await.expect("serve");
        });
    });
    format!("http://{addr}")
}

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
    api_url: String,
    backend: Shared,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        let backend: Shared = Arc::new(Mutex::new(Backend {
            users: vec![(EMAIL.to_string(), PASSWORD.to_string())],
            assigned: json!([]),
            ..Backend::default()
        }));
        let api_url = spawn_backend(backend.clone());
        Self { dir, api_url, backend }
    }

    fn session_file(&self) -> PathBuf {
        self.dir.path().join("state").join("session.json")
    }

    fn cmd(&self) -> Command {
        self.cmd_against(&self.api_url)
    }

    fn cmd_against(&self, api_url: &str) -> Command {
        let mut cmd = Command::cargo_bin("taskboard").expect("binary");
        cmd.current_dir(self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path())
            .env("HOME", self.dir.path())
            .env_remove("TASKBOARD_API_URL")
            .env_remove("TASKBOARD_SESSION_PATH")
            .env_remove("TASKBOARD_DATE_FORMAT")
            .env_remove("TASKBOARD_LOG")
            .arg("--api-url")
            .arg(api_url)
            .arg("--session-file")
            .arg(self.session_file());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn login(&self) {
        self.run_ok(&["login", "--email", EMAIL, "--password", PASSWORD]);
    }

    fn create(&self, title: &str) -> i64 {
        let v = self.run_ok(&[
            "task",
            "create",
            "--title",
            title,
            "--description",
            &format!("{title} details"),
            "--due-date",
            "2024-03-05",
        ]);
        v["data"]["task"]["id"].as_i64().expect("task id")
    }

    fn set_assigned_rows(&self, rows: Value) {
        self.backend.lock().unwrap().assigned = rows;
    }
}

// ─── auth ──────────────────────────────────────────────────────────

#[test]
fn login_stores_session_and_routes_to_board() {
    let env = TestEnv::new();
    let v = env.run_ok(&["login", "--email", EMAIL, "--password", PASSWORD]);
    assert_eq!(v["data"]["route"], "/tasks");

    let stored: Value =
        serde_json::from_str(&std::fs::read_to_string(env.session_file()).unwrap()).unwrap();
    assert_eq!(stored["token"], TOKEN);
}

#[test]
fn wrong_password_reports_generic_login_error() {
    let env = TestEnv::new();
    let v = env.run_err(&["login", "--email", EMAIL, "--password", "nope"]);
    assert_eq!(v["error"]["code"], "LOGIN_FAILED");
    assert_eq!(v["error"]["message"], "Invalid credentials. Please try again.");
    assert!(!env.session_file().exists());
}

#[test]
fn unreachable_backend_looks_like_bad_credentials() {
    let env = TestEnv::new();
    let output = env
        .cmd_against("http://127.0.0.1:9")
        .args(["login", "--email", EMAIL, "--password", PASSWORD, "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["error"]["message"], "Invalid credentials. Please try again.");
}

#[test]
fn login_validates_fields_before_calling_backend() {
    let env = TestEnv::new();
    let v = env.run_err(&["login", "--email", "not-an-email", "--password", PASSWORD]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn signup_does_not_log_in() {
    let env = TestEnv::new();
    let v = env.run_ok(&[
        "signup",
        "--full-name",
        "Bob Builder",
        "--email",
        "bob@example.com",
        "--password",
        "pw2",
    ]);
    assert_eq!(v["data"]["route"], "/login");
    assert!(!env.session_file().exists());

    env.run_ok(&["login", "--email", "bob@example.com", "--password", "pw2"]);
}

#[test]
fn duplicate_signup_fails() {
    let env = TestEnv::new();
    let v = env.run_err(&[
        "signup",
        "--full-name",
        "Ann",
        "--email",
        EMAIL,
        "--password",
        "x",
    ]);
    assert_eq!(v["error"]["code"], "SIGNUP_FAILED");
    assert_eq!(v["error"]["message"], "Signup failed. Please try again.");
}

#[test]
fn logout_clears_session_and_board_redirects() {
    let env = TestEnv::new();
    env.login();
    env.cmd()
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!env.session_file().exists());

    env.cmd()
        .arg("board")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Not logged in"));
}

// ─── routing ───────────────────────────────────────────────────────

#[test]
fn board_without_session_exits_with_redirect_code() {
    let env = TestEnv::new();
    let output = env.cmd().args(["board", "--json"]).output().expect("run");
    assert_eq!(output.status.code(), Some(2));
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["error"]["code"], "NOT_AUTHENTICATED");
}

#[test]
fn open_resolves_routes_through_guard() {
    let env = TestEnv::new();

    let output = env.cmd().args(["open", "/tasks", "--json"]).output().expect("run");
    assert_eq!(output.status.code(), Some(2));
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["data"]["route"], "/login");
    assert_eq!(v["data"]["redirected"], true);

    let v = env.run_ok(&["open", "/"]);
    assert_eq!(v["data"]["route"], "/login");
    let v = env.run_ok(&["open", "/signup"]);
    assert_eq!(v["data"]["view"], "Create Account");

    env.login();
    let v = env.run_ok(&["open", "/tasks"]);
    assert_eq!(v["data"]["route"], "/tasks");
    assert_eq!(v["data"]["redirected"], false);
}

#[test]
fn open_unknown_route_fails() {
    let env = TestEnv::new();
    let v = env.run_err(&["open", "/admin"]);
    assert_eq!(v["error"]["code"], "UNKNOWN_ROUTE");
}

// ─── board and tasks ───────────────────────────────────────────────

#[test]
fn create_then_board_lists_task() {
    let env = TestEnv::new();
    env.login();
    let id = env.create("Write report");

    let v = env.run_ok(&["board"]);
    let tasks = v["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], id);
    assert_eq!(tasks[0]["status"], "To Do");
    assert_eq!(tasks[0]["badge"], "to-do");
    assert_eq!(tasks[0]["dueDate"], "2024-03-05");

    env.cmd()
        .arg("board")
        .assert()
        .success()
        .stdout(predicate::str::contains("Main Board"))
        .stdout(predicate::str::contains("Write report"))
        .stdout(predicate::str::contains("3/5/2024"))
        .stdout(predicate::str::contains("No users assigned"))
        .stdout(predicate::str::contains("No tasks assigned to you yet"));
}

#[test]
fn create_requires_all_fields() {
    let env = TestEnv::new();
    env.login();
    let v = env.run_err(&[
        "task",
        "create",
        "--title",
        "",
        "--description",
        "d",
        "--due-date",
        "2024-03-05",
    ]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    assert!(env.backend.lock().unwrap().tasks.is_empty());
}

#[test]
fn status_change_survives_quoted_storage() {
    let env = TestEnv::new();
    env.login();
    let id = env.create("Ship");
    let id_s = id.to_string();

    let v = env.run_ok(&["task", "start", &id_s]);
    assert_eq!(v["data"]["task"]["status"], "In Progress");

    // The backend kept the JSON-encoded body verbatim.
    let stored = env.backend.lock().unwrap().tasks[0]["status"].clone();
    assert_eq!(stored, "\"In Progress\"");

    let v = env.run_ok(&["task", "list"]);
    assert_eq!(v["data"]["tasks"][0]["status"], "In Progress");
    assert_eq!(v["data"]["tasks"][0]["badge"], "in-progress");

    let v = env.run_ok(&["task", "status", &id_s, "completed"]);
    assert_eq!(v["data"]["task"]["status"], "Completed");
}

#[test]
fn unknown_status_is_rejected_locally() {
    let env = TestEnv::new();
    env.login();
    let id = env.create("Ship").to_string();
    let v = env.run_err(&["task", "status", &id, "Blocked"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn edit_keeps_unspecified_fields() {
    let env = TestEnv::new();
    env.login();
    let id = env.create("Draft").to_string();

    let v = env.run_ok(&["task", "edit", &id, "--title", "Final"]);
    let t = &v["data"]["task"];
    assert_eq!(t["title"], "Final");
    assert_eq!(t["description"], "Draft details");
    assert_eq!(t["dueDate"], "2024-03-05");

    let v = env.run_err(&["task", "edit", &id]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn edit_unknown_task_is_not_found() {
    let env = TestEnv::new();
    env.login();
    let v = env.run_err(&["task", "edit", "99", "--title", "x"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn assigning_twice_appends_twice() {
    let env = TestEnv::new();
    env.login();
    let id = env.create("Pair").to_string();

    env.run_ok(&["task", "assign", &id, "bob@example.com"]);
    let v = env.run_ok(&["task", "assign", &id, "bob@example.com"]);
    let users = v["data"]["task"]["assignedToUsers"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1]["email"], "bob@example.com");

    env.cmd()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Assigned To: bob@example.com, bob@example.com"));
}

#[test]
fn assign_rejects_bad_email() {
    let env = TestEnv::new();
    env.login();
    let id = env.create("Pair").to_string();
    let v = env.run_err(&["task", "assign", &id, "bob"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn delete_removes_task_and_missing_task_fails() {
    let env = TestEnv::new();
    env.login();
    let id = env.create("Temp").to_string();

    let v = env.run_ok(&["task", "delete", &id]);
    assert_eq!(v["data"]["remaining"], 0);

    let v = env.run_ok(&["task", "list"]);
    assert!(v["data"]["tasks"].as_array().unwrap().is_empty());

    let v = env.run_err(&["task", "delete", &id]);
    assert_eq!(v["error"]["code"], "DELETE_FAILED");
    assert_eq!(v["error"]["message"], "ไม่สามารถลบงานได้");
}

#[test]
fn assigned_rows_are_read_by_position() {
    let env = TestEnv::new();
    env.login();
    env.set_assigned_rows(json!([
        ["Report", "Quarterly numbers", 7, "x", "2024-02-01T00:00:00", "\"In Progress\""]
    ]));

    let v = env.run_ok(&["task", "assigned"]);
    let row = &v["data"]["assigned"][0];
    assert_eq!(row["title"], "Report");
    assert_eq!(row["description"], "Quarterly numbers");
    assert_eq!(row["status"], "In Progress");
    assert_eq!(row["dueDate"], "2024-02-01");

    env.cmd()
        .args(["task", "assigned"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2/1/2024"));
}

#[test]
fn broken_assigned_list_keeps_my_tasks_on_board() {
    let env = TestEnv::new();
    env.login();
    env.create("Mine");
    env.set_assigned_rows(json!({ "unexpected": true }));

    let v = env.run_ok(&["board"]);
    assert_eq!(v["data"]["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(v["data"]["errors"][0], "ไม่สามารถดึงงานที่ได้รับมอบหมาย");

    let v = env.run_err(&["task", "assigned"]);
    assert_eq!(v["error"]["code"], "LOAD_FAILED");
}

#[test]
fn single_task_commands_fetch_only_owned_list() {
    let env = TestEnv::new();
    env.login();
    let id = env.create("Solo").to_string();

    env.run_ok(&["task", "start", &id]);
    env.run_ok(&["task", "assign", &id, "bob@example.com"]);
    env.run_ok(&["task", "edit", &id, "--title", "Solo 2"]);
    env.run_ok(&["task", "list"]);
    assert_eq!(env.backend.lock().unwrap().assigned_hits, 0);
}

#[test]
fn edit_reports_load_failure_before_lookup() {
    let env = TestEnv::new();
    env.login();
    let id = env.create("Solo").to_string();
    env.backend.lock().unwrap().fail_my_tasks = true;

    let v = env.run_err(&["task", "edit", &id, "--title", "x"]);
    assert_eq!(v["error"]["code"], "LOAD_FAILED");
    assert_eq!(v["error"]["message"], "ไม่สามารถดึงข้อมูลงานได้");

    let v = env.run_err(&["task", "delete", &id]);
    assert_eq!(v["error"]["code"], "LOAD_FAILED");
}

#[test]
fn date_format_is_configurable() {
    let env = TestEnv::new();
    env.login();
    env.create("Dated");
    env.cmd()
        .env("TASKBOARD_DATE_FORMAT", "%d.%m.%Y")
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("05.03.2024"));
}

// ─── shell ─────────────────────────────────────────────────────────

#[test]
fn shell_runs_a_scripted_session() {
    let env = TestEnv::new();
    let script = format!(
        "login {EMAIL} {PASSWORD}\n\
         new\n\
         set title \"Plan trip\"\n\
         set description Book flights\n\
         set due 2024-07-01\n\
         create\n\
         start 1\n\
         email 1 bob@example.com\n\
         assign 1\n\
         edit 1\n\
         draft title Plan holiday\n\
         save\n\
         board\n\
         quit\n"
    );
    env.cmd()
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"))
        .stdout(predicate::str::contains("Created task: Plan trip (1)"))
        .stdout(predicate::str::contains("Assigned task 1"))
        .stdout(predicate::str::contains("Plan holiday"))
        .stdout(predicate::str::contains("In Progress (in-progress)"));

    let t = env.backend.lock().unwrap().tasks[0].clone();
    assert_eq!(t["title"], "Plan holiday");
    assert_eq!(t["assignedToUsers"][0]["email"], "bob@example.com");
}

#[test]
fn shell_reports_errors_and_keeps_going() {
    let env = TestEnv::new();
    env.login();
    env.cmd()
        .arg("shell")
        .write_stdin("delete 42\nfrobnicate\nsave\nlogout\nboard\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("! ไม่สามารถลบงานได้"))
        .stdout(predicate::str::contains("! unknown command 'frobnicate'"))
        .stdout(predicate::str::contains("! no task is being edited"))
        .stdout(predicate::str::contains("Logged out"))
        .stdout(predicate::str::contains("! Not logged in"));
}

#[test]
fn shell_reloads_board_when_returning_from_another_view() {
    let env = TestEnv::new();
    env.login();
    env.create("First");

    env.cmd()
        .arg("shell")
        .write_stdin("open /signup\nboard\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Create Account"))
        .stdout(predicate::str::contains("#1 First"));

    // One load at startup and one after coming back from /signup.
    let backend = env.backend.lock().unwrap();
    assert_eq!(backend.my_tasks_hits, 2);
    assert_eq!(backend.assigned_hits, 2);
}
