use crate::api::ApiClient;
use crate::app::App;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::TaskboardError;
use crate::session::{Session, SessionStore};

/// Everything a command needs, built once per process.
pub struct Context {
    pub app: App<ApiClient>,
    pub date_format: String,
    pub json: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, TaskboardError> {
        let config = Config::load()?.with_overrides(cli.api_url.clone(), cli.session_file.clone());
        config.validate()?;

        let session = Session::init(SessionStore::open(config.session_file()?));
        let api = ApiClient::new(&config.api_url)?;
        tracing::debug!(api_url = %api.base_url(), "client configured");

        Ok(Self {
            app: App::new(session, api),
            date_format: config.date_format,
            json: cli.json,
        })
    }
}
