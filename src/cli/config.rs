use std::sync::Arc;

use crate::auth::AuthController;
use crate::cli::{Cli, OutputFormat};
use crate::config::{config, ClientConfig};
use crate::http::ApiClient;
use crate::pages::{IngredientPage, RecipePage};
use crate::render::TextSurface;
use crate::session::{FileStorage, SessionStore};

/// Everything a command needs: output format, the named session and a client
/// bound to it
pub struct CliContext {
    pub output_format: OutputFormat,
    pub config: &'static ClientConfig,
    pub storage: FileStorage,
    pub client: ApiClient,
}

impl CliContext {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        Self::new(OutputFormat::from_cli(cli), config(), &cli.session)
    }

    pub fn new(
        output_format: OutputFormat,
        config: &'static ClientConfig,
        session_name: &str,
    ) -> anyhow::Result<Self> {
        let storage = FileStorage::named(&config.session.dir, session_name)?;
        let session = Arc::new(SessionStore::new(storage.clone()));
        let client = ApiClient::new(&config.api, session)?;

        tracing::debug!(
            base_url = %client.base_url(),
            session = %storage.path().display(),
            "cli context ready"
        );

        Ok(Self {
            output_format,
            config,
            storage,
            client,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.client.session()
    }

    pub fn auth(&self) -> AuthController {
        AuthController::new(self.client.clone(), self.config.navigation.redirect_delay())
    }

    pub fn recipe_page(&self) -> RecipePage<TextSurface> {
        RecipePage::new(
            self.client.clone(),
            self.config.api.resolve_policy,
            self.auth(),
            TextSurface::default(),
        )
    }

    pub fn ingredient_page(&self) -> IngredientPage<TextSurface> {
        IngredientPage::new(
            self.client.clone(),
            self.config.api.resolve_policy,
            TextSurface::default(),
        )
    }
}
