use std::sync::Arc;

use juniordev::agent::ModeRouter;
use juniordev::github::GithubClient;
use juniordev::llm::{ChatProvider, OpenAiProvider};
use juniordev::logging;
use juniordev::prompt::PromptAssembler;
use juniordev::session::FileSessionStore;
use juniordev::settings::Settings;
use juniordev::telegram::TelegramBot;
use juniordev::webhook::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = logging::init_logging()?;

    tracing::info!("=== juniordev starting ===");

    let settings = Settings::from_env()?;

    let bot = TelegramBot::new(&settings.telegram_token);
    let store = Arc::new(FileSessionStore::new(&settings.sessions_dir));
    let llm = Arc::new(OpenAiProvider::new(
        &settings.openai_api_key,
        &settings.openai_model,
    ));
    let github = Arc::new(GithubClient::new(
        &settings.github_app_jwt,
        settings.github_installation_id,
        &settings.github_api_version,
    ));
    let prompts = Arc::new(PromptAssembler::new()?);

    tracing::info!(model = llm.model(), "components initialized");

    let router = ModeRouter::new(store, llm, github, prompts);
    let state = Arc::new(AppState { bot, router });

    webhook::serve(state, settings.bind_addr).await
}
