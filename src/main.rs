use hujiang_case::{app::App, logging, settings::Settings};
use log::LevelFilter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Logging comes first so a settings fallback is recorded.
    logging::init(hujiang_case::settings::data_dir()?, LevelFilter::Info)?;
    log::info!("Hujiang case start: {}", chrono::Local::now());

    let settings = Settings::load()?;
    if settings.debug_mode {
        logging::set_level(LevelFilter::Debug);
    }

    if !settings.has_api_key() {
        // Not fatal: the first call to the Game Master fails and says so.
        log::error!(
            "API key is missing. Set {} or add it to the settings file.",
            hujiang_case::settings::API_KEY_VAR
        );
    }

    let mut app = App::new(settings);
    app.run().await
}
