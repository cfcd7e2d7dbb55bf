use anyhow::Context;

use adoptme_app::App;
use adoptme_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    adoptme_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.server.bind_address(),
        "adoptme-app bootstrap starting"
    );

    App::bootstrap(settings).await?.serve().await
}
