use anyhow::Context;
use stacks_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load settings")?;
    stacks_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "stacks-app bootstrap starting"
    );

    stacks_app::app::serve(&settings).await
}
