use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)
        .with_context(|| "failed to initialize telemetry")?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.path.display(),
        "bookshelf bootstrap starting"
    );

    let db = Database::connect(&settings.database)
        .await
        .with_context(|| "failed to open book store")?;

    let mut registry = ModuleRegistry::new();
    bookshelf::register_all(&mut registry, &db);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    bookshelf::apply_schema(&registry, &db).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("bookshelf bootstrap complete");

    let served = bookshelf_http::start_server(&registry, &settings.server).await;
    registry.stop_modules().await?;
    served
}
