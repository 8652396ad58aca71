use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Idempotent DDL a module needs present before it starts serving.
///
/// Applied on every start; statements must tolerate an existing table.
#[derive(Debug, Clone)]
pub struct Schema {
    pub id: &'static str,
    pub ddl: &'static str,
}

/// Core module trait that all bookshelf modules implement
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; also its mount path (`/{name}`)
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context
    /// Called during application startup before the schema is applied
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Return table definitions owned by this module
    fn schema(&self) -> Vec<Schema> {
        vec![]
    }

    /// Called after the schema is in place
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during application shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
