//! Bookshelf: a book inventory service.
//!
//! The `books` module owns the store, serializer, and HTTP handlers; the
//! `bookshelf-*` crates supply settings, lifecycle, HTTP plumbing, and the pool.

pub mod modules;

pub use modules::register_all;

use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_kernel::ModuleRegistry;

/// Apply every module's schema to `db`
pub async fn apply_schema(registry: &ModuleRegistry, db: &Database) -> anyhow::Result<()> {
    for (module, schema) in registry.collect_schema() {
        db.apply_schema(&module, &schema)
            .await
            .with_context(|| format!("schema bootstrap failed for module '{module}'"))?;
    }
    Ok(())
}
