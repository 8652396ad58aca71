pub mod books;

use std::sync::Arc;

use bookshelf_db::Database;
use bookshelf_kernel::ModuleRegistry;

use books::store::SqliteBookStore;

/// Register all application modules, wiring each to the shared database
pub fn register_all(registry: &mut ModuleRegistry, db: &Database) {
    let store = SqliteBookStore::new(db.pool().clone());
    registry.register(books::create_module(Arc::new(store)));
}
