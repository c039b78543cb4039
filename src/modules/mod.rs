pub mod authors;
pub mod books;
pub mod borrows;

use stacks_db::Database;
use stacks_kernel::ModuleRegistry;

/// Register every domain module with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &Database) {
    registry.register(authors::create_module(db.clone()));
    registry.register(books::create_module(db.clone()));
    registry.register(borrows::create_module(db.clone()));
}
