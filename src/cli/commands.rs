pub mod initdb;
pub mod seed;
pub mod show;

pub use initdb::init_database;
pub use seed::seed;
pub use show::{list_entities, show_bank, show_user, EntityKind};
