//! SQLite storage implementation for the user directory.

mod model;
mod repository;

pub use model::UserDB;
pub use repository::UserRepository;
