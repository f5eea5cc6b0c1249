//! Users module - the user directory consumed by snapshotting and linking.

mod users_model;
mod users_traits;

pub use users_model::{NewUser, User};
pub use users_traits::UserRepositoryTrait;
