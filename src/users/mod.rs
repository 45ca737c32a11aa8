#[cfg(test)]
pub mod memory;
pub mod model;
pub mod password;
pub mod service;
pub mod store;

pub use model::PublicUser;
pub use service::{UserError, UserService};
