// Public modules of the crate
pub mod common;
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod interfaces;

// Common re-exports
pub use application::ports::trash_ports::{RemoteTrashClient, TrashUseCase, TrashView};
pub use application::services::trash_controller::TrashController;
pub use common::config::AppConfig;
pub use common::errors::{DomainError, ErrorKind, Result};
pub use domain::entities::auth_context::AuthContext;
pub use domain::entities::trash_entry::{FsId, TrashEntry};
pub use infrastructure::remote::PcsTrashClient;
