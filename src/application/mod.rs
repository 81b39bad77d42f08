pub mod dtos;
pub mod ports;
pub mod services;

// Re-exports of the main ports
pub use ports::trash_ports::{RemoteTrashClient, TrashUseCase, TrashView};
