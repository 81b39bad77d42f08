pub mod pcs_trash_client;

pub use pcs_trash_client::PcsTrashClient;
