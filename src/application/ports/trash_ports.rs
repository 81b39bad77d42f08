use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::application::dtos::trash_dto::{AckDto, ListTrashResponseDto, TrashEntryDto};
use crate::common::errors::Result;
use crate::domain::entities::auth_context::AuthContext;
use crate::domain::entities::trash_entry::FsId;

/// Outbound port to the remote trash API
#[cfg_attr(any(test, feature = "test_utils"), mockall::automock)]
#[async_trait]
pub trait RemoteTrashClient: Send + Sync {
    /// Fetch one page of trash entries below `path`
    async fn list_trash(
        &self,
        auth: &AuthContext,
        path: &str,
        page: u32,
    ) -> Result<ListTrashResponseDto>;

    /// Restore the given entries to their original location
    async fn restore_trash(&self, auth: &AuthContext, fs_ids: &[FsId]) -> Result<AckDto>;

    /// Permanently delete the given entries
    async fn delete_trash(&self, auth: &AuthContext, fs_ids: &[FsId]) -> Result<AckDto>;

    /// Permanently delete everything in the trash
    async fn clear_trash(&self, auth: &AuthContext) -> Result<AckDto>;
}

/// Presentation boundary. Implementations render, the controller only notifies.
pub trait TrashView: Send + Sync {
    fn loading_started(&self);

    /// Called once per fetch completion, including failed ones
    fn loading_stopped(&self);

    fn list_reset(&self);

    fn entries_appended(&self, records: &[TrashEntryDto]);

    /// Restored entries show up in the home listing
    fn navigate_home(&self) {}
}

/// Inbound port for trash browsing intents.
///
/// Every operation dispatches its remote work on a background task and
/// returns the handle immediately; awaiting it is optional.
pub trait TrashUseCase: Send + Sync {
    /// Reset to page 1 and fetch it
    fn load(&self) -> JoinHandle<()>;

    /// Fetch and append the next page
    fn load_next(&self) -> JoinHandle<()>;

    fn reload(&self) -> JoinHandle<()> {
        self.load()
    }

    /// Load on first activation only
    fn ensure_loaded(&self) -> Option<JoinHandle<()>>;

    /// Returns `None` without any remote call when `fs_ids` is empty
    fn restore_selected(&self, fs_ids: &BTreeSet<FsId>) -> Option<JoinHandle<()>>;

    /// Returns `None` without any remote call when `fs_ids` is empty.
    /// Callers must confirm with the user first.
    fn delete_selected(&self, fs_ids: &BTreeSet<FsId>) -> Option<JoinHandle<()>>;

    fn clear_all(&self) -> JoinHandle<()>;
}
