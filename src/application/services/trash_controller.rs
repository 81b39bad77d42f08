use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::application::dtos::pagination::PageCursor;
use crate::application::dtos::trash_dto::{AckDto, ListTrashResponseDto, TrashEntryDto};
use crate::application::ports::trash_ports::{RemoteTrashClient, TrashUseCase, TrashView};
use crate::common::config::TrashConfig;
use crate::common::errors::Result;
use crate::domain::entities::auth_context::AuthContext;
use crate::domain::entities::trash_entry::{FsId, TrashEntry};
use crate::domain::entities::trash_list::TrashListModel;

/// Mutating commands sent to the remote trash
#[derive(Debug, Clone, PartialEq, Eq)]
enum TrashMutation {
    Restore(Vec<FsId>),
    Delete(Vec<FsId>),
    Clear,
}

impl TrashMutation {
    fn name(&self) -> &'static str {
        match self {
            TrashMutation::Restore(_) => "restore",
            TrashMutation::Delete(_) => "delete",
            TrashMutation::Clear => "clear",
        }
    }
}

struct ControllerState {
    model: TrashListModel,
    cursor: PageCursor,
    loading: bool,
    first_run: bool,
}

struct ControllerInner {
    client: Arc<dyn RemoteTrashClient>,
    view: Arc<dyn TrashView>,
    auth: AuthContext,
    config: TrashConfig,
    state: Mutex<ControllerState>,
}

/// Drives the trash listing: pagination, page completions and mutations.
///
/// Cloning is cheap and every clone shares the same list and cursor. All
/// operations spawn onto the current Tokio runtime, so they must be called
/// from within one.
#[derive(Clone)]
pub struct TrashController {
    inner: Arc<ControllerInner>,
}

impl TrashController {
    pub fn new(
        client: Arc<dyn RemoteTrashClient>,
        view: Arc<dyn TrashView>,
        auth: AuthContext,
        config: TrashConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                client,
                view,
                auth,
                config,
                state: Mutex::new(ControllerState {
                    model: TrashListModel::new(),
                    cursor: PageCursor::default(),
                    loading: false,
                    first_run: true,
                }),
            }),
        }
    }

    /// Snapshot of the entries loaded so far, in server order
    pub fn entries(&self) -> Vec<TrashEntry> {
        self.inner.state().model.entries().to_vec()
    }

    /// Display records for every loaded entry, computed against the current time
    pub fn display_records(&self) -> Vec<TrashEntryDto> {
        let now = Utc::now();
        let retention = self.inner.config.retention_days;
        self.inner
            .state()
            .model
            .iter()
            .map(|entry| TrashEntryDto::from_entry(entry, retention, now))
            .collect()
    }

    pub fn page(&self) -> u32 {
        self.inner.state().cursor.page()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state().loading
    }

    pub fn len(&self) -> usize {
        self.inner.state().model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state().model.is_empty()
    }

    fn dispatch_mutation(&self, mutation: TrashMutation) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = inner.run_mutation(&mutation).await;
            match outcome {
                Ok(_) => info!("Trash {} completed", mutation.name()),
                Err(e) => warn!("Trash {} failed: {}", mutation.name(), e),
            }
            // Reload regardless of the outcome
            let (page, generation) = inner.begin_load();
            inner.fetch_page(page, generation).await;
        })
    }
}

impl ControllerInner {
    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Synchronous half of `load`: spinner, cursor reset, list reset
    fn begin_load(&self) -> (u32, u64) {
        self.view.loading_started();
        let (page, generation) = {
            let mut state = self.state();
            state.first_run = false;
            state.loading = true;
            state.model.clear();
            state.cursor.reset()
        };
        self.view.list_reset();
        (page, generation)
    }

    fn begin_load_next(&self) -> (u32, u64) {
        self.view.loading_started();
        let mut state = self.state();
        state.loading = true;
        state.cursor.advance()
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, page: u32, generation: u64) {
        debug!("Fetching trash page {}", page);
        let result = self
            .client
            .list_trash(&self.auth, &self.config.root_path, page)
            .await;
        self.on_page_fetched(page, generation, result);
    }

    /// Completion of a page fetch. Every failure is soft: the loading
    /// indicator stops and nothing is appended.
    fn on_page_fetched(&self, page: u32, generation: u64, result: Result<ListTrashResponseDto>) {
        let records = {
            let mut state = self.state();
            let current = state.cursor.is_current(generation);
            if current {
                state.loading = false;
            }

            match result {
                Err(e) => {
                    warn!("Listing trash page {} failed: {}", page, e);
                    None
                }
                Ok(response) if !response.is_success() => {
                    warn!("Listing trash page {} returned errno {}", page, response.errno);
                    None
                }
                Ok(response) if response.list.is_empty() => {
                    debug!("Trash page {} is empty", page);
                    None
                }
                Ok(_) if !current => {
                    debug!("Dropping stale trash page {} (generation {})", page, generation);
                    None
                }
                Ok(response) => {
                    let now = Utc::now();
                    let retention = self.config.retention_days;
                    let entries: Vec<TrashEntry> =
                        response.list.into_iter().map(TrashEntry::from).collect();
                    let appended = state.model.append_page(entries);
                    debug!("Appended {} trash entries from page {}", appended.len(), page);
                    Some(
                        appended
                            .iter()
                            .map(|entry| TrashEntryDto::from_entry(entry, retention, now))
                            .collect::<Vec<_>>(),
                    )
                }
            }
        };

        self.view.loading_stopped();
        if let Some(records) = records {
            self.view.entries_appended(&records);
        }
    }

    #[instrument(skip(self), fields(op = mutation.name()))]
    async fn run_mutation(&self, mutation: &TrashMutation) -> Result<AckDto> {
        let ack = match mutation {
            TrashMutation::Restore(ids) => self.client.restore_trash(&self.auth, ids).await?,
            TrashMutation::Delete(ids) => self.client.delete_trash(&self.auth, ids).await?,
            TrashMutation::Clear => self.client.clear_trash(&self.auth).await?,
        };
        ack.into_result()
    }
}

impl TrashUseCase for TrashController {
    fn load(&self) -> JoinHandle<()> {
        let (page, generation) = self.inner.begin_load();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.fetch_page(page, generation).await })
    }

    fn load_next(&self) -> JoinHandle<()> {
        let (page, generation) = self.inner.begin_load_next();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.fetch_page(page, generation).await })
    }

    fn ensure_loaded(&self) -> Option<JoinHandle<()>> {
        if !self.inner.state().first_run {
            return None;
        }
        Some(self.load())
    }

    fn restore_selected(&self, fs_ids: &BTreeSet<FsId>) -> Option<JoinHandle<()>> {
        if fs_ids.is_empty() {
            return None;
        }
        info!("Restoring {} trash entries", fs_ids.len());
        let handle = self.dispatch_mutation(TrashMutation::Restore(fs_ids.iter().copied().collect()));
        self.inner.view.navigate_home();
        Some(handle)
    }

    fn delete_selected(&self, fs_ids: &BTreeSet<FsId>) -> Option<JoinHandle<()>> {
        if fs_ids.is_empty() {
            return None;
        }
        info!("Deleting {} trash entries permanently", fs_ids.len());
        Some(self.dispatch_mutation(TrashMutation::Delete(fs_ids.iter().copied().collect())))
    }

    fn clear_all(&self) -> JoinHandle<()> {
        info!("Clearing trash");
        self.dispatch_mutation(TrashMutation::Clear)
    }
}
