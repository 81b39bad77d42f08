use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::application::ports::trash_ports::{RemoteTrashClient, TrashUseCase, TrashView};
use crate::application::services::trash_controller::TrashController;
use crate::common::config::AppConfig;
use crate::domain::entities::auth_context::AuthContext;
use crate::domain::entities::trash_entry::FsId;

/// Browse and manage the trash of a cloud storage account
#[derive(Parser, Debug)]
#[command(name = "cloud-trash", author, version, about, long_about = None)]
pub struct Cli {
    /// Web API base URL (overrides CLOUD_TRASH_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List trash entries, newest first
    List {
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Restore entries to their original location
    Restore {
        #[arg(value_name = "FS_ID", required = true)]
        ids: Vec<FsId>,
    },
    /// Permanently delete entries
    Delete {
        #[arg(value_name = "FS_ID", required = true)]
        ids: Vec<FsId>,
        /// Confirm permanent deletion
        #[arg(long)]
        yes: bool,
    },
    /// Permanently delete everything in the trash
    Clear {
        /// Confirm permanent deletion
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Applies command line overrides on top of the environment configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.remote.api_url = if url.ends_with('/') { url.clone() } else { format!("{}/", url) };
        }
    }
}

/// Runs one CLI command; the refreshed listing is rendered through `view`
pub async fn run(
    command: Command,
    config: &AppConfig,
    client: Arc<dyn RemoteTrashClient>,
    view: Arc<dyn TrashView>,
) -> anyhow::Result<()> {
    let auth = AuthContext::new(config.remote.cookie.clone(), config.remote.bdstoken.clone());
    if auth.is_empty() {
        bail!("No session cookie configured, set CLOUD_TRASH_COOKIE");
    }

    let controller = TrashController::new(client, view, auth, config.trash.clone());

    match command {
        Command::List { pages } => {
            controller.load().await.context("listing task failed")?;
            for _ in 1..pages {
                controller.load_next().await.context("listing task failed")?;
            }
            info!("{} entries on {} page(s)", controller.len(), controller.page());
        }
        Command::Restore { ids } => {
            let ids: BTreeSet<FsId> = ids.into_iter().collect();
            if let Some(handle) = controller.restore_selected(&ids) {
                handle.await.context("restore task failed")?;
            }
        }
        Command::Delete { ids, yes } => {
            if !yes {
                bail!("Refusing to delete {} entries permanently without --yes", ids.len());
            }
            let ids: BTreeSet<FsId> = ids.into_iter().collect();
            if let Some(handle) = controller.delete_selected(&ids) {
                handle.await.context("delete task failed")?;
            }
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("Refusing to clear the trash without --yes");
            }
            controller.clear_all().await.context("clear task failed")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dtos::trash_dto::ListTrashResponseDto;
    use crate::application::ports::trash_ports::MockRemoteTrashClient;
    use crate::interfaces::console::ConsoleTrashView;

    fn config_with_cookie() -> AppConfig {
        let mut config = AppConfig::default();
        config.remote.cookie = "BDUSS=abc".to_string();
        config
    }

    fn sink() -> Arc<dyn TrashView> {
        Arc::new(ConsoleTrashView::new(std::io::sink()))
    }

    #[test]
    fn test_parse_restore_ids() {
        let cli = Cli::try_parse_from(["cloud-trash", "restore", "12", "34"]).unwrap();
        match cli.command {
            Command::Restore { ids } => assert_eq!(ids, vec![FsId(12), FsId(34)]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_id() {
        assert!(Cli::try_parse_from(["cloud-trash", "delete", "abc"]).is_err());
    }

    #[test]
    fn test_api_url_override() {
        let cli = Cli::try_parse_from(["cloud-trash", "--api-url", "http://localhost/api", "clear"]).unwrap();
        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.remote.api_url, "http://localhost/api/");
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        // No expectations: nothing may reach the remote API
        let client = Arc::new(MockRemoteTrashClient::new());
        let command = Command::Delete { ids: vec![FsId(1)], yes: false };

        let result = run(command, &config_with_cookie(), client, sink()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_cookie_is_an_error() {
        let client = Arc::new(MockRemoteTrashClient::new());
        let result = run(Command::List { pages: 1 }, &AppConfig::default(), client, sink()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_fetches_requested_pages() {
        let mut client = MockRemoteTrashClient::new();
        client
            .expect_list_trash()
            .times(3)
            .returning(|_, _, _| Ok(ListTrashResponseDto { errno: 0, list: vec![] }));

        run(Command::List { pages: 3 }, &config_with_cookie(), Arc::new(client), sink())
            .await
            .unwrap();
    }
}
