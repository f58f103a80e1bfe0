//! Wiring of the adapters behind the CLI commands

use std::sync::Arc;

use anyhow::Context;
use application::{AutosaveContext, AutosaveManager, EditorSession, NetworkMonitor};
use domain::ArticleId;
use infrastructure::{
    AppConfig, BlogDraftRemoteAdapter, ConnectivityProbe, RedbKeyValueStore, SystemClock,
};
use tracing::debug;

/// Store, session and backend client for one CLI invocation
pub(crate) struct App {
    pub config: AppConfig,
    pub store: Arc<RedbKeyValueStore>,
    pub session: EditorSession,
    pub remote: Arc<BlogDraftRemoteAdapter>,
}

/// A running autosave manager plus what keeps its connectivity signal fresh
pub(crate) struct Connected {
    pub manager: AutosaveManager,
    pub monitor: Arc<NetworkMonitor>,
    _probe: Option<ConnectivityProbe>,
}

impl Drop for Connected {
    fn drop(&mut self) {
        self.manager.destroy();
    }
}

impl App {
    pub(crate) fn open(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(
            RedbKeyValueStore::open(&config.storage.path).with_context(|| {
                format!("Failed to open store at {}", config.storage.path.display())
            })?,
        );
        let ctx = AutosaveContext::new(
            Arc::clone(&store) as _,
            Arc::new(SystemClock),
            config.autosave.settings(),
        );
        let remote = Arc::new(BlogDraftRemoteAdapter::with_config(config.api.clone())?);

        Ok(Self {
            config,
            store,
            session: EditorSession::new(ctx),
            remote,
        })
    }

    /// Whether the backend answers, or `None` when probing is disabled
    pub(crate) async fn backend_reachable(&self) -> Option<bool> {
        if !self.config.connectivity.probe_enabled {
            return None;
        }
        Some(self.remote.client().is_reachable().await)
    }

    /// Start an autosave manager for `identity`
    ///
    /// The online signal starts from a reachability check and is kept up to
    /// date by a background probe while the manager runs.
    pub(crate) async fn connect(&self, identity: Option<ArticleId>) -> anyhow::Result<Connected> {
        let online = self.backend_reachable().await.unwrap_or(true);
        let monitor = Arc::new(NetworkMonitor::new(online));
        debug!(online, "Connectivity established");

        let manager = self.session.start(identity, self.remote.clone(), monitor.as_ref())?;
        let probe = if self.config.connectivity.probe_enabled {
            Some(ConnectivityProbe::spawn(
                self.remote.client(),
                Arc::clone(&monitor),
                self.config.connectivity.probe_interval(),
            )?)
        } else {
            None
        };

        Ok(Connected {
            manager,
            monitor,
            _probe: probe,
        })
    }
}
