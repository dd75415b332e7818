//! Configuration file watcher for hot reload.
//!
//! Every change goes back through [`load_config`], so environment overrides
//! are re-applied (`AI_API_KEY` keeps winning over the file) and the result
//! is validated before it is sent. Reloads that change nothing are dropped;
//! editors often emit several events for one save.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ProxyConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ProxyConfig>,
}

/// Which reloadable settings differ between two configurations.
///
/// Credentials are compared, never logged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReloadChanges {
    pub api_key: bool,
    pub api_url: bool,
    pub upstream_timeout: bool,
    /// Anything else, including settings that only apply at startup.
    pub other: bool,
}

impl ReloadChanges {
    pub fn between(old: &ProxyConfig, new: &ProxyConfig) -> Self {
        let api_key = old.upstream.api_key != new.upstream.api_key;
        let api_url = old.upstream.api_url != new.upstream.api_url;
        let upstream_timeout = old.timeouts.upstream_secs != new.timeouts.upstream_secs;

        let mut rest = new.clone();
        rest.upstream = old.upstream.clone();
        rest.timeouts.upstream_secs = old.timeouts.upstream_secs;

        Self {
            api_key,
            api_url,
            upstream_timeout,
            other: rest != *old,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ProxyConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();
        let mut last = load_config(Some(&path)).ok();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = ?e, "Watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }

                let new_config = match load_config(Some(&path)) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::error!(
                            path = ?path,
                            error = %e,
                            "Failed to reload config, keeping current configuration"
                        );
                        return;
                    }
                };

                if let Some(old) = &last {
                    let changes = ReloadChanges::between(old, &new_config);
                    if changes.is_empty() {
                        tracing::debug!(path = ?path, "Config file touched without changes");
                        return;
                    }
                    tracing::info!(
                        path = ?path,
                        api_key_changed = changes.api_key,
                        api_url_changed = changes.api_url,
                        upstream_timeout_changed = changes.upstream_timeout,
                        other_changed = changes.other,
                        "Config file changed, sending reload"
                    );
                } else {
                    tracing::info!(path = ?path, "Config file is valid again, sending reload");
                }

                last = Some(new_config.clone());
                let _ = tx.send(new_config);
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
