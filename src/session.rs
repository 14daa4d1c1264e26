use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use directories::UserDirs;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::constants::{
    DEFAULT_SEED_URL, EXPORT_FILENAME, FALLBACK_URL, LOAD_WAIT_SECS, RELOAD_SETTLE_SECS,
    REQUEST_TIMEOUT_SECS, TICK_INTERVAL_SECS, USER_AGENT,
};
use crate::driver;
use crate::error::SurfError;
use crate::host::{HttpTab, TabHost};
use crate::models::{ControlMessage, SessionEvent, VisitedSnapshot};
use crate::visited::{SharedVisited, VisitedStore};

/// Walk tunables. Defaults mirror `constants`; tests shrink the delays.
#[derive(Debug, Clone)]
pub struct SurfConfig {
    pub seed_url: String,
    pub fallback_url: String,
    pub tick_interval: Duration,
    pub reload_settle: Duration,
    pub load_wait: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Export target directory. None means the user's download directory,
    /// falling back to the current directory.
    pub export_dir: Option<PathBuf>,
}

impl Default for SurfConfig {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            fallback_url: FALLBACK_URL.to_string(),
            tick_interval: Duration::from_secs(TICK_INTERVAL_SECS),
            reload_settle: Duration::from_secs(RELOAD_SETTLE_SECS),
            load_wait: Duration::from_secs(LOAD_WAIT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            export_dir: None,
        }
    }
}

/// A live walk: the stop signal and the driver task it controls. Created on
/// start, destroyed on stop.
struct BrowsingState {
    stop: watch::Sender<bool>,
    driver: JoinHandle<()>,
}

/// Owns the visited store and the walk lifecycle, and answers the control
/// surface.
pub struct Session {
    config: SurfConfig,
    visited: SharedVisited,
    state: Option<BrowsingState>,
    events: mpsc::Sender<SessionEvent>,
}

impl Session {
    pub fn new(config: SurfConfig, events: mpsc::Sender<SessionEvent>) -> Self {
        Self {
            config,
            visited: Arc::new(Mutex::new(VisitedStore::new())),
            state: None,
            events,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.as_ref().is_some_and(|s| !s.driver.is_finished())
    }

    /// Start the walk on an HTTP-backed host at the configured seed.
    pub fn start(&mut self) -> Result<(), SurfError> {
        let host = HttpTab::new(
            &self.config.seed_url,
            &self.config.user_agent,
            self.config.request_timeout,
        )?;
        self.start_with(host);
        Ok(())
    }

    /// Start the walk on a caller-provided host. A second start while one is
    /// running is ignored, so at most one driver ever exists.
    pub fn start_with<H>(&mut self, host: H)
    where
        H: TabHost + 'static,
    {
        if self.is_running() {
            warn!("start ignored: walk already running");
            self.notify(SessionEvent::AlreadyRunning);
            return;
        }

        // A fresh channel per start: a driver from an earlier run that is
        // still draining can never observe this run's flag
        let (stop_tx, stop_rx) = watch::channel(true);
        let driver = tokio::spawn(driver::run(
            host,
            Arc::clone(&self.visited),
            self.config.clone(),
            stop_rx,
            self.events.clone(),
        ));
        self.state = Some(BrowsingState {
            stop: stop_tx,
            driver,
        });
        info!("walk started at {}", self.config.seed_url);
        self.notify(SessionEvent::Started);
    }

    /// Stop the walk. The driver is signalled, not aborted: an in-flight
    /// cycle ends at its next checkpoint without touching the host again.
    pub fn stop(&mut self) {
        if let Some(state) = self.state.take() {
            let _ = state.stop.send(false);
            info!("walk stopped");
            self.notify(SessionEvent::Stopped);
        }
    }

    pub fn snapshot(&self) -> VisitedSnapshot {
        VisitedSnapshot {
            links: self.visited.lock().list(),
        }
    }

    /// Write the visited set to the fixed export filename, one URL per line.
    pub async fn export(&self) -> Result<(PathBuf, usize), SurfError> {
        let path = self.export_dir().join(EXPORT_FILENAME);
        let (body, count) = {
            let store = self.visited.lock();
            (store.to_text(), store.len())
        };
        tokio::fs::write(&path, body).await?;
        info!("exported {} links to {}", count, path.display());
        Ok((path, count))
    }

    fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.config.export_dir {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub async fn handle_message(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::Start => {
                if let Err(err) = self.start() {
                    warn!("failed to start walk: {}", err);
                    self.notify(SessionEvent::Failed(err.to_string()));
                }
            }
            ControlMessage::Stop => self.stop(),
            ControlMessage::SaveLinks => match self.export().await {
                Ok((path, count)) => self.notify(SessionEvent::Exported(path, count)),
                Err(err) => {
                    warn!("export failed: {}", err);
                    self.notify(SessionEvent::Failed(err.to_string()));
                }
            },
            ControlMessage::GetVisitedLinks { respond_to } => {
                let _ = respond_to.send(self.snapshot());
            }
        }
    }

    fn notify(&self, event: SessionEvent) {
        let _ = self.events.try_send(event);
    }
}

/// Drain control messages until every sender is gone, then stop the walk.
pub async fn run_session(mut session: Session, mut control: mpsc::Receiver<ControlMessage>) {
    while let Some(message) = control.recv().await {
        session.handle_message(message).await;
    }
    session.stop();
}
