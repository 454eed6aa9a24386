//! Simulated install flow
//!
//! Installing has no real effect: the state flips to `Installing` at once and
//! to `Installed` after a fixed delay. There is no uninstall.

use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;

pub const INSTALL_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallState {
    NotInstalled,
    Installing,
    Installed,
}

impl InstallState {
    /// Label for the install button
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotInstalled => "Install",
            Self::Installing => "Installing...",
            Self::Installed => "Open",
        }
    }
}

/// Install state for one listing
#[derive(Debug)]
pub struct Installation {
    app_id: String,
    state: watch::Sender<InstallState>,
    delay: Duration,
}

impl Installation {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self::with_delay(app_id, INSTALL_DELAY)
    }

    pub fn with_delay(app_id: impl Into<String>, delay: Duration) -> Self {
        let (state, _) = watch::channel(InstallState::NotInstalled);
        Self {
            app_id: app_id.into(),
            state,
            delay,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn state(&self) -> InstallState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<InstallState> {
        self.state.subscribe()
    }

    /// Begin installing. Returns `false` if an install already started.
    ///
    /// Must be called inside a tokio runtime; the completion timer runs as a
    /// spawned task.
    pub fn start(&self) -> bool {
        let started = self.state.send_if_modified(|s| {
            if *s == InstallState::NotInstalled {
                *s = InstallState::Installing;
                true
            } else {
                false
            }
        });
        if !started {
            tracing::debug!("Install of {} already {:?}", self.app_id, self.state());
            return false;
        }

        tracing::info!("Installing {}", self.app_id);
        let state = self.state.clone();
        let delay = self.delay;
        let app_id = self.app_id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_replace(InstallState::Installed);
            tracing::info!("Installed {}", app_id);
        });
        true
    }

    /// Wait until the install has finished
    pub async fn wait_installed(&self) {
        let mut rx = self.subscribe();
        // Sender lives in self, so the channel cannot close while we wait.
        let _ = rx.wait_for(|s| *s == InstallState::Installed).await;
    }
}
