use std::time::Duration;

use crossbeam_channel::Sender;

use crate::config::SessionConfig;
use crate::timer::Timer;

/// One-shot session-length timer. When it expires the viewer is "sent"
/// elsewhere; by default that is only simulated with a notice.
#[derive(Debug)]
pub struct IdleRedirect {
    timeout: Duration,
    url: String,
    open_in_browser: bool,
    timer: Option<Timer>,
    expired: bool,
}

impl IdleRedirect {
    pub fn start<T>(cfg: &SessionConfig, tx: Sender<T>, message: T) -> Self
    where
        T: Send + 'static,
    {
        tracing::debug!(timeout = ?cfg.idle_timeout, "session timer armed");
        Self {
            timeout: cfg.idle_timeout,
            url: cfg.redirect_url.clone(),
            open_in_browser: cfg.open_redirect,
            timer: Some(Timer::schedule(cfg.idle_timeout, tx, message)),
            expired: false,
        }
    }

    #[cfg(test)]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Handles the expiry message and returns the notice to show. The
    /// redirect happens at most once per session.
    pub fn expire(&mut self) -> String {
        self.timer = None;
        if std::mem::replace(&mut self.expired, true) {
            return format!("Session already redirected to {}.", self.url);
        }
        let minutes = self.timeout.as_secs() / 60;
        tracing::info!(
            "Redirecting user to {} after {} minutes.",
            self.url,
            minutes
        );
        if self.open_in_browser {
            if let Err(err) = webbrowser::open(&self.url) {
                tracing::warn!(url = %self.url, "failed to open redirect: {err}");
            }
            format!("Session time is up. Opened {}.", self.url)
        } else {
            format!("Simulation: Redirecting to {} now!", self.url)
        }
    }

    pub fn cancel(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
            tracing::debug!("session timer cancelled");
        }
    }
}

impl Drop for IdleRedirect {
    fn drop(&mut self) {
        self.cancel();
    }
}
