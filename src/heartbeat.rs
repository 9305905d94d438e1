//! Background liveness probe.
//!
//! The probe owns its own HTTP client and publishes a single boolean over
//! a watch channel. It shares nothing with game sessions; a failed probe
//! only flips the flag a front end shows as "Offline".

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, instrument, warn};

/// Probes `url` once. Any 2xx answer within `deadline` counts as reachable.
#[instrument(skip(client))]
pub async fn probe(client: &reqwest::Client, url: &str, deadline: Duration) -> bool {
    match timeout(deadline, client.get(url).send()).await {
        Ok(Ok(response)) if response.status().is_success() => {
            debug!("Keep-alive ping succeeded");
            true
        }
        Ok(Ok(response)) => {
            warn!(status = %response.status(), "Keep-alive ping returned error status");
            false
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Keep-alive ping failed");
            false
        }
        Err(_) => {
            warn!("Keep-alive ping timed out");
            false
        }
    }
}

/// Handle to a running heartbeat task. Dropping it stops the task.
#[derive(Debug)]
pub struct Heartbeat {
    connected: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl Heartbeat {
    /// Spawns a task that probes `url` immediately and then every `every`.
    ///
    /// Starts out reporting `false` until the first probe completes.
    #[instrument]
    pub fn spawn(url: String, every: Duration) -> Self {
        let (tx, rx) = watch::channel(false);
        let deadline = every.min(Duration::from_secs(10));

        let task = tokio::spawn(async move {
            let client = reqwest::Client::new();
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let ok = probe(&client, &url, deadline).await;
                tx.send_replace(ok);
                if tx.is_closed() {
                    debug!("Heartbeat receivers gone, stopping");
                    break;
                }
            }
        });

        Self {
            connected: rx,
            task,
        }
    }

    /// Latest probe result.
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// A receiver for observing changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.connected.clone()
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_server_reports_disconnected() {
        let client = reqwest::Client::new();
        // Port 9 (discard) on localhost is almost never listening.
        let ok = probe(&client, "http://127.0.0.1:9/", Duration::from_millis(500)).await;
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_heartbeat_starts_disconnected() {
        let heartbeat = Heartbeat::spawn("http://127.0.0.1:9/".to_string(), Duration::from_secs(60));
        assert!(!heartbeat.is_connected());
    }
}
