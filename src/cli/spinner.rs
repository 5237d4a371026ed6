//! Progress spinner shown while an external tool blocks.

use super::OutputManager;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const FRAMES: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Running spinner task.
///
/// [`Spinner::stop`] cancels and joins the task, after which the line is
/// clear for the next status message. Dropping a spinner without calling
/// `stop` still cancels the task.
pub struct Spinner {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Starts a spinner, or an inert one when output is not interactive.
    pub fn start(output: &OutputManager) -> Self {
        let cancel = CancellationToken::new();

        if !output.is_interactive() {
            return Self {
                cancel,
                handle: None,
            };
        }

        let token = cancel.clone();
        let output = output.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            let mut frames = FRAMES.chars().cycle();

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Some(frame) = frames.next() {
                            let _ = output.spinner_frame(frame);
                        }
                    }
                }
            }

            let _ = output.clear_spinner();
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Whether a spinner task was actually spawned.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops the spinner and waits until its line is cleared.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::debug!("spinner task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
