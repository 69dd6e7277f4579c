//! Session clock and the background rest reminder.
//!
//! The clock is a two-state machine (idle / active), re-entrant across the
//! day: stopping and starting again is always allowed. While a session is
//! active, a single background task suggests a rest break every 50 minutes.
//! The task shares nothing with the command loop except its cancellation
//! signal and never touches the log store.

use std::io::Write;
use std::time::{Duration, Instant};

use owo_colors::OwoColorize;
use tokio::sync::watch;

/// How long to let a focus block run before suggesting a break.
pub const FOCUS_INTERVAL: Duration = Duration::from_secs(50 * 60);
/// Length of the suggested break before the cycle restarts.
pub const REST_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Wall-clock state of the overall study session.
///
/// `start` spawns the reminder task; `stop` cancels it and returns the
/// elapsed time for the caller to fold into the day's total. All methods
/// run on the foreground task.
#[derive(Default)]
pub struct SessionClock {
    active: Option<ActiveSession>,
}

struct ActiveSession {
    started_at: Instant,
    cancel_reminder: watch::Sender<bool>,
}

impl SessionClock {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start the clock and the reminder task. Returns `false` (and changes
    /// nothing) when a session is already active.
    pub fn start(&mut self, prompt: &'static str) -> bool {
        if self.active.is_some() {
            return false;
        }
        let (cancel_reminder, cancelled) = watch::channel(false);
        tokio::spawn(run_reminder(cancelled, prompt));
        tracing::debug!("session started, reminder task spawned");
        self.active = Some(ActiveSession {
            started_at: Instant::now(),
            cancel_reminder,
        });
        true
    }

    /// Stop the clock, cancel the reminder, and return the session's
    /// elapsed seconds. Returns `None` when no session is active.
    pub fn stop(&mut self) -> Option<f64> {
        let session = self.active.take()?;
        let _ = session.cancel_reminder.send(true);
        tracing::debug!("session stopped, reminder cancelled");
        Some(session.started_at.elapsed().as_secs_f64())
    }

    /// Elapsed seconds of the active session, if any.
    pub fn elapsed(&self) -> Option<f64> {
        self.active
            .as_ref()
            .map(|s| s.started_at.elapsed().as_secs_f64())
    }
}

/// The reminder loop: wait out a focus interval, print a rest notice if
/// still alive, wait out the rest interval, repeat. Cancellation at either
/// wait point ends the task with no further output. The sender side going
/// away counts as cancellation too.
pub async fn run_reminder(mut cancelled: watch::Receiver<bool>, prompt: &'static str) {
    loop {
        tokio::select! {
            _ = cancelled.changed() => break,
            _ = tokio::time::sleep(FOCUS_INTERVAL) => {}
        }
        print_rest_notice(prompt);
        tokio::select! {
            _ = cancelled.changed() => break,
            _ = tokio::time::sleep(REST_INTERVAL) => {}
        }
    }
    tracing::debug!("reminder task finished");
}

/// The notice interleaves with whatever prompt is on screen, so re-print
/// the prompt after it to keep the loop usable.
fn print_rest_notice(prompt: &'static str) {
    println!("\n{}", "Break time!".magenta().bold());
    println!(
        "{}",
        "50 minutes of focus done. Stand up and stretch for 5 minutes.".magenta()
    );
    print!("{} ", prompt.bold());
    let _ = std::io::stdout().flush();
}
