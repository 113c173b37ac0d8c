//! Poll-and-reply engine.
//!
//! Drives the full auto-reply lifecycle: checks the do-not-disturb window,
//! verifies the chat client is running, polls for new messages, classifies
//! greetings, and dispatches one templated reply per unanswered greeting.
//! A failed cycle is logged and retried after a short backoff; the engine
//! only exits when stop is requested.
//!
//! Sends are at-least-once: a message is marked answered only after its
//! reply was submitted successfully, so a failed send is retried the next
//! time the message is observed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bainian_automation::{ChatActuator, ChatObserver};
use bainian_catalog::ReplyCatalog;
use bainian_core::error::Result;
use bainian_core::quiet::QuietHours;
use bainian_core::types::{Message, Style};

use crate::classify::GreetingClassifier;
use crate::dedup::RecentMessageCache;
use crate::state::{EnginePhase, PhaseMachine};

/// Backoff while inside the do-not-disturb window.
const QUIET_BACKOFF: Duration = Duration::from_secs(60);

/// Backoff after a failed poll cycle.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Fingerprints remembered when no explicit cache size is configured.
const DEFAULT_RECENT_CAPACITY: usize = 64;

/// Sleep durations used by the engine loop.
///
/// Production code builds this from the configured poll interval via
/// [`EngineTiming::new`]; tests shrink all three to keep runs fast.
#[derive(Debug, Clone, Copy)]
pub struct EngineTiming {
    /// Pause between poll cycles.
    pub poll_interval: Duration,
    /// Pause between do-not-disturb re-checks.
    pub quiet_backoff: Duration,
    /// Pause after a failed cycle before retrying.
    pub error_backoff: Duration,
}

impl EngineTiming {
    /// Standard timing with the given poll interval.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            quiet_backoff: QUIET_BACKOFF,
            error_backoff: ERROR_BACKOFF,
        }
    }
}

/// Cloneable handle that requests a cooperative engine stop.
///
/// The flag is observed between cycles and interrupts any in-progress
/// backoff sleep, so a suppressed or erroring engine still stops promptly.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl StopHandle {
    /// Create a handle with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Idempotent.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        self.wake.notify_one();
    }

    /// Returns true once a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Resolves when a stop has been requested.
    pub async fn wait(&self) {
        if self.is_stop_requested() {
            return;
        }
        self.wake.notified().await;
    }
}

/// Polls the chat client and answers greetings with templated replies.
pub struct ReplyEngine {
    observer: Arc<dyn ChatObserver>,
    actuator: Arc<dyn ChatActuator>,
    catalog: ReplyCatalog,
    classifier: Box<dyn GreetingClassifier>,
    quiet_hours: QuietHours,
    timing: EngineTiming,
    reply_index: Option<usize>,
    recent: RecentMessageCache,
    phase: PhaseMachine,
    stop: StopHandle,
    replies_sent: u64,
}

impl ReplyEngine {
    /// Create an engine wired to the given observer and actuator.
    pub fn new(
        observer: Arc<dyn ChatObserver>,
        actuator: Arc<dyn ChatActuator>,
        catalog: ReplyCatalog,
        classifier: Box<dyn GreetingClassifier>,
        quiet_hours: QuietHours,
        timing: EngineTiming,
    ) -> Self {
        Self {
            observer,
            actuator,
            catalog,
            classifier,
            quiet_hours,
            timing,
            reply_index: None,
            recent: RecentMessageCache::new(DEFAULT_RECENT_CAPACITY),
            phase: PhaseMachine::new(),
            stop: StopHandle::new(),
            replies_sent: 0,
        }
    }

    /// Pin replies to a fixed catalog entry instead of random selection.
    pub fn with_reply_index(mut self, index: Option<usize>) -> Self {
        self.reply_index = index;
        self
    }

    /// Override the answered-message cache size. Zero disables deduplication.
    pub fn with_recent_cache(mut self, capacity: usize) -> Self {
        self.recent = RecentMessageCache::new(capacity);
        self
    }

    /// Handle for requesting a stop from another task.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> EnginePhase {
        self.phase.current()
    }

    /// Style the catalog is currently serving.
    pub fn active_style(&self) -> Style {
        self.catalog.style()
    }

    /// Replies submitted successfully since the engine started.
    pub fn replies_sent(&self) -> u64 {
        self.replies_sent
    }

    /// Switch the reply style, reloading templates from disk.
    ///
    /// Used both to honor a startup style choice and to change style while
    /// running. On failure the previous catalog stays active.
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        self.catalog.set_style(style)?;
        info!(style = %style, "Reply style switched");
        Ok(())
    }

    /// Run the engine until a stop is requested.
    ///
    /// Failed cycles are logged and retried after the error backoff, so a
    /// transient observer or send failure never terminates the loop.
    pub async fn run(&mut self) -> Result<()> {
        self.phase.transition(EnginePhase::Polling)?;
        info!(
            style = %self.catalog.style(),
            poll_interval_secs = self.timing.poll_interval.as_secs(),
            "Reply engine started"
        );

        loop {
            if self.stop.is_stop_requested() {
                break;
            }
            if let Err(e) = self.cycle().await {
                warn!(error = %e, "Poll cycle failed");
                self.sleep(self.timing.error_backoff).await;
            }
        }

        self.phase.transition(EnginePhase::Stopping)?;
        self.phase.transition(EnginePhase::Stopped)?;
        info!(replies_sent = self.replies_sent, "Reply engine stopped");
        Ok(())
    }

    /// One poll cycle: quiet-hours check, liveness check, poll, dispatch.
    async fn cycle(&mut self) -> Result<()> {
        if self.quiet_hours.is_suppressed(chrono::Local::now().time()) {
            self.phase.transition(EnginePhase::Suppressed)?;
            debug!("Inside do-not-disturb window; polling suppressed");
            while !self.stop.is_stop_requested()
                && self.quiet_hours.is_suppressed(chrono::Local::now().time())
            {
                self.sleep(self.timing.quiet_backoff).await;
            }
            self.phase.transition(EnginePhase::Polling)?;
            return Ok(());
        }

        if !self.observer.is_target_running().await {
            debug!("Chat client not running; nothing to poll");
            self.sleep(self.timing.poll_interval).await;
            return Ok(());
        }

        let messages = self.observer.poll_new_messages().await?;
        for message in &messages {
            if !self.classifier.is_greeting(message) {
                continue;
            }
            if self.recent.contains(message) {
                debug!(sender = %message.sender, "Greeting already answered; skipping");
                continue;
            }
            self.phase.transition(EnginePhase::Dispatching)?;
            self.dispatch(message).await;
            self.phase.transition(EnginePhase::Polling)?;
        }
        if !messages.is_empty() {
            debug!(count = messages.len(), "Poll cycle complete");
        }

        self.sleep(self.timing.poll_interval).await;
        Ok(())
    }

    /// Send one reply for a matched greeting.
    ///
    /// The message is recorded as answered only on a successful send; any
    /// failure is logged and the message stays eligible for retry. A failed
    /// window activation is not fatal since the client may already be
    /// focused.
    async fn dispatch(&mut self, message: &Message) {
        let dispatch_id = Uuid::new_v4();

        let reply = match self.catalog.select(self.reply_index) {
            Ok(reply) => reply.to_string(),
            Err(e) => {
                warn!(%dispatch_id, error = %e, "No reply available for dispatch");
                return;
            }
        };

        if let Err(e) = self.actuator.activate().await {
            debug!(%dispatch_id, error = %e, "Window activation failed; sending anyway");
        }

        match self.actuator.send_text(&reply).await {
            Ok(()) => {
                self.recent.record(message);
                self.replies_sent += 1;
                info!(
                    %dispatch_id,
                    sender = %message.sender,
                    reply_len = reply.chars().count(),
                    "Reply sent"
                );
            }
            Err(e) => {
                warn!(
                    %dispatch_id,
                    sender = %message.sender,
                    error = %e,
                    "Reply send failed"
                );
            }
        }
    }

    /// Sleep that wakes early when a stop is requested.
    async fn sleep(&self, duration: Duration) {
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.stop.wait() => {}
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
