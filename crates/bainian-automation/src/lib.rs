//! Platform automation capabilities for the target chat client.
//!
//! Defines the `ChatObserver` and `ChatActuator` traits the reply engine
//! depends on, scriptable mock implementations for testing, and the two
//! concrete providers: `MacAutomation` (AppleScript via osascript) and
//! `WindowsAutomation` (Win32 window and input APIs). Provider selection
//! happens once at startup via `platform_automation`.

pub mod macos;
pub mod windows;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use bainian_core::error::{BainianError, Result};
use bainian_core::types::Message;

pub use macos::MacAutomation;
pub use windows::WindowsAutomation;

/// Observes the target chat application for inbound messages.
///
/// Implementations are best-effort and bounded-time: a liveness check or a
/// poll must return promptly rather than stall the engine's cycle. Polls may
/// re-report messages seen on earlier cycles; deduplication is the caller's
/// concern.
#[async_trait]
pub trait ChatObserver: Send + Sync {
    /// Whether the target chat application appears to be running.
    /// False negatives are acceptable and treated as "no messages".
    async fn is_target_running(&self) -> bool;

    /// Messages observed since the previous poll.
    async fn poll_new_messages(&self) -> Result<Vec<Message>>;
}

/// Delivers replies into the active chat window.
#[async_trait]
pub trait ChatActuator: Send + Sync {
    /// Bring the chat window to the foreground. Best-effort.
    async fn activate(&self) -> Result<()>;

    /// Type `text` into the focused conversation and submit it.
    async fn send_text(&self, text: &str) -> Result<()>;
}

/// Select the automation provider for the current platform.
///
/// macOS and Windows are the two supported targets; anywhere else is a
/// startup error rather than a provider that can never work.
pub fn platform_automation(
    app_name: &str,
    window_title: &str,
) -> Result<(Arc<dyn ChatObserver>, Arc<dyn ChatActuator>)> {
    #[cfg(target_os = "macos")]
    {
        let _ = window_title;
        let automation = Arc::new(MacAutomation::new(app_name.to_string()));
        Ok((
            Arc::clone(&automation) as Arc<dyn ChatObserver>,
            automation as Arc<dyn ChatActuator>,
        ))
    }
    #[cfg(target_os = "windows")]
    {
        let _ = app_name;
        let automation = Arc::new(WindowsAutomation::new(window_title.to_string()));
        Ok((
            Arc::clone(&automation) as Arc<dyn ChatObserver>,
            automation as Arc<dyn ChatActuator>,
        ))
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let _ = (app_name, window_title);
        Err(BainianError::Config(format!(
            "Unsupported platform '{}': bainian drives macOS or Windows chat clients",
            std::env::consts::OS
        )))
    }
}

// =============================================================================
// Mocks
// =============================================================================

/// Scriptable observer for tests.
///
/// Polls pop queued outcomes in order; once the script is exhausted every
/// poll yields an empty batch.
pub struct MockChatObserver {
    running: AtomicBool,
    script: Mutex<VecDeque<Result<Vec<Message>>>>,
    poll_count: AtomicUsize,
}

impl MockChatObserver {
    /// A running observer with no scripted batches.
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            script: Mutex::new(VecDeque::new()),
            poll_count: AtomicUsize::new(0),
        }
    }

    /// A running observer that yields the given batches in order.
    pub fn with_batches(batches: Vec<Vec<Message>>) -> Self {
        let observer = Self::new();
        for batch in batches {
            observer.enqueue_batch(batch);
        }
        observer
    }

    /// An observer whose liveness check always fails.
    pub fn not_running() -> Self {
        let observer = Self::new();
        observer.running.store(false, Ordering::Relaxed);
        observer
    }

    /// Queue a successful poll outcome.
    pub fn enqueue_batch(&self, messages: Vec<Message>) {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .push_back(Ok(messages));
    }

    /// Queue a failing poll outcome.
    pub fn enqueue_failure(&self, message: &str) {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .push_back(Err(BainianError::Observer(message.to_string())));
    }

    /// Number of polls performed so far.
    pub fn poll_count(&self) -> usize {
        self.poll_count.load(Ordering::Relaxed)
    }
}

impl Default for MockChatObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatObserver for MockChatObserver {
    async fn is_target_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    async fn poll_new_messages(&self) -> Result<Vec<Message>> {
        self.poll_count.fetch_add(1, Ordering::Relaxed);
        self.script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Recording actuator for tests.
///
/// Tracks activations and send attempts; successful sends are kept for
/// inspection. Can be configured to fail every send.
pub struct MockChatActuator {
    fail_sends: AtomicBool,
    sent: Mutex<Vec<String>>,
    send_attempts: AtomicUsize,
    activations: AtomicUsize,
}

impl MockChatActuator {
    /// An actuator whose sends all succeed.
    pub fn new() -> Self {
        Self {
            fail_sends: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            send_attempts: AtomicUsize::new(0),
            activations: AtomicUsize::new(0),
        }
    }

    /// An actuator whose sends all fail.
    pub fn failing() -> Self {
        let actuator = Self::new();
        actuator.fail_sends.store(true, Ordering::Relaxed);
        actuator
    }

    /// Texts that were successfully sent, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("sent mutex poisoned").clone()
    }

    /// Total send attempts, including failures.
    pub fn send_attempts(&self) -> usize {
        self.send_attempts.load(Ordering::Relaxed)
    }

    /// Number of activate calls.
    pub fn activation_count(&self) -> usize {
        self.activations.load(Ordering::Relaxed)
    }
}

impl Default for MockChatActuator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatActuator for MockChatActuator {
    async fn activate(&self) -> Result<()> {
        self.activations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        self.send_attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err(BainianError::ActuatorSend(
                "mock send failure".to_string(),
            ));
        }
        self.sent
            .lock()
            .expect("sent mutex poisoned")
            .push(text.to_string());
        Ok(())
    }
}
