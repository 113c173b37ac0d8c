//! macOS automation via AppleScript.
//!
//! Drives the chat client through `osascript`: liveness via `pgrep`, window
//! text via System Events accessibility queries, and sending via the
//! clipboard with synthesized Cmd+V and Return keystrokes. Every external
//! invocation runs under a bounded timeout so a wedged script cannot stall
//! the poll loop.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use bainian_core::error::{BainianError, Result};
use bainian_core::types::Message;

use crate::{ChatActuator, ChatObserver};

/// Upper bound for any single osascript or pgrep invocation.
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(10);

/// AppleScript-driven observer and actuator for the macOS chat client.
///
/// Polling snapshots the static texts of the chat window and reports lines
/// that were not present in the previous snapshot. The first poll only
/// establishes the baseline, so conversation history visible at startup is
/// never answered. Failed and blank readings both leave an established
/// baseline in place, so the history is not re-reported after a hiccup.
pub struct MacAutomation {
    app_name: String,
    last_snapshot: Mutex<Option<Vec<String>>>,
}

impl MacAutomation {
    /// Create a provider targeting the application named `app_name`.
    pub fn new(app_name: String) -> Self {
        Self {
            app_name,
            last_snapshot: Mutex::new(None),
        }
    }

    /// Read the current static texts of the chat window, one per line.
    ///
    /// A failing script (no window, missing accessibility permission) is an
    /// observer error, not an empty reading; the engine backs off and the
    /// snapshot baseline survives untouched.
    async fn window_texts(&self) -> Result<Vec<String>> {
        let script = format!(
            r#"tell application "System Events"
    set msgTexts to value of every static text of front window of process "{}"
end tell
set AppleScript's text item delimiters to linefeed
return msgTexts as text"#,
            escape_applescript(&self.app_name)
        );

        let output = run_osascript(&script)
            .await
            .map_err(BainianError::Observer)?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl ChatObserver for MacAutomation {
    async fn is_target_running(&self) -> bool {
        let check = Command::new("pgrep").arg("-x").arg(&self.app_name).status();
        match tokio::time::timeout(SCRIPT_TIMEOUT, check).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                warn!(error = %e, "pgrep failed");
                false
            }
            Err(_) => {
                warn!("pgrep timed out");
                false
            }
        }
    }

    async fn poll_new_messages(&self) -> Result<Vec<Message>> {
        let current = self.window_texts().await?;

        let mut guard = self.last_snapshot.lock().expect("snapshot mutex poisoned");
        let previous = guard.take();
        let new_lines = diff_new_lines(previous.as_deref(), &current);
        *guard = next_snapshot(previous, current);
        drop(guard);

        if !new_lines.is_empty() {
            debug!(count = new_lines.len(), "New window texts observed");
        }
        Ok(new_lines.iter().map(|line| parse_message_line(line)).collect())
    }
}

#[async_trait]
impl ChatActuator for MacAutomation {
    async fn activate(&self) -> Result<()> {
        let script = format!(
            r#"tell application "{}" to activate"#,
            escape_applescript(&self.app_name)
        );
        run_osascript(&script)
            .await
            .map(|_| ())
            .map_err(BainianError::ActuatorSend)
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        let script = format!(
            r#"set the clipboard to "{}"
delay 0.2
tell application "System Events"
    keystroke "v" using command down
    delay 0.2
    keystroke return
end tell"#,
            escape_applescript(text)
        );
        run_osascript(&script)
            .await
            .map(|_| ())
            .map_err(BainianError::ActuatorSend)?;

        debug!(text_len = text.len(), "Text pasted and submitted");
        Ok(())
    }
}

/// Run a script through osascript, capturing trimmed stdout.
async fn run_osascript(script: &str) -> std::result::Result<String, String> {
    let invocation = Command::new("osascript").arg("-e").arg(script).output();
    let output = tokio::time::timeout(SCRIPT_TIMEOUT, invocation)
        .await
        .map_err(|_| "osascript timed out".to_string())?
        .map_err(|e| format!("Failed to run osascript: {}", e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
    }
}

/// Escape a string for inclusion in an AppleScript string literal.
/// Backslashes must be escaped before quotes.
fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Lines present in `current` but absent from the previous snapshot.
/// A `None` previous snapshot means this is the first poll, which only
/// establishes the baseline and reports nothing.
fn diff_new_lines(previous: Option<&[String]>, current: &[String]) -> Vec<String> {
    match previous {
        None => Vec::new(),
        Some(previous) => current
            .iter()
            .filter(|line| !previous.contains(line))
            .cloned()
            .collect(),
    }
}

/// Snapshot to carry into the next poll. A blank reading never replaces an
/// established baseline, so a momentarily empty window cannot cause the
/// following poll to report the whole conversation as new.
fn next_snapshot(previous: Option<Vec<String>>, current: Vec<String>) -> Option<Vec<String>> {
    match previous {
        Some(previous) if current.is_empty() => Some(previous),
        _ => Some(current),
    }
}

/// Interpret one window text line as a message.
///
/// Chat rows commonly render as "sender: content"; lines without that shape
/// become content-only messages from an unknown sender.
fn parse_message_line(line: &str) -> Message {
    match line.split_once(": ") {
        Some((sender, content)) if !sender.is_empty() => {
            Message::new(sender.to_string(), content.to_string())
        }
        _ => Message::new("unknown".to_string(), line.to_string()),
    }
}

// =============================================================================
// Tests
// =============================================================================
