//! Windows automation via the Win32 window and input APIs.
//!
//! On Windows, locates the chat window by title with `FindWindowW`, brings
//! it to the foreground, and types replies as Unicode keystrokes using
//! `SendInput` with `KEYEVENTF_UNICODE`, finishing with an Enter key press.
//! Window text cannot be read back through these APIs, so polling always
//! reports no new messages.
//!
//! On non-Windows, provides stubs that log and error.

#[cfg(not(target_os = "windows"))]
use tracing::warn;
#[cfg(target_os = "windows")]
use windows_sys::Win32::UI::Input::KeyboardAndMouse::INPUT;

use async_trait::async_trait;
use tracing::debug;

use bainian_core::error::{BainianError, Result};
use bainian_core::types::Message;

use crate::{ChatActuator, ChatObserver};

/// Win32-driven observer and actuator for the Windows chat client.
pub struct WindowsAutomation {
    window_title: String,
}

impl WindowsAutomation {
    /// Create a provider targeting the window titled `window_title`.
    pub fn new(window_title: String) -> Self {
        Self { window_title }
    }

    /// Locate the chat window by its exact title.
    #[cfg(target_os = "windows")]
    fn find_window(&self) -> Option<isize> {
        use windows_sys::Win32::UI::WindowsAndMessaging::FindWindowW;

        let title: Vec<u16> = self
            .window_title
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();

        let hwnd = unsafe { FindWindowW(std::ptr::null(), title.as_ptr()) };
        if hwnd == 0 {
            None
        } else {
            Some(hwnd)
        }
    }

    #[cfg(target_os = "windows")]
    fn window_present(&self) -> bool {
        self.find_window().is_some()
    }

    #[cfg(not(target_os = "windows"))]
    fn window_present(&self) -> bool {
        debug!(
            window_title = %self.window_title,
            "Win32 window lookup not available on this platform"
        );
        false
    }

    /// Restore the chat window and bring it to the foreground.
    #[cfg(target_os = "windows")]
    fn activate_window(&self) -> Result<()> {
        use windows_sys::Win32::UI::WindowsAndMessaging::{
            SetForegroundWindow, ShowWindow, SW_RESTORE,
        };

        let hwnd = self.find_window().ok_or_else(|| {
            BainianError::ActuatorSend(format!("Window '{}' not found", self.window_title))
        })?;

        let raised = unsafe {
            ShowWindow(hwnd, SW_RESTORE);
            SetForegroundWindow(hwnd)
        };
        if raised == 0 {
            return Err(BainianError::ActuatorSend(format!(
                "Failed to bring window '{}' to the foreground",
                self.window_title
            )));
        }

        debug!(window_title = %self.window_title, "Window activated");
        Ok(())
    }

    /// Stub activation on non-Windows: logs and errors.
    #[cfg(not(target_os = "windows"))]
    fn activate_window(&self) -> Result<()> {
        warn!(
            window_title = %self.window_title,
            "WindowsAutomation: window activation is only available on Windows"
        );
        Err(BainianError::ActuatorSend(
            "Window activation is only available on Windows".into(),
        ))
    }

    /// Type the text into the focused window and press Enter.
    ///
    /// Each UTF-16 code unit is sent as a key-down / key-up pair using
    /// `SendInput` with Unicode input events, followed by a Return keystroke
    /// to submit.
    #[cfg(target_os = "windows")]
    fn type_text(&self, text: &str) -> Result<()> {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::SendInput;

        debug!(text_len = text.len(), "Typing reply via SendInput");

        let inputs = unicode_key_inputs(text);
        let sent = unsafe {
            SendInput(
                inputs.len() as u32,
                inputs.as_ptr(),
                std::mem::size_of::<INPUT>() as i32,
            )
        };

        if sent as usize != inputs.len() {
            return Err(BainianError::ActuatorSend(format!(
                "SendInput only sent {} of {} events",
                sent,
                inputs.len()
            )));
        }

        Ok(())
    }

    /// Stub typing on non-Windows: logs the text but does nothing.
    #[cfg(not(target_os = "windows"))]
    fn type_text(&self, text: &str) -> Result<()> {
        warn!(
            text_len = text.len(),
            "WindowsAutomation: SendInput not available on this platform"
        );
        Err(BainianError::ActuatorSend(
            "Text sending is only available on Windows".into(),
        ))
    }
}

#[async_trait]
impl ChatObserver for WindowsAutomation {
    async fn is_target_running(&self) -> bool {
        self.window_present()
    }

    async fn poll_new_messages(&self) -> Result<Vec<Message>> {
        // Win32 offers no portable way to read the chat transcript, so the
        // engine sees this platform as having no inbound traffic.
        debug!("Window text polling unavailable; reporting no new messages");
        Ok(Vec::new())
    }
}

#[async_trait]
impl ChatActuator for WindowsAutomation {
    async fn activate(&self) -> Result<()> {
        self.activate_window()
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        self.type_text(text)
    }
}

/// Expand text into Unicode keyboard events: one key-down / key-up pair per
/// UTF-16 code unit, then a Return press to submit. Supplementary-plane
/// characters such as emoji arrive as surrogate pairs, which the receiving
/// window reassembles.
#[cfg(target_os = "windows")]
fn unicode_key_inputs(text: &str) -> Vec<INPUT> {
    use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
        INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_KEYUP, KEYEVENTF_UNICODE, VK_RETURN,
    };

    let mut inputs: Vec<INPUT> = Vec::new();

    for unit in text.encode_utf16() {
        // Key down
        inputs.push(INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: 0,
                    wScan: unit,
                    dwFlags: KEYEVENTF_UNICODE,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        });

        // Key up
        inputs.push(INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: 0,
                    wScan: unit,
                    dwFlags: KEYEVENTF_UNICODE | KEYEVENTF_KEYUP,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        });
    }

    // Enter submits the message.
    inputs.push(INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VK_RETURN,
                wScan: 0,
                dwFlags: 0,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    });
    inputs.push(INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VK_RETURN,
                wScan: 0,
                dwFlags: KEYEVENTF_KEYUP,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    });

    inputs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
