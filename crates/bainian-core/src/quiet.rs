//! Quiet-hours suppression policy.
//!
//! A pure wall-clock window check with no side effects or hidden state.
//! Windows may wrap past midnight: start 23:00 / end 07:00 suppresses from
//! 23:00 through 07:00 the next morning.

use chrono::NaiveTime;

use crate::error::{BainianError, Result};

/// Parsed do-not-disturb window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuietHours {
    enabled: bool,
    start: NaiveTime,
    end: NaiveTime,
}

impl QuietHours {
    /// Create a policy from already-parsed bounds.
    pub fn new(enabled: bool, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            enabled,
            start,
            end,
        }
    }

    /// Parse "HH:MM" bounds into a policy.
    pub fn parse(enabled: bool, start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            enabled,
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
        })
    }

    /// A policy that never suppresses.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
        }
    }

    /// Whether the policy is active at all.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true when sending is suppressed at `now`.
    ///
    /// Both bounds are inclusive. When start is later than end the window
    /// wraps past midnight.
    pub fn is_suppressed(&self, now: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }
        if self.start <= self.end {
            now >= self.start && now <= self.end
        } else {
            now >= self.start || now <= self.end
        }
    }
}

fn parse_hhmm(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| {
        BainianError::Config(format!("Invalid quiet hours time '{}': {}", value, e))
    })
}

// =============================================================================
// Tests
// =============================================================================
