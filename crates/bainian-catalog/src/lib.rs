//! Reply template catalog with style-based selection.
//!
//! Loads flat template files (one reply per line) for the active style and
//! supplies random or indexed lookup. A style switch reloads the catalog in
//! full; a failed reload leaves the previous style and replies in place.

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, info};

use bainian_core::error::{BainianError, Result};
use bainian_core::types::Style;

/// Holds the reply strings for the currently active style.
///
/// The reply sequence is immutable between loads. An out-of-range indexed
/// lookup degrades to a random choice rather than failing.
#[derive(Debug, Clone)]
pub struct ReplyCatalog {
    templates_dir: PathBuf,
    style: Style,
    replies: Vec<String>,
}

impl ReplyCatalog {
    /// Load the catalog for `style` from `templates_dir`.
    ///
    /// Fails if the template file is missing, unreadable, or contains no
    /// non-empty lines.
    pub fn load(templates_dir: &Path, style: Style) -> Result<Self> {
        let replies = read_templates(templates_dir, style)?;
        info!(style = %style, count = replies.len(), "Reply catalog loaded");
        Ok(Self {
            templates_dir: templates_dir.to_path_buf(),
            style,
            replies,
        })
    }

    /// The currently active style.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Number of loaded replies.
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    /// All loaded replies, in file order.
    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    /// Returns a uniformly random reply.
    pub fn random_reply(&self) -> Result<&str> {
        if self.replies.is_empty() {
            return Err(BainianError::EmptyCatalog { style: self.style });
        }
        let index = rand::rng().random_range(0..self.replies.len());
        Ok(&self.replies[index])
    }

    /// Returns the reply at `index`, or a random reply when out of range.
    pub fn reply_at(&self, index: usize) -> Result<&str> {
        match self.replies.get(index) {
            Some(reply) => Ok(reply),
            None => {
                debug!(
                    index,
                    count = self.replies.len(),
                    "Reply index out of range, choosing randomly"
                );
                self.random_reply()
            }
        }
    }

    /// Indexed lookup when an index is configured, random otherwise.
    pub fn select(&self, index: Option<usize>) -> Result<&str> {
        match index {
            Some(i) => self.reply_at(i),
            None => self.random_reply(),
        }
    }

    /// Switch to `style`, synchronously reloading the catalog in full.
    ///
    /// The new template set is read completely before the swap, so a failure
    /// leaves the previous style and replies untouched.
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        let replies = read_templates(&self.templates_dir, style)?;
        info!(style = %style, count = replies.len(), "Reply catalog reloaded");
        self.style = style;
        self.replies = replies;
        Ok(())
    }
}

fn read_templates(dir: &Path, style: Style) -> Result<Vec<String>> {
    let path = dir.join(style.template_filename());
    let content = std::fs::read_to_string(&path).map_err(|e| BainianError::CatalogLoad {
        style,
        source: e,
    })?;

    let replies: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if replies.is_empty() {
        return Err(BainianError::EmptyCatalog { style });
    }
    Ok(replies)
}

// =============================================================================
// Tests
// =============================================================================
