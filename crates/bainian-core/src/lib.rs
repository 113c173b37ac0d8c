pub mod config;
pub mod error;
pub mod quiet;
pub mod types;

pub use config::BainianConfig;
pub use error::{BainianError, Result};
pub use quiet::QuietHours;
pub use types::{Message, Style};
