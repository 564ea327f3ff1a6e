//! tally-core - UI-agnostic document model + settings.

pub mod document;
pub mod error;
pub mod settings;

pub use document::{CellValue, Document};
pub use error::{Result, TallyError};
pub use settings::Settings;
