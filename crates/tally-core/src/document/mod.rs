//! Document state and logic (UI-agnostic).

mod eval;
mod format;
mod ops;
mod state;

pub use eval::CellValue;
pub use format::format_number;
pub use state::Document;
