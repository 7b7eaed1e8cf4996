//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Pascal source with syntax highlighting and the selected token's line
//! - [`tokens`]: Token stream with the current selection
//! - [`output`]: Generated C++, or the error that stopped translation
//! - [`symbols`]: Program-scope symbol table
//! - [`status`]: Status bar with keybindings and translation state
//! - `utils`: Shared block styling and scroll arithmetic
//!
//! Each pane module exports one stateless `render_*` function; scroll
//! offsets live in [`App`](crate::ui::App) and are passed in by reference.

mod utils;

pub mod output;
pub mod source;
pub mod status;
pub mod symbols;
pub mod tokens;

// Re-export render functions for convenience
pub use output::render_output_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use symbols::render_symbols_pane;
pub use tokens::render_tokens_pane;
