//! # Introduction
//!
//! pas2cpp translates a small subset of Pascal into C++ source text. The
//! translation can be printed, written to a file, or inspected side by side
//! with the Pascal input in a terminal viewer built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Translation pipeline
//!
//! ```text
//! Source → Lexer → Parser (+ symbol table) → AST → Code generator → C++
//! ```
//!
//! 1. [`parser`]: tokenises the source, builds the AST and records
//!    declarations in a scoped symbol table.
//! 2. [`codegen`]: renders the AST as C++ text.
//! 3. [`error`]: the three error classes: lexical, syntax and internal.
//! 4. [`ui`]: ratatui-based viewer; not part of the stable library API.
//!
//! The first error stops the pipeline. There is no recovery.

pub mod codegen;
pub mod error;
pub mod parser;
pub mod ui;

pub use error::CompileError;

use parser::ast::Program;
use parser::parse::Parser;

/// Parse a whole program.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    Parser::new(source)?.parse_program()
}

/// Parse and generate C++ in one step.
pub fn translate(source: &str) -> Result<String, CompileError> {
    let program = parse(source)?;
    Ok(codegen::generate(&program.root)?)
}
