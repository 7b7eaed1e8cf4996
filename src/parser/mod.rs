//! Pascal source code parser
//!
//! This module transforms Pascal source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split into declaration, statement
//!   and expression files
//! - [`symbols`]: Scoped symbol table filled while parsing
//! - [`ast`]: AST node definitions
//!
//! # Supported Pascal Subset
//!
//! - Types: `integer`, `real`, `string`, `boolean`, `char`, one-dimensional arrays
//! - Declarations: `var`, `function`, `procedure` (nested routines allowed)
//! - Statements: assignment, `if/else`, `while`, `for`, `repeat/until`,
//!   `write[ln]`, `read[ln]`, procedure calls
//! - Expressions: arithmetic, relational, `and`/`or`/`not`, calls, indexing
//!
//! No records, pointers, sets, `case` or `with`.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod symbols;
