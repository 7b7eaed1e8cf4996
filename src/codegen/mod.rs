//! C++ code generation
//!
//! A single pass over the finished AST that appends C++ text to one output
//! buffer. The generator never looks at the symbol table: everything it needs
//! (names, types, by-reference markers, rebased indices) is already in the tree.
//!
//! Nodes with the wrong number of children, or kinds that cannot appear where
//! they were found, are reported as [`InternalError`](crate::parser::ast::InternalError).

mod generator;

pub use generator::generate;
