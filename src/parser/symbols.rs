//! Symbol table with an explicit scope stack
//!
//! The outermost scope holds program-level declarations. Entering a function
//! or procedure body pushes a scope for its parameters and locals; leaving it
//! pops that scope again, so parameter names never leak between routines.
//! Lookups walk outward from the innermost scope.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::fmt;

/// Declared type of a variable, parameter or function result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    Integer,
    Real,
    String,
    Boolean,
    Char,
    Array {
        low: i64,
        high: i64,
        element: Box<TypeDesc>,
    },
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Integer => write!(f, "integer"),
            TypeDesc::Real => write!(f, "real"),
            TypeDesc::String => write!(f, "string"),
            TypeDesc::Boolean => write!(f, "boolean"),
            TypeDesc::Char => write!(f, "char"),
            TypeDesc::Array { low, high, element } => {
                write!(f, "array[{}..{}] of {}", low, high, element)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
    Procedure,
}

impl SymbolKind {
    pub fn is_callable(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Procedure)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Variable => "var",
            SymbolKind::Parameter => "param",
            SymbolKind::Function => "function",
            SymbolKind::Procedure => "procedure",
        };
        write!(f, "{}", name)
    }
}

/// A declared name. Procedures carry no type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Option<TypeDesc>,
    pub location: SourceLocation,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        ty: Option<TypeDesc>,
        location: SourceLocation,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            location,
        }
    }
}

type Scope = FxHashMap<String, Symbol>;

/// Stack of scopes; index 0 is the program scope and is never popped.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Close the innermost scope. The program scope stays open.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declare in the innermost scope; returns the symbol it replaced there.
    pub fn declare(&mut self, symbol: Symbol) -> Option<Symbol> {
        self.scopes
            .last_mut()
            .and_then(|scope| scope.insert(symbol.name.clone(), symbol))
    }

    /// Resolve a name, innermost scope first.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Program-scope symbols in declaration order.
    pub fn globals(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.scopes[0].values().cloned().collect();
        symbols.sort_by(|a, b| a.location.cmp(&b.location).then_with(|| a.name.cmp(&b.name)));
        symbols
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, ty: TypeDesc, line: usize) -> Symbol {
        Symbol::new(name, SymbolKind::Variable, Some(ty), SourceLocation::new(line, 1))
    }

    #[test]
    fn test_resolve_walks_outward() {
        let mut table = SymbolTable::new();
        table.declare(var("x", TypeDesc::Integer, 1));
        table.push_scope();
        table.declare(var("y", TypeDesc::Real, 2));

        assert_eq!(table.resolve("x").unwrap().ty, Some(TypeDesc::Integer));
        assert_eq!(table.resolve("y").unwrap().ty, Some(TypeDesc::Real));

        table.pop_scope();
        assert!(table.resolve("y").is_none());
        assert!(table.resolve("x").is_some());
    }

    #[test]
    fn test_inner_scope_shadows_without_clobbering() {
        let mut table = SymbolTable::new();
        table.declare(var("a", TypeDesc::Integer, 1));
        table.push_scope();
        table.declare(var("a", TypeDesc::String, 2));
        assert_eq!(table.resolve("a").unwrap().ty, Some(TypeDesc::String));
        table.pop_scope();
        assert_eq!(table.resolve("a").unwrap().ty, Some(TypeDesc::Integer));
    }

    #[test]
    fn test_redeclaration_overwrites() {
        let mut table = SymbolTable::new();
        assert!(table.declare(var("n", TypeDesc::Integer, 1)).is_none());
        let previous = table.declare(var("n", TypeDesc::Char, 2));
        assert_eq!(previous.unwrap().ty, Some(TypeDesc::Integer));
        assert_eq!(table.resolve("n").unwrap().ty, Some(TypeDesc::Char));
    }

    #[test]
    fn test_program_scope_is_never_popped() {
        let mut table = SymbolTable::new();
        table.declare(var("g", TypeDesc::Boolean, 1));
        table.pop_scope();
        table.pop_scope();
        assert_eq!(table.resolve("g").unwrap().ty, Some(TypeDesc::Boolean));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut table = SymbolTable::new();
        table.declare(var("Total", TypeDesc::Integer, 1));
        assert!(table.resolve("total").is_none());
    }

    #[test]
    fn test_globals_in_declaration_order() {
        let mut table = SymbolTable::new();
        table.declare(var("z", TypeDesc::Integer, 1));
        table.declare(var("a", TypeDesc::Integer, 2));
        let names: Vec<_> = table.globals().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn test_array_type_display() {
        let ty = TypeDesc::Array {
            low: 1,
            high: 10,
            element: Box::new(TypeDesc::Real),
        };
        assert_eq!(ty.to_string(), "array[1..10] of real");
    }
}
