//! Semantic model module
//!
//! Symbols, the scope chain they live in, and the checked tree produced
//! by the checker.

pub mod checked;
pub mod scope;
pub mod symbol;

pub use checked::{Callee, CheckedExpr, CheckedExprKind, CheckedSource, CheckedStmt, CheckedStmtKind};
pub use scope::{ScopeId, SymbolTable};
pub use symbol::{FunctionInfo, Symbol, SymbolData, SymbolId, SymbolKind};
