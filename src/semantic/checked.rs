//! Checked syntax tree
//!
//! Mirrors the untyped tree, but every expression carries its resolved
//! type and every name carries the symbol it resolved to. This is what the
//! backend generator consumes.

use super::symbol::{Symbol, SymbolKind};
use crate::error::{Diagnostic, SourceLocation};
use crate::syntax::{BinaryOp, SourceFile};
use crate::types::CheckedType;

#[derive(Debug, Clone)]
pub struct CheckedExpr {
    pub kind: CheckedExprKind,
    pub ty: CheckedType,
    pub location: SourceLocation,
}

impl CheckedExpr {
    pub fn new(kind: CheckedExprKind, ty: CheckedType, location: SourceLocation) -> Self {
        Self { kind, ty, location }
    }
}

/// What a call invokes
#[derive(Debug, Clone)]
pub enum Callee {
    /// A global function, by its backend name
    Function { name: String, mangled: String },
    /// A function pointer value
    Value(Box<CheckedExpr>),
}

#[derive(Debug, Clone)]
pub enum CheckedExprKind {
    Arithmetic {
        operator: BinaryOp,
        left: Box<CheckedExpr>,
        right: Box<CheckedExpr>,
    },
    Compare {
        operator: BinaryOp,
        left: Box<CheckedExpr>,
        right: Box<CheckedExpr>,
    },
    Logical {
        operator: BinaryOp,
        left: Box<CheckedExpr>,
        right: Box<CheckedExpr>,
    },
    Negate(Box<CheckedExpr>),
    Not(Box<CheckedExpr>),
    AddressOf(Box<CheckedExpr>),
    Dereference(Box<CheckedExpr>),
    /// Unsigned magnitude; signedness comes from the type
    Integer(u64),
    Bool(bool),
    Char(u8),
    String(String),
    Null,
    Call {
        callee: Callee,
        arguments: Vec<CheckedExpr>,
    },
    /// The target type is the expression's type
    Cast(Box<CheckedExpr>),
    Group(Box<CheckedExpr>),
    SizeOf(CheckedType),
    Member {
        object: Box<CheckedExpr>,
        member: String,
        /// The object was a pointer and is dereferenced first
        through_pointer: bool,
    },
    Index {
        array: Box<CheckedExpr>,
        index: Box<CheckedExpr>,
    },
    /// Struct literal; members left out take the backend's default
    Make {
        fields: Vec<(String, CheckedExpr)>,
    },
    Symbol {
        name: String,
        mangled: String,
        kind: SymbolKind,
    },
}

#[derive(Debug, Clone)]
pub struct CheckedStmt {
    pub kind: CheckedStmtKind,
    pub location: SourceLocation,
}

impl CheckedStmt {
    pub fn new(kind: CheckedStmtKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

#[derive(Debug, Clone)]
pub enum CheckedStmtKind {
    Assign {
        target: CheckedExpr,
        value: CheckedExpr,
    },
    Block(Vec<CheckedStmt>),
    Break,
    Continue,
    Expression(CheckedExpr),
    If {
        condition: CheckedExpr,
        then_branch: Box<CheckedStmt>,
        else_branch: Option<Box<CheckedStmt>>,
    },
    While {
        condition: CheckedExpr,
        body: Box<CheckedStmt>,
    },
    Return(Option<CheckedExpr>),
    Variable {
        name: String,
        mangled: String,
        ty: CheckedType,
        value: Option<CheckedExpr>,
    },
}

/// The checked translation unit handed to the generator
#[derive(Debug)]
pub struct CheckedSource {
    pub files: Vec<SourceFile>,
    /// Global scope symbols in declaration order, builtins first
    pub symbols: Vec<Symbol>,
    /// Global variable definitions; function bodies live on their symbols
    pub statements: Vec<CheckedStmt>,
    pub warnings: Vec<Diagnostic>,
}

impl CheckedSource {
    pub fn functions(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols
            .iter()
            .filter(|symbol| symbol.kind() == SymbolKind::Function)
    }

    pub fn function(&self, mangled: &str) -> Option<&Symbol> {
        self.functions().find(|symbol| symbol.mangled == mangled)
    }

    /// Struct and trait symbols, i.e. the types the backend must declare
    pub fn type_declarations(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|symbol| {
            matches!(
                symbol.named_type(),
                Some(CheckedType::Struct(_) | CheckedType::Trait(_))
            )
        })
    }
}
