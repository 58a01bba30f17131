//! Syntax module
//!
//! The untyped tree the parser hands to the checker.

pub mod ast;

#[cfg(test)]
pub(crate) mod build;

pub use ast::{
    Argument, BinaryOp, EnumDecl, EnumMember, Expr, FunctionDecl, Param, ParamType, ParsedSource,
    SourceFile, Stmt, StructDecl, StructMember, TraitDecl, TraitMethod, TypeExpr, UnaryOp,
    VariableDecl,
};
