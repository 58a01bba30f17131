//! Terse constructors for syntax trees in tests
//!
//! Every node is placed at `test.tn:1:1` unless a test overrides the
//! location with struct update syntax.

use super::ast::*;
use crate::error::SourceLocation;

pub const FILE: &str = "test.tn";

pub fn here() -> SourceLocation {
    at(1, 1)
}

pub fn at(line: usize, column: usize) -> SourceLocation {
    SourceLocation::new(line, column, Some(FILE.to_string()))
}

pub fn source(statements: Vec<Stmt>) -> ParsedSource {
    ParsedSource {
        files: vec![SourceFile {
            name: FILE.to_string(),
            text: String::new(),
        }],
        statements,
    }
}

// Types

pub fn ty(name: &str) -> TypeExpr {
    TypeExpr::Named {
        name: name.to_string(),
        location: here(),
    }
}

pub fn ptr(inner: TypeExpr) -> TypeExpr {
    TypeExpr::Pointer {
        inner: Box::new(inner),
        location: here(),
    }
}

pub fn array(item: TypeExpr) -> TypeExpr {
    TypeExpr::Array {
        item: Box::new(item),
        size: None,
        location: here(),
    }
}

pub fn sized_array(item: TypeExpr, size: Expr) -> TypeExpr {
    TypeExpr::Array {
        item: Box::new(item),
        size: Some(Box::new(size)),
        location: here(),
    }
}

pub fn fn_type(params: Vec<(Option<&str>, TypeExpr)>, return_type: Option<TypeExpr>) -> TypeExpr {
    TypeExpr::Function {
        params: params
            .into_iter()
            .map(|(label, ty)| ParamType {
                label: label.map(str::to_string),
                name: None,
                ty,
            })
            .collect(),
        return_type: return_type.map(Box::new),
        location: here(),
    }
}

// Expressions

pub fn int(value: u64) -> Expr {
    Expr::Integer {
        value,
        suffix: None,
        location: here(),
    }
}

pub fn int_suffix(value: u64, suffix: &str) -> Expr {
    Expr::Integer {
        value,
        suffix: Some(suffix.to_string()),
        location: here(),
    }
}

pub fn boolean(value: bool) -> Expr {
    Expr::Bool {
        value,
        location: here(),
    }
}

pub fn chr(value: u8) -> Expr {
    Expr::Char {
        value,
        location: here(),
    }
}

pub fn string(value: &str) -> Expr {
    Expr::String {
        value: value.to_string(),
        location: here(),
    }
}

pub fn null() -> Expr {
    Expr::Null { location: here() }
}

pub fn sym(name: &str) -> Expr {
    Expr::Symbol {
        name: name.to_string(),
        location: here(),
    }
}

pub fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        location: here(),
    }
}

pub fn unary(operator: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary {
        operator,
        operand: Box::new(operand),
        location: here(),
    }
}

pub fn addr(operand: Expr) -> Expr {
    unary(UnaryOp::AddressOf, operand)
}

pub fn deref(operand: Expr) -> Expr {
    unary(UnaryOp::Dereference, operand)
}

pub fn arg(value: Expr) -> Argument {
    Argument {
        label: None,
        value,
        location: here(),
    }
}

pub fn labeled(label: &str, value: Expr) -> Argument {
    Argument {
        label: Some(label.to_string()),
        value,
        location: here(),
    }
}

/// Call of a named function
pub fn call(name: &str, arguments: Vec<Argument>) -> Expr {
    call_expr(sym(name), arguments)
}

pub fn call_expr(callee: Expr, arguments: Vec<Argument>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        arguments,
        location: here(),
    }
}

pub fn method_call(object: Expr, name: &str, arguments: Vec<Argument>) -> Expr {
    call_expr(member(object, name), arguments)
}

pub fn member(object: Expr, name: &str) -> Expr {
    Expr::Member {
        object: Box::new(object),
        member: name.to_string(),
        location: here(),
    }
}

pub fn index(array: Expr, index: Expr) -> Expr {
    Expr::Index {
        array: Box::new(array),
        index: Box::new(index),
        location: here(),
    }
}

pub fn cast(value: Expr, target: TypeExpr) -> Expr {
    Expr::Cast {
        value: Box::new(value),
        target,
        location: here(),
    }
}

pub fn group(inner: Expr) -> Expr {
    Expr::Group {
        inner: Box::new(inner),
        location: here(),
    }
}

pub fn size_of(target: TypeExpr) -> Expr {
    Expr::SizeOf {
        target,
        location: here(),
    }
}

pub fn make(target: TypeExpr, arguments: Vec<Argument>) -> Expr {
    Expr::Make {
        target,
        arguments,
        location: here(),
    }
}

// Statements

pub fn var_decl(name: &str, annotation: Option<TypeExpr>, initializer: Option<Expr>) -> VariableDecl {
    VariableDecl {
        name: name.to_string(),
        type_annotation: annotation,
        initializer,
        location: here(),
    }
}

pub fn var(name: &str, annotation: Option<TypeExpr>, initializer: Option<Expr>) -> Stmt {
    Stmt::Variable(var_decl(name, annotation, initializer))
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    Stmt::Assign {
        target,
        value,
        location: here(),
    }
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expression {
        expr,
        location: here(),
    }
}

pub fn ret(value: Option<Expr>) -> Stmt {
    Stmt::Return {
        value,
        location: here(),
    }
}

pub fn block(statements: Vec<Stmt>) -> Stmt {
    Stmt::Block {
        statements,
        location: here(),
    }
}

pub fn if_(condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Stmt {
    Stmt::If {
        condition,
        then_branch: Box::new(then_branch),
        else_branch: else_branch.map(Box::new),
        location: here(),
    }
}

pub fn while_(condition: Expr, body: Stmt) -> Stmt {
    Stmt::While {
        condition,
        body: Box::new(body),
        location: here(),
    }
}

pub fn brk() -> Stmt {
    Stmt::Break { location: here() }
}

// Declarations

pub fn param(name: &str, ty: TypeExpr) -> Param {
    Param {
        label: None,
        name: name.to_string(),
        ty,
        location: here(),
    }
}

pub fn labeled_param(label: &str, name: &str, ty: TypeExpr) -> Param {
    Param {
        label: Some(label.to_string()),
        ..param(name, ty)
    }
}

pub fn function_decl(
    name: &str,
    params: Vec<Param>,
    return_type: Option<TypeExpr>,
    body: Vec<Stmt>,
) -> FunctionDecl {
    FunctionDecl {
        name: name.to_string(),
        receiver: None,
        params,
        return_type,
        body: Some(body),
        location: here(),
    }
}

pub fn func(name: &str, params: Vec<Param>, return_type: Option<TypeExpr>, body: Vec<Stmt>) -> Stmt {
    Stmt::Function(function_decl(name, params, return_type, body))
}

/// Function declared with a receiver: `fn Receiver.name(...)`
pub fn method(
    receiver: TypeExpr,
    name: &str,
    params: Vec<Param>,
    return_type: Option<TypeExpr>,
    body: Vec<Stmt>,
) -> Stmt {
    Stmt::Function(FunctionDecl {
        receiver: Some(receiver),
        ..function_decl(name, params, return_type, body)
    })
}

pub fn extern_fn(name: &str, params: Vec<Param>, return_type: Option<TypeExpr>) -> Stmt {
    Stmt::Function(FunctionDecl {
        body: None,
        ..function_decl(name, params, return_type, Vec::new())
    })
}

pub fn struct_decl(name: &str, members: Vec<(&str, TypeExpr)>) -> StructDecl {
    StructDecl {
        name: name.to_string(),
        members: Some(
            members
                .into_iter()
                .map(|(name, ty)| StructMember {
                    name: name.to_string(),
                    ty,
                    location: here(),
                })
                .collect(),
        ),
        methods: Vec::new(),
        location: here(),
    }
}

pub fn structure(name: &str, members: Vec<(&str, TypeExpr)>) -> Stmt {
    Stmt::Struct(struct_decl(name, members))
}

pub fn forward(name: &str) -> Stmt {
    Stmt::Struct(StructDecl {
        members: None,
        ..struct_decl(name, Vec::new())
    })
}

pub fn external(name: &str) -> Stmt {
    Stmt::ExternalType {
        name: name.to_string(),
        location: here(),
    }
}

pub fn trait_method(name: &str, params: Vec<Param>, return_type: Option<TypeExpr>) -> TraitMethod {
    TraitMethod {
        name: name.to_string(),
        params,
        return_type,
        location: here(),
    }
}

pub fn trait_decl(name: &str, methods: Vec<TraitMethod>) -> Stmt {
    Stmt::Trait(TraitDecl {
        name: name.to_string(),
        methods,
        location: here(),
    })
}

pub fn enumeration(name: &str, backing: Option<TypeExpr>, members: Vec<(&str, Option<u64>)>) -> Stmt {
    Stmt::Enum(EnumDecl {
        name: name.to_string(),
        backing,
        members: members
            .into_iter()
            .map(|(name, value)| EnumMember {
                name: name.to_string(),
                value,
                location: here(),
            })
            .collect(),
        location: here(),
    })
}
