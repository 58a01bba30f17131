//! Untyped syntax tree definitions
//!
//! This is the contract with the parser: it produces these nodes and the
//! checker consumes them. Nothing here carries a resolved type.

use crate::error::SourceLocation;

/// One file of the translation unit
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

/// Root node handed over by the parser
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSource {
    /// Constituent files, the main file first
    pub files: Vec<SourceFile>,
    pub statements: Vec<Stmt>,
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Assignment: target = value
    Assign {
        target: Expr,
        value: Expr,
        location: SourceLocation,
    },

    /// Block statement: { ... }
    Block {
        statements: Vec<Stmt>,
        location: SourceLocation,
    },

    Break {
        location: SourceLocation,
    },

    Continue {
        location: SourceLocation,
    },

    /// Expression statement
    Expression {
        expr: Expr,
        location: SourceLocation,
    },

    /// If statement
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },

    /// While loop
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },

    /// Return statement
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },

    /// Variable declaration: let x: i32 = 42
    Variable(VariableDecl),

    /// Function declaration, optionally with a receiver: fn Square.area() -> i32 { ... }
    Function(FunctionDecl),

    /// Struct declaration; `members: None` is a forward declaration
    Struct(StructDecl),

    /// Opaque external type: extern type FILE
    ExternalType {
        name: String,
        location: SourceLocation,
    },

    /// Trait declaration
    Trait(TraitDecl),

    /// Enum declaration: enum Color: u8 { Red, Green = 4 }
    Enum(EnumDecl),
}

impl Stmt {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::Assign { location, .. }
            | Stmt::Block { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Expression { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::ExternalType { location, .. } => location,
            Stmt::Variable(decl) => &decl.location,
            Stmt::Function(decl) => &decl.location,
            Stmt::Struct(decl) => &decl.location,
            Stmt::Trait(decl) => &decl.location,
            Stmt::Enum(decl) => &decl.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub type_annotation: Option<TypeExpr>,
    pub initializer: Option<Expr>,
    pub location: SourceLocation,
}

/// A declared parameter: `label name: type`, label optional
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub label: Option<String>,
    pub name: String,
    pub ty: TypeExpr,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    /// Receiver type for methods declared outside their struct
    pub receiver: Option<TypeExpr>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    /// `None` for extern functions
    pub body: Option<Vec<Stmt>>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructMember {
    pub name: String,
    pub ty: TypeExpr,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub members: Option<Vec<StructMember>>,
    /// Methods declared inside the struct body; their receiver is the struct
    pub methods: Vec<FunctionDecl>,
    pub location: SourceLocation,
}

/// Method requirement of a trait
#[derive(Debug, Clone, PartialEq)]
pub struct TraitMethod {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitDecl {
    pub name: String,
    pub methods: Vec<TraitMethod>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<u64>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub backing: Option<TypeExpr>,
    pub members: Vec<EnumMember>,
    pub location: SourceLocation,
}

/// Call or struct-literal argument, optionally tagged with a label
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub label: Option<String>,
    pub value: Expr,
    pub location: SourceLocation,
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal with an optional type suffix: 42, 42u8
    Integer {
        value: u64,
        suffix: Option<String>,
        location: SourceLocation,
    },

    Bool {
        value: bool,
        location: SourceLocation,
    },

    Char {
        value: u8,
        location: SourceLocation,
    },

    String {
        value: String,
        location: SourceLocation,
    },

    Null {
        location: SourceLocation,
    },

    /// Binary operation
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        location: SourceLocation,
    },

    /// Unary operation
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },

    /// Function call
    Call {
        callee: Box<Expr>,
        arguments: Vec<Argument>,
        location: SourceLocation,
    },

    /// Cast: value as T
    Cast {
        value: Box<Expr>,
        target: TypeExpr,
        location: SourceLocation,
    },

    /// Parenthesized expression
    Group {
        inner: Box<Expr>,
        location: SourceLocation,
    },

    /// sizeof(T)
    SizeOf {
        target: TypeExpr,
        location: SourceLocation,
    },

    /// Member access: object.member
    Member {
        object: Box<Expr>,
        member: String,
        location: SourceLocation,
    },

    /// Array access: array[index]
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },

    /// Struct literal: Point { x: 1, y: 2 }
    Make {
        target: TypeExpr,
        arguments: Vec<Argument>,
        location: SourceLocation,
    },

    /// Symbol reference
    Symbol {
        name: String,
        location: SourceLocation,
    },
}

impl Expr {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Integer { location, .. }
            | Expr::Bool { location, .. }
            | Expr::Char { location, .. }
            | Expr::String { location, .. }
            | Expr::Null { location }
            | Expr::Binary { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Call { location, .. }
            | Expr::Cast { location, .. }
            | Expr::Group { location, .. }
            | Expr::SizeOf { location, .. }
            | Expr::Member { location, .. }
            | Expr::Index { location, .. }
            | Expr::Make { location, .. }
            | Expr::Symbol { location, .. } => location,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    AddressOf,
    Dereference,
}

/// Parameter of a function type expression
#[derive(Debug, Clone, PartialEq)]
pub struct ParamType {
    pub label: Option<String>,
    pub name: Option<String>,
    pub ty: TypeExpr,
}

/// Type annotation as written in the source
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Named {
        name: String,
        location: SourceLocation,
    },
    Pointer {
        inner: Box<TypeExpr>,
        location: SourceLocation,
    },
    Array {
        item: Box<TypeExpr>,
        size: Option<Box<Expr>>,
        location: SourceLocation,
    },
    Function {
        params: Vec<ParamType>,
        return_type: Option<Box<TypeExpr>>,
        location: SourceLocation,
    },
}

impl TypeExpr {
    pub fn location(&self) -> &SourceLocation {
        match self {
            TypeExpr::Named { location, .. }
            | TypeExpr::Pointer { location, .. }
            | TypeExpr::Array { location, .. }
            | TypeExpr::Function { location, .. } => location,
        }
    }
}
