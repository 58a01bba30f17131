//! Checked symbols
//!
//! A symbol is anything a name can resolve to. Every symbol carries the
//! name the backend will emit for it.

use super::checked::CheckedStmt;
use crate::error::SourceLocation;
use crate::types::{CheckedType, FunctionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    EnumMember,
    Function,
    Parameter,
    Type,
    Variable,
}

/// What a function symbol knows beyond its name
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    /// Full signature; for methods the receiver is the first parameter
    pub signature: FunctionType,
    pub receiver: Option<CheckedType>,
    /// Checked body, attached by the body pass
    pub body: Option<Vec<CheckedStmt>>,
    pub is_extern: bool,
}

#[derive(Debug, Clone)]
pub enum SymbolData {
    EnumMember { value: u64 },
    Function(FunctionInfo),
    Parameter,
    Type(CheckedType),
    Variable,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    /// `None` only for type symbols
    pub ty: Option<CheckedType>,
    pub location: SourceLocation,
    pub mangled: String,
    pub data: SymbolData,
}

impl Symbol {
    pub fn variable(name: impl Into<String>, ty: CheckedType, location: SourceLocation) -> Self {
        let name = name.into();
        Self {
            mangled: name.clone(),
            name,
            ty: Some(ty),
            location,
            data: SymbolData::Variable,
        }
    }

    pub fn parameter(name: impl Into<String>, ty: CheckedType, location: SourceLocation) -> Self {
        Self {
            data: SymbolData::Parameter,
            ..Self::variable(name, ty, location)
        }
    }

    pub fn enum_member(
        name: impl Into<String>,
        ty: CheckedType,
        value: u64,
        location: SourceLocation,
    ) -> Self {
        Self {
            data: SymbolData::EnumMember { value },
            ..Self::variable(name, ty, location)
        }
    }

    pub fn type_symbol(name: impl Into<String>, ty: CheckedType, location: SourceLocation) -> Self {
        let name = name.into();
        Self {
            mangled: name.clone(),
            name,
            ty: None,
            location,
            data: SymbolData::Type(ty),
        }
    }

    pub fn function(
        name: impl Into<String>,
        mangled: String,
        info: FunctionInfo,
        location: SourceLocation,
    ) -> Self {
        Self {
            name: name.into(),
            ty: Some(CheckedType::Function(info.signature.clone())),
            location,
            mangled,
            data: SymbolData::Function(info),
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self.data {
            SymbolData::EnumMember { .. } => SymbolKind::EnumMember,
            SymbolData::Function(_) => SymbolKind::Function,
            SymbolData::Parameter => SymbolKind::Parameter,
            SymbolData::Type(_) => SymbolKind::Type,
            SymbolData::Variable => SymbolKind::Variable,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionInfo> {
        match self.data {
            SymbolData::Function(ref info) => Some(info),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionInfo> {
        match self.data {
            SymbolData::Function(ref mut info) => Some(info),
            _ => None,
        }
    }

    /// The type a type symbol stands for
    pub fn named_type(&self) -> Option<&CheckedType> {
        match self.data {
            SymbolData::Type(ref ty) => Some(ty),
            _ => None,
        }
    }
}
