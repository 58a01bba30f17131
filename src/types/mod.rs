//! Type system module
//!
//! This module defines checked types and the registry of named types.

pub mod registry;
pub mod type_def;

pub use registry::{Builtin, RegisteredType, TypeRegistry};
pub use type_def::{CheckedType, FunctionType, IntKind, Member, Parameter, StructType, TraitType};
