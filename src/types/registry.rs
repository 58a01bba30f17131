//! Builtin and user type registry
//!
//! Builtins are seeded first and never change; user types are appended
//! after them by the declaration driver.

use super::type_def::{CheckedType, IntKind};
use crate::error::SourceLocation;

/// The builtin types every translation unit starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Bool,
    Int(IntKind),
    Any,
    Nothing,
    Null,
}

impl Builtin {
    fn name(&self) -> &'static str {
        match self {
            Builtin::Bool => "bool",
            Builtin::Int(kind) => kind.name(),
            Builtin::Any => "any",
            Builtin::Nothing => "void",
            Builtin::Null => "null",
        }
    }

    fn checked_type(&self) -> CheckedType {
        match self {
            Builtin::Bool => CheckedType::Bool,
            Builtin::Int(kind) => CheckedType::Int(*kind),
            Builtin::Any => CheckedType::Any,
            Builtin::Nothing => CheckedType::Nothing,
            Builtin::Null => CheckedType::Null,
        }
    }

    /// Seeding order
    fn all() -> Vec<Builtin> {
        let mut all = vec![Builtin::Bool];
        all.extend(IntKind::ALL.iter().map(|kind| Builtin::Int(*kind)));
        all.extend([Builtin::Any, Builtin::Nothing, Builtin::Null]);
        all
    }
}

#[derive(Debug, Clone)]
pub struct RegisteredType {
    pub name: String,
    pub ty: CheckedType,
    pub location: SourceLocation,
    builtin: Option<Builtin>,
}

#[derive(Debug)]
pub struct TypeRegistry {
    entries: Vec<RegisteredType>,
    builtin_count: usize,
}

impl TypeRegistry {
    /// A registry holding only the builtins
    pub fn seeded() -> Self {
        let entries: Vec<RegisteredType> = Builtin::all()
            .into_iter()
            .map(|builtin| RegisteredType {
                name: builtin.name().to_string(),
                ty: builtin.checked_type(),
                location: SourceLocation::builtin(),
                builtin: Some(builtin),
            })
            .collect();
        let builtin_count = entries.len();

        Self {
            entries,
            builtin_count,
        }
    }

    pub fn builtins(&self) -> &[RegisteredType] {
        &self.entries[..self.builtin_count]
    }

    pub fn user_types(&self) -> &[RegisteredType] {
        &self.entries[self.builtin_count..]
    }

    pub fn find_entry(&self, name: &str) -> Option<&RegisteredType> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn find_type(&self, name: &str) -> Option<&CheckedType> {
        self.find_entry(name).map(|entry| &entry.ty)
    }

    /// Look a builtin up. Every builtin is seeded, so a miss is a bug in
    /// the checker itself.
    pub fn get_builtin(&self, kind: Builtin) -> CheckedType {
        match self.builtins().iter().find(|entry| entry.builtin == Some(kind)) {
            Some(entry) => entry.ty.clone(),
            None => panic!("builtin `{}` was never seeded", kind.name()),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, ty: CheckedType, location: SourceLocation) {
        self.entries.push(RegisteredType {
            name: name.into(),
            ty,
            location,
            builtin: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seeded_builtins() {
        let registry = TypeRegistry::seeded();

        assert_eq!(registry.builtins().len(), 14);
        assert!(registry.user_types().is_empty());
        assert_eq!(registry.find_type("u8"), Some(&CheckedType::Int(IntKind::U8)));
        assert_eq!(registry.find_type("void"), Some(&CheckedType::Nothing));
        assert_eq!(registry.find_type("Point"), None);
    }

    #[test]
    fn test_get_builtin() {
        let registry = TypeRegistry::seeded();

        assert_eq!(
            registry.get_builtin(Builtin::Int(IntKind::USize)),
            CheckedType::Int(IntKind::USize)
        );
        assert_eq!(registry.get_builtin(Builtin::Null), CheckedType::Null);
    }

    #[test]
    fn test_user_types_follow_builtins() {
        let mut registry = TypeRegistry::seeded();
        registry.register(
            "Point",
            CheckedType::Struct(StructType::declared("Point")),
            SourceLocation::at(1, 1),
        );

        assert_eq!(registry.user_types().len(), 1);
        assert_eq!(registry.user_types()[0].name, "Point");
        assert!(registry.find_type("Point").is_some());
    }
}
