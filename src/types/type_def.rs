//! Type definitions
//!
//! This module defines the checked types of Tern. Builtins, pointers,
//! arrays and functions compare structurally; structs, external types and
//! traits compare by name only.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Integer widths and signedness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    ISize,
    U8,
    U16,
    U32,
    U64,
    USize,
}

impl IntKind {
    pub const ALL: [IntKind; 10] = [
        IntKind::I8,
        IntKind::I16,
        IntKind::I32,
        IntKind::I64,
        IntKind::ISize,
        IntKind::U8,
        IntKind::U16,
        IntKind::U32,
        IntKind::U64,
        IntKind::USize,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::ISize => "isize",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::USize => "usize",
        }
    }
}

/// A function parameter: optional call-site label, internal name, type
#[derive(Debug, Clone)]
pub struct Parameter {
    pub label: Option<String>,
    pub name: String,
    pub ty: CheckedType,
}

impl PartialEq for Parameter {
    // The internal name is not part of the signature.
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.ty == other.ty
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub params: Vec<Parameter>,
    pub return_type: Box<CheckedType>,
}

impl FunctionType {
    pub fn new(params: Vec<Parameter>, return_type: CheckedType) -> Self {
        Self {
            params,
            return_type: Box::new(return_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub ty: CheckedType,
}

/// A user struct. Members are filled in after the name is registered so
/// that forward declarations and self-referencing pointers work.
pub struct StructType {
    pub name: String,
    members: RefCell<Vec<Member>>,
    defined: Cell<bool>,
}

impl StructType {
    /// A struct whose members are not known yet
    pub fn declared(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            members: RefCell::new(Vec::new()),
            defined: Cell::new(false),
        })
    }

    pub fn with_members(name: impl Into<String>, members: Vec<Member>) -> Rc<Self> {
        let ty = Self::declared(name);
        ty.define(members);
        ty
    }

    pub fn define(&self, members: Vec<Member>) {
        *self.members.borrow_mut() = members;
        self.defined.set(true);
    }

    pub fn is_defined(&self) -> bool {
        self.defined.get()
    }

    pub fn members(&self) -> Ref<'_, Vec<Member>> {
        self.members.borrow()
    }

    pub fn member(&self, name: &str) -> Option<Member> {
        self.members.borrow().iter().find(|m| m.name == name).cloned()
    }
}

// Members may point back at the struct itself, so only names are printed.
impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.members.borrow();
        f.debug_struct("StructType")
            .field("name", &self.name)
            .field(
                "members",
                &members.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            )
            .field("defined", &self.defined.get())
            .finish()
    }
}

/// Interface-like type: a backing struct holding a type-erased self
/// pointer plus one function pointer per method.
#[derive(Debug)]
pub struct TraitType {
    pub name: String,
    pub backing: Rc<StructType>,
    pub methods: Vec<(String, FunctionType)>,
}

/// Checked type information
#[derive(Debug, Clone)]
pub enum CheckedType {
    Bool,
    Int(IntKind),
    Any,
    /// Absence of a return value
    Nothing,
    /// Type of the `null` literal
    Null,
    Array(Box<CheckedType>),
    Pointer(Box<CheckedType>),
    Function(FunctionType),
    FunctionPointer(FunctionType),
    Struct(Rc<StructType>),
    External(String),
    Trait(Rc<TraitType>),
}

impl CheckedType {
    pub fn pointer_to(inner: CheckedType) -> Self {
        CheckedType::Pointer(Box::new(inner))
    }

    pub fn array_of(item: CheckedType) -> Self {
        CheckedType::Array(Box::new(item))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CheckedType::Int(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, CheckedType::Bool)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, CheckedType::Pointer(_))
    }

    pub fn is_pseudo(&self) -> bool {
        matches!(self, CheckedType::Nothing | CheckedType::Null)
    }

    /// Whether a value of type `actual` can go where `self` is expected.
    /// Identity, except that `null` fits any pointer slot.
    pub fn accepts(&self, actual: &CheckedType) -> bool {
        match (self, actual) {
            (CheckedType::Pointer(_) | CheckedType::FunctionPointer(_), CheckedType::Null) => true,
            _ => self == actual,
        }
    }

    /// Strip one level of pointer when it leads to a struct or trait
    pub fn auto_deref(&self) -> (&CheckedType, bool) {
        match self {
            CheckedType::Pointer(inner)
                if matches!(**inner, CheckedType::Struct(_) | CheckedType::Trait(_)) =>
            {
                (inner, true)
            }
            _ => (self, false),
        }
    }

    /// The struct whose members are visible through this type
    pub fn member_struct(&self) -> Option<Rc<StructType>> {
        match self {
            CheckedType::Struct(def) => Some(Rc::clone(def)),
            CheckedType::Trait(def) => Some(Rc::clone(&def.backing)),
            _ => None,
        }
    }
}

impl PartialEq for CheckedType {
    fn eq(&self, other: &Self) -> bool {
        use CheckedType::*;
        match (self, other) {
            (Bool, Bool) | (Any, Any) | (Nothing, Nothing) | (Null, Null) => true,
            (Int(a), Int(b)) => a == b,
            (Array(a), Array(b)) | (Pointer(a), Pointer(b)) => a == b,
            (Function(a), Function(b)) | (FunctionPointer(a), FunctionPointer(b)) => a == b,
            (Struct(a), Struct(b)) => a.name == b.name,
            (External(a), External(b)) => a == b,
            (Trait(a), Trait(b)) => a.name == b.name,
            _ => false,
        }
    }
}

fn write_signature(f: &mut fmt::Formatter<'_>, signature: &FunctionType) -> fmt::Result {
    write!(f, "fn(")?;
    for (i, param) in signature.params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if let Some(ref label) = param.label {
            write!(f, "{} ", label)?;
        }
        write!(f, "{}: {}", param.name, param.ty)?;
    }
    write!(f, ")")?;
    if !matches!(*signature.return_type, CheckedType::Nothing) {
        write!(f, " -> {}", signature.return_type)?;
    }
    Ok(())
}

impl fmt::Display for CheckedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckedType::Bool => write!(f, "bool"),
            CheckedType::Int(kind) => write!(f, "{}", kind.name()),
            CheckedType::Any => write!(f, "any"),
            CheckedType::Nothing => write!(f, "void"),
            CheckedType::Null => write!(f, "null"),
            CheckedType::Array(item) => write!(f, "[{}]", item),
            CheckedType::Pointer(inner) => write!(f, "*{}", inner),
            CheckedType::Function(signature) | CheckedType::FunctionPointer(signature) => {
                write_signature(f, signature)
            }
            CheckedType::Struct(def) => write!(f, "{}", def.name),
            CheckedType::External(name) => write!(f, "{}", name),
            CheckedType::Trait(def) => write!(f, "{}", def.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn i32_member(name: &str) -> Member {
        Member {
            name: name.to_string(),
            ty: CheckedType::Int(IntKind::I32),
        }
    }

    #[test]
    fn test_structural_equality() {
        let a = CheckedType::pointer_to(CheckedType::array_of(CheckedType::Int(IntKind::U8)));
        let b = CheckedType::pointer_to(CheckedType::array_of(CheckedType::Int(IntKind::U8)));
        let c = CheckedType::pointer_to(CheckedType::array_of(CheckedType::Int(IntKind::I8)));

        assert_eq!(a, a.clone());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_struct_identity_is_by_name() {
        let point = CheckedType::Struct(StructType::with_members(
            "Point",
            vec![i32_member("x"), i32_member("y")],
        ));
        let same_name = CheckedType::Struct(StructType::declared("Point"));
        let same_shape = CheckedType::Struct(StructType::with_members(
            "Vec2",
            vec![i32_member("x"), i32_member("y")],
        ));

        assert_eq!(point, same_name);
        assert_ne!(point, same_shape);
    }

    #[test]
    fn test_function_equality_ignores_parameter_names() {
        let first = FunctionType::new(
            vec![Parameter {
                label: Some("x".to_string()),
                name: "a".to_string(),
                ty: CheckedType::Int(IntKind::I32),
            }],
            CheckedType::Bool,
        );
        let mut second = first.clone();
        second.params[0].name = "b".to_string();
        let mut unlabeled = first.clone();
        unlabeled.params[0].label = None;

        assert_eq!(
            CheckedType::FunctionPointer(first.clone()),
            CheckedType::FunctionPointer(second)
        );
        assert_ne!(
            CheckedType::FunctionPointer(first),
            CheckedType::FunctionPointer(unlabeled)
        );
    }

    #[test]
    fn test_null_fits_pointer_slots_only() {
        let ptr = CheckedType::pointer_to(CheckedType::Int(IntKind::U8));

        assert!(ptr.accepts(&CheckedType::Null));
        assert!(!CheckedType::Int(IntKind::U8).accepts(&CheckedType::Null));
        assert_ne!(ptr, CheckedType::Null);
    }

    #[test]
    fn test_display() {
        let signature = FunctionType::new(
            vec![Parameter {
                label: Some("at".to_string()),
                name: "index".to_string(),
                ty: CheckedType::Int(IntKind::USize),
            }],
            CheckedType::pointer_to(CheckedType::Int(IntKind::U8)),
        );

        assert_eq!(
            CheckedType::FunctionPointer(signature).to_string(),
            "fn(at index: usize) -> *u8"
        );
        assert_eq!(
            CheckedType::array_of(CheckedType::Bool).to_string(),
            "[bool]"
        );
    }
}
