//! Backend name mangling
//!
//! The backend has no overloading, so every function name encodes its
//! receiver and the positions of its labeled parameters.

use crate::types::CheckedType;

/// Tag for a type nested inside a receiver
pub fn type_tag(ty: &CheckedType) -> String {
    match ty {
        CheckedType::Pointer(inner) => format!("P{}", type_tag(inner)),
        CheckedType::Array(item) => format!("A{}", type_tag(item)),
        CheckedType::FunctionPointer(_) | CheckedType::Function(_) => "F".to_string(),
        other => other.to_string(),
    }
}

/// Receivers are always pointers, so the outer pointer is implied
pub fn receiver_tag(receiver: &CheckedType) -> String {
    match receiver {
        CheckedType::Pointer(inner) => type_tag(inner),
        other => type_tag(other),
    }
}

/// Mangled name of a function. `labels` holds the label of every declared
/// parameter, receiver excluded.
pub fn function_name<'a>(
    receiver: Option<&CheckedType>,
    name: &str,
    labels: impl IntoIterator<Item = Option<&'a str>>,
) -> String {
    let mut mangled = match receiver {
        Some(receiver) => format!("{}_{}", receiver_tag(receiver), name),
        None => name.to_string(),
    };
    for (index, label) in labels.into_iter().enumerate() {
        if let Some(label) = label {
            mangled.push_str(&format!("_{}{}", index, label));
        }
    }
    mangled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IntKind, StructType};
    use pretty_assertions::assert_eq;

    const UNLABELED: [Option<&str>; 0] = [];

    #[test]
    fn test_plain_function_keeps_its_name() {
        assert_eq!(function_name(None, "f", UNLABELED), "f");
        assert_eq!(function_name(None, "f", [None, None]), "f");
    }

    #[test]
    fn test_labels_encode_position() {
        assert_eq!(function_name(None, "f", [Some("x")]), "f_0x");
        assert_eq!(
            function_name(None, "copy", [None, Some("into"), Some("count")]),
            "copy_1into_2count"
        );
    }

    #[test]
    fn test_receiver_prefix() {
        let square = CheckedType::pointer_to(CheckedType::Struct(StructType::declared("Square")));
        assert_eq!(function_name(Some(&square), "area", UNLABELED), "Square_area");

        let nested = CheckedType::pointer_to(CheckedType::pointer_to(CheckedType::array_of(
            CheckedType::Int(IntKind::U8),
        )));
        assert_eq!(function_name(Some(&nested), "len", UNLABELED), "PAu8_len");
    }
}
