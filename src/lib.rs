//! # Tern semantic analysis
//!
//! The type checking stage of the Tern toolchain:
//! - resolves every name to a symbol and every expression to a type
//! - resolves overloaded functions by argument labels and receiver type
//! - produces a fully typed tree with backend-ready mangled names
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//! - `syntax`: The untyped tree handed over by the parser
//! - `types`: Checked types and the builtin/user type registry
//! - `semantic`: Symbols, scopes and the checked tree
//! - `checker`: The declaration driver and expression/statement checking
//! - `error`: Error handling and diagnostics

pub mod checker;
pub mod error;
pub mod semantic;
pub mod syntax;
pub mod types;

// Re-export commonly used types
pub use checker::{check, check_with_options, Checker, CheckerOptions};
pub use error::{
    CheckError, CheckResult, CollectingWriter, Diagnostic, ErrorKind, MessageWriter, SourceLocation,
    TerminalWriter,
};
pub use semantic::CheckedSource;
pub use syntax::ParsedSource;

/// Version of the Tern checker
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::build::{func, source, structure, ty};

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_check_entry_point() {
        let parsed = source(vec![
            structure("Point", vec![("x", ty("i32"))]),
            func("main", vec![], None, vec![]),
        ]);
        let mut writer = CollectingWriter::new();
        let checked = check(parsed, &mut writer).unwrap();

        assert_eq!(checked.files.len(), 1);
        assert!(checked.function("main").is_some());
        assert!(writer.diagnostics.is_empty());
    }
}
