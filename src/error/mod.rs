//! Error handling and diagnostics for the Tern checker
//!
//! Every fatal condition the checker can hit is an [`ErrorKind`]. A
//! [`CheckError`] pairs the kind with the location it was found at and,
//! for conflicts, the location of the earlier declaration.

use std::fmt;

use thiserror::Error;

pub mod diagnostic;

pub use diagnostic::{CollectingWriter, Diagnostic, MessageWriter, Severity, TerminalWriter};

/// Result type alias for checker operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Optional filename
    pub filename: Option<String>,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize, filename: Option<String>) -> Self {
        Self {
            line,
            column,
            filename,
        }
    }

    /// Create a source location without a filename
    pub fn at(line: usize, column: usize) -> Self {
        Self::new(line, column, None)
    }

    /// Location used for builtin declarations that have no source text
    pub fn builtin() -> Self {
        Self::new(0, 0, Some("<builtin>".to_string()))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref filename) = self.filename {
            write!(f, "{}:{}:{}", filename, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Every fatal condition raised while checking a translation unit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("`{name}` is already defined")]
    AlreadyDefined { name: String },
    #[error("undefined type `{name}`")]
    UndefinedType { name: String },
    #[error("undefined symbol `{name}`")]
    UndefinedSymbol { name: String },
    #[error("ambiguous reference to overloaded function `{name}`")]
    AmbiguousSymbol { name: String },
    #[error("undefined function `{name}`")]
    UndefinedFunction { name: String },
    #[error("`{name}` is a type, not a value")]
    NotAValue { name: String },
    #[error("expression of type `{found}` cannot be called")]
    NotCallable { found: String },
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },
    #[error("expected a numeric type, found `{found}`")]
    ExpectedNumeric { found: String },
    #[error("expected `bool`, found `{found}`")]
    ExpectedBoolean { found: String },
    #[error("operator cannot be applied to `{found}`")]
    InvalidOperand { found: String },
    #[error("expected a pointer, found `{found}`")]
    ExpectedPointer { found: String },
    #[error("expected an array, found `{found}`")]
    ExpectedArray { found: String },
    #[error("cannot take address of this expression")]
    NotAddressable,
    #[error("cannot cast `{from}` to `{to}`")]
    CannotCast { from: String, to: String },
    #[error("`{found}` is not a struct")]
    NotAStruct { found: String },
    #[error("`{ty}` has no member `{member}`")]
    NoSuchMember { ty: String, member: String },
    #[error("struct literal arguments must name a member")]
    UnnamedArgument,
    #[error("member `{member}` is initialized more than once")]
    DuplicateInitializer { member: String },
    #[error("argument label mismatch: expected {expected}, found {found}")]
    LabelMismatch { expected: String, found: String },
    #[error("too few arguments: expected {expected}, found {found}")]
    TooFewArguments { expected: usize, found: usize },
    #[error("too many arguments: expected {expected}, found {found}")]
    TooManyArguments { expected: usize, found: usize },
    #[error("missing type for `{name}`: give it a type, an initializer, or both")]
    MissingType { name: String },
    #[error("missing expression: function returns `{expected}`")]
    MissingExpression { expected: String },
    #[error("`{found}` cannot be the type of a variable")]
    InvalidVariableType { found: String },
    #[error("unsupported statement")]
    UnsupportedStatement,
    #[error("type `{name}` is already declared")]
    TypeRedeclared { name: String },
    #[error("duplicate member `{name}`")]
    DuplicateMember { name: String },
    #[error("value of enum member `{member}` overflows")]
    EnumValueOverflow { member: String },
    #[error("`{suffix}` is not an integer type")]
    InvalidLiteralSuffix { suffix: String },
    #[error("internal checker error: {message}")]
    Internal { message: String },
}

/// A fatal checking error with its primary and optional related location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckError {
    pub kind: ErrorKind,
    pub location: SourceLocation,
    pub related: Option<SourceLocation>,
}

impl CheckError {
    /// Create a new error at `location`
    pub fn new(kind: ErrorKind, location: SourceLocation) -> Self {
        Self {
            kind,
            location,
            related: None,
        }
    }

    /// Attach the location of an earlier, conflicting declaration
    pub fn with_related(mut self, related: SourceLocation) -> Self {
        self.related = Some(related);
        self
    }

    /// Create a type mismatch error from anything displayable
    pub fn mismatch(
        expected: impl fmt::Display,
        found: impl fmt::Display,
        location: SourceLocation,
    ) -> Self {
        Self::new(
            ErrorKind::TypeMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            },
            location,
        )
    }

    /// Create an internal error; these indicate a checker bug, not a user mistake
    pub fn internal(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(
            ErrorKind::Internal {
                message: message.into(),
            },
            location,
        )
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type Error: {} at {}", self.kind, self.location)?;
        if let Some(ref related) = self.related {
            write!(f, " (previously at {})", related)?;
        }
        Ok(())
    }
}

impl std::error::Error for CheckError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation::at(10, 5);
        assert_eq!(loc.to_string(), "10:5");

        let loc_with_file = SourceLocation::new(10, 5, Some("test.tn".to_string()));
        assert_eq!(loc_with_file.to_string(), "test.tn:10:5");
    }

    #[test]
    fn test_error_display() {
        let err = CheckError::mismatch("i32", "bool", SourceLocation::at(5, 10));
        assert_eq!(
            err.to_string(),
            "Type Error: type mismatch: expected `i32`, found `bool` at 5:10"
        );
    }

    #[test]
    fn test_error_with_related_location() {
        let err = CheckError::new(
            ErrorKind::AlreadyDefined {
                name: "x".to_string(),
            },
            SourceLocation::at(3, 1),
        )
        .with_related(SourceLocation::at(1, 1));

        assert_eq!(err.related, Some(SourceLocation::at(1, 1)));
        assert_eq!(
            err.to_string(),
            "Type Error: `x` is already defined at 3:1 (previously at 1:1)"
        );
    }

    #[test]
    fn test_argument_count_messages() {
        let too_many = ErrorKind::TooManyArguments {
            expected: 2,
            found: 3,
        };
        assert_eq!(too_many.to_string(), "too many arguments: expected 2, found 3");
    }
}
