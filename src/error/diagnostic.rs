//! Diagnostic formatting and message writers
//!
//! The checker never prints directly. It hands [`Diagnostic`]s to a
//! [`MessageWriter`] it borrows from the caller, which decides how to
//! present them.

use super::{CheckError, SourceLocation};
use crate::syntax::SourceFile;
use colored::Colorize;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A located message produced by the checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
    pub related: Option<SourceLocation>,
}

impl Diagnostic {
    /// Create a warning
    pub fn warning(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            location,
            related: None,
        }
    }

    /// Format the diagnostic with color and, when available, source context
    pub fn format(&self, source: Option<&str>) -> String {
        let mut output = String::new();

        let label = match self.severity {
            Severity::Error => self.severity.label().red().bold(),
            Severity::Warning => self.severity.label().yellow().bold(),
        };
        output.push_str(&format!("{}: {}\n", label, self.message));
        output.push_str(&format!("  {} {}\n", "-->".blue().bold(), self.location));

        if let Some(source) = source {
            output.push_str(&format_source_context(source, &self.location, self.severity));
        }

        if let Some(ref related) = self.related {
            output.push_str(&format!(
                "  {} first defined at {}\n",
                "note:".cyan().bold(),
                related
            ));
        }

        output
    }
}

impl From<&CheckError> for Diagnostic {
    fn from(error: &CheckError) -> Self {
        Self {
            severity: Severity::Error,
            message: error.message(),
            location: error.location.clone(),
            related: error.related.clone(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format(None))
    }
}

/// Show the offending line with a caret under the column
fn format_source_context(source: &str, location: &SourceLocation, severity: Severity) -> String {
    let mut output = String::new();
    let lines: Vec<&str> = source.lines().collect();

    if location.line == 0 || location.line > lines.len() {
        return output;
    }

    let line_num_width = location.line.to_string().len();
    output.push_str(&format!(
        "  {} {}\n",
        format!("{:width$}", location.line, width = line_num_width)
            .blue()
            .bold(),
        lines[location.line - 1]
    ));

    let indicator_padding = " ".repeat(line_num_width + 2 + location.column.saturating_sub(1));
    let caret = match severity {
        Severity::Error => "^".red().bold(),
        Severity::Warning => "^".yellow().bold(),
    };
    output.push_str(&format!("{}{}\n", indicator_padding, caret));

    output
}

/// The collaborator the checker reports through
pub trait MessageWriter {
    fn write(&mut self, diagnostic: &Diagnostic);
}

/// Writes colored diagnostics to stderr, quoting source lines when the file is known
pub struct TerminalWriter {
    files: Vec<SourceFile>,
}

impl TerminalWriter {
    pub fn new(files: &[SourceFile]) -> Self {
        Self {
            files: files.to_vec(),
        }
    }

    fn source_for(&self, location: &SourceLocation) -> Option<&str> {
        let name = location.filename.as_deref()?;
        self.files
            .iter()
            .find(|file| file.name == name)
            .map(|file| file.text.as_str())
    }
}

impl MessageWriter for TerminalWriter {
    fn write(&mut self, diagnostic: &Diagnostic) {
        eprint!("{}", diagnostic.format(self.source_for(&diagnostic.location)));
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingWriter {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}

impl MessageWriter for CollectingWriter {
    fn write(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_diagnostic_without_source() {
        let err = CheckError::new(
            ErrorKind::UndefinedType {
                name: "Foo".to_string(),
            },
            SourceLocation::at(1, 1),
        );
        let formatted = Diagnostic::from(&err).format(None);

        assert!(formatted.contains("error"));
        assert!(formatted.contains("undefined type `Foo`"));
    }

    #[test]
    fn test_diagnostic_with_source() {
        let source = "let x = 42\nlet y: Foo = x\nlet z = 10";
        let err = CheckError::new(
            ErrorKind::UndefinedType {
                name: "Foo".to_string(),
            },
            SourceLocation::at(2, 8),
        );
        let formatted = Diagnostic::from(&err).format(Some(source));

        assert!(formatted.contains("let y: Foo = x"));
        assert!(formatted.contains('^'));
    }

    #[test]
    fn test_related_location_is_noted() {
        let err = CheckError::new(
            ErrorKind::AlreadyDefined {
                name: "x".to_string(),
            },
            SourceLocation::at(4, 5),
        )
        .with_related(SourceLocation::at(2, 5));
        let formatted = Diagnostic::from(&err).format(None);

        assert!(formatted.contains("first defined at 2:5"));
    }

    #[test]
    fn test_collecting_writer_splits_severities() {
        let mut writer = CollectingWriter::new();
        writer.write(&Diagnostic::warning("redundant cast", SourceLocation::at(1, 1)));
        writer.write(&Diagnostic::from(&CheckError::new(
            ErrorKind::NotAddressable,
            SourceLocation::at(2, 1),
        )));

        assert_eq!(writer.warnings().count(), 1);
        assert_eq!(writer.errors().count(), 1);
    }

    #[test]
    fn test_terminal_writer_finds_source_by_filename() {
        let files = vec![
            SourceFile {
                name: "main.tn".to_string(),
                text: "let x = 1\n".to_string(),
            },
            SourceFile {
                name: "util.tn".to_string(),
                text: "fn helper() {}\n".to_string(),
            },
        ];
        let writer = TerminalWriter::new(&files);

        let in_util = SourceLocation::new(1, 4, Some("util.tn".to_string()));
        assert_eq!(writer.source_for(&in_util), Some("fn helper() {}\n"));

        let in_main = SourceLocation::new(1, 1, Some("main.tn".to_string()));
        assert_eq!(writer.source_for(&in_main), Some("let x = 1\n"));

        let unknown = SourceLocation::new(1, 1, Some("other.tn".to_string()));
        assert_eq!(writer.source_for(&unknown), None);
        assert_eq!(writer.source_for(&SourceLocation::at(1, 1)), None);
    }
}
