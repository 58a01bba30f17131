//! Type checker implementation
//!
//! One [`Checker`] checks one translation unit. It owns the type registry,
//! the symbol table and the current scope, and borrows the message writer
//! it reports through.

use crate::error::{CheckError, CheckResult, Diagnostic, MessageWriter, SourceLocation};
use crate::semantic::{CheckedExpr, CheckedSource, ScopeId, Symbol, SymbolId, SymbolTable};
use crate::syntax::ParsedSource;
use crate::types::{Builtin, CheckedType, FunctionType, TypeRegistry};

mod call;
mod declare;
mod expr;
pub mod mangle;
mod resolve;
mod stmt;


/// Which advisory warnings to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    pub warn_redundant_casts: bool,
    pub warn_unused_results: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            warn_redundant_casts: true,
            warn_unused_results: true,
        }
    }
}

pub struct Checker<'w> {
    registry: TypeRegistry,
    table: SymbolTable,
    scope: ScopeId,
    /// Return type of the function whose body is being checked
    return_type: Option<CheckedType>,
    warnings: Vec<Diagnostic>,
    options: CheckerOptions,
    writer: &'w mut dyn MessageWriter,
}

impl<'w> Checker<'w> {
    pub fn new(writer: &'w mut dyn MessageWriter, options: CheckerOptions) -> Self {
        let registry = TypeRegistry::seeded();
        let mut table = SymbolTable::new();
        let global = table.global();

        for builtin in registry.builtins() {
            let symbol =
                Symbol::type_symbol(&builtin.name, builtin.ty.clone(), builtin.location.clone());
            if let Err(err) = table.append(global, symbol) {
                panic!("builtin registered twice: {}", err);
            }
        }

        Self {
            registry,
            table,
            scope: global,
            return_type: None,
            warnings: Vec::new(),
            options,
            writer,
        }
    }

    /// Check a whole translation unit
    pub fn check(&mut self, parsed: ParsedSource) -> CheckResult<CheckedSource> {
        let result = self.check_declarations(&parsed.statements);
        let warnings = self.flush_warnings();

        match result {
            Ok(statements) => Ok(CheckedSource {
                files: parsed.files,
                symbols: self.global_symbols(),
                statements,
                warnings,
            }),
            Err(err) => {
                self.writer.write(&Diagnostic::from(&err));
                Err(err)
            }
        }
    }

    fn builtin(&self, kind: Builtin) -> CheckedType {
        self.registry.get_builtin(kind)
    }

    fn warn(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.warnings.push(Diagnostic::warning(message, location));
    }

    /// Warnings are held back until checking finishes
    fn flush_warnings(&mut self) -> Vec<Diagnostic> {
        for warning in &self.warnings {
            self.writer.write(warning);
        }
        std::mem::take(&mut self.warnings)
    }

    fn global_symbols(&self) -> Vec<Symbol> {
        self.table
            .entries(self.table.global())
            .map(|(_, symbol)| symbol.clone())
            .collect()
    }

    fn push_scope(&mut self) {
        self.scope = self.table.create(self.scope);
    }

    fn pop_scope(&mut self) {
        self.scope = self.table.discard(self.scope);
    }

    /// `actual` must fit where `expected` is required
    fn require_type(&self, expected: &CheckedType, actual: &CheckedExpr) -> CheckResult<()> {
        if expected.accepts(&actual.ty) {
            Ok(())
        } else {
            Err(CheckError::mismatch(expected, &actual.ty, actual.location.clone()))
        }
    }

    /// Global function symbols called `name`, in declaration order
    fn global_functions(&self, name: &str) -> Vec<Candidate> {
        self.table
            .entries(self.table.global())
            .filter(|(_, symbol)| symbol.name == name)
            .filter_map(|(id, symbol)| {
                symbol.as_function().map(|info| Candidate {
                    id,
                    signature: info.signature.clone(),
                    receiver: info.receiver.clone(),
                })
            })
            .collect()
    }
}

/// A function an unresolved name could refer to
struct Candidate {
    id: SymbolId,
    signature: FunctionType,
    receiver: Option<CheckedType>,
}

/// Check a parsed program with the default options
pub fn check(parsed: ParsedSource, writer: &mut dyn MessageWriter) -> CheckResult<CheckedSource> {
    check_with_options(parsed, writer, CheckerOptions::default())
}

pub fn check_with_options(
    parsed: ParsedSource,
    writer: &mut dyn MessageWriter,
    options: CheckerOptions,
) -> CheckResult<CheckedSource> {
    Checker::new(writer, options).check(parsed)
}
