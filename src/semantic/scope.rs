//! Symbol scope chain
//!
//! Scopes live in an arena and point at their parent by index. Each scope
//! keeps its symbols in declaration order; lookups walk that order
//! backwards and then move on to the parent.

use log::trace;

use super::symbol::{Symbol, SymbolId, SymbolKind};
use crate::error::{CheckError, CheckResult, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct Scope {
    parent: Option<ScopeId>,
    entries: Vec<SymbolId>,
}

/// Owns every symbol and every live scope of a translation unit
#[derive(Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding only the empty global scope
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: vec![Scope {
                parent: None,
                entries: Vec::new(),
            }],
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn create(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            entries: Vec::new(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// Drop the innermost scope and return its parent. Symbols declared in
    /// it stay in the arena but can no longer be found.
    pub fn discard(&mut self, scope: ScopeId) -> ScopeId {
        debug_assert_eq!(scope.0, self.scopes.len() - 1, "scopes must be discarded innermost first");
        let parent = self.scopes[scope.0].parent.unwrap_or(ScopeId(0));
        if scope.0 != 0 {
            self.scopes.truncate(scope.0);
        }
        parent
    }

    /// Add a symbol to `scope`. A name may appear once per scope; functions
    /// are the exception and may share a name as long as their mangled
    /// names differ. Mangled names are unique within a scope.
    pub fn append(&mut self, scope: ScopeId, symbol: Symbol) -> CheckResult<SymbolId> {
        let conflict = self.scopes[scope.0].entries.iter().find(|id| {
            let existing = &self.symbols[id.0];
            if existing.mangled == symbol.mangled {
                return true;
            }
            let overloads = existing.kind() == SymbolKind::Function
                && symbol.kind() == SymbolKind::Function;
            existing.name == symbol.name && !overloads
        });

        if let Some(existing) = conflict {
            return Err(CheckError::new(
                ErrorKind::AlreadyDefined {
                    name: symbol.name.clone(),
                },
                symbol.location.clone(),
            )
            .with_related(self.symbols[existing.0].location.clone()));
        }

        trace!("scope {}: append `{}` ({:?})", scope.0, symbol.name, symbol.kind());
        let id = SymbolId(self.symbols.len());
        self.symbols.push(symbol);
        self.scopes[scope.0].entries.push(id);
        Ok(id)
    }

    /// Most recent symbol called `name` visible from `scope`
    pub fn find(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(ScopeId(index)) = current {
            let found = self.scopes[index]
                .entries
                .iter()
                .rev()
                .find(|id| self.symbols[id.0].name == name);
            if let Some(id) = found {
                return Some(*id);
            }
            current = self.scopes[index].parent;
        }
        None
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    /// Symbols of `scope` in declaration order
    pub fn entries(&self, scope: ScopeId) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.scopes[scope.0]
            .entries
            .iter()
            .map(move |id| (*id, &self.symbols[id.0]))
    }
}
