//! Statement checking

use super::Checker;
use crate::error::{CheckError, CheckResult, ErrorKind};
use crate::semantic::{CheckedExpr, CheckedStmt, CheckedStmtKind, Symbol};
use crate::syntax::{Expr, Stmt, VariableDecl};
use crate::types::{Builtin, CheckedType};

impl Checker<'_> {
    pub(crate) fn check_stmt(&mut self, stmt: &Stmt) -> CheckResult<CheckedStmt> {
        let location = stmt.location().clone();
        let kind = match stmt {
            Stmt::Assign { target, value, .. } => {
                let target = self.check_expr(target, None)?;
                let value = self.check_expr(value, Some(&target.ty))?;
                self.require_type(&target.ty, &value)?;
                CheckedStmtKind::Assign { target, value }
            }

            Stmt::Block { statements, .. } => CheckedStmtKind::Block(self.check_block(statements)?),

            Stmt::Break { .. } => CheckedStmtKind::Break,
            Stmt::Continue { .. } => CheckedStmtKind::Continue,

            Stmt::Expression { expr, .. } => {
                let expr = self.check_expr(expr, None)?;
                if self.options.warn_unused_results && expr.ty != CheckedType::Nothing {
                    self.warn(
                        format!("unused result of type `{}`", expr.ty),
                        expr.location.clone(),
                    );
                }
                CheckedStmtKind::Expression(expr)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let condition = self.check_condition(condition)?;
                let then_branch = Box::new(self.check_stmt(then_branch)?);
                let else_branch = match else_branch {
                    Some(branch) => Some(Box::new(self.check_stmt(branch)?)),
                    None => None,
                };
                CheckedStmtKind::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }

            Stmt::While {
                condition, body, ..
            } => {
                let condition = self.check_condition(condition)?;
                let body = Box::new(self.check_stmt(body)?);
                CheckedStmtKind::While { condition, body }
            }

            Stmt::Return { value, .. } => {
                let expected = self.return_type.clone().ok_or_else(|| {
                    CheckError::new(ErrorKind::UnsupportedStatement, location.clone())
                })?;
                match value {
                    Some(value) => {
                        let value = self.check_expr(value, Some(&expected))?;
                        self.require_type(&expected, &value)?;
                        CheckedStmtKind::Return(Some(value))
                    }
                    None if expected == CheckedType::Nothing => CheckedStmtKind::Return(None),
                    None => {
                        return Err(CheckError::new(
                            ErrorKind::MissingExpression {
                                expected: expected.to_string(),
                            },
                            location,
                        ))
                    }
                }
            }

            Stmt::Variable(decl) => return self.check_variable(decl),

            Stmt::Function(_)
            | Stmt::Struct(_)
            | Stmt::ExternalType { .. }
            | Stmt::Trait(_)
            | Stmt::Enum(_) => {
                return Err(CheckError::new(ErrorKind::UnsupportedStatement, location))
            }
        };

        Ok(CheckedStmt::new(kind, location))
    }

    /// Check statements in a fresh child scope
    pub(crate) fn check_block(&mut self, statements: &[Stmt]) -> CheckResult<Vec<CheckedStmt>> {
        self.push_scope();
        let checked = statements
            .iter()
            .map(|stmt| self.check_stmt(stmt))
            .collect::<CheckResult<Vec<_>>>();
        self.pop_scope();
        checked
    }

    fn check_condition(&mut self, condition: &Expr) -> CheckResult<CheckedExpr> {
        let bool_ty = self.builtin(Builtin::Bool);
        let condition = self.check_expr(condition, Some(&bool_ty))?;
        self.require_type(&bool_ty, &condition)?;
        Ok(condition)
    }

    /// Declare a variable in the current scope. The initializer is checked
    /// before the name becomes visible.
    pub(crate) fn check_variable(&mut self, decl: &VariableDecl) -> CheckResult<CheckedStmt> {
        let annotation = match decl.type_annotation {
            Some(ref annotation) => Some(self.resolve_type(annotation)?),
            None => None,
        };
        let value = match decl.initializer {
            Some(ref initializer) => Some(self.check_expr(initializer, annotation.as_ref())?),
            None => None,
        };

        let ty = match (annotation, &value) {
            (Some(annotation), Some(value)) => {
                self.require_type(&annotation, value)?;
                annotation
            }
            (Some(annotation), None) => annotation,
            (None, Some(value)) => value.ty.clone(),
            (None, None) => {
                return Err(CheckError::new(
                    ErrorKind::MissingType {
                        name: decl.name.clone(),
                    },
                    decl.location.clone(),
                ))
            }
        };

        if ty.is_pseudo() {
            return Err(CheckError::new(
                ErrorKind::InvalidVariableType {
                    found: ty.to_string(),
                },
                decl.location.clone(),
            ));
        }

        let symbol = Symbol::variable(&decl.name, ty.clone(), decl.location.clone());
        let mangled = symbol.mangled.clone();
        self.table.append(self.scope, symbol)?;

        Ok(CheckedStmt::new(
            CheckedStmtKind::Variable {
                name: decl.name.clone(),
                mangled,
                ty,
                value,
            },
            decl.location.clone(),
        ))
    }
}
