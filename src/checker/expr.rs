//! Expression checking
//!
//! Every expression is checked against an optional expected type. The
//! expected type only steers literals and overloaded function references;
//! it never converts a value.

use std::rc::Rc;

use log::trace;

use super::Checker;
use crate::error::{CheckError, CheckResult, ErrorKind, SourceLocation};
use crate::semantic::{CheckedExpr, CheckedExprKind, SymbolId, SymbolKind};
use crate::syntax::{Argument, BinaryOp, Expr, TypeExpr, UnaryOp};
use crate::types::{Builtin, CheckedType, IntKind, StructType};

impl Checker<'_> {
    pub(crate) fn check_expr(
        &mut self,
        expr: &Expr,
        expected: Option<&CheckedType>,
    ) -> CheckResult<CheckedExpr> {
        match expr {
            Expr::Integer {
                value,
                suffix,
                location,
            } => {
                let ty = match suffix {
                    Some(suffix) => match self.registry.find_type(suffix) {
                        Some(ty @ CheckedType::Int(_)) => ty.clone(),
                        _ => {
                            return Err(CheckError::new(
                                ErrorKind::InvalidLiteralSuffix {
                                    suffix: suffix.clone(),
                                },
                                location.clone(),
                            ))
                        }
                    },
                    None => match expected {
                        Some(ty @ CheckedType::Int(_)) => ty.clone(),
                        _ => self.builtin(Builtin::Int(IntKind::I32)),
                    },
                };
                Ok(CheckedExpr::new(CheckedExprKind::Integer(*value), ty, location.clone()))
            }

            Expr::Bool { value, location } => Ok(CheckedExpr::new(
                CheckedExprKind::Bool(*value),
                self.builtin(Builtin::Bool),
                location.clone(),
            )),

            Expr::Char { value, location } => Ok(CheckedExpr::new(
                CheckedExprKind::Char(*value),
                self.builtin(Builtin::Int(IntKind::U8)),
                location.clone(),
            )),

            Expr::String { value, location } => Ok(CheckedExpr::new(
                CheckedExprKind::String(value.clone()),
                CheckedType::pointer_to(self.builtin(Builtin::Int(IntKind::U8))),
                location.clone(),
            )),

            Expr::Null { location } => Ok(CheckedExpr::new(
                CheckedExprKind::Null,
                self.builtin(Builtin::Null),
                location.clone(),
            )),

            Expr::Binary {
                left,
                operator,
                right,
                location,
            } => self.check_binary(left, *operator, right, expected, location),

            Expr::Unary {
                operator,
                operand,
                location,
            } => self.check_unary(*operator, operand, expected, location),

            Expr::Call {
                callee,
                arguments,
                location,
            } => self.check_call(callee, arguments, location),

            Expr::Cast {
                value,
                target,
                location,
            } => self.check_cast(value, target, location),

            Expr::Group { inner, location } => {
                let inner = self.check_expr(inner, expected)?;
                let ty = inner.ty.clone();
                Ok(CheckedExpr::new(
                    CheckedExprKind::Group(Box::new(inner)),
                    ty,
                    location.clone(),
                ))
            }

            Expr::SizeOf { target, location } => {
                let target = self.resolve_type(target)?;
                Ok(CheckedExpr::new(
                    CheckedExprKind::SizeOf(target),
                    self.builtin(Builtin::Int(IntKind::USize)),
                    location.clone(),
                ))
            }

            Expr::Member {
                object,
                member,
                location,
            } => {
                let object = self.check_expr(object, None)?;
                self.member_access(object, member, location)
            }

            Expr::Index {
                array,
                index,
                location,
            } => self.check_index(array, index, location),

            Expr::Make {
                target,
                arguments,
                location,
            } => self.check_make(target, arguments, location),

            Expr::Symbol { name, location } => self.check_symbol(name, expected, location),
        }
    }

    fn check_binary(
        &mut self,
        left: &Expr,
        operator: BinaryOp,
        right: &Expr,
        expected: Option<&CheckedType>,
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        match operator {
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide
            | BinaryOp::Modulo => {
                let left = self.check_expr(left, expected)?;
                if !left.ty.is_numeric() {
                    return Err(CheckError::new(
                        ErrorKind::ExpectedNumeric {
                            found: left.ty.to_string(),
                        },
                        left.location,
                    ));
                }
                let right = self.check_expr(right, Some(&left.ty))?;
                self.require_same(&left.ty, &right)?;

                let ty = left.ty.clone();
                Ok(CheckedExpr::new(
                    CheckedExprKind::Arithmetic {
                        operator,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    ty,
                    location.clone(),
                ))
            }

            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                let left = self.check_expr(left, None)?;
                if !left.ty.is_numeric() {
                    return Err(CheckError::new(
                        ErrorKind::ExpectedNumeric {
                            found: left.ty.to_string(),
                        },
                        left.location,
                    ));
                }
                self.finish_comparison(operator, left, right, location)
            }

            BinaryOp::Equal | BinaryOp::NotEqual => {
                let left = self.check_expr(left, None)?;
                if !(left.ty.is_numeric() || left.ty.is_bool() || left.ty.is_pointer()) {
                    return Err(CheckError::new(
                        ErrorKind::InvalidOperand {
                            found: left.ty.to_string(),
                        },
                        left.location,
                    ));
                }
                self.finish_comparison(operator, left, right, location)
            }

            BinaryOp::And | BinaryOp::Or => {
                let bool_ty = self.builtin(Builtin::Bool);
                let left = self.check_expr(left, Some(&bool_ty))?;
                self.require_bool(&left)?;
                let right = self.check_expr(right, Some(&bool_ty))?;
                self.require_bool(&right)?;

                Ok(CheckedExpr::new(
                    CheckedExprKind::Logical {
                        operator,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    bool_ty,
                    location.clone(),
                ))
            }
        }
    }

    fn finish_comparison(
        &mut self,
        operator: BinaryOp,
        left: CheckedExpr,
        right: &Expr,
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        let right = self.check_expr(right, Some(&left.ty))?;
        self.require_type(&left.ty, &right)?;

        Ok(CheckedExpr::new(
            CheckedExprKind::Compare {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            self.builtin(Builtin::Bool),
            location.clone(),
        ))
    }

    /// Exact equality, no `null` allowance
    fn require_same(&self, expected: &CheckedType, actual: &CheckedExpr) -> CheckResult<()> {
        if *expected == actual.ty {
            Ok(())
        } else {
            Err(CheckError::mismatch(expected, &actual.ty, actual.location.clone()))
        }
    }

    pub(crate) fn require_bool(&self, expr: &CheckedExpr) -> CheckResult<()> {
        if expr.ty.is_bool() {
            Ok(())
        } else {
            Err(CheckError::new(
                ErrorKind::ExpectedBoolean {
                    found: expr.ty.to_string(),
                },
                expr.location.clone(),
            ))
        }
    }

    fn check_unary(
        &mut self,
        operator: UnaryOp,
        operand: &Expr,
        expected: Option<&CheckedType>,
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        match operator {
            UnaryOp::Negate => {
                let operand = self.check_expr(operand, expected)?;
                if !operand.ty.is_numeric() {
                    return Err(CheckError::new(
                        ErrorKind::ExpectedNumeric {
                            found: operand.ty.to_string(),
                        },
                        operand.location,
                    ));
                }
                let ty = operand.ty.clone();
                Ok(CheckedExpr::new(
                    CheckedExprKind::Negate(Box::new(operand)),
                    ty,
                    location.clone(),
                ))
            }

            UnaryOp::Not => {
                let bool_ty = self.builtin(Builtin::Bool);
                let operand = self.check_expr(operand, Some(&bool_ty))?;
                self.require_bool(&operand)?;
                Ok(CheckedExpr::new(
                    CheckedExprKind::Not(Box::new(operand)),
                    bool_ty,
                    location.clone(),
                ))
            }

            UnaryOp::AddressOf => {
                if !matches!(operand, Expr::Symbol { .. } | Expr::Member { .. }) {
                    return Err(CheckError::new(ErrorKind::NotAddressable, location.clone()));
                }
                let pointee = match expected {
                    Some(CheckedType::Pointer(inner)) => Some(inner.as_ref()),
                    _ => None,
                };
                let operand = self.check_expr(operand, pointee)?;
                let ty = CheckedType::pointer_to(operand.ty.clone());
                Ok(CheckedExpr::new(
                    CheckedExprKind::AddressOf(Box::new(operand)),
                    ty,
                    location.clone(),
                ))
            }

            UnaryOp::Dereference => {
                let pointer = expected.map(|ty| CheckedType::pointer_to(ty.clone()));
                let operand = self.check_expr(operand, pointer.as_ref())?;
                let ty = match operand.ty {
                    CheckedType::Pointer(ref inner) => (**inner).clone(),
                    ref other => {
                        return Err(CheckError::new(
                            ErrorKind::ExpectedPointer {
                                found: other.to_string(),
                            },
                            operand.location,
                        ))
                    }
                };
                Ok(CheckedExpr::new(
                    CheckedExprKind::Dereference(Box::new(operand)),
                    ty,
                    location.clone(),
                ))
            }
        }
    }

    fn check_cast(
        &mut self,
        value: &Expr,
        target: &TypeExpr,
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        let target = self.resolve_type(target)?;
        let value = self.check_expr(value, None)?;

        if value.ty == target {
            if self.options.warn_redundant_casts {
                self.warn(
                    format!("redundant cast: value is already `{}`", target),
                    location.clone(),
                );
            }
        } else if !cast_allowed(&value.ty, &target) {
            return Err(CheckError::new(
                ErrorKind::CannotCast {
                    from: value.ty.to_string(),
                    to: target.to_string(),
                },
                location.clone(),
            ));
        }

        Ok(CheckedExpr::new(
            CheckedExprKind::Cast(Box::new(value)),
            target,
            location.clone(),
        ))
    }

    /// Look `member` up on `object`, dereferencing one pointer level first
    pub(crate) fn member_access(
        &self,
        object: CheckedExpr,
        member: &str,
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        let (target, through_pointer) = object.ty.auto_deref();
        let Some(def) = target.member_struct() else {
            return Err(CheckError::new(
                ErrorKind::NotAStruct {
                    found: object.ty.to_string(),
                },
                location.clone(),
            ));
        };
        let Some(found) = def.member(member) else {
            return Err(CheckError::new(
                ErrorKind::NoSuchMember {
                    ty: target.to_string(),
                    member: member.to_string(),
                },
                location.clone(),
            ));
        };

        Ok(CheckedExpr::new(
            CheckedExprKind::Member {
                object: Box::new(object),
                member: member.to_string(),
                through_pointer,
            },
            found.ty,
            location.clone(),
        ))
    }

    fn check_index(
        &mut self,
        array: &Expr,
        index: &Expr,
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        let array = self.check_expr(array, None)?;
        // Arrays are pointers to their first item at this stage.
        let item = match array.ty {
            CheckedType::Array(ref item) | CheckedType::Pointer(ref item) => (**item).clone(),
            ref other => {
                return Err(CheckError::new(
                    ErrorKind::ExpectedArray {
                        found: other.to_string(),
                    },
                    array.location,
                ))
            }
        };

        let usize_ty = self.builtin(Builtin::Int(IntKind::USize));
        let index = self.check_expr(index, Some(&usize_ty))?;
        self.require_same(&usize_ty, &index)?;

        Ok(CheckedExpr::new(
            CheckedExprKind::Index {
                array: Box::new(array),
                index: Box::new(index),
            },
            item,
            location.clone(),
        ))
    }

    fn check_make(
        &mut self,
        target: &TypeExpr,
        arguments: &[Argument],
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        let ty = self.resolve_type(target)?;
        // A pointer target is boxed by the generator.
        let def: Rc<StructType> = match ty {
            CheckedType::Struct(ref def) => Rc::clone(def),
            CheckedType::Pointer(ref inner) => match **inner {
                CheckedType::Struct(ref def) => Rc::clone(def),
                _ => {
                    return Err(CheckError::new(
                        ErrorKind::NotAStruct {
                            found: ty.to_string(),
                        },
                        target.location().clone(),
                    ))
                }
            },
            _ => {
                return Err(CheckError::new(
                    ErrorKind::NotAStruct {
                        found: ty.to_string(),
                    },
                    target.location().clone(),
                ))
            }
        };

        let mut fields: Vec<(String, CheckedExpr)> = Vec::with_capacity(arguments.len());
        let mut initialized: Vec<(&str, &SourceLocation)> = Vec::new();

        for argument in arguments {
            let Some(label) = argument.label.as_deref() else {
                return Err(CheckError::new(
                    ErrorKind::UnnamedArgument,
                    argument.location.clone(),
                ));
            };
            let Some(member) = def.member(label) else {
                return Err(CheckError::new(
                    ErrorKind::NoSuchMember {
                        ty: def.name.clone(),
                        member: label.to_string(),
                    },
                    argument.location.clone(),
                ));
            };
            if let Some((_, first)) = initialized.iter().find(|(name, _)| *name == label) {
                return Err(CheckError::new(
                    ErrorKind::DuplicateInitializer {
                        member: label.to_string(),
                    },
                    argument.location.clone(),
                )
                .with_related((*first).clone()));
            }
            initialized.push((label, &argument.location));

            let value = self.check_expr(&argument.value, Some(&member.ty))?;
            self.require_type(&member.ty, &value)?;
            fields.push((label.to_string(), value));
        }

        Ok(CheckedExpr::new(
            CheckedExprKind::Make { fields },
            ty,
            location.clone(),
        ))
    }

    fn check_symbol(
        &mut self,
        name: &str,
        expected: Option<&CheckedType>,
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        // A function pointer slot picks one overload by signature.
        if let Some(CheckedType::FunctionPointer(wanted)) = expected {
            let matching = self
                .global_functions(name)
                .into_iter()
                .find(|candidate| candidate.signature == *wanted);
            if let Some(candidate) = matching {
                trace!("`{}` resolved by expected signature", name);
                return Ok(self.function_reference(candidate.id, location));
            }
        }

        if let Some(id) = self.table.find(self.scope, name) {
            let symbol = self.table.get(id);
            match symbol.kind() {
                // Functions are looked up as an overload set below.
                SymbolKind::Function => {}
                SymbolKind::Type => {
                    return Err(CheckError::new(
                        ErrorKind::NotAValue {
                            name: name.to_string(),
                        },
                        location.clone(),
                    ))
                }
                kind => {
                    let ty = symbol.ty.clone().ok_or_else(|| {
                        CheckError::internal(format!("`{}` has no type", name), location.clone())
                    })?;
                    return Ok(CheckedExpr::new(
                        CheckedExprKind::Symbol {
                            name: symbol.name.clone(),
                            mangled: symbol.mangled.clone(),
                            kind,
                        },
                        ty,
                        location.clone(),
                    ));
                }
            }
        }

        let candidates = self.global_functions(name);
        match candidates.as_slice() {
            [only] => Ok(self.function_reference(only.id, location)),
            [] => Err(CheckError::new(
                ErrorKind::UndefinedSymbol {
                    name: name.to_string(),
                },
                location.clone(),
            )),
            _ => Err(CheckError::new(
                ErrorKind::AmbiguousSymbol {
                    name: name.to_string(),
                },
                location.clone(),
            )),
        }
    }

    /// A function used as a value
    fn function_reference(&self, id: SymbolId, location: &SourceLocation) -> CheckedExpr {
        let symbol = self.table.get(id);
        let ty = match symbol.as_function() {
            Some(info) => CheckedType::FunctionPointer(info.signature.clone()),
            None => symbol.ty.clone().unwrap_or(CheckedType::Any),
        };
        CheckedExpr::new(
            CheckedExprKind::Symbol {
                name: symbol.name.clone(),
                mangled: symbol.mangled.clone(),
                kind: SymbolKind::Function,
            },
            ty,
            location.clone(),
        )
    }
}

fn cast_allowed(from: &CheckedType, to: &CheckedType) -> bool {
    match (from, to) {
        (CheckedType::Pointer(_) | CheckedType::Null, CheckedType::Pointer(_)) => true,
        (CheckedType::Array(_), CheckedType::Pointer(inner)) => matches!(**inner, CheckedType::Any),
        (CheckedType::Int(_), CheckedType::Int(_)) => true,
        (CheckedType::Pointer(_), CheckedType::Array(_)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::cast_allowed;
    use crate::types::{CheckedType, IntKind, StructType};

    #[test]
    fn test_cast_rules() {
        let u8_ptr = CheckedType::pointer_to(CheckedType::Int(IntKind::U8));
        let any_ptr = CheckedType::pointer_to(CheckedType::Any);
        let bytes = CheckedType::array_of(CheckedType::Int(IntKind::U8));
        let point = CheckedType::Struct(StructType::declared("Point"));

        assert!(cast_allowed(&u8_ptr, &any_ptr));
        assert!(cast_allowed(&bytes, &any_ptr));
        assert!(!cast_allowed(&bytes, &u8_ptr));
        assert!(cast_allowed(&u8_ptr, &bytes));
        assert!(cast_allowed(
            &CheckedType::Int(IntKind::I64),
            &CheckedType::Int(IntKind::U8)
        ));
        assert!(!cast_allowed(&point, &CheckedType::Int(IntKind::I32)));
        assert!(!cast_allowed(&CheckedType::Bool, &CheckedType::Int(IntKind::I32)));
    }
}
