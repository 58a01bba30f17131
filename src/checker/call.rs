//! Call resolution
//!
//! Overloads are told apart by arity, argument labels and, for method
//! calls, the receiver type.

use log::debug;

use super::{Candidate, Checker};
use crate::error::{CheckError, CheckResult, ErrorKind, SourceLocation};
use crate::semantic::{Callee, CheckedExpr, CheckedExprKind, SymbolId, SymbolKind};
use crate::syntax::{Argument, Expr};
use crate::types::{CheckedType, FunctionType, Parameter};

impl Checker<'_> {
    pub(crate) fn check_call(
        &mut self,
        callee: &Expr,
        arguments: &[Argument],
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        match callee {
            Expr::Symbol {
                name,
                location: callee_location,
            } => {
                if let Some(id) = self.table.find(self.scope, name) {
                    let symbol = self.table.get(id);
                    let is_pointer_value = symbol.kind() != SymbolKind::Function
                        && matches!(symbol.ty, Some(CheckedType::FunctionPointer(_)));
                    if is_pointer_value {
                        let value = self.check_expr(callee, None)?;
                        return self.call_value(value, arguments, location);
                    }
                }

                match self.find_overload(name, None, arguments) {
                    Some(id) => self.call_function(id, None, arguments, location),
                    None => Err(CheckError::new(
                        ErrorKind::UndefinedFunction { name: name.clone() },
                        callee_location.clone(),
                    )),
                }
            }

            Expr::Member {
                object,
                member,
                location: member_location,
            } => {
                let object = self.check_expr(object, None)?;

                // A function pointer member is called as is, without a receiver.
                let (target, _) = object.ty.auto_deref();
                let field = target.member_struct().and_then(|def| def.member(member));
                if let Some(field) = field {
                    if matches!(field.ty, CheckedType::FunctionPointer(_)) {
                        let value = self.member_access(object, member, member_location)?;
                        return self.call_value(value, arguments, location);
                    }
                }

                let receiver = match object.ty {
                    CheckedType::Struct(_) | CheckedType::Trait(_) => {
                        let ty = CheckedType::pointer_to(object.ty.clone());
                        let location = object.location.clone();
                        CheckedExpr::new(CheckedExprKind::AddressOf(Box::new(object)), ty, location)
                    }
                    _ => object,
                };

                match self.find_overload(member, Some(&receiver.ty), arguments) {
                    Some(id) => self.call_function(id, Some(receiver), arguments, location),
                    None => Err(CheckError::new(
                        ErrorKind::UndefinedFunction {
                            name: member.clone(),
                        },
                        member_location.clone(),
                    )),
                }
            }

            _ => {
                let value = self.check_expr(callee, None)?;
                self.call_value(value, arguments, location)
            }
        }
    }

    /// Pick the global function a call refers to.
    ///
    /// The first candidate whose arity and labels both agree wins. Failing
    /// that, the first one whose labels agree as far as both lists go is
    /// taken, so that binding can report the argument count.
    fn find_overload(
        &self,
        name: &str,
        receiver: Option<&CheckedType>,
        arguments: &[Argument],
    ) -> Option<SymbolId> {
        let skip = usize::from(receiver.is_some());
        let candidates: Vec<Candidate> = self
            .global_functions(name)
            .into_iter()
            .filter(|candidate| match receiver {
                Some(receiver) => candidate.receiver.as_ref() == Some(receiver),
                None => true,
            })
            .collect();

        let exact = candidates.iter().find(|candidate| {
            let params = explicit_params(candidate, skip);
            params.len() == arguments.len() && labels_agree(params, arguments)
        });
        let chosen = exact.or_else(|| {
            candidates
                .iter()
                .find(|candidate| labels_agree(explicit_params(candidate, skip), arguments))
        })?;

        debug!(
            "call to `{}` resolved to `{}`{}",
            name,
            self.table.get(chosen.id).mangled,
            if exact.is_some() { "" } else { " (arity mismatch)" }
        );
        Some(chosen.id)
    }

    fn call_function(
        &mut self,
        id: SymbolId,
        receiver: Option<CheckedExpr>,
        arguments: &[Argument],
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        let symbol = self.table.get(id);
        let name = symbol.name.clone();
        let mangled = symbol.mangled.clone();
        let signature = match symbol.as_function() {
            Some(info) => info.signature.clone(),
            None => {
                return Err(CheckError::internal(
                    format!("`{}` is not a function", name),
                    location.clone(),
                ))
            }
        };

        let arguments = self.bind_arguments(&signature, receiver, arguments, location)?;
        Ok(CheckedExpr::new(
            CheckedExprKind::Call {
                callee: Callee::Function { name, mangled },
                arguments,
            },
            *signature.return_type,
            location.clone(),
        ))
    }

    /// Call through a function pointer value
    fn call_value(
        &mut self,
        value: CheckedExpr,
        arguments: &[Argument],
        location: &SourceLocation,
    ) -> CheckResult<CheckedExpr> {
        let signature = match value.ty {
            CheckedType::FunctionPointer(ref signature) => signature.clone(),
            ref other => {
                return Err(CheckError::new(
                    ErrorKind::NotCallable {
                        found: other.to_string(),
                    },
                    value.location,
                ))
            }
        };

        for (param, argument) in signature.params.iter().zip(arguments) {
            if param.label != argument.label {
                return Err(CheckError::new(
                    ErrorKind::LabelMismatch {
                        expected: label_or_none(&param.label),
                        found: label_or_none(&argument.label),
                    },
                    argument.location.clone(),
                ));
            }
        }

        let arguments = self.bind_arguments(&signature, None, arguments, location)?;
        Ok(CheckedExpr::new(
            CheckedExprKind::Call {
                callee: Callee::Value(Box::new(value)),
                arguments,
            },
            *signature.return_type,
            location.clone(),
        ))
    }

    fn bind_arguments(
        &mut self,
        signature: &FunctionType,
        receiver: Option<CheckedExpr>,
        arguments: &[Argument],
        location: &SourceLocation,
    ) -> CheckResult<Vec<CheckedExpr>> {
        let mut bound = Vec::with_capacity(signature.params.len());
        let mut params = signature.params.iter();

        if let Some(receiver) = receiver {
            match params.next() {
                Some(first) if first.ty == receiver.ty => bound.push(receiver),
                _ => {
                    return Err(CheckError::internal(
                        format!("receiver of type `{}` does not match its method", receiver.ty),
                        receiver.location,
                    ))
                }
            }
        }

        let params = params.as_slice();
        if arguments.len() < params.len() {
            return Err(CheckError::new(
                ErrorKind::TooFewArguments {
                    expected: params.len(),
                    found: arguments.len(),
                },
                location.clone(),
            ));
        }
        if let Some(extra) = arguments.get(params.len()) {
            return Err(CheckError::new(
                ErrorKind::TooManyArguments {
                    expected: params.len(),
                    found: arguments.len(),
                },
                extra.location.clone(),
            ));
        }

        for (param, argument) in params.iter().zip(arguments) {
            let value = self.check_expr(&argument.value, Some(&param.ty))?;
            self.require_type(&param.ty, &value)?;
            bound.push(value);
        }
        Ok(bound)
    }
}

/// Parameters written at the call site; a method's receiver is not
fn explicit_params(candidate: &Candidate, skip: usize) -> &[Parameter] {
    candidate.signature.params.get(skip..).unwrap_or(&[])
}

/// Unlabeled parameters take positional arguments, labeled ones only
/// arguments carrying the same label
fn labels_agree(params: &[Parameter], arguments: &[Argument]) -> bool {
    params
        .iter()
        .zip(arguments)
        .all(|(param, argument)| param.label == argument.label)
}

fn label_or_none(label: &Option<String>) -> String {
    label.clone().unwrap_or_else(|| "none".to_string())
}
