//! Type resolution
//!
//! Turns type annotations into checked types.

use super::Checker;
use crate::error::{CheckError, CheckResult, ErrorKind};
use crate::syntax::{Param, ParamType, TypeExpr};
use crate::types::{Builtin, CheckedType, FunctionType, IntKind, Parameter};

impl Checker<'_> {
    pub(crate) fn resolve_type(&mut self, ty: &TypeExpr) -> CheckResult<CheckedType> {
        match ty {
            TypeExpr::Named { name, location } => {
                self.registry.find_type(name).cloned().ok_or_else(|| {
                    CheckError::new(ErrorKind::UndefinedType { name: name.clone() }, location.clone())
                })
            }

            TypeExpr::Pointer { inner, .. } => Ok(CheckedType::pointer_to(self.resolve_type(inner)?)),

            TypeExpr::Array { item, size, .. } => {
                let item = self.resolve_type(item)?;
                // Sized arrays are accepted but lower to the same checked type.
                if let Some(size) = size {
                    let usize_ty = self.builtin(Builtin::Int(IntKind::USize));
                    let size = self.check_expr(size, Some(&usize_ty))?;
                    if size.ty != usize_ty {
                        return Err(CheckError::mismatch(&usize_ty, &size.ty, size.location));
                    }
                }
                Ok(CheckedType::array_of(item))
            }

            TypeExpr::Function {
                params,
                return_type,
                ..
            } => {
                let params = params
                    .iter()
                    .enumerate()
                    .map(|(index, param)| self.resolve_param_type(index, param))
                    .collect::<CheckResult<Vec<_>>>()?;
                let return_type = self.resolve_return_type(return_type.as_deref())?;
                Ok(CheckedType::FunctionPointer(FunctionType::new(params, return_type)))
            }
        }
    }

    fn resolve_param_type(&mut self, index: usize, param: &ParamType) -> CheckResult<Parameter> {
        let name = param
            .name
            .clone()
            .or_else(|| param.label.clone())
            .unwrap_or_else(|| format!("_{}", index));
        Ok(Parameter {
            label: param.label.clone(),
            name,
            ty: self.resolve_type(&param.ty)?,
        })
    }

    /// Missing return annotations mean the function returns nothing
    pub(crate) fn resolve_return_type(&mut self, ty: Option<&TypeExpr>) -> CheckResult<CheckedType> {
        match ty {
            Some(ty) => self.resolve_type(ty),
            None => Ok(self.builtin(Builtin::Nothing)),
        }
    }

    /// Resolve a declared parameter; pseudo types cannot be passed as values
    pub(crate) fn resolve_param(&mut self, param: &Param) -> CheckResult<Parameter> {
        let ty = self.resolve_type(&param.ty)?;
        if ty.is_pseudo() {
            return Err(CheckError::new(
                ErrorKind::InvalidVariableType {
                    found: ty.to_string(),
                },
                param.location.clone(),
            ));
        }
        Ok(Parameter {
            label: param.label.clone(),
            name: param.name.clone(),
            ty,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::checker::{Checker, CheckerOptions};
    use crate::error::{CollectingWriter, ErrorKind};
    use crate::syntax::build::*;
    use crate::types::{CheckedType, IntKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_named_and_pointer() {
        let mut writer = CollectingWriter::new();
        let mut checker = Checker::new(&mut writer, CheckerOptions::default());

        let resolved = checker.resolve_type(&ptr(ptr(ty("u8")))).unwrap();
        assert_eq!(
            resolved,
            CheckedType::pointer_to(CheckedType::pointer_to(CheckedType::Int(IntKind::U8)))
        );
    }

    #[test]
    fn test_undefined_type() {
        let mut writer = CollectingWriter::new();
        let mut checker = Checker::new(&mut writer, CheckerOptions::default());

        let err = checker.resolve_type(&array(ty("Missing"))).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UndefinedType {
                name: "Missing".to_string()
            }
        );
    }

    #[test]
    fn test_sized_array_size_must_be_usize() {
        let mut writer = CollectingWriter::new();
        let mut checker = Checker::new(&mut writer, CheckerOptions::default());

        let sized = sized_array(ty("i32"), int(4));
        assert_eq!(
            checker.resolve_type(&sized).unwrap(),
            CheckedType::array_of(CheckedType::Int(IntKind::I32))
        );

        let bad = sized_array(ty("i32"), boolean(true));
        assert!(matches!(
            checker.resolve_type(&bad).unwrap_err().kind,
            ErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_function_type_becomes_function_pointer() {
        let mut writer = CollectingWriter::new();
        let mut checker = Checker::new(&mut writer, CheckerOptions::default());

        let resolved = checker
            .resolve_type(&fn_type(vec![(Some("at"), ty("usize"))], None))
            .unwrap();
        match resolved {
            CheckedType::FunctionPointer(signature) => {
                assert_eq!(signature.params.len(), 1);
                assert_eq!(signature.params[0].label.as_deref(), Some("at"));
                assert_eq!(*signature.return_type, CheckedType::Nothing);
            }
            other => panic!("expected a function pointer, got {:?}", other),
        }
    }
}
