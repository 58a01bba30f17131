//! Declaration driver
//!
//! A translation unit is checked in three passes so that types and
//! functions can be used before the point they are declared:
//!
//! 1. types: structs, external types, traits and enums
//! 2. signatures: every function gets its symbol; global variables are
//!    checked in file order
//! 3. bodies: every function body is checked against its signature

use std::rc::Rc;

use log::debug;

use super::{mangle, Checker};
use crate::error::{CheckError, CheckResult, ErrorKind, SourceLocation};
use crate::semantic::{CheckedStmt, FunctionInfo, Symbol, SymbolId};
use crate::syntax::{EnumDecl, FunctionDecl, Stmt, StructDecl, TraitDecl};
use crate::types::{
    Builtin, CheckedType, FunctionType, IntKind, Member, Parameter, StructType, TraitType,
};

impl Checker<'_> {
    pub(crate) fn check_declarations(&mut self, statements: &[Stmt]) -> CheckResult<Vec<CheckedStmt>> {
        debug!("type pass over {} statements", statements.len());
        self.declare_types(statements)?;

        debug!("signature pass");
        let (globals, functions) = self.declare_signatures(statements)?;

        debug!("body pass over {} functions", functions.len());
        for (id, decl) in functions {
            self.check_function_body(id, decl)?;
        }

        Ok(globals)
    }

    fn declare_types(&mut self, statements: &[Stmt]) -> CheckResult<()> {
        for stmt in statements {
            match stmt {
                Stmt::Struct(decl) => self.declare_struct(decl)?,
                Stmt::ExternalType { name, location } => {
                    self.register_type(name, CheckedType::External(name.clone()), location)?
                }
                Stmt::Trait(decl) => self.declare_trait(decl)?,
                Stmt::Enum(decl) => self.declare_enum(decl)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Add a user type to the registry and the global scope
    fn register_type(
        &mut self,
        name: &str,
        ty: CheckedType,
        location: &SourceLocation,
    ) -> CheckResult<()> {
        if let Some(existing) = self.registry.find_entry(name) {
            return Err(CheckError::new(
                ErrorKind::TypeRedeclared {
                    name: name.to_string(),
                },
                location.clone(),
            )
            .with_related(existing.location.clone()));
        }

        let global = self.table.global();
        self.table
            .append(global, Symbol::type_symbol(name, ty.clone(), location.clone()))?;
        self.registry.register(name, ty, location.clone());
        Ok(())
    }

    fn declare_struct(&mut self, decl: &StructDecl) -> CheckResult<()> {
        let def = match self.registry.find_entry(&decl.name) {
            // Only a forward declaration may be completed.
            Some(existing) => match existing.ty {
                CheckedType::Struct(ref def) if !def.is_defined() => Rc::clone(def),
                _ => {
                    return Err(CheckError::new(
                        ErrorKind::TypeRedeclared {
                            name: decl.name.clone(),
                        },
                        decl.location.clone(),
                    )
                    .with_related(existing.location.clone()))
                }
            },
            None => {
                let def = StructType::declared(&decl.name);
                self.register_type(&decl.name, CheckedType::Struct(Rc::clone(&def)), &decl.location)?;
                def
            }
        };

        let Some(ref members) = decl.members else {
            debug!("forward declared struct `{}`", decl.name);
            return Ok(());
        };

        let mut resolved = Vec::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            if let Some(first) = members[..index].iter().find(|m| m.name == member.name) {
                return Err(CheckError::new(
                    ErrorKind::DuplicateMember {
                        name: member.name.clone(),
                    },
                    member.location.clone(),
                )
                .with_related(first.location.clone()));
            }
            resolved.push(Member {
                name: member.name.clone(),
                ty: self.resolve_type(&member.ty)?,
            });
        }

        debug!("struct `{}` has {} members", decl.name, resolved.len());
        def.define(resolved);
        Ok(())
    }

    /// A trait is a struct of a type-erased `self` plus one function
    /// pointer per method
    fn declare_trait(&mut self, decl: &TraitDecl) -> CheckResult<()> {
        let erased = CheckedType::pointer_to(self.builtin(Builtin::Any));
        let mut members = vec![Member {
            name: "self".to_string(),
            ty: erased.clone(),
        }];
        let mut methods = Vec::with_capacity(decl.methods.len());

        for method in &decl.methods {
            if members.iter().any(|member| member.name == method.name) {
                return Err(CheckError::new(
                    ErrorKind::DuplicateMember {
                        name: method.name.clone(),
                    },
                    method.location.clone(),
                ));
            }

            let mut params = vec![Parameter {
                label: None,
                name: "self".to_string(),
                ty: erased.clone(),
            }];
            for param in &method.params {
                params.push(self.resolve_param(param)?);
            }
            let return_type = self.resolve_return_type(method.return_type.as_ref())?;
            let signature = FunctionType::new(params, return_type);

            members.push(Member {
                name: method.name.clone(),
                ty: CheckedType::FunctionPointer(signature.clone()),
            });
            methods.push((method.name.clone(), signature));
        }

        let def = TraitType {
            name: decl.name.clone(),
            backing: StructType::with_members(&decl.name, members),
            methods,
        };
        self.register_type(&decl.name, CheckedType::Trait(Rc::new(def)), &decl.location)
    }

    /// An enum names its backing integer type; members count up from the
    /// previous value
    fn declare_enum(&mut self, decl: &EnumDecl) -> CheckResult<()> {
        let backing = match decl.backing {
            Some(ref backing) => {
                let ty = self.resolve_type(backing)?;
                if !ty.is_numeric() {
                    return Err(CheckError::new(
                        ErrorKind::ExpectedNumeric {
                            found: ty.to_string(),
                        },
                        backing.location().clone(),
                    ));
                }
                ty
            }
            None => self.builtin(Builtin::Int(IntKind::I32)),
        };
        self.register_type(&decl.name, backing.clone(), &decl.location)?;

        let global = self.table.global();
        // `None` once the previous member took the largest value.
        let mut next = Some(0u64);
        for member in &decl.members {
            let Some(value) = member.value.or(next) else {
                return Err(CheckError::new(
                    ErrorKind::EnumValueOverflow {
                        member: member.name.clone(),
                    },
                    member.location.clone(),
                ));
            };
            next = value.checked_add(1);
            self.table.append(
                global,
                Symbol::enum_member(&member.name, backing.clone(), value, member.location.clone()),
            )?;
        }
        Ok(())
    }

    #[allow(clippy::type_complexity)]
    fn declare_signatures<'s>(
        &mut self,
        statements: &'s [Stmt],
    ) -> CheckResult<(Vec<CheckedStmt>, Vec<(SymbolId, &'s FunctionDecl)>)> {
        let mut globals = Vec::new();
        let mut functions = Vec::new();

        for stmt in statements {
            match stmt {
                Stmt::Function(decl) => {
                    let owner = match decl.receiver {
                        Some(ref receiver) => Some(self.resolve_type(receiver)?),
                        None => None,
                    };
                    functions.push((self.declare_function(decl, owner)?, decl));
                }
                Stmt::Struct(decl) => {
                    if decl.methods.is_empty() {
                        continue;
                    }
                    let owner = self.registry.find_type(&decl.name).cloned().ok_or_else(|| {
                        CheckError::internal(
                            format!("struct `{}` was not registered", decl.name),
                            decl.location.clone(),
                        )
                    })?;
                    for method in &decl.methods {
                        functions.push((self.declare_function(method, Some(owner.clone()))?, method));
                    }
                }
                Stmt::Variable(decl) => globals.push(self.check_variable(decl)?),
                Stmt::ExternalType { .. } | Stmt::Trait(_) | Stmt::Enum(_) => {}
                other => {
                    return Err(CheckError::new(
                        ErrorKind::UnsupportedStatement,
                        other.location().clone(),
                    ))
                }
            }
        }

        Ok((globals, functions))
    }

    /// Register a function symbol. Methods take a pointer to their owner as
    /// an implicit first parameter named `self`.
    fn declare_function(
        &mut self,
        decl: &FunctionDecl,
        owner: Option<CheckedType>,
    ) -> CheckResult<SymbolId> {
        let receiver = owner.map(|ty| match ty {
            CheckedType::Pointer(_) => ty,
            other => CheckedType::pointer_to(other),
        });

        let mut params = Vec::with_capacity(decl.params.len() + 1);
        if let Some(ref receiver) = receiver {
            params.push(Parameter {
                label: None,
                name: "self".to_string(),
                ty: receiver.clone(),
            });
        }
        for param in &decl.params {
            params.push(self.resolve_param(param)?);
        }
        let return_type = self.resolve_return_type(decl.return_type.as_ref())?;

        let mangled = mangle::function_name(
            receiver.as_ref(),
            &decl.name,
            decl.params.iter().map(|param| param.label.as_deref()),
        );
        debug!("declare `{}` as `{}`", decl.name, mangled);

        let info = FunctionInfo {
            signature: FunctionType::new(params, return_type),
            receiver,
            body: None,
            is_extern: decl.body.is_none(),
        };
        let global = self.table.global();
        self.table.append(
            global,
            Symbol::function(&decl.name, mangled, info, decl.location.clone()),
        )
    }

    fn check_function_body(&mut self, id: SymbolId, decl: &FunctionDecl) -> CheckResult<()> {
        let Some(ref body) = decl.body else {
            return Ok(());
        };
        let (signature, has_receiver) = match self.table.get(id).as_function() {
            Some(info) => (info.signature.clone(), info.receiver.is_some()),
            None => {
                return Err(CheckError::internal(
                    format!("`{}` is not a function", decl.name),
                    decl.location.clone(),
                ))
            }
        };
        debug!("checking body of `{}`", self.table.get(id).mangled);

        let global = self.table.global();
        let outer = std::mem::replace(&mut self.scope, global);
        self.push_scope();
        self.return_type = Some((*signature.return_type).clone());

        let checked = self.check_function_scope(decl, &signature, has_receiver, body);

        self.return_type = None;
        self.pop_scope();
        self.scope = outer;

        let checked = checked?;
        if let Some(info) = self.table.get_mut(id).as_function_mut() {
            info.body = Some(checked);
        }
        Ok(())
    }

    fn check_function_scope(
        &mut self,
        decl: &FunctionDecl,
        signature: &FunctionType,
        has_receiver: bool,
        body: &[Stmt],
    ) -> CheckResult<Vec<CheckedStmt>> {
        let offset = usize::from(has_receiver);
        for (index, param) in signature.params.iter().enumerate() {
            // The receiver has no declaration of its own.
            let location = index
                .checked_sub(offset)
                .and_then(|index| decl.params.get(index))
                .map_or_else(|| decl.location.clone(), |param| param.location.clone());
            self.table.append(
                self.scope,
                Symbol::parameter(&param.name, param.ty.clone(), location),
            )?;
        }

        body.iter().map(|stmt| self.check_stmt(stmt)).collect()
    }
}
