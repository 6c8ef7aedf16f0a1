use crate::{
    ast::{
        ast::{
            ActualParam, ActualParamKind, Command, CommandKind, Declaration, DeclarationKind,
            FormalParam, FormalParamKind, Identifier, Program, Vname, VnameKind,
        },
        expressions::{Expression, ExpressionKind},
        types::{Type, TypeDenoter, TypeDenoterKind},
    },
    errors::{errors::DiagnosticKind, reporter::Reporter},
    Position,
};

use super::{
    scope::{sigs_match, DeclInfo, ParamSig, ScopeStack},
    std_env::{self, BinaryOpSig},
};

/// The checking pass. Walks the tree depth-first with its own scope-frame
/// stack, reports faults to the reporter, and annotates nodes in place.
pub struct Checker<'a> {
    scope: ScopeStack<DeclInfo>,
    reporter: &'a mut Reporter,
}

/// Checks a parsed program. Only call this when scanning and parsing
/// finished without errors; the tree is annotated in place.
pub fn check(program: &mut Program, reporter: &mut Reporter) {
    let mut checker = Checker {
        scope: ScopeStack::new(),
        reporter,
    };
    std_env::populate(&mut checker.scope);
    checker.check_command(&mut program.command);
}

impl Checker<'_> {
    fn report(&mut self, kind: DiagnosticKind, position: Position) {
        self.reporter.report(kind, position);
    }

    fn check_command(&mut self, command: &mut Command) {
        match &mut command.kind {
            CommandKind::Assign { target, value } => {
                let target_ty = self.check_vname(target, true);
                let value_ty = self.check_expression(value);
                if !value_ty.equals(&target_ty) {
                    let position = value.span.start.clone();
                    self.report(
                        DiagnosticKind::TypeMismatch {
                            expected: target_ty.to_string(),
                            found: value_ty.to_string(),
                        },
                        position,
                    );
                }
            }
            CommandKind::Call { name, args } => {
                let name = name.clone();
                self.check_proc_call(&name, args);
            }
            CommandKind::Sequence { commands } => {
                for command in commands {
                    self.check_command(command);
                }
            }
            CommandKind::If {
                condition,
                then_command,
                else_command,
            } => {
                self.check_condition(condition);
                self.check_command(then_command);
                self.check_command(else_command);
            }
            CommandKind::While { condition, body } => {
                self.check_condition(condition);
                self.check_command(body);
            }
            CommandKind::Let { declarations, body } => {
                self.scope.open();
                self.check_declarations(declarations);
                self.check_command(body);
                self.scope.close();
            }
            CommandKind::Skip => {}
        }
    }

    fn check_condition(&mut self, condition: &mut Expression) {
        let ty = self.check_expression(condition);
        if !ty.equals(&Type::Bool) {
            let position = condition.span.start.clone();
            self.report(
                DiagnosticKind::ConditionNotBoolean {
                    found: ty.to_string(),
                },
                position,
            );
        }
    }

    /// Checks a declaration sequence in two phases: first every
    /// declaration's signature is elaborated and entered in order, then
    /// routine bodies are checked. Because all headers are in scope
    /// before any body, procedures and functions in one sequence may
    /// call themselves and each other freely.
    fn check_declarations(&mut self, declarations: &mut [Declaration]) {
        for declaration in declarations.iter_mut() {
            match &mut declaration.kind {
                DeclarationKind::Const {
                    name,
                    denoter,
                    value,
                } => {
                    let value_ty = self.check_expression(value);
                    let declared_ty = self.resolve_denoter(denoter);
                    if !value_ty.equals(&declared_ty) {
                        let position = value.span.start.clone();
                        self.report(
                            DiagnosticKind::TypeMismatch {
                                expected: declared_ty.to_string(),
                                found: value_ty.to_string(),
                            },
                            position,
                        );
                    }
                    let name = name.clone();
                    self.declare(&name, DeclInfo::Constant { ty: declared_ty });
                }
                DeclarationKind::Var { name, denoter } => {
                    let ty = self.resolve_denoter(denoter);
                    let name = name.clone();
                    self.declare(&name, DeclInfo::Variable { ty });
                }
                DeclarationKind::TypeDecl { name, denoter } => {
                    let ty = self.resolve_denoter(denoter);
                    let name = name.clone();
                    self.declare(&name, DeclInfo::TypeName { ty });
                }
                DeclarationKind::Proc { name, params, .. } => {
                    let sigs = self.resolve_formal_params(params);
                    let name = name.clone();
                    self.declare(&name, DeclInfo::Procedure { params: sigs });
                }
                DeclarationKind::Func {
                    name,
                    params,
                    result,
                    ..
                } => {
                    let sigs = self.resolve_formal_params(params);
                    let result_ty = self.resolve_denoter(result);
                    let name = name.clone();
                    self.declare(
                        &name,
                        DeclInfo::Function {
                            params: sigs,
                            result: result_ty,
                        },
                    );
                }
            }
        }

        for declaration in declarations.iter_mut() {
            match &mut declaration.kind {
                DeclarationKind::Proc { params, body, .. } => {
                    self.scope.open();
                    self.declare_formal_params(params);
                    self.check_command(body);
                    self.scope.close();
                }
                DeclarationKind::Func {
                    params,
                    result,
                    body,
                    ..
                } => {
                    self.scope.open();
                    self.declare_formal_params(params);
                    let body_ty = self.check_expression(body);
                    let result_ty = result.checked_type().clone();
                    if !body_ty.equals(&result_ty) {
                        let position = body.span.start.clone();
                        self.report(
                            DiagnosticKind::TypeMismatch {
                                expected: result_ty.to_string(),
                                found: body_ty.to_string(),
                            },
                            position,
                        );
                    }
                    self.scope.close();
                }
                _ => {}
            }
        }
    }

    fn declare(&mut self, name: &Identifier, info: DeclInfo) {
        if !self.scope.declare(&name.spelling, info) {
            self.report(
                DiagnosticKind::IdentifierAlreadyDeclared {
                    identifier: name.spelling.clone(),
                },
                name.span.start.clone(),
            );
        }
    }

    fn resolve_formal_params(&mut self, params: &mut [FormalParam]) -> Vec<ParamSig> {
        let mut sigs = vec![];
        for param in params.iter_mut() {
            let sig = match &mut param.kind {
                FormalParamKind::Value { denoter, .. } => {
                    ParamSig::Value(self.resolve_denoter(denoter))
                }
                FormalParamKind::VarParam { denoter, .. } => {
                    ParamSig::Var(self.resolve_denoter(denoter))
                }
                FormalParamKind::ProcParam { params, .. } => {
                    ParamSig::Proc(self.resolve_formal_params(params))
                }
                FormalParamKind::FuncParam { params, result, .. } => ParamSig::Func(
                    self.resolve_formal_params(params),
                    self.resolve_denoter(result),
                ),
            };
            sigs.push(sig);
        }
        sigs
    }

    /// Enters a routine's formal parameters into the freshly opened body
    /// frame. Value parameters act as constants inside the body.
    fn declare_formal_params(&mut self, params: &[FormalParam]) {
        for param in params {
            match &param.kind {
                FormalParamKind::Value { name, denoter } => {
                    let name = name.clone();
                    self.declare(
                        &name,
                        DeclInfo::Constant {
                            ty: denoter.checked_type().clone(),
                        },
                    );
                }
                FormalParamKind::VarParam { name, denoter } => {
                    let name = name.clone();
                    self.declare(
                        &name,
                        DeclInfo::Variable {
                            ty: denoter.checked_type().clone(),
                        },
                    );
                }
                FormalParamKind::ProcParam { name, params } => {
                    let name = name.clone();
                    self.declare(
                        &name,
                        DeclInfo::Procedure {
                            params: signature_of(params),
                        },
                    );
                }
                FormalParamKind::FuncParam {
                    name,
                    params,
                    result,
                } => {
                    let name = name.clone();
                    self.declare(
                        &name,
                        DeclInfo::Function {
                            params: signature_of(params),
                            result: result.checked_type().clone(),
                        },
                    );
                }
            }
        }
    }

    fn resolve_denoter(&mut self, denoter: &mut TypeDenoter) -> Type {
        let ty = match &mut denoter.kind {
            TypeDenoterKind::Name { name } => match self.scope.lookup(&name.spelling).cloned() {
                Some(DeclInfo::TypeName { ty }) => ty,
                Some(_) => {
                    let position = name.span.start.clone();
                    let identifier = name.spelling.clone();
                    self.report(DiagnosticKind::NotAType { identifier }, position);
                    Type::Error
                }
                None => {
                    let position = name.span.start.clone();
                    let identifier = name.spelling.clone();
                    self.report(DiagnosticKind::IdentifierNotDeclared { identifier }, position);
                    Type::Error
                }
            },
            TypeDenoterKind::Array { size, elem } => {
                let elem_ty = self.resolve_denoter(elem);
                Type::Array {
                    size: *size,
                    elem: Box::new(elem_ty),
                }
            }
            TypeDenoterKind::Record { fields } => {
                let mut seen: Vec<String> = vec![];
                let mut field_types = vec![];
                for (field, field_denoter) in fields.iter_mut() {
                    if seen.contains(&field.spelling) {
                        let position = field.span.start.clone();
                        let identifier = field.spelling.clone();
                        self.report(
                            DiagnosticKind::IdentifierAlreadyDeclared { identifier },
                            position,
                        );
                    } else {
                        seen.push(field.spelling.clone());
                    }
                    let field_ty = self.resolve_denoter(field_denoter);
                    field_types.push((field.spelling.clone(), field_ty));
                }
                Type::Record {
                    fields: field_types,
                }
            }
        };

        denoter.ty = Some(ty.clone());
        ty
    }

    fn check_proc_call(&mut self, name: &Identifier, args: &mut [ActualParam]) {
        match self.scope.lookup(&name.spelling).cloned() {
            None => {
                self.report(
                    DiagnosticKind::IdentifierNotDeclared {
                        identifier: name.spelling.clone(),
                    },
                    name.span.start.clone(),
                );
            }
            Some(DeclInfo::Procedure { params }) => {
                self.check_actuals(args, &params, name.span.start.clone());
            }
            Some(_) => {
                self.report(
                    DiagnosticKind::NotARoutine {
                        identifier: name.spelling.clone(),
                    },
                    name.span.start.clone(),
                );
            }
        }
    }

    fn check_func_call(&mut self, name: &Identifier, args: &mut [ActualParam]) -> Type {
        match self.scope.lookup(&name.spelling).cloned() {
            None => {
                self.report(
                    DiagnosticKind::IdentifierNotDeclared {
                        identifier: name.spelling.clone(),
                    },
                    name.span.start.clone(),
                );
                Type::Error
            }
            Some(DeclInfo::Function { params, result }) => {
                self.check_actuals(args, &params, name.span.start.clone());
                result
            }
            Some(_) => {
                self.report(
                    DiagnosticKind::NotARoutine {
                        identifier: name.spelling.clone(),
                    },
                    name.span.start.clone(),
                );
                Type::Error
            }
        }
    }

    fn check_actuals(&mut self, args: &mut [ActualParam], params: &[ParamSig], call_pos: Position) {
        if args.len() != params.len() {
            self.report(
                DiagnosticKind::ArityMismatch {
                    expected: params.len(),
                    found: args.len(),
                },
                call_pos,
            );
        }

        for (number, (arg, param)) in args.iter_mut().zip(params.iter()).enumerate() {
            let arg_pos = arg.span.start.clone();
            match (&mut arg.kind, param) {
                (ActualParamKind::Value { expr }, ParamSig::Value(expected)) => {
                    let ty = self.check_expression(expr);
                    if !ty.equals(expected) {
                        let position = expr.span.start.clone();
                        self.report(
                            DiagnosticKind::TypeMismatch {
                                expected: expected.to_string(),
                                found: ty.to_string(),
                            },
                            position,
                        );
                    }
                }
                (ActualParamKind::VarParam { vname }, ParamSig::Var(expected)) => {
                    let ty = self.check_vname(vname, true);
                    if !ty.equals(expected) {
                        let position = vname.span.start.clone();
                        self.report(
                            DiagnosticKind::TypeMismatch {
                                expected: expected.to_string(),
                                found: ty.to_string(),
                            },
                            position,
                        );
                    }
                }
                (ActualParamKind::ProcParam { name }, ParamSig::Proc(expected)) => {
                    match self.scope.lookup(&name.spelling).cloned() {
                        None => {
                            let identifier = name.spelling.clone();
                            let position = name.span.start.clone();
                            self.report(
                                DiagnosticKind::IdentifierNotDeclared { identifier },
                                position,
                            );
                        }
                        Some(DeclInfo::Procedure { params }) => {
                            if !sigs_match(&params, expected) {
                                self.report(
                                    DiagnosticKind::ParameterMismatch { number: number + 1 },
                                    arg_pos,
                                );
                            }
                        }
                        Some(_) => {
                            let identifier = name.spelling.clone();
                            let position = name.span.start.clone();
                            self.report(DiagnosticKind::NotARoutine { identifier }, position);
                        }
                    }
                }
                (
                    ActualParamKind::FuncParam { name },
                    ParamSig::Func(expected, expected_result),
                ) => match self.scope.lookup(&name.spelling).cloned() {
                    None => {
                        let identifier = name.spelling.clone();
                        let position = name.span.start.clone();
                        self.report(DiagnosticKind::IdentifierNotDeclared { identifier }, position);
                    }
                    Some(DeclInfo::Function { params, result }) => {
                        if !sigs_match(&params, expected) || !result.equals(expected_result) {
                            self.report(
                                DiagnosticKind::ParameterMismatch { number: number + 1 },
                                arg_pos,
                            );
                        }
                    }
                    Some(_) => {
                        let identifier = name.spelling.clone();
                        let position = name.span.start.clone();
                        self.report(DiagnosticKind::NotARoutine { identifier }, position);
                    }
                },
                _ => {
                    self.report(
                        DiagnosticKind::ParameterMismatch { number: number + 1 },
                        arg_pos,
                    );
                }
            }
        }
    }

    fn check_expression(&mut self, expr: &mut Expression) -> Type {
        let ty = match &mut expr.kind {
            ExpressionKind::IntLit { .. } => Type::Int,
            ExpressionKind::CharLit { .. } => Type::Char,
            ExpressionKind::Vname { vname } => self.check_vname(vname, false),
            ExpressionKind::Call { name, args } => {
                let name = name.clone();
                self.check_func_call(&name, args)
            }
            ExpressionKind::Unary { operator, operand } => {
                let operand_ty = self.check_expression(operand);
                match std_env::UNARY_OPS.get(&operator.kind) {
                    Some((expected, result)) => {
                        if !operand_ty.equals(expected) {
                            let position = operator.span.start.clone();
                            let spelling = operator.value.clone();
                            self.report(
                                DiagnosticKind::InvalidOperator {
                                    operator: spelling,
                                    operand: operand_ty.to_string(),
                                },
                                position,
                            );
                        }
                        result.clone()
                    }
                    None => Type::Error,
                }
            }
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => {
                let left_ty = self.check_expression(left);
                let right_ty = self.check_expression(right);
                match std_env::BINARY_OPS.get(&operator.kind) {
                    Some(BinaryOpSig::Fixed { operand, result }) => {
                        if !left_ty.equals(operand) {
                            let position = left.span.start.clone();
                            let spelling = operator.value.clone();
                            self.report(
                                DiagnosticKind::InvalidOperator {
                                    operator: spelling,
                                    operand: left_ty.to_string(),
                                },
                                position,
                            );
                        }
                        if !right_ty.equals(operand) {
                            let position = right.span.start.clone();
                            let spelling = operator.value.clone();
                            self.report(
                                DiagnosticKind::InvalidOperator {
                                    operator: spelling,
                                    operand: right_ty.to_string(),
                                },
                                position,
                            );
                        }
                        result.clone()
                    }
                    Some(BinaryOpSig::Equality) => {
                        if !left_ty.equals(&right_ty) {
                            let position = right.span.start.clone();
                            self.report(
                                DiagnosticKind::TypeMismatch {
                                    expected: left_ty.to_string(),
                                    found: right_ty.to_string(),
                                },
                                position,
                            );
                        }
                        Type::Bool
                    }
                    None => Type::Error,
                }
            }
            ExpressionKind::Let { declarations, body } => {
                self.scope.open();
                self.check_declarations(declarations);
                let ty = self.check_expression(body);
                self.scope.close();
                ty
            }
            ExpressionKind::If {
                condition,
                then_expr,
                else_expr,
            } => {
                self.check_condition(condition);
                let then_ty = self.check_expression(then_expr);
                let else_ty = self.check_expression(else_expr);
                if !then_ty.equals(&else_ty) {
                    let position = else_expr.span.start.clone();
                    self.report(
                        DiagnosticKind::TypeMismatch {
                            expected: then_ty.to_string(),
                            found: else_ty.to_string(),
                        },
                        position,
                    );
                }
                then_ty
            }
            ExpressionKind::ArrayAggregate { elements } => {
                let mut elem_ty = Type::Error;
                for (index, element) in elements.iter_mut().enumerate() {
                    let ty = self.check_expression(element);
                    if index == 0 {
                        elem_ty = ty;
                    } else if !ty.equals(&elem_ty) {
                        let position = element.span.start.clone();
                        self.report(
                            DiagnosticKind::TypeMismatch {
                                expected: elem_ty.to_string(),
                                found: ty.to_string(),
                            },
                            position,
                        );
                    }
                }
                Type::Array {
                    size: elements.len() as i32,
                    elem: Box::new(elem_ty),
                }
            }
            ExpressionKind::RecordAggregate { fields } => {
                let mut seen: Vec<String> = vec![];
                let mut field_types = vec![];
                for (field, value) in fields.iter_mut() {
                    if seen.contains(&field.spelling) {
                        let position = field.span.start.clone();
                        let identifier = field.spelling.clone();
                        self.report(
                            DiagnosticKind::IdentifierAlreadyDeclared { identifier },
                            position,
                        );
                    } else {
                        seen.push(field.spelling.clone());
                    }
                    let ty = self.check_expression(value);
                    field_types.push((field.spelling.clone(), ty));
                }
                Type::Record {
                    fields: field_types,
                }
            }
        };

        expr.ty = Some(ty.clone());
        ty
    }

    /// Checks a value-name and returns its type. With `needs_variable`
    /// the named object must be assignable: constants (including value
    /// parameters) and routines are rejected.
    fn check_vname(&mut self, vname: &mut Vname, needs_variable: bool) -> Type {
        let ty = match &mut vname.kind {
            VnameKind::Simple { name } => match self.scope.lookup(&name.spelling).cloned() {
                None => {
                    let identifier = name.spelling.clone();
                    let position = name.span.start.clone();
                    self.report(DiagnosticKind::IdentifierNotDeclared { identifier }, position);
                    Type::Error
                }
                Some(DeclInfo::Variable { ty }) => ty,
                Some(DeclInfo::Constant { ty }) => {
                    if needs_variable {
                        let identifier = name.spelling.clone();
                        let position = name.span.start.clone();
                        self.report(DiagnosticKind::NotAVariable { identifier }, position);
                    }
                    ty
                }
                Some(_) => {
                    let identifier = name.spelling.clone();
                    let position = name.span.start.clone();
                    self.report(DiagnosticKind::NotAVariable { identifier }, position);
                    Type::Error
                }
            },
            VnameKind::Dot { record, field } => {
                let record_ty = self.check_vname(record, needs_variable);
                if record_ty == Type::Error {
                    Type::Error
                } else if let Some(field_ty) = record_ty.field_type(&field.spelling) {
                    field_ty.clone()
                } else {
                    let position = field.span.start.clone();
                    if matches!(record_ty, Type::Record { .. }) {
                        let field = field.spelling.clone();
                        self.report(DiagnosticKind::NoSuchField { field }, position);
                    } else {
                        self.report(
                            DiagnosticKind::NotARecord {
                                found: record_ty.to_string(),
                            },
                            position,
                        );
                    }
                    Type::Error
                }
            }
            VnameKind::Subscript { array, index } => {
                let array_ty = self.check_vname(array, needs_variable);
                let index_ty = self.check_expression(index);
                if !index_ty.equals(&Type::Int) {
                    let position = index.span.start.clone();
                    self.report(
                        DiagnosticKind::IndexNotInteger {
                            found: index_ty.to_string(),
                        },
                        position,
                    );
                }
                match array_ty {
                    Type::Error => Type::Error,
                    Type::Array { elem, .. } => *elem,
                    other => {
                        let position = vname.span.start.clone();
                        self.report(
                            DiagnosticKind::NotAnArray {
                                found: other.to_string(),
                            },
                            position,
                        );
                        Type::Error
                    }
                }
            }
        };

        vname.ty = Some(ty.clone());
        ty
    }
}

/// Rebuilds the signature of an already-resolved formal parameter list,
/// used when a routine parameter is entered into its body's scope frame.
fn signature_of(params: &[FormalParam]) -> Vec<ParamSig> {
    params
        .iter()
        .map(|param| match &param.kind {
            FormalParamKind::Value { denoter, .. } => {
                ParamSig::Value(denoter.checked_type().clone())
            }
            FormalParamKind::VarParam { denoter, .. } => {
                ParamSig::Var(denoter.checked_type().clone())
            }
            FormalParamKind::ProcParam { params, .. } => ParamSig::Proc(signature_of(params)),
            FormalParamKind::FuncParam { params, result, .. } => {
                ParamSig::Func(signature_of(params), result.checked_type().clone())
            }
        })
        .collect()
}
