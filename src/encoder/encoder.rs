//! Main encoder module.
//!
//! This module contains the Encoder structure and the traversal over
//! commands and declarations. It assigns every declaration its nesting
//! level and frame displacement, keeps a routine arena for forward and
//! recursive calls, and drives the emitter. Expression and value-name
//! encoding lives in the sibling `expr` module.

use crate::{
    ast::ast::{
        ActualParam, ActualParamKind, Command, CommandKind, Declaration, DeclarationKind,
        FormalParam, FormalParamKind, Identifier, Program,
    },
    checker::scope::ScopeStack,
    errors::{errors::DiagnosticKind, reporter::Reporter},
    Position,
};

use super::{
    emitter::Emitter,
    expr::{encode_expression, encode_fetch_address},
    machine::{self, registers, Opcode},
};

/// Addressing frame during encoding: the current routine nesting level
/// and how many words of that frame are in use.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub level: u8,
    pub size: i32,
}

impl Frame {
    /// The same frame with `extra` more words on the stack.
    pub fn expand(&self, extra: i32) -> Frame {
        Frame {
            level: self.level,
            size: self.size + extra,
        }
    }
}

/// What a declared name denotes at runtime.
#[derive(Debug, Clone)]
pub enum Entity {
    /// Constant with a value known at compile time.
    KnownValue { value: i32 },
    /// Constant evaluated at elaboration time and kept in its frame.
    UnknownValue { level: u8, displacement: i32 },
    /// Variable storage at a known level and displacement.
    KnownAddress { level: u8, displacement: i32 },
    /// Var parameter: the object's address is stored at level/disp.
    UnknownAddress { level: u8, displacement: i32 },
    /// User routine encoded in this program (routine arena index).
    KnownRoutine { routine: usize },
    /// Routine parameter: a closure stored at level/disp.
    UnknownRoutine { level: u8, displacement: i32 },
    /// One of the machine's primitive routines.
    PrimitiveRoutine { displacement: i32 },
}

/// A user routine's slot in the routine arena: the level it is declared
/// at, its entry address once the body is emitted, and the indices of
/// call instructions waiting for that address.
#[derive(Debug)]
pub struct RoutineSlot {
    pub level: u8,
    pub entry: Option<i32>,
    pub pending: Vec<usize>,
}

/// The encoding pass. Runs its own scope-frame stack over the checked
/// tree; the checker's frames are never shared.
pub struct Encoder<'a> {
    pub emitter: Emitter,
    pub scope: ScopeStack<Entity>,
    pub routines: Vec<RoutineSlot>,
    pub reporter: &'a mut Reporter,
}

/// Encodes a checked program into an instruction buffer. Only call this
/// when every earlier stage finished without errors.
pub fn encode(program: &Program, reporter: &mut Reporter) -> Emitter {
    let mut encoder = Encoder {
        emitter: Emitter::new(),
        scope: ScopeStack::new(),
        routines: vec![],
        reporter,
    };
    load_std_entities(&mut encoder);

    let global_frame = Frame { level: 0, size: 0 };
    encode_command(&mut encoder, &program.command, &global_frame);
    encoder.emitter.emit(Opcode::Halt, 0, 0, 0);

    if encoder.emitter.unresolved_count() > 0 {
        encoder
            .reporter
            .report(DiagnosticKind::UnresolvedJump, Position::null());
    }

    encoder.emitter
}

/// Enters the standard environment's runtime entities into the outermost
/// scope frame.
fn load_std_entities(encoder: &mut Encoder) {
    encoder.scope.declare(
        "false",
        Entity::KnownValue {
            value: machine::FALSE_REP,
        },
    );
    encoder.scope.declare(
        "true",
        Entity::KnownValue {
            value: machine::TRUE_REP,
        },
    );
    encoder.scope.declare(
        "maxint",
        Entity::KnownValue {
            value: machine::MAXINT_REP,
        },
    );

    for (spelling, displacement) in machine::PRIMITIVE_ROUTINES.iter() {
        encoder.scope.declare(
            spelling,
            Entity::PrimitiveRoutine {
                displacement: *displacement,
            },
        );
    }
}

pub fn encode_command(encoder: &mut Encoder, command: &Command, frame: &Frame) {
    match &command.kind {
        CommandKind::Assign { target, value } => {
            let size = encode_expression(encoder, value, frame);
            super::expr::encode_store(encoder, target, &frame.expand(size));
        }
        CommandKind::Call { name, args } => {
            encode_call(encoder, name, args, frame);
        }
        CommandKind::Sequence { commands } => {
            for command in commands {
                encode_command(encoder, command, frame);
            }
        }
        CommandKind::If {
            condition,
            then_command,
            else_command,
        } => {
            encode_expression(encoder, condition, frame);
            let jump_if_false =
                encoder
                    .emitter
                    .emit_unresolved(Opcode::Jumpif, machine::FALSE_REP, registers::CB);
            encode_command(encoder, then_command, frame);
            let jump_to_end = encoder
                .emitter
                .emit_unresolved(Opcode::Jump, 0, registers::CB);
            let else_addr = encoder.emitter.next_addr();
            encoder.emitter.patch(jump_if_false, else_addr);
            encode_command(encoder, else_command, frame);
            let end_addr = encoder.emitter.next_addr();
            encoder.emitter.patch(jump_to_end, end_addr);
        }
        CommandKind::While { condition, body } => {
            // The condition sits after the body, so each iteration costs
            // one conditional jump.
            let jump_to_condition = encoder
                .emitter
                .emit_unresolved(Opcode::Jump, 0, registers::CB);
            let loop_addr = encoder.emitter.next_addr();
            encode_command(encoder, body, frame);
            let condition_addr = encoder.emitter.next_addr();
            encoder.emitter.patch(jump_to_condition, condition_addr);
            encode_expression(encoder, condition, frame);
            encoder
                .emitter
                .emit(Opcode::Jumpif, machine::TRUE_REP, registers::CB, loop_addr);
        }
        CommandKind::Let { declarations, body } => {
            encoder.scope.open();
            let extra = encode_declarations(encoder, declarations, frame);
            encode_command(encoder, body, &frame.expand(extra));
            if extra > 0 {
                encoder.emitter.emit(Opcode::Pop, 0, 0, extra);
            }
            encoder.scope.close();
        }
        CommandKind::Skip => {}
    }
}

/// Encodes a declaration sequence and returns how many words of the
/// current frame it claimed.
///
/// Every routine of the sequence is entered into scope before any code
/// is emitted, so calls between the routines (in either direction) are
/// emitted with a placeholder entry address and patched when the callee's
/// body is reached.
pub fn encode_declarations(
    encoder: &mut Encoder,
    declarations: &[Declaration],
    frame: &Frame,
) -> i32 {
    for declaration in declarations {
        if let DeclarationKind::Proc { name, .. } | DeclarationKind::Func { name, .. } =
            &declaration.kind
        {
            encoder.routines.push(RoutineSlot {
                level: frame.level,
                entry: None,
                pending: vec![],
            });
            let routine = encoder.routines.len() - 1;
            encoder
                .scope
                .declare(&name.spelling, Entity::KnownRoutine { routine });
        }
    }

    let mut extra = 0;
    for declaration in declarations {
        match &declaration.kind {
            DeclarationKind::Const { name, value, .. } => {
                if let Some(known) = value.literal_value() {
                    encoder
                        .scope
                        .declare(&name.spelling, Entity::KnownValue { value: known });
                } else {
                    // The constant's value is computed once, here, and
                    // lives in the frame like a variable.
                    let current = frame.expand(extra);
                    let size = encode_expression(encoder, value, &current);
                    encoder.scope.declare(
                        &name.spelling,
                        Entity::UnknownValue {
                            level: frame.level,
                            displacement: current.size,
                        },
                    );
                    extra += size;
                }
            }
            DeclarationKind::Var { name, denoter } => {
                let size = denoter.checked_type().size();
                encoder.emitter.emit(Opcode::Push, 0, 0, size);
                encoder.scope.declare(
                    &name.spelling,
                    Entity::KnownAddress {
                        level: frame.level,
                        displacement: frame.size + extra,
                    },
                );
                extra += size;
            }
            DeclarationKind::TypeDecl { .. } => {}
            DeclarationKind::Proc { name, params, body } => {
                let skip = encoder
                    .emitter
                    .emit_unresolved(Opcode::Jump, 0, registers::CB);
                let entry = encoder.emitter.next_addr();
                resolve_routine_entry(encoder, &name.spelling, entry);

                encoder.scope.open();
                let args_size = declare_routine_params(encoder, params, frame.level + 1);
                let body_frame = Frame {
                    level: frame.level + 1,
                    size: machine::LINK_DATA_SIZE,
                };
                encode_command(encoder, body, &body_frame);
                encoder.emitter.emit(Opcode::Return, 0, 0, args_size);
                encoder.scope.close();

                let after = encoder.emitter.next_addr();
                encoder.emitter.patch(skip, after);
            }
            DeclarationKind::Func {
                name,
                params,
                result,
                body,
            } => {
                let skip = encoder
                    .emitter
                    .emit_unresolved(Opcode::Jump, 0, registers::CB);
                let entry = encoder.emitter.next_addr();
                resolve_routine_entry(encoder, &name.spelling, entry);

                encoder.scope.open();
                let args_size = declare_routine_params(encoder, params, frame.level + 1);
                let body_frame = Frame {
                    level: frame.level + 1,
                    size: machine::LINK_DATA_SIZE,
                };
                encode_expression(encoder, body, &body_frame);
                let result_size = result.checked_type().size();
                encoder
                    .emitter
                    .emit(Opcode::Return, result_size, 0, args_size);
                encoder.scope.close();

                let after = encoder.emitter.next_addr();
                encoder.emitter.patch(skip, after);
            }
        }
    }

    extra
}

/// Records a routine's entry address and patches every call emitted
/// before the body was reached.
fn resolve_routine_entry(encoder: &mut Encoder, spelling: &str, entry: i32) {
    if let Some(Entity::KnownRoutine { routine }) = encoder.scope.lookup(spelling).cloned() {
        let pending = {
            let slot = &mut encoder.routines[routine];
            slot.entry = Some(entry);
            std::mem::take(&mut slot.pending)
        };
        for index in pending {
            encoder.emitter.patch(index, entry);
        }
    }
}

/// Words one formal parameter occupies in the caller's argument area.
fn param_size(param: &FormalParam) -> i32 {
    match &param.kind {
        FormalParamKind::Value { denoter, .. } => denoter.checked_type().size(),
        FormalParamKind::VarParam { .. } => machine::ADDRESS_SIZE,
        FormalParamKind::ProcParam { .. } | FormalParamKind::FuncParam { .. } => {
            machine::CLOSURE_SIZE
        }
    }
}

/// Assigns the formal parameters their (negative) displacements below
/// the new frame's base and enters them into the routine's scope frame.
/// Returns the total size of the argument area.
fn declare_routine_params(encoder: &mut Encoder, params: &[FormalParam], level: u8) -> i32 {
    let total: i32 = params.iter().map(param_size).sum();

    let mut displacement = -total;
    for param in params {
        let size = param_size(param);
        match &param.kind {
            FormalParamKind::Value { name, .. } => {
                encoder.scope.declare(
                    &name.spelling,
                    Entity::UnknownValue {
                        level,
                        displacement,
                    },
                );
            }
            FormalParamKind::VarParam { name, .. } => {
                encoder.scope.declare(
                    &name.spelling,
                    Entity::UnknownAddress {
                        level,
                        displacement,
                    },
                );
            }
            FormalParamKind::ProcParam { name, .. } | FormalParamKind::FuncParam { name, .. } => {
                encoder.scope.declare(
                    &name.spelling,
                    Entity::UnknownRoutine {
                        level,
                        displacement,
                    },
                );
            }
        }
        displacement += size;
    }

    total
}

/// Encodes a routine call: arguments left to right, then the transfer.
pub fn encode_call(encoder: &mut Encoder, name: &Identifier, args: &[ActualParam], frame: &Frame) {
    let mut args_size = 0;
    for arg in args {
        args_size += encode_actual(encoder, arg, &frame.expand(args_size));
    }

    match encoder.scope.lookup(&name.spelling).cloned() {
        Some(Entity::KnownRoutine { routine }) => {
            let (slot_level, slot_entry) = {
                let slot = &encoder.routines[routine];
                (slot.level, slot.entry)
            };
            let reg = display_register(encoder, frame.level, slot_level, &name.span.start);
            match slot_entry {
                Some(entry) => {
                    encoder.emitter.emit(Opcode::Call, reg, registers::CB, entry);
                }
                None => {
                    let index = encoder
                        .emitter
                        .emit_unresolved(Opcode::Call, reg, registers::CB);
                    encoder.routines[routine].pending.push(index);
                }
            }
        }
        Some(Entity::UnknownRoutine {
            level,
            displacement,
        }) => {
            let reg = display_register(encoder, frame.level, level, &name.span.start);
            encoder
                .emitter
                .emit(Opcode::Load, machine::CLOSURE_SIZE, reg, displacement);
            encoder.emitter.emit(Opcode::Calli, 0, 0, 0);
        }
        Some(Entity::PrimitiveRoutine { displacement }) => {
            encoder
                .emitter
                .emit(Opcode::Call, registers::SB, registers::PB, displacement);
        }
        _ => {
            // The checker only lets routine names through here.
            encoder.reporter.report(
                DiagnosticKind::NotARoutine {
                    identifier: name.spelling.clone(),
                },
                name.span.start.clone(),
            );
        }
    }
}

/// Encodes one actual parameter and returns the words it pushed.
fn encode_actual(encoder: &mut Encoder, arg: &ActualParam, frame: &Frame) -> i32 {
    match &arg.kind {
        ActualParamKind::Value { expr } => encode_expression(encoder, expr, frame),
        ActualParamKind::VarParam { vname } => {
            encode_fetch_address(encoder, vname, frame);
            machine::ADDRESS_SIZE
        }
        ActualParamKind::ProcParam { name } | ActualParamKind::FuncParam { name } => {
            match encoder.scope.lookup(&name.spelling).cloned() {
                Some(Entity::KnownRoutine { routine }) => {
                    let (slot_level, slot_entry) = {
                        let slot = &encoder.routines[routine];
                        (slot.level, slot.entry)
                    };
                    let reg = display_register(encoder, frame.level, slot_level, &name.span.start);
                    encoder.emitter.emit(Opcode::Loada, 0, reg, 0);
                    match slot_entry {
                        Some(entry) => {
                            encoder.emitter.emit(Opcode::Loada, 0, registers::CB, entry);
                        }
                        None => {
                            let index = encoder
                                .emitter
                                .emit_unresolved(Opcode::Loada, 0, registers::CB);
                            encoder.routines[routine].pending.push(index);
                        }
                    }
                }
                Some(Entity::UnknownRoutine {
                    level,
                    displacement,
                }) => {
                    let reg = display_register(encoder, frame.level, level, &name.span.start);
                    encoder
                        .emitter
                        .emit(Opcode::Load, machine::CLOSURE_SIZE, reg, displacement);
                }
                Some(Entity::PrimitiveRoutine { displacement }) => {
                    encoder.emitter.emit(Opcode::Loada, 0, registers::SB, 0);
                    encoder
                        .emitter
                        .emit(Opcode::Loada, 0, registers::PB, displacement);
                }
                _ => {
                    encoder.reporter.report(
                        DiagnosticKind::NotARoutine {
                            identifier: name.spelling.clone(),
                        },
                        name.span.start.clone(),
                    );
                }
            }
            machine::CLOSURE_SIZE
        }
    }
}

/// The register addressing an object declared at `object_level` from
/// code running at `current_level`: SB for globals, LB for the local
/// frame, L1..L6 for the enclosing frames the display covers.
pub fn display_register(
    encoder: &mut Encoder,
    current_level: u8,
    object_level: u8,
    position: &Position,
) -> i32 {
    let hops = current_level.saturating_sub(object_level);
    if object_level == 0 {
        registers::SB
    } else if hops < machine::MAX_ROUTINE_LEVEL {
        registers::LB + hops as i32
    } else {
        encoder
            .reporter
            .report(DiagnosticKind::TooManyNestingLevels, position.clone());
        registers::LB
    }
}
