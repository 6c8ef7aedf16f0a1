//! Expression and value-name encoding.
//!
//! Expressions leave their value on the stack and report how many words
//! they pushed. Value-names resolve to a base entity plus a constant
//! offset, with any non-constant subscripts computed onto the stack; the
//! fetch/store/address helpers then pick direct or indirect addressing.

use crate::{
    ast::{
        ast::{Vname, VnameKind},
        expressions::{Expression, ExpressionKind},
    },
    lexer::tokens::TokenKind,
};

use super::{
    encoder::{
        display_register, encode_call, encode_declarations, Encoder, Entity, Frame,
    },
    machine::{self, primitives, registers, Opcode},
};

/// Encodes an expression; returns the size in words of the value it
/// leaves on the stack.
pub fn encode_expression(encoder: &mut Encoder, expr: &Expression, frame: &Frame) -> i32 {
    match &expr.kind {
        ExpressionKind::IntLit { value } => {
            encoder.emitter.emit(Opcode::Loadl, 0, 0, *value);
            machine::INTEGER_SIZE
        }
        ExpressionKind::CharLit { value } => {
            encoder.emitter.emit(Opcode::Loadl, 0, 0, *value as i32);
            machine::CHARACTER_SIZE
        }
        ExpressionKind::Vname { vname } => {
            encode_fetch(encoder, vname, frame);
            vname.checked_type().size()
        }
        ExpressionKind::Call { name, args } => {
            encode_call(encoder, name, args, frame);
            expr.checked_type().size()
        }
        ExpressionKind::Unary { operator, operand } => {
            encode_expression(encoder, operand, frame);
            if let Some(displacement) = machine::UNARY_OP_PRIMITIVES.get(&operator.kind) {
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, *displacement);
            }
            1
        }
        ExpressionKind::Binary {
            operator,
            left,
            right,
        } => {
            let left_size = encode_expression(encoder, left, frame);
            encode_expression(encoder, right, &frame.expand(left_size));
            match operator.kind {
                // Equality works on values of any one size; the size is
                // pushed above the operands.
                TokenKind::Equals => {
                    encoder.emitter.emit(Opcode::Loadl, 0, 0, left_size);
                    encoder
                        .emitter
                        .emit(Opcode::Call, registers::SB, registers::PB, primitives::EQ);
                }
                TokenKind::BackslashEquals => {
                    encoder.emitter.emit(Opcode::Loadl, 0, 0, left_size);
                    encoder
                        .emitter
                        .emit(Opcode::Call, registers::SB, registers::PB, primitives::NE);
                }
                _ => {
                    if let Some(displacement) = machine::BINARY_OP_PRIMITIVES.get(&operator.kind) {
                        encoder.emitter.emit(
                            Opcode::Call,
                            registers::SB,
                            registers::PB,
                            *displacement,
                        );
                    }
                }
            }
            1
        }
        ExpressionKind::Let { declarations, body } => {
            encoder.scope.open();
            let extra = encode_declarations(encoder, declarations, frame);
            let size = encode_expression(encoder, body, &frame.expand(extra));
            if extra > 0 {
                encoder.emitter.emit(Opcode::Pop, size, 0, extra);
            }
            encoder.scope.close();
            size
        }
        ExpressionKind::If {
            condition,
            then_expr,
            else_expr,
        } => {
            encode_expression(encoder, condition, frame);
            let jump_if_false =
                encoder
                    .emitter
                    .emit_unresolved(Opcode::Jumpif, machine::FALSE_REP, registers::CB);
            let size = encode_expression(encoder, then_expr, frame);
            let jump_to_end = encoder
                .emitter
                .emit_unresolved(Opcode::Jump, 0, registers::CB);
            let else_addr = encoder.emitter.next_addr();
            encoder.emitter.patch(jump_if_false, else_addr);
            encode_expression(encoder, else_expr, frame);
            let end_addr = encoder.emitter.next_addr();
            encoder.emitter.patch(jump_to_end, end_addr);
            size
        }
        ExpressionKind::ArrayAggregate { elements } => {
            let mut size = 0;
            for element in elements {
                size += encode_expression(encoder, element, &frame.expand(size));
            }
            size
        }
        ExpressionKind::RecordAggregate { fields } => {
            let mut size = 0;
            for (_, value) in fields {
                size += encode_expression(encoder, value, &frame.expand(size));
            }
            size
        }
    }
}

/// A value-name resolved for addressing: its base entity, a constant
/// word offset, and whether a computed index is already on the stack.
struct ObjectAddress {
    base: Entity,
    offset: i32,
    indexed: bool,
}

/// Walks a value-name, folding constant field offsets and literal
/// subscripts into `offset` and emitting code for the rest.
fn encode_object_address(encoder: &mut Encoder, vname: &Vname, frame: &Frame) -> ObjectAddress {
    match &vname.kind {
        VnameKind::Simple { name } => {
            // The checker resolved every name that reaches the encoder.
            let base = encoder
                .scope
                .lookup(&name.spelling)
                .cloned()
                .unwrap_or(Entity::KnownValue { value: 0 });
            ObjectAddress {
                base,
                offset: 0,
                indexed: false,
            }
        }
        VnameKind::Dot { record, field } => {
            let mut addr = encode_object_address(encoder, record, frame);
            addr.offset += record
                .checked_type()
                .field_offset(&field.spelling)
                .unwrap_or(0);
            addr
        }
        VnameKind::Subscript { array, index } => {
            let mut addr = encode_object_address(encoder, array, frame);
            let elem_size = vname.checked_type().size();

            if let Some(value) = index.literal_value() {
                addr.offset += value * elem_size;
            } else {
                let index_frame = if addr.indexed {
                    frame.expand(machine::ADDRESS_SIZE)
                } else {
                    *frame
                };
                encode_expression(encoder, index, &index_frame);
                if elem_size != 1 {
                    encoder.emitter.emit(Opcode::Loadl, 0, 0, elem_size);
                    encoder.emitter.emit(
                        Opcode::Call,
                        registers::SB,
                        registers::PB,
                        primitives::MULT,
                    );
                }
                if addr.indexed {
                    encoder
                        .emitter
                        .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
                } else {
                    addr.indexed = true;
                }
            }
            addr
        }
    }
}

/// Pushes the value of a value-name onto the stack.
pub fn encode_fetch(encoder: &mut Encoder, vname: &Vname, frame: &Frame) {
    let size = vname.checked_type().size();
    let addr = encode_object_address(encoder, vname, frame);

    match addr.base {
        Entity::KnownValue { value } => {
            encoder.emitter.emit(Opcode::Loadl, 0, 0, value);
        }
        Entity::KnownAddress {
            level,
            displacement,
        }
        | Entity::UnknownValue {
            level,
            displacement,
        } => {
            let reg = display_register(encoder, frame.level, level, &vname.span.start);
            if addr.indexed {
                encoder
                    .emitter
                    .emit(Opcode::Loada, 0, reg, displacement + addr.offset);
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
                encoder.emitter.emit(Opcode::Loadi, size, 0, 0);
            } else {
                encoder
                    .emitter
                    .emit(Opcode::Load, size, reg, displacement + addr.offset);
            }
        }
        Entity::UnknownAddress {
            level,
            displacement,
        } => {
            let reg = display_register(encoder, frame.level, level, &vname.span.start);
            encoder
                .emitter
                .emit(Opcode::Load, machine::ADDRESS_SIZE, reg, displacement);
            if addr.offset != 0 {
                encoder.emitter.emit(Opcode::Loadl, 0, 0, addr.offset);
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
            }
            if addr.indexed {
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
            }
            encoder.emitter.emit(Opcode::Loadi, size, 0, 0);
        }
        // Routines cannot be fetched; the checker rejected those names.
        _ => {}
    }
}

/// Stores the top `size` words of the stack into a value-name. The value
/// is already on the stack; `frame` must account for it.
pub fn encode_store(encoder: &mut Encoder, vname: &Vname, frame: &Frame) {
    let size = vname.checked_type().size();
    let addr = encode_object_address(encoder, vname, frame);

    match addr.base {
        Entity::KnownAddress {
            level,
            displacement,
        } => {
            let reg = display_register(encoder, frame.level, level, &vname.span.start);
            if addr.indexed {
                encoder
                    .emitter
                    .emit(Opcode::Loada, 0, reg, displacement + addr.offset);
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
                encoder.emitter.emit(Opcode::Storei, size, 0, 0);
            } else {
                encoder
                    .emitter
                    .emit(Opcode::Store, size, reg, displacement + addr.offset);
            }
        }
        Entity::UnknownAddress {
            level,
            displacement,
        } => {
            let reg = display_register(encoder, frame.level, level, &vname.span.start);
            encoder
                .emitter
                .emit(Opcode::Load, machine::ADDRESS_SIZE, reg, displacement);
            if addr.offset != 0 {
                encoder.emitter.emit(Opcode::Loadl, 0, 0, addr.offset);
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
            }
            if addr.indexed {
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
            }
            encoder.emitter.emit(Opcode::Storei, size, 0, 0);
        }
        // Constants are not assignable; the checker rejected those names.
        _ => {}
    }
}

/// Pushes the address of a value-name, for var parameters.
pub fn encode_fetch_address(encoder: &mut Encoder, vname: &Vname, frame: &Frame) {
    let addr = encode_object_address(encoder, vname, frame);

    match addr.base {
        Entity::KnownAddress {
            level,
            displacement,
        }
        | Entity::UnknownValue {
            level,
            displacement,
        } => {
            let reg = display_register(encoder, frame.level, level, &vname.span.start);
            encoder
                .emitter
                .emit(Opcode::Loada, 0, reg, displacement + addr.offset);
            if addr.indexed {
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
            }
        }
        Entity::UnknownAddress {
            level,
            displacement,
        } => {
            let reg = display_register(encoder, frame.level, level, &vname.span.start);
            encoder
                .emitter
                .emit(Opcode::Load, machine::ADDRESS_SIZE, reg, displacement);
            if addr.offset != 0 {
                encoder.emitter.emit(Opcode::Loadl, 0, 0, addr.offset);
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
            }
            if addr.indexed {
                encoder
                    .emitter
                    .emit(Opcode::Call, registers::SB, registers::PB, primitives::ADD);
            }
        }
        _ => {}
    }
}
