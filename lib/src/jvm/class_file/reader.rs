use crate::jvm::class_file::{ConstantIndex, ConstantPool, Deserialize};
use crate::jvm::model::{
    Class, Field, FieldOperation, Instruction, Method, MethodOperation, TypeOperation,
};
use crate::jvm::{
    BinaryName, ClassAccessFlags, ClassFileError, FieldAccessFlags, MethodAccessFlags, Name,
    ParseDescriptor, RefType, UnqualifiedName,
};
use byteorder::{BigEndian, ByteOrder};

/// Magic header bytes at the front of every class file
const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

/// Parse a class file into its structural model
///
/// Everything that plays no part in binary compatibility (stack maps, line
/// numbers, annotations, the exception table) is skipped over.
pub fn parse_class(bytes: &[u8]) -> Result<Class, ClassFileError> {
    let reader = &mut &*bytes;

    let magic = u32::deserialize(reader)?;
    if magic != u32::from_be_bytes(MAGIC) {
        return Err(ClassFileError::BadMagic(magic));
    }

    // Version never affects the model, so it is read and dropped
    let _minor_version = u16::deserialize(reader)?;
    let _major_version = u16::deserialize(reader)?;

    let pool = ConstantPool::parse(reader)?;

    let access_flags = ClassAccessFlags::deserialize(reader)?;

    let this_class = ConstantIndex::deserialize(reader)?;
    let name = binary_name(pool.class_name(this_class)?)?;

    // A zero `super_class` index means there is no superclass (`java/lang/Object`)
    let super_index = ConstantIndex::deserialize(reader)?;
    let super_class = if super_index.0 == 0 {
        None
    } else {
        Some(binary_name(pool.class_name(super_index)?)?)
    };

    let interface_count = u16::deserialize(reader)?;
    let mut interfaces = Vec::with_capacity(interface_count as usize);
    for _ in 0..interface_count {
        let interface = ConstantIndex::deserialize(reader)?;
        interfaces.push(binary_name(pool.class_name(interface)?)?);
    }

    let field_count = u16::deserialize(reader)?;
    let mut fields = Vec::with_capacity(field_count as usize);
    for _ in 0..field_count {
        fields.push(parse_field(reader, &pool)?);
    }

    let method_count = u16::deserialize(reader)?;
    let mut methods = Vec::with_capacity(method_count as usize);
    for _ in 0..method_count {
        methods.push(parse_method(reader, &pool)?);
    }

    let mut generic_signature = None;
    parse_attributes(reader, &pool, |attribute_name, info| {
        if attribute_name == "Signature" {
            generic_signature = Some(signature_attribute(info, &pool)?);
        }
        Ok(())
    })?;

    if !reader.is_empty() {
        return Err(ClassFileError::TrailingBytes {
            count: reader.len(),
        });
    }

    Ok(Class {
        name,
        access_flags,
        super_class,
        interfaces,
        fields,
        methods,
        generic_signature,
    })
}

fn parse_field(reader: &mut &[u8], pool: &ConstantPool) -> Result<Field, ClassFileError> {
    let access_flags = FieldAccessFlags::deserialize(reader)?;
    let name = unqualified_name(pool.utf8(ConstantIndex::deserialize(reader)?)?)?;
    let descriptor = String::from(pool.utf8(ConstantIndex::deserialize(reader)?)?);

    let mut generic_signature = None;
    parse_attributes(reader, pool, |attribute_name, info| {
        if attribute_name == "Signature" {
            generic_signature = Some(signature_attribute(info, pool)?);
        }
        Ok(())
    })?;

    Ok(Field {
        name,
        descriptor,
        access_flags,
        generic_signature,
    })
}

fn parse_method(reader: &mut &[u8], pool: &ConstantPool) -> Result<Method, ClassFileError> {
    let access_flags = MethodAccessFlags::deserialize(reader)?;
    let name = unqualified_name(pool.utf8(ConstantIndex::deserialize(reader)?)?)?;
    let descriptor = String::from(pool.utf8(ConstantIndex::deserialize(reader)?)?);

    let mut generic_signature = None;
    let mut instructions = vec![];
    let mut is_deprecated = false;
    parse_attributes(reader, pool, |attribute_name, info| {
        match attribute_name {
            "Signature" => generic_signature = Some(signature_attribute(info, pool)?),
            "Code" => instructions = parse_code(info, pool)?,
            "Deprecated" => is_deprecated = true,
            _ => (),
        }
        Ok(())
    })?;

    Ok(Method {
        name,
        descriptor,
        access_flags,
        instructions,
        generic_signature,
        is_deprecated,
    })
}

/// Parse an attribute table, feeding each attribute's name and payload to the callback
fn parse_attributes(
    reader: &mut &[u8],
    pool: &ConstantPool,
    mut each_attribute: impl FnMut(&str, &[u8]) -> Result<(), ClassFileError>,
) -> Result<(), ClassFileError> {
    let count = u16::deserialize(reader)?;
    for _ in 0..count {
        let name = pool.utf8(ConstantIndex::deserialize(reader)?)?;

        // Attribute info length is 4 bytes
        let length = u32::deserialize(reader)? as usize;
        let info = take(reader, length)?;
        each_attribute(name, info)?;
    }
    Ok(())
}

fn signature_attribute(info: &[u8], pool: &ConstantPool) -> Result<String, ClassFileError> {
    let reader = &mut &*info;
    Ok(String::from(
        pool.utf8(ConstantIndex::deserialize(reader)?)?,
    ))
}

/// `Code` attribute payload: the only part that survives is the instruction scan
fn parse_code(info: &[u8], pool: &ConstantPool) -> Result<Vec<Instruction>, ClassFileError> {
    let reader = &mut &*info;
    let _max_stack = u16::deserialize(reader)?;
    let _max_locals = u16::deserialize(reader)?;

    let code_length = u32::deserialize(reader)? as usize;
    let code = take(reader, code_length)?;

    let exception_count = u16::deserialize(reader)? as usize;
    take(reader, exception_count * 8)?;

    scan_instructions(code, pool)
}

/// Walk the bytecode, keeping only instructions that reference classes, fields, or methods
fn scan_instructions(code: &[u8], pool: &ConstantPool) -> Result<Vec<Instruction>, ClassFileError> {
    let mut instructions = vec![];
    let mut offset = 0;

    while offset < code.len() {
        let opcode = code[offset];
        match opcode {
            // new, anewarray, checkcast, instanceof
            0xBB | 0xBD | 0xC0 | 0xC1 => {
                let index = ConstantIndex(u16_at(code, offset + 1)?);
                let class = class_ref(pool.class_name(index)?)?;
                let kind = match opcode {
                    0xBB => TypeOperation::New,
                    0xBD => TypeOperation::ANewArray,
                    0xC0 => TypeOperation::CheckCast,
                    _ => TypeOperation::InstanceOf,
                };
                instructions.push(Instruction::Type { kind, class });
                offset += 3;
            }

            // multianewarray (index, then a dimension count byte)
            0xC5 => {
                let index = ConstantIndex(u16_at(code, offset + 1)?);
                let class = class_ref(pool.class_name(index)?)?;
                instructions.push(Instruction::Type {
                    kind: TypeOperation::MultiANewArray,
                    class,
                });
                offset += 4;
            }

            // getstatic, putstatic, getfield, putfield
            0xB2..=0xB5 => {
                let index = ConstantIndex(u16_at(code, offset + 1)?);
                let member = pool.field_ref(index)?;
                let kind = match opcode {
                    0xB2 => FieldOperation::GetStatic,
                    0xB3 => FieldOperation::PutStatic,
                    0xB4 => FieldOperation::GetField,
                    _ => FieldOperation::PutField,
                };
                instructions.push(Instruction::Field {
                    kind,
                    owner: class_ref(member.class_name)?,
                    name: unqualified_name(member.name)?,
                    descriptor: String::from(member.descriptor),
                });
                offset += 3;
            }

            // invokevirtual, invokespecial, invokestatic
            0xB6..=0xB8 => {
                let index = ConstantIndex(u16_at(code, offset + 1)?);
                let member = pool.method_ref(index)?;
                let kind = match opcode {
                    0xB6 => MethodOperation::InvokeVirtual,
                    0xB7 => MethodOperation::InvokeSpecial,
                    _ => MethodOperation::InvokeStatic,
                };
                instructions.push(Instruction::Method {
                    kind,
                    owner: class_ref(member.class_name)?,
                    name: unqualified_name(member.name)?,
                    descriptor: String::from(member.descriptor),
                });
                offset += 3;
            }

            // invokeinterface (index, then a count byte and a zero byte)
            0xB9 => {
                let index = ConstantIndex(u16_at(code, offset + 1)?);
                let member = pool.method_ref(index)?;
                instructions.push(Instruction::Method {
                    kind: MethodOperation::InvokeInterface,
                    owner: class_ref(member.class_name)?,
                    name: unqualified_name(member.name)?,
                    descriptor: String::from(member.descriptor),
                });
                offset += 5;
            }

            // invokedynamic names no class directly
            0xBA => offset += 5,

            // tableswitch
            0xAA => {
                let padding = (4 - ((offset + 1) % 4)) % 4;
                let base = offset + 1 + padding;
                let low = i32_at(code, base + 4)?;
                let high = i32_at(code, base + 8)?;
                if high < low {
                    return Err(ClassFileError::BadInstruction { opcode, offset });
                }
                let jumps = (high as i64 - low as i64 + 1) as usize;
                offset = base + 12 + jumps * 4;
            }

            // lookupswitch
            0xAB => {
                let padding = (4 - ((offset + 1) % 4)) % 4;
                let base = offset + 1 + padding;
                let npairs = i32_at(code, base + 4)?;
                if npairs < 0 {
                    return Err(ClassFileError::BadInstruction { opcode, offset });
                }
                offset = base + 8 + (npairs as usize) * 8;
            }

            // wide
            0xC4 => {
                let widened = match code.get(offset + 1) {
                    Some(&op) => op,
                    None => return Err(ClassFileError::UnexpectedEof),
                };
                offset += match widened {
                    // Only iinc carries an extra operand pair
                    0x84 => 6,
                    0x15..=0x19 | 0x36..=0x3A | 0xA9 => 4,
                    _ => {
                        return Err(ClassFileError::BadInstruction {
                            opcode: widened,
                            offset,
                        })
                    }
                };
            }

            _ => match operand_length(opcode) {
                Some(operands) => offset += 1 + operands,
                None => return Err(ClassFileError::BadInstruction { opcode, offset }),
            },
        }
    }

    // A well formed method ends exactly on an instruction boundary
    if offset > code.len() {
        return Err(ClassFileError::UnexpectedEof);
    }

    Ok(instructions)
}

/// Number of operand bytes for the opcodes with a fixed operand length
///
/// `None` marks opcodes that are reserved or undefined. Opcodes with reference
/// operands or variable lengths are handled before this table is consulted.
fn operand_length(opcode: u8) -> Option<usize> {
    match opcode {
        // constants (nop through dconst_1)
        0x00..=0x0F => Some(0),
        // bipush, ldc
        0x10 | 0x12 => Some(1),
        // sipush, ldc_w, ldc2_w
        0x11 | 0x13 | 0x14 => Some(2),
        // loads and stores with an index operand, ret, newarray
        0x15..=0x19 | 0x36..=0x3A | 0xA9 | 0xBC => Some(1),
        // loads/stores with hardcoded slots, array ops, stack ops, arithmetic,
        // conversions, comparisons, returns, arraylength, athrow, monitors
        0x1A..=0x35 | 0x3B..=0x5F | 0x60..=0x83 | 0x85..=0x98 | 0xAC..=0xB1 | 0xBE | 0xBF
        | 0xC2 | 0xC3 => Some(0),
        // iinc
        0x84 => Some(2),
        // branches with a 2-byte offset
        0x99..=0xA8 | 0xC6 | 0xC7 => Some(2),
        // goto_w, jsr_w
        0xC8 | 0xC9 => Some(4),
        _ => None,
    }
}

fn u16_at(code: &[u8], offset: usize) -> Result<u16, ClassFileError> {
    match code.get(offset..offset + 2) {
        Some(bytes) => Ok(BigEndian::read_u16(bytes)),
        None => Err(ClassFileError::UnexpectedEof),
    }
}

fn i32_at(code: &[u8], offset: usize) -> Result<i32, ClassFileError> {
    match code.get(offset..offset + 4) {
        Some(bytes) => Ok(BigEndian::read_i32(bytes)),
        None => Err(ClassFileError::UnexpectedEof),
    }
}

fn take<'a>(reader: &mut &'a [u8], count: usize) -> Result<&'a [u8], ClassFileError> {
    if reader.len() < count {
        return Err(ClassFileError::UnexpectedEof);
    }
    let (taken, rest) = reader.split_at(count);
    *reader = rest;
    Ok(taken)
}

fn binary_name(text: &str) -> Result<BinaryName, ClassFileError> {
    BinaryName::from_string(String::from(text)).map_err(ClassFileError::BadName)
}

fn unqualified_name(text: &str) -> Result<UnqualifiedName, ClassFileError> {
    UnqualifiedName::from_string(String::from(text)).map_err(ClassFileError::BadName)
}

/// `CONSTANT_Class` names are usually plain binary names, but in instruction
/// operands they can also be array descriptors
fn class_ref(text: &str) -> Result<RefType<BinaryName>, ClassFileError> {
    if text.starts_with('[') {
        RefType::parse(text).map_err(|err| ClassFileError::BadName(err.to_string()))
    } else {
        binary_name(text).map(RefType::Object)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn empty_pool() -> ConstantPool {
        ConstantPool::parse(&mut &[0x00u8, 0x01][..]).unwrap()
    }

    #[test]
    fn scan_skips_control_flow() {
        let pool = empty_pool();
        // iconst_0; istore_1; iload_1; ifeq +5; iinc 1 by 1; goto -8; return
        let code = [
            0x03, 0x3C, 0x1B, 0x99, 0x00, 0x05, 0x84, 0x01, 0x01, 0xA7, 0xFF, 0xF8, 0xB1,
        ];
        let scanned = scan_instructions(&code, &pool).unwrap();
        assert!(
            scanned.is_empty(),
            "pure control flow references no classes or members"
        );
    }

    #[test]
    fn scan_handles_tableswitch_padding() {
        let pool = empty_pool();
        let mut code = vec![0xAA, 0x00, 0x00, 0x00];
        code.extend_from_slice(&28i32.to_be_bytes()); // default
        code.extend_from_slice(&0i32.to_be_bytes()); // low
        code.extend_from_slice(&1i32.to_be_bytes()); // high
        code.extend_from_slice(&12i32.to_be_bytes());
        code.extend_from_slice(&16i32.to_be_bytes());
        code.push(0xB1);

        let scanned = scan_instructions(&code, &pool).unwrap();
        assert!(scanned.is_empty());
    }

    #[test]
    fn scan_handles_lookupswitch_padding() {
        let pool = empty_pool();
        // lookupswitch at offset 1 needs 2 bytes of padding
        let mut code = vec![0x00, 0xAB, 0x00, 0x00];
        code.extend_from_slice(&20i32.to_be_bytes()); // default
        code.extend_from_slice(&1i32.to_be_bytes()); // npairs
        code.extend_from_slice(&7i32.to_be_bytes()); // match
        code.extend_from_slice(&12i32.to_be_bytes()); // target
        code.push(0xB1);

        let scanned = scan_instructions(&code, &pool).unwrap();
        assert!(scanned.is_empty());
    }

    #[test]
    fn scan_rejects_invalid_opcodes() {
        let pool = empty_pool();
        assert!(matches!(
            scan_instructions(&[0xCB], &pool),
            Err(ClassFileError::BadInstruction {
                opcode: 0xCB,
                offset: 0
            })
        ));
    }

    #[test]
    fn scan_rejects_truncated_instructions() {
        let pool = empty_pool();
        assert!(
            scan_instructions(&[0x10], &pool).is_err(),
            "bipush needs an operand byte"
        );
    }

    #[test]
    fn class_refs_accept_array_descriptors() {
        assert!(matches!(
            class_ref("[Ljava/lang/String;"),
            Ok(RefType::ObjectArray(_))
        ));
        assert!(matches!(class_ref("[[I"), Ok(RefType::PrimitiveArray(_))));
        assert!(matches!(
            class_ref("java/lang/String"),
            Ok(RefType::Object(_))
        ));
        assert!(class_ref("java.lang.String").is_err());
    }
}
