use crate::jvm::class_file::Deserialize;
use crate::jvm::ClassFileError;
use byteorder::ReadBytesExt;

/// Index into the constant pool
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ConstantIndex(pub u16);

impl Deserialize for ConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        Ok(ConstantIndex(u16::deserialize(reader)?))
    }
}

/// Constants as in the constant pool
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone)]
pub enum Constant {
    /// Constant UTF-8 string value, already decoded
    Utf8(String),

    /// Constant primitive of type `int`
    Integer(i32),

    /// Constant primitive of type `float`
    Float(f32),

    /// Constant primitive of type `long`
    Long(i64),

    /// Constant primitive of type `double`
    Double(f64),

    /// Class or an interface
    Class(ConstantIndex),

    /// Constant object of type `java.lang.String`
    String(ConstantIndex),

    /// Field
    FieldRef {
        class: ConstantIndex,
        name_and_type: ConstantIndex,
    },

    /// Method (this combines `Methodref` and `InterfaceMethodref`)
    MethodRef {
        class: ConstantIndex,
        name_and_type: ConstantIndex,
        is_interface: bool,
    },

    /// Name and a type (eg. for a field or a method)
    NameAndType {
        name: ConstantIndex,
        descriptor: ConstantIndex,
    },

    /// Constant object of type `java.lang.invoke.MethodHandle`
    MethodHandle {
        handle_kind: u8,

        /// Depending on the handle kind, this points to a `FieldRef` or a
        /// `MethodRef`
        member: ConstantIndex,
    },

    /// Method type
    MethodType { descriptor: ConstantIndex },

    /// Dynamically-computed constant
    Dynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        name_and_type: ConstantIndex,
    },

    /// Dynamically-computed call site
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        name_and_type: ConstantIndex,
    },

    /// Module
    Module(ConstantIndex),

    /// Package
    Package(ConstantIndex),
}

/// Field or method reference with the constant pool indirections resolved away
#[derive(Copy, Clone, Debug)]
pub struct MemberRef<'a> {
    pub class_name: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,
}

/// Parsed constant pool
///
/// Indexing starts at 1, and `Long`/`Double` constants occupy two slots, so
/// the entries table keeps the unusable slots around as `None`.
pub struct ConstantPool {
    entries: Vec<Option<Constant>>,
}

impl ConstantPool {
    /// Parse a `constant_pool_count` and the constant pool entries after it
    pub fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<ConstantPool, ClassFileError> {
        let count = u16::deserialize(reader)? as usize;
        let mut entries: Vec<Option<Constant>> = Vec::with_capacity(count);
        entries.push(None);

        while entries.len() < count {
            let tag = u8::deserialize(reader)?;
            let constant = match tag {
                1 => {
                    let length = u16::deserialize(reader)? as usize;
                    let mut bytes = vec![0u8; length];
                    reader.read_exact(&mut bytes)?;
                    let decoded = decode_modified_utf8(&bytes)
                        .map_err(|detail| ClassFileError::BadUtf8 { detail })?;
                    Constant::Utf8(decoded)
                }
                3 => Constant::Integer(i32::deserialize(reader)?),
                4 => Constant::Float(f32::deserialize(reader)?),
                5 => Constant::Long(i64::deserialize(reader)?),
                6 => Constant::Double(f64::deserialize(reader)?),
                7 => Constant::Class(ConstantIndex::deserialize(reader)?),
                8 => Constant::String(ConstantIndex::deserialize(reader)?),
                9 => Constant::FieldRef {
                    class: ConstantIndex::deserialize(reader)?,
                    name_and_type: ConstantIndex::deserialize(reader)?,
                },
                10 | 11 => Constant::MethodRef {
                    class: ConstantIndex::deserialize(reader)?,
                    name_and_type: ConstantIndex::deserialize(reader)?,
                    is_interface: tag == 11,
                },
                12 => Constant::NameAndType {
                    name: ConstantIndex::deserialize(reader)?,
                    descriptor: ConstantIndex::deserialize(reader)?,
                },
                15 => Constant::MethodHandle {
                    handle_kind: u8::deserialize(reader)?,
                    member: ConstantIndex::deserialize(reader)?,
                },
                16 => Constant::MethodType {
                    descriptor: ConstantIndex::deserialize(reader)?,
                },
                17 => Constant::Dynamic {
                    bootstrap_method: u16::deserialize(reader)?,
                    name_and_type: ConstantIndex::deserialize(reader)?,
                },
                18 => Constant::InvokeDynamic {
                    bootstrap_method: u16::deserialize(reader)?,
                    name_and_type: ConstantIndex::deserialize(reader)?,
                },
                19 => Constant::Module(ConstantIndex::deserialize(reader)?),
                20 => Constant::Package(ConstantIndex::deserialize(reader)?),
                other => return Err(ClassFileError::BadConstantTag(other)),
            };

            let two_slots = matches!(constant, Constant::Long(_) | Constant::Double(_));
            entries.push(Some(constant));
            if two_slots {
                // The slot after an 8-byte constant is valid but unusable
                entries.push(None);
            }
        }

        Ok(ConstantPool { entries })
    }

    /// Look up the constant at an index
    pub fn get(&self, index: ConstantIndex) -> Result<&Constant, ClassFileError> {
        match self.entries.get(index.0 as usize) {
            Some(Some(constant)) => Ok(constant),
            _ => Err(ClassFileError::BadConstantIndex {
                index: index.0,
                expected: "a usable constant",
            }),
        }
    }

    /// Look up a `CONSTANT_Utf8` entry
    pub fn utf8(&self, index: ConstantIndex) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Utf8(string) => Ok(string),
            _ => Err(ClassFileError::BadConstantIndex {
                index: index.0,
                expected: "CONSTANT_Utf8",
            }),
        }
    }

    /// Look up a `CONSTANT_Class` entry and return the name under it
    pub fn class_name(&self, index: ConstantIndex) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Class(name) => self.utf8(*name),
            _ => Err(ClassFileError::BadConstantIndex {
                index: index.0,
                expected: "CONSTANT_Class",
            }),
        }
    }

    /// Look up a `CONSTANT_NameAndType` entry and return the name and descriptor under it
    pub fn name_and_type(&self, index: ConstantIndex) -> Result<(&str, &str), ClassFileError> {
        match self.get(index)? {
            Constant::NameAndType { name, descriptor } => {
                Ok((self.utf8(*name)?, self.utf8(*descriptor)?))
            }
            _ => Err(ClassFileError::BadConstantIndex {
                index: index.0,
                expected: "CONSTANT_NameAndType",
            }),
        }
    }

    /// Look up a `CONSTANT_Fieldref` entry
    pub fn field_ref(&self, index: ConstantIndex) -> Result<MemberRef<'_>, ClassFileError> {
        match self.get(index)? {
            Constant::FieldRef {
                class,
                name_and_type,
            } => self.member_ref(*class, *name_and_type),
            _ => Err(ClassFileError::BadConstantIndex {
                index: index.0,
                expected: "CONSTANT_Fieldref",
            }),
        }
    }

    /// Look up a `CONSTANT_Methodref` or `CONSTANT_InterfaceMethodref` entry
    pub fn method_ref(&self, index: ConstantIndex) -> Result<MemberRef<'_>, ClassFileError> {
        match self.get(index)? {
            Constant::MethodRef {
                class,
                name_and_type,
                ..
            } => self.member_ref(*class, *name_and_type),
            _ => Err(ClassFileError::BadConstantIndex {
                index: index.0,
                expected: "CONSTANT_Methodref",
            }),
        }
    }

    fn member_ref(
        &self,
        class: ConstantIndex,
        name_and_type: ConstantIndex,
    ) -> Result<MemberRef<'_>, ClassFileError> {
        let class_name = self.class_name(class)?;
        let (name, descriptor) = self.name_and_type(name_and_type)?;
        Ok(MemberRef {
            class_name,
            name,
            descriptor,
        })
    }
}

/// Modified UTF-8 format used in class files.
///
/// See [this `DataInput` section for details][0]. Quoting from that section:
///
/// > The differences between this format and the standard UTF-8 format are the following:
/// >
/// >  * The null byte `\u0000` is encoded in 2-byte format rather than 1-byte, so that the encoded
/// >    strings never have embedded nulls.
/// >  * Only the 1-byte, 2-byte, and 3-byte formats are used.
/// >  * Supplementary characters are represented in the form of surrogate pairs.
///
/// [0]: https://docs.oracle.com/en/java/javase/17/docs/api/java.base/java/io/DataInput.html#modified-utf-8
pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String, String> {
    // Decode one UTF-16 code unit, returning it along with the offset just past it
    fn code_unit(bytes: &[u8], offset: usize) -> Result<(u32, usize), String> {
        let first = match bytes.get(offset) {
            Some(&byte) => byte,
            None => return Err(String::from("input ends in the middle of a character")),
        };
        if first == 0 {
            Err(format!("embedded null byte at offset {}", offset))
        } else if first & 0b1000_0000 == 0 {
            Ok((first as u32, offset + 1))
        } else if first & 0b1110_0000 == 0b1100_0000 {
            let second = continuation(bytes, offset + 1)?;
            Ok((((first & 0x1F) as u32) << 6 | second, offset + 2))
        } else if first & 0b1111_0000 == 0b1110_0000 {
            let second = continuation(bytes, offset + 1)?;
            let third = continuation(bytes, offset + 2)?;
            Ok((((first & 0x0F) as u32) << 12 | second << 6 | third, offset + 3))
        } else {
            Err(format!(
                "invalid start byte 0x{:02X} at offset {}",
                first, offset
            ))
        }
    }

    fn continuation(bytes: &[u8], offset: usize) -> Result<u32, String> {
        match bytes.get(offset) {
            Some(&byte) if byte & 0b1100_0000 == 0b1000_0000 => Ok((byte & 0x3F) as u32),
            Some(&byte) => Err(format!(
                "invalid continuation byte 0x{:02X} at offset {}",
                byte, offset
            )),
            None => Err(String::from("input ends in the middle of a character")),
        }
    }

    let mut decoded = String::with_capacity(bytes.len());
    let mut offset = 0;
    while offset < bytes.len() {
        let (unit, next_offset) = code_unit(bytes, offset)?;
        offset = next_offset;

        // Surrogate pairs combine into supplementary characters
        let code_point = if (0xD800..0xDC00).contains(&unit) {
            let (low, after_low) = code_unit(bytes, offset)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(format!("unpaired high surrogate U+{:04X}", unit));
            }
            offset = after_low;
            0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
        } else if (0xDC00..0xE000).contains(&unit) {
            return Err(format!("unpaired low surrogate U+{:04X}", unit));
        } else {
            unit
        };

        match char::from_u32(code_point) {
            Some(c) => decoded.push(c),
            None => return Err(format!("invalid code point U+{:X}", code_point)),
        }
    }
    Ok(decoded)
}
