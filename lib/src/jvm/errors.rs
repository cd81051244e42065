use std::fmt;

/// Ways the byte-level parse of a class file can fail
#[derive(Debug)]
pub enum ClassFileError {
    IoError(std::io::Error),

    /// Input ran out before the structure being parsed did
    UnexpectedEof,

    /// File does not start with `0xCAFEBABE`
    BadMagic(u32),

    /// Constant pool entry starts with an unknown tag
    BadConstantTag(u8),

    /// Constant pool index that is unpopulated or holds the wrong kind of constant
    BadConstantIndex { index: u16, expected: &'static str },

    /// `CONSTANT_Utf8` entry whose bytes are not valid modified UTF-8
    BadUtf8 { detail: String },

    /// Name that does not satisfy the grammar its position requires
    BadName(String),

    /// Undecodable instruction in a `Code` attribute
    BadInstruction { opcode: u8, offset: usize },

    /// Bytes left over after the end of the class file structure
    TrailingBytes { count: usize },
}

impl fmt::Display for ClassFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassFileError::IoError(err) => write!(f, "{}", err),
            ClassFileError::UnexpectedEof => write!(f, "unexpected end of class file"),
            ClassFileError::BadMagic(magic) => write!(f, "bad magic bytes 0x{:08X}", magic),
            ClassFileError::BadConstantTag(tag) => {
                write!(f, "unknown constant pool tag {}", tag)
            }
            ClassFileError::BadConstantIndex { index, expected } => {
                write!(
                    f,
                    "constant pool index {} does not point at {}",
                    index, expected
                )
            }
            ClassFileError::BadUtf8 { detail } => {
                write!(f, "malformed modified UTF-8 ({})", detail)
            }
            ClassFileError::BadName(msg) => write!(f, "{}", msg),
            ClassFileError::BadInstruction { opcode, offset } => {
                write!(
                    f,
                    "undecodable instruction 0x{:02X} at offset {}",
                    opcode, offset
                )
            }
            ClassFileError::TrailingBytes { count } => {
                write!(f, "{} bytes left over after class file end", count)
            }
        }
    }
}

impl From<std::io::Error> for ClassFileError {
    fn from(err: std::io::Error) -> ClassFileError {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            ClassFileError::UnexpectedEof
        } else {
            ClassFileError::IoError(err)
        }
    }
}
