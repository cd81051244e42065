use crate::jvm::{BinaryName, RefType, UnqualifiedName};

/// Instructions that reference a class, field, or method
///
/// Only these matter for compatibility analysis, so the rest of a method body
/// is dropped at parse time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// `new`, `anewarray`, `multianewarray`, `checkcast`, `instanceof`
    Type {
        kind: TypeOperation,
        class: RefType<BinaryName>,
    },

    /// `getstatic`, `putstatic`, `getfield`, `putfield`
    Field {
        kind: FieldOperation,
        owner: RefType<BinaryName>,
        name: UnqualifiedName,
        descriptor: String,
    },

    /// `invokevirtual`, `invokespecial`, `invokestatic`, `invokeinterface`
    Method {
        kind: MethodOperation,
        owner: RefType<BinaryName>,
        name: UnqualifiedName,
        descriptor: String,
    },
}

impl Instruction {
    /// Class the instruction refers to, unless the reference is a primitive array
    pub fn referenced_class(&self) -> Option<&BinaryName> {
        match self {
            Instruction::Type { class, .. } => class.object_class(),
            Instruction::Field { owner, .. } | Instruction::Method { owner, .. } => {
                owner.object_class()
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeOperation {
    New,
    ANewArray,
    MultiANewArray,
    CheckCast,
    InstanceOf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldOperation {
    GetStatic,
    PutStatic,
    GetField,
    PutField,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MethodOperation {
    InvokeVirtual,
    InvokeSpecial,
    InvokeStatic,
    InvokeInterface,
}
