use crate::jvm::{FieldAccessFlags, UnqualifiedName};

/// Semantic representation of a field
#[derive(Clone, Debug)]
pub struct Field {
    /// Name of the current field
    pub name: UnqualifiedName,

    /// Raw field descriptor, as spelled in the class file
    pub descriptor: String,

    pub access_flags: FieldAccessFlags,

    /// Generic field signature
    ///
    /// [Format](https://docs.oracle.com/javase/specs/jvms/se11/html/jvms-4.html#jvms-4.7.9.1)
    pub generic_signature: Option<String>,
}

impl Field {
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(FieldAccessFlags::STATIC)
    }

    pub fn is_final(&self) -> bool {
        self.access_flags.contains(FieldAccessFlags::FINAL)
    }
}
