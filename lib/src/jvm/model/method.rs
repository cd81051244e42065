use crate::jvm::model::Instruction;
use crate::jvm::{MethodAccessFlags, UnqualifiedName};

/// Semantic representation of a method
#[derive(Clone, Debug)]
pub struct Method {
    /// Name of the current method
    pub name: UnqualifiedName,

    /// Raw method descriptor, as spelled in the class file
    pub descriptor: String,

    pub access_flags: MethodAccessFlags,

    /// Class, field, and method references made by the method body
    ///
    /// Empty for methods without a `Code` attribute (abstract and native
    /// methods), and for bodies that reference nothing.
    pub instructions: Vec<Instruction>,

    /// Generic method signature
    ///
    /// [Format](https://docs.oracle.com/javase/specs/jvms/se11/html/jvms-4.html#jvms-4.7.9.1)
    pub generic_signature: Option<String>,

    /// Whether the method carries a `Deprecated` attribute
    pub is_deprecated: bool,
}

impl Method {
    pub fn is_private(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::PRIVATE)
    }

    pub fn is_static(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::STATIC)
    }

    pub fn is_final(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::FINAL)
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::ABSTRACT)
    }

    /// Instance initializer (`<init>`)
    pub fn is_constructor(&self) -> bool {
        self.name == UnqualifiedName::INIT
    }

    /// Class initializer (`<clinit>`)
    pub fn is_class_initializer(&self) -> bool {
        self.name == UnqualifiedName::CLINIT
    }
}
