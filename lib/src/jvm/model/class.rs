use crate::jvm::model::{Field, Method};
use crate::jvm::{BinaryName, ClassAccessFlags, UnqualifiedName};

/// Semantic representation of a class
#[derive(Clone, Debug)]
pub struct Class {
    /// Name of the current class
    pub name: BinaryName,

    pub access_flags: ClassAccessFlags,

    /// Superclass (`None` for `java/lang/Object` and module-info classes)
    pub super_class: Option<BinaryName>,

    /// Directly implemented interfaces, in declaration order
    pub interfaces: Vec<BinaryName>,

    /// Fields
    pub fields: Vec<Field>,

    /// Methods
    pub methods: Vec<Method>,

    /// Generic class signature
    ///
    /// [Format](https://docs.oracle.com/javase/specs/jvms/se11/html/jvms-4.html#jvms-4.7.9.1)
    pub generic_signature: Option<String>,
}

impl Class {
    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }

    pub fn is_final(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::FINAL)
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::ABSTRACT)
    }

    /// Find a declared method by name and raw descriptor
    pub fn method(&self, name: &UnqualifiedName, descriptor: &str) -> Option<&Method> {
        self.methods
            .iter()
            .find(|method| &method.name == name && method.descriptor == descriptor)
    }
}
