use crate::jvm::model::{Class, Field, Method};
use crate::jvm::{
    BinaryName, FieldType, MethodDescriptor, Name, ParseDescriptor, UnqualifiedName,
};
use std::fmt;

/// Place in the inspected artifact where something was observed
///
/// Locations identify problems, so they are part of a problem's equality and
/// hash. Rendering follows Java source conventions rather than class file
/// ones (dotted package names, `int` instead of `I`).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Location {
    Class(ClassLocation),
    Method(MethodLocation),
    Field(FieldLocation),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Class(location) => location.fmt(f),
            Location::Method(location) => location.fmt(f),
            Location::Field(location) => location.fmt(f),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ClassLocation {
    pub class_name: BinaryName,
}

impl ClassLocation {
    pub fn new(class_name: BinaryName) -> ClassLocation {
        ClassLocation { class_name }
    }
}

impl fmt::Display for ClassLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class_name.dotted())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodLocation {
    pub class_name: BinaryName,
    pub method_name: UnqualifiedName,
    pub descriptor: String,
}

impl MethodLocation {
    pub fn of(class: &Class, method: &Method) -> MethodLocation {
        MethodLocation {
            class_name: class.name.clone(),
            method_name: method.name.clone(),
            descriptor: method.descriptor.clone(),
        }
    }
}

impl fmt::Display for MethodLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_method(f, &self.class_name, &self.method_name, &self.descriptor)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FieldLocation {
    pub class_name: BinaryName,
    pub field_name: UnqualifiedName,
    pub descriptor: String,
}

impl FieldLocation {
    pub fn of(class: &Class, field: &Field) -> FieldLocation {
        FieldLocation {
            class_name: class.name.clone(),
            field_name: field.name.clone(),
            descriptor: field.descriptor.clone(),
        }
    }
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered_type = match FieldType::<BinaryName>::parse(&self.descriptor) {
            Ok(field_type) => field_type.render_java(),
            Err(_) => self.descriptor.clone(),
        };
        write!(
            f,
            "{}.{} : {}",
            self.class_name.dotted(),
            self.field_name.as_str(),
            rendered_type
        )
    }
}

/// Method named at a call site, before any resolution has happened
///
/// Unlike a [`MethodLocation`], the host class of a reference may not even
/// exist.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodReference {
    pub host: BinaryName,
    pub method_name: UnqualifiedName,
    pub descriptor: String,
}

impl fmt::Display for MethodReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_method(f, &self.host, &self.method_name, &self.descriptor)
    }
}

/// Render `org.example.Widget.resize(int, java.lang.String) : void`
///
/// A descriptor that does not decode is appended raw, which keeps corrupt
/// input printable.
fn write_method(
    f: &mut fmt::Formatter<'_>,
    class_name: &BinaryName,
    method_name: &UnqualifiedName,
    descriptor: &str,
) -> fmt::Result {
    match MethodDescriptor::<BinaryName>::parse(descriptor) {
        Ok(parsed) => {
            write!(f, "{}.{}(", class_name.dotted(), method_name.as_str())?;
            for (position, parameter) in parsed.parameters.iter().enumerate() {
                if position > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&parameter.render_java())?;
            }
            f.write_str(") : ")?;
            match &parsed.return_type {
                Some(return_type) => f.write_str(&return_type.render_java()),
                None => f.write_str("void"),
            }
        }
        Err(_) => write!(
            f,
            "{}.{}{}",
            class_name.dotted(),
            method_name.as_str(),
            descriptor
        ),
    }
}
