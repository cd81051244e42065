use super::{BinaryName, Name};
use std::io::{Error, ErrorKind, Result};
use std::iter::Peekable;
use std::str::Chars;

/// Utility trait for reading descriptors out of their string representations
pub trait ParseDescriptor: Sized {
    /// Parse a full descriptor, rejecting trailing input
    fn parse(source: &str) -> Result<Self> {
        let mut chars = source.chars().peekable();
        let parsed = Self::parse_from(&mut chars)?;
        match chars.next() {
            None => Ok(parsed),
            Some(c) => Err(bad_input(format!("Unexpected leftover input '{}'", c))),
        }
    }

    /// Consume one descriptor off the front of a character stream
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self>;
}

fn bad_input(message: String) -> Error {
    Error::new(ErrorKind::InvalidInput, message)
}

fn early_end(message: String) -> Error {
    Error::new(ErrorKind::UnexpectedEof, message)
}

/// Primitive JVM types
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    /// Type named by a descriptor character, if it names one
    ///
    /// `V` is not a base type: `void` only ever appears as a method return
    /// and is modelled as the absence of a return type.
    pub const fn from_descriptor_char(c: char) -> Option<BaseType> {
        match c {
            'B' => Some(BaseType::Byte),
            'C' => Some(BaseType::Char),
            'D' => Some(BaseType::Double),
            'F' => Some(BaseType::Float),
            'I' => Some(BaseType::Int),
            'J' => Some(BaseType::Long),
            'S' => Some(BaseType::Short),
            'Z' => Some(BaseType::Boolean),
            _ => None,
        }
    }

    /// Spelling of the type in Java sources
    pub const fn java_name(&self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

impl ParseDescriptor for BaseType {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self> {
        match source.next() {
            Some(c) => BaseType::from_descriptor_char(c)
                .ok_or_else(|| bad_input(format!("Invalid base type character '{}'", c))),
            None => Err(early_end(String::from("Missing base type character"))),
        }
    }
}

/// Class, class-array, or primitive-array type
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RefType<Class> {
    Object(Class),
    ObjectArray(ArrayType<Class>),
    PrimitiveArray(ArrayType<BaseType>),
}

/// Array of some element type
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ArrayType<T> {
    /// Dimensions beyond the first (so 0 for `A[]`, 3 for `A[][][][]`)
    pub additional_dimensions: usize,

    /// Innermost element type (`A` for `A[][]`)
    pub element_type: T,
}

impl<T> ArrayType<T> {
    /// Full number of dimensions, counting the implicit first one
    pub const fn dimensions(&self) -> usize {
        self.additional_dimensions + 1
    }
}

impl ParseDescriptor for BinaryName {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self> {
        if source.next() != Some('L') {
            return Err(bad_input(String::from(
                "Expected object type to start with 'L'",
            )));
        }
        let mut class_name = String::new();
        loop {
            match source.next() {
                Some(';') => return BinaryName::from_string(class_name).map_err(bad_input),
                Some(c) => class_name.push(c),
                None => {
                    return Err(early_end(format!(
                        "Missing terminator for 'L{}'",
                        class_name
                    )))
                }
            }
        }
    }
}

impl<C: ParseDescriptor> ParseDescriptor for RefType<C> {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self> {
        match source.peek().copied() {
            Some('L') => Ok(RefType::Object(C::parse_from(source)?)),
            Some('[') => {
                let mut dimensions = 0;
                while source.next_if_eq(&'[').is_some() {
                    dimensions += 1;
                }
                let parsed = if source.peek().copied() == Some('L') {
                    RefType::ObjectArray(ArrayType {
                        additional_dimensions: dimensions - 1,
                        element_type: C::parse_from(source)?,
                    })
                } else {
                    RefType::PrimitiveArray(ArrayType {
                        additional_dimensions: dimensions - 1,
                        element_type: BaseType::parse_from(source)?,
                    })
                };
                Ok(parsed)
            }
            Some(c) => Err(bad_input(format!(
                "Invalid reference type character '{}'",
                c
            ))),
            None => Err(early_end(String::from("Missing reference type"))),
        }
    }
}

impl<C> RefType<C> {
    /// Class named by the type, if there is one
    ///
    /// Both `Foo` and `Foo[][]` name the class `Foo`, while `int[]` names no
    /// class at all.
    pub fn object_class(&self) -> Option<&C> {
        match self {
            RefType::Object(cls) => Some(cls),
            RefType::ObjectArray(arr) => Some(&arr.element_type),
            RefType::PrimitiveArray(_) => None,
        }
    }
}

impl RefType<BinaryName> {
    /// Render the type the way it is written in Java sources
    pub fn render_java(&self) -> String {
        match self {
            RefType::Object(cls) => cls.dotted(),
            RefType::ObjectArray(arr) => {
                let mut rendered = arr.element_type.dotted();
                for _ in 0..arr.dimensions() {
                    rendered.push_str("[]");
                }
                rendered
            }
            RefType::PrimitiveArray(arr) => {
                let mut rendered = String::from(arr.element_type.java_name());
                for _ in 0..arr.dimensions() {
                    rendered.push_str("[]");
                }
                rendered
            }
        }
    }
}

/// Any type a field, parameter, or return value can carry
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldType<Class> {
    Base(BaseType),
    Ref(RefType<Class>),
}

impl<C> FieldType<C> {
    /// Class named by the type, if there is one
    pub fn object_class(&self) -> Option<&C> {
        match self {
            FieldType::Base(_) => None,
            FieldType::Ref(reference_type) => reference_type.object_class(),
        }
    }
}

impl FieldType<BinaryName> {
    /// Render the type the way it is written in Java sources
    pub fn render_java(&self) -> String {
        match self {
            FieldType::Base(base_type) => String::from(base_type.java_name()),
            FieldType::Ref(reference_type) => reference_type.render_java(),
        }
    }
}

impl<C: ParseDescriptor> ParseDescriptor for FieldType<C> {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self> {
        match source.peek().copied() {
            None => Err(early_end(String::from("Missing field type"))),
            Some('L' | '[') => RefType::parse_from(source).map(FieldType::Ref),
            Some(c) if BaseType::from_descriptor_char(c).is_some() => {
                BaseType::parse_from(source).map(FieldType::Base)
            }
            Some(c) => Err(bad_input(format!("Invalid field type character '{}'", c))),
        }
    }
}

/// Parameter and return types of a method
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub struct MethodDescriptor<Class> {
    pub parameters: Vec<FieldType<Class>>,
    /// `None` stands for a `void` return
    pub return_type: Option<FieldType<Class>>,
}

impl<C: ParseDescriptor> ParseDescriptor for MethodDescriptor<C> {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self> {
        if source.next() != Some('(') {
            return Err(bad_input(String::from("Expected '(' for method")));
        }

        let mut parameters = vec![];
        while source.peek().copied() != Some(')') {
            parameters.push(FieldType::<C>::parse_from(source)?);
        }

        // The loop only exits on the closing paren
        let _ = source.next();

        let return_type = match source.peek().copied() {
            Some('V') => {
                let _ = source.next();
                None
            }
            _ => Some(FieldType::<C>::parse_from(source)?),
        };

        Ok(MethodDescriptor {
            parameters,
            return_type,
        })
    }
}
