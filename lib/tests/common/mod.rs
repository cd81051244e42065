//! Hand-assembled class file fixtures
//!
//! Tests build small but complete class files from these helpers instead of
//! checking in binary fixtures.

#![allow(dead_code)]

use std::collections::HashMap;

/// Interns constants and hands out their one-based pool indices
///
/// Fixture strings are ASCII, so the modified UTF-8 encoding is the identity.
#[derive(Default)]
pub struct ConstantPoolBuilder {
    entries: Vec<Vec<u8>>,
    utf8_indices: HashMap<String, u16>,
    class_indices: HashMap<String, u16>,
    name_and_type_indices: HashMap<(String, String), u16>,
    member_indices: HashMap<(u8, String, String, String), u16>,
}

impl ConstantPoolBuilder {
    fn push(&mut self, entry: Vec<u8>) -> u16 {
        self.entries.push(entry);
        self.entries.len() as u16
    }

    pub fn utf8(&mut self, text: &str) -> u16 {
        if let Some(&index) = self.utf8_indices.get(text) {
            return index;
        }
        let mut entry = vec![1u8];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        let index = self.push(entry);
        self.utf8_indices.insert(String::from(text), index);
        index
    }

    pub fn class(&mut self, binary_name: &str) -> u16 {
        if let Some(&index) = self.class_indices.get(binary_name) {
            return index;
        }
        let name_index = self.utf8(binary_name);
        let mut entry = vec![7u8];
        entry.extend_from_slice(&name_index.to_be_bytes());
        let index = self.push(entry);
        self.class_indices.insert(String::from(binary_name), index);
        index
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let key = (String::from(name), String::from(descriptor));
        if let Some(&index) = self.name_and_type_indices.get(&key) {
            return index;
        }
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        let mut entry = vec![12u8];
        entry.extend_from_slice(&name_index.to_be_bytes());
        entry.extend_from_slice(&descriptor_index.to_be_bytes());
        let index = self.push(entry);
        self.name_and_type_indices.insert(key, index);
        index
    }

    pub fn field_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        self.member_ref(9, owner, name, descriptor)
    }

    pub fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        self.member_ref(10, owner, name, descriptor)
    }

    pub fn interface_method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        self.member_ref(11, owner, name, descriptor)
    }

    fn member_ref(&mut self, tag: u8, owner: &str, name: &str, descriptor: &str) -> u16 {
        let key = (
            tag,
            String::from(owner),
            String::from(name),
            String::from(descriptor),
        );
        if let Some(&index) = self.member_indices.get(&key) {
            return index;
        }
        let class_index = self.class(owner);
        let name_and_type_index = self.name_and_type(name, descriptor);
        let mut entry = vec![tag];
        entry.extend_from_slice(&class_index.to_be_bytes());
        entry.extend_from_slice(&name_and_type_index.to_be_bytes());
        let index = self.push(entry);
        self.member_indices.insert(key, index);
        index
    }

    pub fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&((self.entries.len() + 1) as u16).to_be_bytes());
        for entry in &self.entries {
            out.extend_from_slice(entry);
        }
    }
}

/// Reference-bearing instruction to place in a fixture method body
pub enum BodyRef {
    New(&'static str),
    CheckCast(&'static str),
    GetField {
        owner: &'static str,
        name: &'static str,
        descriptor: &'static str,
    },
    InvokeVirtual {
        owner: &'static str,
        name: &'static str,
        descriptor: &'static str,
    },
    InvokeInterface {
        owner: &'static str,
        name: &'static str,
        descriptor: &'static str,
    },
}

impl BodyRef {
    fn assemble(&self, code: &mut Vec<u8>, pool: &mut ConstantPoolBuilder) {
        match self {
            BodyRef::New(class) => {
                code.push(0xBB);
                code.extend_from_slice(&pool.class(class).to_be_bytes());
            }
            BodyRef::CheckCast(class) => {
                code.push(0xC0);
                code.extend_from_slice(&pool.class(class).to_be_bytes());
            }
            BodyRef::GetField {
                owner,
                name,
                descriptor,
            } => {
                code.push(0xB4);
                code.extend_from_slice(&pool.field_ref(owner, name, descriptor).to_be_bytes());
            }
            BodyRef::InvokeVirtual {
                owner,
                name,
                descriptor,
            } => {
                code.push(0xB6);
                code.extend_from_slice(&pool.method_ref(owner, name, descriptor).to_be_bytes());
            }
            BodyRef::InvokeInterface {
                owner,
                name,
                descriptor,
            } => {
                code.push(0xB9);
                code.extend_from_slice(
                    &pool
                        .interface_method_ref(owner, name, descriptor)
                        .to_be_bytes(),
                );
                code.push(1); // argument slot count
                code.push(0);
            }
        }
    }
}

struct MethodEntry {
    access_flags: u16,
    name: &'static str,
    descriptor: &'static str,
    body: Option<Vec<BodyRef>>,
    deprecated: bool,
}

/// Builder for one class file's bytes
pub struct ClassBytes {
    name: &'static str,
    super_class: Option<&'static str>,
    access_flags: u16,
    interfaces: Vec<&'static str>,
    signature: Option<&'static str>,
    fields: Vec<(u16, &'static str, &'static str)>,
    methods: Vec<MethodEntry>,
}

impl ClassBytes {
    /// Public class extending `java/lang/Object`
    pub fn new(name: &'static str) -> ClassBytes {
        ClassBytes {
            name,
            super_class: Some("java/lang/Object"),
            access_flags: 0x0021, // public super
            interfaces: vec![],
            signature: None,
            fields: vec![],
            methods: vec![],
        }
    }

    /// Public interface
    pub fn interface(name: &'static str) -> ClassBytes {
        let mut built = ClassBytes::new(name);
        built.access_flags = 0x0601; // public interface abstract
        built
    }

    pub fn flags(mut self, access_flags: u16) -> ClassBytes {
        self.access_flags = access_flags;
        self
    }

    pub fn extends(mut self, super_class: &'static str) -> ClassBytes {
        self.super_class = Some(super_class);
        self
    }

    pub fn no_super_class(mut self) -> ClassBytes {
        self.super_class = None;
        self
    }

    pub fn implements(mut self, interface: &'static str) -> ClassBytes {
        self.interfaces.push(interface);
        self
    }

    pub fn generic_signature(mut self, signature: &'static str) -> ClassBytes {
        self.signature = Some(signature);
        self
    }

    pub fn field(
        mut self,
        access_flags: u16,
        name: &'static str,
        descriptor: &'static str,
    ) -> ClassBytes {
        self.fields.push((access_flags, name, descriptor));
        self
    }

    /// Method without a `Code` attribute (abstract or native)
    pub fn method(
        mut self,
        access_flags: u16,
        name: &'static str,
        descriptor: &'static str,
    ) -> ClassBytes {
        self.methods.push(MethodEntry {
            access_flags,
            name,
            descriptor,
            body: None,
            deprecated: false,
        });
        self
    }

    /// Method whose body is the given references followed by `return`
    pub fn method_with_body(
        mut self,
        access_flags: u16,
        name: &'static str,
        descriptor: &'static str,
        body: Vec<BodyRef>,
    ) -> ClassBytes {
        self.methods.push(MethodEntry {
            access_flags,
            name,
            descriptor,
            body: Some(body),
            deprecated: false,
        });
        self
    }

    /// Attach a `Deprecated` attribute to the most recently added method
    pub fn deprecated(mut self) -> ClassBytes {
        if let Some(entry) = self.methods.last_mut() {
            entry.deprecated = true;
        }
        self
    }

    pub fn emit(&self) -> Vec<u8> {
        let mut pool = ConstantPoolBuilder::default();

        let this_index = pool.class(self.name);
        let super_index = match self.super_class {
            Some(super_class) => pool.class(super_class),
            None => 0,
        };
        let interface_indices: Vec<u16> = self
            .interfaces
            .iter()
            .map(|interface| pool.class(interface))
            .collect();

        let field_infos: Vec<(u16, u16, u16)> = self
            .fields
            .iter()
            .map(|(access_flags, name, descriptor)| {
                (*access_flags, pool.utf8(name), pool.utf8(descriptor))
            })
            .collect();

        let mut method_blobs: Vec<Vec<u8>> = vec![];
        for entry in &self.methods {
            let name_index = pool.utf8(entry.name);
            let descriptor_index = pool.utf8(entry.descriptor);

            let mut blob = vec![];
            blob.extend_from_slice(&entry.access_flags.to_be_bytes());
            blob.extend_from_slice(&name_index.to_be_bytes());
            blob.extend_from_slice(&descriptor_index.to_be_bytes());

            let mut attribute_count = 0u16;
            let mut attributes = vec![];
            if let Some(references) = &entry.body {
                let mut code = vec![];
                for reference in references {
                    reference.assemble(&mut code, &mut pool);
                }
                code.push(0xB1); // return

                let code_name_index = pool.utf8("Code");
                attributes.extend_from_slice(&code_name_index.to_be_bytes());
                attributes.extend_from_slice(&((12 + code.len()) as u32).to_be_bytes());
                attributes.extend_from_slice(&4u16.to_be_bytes()); // max_stack
                attributes.extend_from_slice(&4u16.to_be_bytes()); // max_locals
                attributes.extend_from_slice(&(code.len() as u32).to_be_bytes());
                attributes.extend_from_slice(&code);
                attributes.extend_from_slice(&0u16.to_be_bytes()); // exception table
                attributes.extend_from_slice(&0u16.to_be_bytes()); // code attributes
                attribute_count += 1;
            }
            if entry.deprecated {
                let deprecated_name_index = pool.utf8("Deprecated");
                attributes.extend_from_slice(&deprecated_name_index.to_be_bytes());
                attributes.extend_from_slice(&0u32.to_be_bytes());
                attribute_count += 1;
            }

            blob.extend_from_slice(&attribute_count.to_be_bytes());
            blob.extend_from_slice(&attributes);
            method_blobs.push(blob);
        }

        // Class attributes: SourceFile always, Signature when requested
        let source_file_name_index = pool.utf8("SourceFile");
        let source_file_index = pool.utf8("Fixture.java");
        let signature_indices = self
            .signature
            .map(|signature| (pool.utf8("Signature"), pool.utf8(signature)));

        let mut out = vec![0xCAu8, 0xFE, 0xBA, 0xBE];
        out.extend_from_slice(&0u16.to_be_bytes()); // minor version
        out.extend_from_slice(&52u16.to_be_bytes()); // major version, Java 8
        pool.emit(&mut out);

        out.extend_from_slice(&self.access_flags.to_be_bytes());
        out.extend_from_slice(&this_index.to_be_bytes());
        out.extend_from_slice(&super_index.to_be_bytes());

        out.extend_from_slice(&(interface_indices.len() as u16).to_be_bytes());
        for interface_index in &interface_indices {
            out.extend_from_slice(&interface_index.to_be_bytes());
        }

        out.extend_from_slice(&(field_infos.len() as u16).to_be_bytes());
        for (access_flags, name_index, descriptor_index) in &field_infos {
            out.extend_from_slice(&access_flags.to_be_bytes());
            out.extend_from_slice(&name_index.to_be_bytes());
            out.extend_from_slice(&descriptor_index.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes()); // no attributes
        }

        out.extend_from_slice(&(method_blobs.len() as u16).to_be_bytes());
        for blob in &method_blobs {
            out.extend_from_slice(blob);
        }

        let attribute_count: u16 = if signature_indices.is_some() { 2 } else { 1 };
        out.extend_from_slice(&attribute_count.to_be_bytes());

        out.extend_from_slice(&source_file_name_index.to_be_bytes());
        out.extend_from_slice(&2u32.to_be_bytes());
        out.extend_from_slice(&source_file_index.to_be_bytes());

        if let Some((signature_name_index, signature_index)) = signature_indices {
            out.extend_from_slice(&signature_name_index.to_be_bytes());
            out.extend_from_slice(&2u32.to_be_bytes());
            out.extend_from_slice(&signature_index.to_be_bytes());
        }

        out
    }
}
