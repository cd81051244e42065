use super::{FoundClass, Origin, Resolution, Resolver};
use crate::jvm::model::Class;
use crate::jvm::{BinaryName, Name};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolver over a fixed set of already parsed classes
///
/// Useful for tests and for classes synthesized in memory.
pub struct FixedResolver {
    origin: Origin,
    classes: HashMap<BinaryName, Arc<Class>>,
}

impl FixedResolver {
    pub fn new(label: impl Into<String>) -> FixedResolver {
        FixedResolver {
            origin: Origin::new(label),
            classes: HashMap::new(),
        }
    }

    pub fn add_class(&mut self, class: Class) {
        self.classes.insert(class.name.clone(), Arc::new(class));
    }

    /// Names of all classes in the set, sorted
    pub fn class_names(&self) -> Vec<BinaryName> {
        let mut names: Vec<BinaryName> = self.classes.keys().cloned().collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }
}

impl Resolver for FixedResolver {
    fn resolve(&self, name: &BinaryName) -> Resolution {
        match self.classes.get(name) {
            Some(class) => Resolution::Found(FoundClass {
                class: Arc::clone(class),
                origin: self.origin.clone(),
            }),
            None => Resolution::NotFound(format!(
                "class {} is not in {}",
                name.as_str(),
                self.origin
            )),
        }
    }
}
