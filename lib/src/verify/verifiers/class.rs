use super::ClassVerifier;
use crate::jvm::model::Class;
use crate::jvm::UnqualifiedName;
use crate::verify::{
    ClassLocation, ClassParentsVisitor, CompatibilityProblem, Location, MethodLocation,
    VerificationContext,
};
use std::collections::{HashMap, HashSet};

/// Flags superclasses that have turned into interfaces
pub struct SuperClassVerifier;

impl ClassVerifier for SuperClassVerifier {
    fn verify_class(&self, class: &Class, context: &VerificationContext) {
        let super_name = match &class.super_class {
            Some(super_name) => super_name,
            None => return,
        };
        let usage = Location::Class(ClassLocation::new(class.name.clone()));
        let found = match context.resolve_class_or_problem(super_name, &usage) {
            Some(found) => found,
            None => return,
        };
        if found.class.is_interface() {
            context.register_problem(CompatibilityProblem::SuperClassBecameInterface {
                child: ClassLocation::new(class.name.clone()),
                interface: ClassLocation::new(super_name.clone()),
            });
        }
    }
}

/// Flags inheritance from classes that have become final
pub struct InheritFromFinalClassVerifier;

impl ClassVerifier for InheritFromFinalClassVerifier {
    fn verify_class(&self, class: &Class, context: &VerificationContext) {
        let super_name = match &class.super_class {
            Some(super_name) => super_name,
            None => return,
        };
        let usage = Location::Class(ClassLocation::new(class.name.clone()));
        let found = match context.resolve_class_or_problem(super_name, &usage) {
            Some(found) => found,
            None => return,
        };
        if found.class.is_final() {
            context.register_problem(CompatibilityProblem::InheritFromFinalClass {
                child: ClassLocation::new(class.name.clone()),
                final_class: ClassLocation::new(super_name.clone()),
            });
        }
    }
}

/// Finds inherited abstract methods that a concrete class never implements
///
/// Walks the whole hierarchy (interfaces included) collecting abstract
/// declarations and implementations keyed by name and descriptor. The
/// declaration closest to the class is the one reported.
pub struct AbstractMethodVerifier;

impl ClassVerifier for AbstractMethodVerifier {
    fn verify_class(&self, class: &Class, context: &VerificationContext) {
        if class.is_abstract() || class.is_interface() {
            return;
        }

        let mut abstract_methods: HashMap<(UnqualifiedName, String), MethodLocation> =
            HashMap::new();
        let mut implemented: HashSet<(UnqualifiedName, String)> = HashSet::new();

        let visitor = ClassParentsVisitor::new(context, true);
        visitor.visit_class(class, true, |ancestor| {
            for method in &ancestor.methods {
                if method.is_private() || method.is_static() {
                    continue;
                }
                let key = (method.name.clone(), method.descriptor.clone());
                if method.is_abstract() {
                    // The walk runs nearest-first, so the first declaration
                    // seen for a key is the one to report
                    abstract_methods
                        .entry(key)
                        .or_insert_with(|| MethodLocation::of(ancestor, method));
                } else {
                    implemented.insert(key);
                }
            }
            true
        });

        for (key, abstract_method) in abstract_methods {
            if !implemented.contains(&key) {
                context.register_problem(CompatibilityProblem::MethodNotImplemented {
                    abstract_method,
                    incomplete_class: ClassLocation::new(class.name.clone()),
                });
            }
        }
    }
}
