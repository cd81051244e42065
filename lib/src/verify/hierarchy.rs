use super::{ClassLocation, CompatibilityProblem, Location, VerificationContext};
use crate::jvm::model::Class;
use crate::jvm::BinaryName;
use std::collections::HashSet;

/// Depth-first walk over a class and its ancestors
///
/// Each entered class has its superclass chain visited before its interfaces,
/// and interfaces are visited in declaration order. Ancestors are resolved
/// through the context, so a missing or corrupt parent registers its problem
/// and quietly ends that branch. A visited set bounds the walk on diamond
/// hierarchies and inheritance cycles.
pub struct ClassParentsVisitor<'a> {
    context: &'a VerificationContext,
    visit_interfaces: bool,
}

impl<'a> ClassParentsVisitor<'a> {
    pub fn new(context: &'a VerificationContext, visit_interfaces: bool) -> ClassParentsVisitor<'a> {
        ClassParentsVisitor {
            context,
            visit_interfaces,
        }
    }

    /// Call `on_enter` on `class` (when `visit_self` is set) and then on every
    /// ancestor that resolves
    ///
    /// Returning `false` from `on_enter` prunes the walk below that class.
    pub fn visit_class(
        &self,
        class: &Class,
        visit_self: bool,
        mut on_enter: impl FnMut(&Class) -> bool,
    ) {
        let mut visited: HashSet<BinaryName> = HashSet::new();
        visited.insert(class.name.clone());

        if visit_self && !on_enter(class) {
            return;
        }

        // Entries are (parent name, name of the class that listed it)
        let mut pending: Vec<(BinaryName, BinaryName)> = vec![];
        self.queue_parents(class, &mut visited, &mut pending);

        while let Some((parent_name, referrer)) = pending.pop() {
            let usage = Location::Class(ClassLocation::new(referrer));
            let found = match self.context.resolve_class_or_problem(&parent_name, &usage) {
                Some(found) => found,
                None => continue,
            };
            if !on_enter(&found.class) {
                continue;
            }
            self.queue_parents(&found.class, &mut visited, &mut pending);
        }
    }

    fn queue_parents(
        &self,
        class: &Class,
        visited: &mut HashSet<BinaryName>,
        pending: &mut Vec<(BinaryName, BinaryName)>,
    ) {
        // Interfaces are pushed first (reversed) so that popping yields the
        // superclass, then the interfaces in declaration order
        if self.visit_interfaces {
            for interface in class.interfaces.iter().rev() {
                if visited.insert(interface.clone()) {
                    pending.push((interface.clone(), class.name.clone()));
                }
            }
        }

        if let Some(super_name) = &class.super_class {
            if super_name == &class.name {
                self.context
                    .register_problem(CompatibilityProblem::InvalidClassFile {
                        invalid_class: class.name.clone(),
                        usage: Location::Class(ClassLocation::new(class.name.clone())),
                        reason: String::from("class lists itself as its own superclass"),
                    });
            } else if visited.insert(super_name.clone()) {
                pending.push((super_name.clone(), class.name.clone()));
            }
        }
    }
}
