use super::{ClassLocation, Location, MethodLocation, MethodReference};
use crate::jvm::BinaryName;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Compatibility problem found while inspecting an artifact
///
/// Problems deduplicate structurally: equality and hashing cover every field
/// except the free-text `reason` of
/// [`CompatibilityProblem::InvalidClassFile`].
#[derive(Clone, Debug)]
pub enum CompatibilityProblem {
    /// A referenced class resolves nowhere and is not external
    ClassNotFound {
        class_name: BinaryName,
        usage: Location,
    },

    /// A referenced class exists but its definition cannot be produced
    InvalidClassFile {
        invalid_class: BinaryName,
        usage: Location,
        reason: String,
    },

    /// A superclass turned out to be an interface
    SuperClassBecameInterface {
        child: ClassLocation,
        interface: ClassLocation,
    },

    /// A class inherits from a final class
    InheritFromFinalClass {
        child: ClassLocation,
        final_class: ClassLocation,
    },

    /// A concrete class never implements an inherited abstract method
    MethodNotImplemented {
        abstract_method: MethodLocation,
        incomplete_class: ClassLocation,
    },

    /// A class overrides a method that is final in an ancestor
    OverridingFinalMethod {
        final_method: MethodLocation,
        invalid_class: ClassLocation,
    },

    /// An `invokeinterface` instruction whose host resolves to a class
    InvokeInterfaceOnClass {
        method_reference: MethodReference,
        caller: MethodLocation,
    },
}

impl CompatibilityProblem {
    /// Coarse category, used to group problems in reports
    pub fn problem_type(&self) -> &'static str {
        match self {
            CompatibilityProblem::ClassNotFound { .. } => "Class not found",
            CompatibilityProblem::InvalidClassFile { .. } => "Invalid class file",
            CompatibilityProblem::SuperClassBecameInterface { .. } => {
                "Incompatible change of super class to interface"
            }
            CompatibilityProblem::InheritFromFinalClass { .. } => {
                "Inheritance from a final class"
            }
            CompatibilityProblem::MethodNotImplemented { .. } => "Method not implemented",
            CompatibilityProblem::OverridingFinalMethod { .. } => "Overriding a final method",
            CompatibilityProblem::InvokeInterfaceOnClass { .. } => {
                "Incompatible change of interface to class"
            }
        }
    }

    /// One line naming the entities involved
    ///
    /// This is the text ignore patterns are matched against.
    pub fn short_description(&self) -> String {
        match self {
            CompatibilityProblem::ClassNotFound { class_name, .. } => {
                format!("Access to unresolved class {}", class_name.dotted())
            }
            CompatibilityProblem::InvalidClassFile { invalid_class, .. } => {
                format!("Invalid class file {}", invalid_class.dotted())
            }
            CompatibilityProblem::SuperClassBecameInterface { interface, .. } => {
                format!("Incompatible change of super class {} to interface", interface)
            }
            CompatibilityProblem::InheritFromFinalClass { final_class, .. } => {
                format!("Inheritance from a final class {}", final_class)
            }
            CompatibilityProblem::MethodNotImplemented { abstract_method, .. } => {
                format!("Abstract method {} is not implemented", abstract_method)
            }
            CompatibilityProblem::OverridingFinalMethod { final_method, .. } => {
                format!("Overriding a final method {}", final_method)
            }
            CompatibilityProblem::InvokeInterfaceOnClass { method_reference, .. } => {
                format!(
                    "Incompatible change of interface {} to class",
                    method_reference.host.dotted()
                )
            }
        }
    }

    /// Full sentence naming the usage site and the error this can cause at
    /// run time
    pub fn full_description(&self) -> String {
        match self {
            CompatibilityProblem::ClassNotFound { class_name, usage } => format!(
                "{} references an unresolved class {}. This can lead to a \
                 NoClassDefFoundError at run time.",
                usage_with_kind(usage),
                class_name.dotted()
            ),
            CompatibilityProblem::InvalidClassFile {
                invalid_class,
                usage,
                reason,
            } => format!(
                "{} references an invalid class {} ({}). This can lead to a VerifyError \
                 at run time.",
                usage_with_kind(usage),
                invalid_class.dotted(),
                reason
            ),
            CompatibilityProblem::SuperClassBecameInterface { child, interface } => format!(
                "Class {} has a super class {} which is actually an interface. This can \
                 lead to an IncompatibleClassChangeError at run time.",
                child, interface
            ),
            CompatibilityProblem::InheritFromFinalClass { child, final_class } => format!(
                "Class {} inherits from a final class {}. This can lead to a VerifyError \
                 at run time.",
                child, final_class
            ),
            CompatibilityProblem::MethodNotImplemented {
                abstract_method,
                incomplete_class,
            } => format!(
                "Concrete class {} inherits the abstract method {} but does not implement \
                 it. This can lead to an AbstractMethodError at run time.",
                incomplete_class, abstract_method
            ),
            CompatibilityProblem::OverridingFinalMethod {
                final_method,
                invalid_class,
            } => format!(
                "Class {} overrides the final method {}. This can lead to a VerifyError \
                 at run time.",
                invalid_class, final_method
            ),
            CompatibilityProblem::InvokeInterfaceOnClass {
                method_reference,
                caller,
            } => format!(
                "Method {} uses an invokeinterface instruction on {}, which resolves to \
                 a class, not an interface. This can lead to an \
                 IncompatibleClassChangeError at run time.",
                caller, method_reference
            ),
        }
    }
}

fn usage_with_kind(usage: &Location) -> String {
    match usage {
        Location::Class(location) => format!("Class {}", location),
        Location::Method(location) => format!("Method {}", location),
        Location::Field(location) => format!("Field {}", location),
    }
}

impl fmt::Display for CompatibilityProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_description())
    }
}

impl PartialEq for CompatibilityProblem {
    fn eq(&self, other: &CompatibilityProblem) -> bool {
        use CompatibilityProblem::*;
        match (self, other) {
            (
                ClassNotFound { class_name: n1, usage: u1 },
                ClassNotFound { class_name: n2, usage: u2 },
            ) => n1 == n2 && u1 == u2,
            (
                InvalidClassFile { invalid_class: c1, usage: u1, .. },
                InvalidClassFile { invalid_class: c2, usage: u2, .. },
            ) => c1 == c2 && u1 == u2,
            (
                SuperClassBecameInterface { child: c1, interface: i1 },
                SuperClassBecameInterface { child: c2, interface: i2 },
            ) => c1 == c2 && i1 == i2,
            (
                InheritFromFinalClass { child: c1, final_class: f1 },
                InheritFromFinalClass { child: c2, final_class: f2 },
            ) => c1 == c2 && f1 == f2,
            (
                MethodNotImplemented { abstract_method: m1, incomplete_class: c1 },
                MethodNotImplemented { abstract_method: m2, incomplete_class: c2 },
            ) => m1 == m2 && c1 == c2,
            (
                OverridingFinalMethod { final_method: m1, invalid_class: c1 },
                OverridingFinalMethod { final_method: m2, invalid_class: c2 },
            ) => m1 == m2 && c1 == c2,
            (
                InvokeInterfaceOnClass { method_reference: r1, caller: c1 },
                InvokeInterfaceOnClass { method_reference: r2, caller: c2 },
            ) => r1 == r2 && c1 == c2,
            _ => false,
        }
    }
}

impl Eq for CompatibilityProblem {}

impl Hash for CompatibilityProblem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use CompatibilityProblem::*;
        std::mem::discriminant(self).hash(state);
        match self {
            ClassNotFound { class_name, usage } => {
                class_name.hash(state);
                usage.hash(state);
            }
            InvalidClassFile { invalid_class, usage, reason: _ } => {
                invalid_class.hash(state);
                usage.hash(state);
            }
            SuperClassBecameInterface { child, interface } => {
                child.hash(state);
                interface.hash(state);
            }
            InheritFromFinalClass { child, final_class } => {
                child.hash(state);
                final_class.hash(state);
            }
            MethodNotImplemented { abstract_method, incomplete_class } => {
                abstract_method.hash(state);
                incomplete_class.hash(state);
            }
            OverridingFinalMethod { final_method, invalid_class } => {
                final_method.hash(state);
                invalid_class.hash(state);
            }
            InvokeInterfaceOnClass { method_reference, caller } => {
                method_reference.hash(state);
                caller.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::{Name, UnqualifiedName};
    use std::collections::HashSet;

    fn class_name(name: &str) -> BinaryName {
        BinaryName::from_string(String::from(name)).unwrap()
    }

    fn class_usage(name: &str) -> Location {
        Location::Class(ClassLocation::new(class_name(name)))
    }

    #[test]
    fn reason_is_not_part_of_identity() {
        let first = CompatibilityProblem::InvalidClassFile {
            invalid_class: class_name("org/example/Broken"),
            usage: class_usage("org/example/Caller"),
            reason: String::from("bad magic bytes 0x00000000"),
        };
        let second = CompatibilityProblem::InvalidClassFile {
            invalid_class: class_name("org/example/Broken"),
            usage: class_usage("org/example/Caller"),
            reason: String::from("truncated constant pool"),
        };

        assert_eq!(first, second, "reason wording must not split problems");

        let mut problems = HashSet::new();
        problems.insert(first);
        problems.insert(second);
        assert_eq!(problems.len(), 1, "problems differing only in reason deduplicate");
    }

    #[test]
    fn distinct_usages_are_distinct_problems() {
        let from_a = CompatibilityProblem::ClassNotFound {
            class_name: class_name("org/example/Gone"),
            usage: class_usage("org/example/A"),
        };
        let from_b = CompatibilityProblem::ClassNotFound {
            class_name: class_name("org/example/Gone"),
            usage: class_usage("org/example/B"),
        };

        assert_ne!(from_a, from_b);

        let mut problems = HashSet::new();
        problems.insert(from_a);
        problems.insert(from_b);
        assert_eq!(problems.len(), 2, "each usage site is its own problem");
    }

    #[test]
    fn descriptions_name_the_entities() {
        let problem = CompatibilityProblem::ClassNotFound {
            class_name: class_name("org/example/Gone"),
            usage: class_usage("org/example/Caller"),
        };
        assert_eq!(problem.problem_type(), "Class not found");
        assert_eq!(
            problem.short_description(),
            "Access to unresolved class org.example.Gone"
        );
        assert_eq!(
            problem.full_description(),
            "Class org.example.Caller references an unresolved class org.example.Gone. \
             This can lead to a NoClassDefFoundError at run time."
        );
    }

    #[test]
    fn invoke_interface_descriptions_use_java_rendering() {
        let problem = CompatibilityProblem::InvokeInterfaceOnClass {
            method_reference: MethodReference {
                host: class_name("org/example/Api"),
                method_name: UnqualifiedName::from_string(String::from("call")).unwrap(),
                descriptor: String::from("()V"),
            },
            caller: MethodLocation {
                class_name: class_name("org/example/Caller"),
                method_name: UnqualifiedName::from_string(String::from("run")).unwrap(),
                descriptor: String::from("()V"),
            },
        };
        assert_eq!(
            problem.short_description(),
            "Incompatible change of interface org.example.Api to class"
        );
        assert_eq!(
            problem.full_description(),
            "Method org.example.Caller.run() : void uses an invokeinterface instruction \
             on org.example.Api.call() : void, which resolves to a class, not an \
             interface. This can lead to an IncompatibleClassChangeError at run time."
        );
    }
}
