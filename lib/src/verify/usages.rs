use super::MethodLocation;
use crate::jvm::UnqualifiedName;
use std::fmt;

/// Invocation of a method whose declaring class marks it deprecated
///
/// Deprecation reports sit alongside compatibility problems but never fail a
/// verification: the call still resolves and still works. They deduplicate
/// structurally, one report per deprecated method and call site.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeprecatedMethodUsage {
    /// The deprecated method, at its declaration
    pub deprecated_method: MethodLocation,

    /// The method whose body makes the call
    pub usage: MethodLocation,
}

impl DeprecatedMethodUsage {
    fn element_word(&self) -> &'static str {
        if self.deprecated_method.method_name == UnqualifiedName::INIT {
            "constructor"
        } else {
            "method"
        }
    }

    /// One line naming the deprecated method
    pub fn short_description(&self) -> String {
        format!(
            "Deprecated {} usage {}",
            self.element_word(),
            self.deprecated_method
        )
    }

    /// Full sentence naming the call site as well
    pub fn full_description(&self) -> String {
        format!(
            "Deprecated {} {} is used in {}",
            self.element_word(),
            self.deprecated_method,
            self.usage
        )
    }
}

impl fmt::Display for DeprecatedMethodUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_description())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::{BinaryName, Name};

    fn location(class: &str, method: &str, descriptor: &str) -> MethodLocation {
        MethodLocation {
            class_name: BinaryName::from_string(String::from(class)).unwrap(),
            method_name: UnqualifiedName::from_string(String::from(method)).unwrap(),
            descriptor: String::from(descriptor),
        }
    }

    #[test]
    fn descriptions_name_both_methods() {
        let usage = DeprecatedMethodUsage {
            deprecated_method: location("org/example/Api", "call", "(I)V"),
            usage: location("org/example/Caller", "run", "()V"),
        };
        assert_eq!(
            usage.short_description(),
            "Deprecated method usage org.example.Api.call(int) : void"
        );
        assert_eq!(
            usage.full_description(),
            "Deprecated method org.example.Api.call(int) : void is used in \
             org.example.Caller.run() : void"
        );
    }

    #[test]
    fn constructors_are_worded_as_constructors() {
        let usage = DeprecatedMethodUsage {
            deprecated_method: MethodLocation {
                class_name: BinaryName::from_string(String::from("org/example/Api")).unwrap(),
                method_name: UnqualifiedName::INIT,
                descriptor: String::from("()V"),
            },
            usage: location("org/example/Caller", "run", "()V"),
        };
        assert_eq!(
            usage.short_description(),
            "Deprecated constructor usage org.example.Api.<init>() : void"
        );
    }
}
