use super::ConfigError;
use crate::jvm::{BinaryName, Name, UnqualifiedName};

/// Package prefixes whose classes live outside the resolver's world
///
/// A class under one of these prefixes that fails to resolve is assumed to be
/// supplied by the runtime rather than missing, so no problem is reported for
/// it.
#[derive(Clone, Debug)]
pub struct ExternalClasses {
    /// Normalized to `/`-separated package paths without a trailing separator
    prefixes: Vec<String>,
}

impl ExternalClasses {
    /// Build the policy from prefix entries
    ///
    /// Entries may be spelled `java.lang` or `java/lang`, with or without a
    /// trailing separator. Empty entries and entries that are not package
    /// paths are configuration errors.
    pub fn new(
        entries: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<ExternalClasses, ConfigError> {
        let mut prefixes = vec![];
        for entry in entries {
            let entry = entry.as_ref();
            let normalized = entry.trim().replace('.', "/");
            let normalized = normalized.strip_suffix('/').unwrap_or(&normalized);
            if normalized.is_empty() {
                return Err(ConfigError::EmptyExternalPrefix);
            }
            for segment in normalized.split('/') {
                if let Err(reason) = UnqualifiedName::check_valid(segment) {
                    return Err(ConfigError::BadExternalPrefix {
                        entry: String::from(entry),
                        reason,
                    });
                }
            }
            prefixes.push(String::from(normalized));
        }
        Ok(ExternalClasses { prefixes })
    }

    /// The packages a JDK ships
    pub fn jdk_defaults() -> ExternalClasses {
        ExternalClasses {
            prefixes: ["java", "javax", "jdk", "sun", "com/sun"]
                .iter()
                .map(|prefix| String::from(*prefix))
                .collect(),
        }
    }

    /// Whether the named class falls under one of the prefixes
    ///
    /// Matching respects package boundaries: `java` covers `java/lang/Object`
    /// but not `javafx/scene/Scene`.
    pub fn is_external(&self, name: &BinaryName) -> bool {
        self.prefixes.iter().any(|prefix| {
            name.as_str()
                .strip_prefix(prefix.as_str())
                .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn class_name(name: &str) -> BinaryName {
        BinaryName::from_string(String::from(name)).unwrap()
    }

    #[test]
    fn jdk_defaults_cover_runtime_packages() {
        let externals = ExternalClasses::jdk_defaults();
        assert!(externals.is_external(&class_name("java/lang/Object")));
        assert!(externals.is_external(&class_name("javax/swing/JPanel")));
        assert!(externals.is_external(&class_name("com/sun/source/tree/Tree")));
        assert!(
            !externals.is_external(&class_name("org/example/Main")),
            "application packages are not external"
        );
    }

    #[test]
    fn matching_respects_package_boundaries() {
        let externals = ExternalClasses::new(["java"]).unwrap();
        assert!(externals.is_external(&class_name("java/util/List")));
        assert!(
            externals.is_external(&class_name("java")),
            "a class named exactly like the prefix matches"
        );
        assert!(
            !externals.is_external(&class_name("javafx/scene/Scene")),
            "matching must stop at a package boundary"
        );
    }

    #[test]
    fn dotted_and_trailing_separator_spellings() {
        let externals = ExternalClasses::new(["org.slf4j.", "kotlin/"]).unwrap();
        assert!(externals.is_external(&class_name("org/slf4j/Logger")));
        assert!(externals.is_external(&class_name("kotlin/Unit")));
        assert!(!externals.is_external(&class_name("kotlinx/coroutines/Job")));
    }

    #[test]
    fn bad_entries_are_rejected() {
        assert!(
            matches!(
                ExternalClasses::new(["  "]),
                Err(ConfigError::EmptyExternalPrefix)
            ),
            "blank entries are rejected"
        );
        assert!(
            ExternalClasses::new(["java..lang"]).is_err(),
            "empty package segments are rejected"
        );
        assert!(
            ExternalClasses::new(["[Ljava/lang/Object;"]).is_err(),
            "descriptors are not package prefixes"
        );
    }
}
