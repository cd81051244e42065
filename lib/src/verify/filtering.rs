use super::{ArtifactId, CompatibilityProblem, ConfigError};
use regex::Regex;

/// Verdict of a [`ProblemFilter`] on one problem
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterResult {
    Report,
    /// Suppress the problem, with a reason suitable for logging
    Ignore(String),
}

/// Decides whether a registered problem makes it into the final report
pub trait ProblemFilter: Send + Sync {
    fn should_report(
        &self,
        problem: &CompatibilityProblem,
        artifact: &ArtifactId,
    ) -> FilterResult;
}

/// One suppression rule: an optional artifact id, an optional version, and a
/// pattern the problem's short description must fully match
#[derive(Clone, Debug)]
pub struct IgnoreCondition {
    artifact_id: Option<String>,
    version: Option<String>,
    pattern: Regex,
    source: String,
}

impl IgnoreCondition {
    pub fn new(
        artifact_id: Option<String>,
        version: Option<String>,
        pattern: &str,
    ) -> Result<IgnoreCondition, ConfigError> {
        // The pattern must cover the whole description, not a substring of it
        let anchored = format!("^(?:{})$", pattern);
        let compiled = Regex::new(&anchored).map_err(|error| ConfigError::BadIgnorePattern {
            pattern: String::from(pattern),
            error,
        })?;
        Ok(IgnoreCondition {
            artifact_id,
            version,
            pattern: compiled,
            source: String::from(pattern),
        })
    }

    /// Parse a condition written as `[artifact-id:[version:]]pattern`
    ///
    /// One field is a bare pattern, two are `artifact-id:pattern`, three are
    /// `artifact-id:version:pattern`. An empty artifact id or version field
    /// means "any". A pattern that itself contains `:` needs the three-field
    /// form.
    pub fn parse(line: &str) -> Result<IgnoreCondition, ConfigError> {
        let mut fields: Vec<&str> = line.splitn(3, ':').collect();
        let pattern = fields.pop().unwrap_or(line);
        let artifact_id = fields.first().copied().and_then(non_empty);
        let version = fields.get(1).copied().and_then(non_empty);
        IgnoreCondition::new(artifact_id, version, pattern.trim())
    }

    fn applies_to(&self, problem: &CompatibilityProblem, artifact: &ArtifactId) -> bool {
        if let Some(artifact_id) = &self.artifact_id {
            if artifact_id != &artifact.id {
                return false;
            }
        }
        if let Some(version) = &self.version {
            if version != &artifact.version {
                return false;
            }
        }
        self.pattern.is_match(&problem.short_description())
    }
}

fn non_empty(field: &str) -> Option<String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(String::from(trimmed))
    }
}

/// Filter backed by a list of [`IgnoreCondition`]s
///
/// The first condition that applies suppresses the problem.
pub struct IgnoredProblemsFilter {
    conditions: Vec<IgnoreCondition>,
}

impl IgnoredProblemsFilter {
    pub fn new(conditions: Vec<IgnoreCondition>) -> IgnoredProblemsFilter {
        IgnoredProblemsFilter { conditions }
    }
}

impl ProblemFilter for IgnoredProblemsFilter {
    fn should_report(
        &self,
        problem: &CompatibilityProblem,
        artifact: &ArtifactId,
    ) -> FilterResult {
        for condition in &self.conditions {
            if condition.applies_to(problem, artifact) {
                return FilterResult::Ignore(format!(
                    "the problem matches the ignore pattern \"{}\"",
                    condition.source
                ));
            }
        }
        FilterResult::Report
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::{BinaryName, Name};
    use crate::verify::{ClassLocation, Location};

    // Short description: "Access to unresolved class org.example.Gone"
    fn sample_problem() -> CompatibilityProblem {
        CompatibilityProblem::ClassNotFound {
            class_name: BinaryName::from_string(String::from("org/example/Gone")).unwrap(),
            usage: Location::Class(ClassLocation::new(
                BinaryName::from_string(String::from("org/example/Caller")).unwrap(),
            )),
        }
    }

    fn artifact() -> ArtifactId {
        ArtifactId::new("org.example.plugin", "1.2.0")
    }

    fn filter_of(line: &str) -> IgnoredProblemsFilter {
        IgnoredProblemsFilter::new(vec![IgnoreCondition::parse(line).unwrap()])
    }

    #[test]
    fn parse_field_forms() {
        let bare = IgnoreCondition::parse("Access to .*").unwrap();
        assert!(bare.artifact_id.is_none());
        assert!(bare.version.is_none());

        let scoped = IgnoreCondition::parse("org.example.plugin:Access to .*").unwrap();
        assert_eq!(scoped.artifact_id.as_deref(), Some("org.example.plugin"));
        assert!(scoped.version.is_none());

        let pinned = IgnoreCondition::parse("org.example.plugin:1.2.0:Access to .*").unwrap();
        assert_eq!(pinned.artifact_id.as_deref(), Some("org.example.plugin"));
        assert_eq!(pinned.version.as_deref(), Some("1.2.0"));

        let unscoped = IgnoreCondition::parse("::Access to .*").unwrap();
        assert!(
            unscoped.artifact_id.is_none() && unscoped.version.is_none(),
            "empty fields mean any artifact and any version"
        );
    }

    #[test]
    fn patterns_match_whole_descriptions() {
        assert_eq!(
            filter_of("unresolved").should_report(&sample_problem(), &artifact()),
            FilterResult::Report,
            "a bare substring must not suppress anything"
        );
        assert!(
            matches!(
                filter_of(".*unresolved.*").should_report(&sample_problem(), &artifact()),
                FilterResult::Ignore(_)
            ),
            "a pattern covering the whole description suppresses"
        );
    }

    #[test]
    fn conditions_scope_to_artifact_and_version() {
        assert_eq!(
            filter_of("other.plugin:Access to .*").should_report(&sample_problem(), &artifact()),
            FilterResult::Report,
            "conditions for other artifacts do not apply"
        );
        assert_eq!(
            filter_of("org.example.plugin:9.9.9:Access to .*")
                .should_report(&sample_problem(), &artifact()),
            FilterResult::Report,
            "version-pinned conditions skip other versions"
        );
        assert!(matches!(
            filter_of("org.example.plugin:1.2.0:Access to .*")
                .should_report(&sample_problem(), &artifact()),
            FilterResult::Ignore(_)
        ));
    }

    #[test]
    fn bad_patterns_are_configuration_errors() {
        assert!(matches!(
            IgnoreCondition::parse("Access to ["),
            Err(ConfigError::BadIgnorePattern { .. })
        ));
    }
}
