//! Compatibility verification over resolved classes
//!
//! A [`VerificationContext`] ties together the identity of the inspected
//! artifact, a [`Resolver`], the external-class policy and the suppression
//! filters, and accumulates the [`CompatibilityProblem`]s that verifiers
//! register against it. [`verify_classes`] drives a [`VerifierPipeline`]
//! over a list of classes.

mod errors;
mod external;
mod filtering;
mod hierarchy;
mod location;
mod problems;
mod usages;
mod verifiers;

pub use errors::*;
pub use external::*;
pub use filtering::*;
pub use hierarchy::*;
pub use location::*;
pub use problems::*;
pub use usages::*;
pub use verifiers::*;

use crate::jvm::{BinaryName, Name};
use crate::resolve::{FoundClass, Resolution, Resolver};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Identity of the artifact under verification
///
/// Ignore conditions can scope themselves to an artifact id or to one of its
/// versions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactId {
    pub id: String,
    pub version: String,
}

impl ArtifactId {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> ArtifactId {
        ArtifactId {
            id: id.into(),
            version: version.into(),
        }
    }
}

/// Shared state of one verification run
///
/// Everything here is read-only once the context is built, except the
/// accumulated problem and deprecation sets, which sit behind mutexes so
/// verifiers can run from multiple threads.
pub struct VerificationContext {
    artifact: ArtifactId,
    resolver: Arc<dyn Resolver>,
    externals: ExternalClasses,
    filters: Vec<Box<dyn ProblemFilter>>,
    problems: Mutex<HashSet<CompatibilityProblem>>,
    deprecations: Mutex<HashSet<DeprecatedMethodUsage>>,
}

impl VerificationContext {
    pub fn new(
        artifact: ArtifactId,
        resolver: Arc<dyn Resolver>,
        externals: ExternalClasses,
    ) -> VerificationContext {
        VerificationContext {
            artifact,
            resolver,
            externals,
            filters: vec![],
            problems: Mutex::new(HashSet::new()),
            deprecations: Mutex::new(HashSet::new()),
        }
    }

    /// Append a suppression filter to the chain
    pub fn add_filter(&mut self, filter: Box<dyn ProblemFilter>) {
        self.filters.push(filter);
    }

    pub fn artifact(&self) -> &ArtifactId {
        &self.artifact
    }

    /// Whether the class is expected to come from outside the resolvers
    pub fn is_external(&self, name: &BinaryName) -> bool {
        self.externals.is_external(name)
    }

    /// Ask the underlying resolver about a class
    pub fn resolve(&self, name: &BinaryName) -> Resolution {
        self.resolver.resolve(name)
    }

    /// Record a problem, unless a filter suppresses it
    ///
    /// Filters run before deduplication.
    pub fn register_problem(&self, problem: CompatibilityProblem) {
        for filter in &self.filters {
            if let FilterResult::Ignore(reason) = filter.should_report(&problem, &self.artifact)
            {
                log::debug!(
                    "Ignoring problem \"{}\": {}",
                    problem.short_description(),
                    reason
                );
                return;
            }
        }
        let mut problems = match self.problems.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        problems.insert(problem);
    }

    /// Resolve a class, registering the appropriate problem when that fails
    ///
    /// `NotFound` on an external class is no problem at all; `NotFound` on
    /// anything else registers a class-not-found and `Invalid` registers an
    /// invalid-class-file, both against `usage`. Callers get `None` in every
    /// non-`Found` case.
    pub fn resolve_class_or_problem(
        &self,
        name: &BinaryName,
        usage: &Location,
    ) -> Option<FoundClass> {
        match self.resolver.resolve(name) {
            Resolution::Found(found) => {
                log::trace!("Resolved {} from {}", name.as_str(), found.origin);
                Some(found)
            }
            Resolution::NotFound(detail) => {
                if self.is_external(name) {
                    log::debug!("External class {} not resolved: {}", name.as_str(), detail);
                } else {
                    self.register_problem(CompatibilityProblem::ClassNotFound {
                        class_name: name.clone(),
                        usage: usage.clone(),
                    });
                }
                None
            }
            Resolution::Invalid(reason) => {
                self.register_problem(CompatibilityProblem::InvalidClassFile {
                    invalid_class: name.clone(),
                    usage: usage.clone(),
                    reason,
                });
                None
            }
        }
    }

    /// Record a deprecated API usage
    ///
    /// Deprecation reports bypass the suppression filters and never affect
    /// the verification verdict.
    pub fn register_deprecated_usage(&self, usage: DeprecatedMethodUsage) {
        let mut deprecations = match self.deprecations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        deprecations.insert(usage);
    }

    /// Problems accumulated so far, in a stable reporting order
    pub fn problems(&self) -> Vec<CompatibilityProblem> {
        let problems = match self.problems.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut sorted: Vec<CompatibilityProblem> = problems.iter().cloned().collect();
        sorted.sort_by_key(|problem| (problem.problem_type(), problem.short_description()));
        sorted
    }

    /// Deprecated usages accumulated so far, in a stable reporting order
    pub fn deprecated_usages(&self) -> Vec<DeprecatedMethodUsage> {
        let deprecations = match self.deprecations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut sorted: Vec<DeprecatedMethodUsage> = deprecations.iter().cloned().collect();
        sorted.sort_by_key(|usage| usage.short_description());
        sorted
    }

    /// Consume the context, keeping only the deduplicated problem set
    pub fn into_problems(self) -> HashSet<CompatibilityProblem> {
        match self.problems.into_inner() {
            Ok(problems) => problems,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Run a verifier pipeline over every named class
///
/// Classes that fail to resolve register their problem and are skipped; the
/// rest go through the pipeline. The outcome of the run is whatever the
/// context has accumulated afterwards.
pub fn verify_classes(
    context: &VerificationContext,
    pipeline: &VerifierPipeline,
    class_names: &[BinaryName],
) {
    for name in class_names {
        let usage = Location::Class(ClassLocation::new(name.clone()));
        if let Some(found) = context.resolve_class_or_problem(name, &usage) {
            log::debug!("Verifying {}", name.as_str());
            pipeline.verify_class(&found.class, context);
        }
    }
}
