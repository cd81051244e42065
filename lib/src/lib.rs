//! Binary-compatibility analysis over JVM class files.
//!
//! The crate is split into three layers:
//!
//!   - [`jvm`] parses class files into a small structural model: names,
//!     access flags, descriptors, member records, and the subset of
//!     instructions that reference other classes
//!   - [`resolve`] answers where a class comes from through the
//!     [`resolve::Resolver`] trait and its directory, composite, and
//!     caching implementations
//!   - [`verify`] walks resolved classes and their hierarchies and
//!     accumulates [`verify::CompatibilityProblem`]s describing binary
//!     incompatibilities the artifact would hit at link time
//!
//! ```no_run
//! use classcompat::resolve::{CachingResolver, CompositeResolver, DirectoryResolver};
//! use classcompat::verify::{
//!     verify_classes, ArtifactId, ExternalClasses, VerificationContext, VerifierPipeline,
//! };
//! use std::sync::Arc;
//!
//! fn check() -> std::io::Result<()> {
//!     let artifact = DirectoryResolver::open("build/classes")?;
//!     let platform = DirectoryResolver::open("platform/classes")?;
//!     let class_names = artifact.class_names();
//!
//!     let resolver = Arc::new(CachingResolver::new(CompositeResolver::new(vec![
//!         Arc::new(artifact),
//!         Arc::new(platform),
//!     ])));
//!     let context = VerificationContext::new(
//!         ArtifactId::new("com.example.plugin", "1.2.0"),
//!         resolver,
//!         ExternalClasses::jdk_defaults(),
//!     );
//!     verify_classes(&context, &VerifierPipeline::standard(), &class_names);
//!
//!     for problem in context.problems() {
//!         eprintln!("{}", problem.full_description());
//!     }
//!     Ok(())
//! }
//! ```

pub mod jvm;
pub mod resolve;
pub mod verify;
