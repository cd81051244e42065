//! Locating class definitions by name
//!
//! Everything the verification layer knows about where classes come from goes
//! through the [`Resolver`] trait. The implementations here cover the common
//! arrangements: a fixed in-memory set ([`FixedResolver`]), a directory tree
//! of `.class` files ([`DirectoryResolver`]), an ordered chain of other
//! resolvers ([`CompositeResolver`]), and a memoizing wrapper
//! ([`CachingResolver`]).

mod caching;
mod composite;
mod directory;
mod fixed;

pub use caching::*;
pub use composite::*;
pub use directory::*;
pub use fixed::*;

use crate::jvm::model::Class;
use crate::jvm::BinaryName;
use std::fmt;
use std::sync::Arc;

/// Where a resolved class came from
///
/// Shows up in diagnostics and tells the constituents of a composite apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin(Arc<str>);

impl Origin {
    pub fn new(label: impl Into<String>) -> Origin {
        Origin(Arc::from(label.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful resolution: the parsed class and where it came from
#[derive(Clone, Debug)]
pub struct FoundClass {
    pub class: Arc<Class>,
    pub origin: Origin,
}

/// Outcome of asking a resolver for a class
///
/// `Invalid` means the resolver owns a definition for the name but cannot
/// produce it. That is a different situation from `NotFound`, where the name
/// is simply absent.
#[derive(Clone, Debug)]
pub enum Resolution {
    Found(FoundClass),
    NotFound(String),
    Invalid(String),
}

/// Source of class definitions, keyed by binary name
///
/// Resolvers are shared across verifier threads, so implementations must be
/// callable concurrently.
pub trait Resolver: Send + Sync {
    fn resolve(&self, name: &BinaryName) -> Resolution;
}
