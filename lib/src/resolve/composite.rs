use super::{Resolution, Resolver};
use crate::jvm::{BinaryName, Name};
use std::sync::Arc;

/// Resolver that asks an ordered chain of constituent resolvers
///
/// The first constituent that answers anything other than `NotFound` wins:
/// both `Found` and `Invalid` stop the chain, so later constituents never
/// shadow a corrupt definition with a healthy one.
pub struct CompositeResolver {
    constituents: Vec<Arc<dyn Resolver>>,
}

impl CompositeResolver {
    pub fn new(constituents: Vec<Arc<dyn Resolver>>) -> CompositeResolver {
        CompositeResolver { constituents }
    }
}

impl Resolver for CompositeResolver {
    fn resolve(&self, name: &BinaryName) -> Resolution {
        for constituent in &self.constituents {
            match constituent.resolve(name) {
                Resolution::NotFound(_) => continue,
                other => return other,
            }
        }
        Resolution::NotFound(format!(
            "class {} is not in any of the {} resolvers",
            name.as_str(),
            self.constituents.len()
        ))
    }
}
