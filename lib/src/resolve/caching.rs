use super::{Resolution, Resolver};
use crate::jvm::BinaryName;
use elsa::sync::FrozenMap;

/// Memoizing wrapper around another resolver
///
/// Every outcome is remembered, including `NotFound` and `Invalid`: asking
/// again for a class that was missing will not hit the underlying resolver a
/// second time.
pub struct CachingResolver<R> {
    inner: R,
    cache: FrozenMap<BinaryName, Box<Resolution>>,
}

impl<R: Resolver> CachingResolver<R> {
    pub fn new(inner: R) -> CachingResolver<R> {
        CachingResolver {
            inner,
            cache: FrozenMap::new(),
        }
    }
}

impl<R: Resolver> Resolver for CachingResolver<R> {
    fn resolve(&self, name: &BinaryName) -> Resolution {
        if let Some(resolution) = self.cache.get(name) {
            return resolution.clone();
        }
        let resolution = self.inner.resolve(name);

        // Racing inserts keep the first value, so return what the map holds
        self.cache
            .insert(name.clone(), Box::new(resolution))
            .clone()
    }
}
