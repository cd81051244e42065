mod common;

use classcompat::jvm::class_file::parse_class;
use classcompat::jvm::{BinaryName, Name};
use classcompat::resolve::{
    CachingResolver, CompositeResolver, DirectoryResolver, FixedResolver, Resolution, Resolver,
};
use common::ClassBytes;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn class_name(text: &str) -> BinaryName {
    BinaryName::from_string(String::from(text)).unwrap()
}

fn fixed_with(origin: &str, classes: Vec<ClassBytes>) -> FixedResolver {
    let mut resolver = FixedResolver::new(origin);
    for class in classes {
        resolver.add_class(parse_class(&class.emit()).unwrap());
    }
    resolver
}

#[test]
fn directory_resolver_indexes_nested_classes() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("org").join("example");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        nested.join("Widget.class"),
        ClassBytes::new("org/example/Widget").emit(),
    )
    .unwrap();
    fs::write(dir.path().join("Top.class"), ClassBytes::new("Top").emit()).unwrap();
    fs::write(dir.path().join("README.md"), b"not a class file").unwrap();

    let resolver = DirectoryResolver::open(dir.path()).unwrap();
    assert_eq!(
        resolver.class_names(),
        vec![class_name("Top"), class_name("org/example/Widget")],
        "only .class files are indexed, in sorted order"
    );

    match resolver.resolve(&class_name("org/example/Widget")) {
        Resolution::Found(found) => {
            assert_eq!(found.class.name.as_str(), "org/example/Widget");
        }
        other => panic!("expected to find org/example/Widget, got {:?}", other),
    }
    assert!(matches!(
        resolver.resolve(&class_name("org/example/Gone")),
        Resolution::NotFound(_)
    ));
}

#[test]
fn directory_resolver_flags_corrupt_definitions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Corrupt.class"), b"\xCA\xFE\xBA\xBE junk").unwrap();
    // A file whose declared class name does not match its path
    fs::write(dir.path().join("Liar.class"), ClassBytes::new("Other").emit()).unwrap();

    let resolver = DirectoryResolver::open(dir.path()).unwrap();
    assert!(matches!(
        resolver.resolve(&class_name("Corrupt")),
        Resolution::Invalid(_)
    ));
    assert!(
        matches!(resolver.resolve(&class_name("Liar")), Resolution::Invalid(_)),
        "a class file declaring another name must not satisfy the lookup"
    );
}

struct CountingResolver {
    inner: FixedResolver,
    calls: Arc<AtomicUsize>,
}

impl Resolver for CountingResolver {
    fn resolve(&self, name: &BinaryName) -> Resolution {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(name)
    }
}

#[test]
fn caching_resolver_memoizes_every_outcome() {
    let calls = Arc::new(AtomicUsize::new(0));
    let caching = CachingResolver::new(CountingResolver {
        inner: fixed_with("fixtures", vec![ClassBytes::new("a/Known")]),
        calls: Arc::clone(&calls),
    });

    assert!(matches!(
        caching.resolve(&class_name("a/Known")),
        Resolution::Found(_)
    ));
    assert!(matches!(
        caching.resolve(&class_name("a/Known")),
        Resolution::Found(_)
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1, "found classes are cached");

    assert!(matches!(
        caching.resolve(&class_name("a/Gone")),
        Resolution::NotFound(_)
    ));
    assert!(matches!(
        caching.resolve(&class_name("a/Gone")),
        Resolution::NotFound(_)
    ));
    assert_eq!(
        calls.load(Ordering::SeqCst),
        2,
        "failed lookups are cached too"
    );
}

#[test]
fn composite_resolver_asks_constituents_in_order() {
    let first = fixed_with("first", vec![ClassBytes::new("a/Shared")]);
    let second = fixed_with(
        "second",
        vec![ClassBytes::new("a/Shared"), ClassBytes::new("a/OnlySecond")],
    );
    let composite = CompositeResolver::new(vec![Arc::new(first), Arc::new(second)]);

    match composite.resolve(&class_name("a/Shared")) {
        Resolution::Found(found) => {
            assert_eq!(found.origin.as_str(), "first", "earlier constituents win");
        }
        other => panic!("expected to find a/Shared, got {:?}", other),
    }
    match composite.resolve(&class_name("a/OnlySecond")) {
        Resolution::Found(found) => assert_eq!(found.origin.as_str(), "second"),
        other => panic!("expected to find a/OnlySecond, got {:?}", other),
    }
    assert!(matches!(
        composite.resolve(&class_name("a/Nowhere")),
        Resolution::NotFound(_)
    ));
}

struct AlwaysInvalid;

impl Resolver for AlwaysInvalid {
    fn resolve(&self, _name: &BinaryName) -> Resolution {
        Resolution::Invalid(String::from("synthetic corruption"))
    }
}

#[test]
fn composite_resolver_stops_on_invalid() {
    let healthy = fixed_with("healthy", vec![ClassBytes::new("a/Shared")]);
    let composite = CompositeResolver::new(vec![Arc::new(AlwaysInvalid), Arc::new(healthy)]);

    assert!(
        matches!(
            composite.resolve(&class_name("a/Shared")),
            Resolution::Invalid(_)
        ),
        "a corrupt definition is not shadowed by a later healthy one"
    );
}
