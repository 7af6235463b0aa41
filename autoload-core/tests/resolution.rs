//! Resolution against real directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use autoload_core::prelude::*;
use tempfile::TempDir;

/// Create `relative` (and its parents) under `root` as an empty file.
fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn dir(root: &Path, relative: &str) -> String {
    format!("{}/{}", root.display(), relative)
}

#[test]
fn test_more_specific_prefix_preferred_then_fallback() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "general/B/Thing.php");

    let resolver = Resolver::new();
    resolver.register("A\\", &dir(root.path(), "general"), false).unwrap();
    resolver.register("A\\B\\", &dir(root.path(), "specific"), false).unwrap();

    let expected = PathBuf::from(format!("{}/general/B/Thing.php", root.path().display()));
    assert_eq!(resolver.resolve("A\\B\\Thing"), Resolution::Found(expected));

    touch(root.path(), "specific/Thing.php");
    let expected = PathBuf::from(format!("{}/specific/Thing.php", root.path().display()));
    assert_eq!(resolver.resolve("A\\B\\Thing"), Resolution::Found(expected));
}

#[test]
fn test_no_registered_prefix_is_not_found() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "src/Logger.php");

    let resolver = Resolver::new();
    resolver.register("Acme", &dir(root.path(), "src"), false).unwrap();

    assert_eq!(resolver.resolve("Unknown\\Logger"), Resolution::NotFound);
}

#[test]
fn test_missing_file_and_directory_are_not_found() {
    let root = TempDir::new().unwrap();

    let resolver = Resolver::new();
    resolver.register("Acme", &dir(root.path(), "does-not-exist"), false).unwrap();
    resolver.register("Acme\\Log", &dir(root.path(), "log"), false).unwrap();
    fs::create_dir_all(root.path().join("log")).unwrap();

    assert_eq!(resolver.resolve("Acme\\Log\\Missing"), Resolution::NotFound);
}

#[test]
fn test_file_registered_as_directory_is_a_miss() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "plain");
    touch(root.path(), "src/Logger.php");

    let resolver = Resolver::new();
    resolver.register("Acme", &dir(root.path(), "plain"), false).unwrap();
    resolver.register("Acme", &dir(root.path(), "src"), false).unwrap();

    // `plain/Logger.php` fails with "not a directory"; the next directory is tried.
    let expected = PathBuf::from(format!("{}/src/Logger.php", root.path().display()));
    assert_eq!(resolver.resolve("Acme\\Logger"), Resolution::Found(expected));
    assert_eq!(resolver.resolve("Acme\\Cache"), Resolution::NotFound);
}

#[test]
fn test_directory_with_class_name_is_not_a_file() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("src/Logger.php")).unwrap();

    let resolver = Resolver::new();
    resolver.register("Acme", &dir(root.path(), "src"), false).unwrap();

    assert_eq!(resolver.resolve("Acme\\Logger"), Resolution::NotFound);
}

#[test]
fn test_case_round_trips_exactly() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "example/databases/querier/Request.php");

    let resolver = Resolver::new();
    let base = format!("{}/", dir(root.path(), "example/databases/querier"));
    resolver.register("Example\\Databases\\Querier\\", &base, false).unwrap();

    let expected = PathBuf::from(format!(
        "{}/example/databases/querier/Request.php",
        root.path().display()
    ));
    assert_eq!(resolver.candidates("Example\\Databases\\Querier\\Request"), vec![expected.clone()]);
    assert_eq!(
        resolver.resolve("Example\\Databases\\Querier\\Request"),
        Resolution::Found(expected)
    );

    // Different case never reaches the registered prefix.
    assert!(resolver.candidates("example\\databases\\querier\\request").is_empty());
    assert_eq!(
        resolver.resolve("example\\databases\\querier\\request"),
        Resolution::NotFound
    );
}

#[test]
fn test_resolve_is_idempotent() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "src/Logger.php");

    let resolver = Resolver::new();
    resolver.register("Acme", &dir(root.path(), "src"), false).unwrap();

    assert_eq!(resolver.resolve("Acme\\Logger"), resolver.resolve("Acme\\Logger"));
    assert_eq!(resolver.resolve("Acme\\Nope"), resolver.resolve("Acme\\Nope"));
}

#[test]
fn test_results_follow_filesystem_changes() {
    let root = TempDir::new().unwrap();

    let resolver = Resolver::new();
    resolver.register("Acme", &dir(root.path(), "src"), false).unwrap();
    assert_eq!(resolver.resolve("Acme\\Logger"), Resolution::NotFound);

    touch(root.path(), "src/Logger.php");
    assert!(resolver.resolve("Acme\\Logger").is_found());
}

#[test]
fn test_shared_src_scenario() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "src/Foo/Foo.php");

    let resolver = Resolver::new();
    resolver.register("Example\\Foo\\", &dir(root.path(), "src/Foo/"), false).unwrap();
    resolver.register("Example\\Bar\\", &dir(root.path(), "src/Bar/"), false).unwrap();

    let expected = PathBuf::from(format!("{}/src/Foo/Foo.php", root.path().display()));
    assert_eq!(resolver.resolve("Example\\Foo\\Foo"), Resolution::Found(expected));
    assert_eq!(resolver.resolve("Example\\Foo\\Missing"), Resolution::NotFound);
}

#[test]
fn test_vendor_prefix_reaches_nested_file() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "src/Foo/Foo.php");

    let resolver = Resolver::new();
    resolver.register("Example\\", &dir(root.path(), "src/"), false).unwrap();

    let expected = PathBuf::from(format!("{}/src/Foo/Foo.php", root.path().display()));
    assert_eq!(resolver.resolve("Example\\Foo\\Foo"), Resolution::Found(expected));
    assert_eq!(resolver.resolve("Example\\Foo\\Missing"), Resolution::NotFound);
}

#[test]
fn test_manifest_file_drives_resolution() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "lib/Cache/Store.inc");

    let manifest_path = root.path().join("autoload.toml");
    fs::write(
        &manifest_path,
        format!(
            "extension = \".inc\"\n\n[[namespace]]\nprefix = \"Acme\"\ndirectories = [\"{}\", \"{}\"]\n",
            dir(root.path(), "src"),
            dir(root.path(), "lib"),
        ),
    )
    .unwrap();

    let resolver = Manifest::load(&manifest_path).unwrap().into_resolver().unwrap();
    let expected = PathBuf::from(format!("{}/lib/Cache/Store.inc", root.path().display()));
    assert_eq!(resolver.resolve("Acme\\Cache\\Store"), Resolution::Found(expected));
}

#[test]
fn test_concurrent_resolution() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "src/Logger.php");

    let resolver = Arc::new(Resolver::new());
    resolver.register("Acme", &dir(root.path(), "src"), false).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                (0..50).all(|_| resolver.resolve("Acme\\Logger").is_found())
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_chain_with_resolver() {
    let root = TempDir::new().unwrap();
    touch(root.path(), "src/Logger.php");

    let resolver = Resolver::new();
    resolver.register("Acme", &dir(root.path(), "src"), false).unwrap();

    let mut chain = LoaderChain::new();
    chain.push(resolver);

    let (loader, path) = chain.load("Acme\\Logger").unwrap();
    assert_eq!(loader, "namespace-resolver");
    assert!(path.ends_with("src/Logger.php"));
    assert!(chain.load("Acme\\Missing").is_none());
}
