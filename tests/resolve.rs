use imageref::image::{matches, parse, Reference};
use imageref::{ImageRefError, InvalidReason};

fn assert_invalid(raw: &str) {
    match parse(raw) {
        Err(err) => assert!(err.is_invalid_reference(), "{:?}: {}", raw, err),
        Ok(reference) => panic!("{:?} resolved to {:?}", raw, reference),
    }
}

#[test]
fn single_segment_defaults() {
    let reference = parse("cirros").unwrap();
    assert_eq!(reference.registry_host(), None);
    assert_eq!(reference.namespace(), None);
    assert_eq!(reference.repository(), "cirros");
    assert_eq!(reference.tag(), "latest");
    assert_eq!(reference.qualified_name(), "cirros");
    assert_eq!(reference.lookup_name(), "cirros");
}

#[test]
fn default_registry_is_omitted_from_qualified_name() {
    for raw in ["index.docker.io/library/cirros", "docker.io/library/cirros"] {
        let reference = parse(raw).unwrap();
        assert_eq!(reference.registry_host(), Some("index.docker.io"));
        assert_eq!(reference.qualified_name(), "library/cirros");
        assert_eq!(reference.lookup_name(), "library/cirros");
        assert_eq!(reference.full_name(), raw);
    }
}

#[test]
fn host_port_namespace_and_tag() {
    let reference: Reference = "registry.example.com:5000/team/app:v2".parse().unwrap();
    assert_eq!(reference.registry_host(), Some("registry.example.com:5000"));
    assert_eq!(reference.namespace(), Some("team"));
    assert_eq!(reference.repository(), "app");
    assert_eq!(reference.tag(), "v2");
    assert_eq!(reference.qualified_name(), "registry.example.com:5000/team/app");
    assert_eq!(reference.to_string(), "registry.example.com:5000/team/app:v2");
}

#[test]
fn grammar_forms() {
    let cases = [
        ("repo", None, None, "repo", "latest"),
        ("repo:tag", None, None, "repo", "tag"),
        ("ns/repo", None, Some("ns"), "repo", "latest"),
        ("ns/repo:tag", None, Some("ns"), "repo", "tag"),
        ("my.host/repo:tag", Some("my.host"), None, "repo", "tag"),
        ("my.host/ns/repo", Some("my.host"), Some("ns"), "repo", "latest"),
        ("host:5000/repo", Some("host:5000"), None, "repo", "latest"),
        ("host:5000/ns/repo:tag", Some("host:5000"), Some("ns"), "repo", "tag"),
        ("localhost/repo", Some("localhost"), None, "repo", "latest"),
        ("localhost:5000/ns/repo:1", Some("localhost:5000"), Some("ns"), "repo", "1"),
    ];

    for (raw, host, namespace, repository, tag) in cases {
        let reference = parse(raw).unwrap();
        assert_eq!(reference.registry_host(), host, "{}", raw);
        assert_eq!(reference.namespace(), namespace, "{}", raw);
        assert_eq!(reference.repository(), repository, "{}", raw);
        assert_eq!(reference.tag(), tag, "{}", raw);
    }
}

#[test]
fn invalid_inputs() {
    assert_invalid("");
    assert_invalid("a/b/c/d");
    assert_invalid("a/b/c/d/e");
    assert_invalid("ns/:tag");

    match parse("a/b/c/d/e") {
        Err(ImageRefError::InvalidReference { reference, reason }) => {
            assert_eq!(reference, "a/b/c/d/e");
            assert_eq!(reason, InvalidReason::TooManySegments(5));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn reparse_is_stable() {
    for raw in ["repo", "ns/repo:tag", "my.registry.io/ns/repo:tag", "localhost:5000/repo"] {
        let reference = parse(raw).unwrap();
        let again = parse(reference.full_name()).unwrap();
        assert_eq!(again.repository(), reference.repository());
        assert_eq!(again.namespace(), reference.namespace());
        assert_eq!(again.tag(), reference.tag());
        assert_eq!(again.qualified_name(), reference.qualified_name());
    }
}

#[test]
fn tag_matching() {
    let requested = parse("repo").unwrap();
    assert!(matches(&requested, "repo:latest"));
    assert!(matches(&requested, "repo"));

    let requested = parse("repo:v2").unwrap();
    assert!(!matches(&requested, "repo:v1"));
    assert!(matches(&requested, "repo:v2"));
}

#[test]
fn resolves_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                parse(&format!("registry.local/team/app:{}", i))
                    .unwrap()
                    .repo_tag()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("registry.local/team/app:{}", i));
    }
}
