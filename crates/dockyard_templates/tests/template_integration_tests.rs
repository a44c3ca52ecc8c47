//! Integration tests for template discovery and environment resolution.

use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use dockyard_templates::{
    parse_env, EnvResolver, MapValueSource, ScriptedValueSource, StdinValueSource,
    TemplateRegistry, COMPOSE_FILE, ENV_TEMPLATE_FILE,
};
use tempfile::tempdir;

fn write_template(root: &Path, name: &str, compose: &str, env_template: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(COMPOSE_FILE), compose).unwrap();
    fs::write(dir.join(ENV_TEMPLATE_FILE), env_template).unwrap();
}

#[test]
fn test_listing_is_idempotent_as_a_set() {
    let temp = tempdir().unwrap();
    for name in ["web", "db", "cache"] {
        write_template(temp.path(), name, "services: {}\n", "A=1\n");
    }

    let registry = TemplateRegistry::new(temp.path());
    let first: HashSet<String> = registry.list().unwrap().into_iter().collect();
    let second: HashSet<String> = registry.list().unwrap().into_iter().collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_resolve_template_from_disk_interactively() {
    let temp = tempdir().unwrap();
    write_template(
        temp.path(),
        "web",
        "services:\n  web:\n    image: nginx\n",
        "# web server\nPORT=<port>\nDEBUG=false\n",
    );

    let registry = TemplateRegistry::new(temp.path());
    let content = registry.read_env_template("web").unwrap();

    let mut source = StdinValueSource::new(Cursor::new("8080\n"), Vec::new());
    let env = EnvResolver::new().resolve(&content, &mut source).unwrap();

    assert_eq!(env.render(), "PORT=8080\nDEBUG=false\n");
    let prompt = String::from_utf8(source.into_writer()).unwrap();
    assert!(prompt.contains("port"));
}

#[test]
fn test_resolved_env_survives_write_and_reparse() {
    let temp = tempdir().unwrap();
    let mut source = ScriptedValueSource::new(["s3cr=t", "", "db"]);
    let env = EnvResolver::new()
        .resolve(
            "PASS=<pass>\nTOKEN=<token>\nHOST=<host>\nURL=http://h/?q=1\n",
            &mut source,
        )
        .unwrap();

    let path = temp.path().join(".env");
    fs::write(&path, env.render()).unwrap();
    let reparsed = parse_env(&fs::read_to_string(&path).unwrap());

    assert_eq!(reparsed, env);
    assert_eq!(reparsed.get("PASS"), Some("s3cr=t"));
    assert_eq!(reparsed.get("TOKEN"), Some("<token>"));
}

#[test]
fn test_non_interactive_resolution_uses_map() {
    let mut source = MapValueSource::empty().with_value("X", "5");
    let env = EnvResolver::new()
        .resolve("A=<X>\nB=<X>\nC=<Y>\n", &mut source)
        .unwrap();

    assert_eq!(env.get("A"), Some("5"));
    assert_eq!(env.get("B"), Some("5"));
    assert_eq!(env.get("C"), Some("<Y>"));
}
