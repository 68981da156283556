//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, anyhow, bail};
use cashconfig::{LogReporter, Node, NodeKind, NodeValue, Store, Value, path};
use colored::Colorize;

/// Open an existing config file with no declared defaults.
pub fn open(file: &Path) -> anyhow::Result<Store> {
    if !file.is_file() {
        bail!("config file does not exist: {}", file.display());
    }
    let mut store = Store::empty(file);
    store
        .load()
        .with_context(|| format!("Failed to load {}", file.display()))?;
    Ok(store)
}

/// Create `file` holding an empty document if it does not exist yet.
///
/// Returns whether the file was created.
pub fn init(file: &Path) -> anyhow::Result<bool> {
    let mut store = Store::empty(file);
    let existed = store.has_file();
    store
        .load()
        .with_context(|| format!("Failed to initialize {}", file.display()))?;
    Ok(!existed)
}

/// One printable line per leaf: dotted path, kind and JSON value.
///
/// Lists are printed whole; empty groups show up as `{}`.
pub fn leaves(store: &Store) -> Vec<(String, NodeKind, String)> {
    let mut out = Vec::new();
    for node in store.root().iter() {
        walk(node.key().to_string(), node, &mut out);
    }
    out
}

fn walk(at: String, node: &Node, out: &mut Vec<(String, NodeKind, String)>) {
    match node.value() {
        NodeValue::Group(group) if !group.is_empty() => {
            for child in group.iter() {
                walk(format!("{at}.{}", child.key()), child, out);
            }
        }
        _ => out.push((at, node.kind(), node.to_json().to_string())),
    }
}

pub fn show(store: &Store) {
    for (at, kind, value) in leaves(store) {
        println!("{}  {}  {}", at.bold(), kind.as_str().cyan(), value);
    }
}

/// Pretty JSON of the node at `at`.
pub fn get(store: &Store, at: &str) -> anyhow::Result<String> {
    let node = store
        .get_item(at)
        .ok_or_else(|| anyhow!("no item at `{at}`"))?;
    Ok(serde_json::to_string_pretty(&node.to_json())?)
}

/// Parse a command line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw.to_string()),
    }
}

/// Store `raw` at `at`, creating the node by inference.
///
/// Replacing a node of a different kind needs `force`.
pub fn set(store: &mut Store, at: &str, raw: &str, force: bool) -> anyhow::Result<()> {
    let value = parse_value(raw);
    let (parent, key) = path::split_last(at)?;

    if let Some(existing) = store.get_type(at)
        && !force
        && NodeKind::infer(&value) != Some(existing)
    {
        bail!("`{at}` is a {existing}, refusing to replace it with {value} (use --force)");
    }

    let node = Node::from_inferred(key, &value, &LogReporter)?
        .ok_or_else(|| anyhow!("cannot store {value} at `{at}`"))?;
    match parent {
        Some(parent) => {
            store.set_item_at(parent, node)?;
        }
        None => {
            store.set_item(node);
        }
    }
    debug!("set `{at}` = {value}");
    Ok(())
}

pub fn remove(store: &mut Store, at: &str) -> anyhow::Result<Node> {
    store
        .remove_item(at)
        .ok_or_else(|| anyhow!("no item at `{at}`"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn fixture(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"name": "demo", "server": {"port": 80, "tags": ["a"]}, "empty": {}}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_open_requires_file() {
        let dir = TempDir::new().unwrap();
        assert!(open(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_init_creates_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.json");
        assert!(init(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!init(&path).unwrap());
    }

    fn leaf(at: &str, kind: NodeKind, json: &str) -> (String, NodeKind, String) {
        (at.to_string(), kind, json.to_string())
    }

    #[test]
    fn test_leaves() {
        let dir = TempDir::new().unwrap();
        let store = open(&fixture(&dir)).unwrap();
        assert_eq!(
            leaves(&store),
            vec![
                leaf("empty", NodeKind::Group, "{}"),
                leaf("name", NodeKind::String, r#""demo""#),
                leaf("server.port", NodeKind::Number, "80"),
                leaf("server.tags", NodeKind::List, r#"["a"]"#),
            ]
        );
    }

    #[test]
    fn test_get() {
        let dir = TempDir::new().unwrap();
        let store = open(&fixture(&dir)).unwrap();
        assert_eq!(get(&store, "server.port").unwrap(), "80");
        assert!(get(&store, "server.host").is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("[1, 2]"), json!([1, 2]));
        assert_eq!(parse_value("hello world"), json!("hello world"));
    }

    #[test]
    fn test_set() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir);
        let mut store = open(&path).unwrap();

        set(&mut store, "server.port", "8080", false).unwrap();
        set(&mut store, "server.host", "example.org", false).unwrap();
        set(&mut store, "debug", "true", false).unwrap();
        set(&mut store, "server.tags", "[\"x\", \"y\"]", false).unwrap();
        store.save().unwrap();

        let reloaded = open(&path).unwrap();
        assert_eq!(
            reloaded.to_json(),
            json!({
                "name": "demo",
                "debug": true,
                "empty": {},
                "server": {"port": 8080, "host": "example.org", "tags": ["x", "y"]},
            })
        );
    }

    #[test]
    fn test_set_guards_kind_changes() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&fixture(&dir)).unwrap();

        let refused = set(&mut store, "server.port", "not a number", false);
        assert!(refused.is_err());
        assert_eq!(store.get_type("server.port"), Some(NodeKind::Number));

        set(&mut store, "server.port", "not a number", true).unwrap();
        assert_eq!(store.get_type("server.port"), Some(NodeKind::String));

        assert!(set(&mut store, "name.inner", "1", false).is_err());
        assert!(set(&mut store, "missing.inner", "1", false).is_err());
        assert!(set(&mut store, "gone", "null", false).is_err());
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&fixture(&dir)).unwrap();
        let removed = remove(&mut store, "server.tags").unwrap();
        assert_eq!(removed.kind(), NodeKind::List);
        assert!(!store.has_item("server.tags"));
        assert!(remove(&mut store, "server.tags").is_err());
    }
}
