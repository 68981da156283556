//! Text encodings for the backing file.

use std::path::Path;

use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// Encoding of the backing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// TOML, mapped onto the same JSON value model.
    Toml,
}

impl Format {
    /// Pick the format from the file extension. Anything that is not
    /// `.toml`/`.tml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
            "toml" | "tml" => Format::Toml,
            _ => Format::Json,
        }
    }

    /// Parse a whole document. `origin` is only used for error messages.
    pub fn parse(&self, text: &str, origin: &Path) -> Result<Value> {
        let parsed = match self {
            Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Format::Toml => parse_toml(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::Parse {
            path: origin.to_path_buf(),
            message,
        })
    }

    /// Render a whole document.
    pub fn render(&self, value: &Value) -> Result<String> {
        match self {
            Format::Json => serde_json::to_string_pretty(value).map_err(Error::encode),
            Format::Toml => toml::to_string_pretty(value).map_err(Error::encode),
        }
    }
}

fn parse_toml(text: &str) -> Result<Value, toml::de::Error> {
    toml::from_str(text).map(toml_to_json)
}

/// Datetimes have no JSON counterpart and become strings.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => items.into_iter().map(toml_to_json).collect(),
        toml::Value::Table(t) => t.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/config.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("config.tml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("config.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("config")), Format::Json);
    }

    #[test]
    fn test_json_parse_error() {
        let origin = Path::new("broken.json");
        let err = Format::Json.parse("{\"a\": ", origin).unwrap_err();
        let Error::Parse { path, .. } = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(path, origin);
    }

    #[test]
    fn test_toml_round_trip() {
        let value = json!({
            "name": "demo",
            "count": 3,
            "server": {"port": 8080, "tags": ["a", "b"]},
        });
        let text = Format::Toml.render(&value).unwrap();
        let parsed = Format::Toml.parse(&text, Path::new("c.toml")).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_toml_datetime_is_a_string() {
        let text = "released = 1979-05-27T07:32:00Z\n[build]\nat = 07:32:00\n";
        let parsed = Format::Toml.parse(text, Path::new("c.toml")).unwrap();
        assert_eq!(
            parsed,
            json!({"released": "1979-05-27T07:32:00Z", "build": {"at": "07:32:00"}})
        );
    }

    #[test]
    fn test_json_render_is_pretty() {
        let text = Format::Json.render(&json!({"a": 1})).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }
}
