use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::config::Config;
use crate::site::{BuildError, Quill};

/// One butler call: an operation name plus optional named arguments.
#[derive(Deserialize, Debug)]
pub struct Request {
    pub command: String,
    #[serde(default)]
    pub args: Option<Map<String, Value>>,
}

impl Request {
    pub fn bare(command: &str) -> Self {
        Self {
            command: command.to_string(),
            args: None,
        }
    }
}

#[derive(Debug)]
pub enum DispatchError {
    UnknownCommand(String),
    InvalidArgs(String),
    Operation(BuildError),
    Encoding(serde_json::Error),
}

impl From<BuildError> for DispatchError {
    fn from(err: BuildError) -> Self {
        DispatchError::Operation(err)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Encoding(err)
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::UnknownCommand(name) => write!(f, "Unknown command: {}", name),
            DispatchError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            DispatchError::Operation(e) => write!(f, "Command failed: {}", e),
            DispatchError::Encoding(e) => write!(f, "Response encoding error: {}", e),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Resolve a butler request against the fixed command registry and run it.
///
/// Only the names matched here are reachable; anything else is rejected at
/// the boundary with `UnknownCommand`. Commands returning a value yield it
/// as the response body, the rest yield `{"status": "complete"}`.
pub fn dispatch(app: &mut Quill, request: &Request) -> Result<Value, DispatchError> {
    let args = request.args.as_ref();

    match request.command.as_str() {
        "init" => {
            app.init()?;
            Ok(complete())
        }
        "build" => {
            app.build()?;
            Ok(complete())
        }
        "clear" => {
            app.clear()?;
            Ok(complete())
        }
        "post" => {
            let title = str_arg(args, "title")?;
            let text = str_arg(args, "text")?;
            let categories = list_arg(args, "categories")?;
            app.post(&title, &text, categories)?;
            Ok(complete())
        }
        "edit_config" => {
            let field = str_arg(args, "field")?;
            let key = str_arg(args, "key")?;
            let value = str_arg(args, "value")?;
            app.edit_config(&field, &key, &value)?;
            Ok(complete())
        }
        "set_config" => {
            let value = arg(args, "config")?;
            let config: Config = serde_json::from_value(value.clone())
                .map_err(|e| DispatchError::InvalidArgs(format!("config: {}", e)))?;
            app.set_config(config)?;
            Ok(complete())
        }
        "get_config" => Ok(serde_json::to_value(app.get_config())?),
        "get_analytics" => Ok(serde_json::to_value(app.get_analytics())?),
        other => Err(DispatchError::UnknownCommand(other.to_string())),
    }
}

fn complete() -> Value {
    json!({ "status": "complete" })
}

fn arg<'a>(args: Option<&'a Map<String, Value>>, name: &str) -> Result<&'a Value, DispatchError> {
    args.and_then(|map| map.get(name))
        .ok_or_else(|| DispatchError::InvalidArgs(format!("missing `{}`", name)))
}

fn str_arg(args: Option<&Map<String, Value>>, name: &str) -> Result<String, DispatchError> {
    arg(args, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DispatchError::InvalidArgs(format!("`{}` must be a string", name)))
}

fn list_arg(args: Option<&Map<String, Value>>, name: &str) -> Result<Vec<String>, DispatchError> {
    let values = arg(args, name)?
        .as_array()
        .ok_or_else(|| DispatchError::InvalidArgs(format!("`{}` must be a list", name)))?;
    values
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| DispatchError::InvalidArgs(format!("`{}` must hold strings", name)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (tempfile::TempDir, Quill) {
        let dir = tempfile::tempdir().unwrap();
        let app = Quill::open(dir.path()).unwrap();
        (dir, app)
    }

    #[test]
    fn test_unknown_command_rejected_at_boundary() {
        let (_dir, mut app) = app();
        let err = dispatch(&mut app, &Request::bare("__dict__")).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand(_)));
    }

    #[test]
    fn test_get_config_returns_merged_document() {
        let (_dir, mut app) = app();
        let value = dispatch(&mut app, &Request::bare("get_config")).unwrap();
        assert_eq!(value["site"]["color"], "#00bebe");
        assert_eq!(value["assets"]["manifest"], "manifest.webmanifest");
    }

    #[test]
    fn test_post_requires_typed_args() {
        let (_dir, mut app) = app();

        let err = dispatch(&mut app, &Request::bare("post")).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArgs(_)));

        let mut args = Map::new();
        args.insert("title".to_string(), json!("Hello"));
        args.insert("text".to_string(), json!("World"));
        args.insert("categories".to_string(), json!("general"));
        let request = Request {
            command: "post".to_string(),
            args: Some(args),
        };
        let err = dispatch(&mut app, &request).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArgs(_)));
    }

    #[test]
    fn test_edit_config_dispatch_round_trip() {
        let (_dir, mut app) = app();
        app.init().unwrap();

        let mut args = Map::new();
        args.insert("field".to_string(), json!("site"));
        args.insert("key".to_string(), json!("name"));
        args.insert("value".to_string(), json!("Machine and me"));
        let request = Request {
            command: "edit_config".to_string(),
            args: Some(args),
        };
        let response = dispatch(&mut app, &request).unwrap();
        assert_eq!(response, json!({ "status": "complete" }));

        let config = dispatch(&mut app, &Request::bare("get_config")).unwrap();
        assert_eq!(config["site"]["name"], "Machine and me");
    }

    #[test]
    fn test_get_analytics_after_build() {
        let (_dir, mut app) = app();
        app.init().unwrap();

        let value = dispatch(&mut app, &Request::bare("get_analytics")).unwrap();
        assert!(value["build_speed"].as_u64().unwrap() > 0);
    }
}
