use serde_json::{json, Map, Value};

/// `rootPath`/`rootUri` fields of the `initialize` request.
///
/// With `no_root` both are null, which makes the server treat every file as
/// standalone.
pub fn initialize_root(no_root: bool, root_path: &str, root_uri: &str) -> Value {
    if no_root {
        json!({ "rootPath": null, "rootUri": null })
    } else {
        json!({ "rootPath": root_path, "rootUri": root_uri })
    }
}

/// `workspace/didChangeConfiguration` params carrying the resolved classpath.
///
/// `settings` is the `groovy` settings object; non-object values are
/// replaced by an empty object.
pub fn did_change_configuration(settings: Value, classpath: &[String]) -> Value {
    let mut groovy = match settings {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    groovy.insert("classpath".to_string(), json!(classpath));
    json!({ "settings": { "groovy": groovy } })
}
