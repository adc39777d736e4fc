use serde_json::{Map, Value};

use crate::error::RunError;

/// Expands `{{ name }}` placeholders with shell-quoted param values.
///
/// `{{ query }}` expands to the current query unless a param of that name exists.
/// Unknown names expand to an empty quoted string.
pub(super) fn render(
    template: &str,
    params: &Map<String, Value>,
    query: &str,
) -> Result<String, RunError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        let key = rest[start + 2..start + 2 + len].trim();
        let raw = match params.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None if key == "query" => query.to_string(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let quoted = shlex::try_quote(&raw)
            .map_err(|err| RunError::transport(&format!("quote param {}", key), err))?;
        out.push_str(&quoted);
        rest = &rest[start + 2 + len + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/dispatch/template_tests.rs"]
mod tests;
