use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;

use super::page::Page;
use crate::error::RunError;

const PAGE_SCHEMA: &str = include_str!("page.schema.json");

fn page_validator() -> Result<&'static Validator, RunError> {
    static VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();
    VALIDATOR
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(PAGE_SCHEMA)
                .map_err(|err| format!("parse page schema: {}", err))?;
            jsonschema::draft202012::options()
                .build(&schema)
                .map_err(|err| format!("compile page schema: {}", err))
        })
        .as_ref()
        .map_err(|err| RunError::Protocol(err.clone()))
}

/// Checks a decoded JSON document against the page schema.
pub fn validate_page(value: &Value) -> Result<(), RunError> {
    let validator = page_validator()?;
    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|err| {
            let path = err.instance_path.to_string();
            if path.is_empty() {
                err.to_string()
            } else {
                format!("{} (at {})", err, path)
            }
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(RunError::Protocol(errors.join("\n")))
    }
}

/// Parses command output into a [`Page`]. Nothing in the output is trusted until the
/// whole document has passed schema validation.
pub fn parse_page(output: &[u8]) -> Result<Page, RunError> {
    let value: Value = serde_json::from_slice(output)
        .map_err(|err| RunError::Protocol(format!("output is not valid JSON: {}", err)))?;
    validate_page(&value)?;
    serde_json::from_value(value).map_err(|err| RunError::Protocol(err.to_string()))
}

#[cfg(test)]
#[path = "../tests/model/schema_tests.rs"]
mod tests;
