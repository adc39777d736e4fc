use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::extension::{CommandParam, ParamType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormInputKind {
    Textfield,
    Textarea,
    Checkbox,
}

/// Describes how to prompt for a parameter value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(rename = "type")]
    pub kind: FormInputKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Checkbox label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FormInput {
    /// Prompt used for a required parameter the caller did not bind.
    pub fn for_param(param: &CommandParam) -> Self {
        let kind = match param.kind {
            ParamType::String => FormInputKind::Textfield,
            ParamType::Boolean => FormInputKind::Checkbox,
        };
        Self {
            kind,
            title: Some(param.name.clone()),
            placeholder: param.description.clone(),
            default: None,
            label: None,
        }
    }
}

/// A parameter binding: either a literal or a prompt.
///
/// `{"type": "textfield", ...}` decodes as a prompt; anything else is a literal value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandInput {
    Input(FormInput),
    Value(Value),
}

impl CommandInput {
    pub fn value(&self) -> Option<&Value> {
        match self {
            CommandInput::Value(v) => Some(v),
            CommandInput::Input(_) => None,
        }
    }
}

impl From<Value> for CommandInput {
    fn from(value: Value) -> Self {
        CommandInput::Value(value)
    }
}

impl From<&str> for CommandInput {
    fn from(value: &str) -> Self {
        CommandInput::Value(Value::String(value.to_string()))
    }
}

/// Request envelope sent to every command.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandParams {
    #[serde(default)]
    pub with: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}
