//! Tool registry for the MCP bridge
//!
//! Holds the fixed catalog of tool descriptors answered on `tools/list` and
//! resolves tool names for the dispatcher. The registry is built once and
//! never changes.

use crate::error::BridgeError;
use crate::protocol::ToolDescriptor;
use serde_json::{Map, Value};

pub mod builtin;

/// The kinds of tool this bridge can execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    SearchActions,
    CallAction,
}

impl ToolKind {
    /// All kinds in advertisement order
    pub const ALL: [ToolKind; 2] = [ToolKind::SearchActions, ToolKind::CallAction];

    /// Tool name on the wire
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::SearchActions => builtin::search::NAME,
            ToolKind::CallAction => builtin::call::NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Arguments that must be present and non-empty
    pub fn required_arguments(self) -> &'static [&'static str] {
        match self {
            ToolKind::SearchActions => builtin::search::REQUIRED,
            ToolKind::CallAction => builtin::call::REQUIRED,
        }
    }

    /// Prefix of the text returned when the backend fails
    pub fn failure_label(self) -> &'static str {
        match self {
            ToolKind::SearchActions => "Error searching actions",
            ToolKind::CallAction => "Error calling action",
        }
    }

    pub fn descriptor(self) -> ToolDescriptor {
        match self {
            ToolKind::SearchActions => builtin::search::descriptor(),
            ToolKind::CallAction => builtin::call::descriptor(),
        }
    }
}

/// Immutable catalog of advertised tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<(ToolKind, ToolDescriptor)>,
}

impl ToolRegistry {
    /// Registry holding the builtin search and call tools
    pub fn new() -> Self {
        Self {
            tools: ToolKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.descriptor()))
                .collect(),
        }
    }

    /// Descriptors in advertisement order
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|(_, descriptor)| descriptor.clone())
            .collect()
    }

    /// Get tool descriptor
    pub fn describe_tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools
            .iter()
            .find(|(_, descriptor)| descriptor.name == name)
            .map(|(_, descriptor)| descriptor)
    }

    /// Resolve a tool name to the kind the dispatcher executes
    pub fn resolve(&self, name: &str) -> Option<ToolKind> {
        self.tools
            .iter()
            .find(|(_, descriptor)| descriptor.name == name)
            .map(|(kind, _)| *kind)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch a required, non-empty string argument (pure function)
pub fn required_string<'a>(
    arguments: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, BridgeError> {
    match arguments.get(field).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BridgeError::missing_argument(field)),
    }
}

/// Fetch an optional argument, treating `null` as absent (pure function)
pub fn optional_value(arguments: &Map<String, Value>, field: &str) -> Option<Value> {
    arguments.get(field).filter(|value| !value.is_null()).cloned()
}
