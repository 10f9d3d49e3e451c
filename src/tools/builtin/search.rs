//! Action search tool
//!
//! Searches the backend catalog of callable actions. Arguments are forwarded
//! verbatim as query parameters once `query` is known to be present.

use crate::error::BridgeError;
use crate::protocol::ToolDescriptor;
use crate::tools::required_string;
use serde_json::{json, Map, Value};

pub const NAME: &str = "search_tools";

pub const REQUIRED: &[&str] = &["query"];

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: NAME.to_string(),
        description: "Search for tools. The tools cover a wide range of domains include data source, API, SDK, etc. Try searching whenever you need to use a tool.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search for tools, you can describe what you want to do or what tools you want to use"
                },
                "limit": {
                    "type": "number",
                    "description": "The maximum number of tools to return, must be between 1 and 100, default is 10, recommend at least 10"
                }
            },
            "required": REQUIRED
        }),
    }
}

/// Check the search arguments; `limit` is left for the backend to judge
pub fn validate(arguments: &Map<String, Value>) -> Result<(), BridgeError> {
    required_string(arguments, "query").map(|_| ())
}
