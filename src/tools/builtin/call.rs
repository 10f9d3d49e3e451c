//! Action call tool
//!
//! Executes an action found through `search_tools`. The payload is opaque and
//! forwarded as given; `payment` is a signed USD authorization ceiling
//! (positive: charge at most this much, negative: request at least this much).

use crate::backend::CallAction;
use crate::error::BridgeError;
use crate::protocol::ToolDescriptor;
use crate::tools::{optional_value, required_string};
use serde_json::{json, Map, Value};

pub const NAME: &str = "call_tool";

pub const REQUIRED: &[&str] = &["action"];

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: NAME.to_string(),
        description: "Call a tool returned by search_tools".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "description": "The exact action you want to call in the search_tools result."
                },
                "payload": {
                    "type": ["object", "string"],
                    "description": "Action payload, based on the payload schema in the search_tools result. You can pass either the json object directly or json encoded string of the object."
                },
                "payment": {
                    "type": "number",
                    "description": "Amount to authorize in USD. Positive number means you will be charged no more than this amount, negative number means you are requesting to get paid for at least this amount."
                }
            },
            "required": REQUIRED
        }),
    }
}

/// Build the backend request from call arguments (pure function)
pub fn parse(arguments: &Map<String, Value>) -> Result<CallAction, BridgeError> {
    let action = required_string(arguments, "action")?;

    Ok(CallAction {
        action: action.to_string(),
        payload: optional_value(arguments, "payload"),
        payment: optional_value(arguments, "payment"),
    })
}
