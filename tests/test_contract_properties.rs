//! Property tests for the invocation contract
//!
//! For arbitrary argument maps the dispatcher must either reject the
//! invocation with no backend request, or make exactly one request and
//! return exactly one text result.


use aivengers_mcp::testing::MockBackend;
use aivengers_mcp::{BridgeError, ToolRegistry};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use test_helpers::dispatcher_with;

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ]
}

/// Argument maps over a small key space so required keys show up often
fn arb_arguments() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(
        prop_oneof![
            Just("query".to_string()),
            Just("action".to_string()),
            Just("limit".to_string()),
            Just("payload".to_string()),
            Just("payment".to_string()),
            "[a-z]{1,6}",
        ],
        arb_scalar(),
        0..5,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

fn has_required(arguments: &Map<String, Value>, field: &str) -> bool {
    matches!(arguments.get(field), Some(Value::String(s)) if !s.is_empty())
}

proptest! {
    #[test]
    fn prop_search_rejects_exactly_when_query_missing(arguments in arb_arguments()) {
        let backend = Arc::new(MockBackend::responding(json!([])));
        let dispatcher = dispatcher_with(backend.clone());

        let outcome = run(dispatcher.dispatch("search_tools", arguments.clone()));
        let requests = run(backend.request_count());

        if has_required(&arguments, "query") {
            let result = outcome.unwrap();
            prop_assert_eq!(result.content.len(), 1);
            prop_assert_eq!(result.text_content(), Some("[]"));
            prop_assert_eq!(requests, 1);
        } else {
            prop_assert!(matches!(outcome, Err(BridgeError::MissingArgument(ref f)) if f == "query"));
            prop_assert_eq!(requests, 0);
        }
    }

    #[test]
    fn prop_call_rejects_exactly_when_action_missing(arguments in arb_arguments()) {
        let backend = Arc::new(MockBackend::timing_out(Duration::from_secs(60)));
        let dispatcher = dispatcher_with(backend.clone());

        let outcome = run(dispatcher.dispatch("call_tool", arguments.clone()));
        let requests = run(backend.request_count());

        if has_required(&arguments, "action") {
            let result = outcome.unwrap();
            prop_assert!(!result.is_error);
            prop_assert!(result.text_content().unwrap().starts_with("Error calling action: "));
            prop_assert_eq!(requests, 1);
        } else {
            prop_assert!(outcome.unwrap_err().is_contract_violation());
            prop_assert_eq!(requests, 0);
        }
    }

    #[test]
    fn prop_unknown_tools_never_reach_backend(name in "[a-z_]{1,16}", arguments in arb_arguments()) {
        prop_assume!(ToolRegistry::new().resolve(&name).is_none());

        let backend = Arc::new(MockBackend::responding(json!({})));
        let dispatcher = dispatcher_with(backend.clone());

        let outcome = run(dispatcher.dispatch(&name, arguments));
        prop_assert!(matches!(outcome, Err(BridgeError::UnknownTool(_))));
        prop_assert_eq!(run(backend.request_count()), 0);
    }

    #[test]
    fn prop_success_text_is_compact_json_of_body(body in prop::collection::btree_map("[a-z]{1,4}", any::<i32>(), 0..4)) {
        let body = serde_json::to_value(&body).unwrap();
        let backend = Arc::new(MockBackend::responding(body.clone()));
        let dispatcher = dispatcher_with(backend);

        let arguments = json!({"query": "q"}).as_object().cloned().unwrap();
        let result = run(dispatcher.dispatch("search_tools", arguments)).unwrap();

        let text = result.text_content().unwrap();
        prop_assert_eq!(serde_json::from_str::<Value>(text).unwrap(), body.clone());
        prop_assert_eq!(text, body.to_string());
    }
}
