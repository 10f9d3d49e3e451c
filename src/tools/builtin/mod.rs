//! Builtin tools exposed by the bridge
//!
//! Each tool module owns its descriptor and the pure argument parsing the
//! dispatcher runs before any network call.

pub mod call;
pub mod search;
