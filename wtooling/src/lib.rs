//! Tool registry: declarations, handlers and invocation types.
//!
//! ```rust
//! use wprovider::ToolDeclaration;
//! use wtooling::{ToolExecutionContext, ToolInvocation, ToolInvocationResult, ToolRegistry};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut registry = ToolRegistry::new();
//! registry.register_sync_fn(
//!     ToolDeclaration::new("get_weather", "Current weather")
//!         .string_param("city", "City name")
//!         .required("city"),
//!     |args, _ctx| {
//!         let city = wtooling::required_string(&args, "city")?;
//!         Ok(ToolInvocationResult::new(serde_json::json!({ "message": format!("{city}: 晴") })))
//!     },
//! );
//!
//! let invocation = ToolInvocation::from_fragments("call_1", "get_weather", r#"{"city":"成都"}"#)
//!     .expect("arguments should parse");
//! let result = registry
//!     .execute(invocation, &ToolExecutionContext::default())
//!     .await
//!     .expect("tool should run");
//! assert_eq!(result.display_text(), "成都: 晴");
//! # }
//! ```

mod args;
mod error;
mod registry;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        FunctionTool, Tool, ToolArguments, ToolError, ToolErrorKind, ToolExecutionContext,
        ToolFuture, ToolInvocation, ToolInvocationResult, ToolRegistry,
    };
    pub use wprovider::{ParameterKind, ParameterSchema, ParameterSpec, ToolDeclaration};
}

pub use args::{optional_string, parse_json_object, parse_json_value, required_string};
pub use error::{ToolError, ToolErrorKind};
pub use registry::ToolRegistry;
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{ToolArguments, ToolExecutionContext, ToolInvocation, ToolInvocationResult};
pub use wprovider::{ParameterKind, ParameterSchema, ParameterSpec, ToolDeclaration};
