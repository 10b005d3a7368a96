//! Tool registry keyed by declaration name.
//!
//! ```rust
//! use wprovider::ToolDeclaration;
//! use wtooling::{ToolInvocationResult, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register_sync_fn(
//!     ToolDeclaration::new("get_weather", "Current weather").string_param("city", "City"),
//!     |args, _ctx| Ok(ToolInvocationResult::new(args.into()).with_summary("晴")),
//! );
//! registry.register_sync_fn(ToolDeclaration::new("add_favorite", "Save a guide"), |_args, _ctx| {
//!     Ok(ToolInvocationResult::new(serde_json::json!({"ok": true})))
//! });
//!
//! let names = registry.list().into_iter().map(|tool| tool.name).collect::<Vec<_>>();
//! assert_eq!(names, vec!["add_favorite", "get_weather"]);
//! ```

use std::future::Future;
use std::sync::Arc;

use wcommon::Registry;
use wprovider::ToolDeclaration;

use crate::{
    FunctionTool, Tool, ToolArguments, ToolError, ToolExecutionContext, ToolInvocation,
    ToolInvocationResult,
};

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool, replacing any tool with the same name.
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        let name = tool.declaration().name;
        if self.tools.insert(name.clone(), Arc::new(tool)).is_some() {
            tracing::debug!(tool_name = %name, "replaced registered tool");
        }
    }

    pub fn register_fn<F, Fut>(&mut self, declaration: ToolDeclaration, handler: F)
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolInvocationResult, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(declaration, handler));
    }

    pub fn register_sync_fn<F>(&mut self, declaration: ToolDeclaration, handler: F)
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Result<ToolInvocationResult, ToolError>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(declaration, move |arguments, context| {
            let output = handler(arguments, context);
            async move { output }
        });
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    /// Catalog ordered by tool name.
    pub fn list(&self) -> Vec<ToolDeclaration> {
        self.tools.values().map(|tool| tool.declaration()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Runs the named tool. Errors carry the tool name and invocation id.
    pub async fn execute(
        &self,
        invocation: ToolInvocation,
        context: &ToolExecutionContext,
    ) -> Result<ToolInvocationResult, ToolError> {
        let ToolInvocation {
            id,
            name,
            arguments,
        } = invocation;

        let Some(tool) = self.get(&name) else {
            tracing::warn!(tool_name = %name, invocation_id = %id, "unknown tool requested");
            return Err(ToolError::unknown_tool(&name).with_invocation_id(id));
        };

        tool.invoke(arguments, context).await.map_err(|error| {
            let error = if error.tool_name.is_none() {
                error.with_tool_name(name.clone())
            } else {
                error
            };
            error.with_invocation_id(id.clone())
        })
    }
}
