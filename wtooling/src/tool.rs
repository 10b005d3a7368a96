//! Tool trait contract for registry-managed capabilities.
//!
//! ```rust
//! use wprovider::ToolDeclaration;
//! use wtooling::{FunctionTool, Tool, ToolInvocationResult};
//!
//! let tool = FunctionTool::new(
//!     ToolDeclaration::new("echo", "Echoes input"),
//!     |args, _ctx| async move { Ok(ToolInvocationResult::new(args.into())) },
//! );
//!
//! assert_eq!(tool.declaration().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use wcommon::BoxFuture;
use wprovider::ToolDeclaration;

use crate::{ToolArguments, ToolError, ToolExecutionContext, ToolInvocationResult};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub trait Tool: Send + Sync {
    fn declaration(&self) -> ToolDeclaration;

    fn invoke<'a>(
        &'a self,
        arguments: ToolArguments,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolInvocationResult, ToolError>>;
}

type ToolHandler = dyn Fn(ToolArguments, ToolExecutionContext) -> ToolFuture<'static, Result<ToolInvocationResult, ToolError>>
    + Send
    + Sync;

pub struct FunctionTool {
    declaration: ToolDeclaration,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(declaration: ToolDeclaration, handler: F) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolInvocationResult, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |arguments, context| Box::pin(handler(arguments, context)));

        Self {
            declaration,
            handler,
        }
    }
}

impl Tool for FunctionTool {
    fn declaration(&self) -> ToolDeclaration {
        self.declaration.clone()
    }

    fn invoke<'a>(
        &'a self,
        arguments: ToolArguments,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolInvocationResult, ToolError>> {
        (self.handler)(arguments, context.clone())
    }
}
