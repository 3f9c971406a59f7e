use std::sync::Arc;
use tracing::debug;

use crate::fault::Fault;
use crate::params::{Arg, ParameterResolver};
use crate::route::TargetRef;

use super::core::{Reply, RouteContext, Stage};

/// Constructs or looks up handler instances and invokes their operations.
///
/// External collaborator: the core never constructs handlers itself. A
/// failure returned from [`invoke`](Self::invoke) is wrapped by the
/// invocation stage and routed by its root cause.
pub trait TargetInvoker: Send + Sync {
    fn invoke(&self, target: &TargetRef, args: &[Arg]) -> Result<Reply, Fault>;
}

/// Innermost stage: resolve the route's arguments and invoke its target.
pub struct InvocationStage {
    resolver: Arc<ParameterResolver>,
    invoker: Arc<dyn TargetInvoker>,
}

impl InvocationStage {
    #[must_use]
    pub fn new(resolver: Arc<ParameterResolver>, invoker: Arc<dyn TargetInvoker>) -> Self {
        Self { resolver, invoker }
    }
}

impl Stage for InvocationStage {
    fn process(&self, ctx: &mut RouteContext<'_>) -> Result<Reply, Fault> {
        let args = self.resolver.resolve(&ctx.route, ctx.request)?;
        debug!(
            target_op = %ctx.route.target(),
            arg_count = args.len(),
            "Invoking target operation"
        );
        self.invoker
            .invoke(ctx.route.target(), &args)
            .map_err(Fault::invocation)
    }
}
