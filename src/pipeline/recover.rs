use std::sync::Arc;
use tracing::warn;

use crate::fault::{Fault, FaultInfo};
use crate::params::Arg;

use super::core::{Reply, RouteContext, Stage};
use super::invoke::TargetInvoker;

/// Recovers from faults thrown by the inner chain by rerouting to a declared
/// fault route.
///
/// The thrown fault's root cause is unwrapped first, so a target failure
/// wrapped by the invocation stage still routes by its original class. If the
/// cause carries a status, the response status is set before recovery, and
/// the error operation's reply flows out through the enclosing render stage
/// like any success. A failure of the error operation itself propagates
/// uncaught; a double failure is a hard stop.
pub struct RecoveryStage {
    next: Box<dyn Stage>,
    invoker: Arc<dyn TargetInvoker>,
}

impl RecoveryStage {
    #[must_use]
    pub fn new(next: Box<dyn Stage>, invoker: Arc<dyn TargetInvoker>) -> Self {
        Self { next, invoker }
    }
}

impl Stage for RecoveryStage {
    fn process(&self, ctx: &mut RouteContext<'_>) -> Result<Reply, Fault> {
        match self.next.process(ctx) {
            Ok(reply) => Ok(reply),
            Err(fault) => {
                let cause = fault.into_root_cause();
                warn!(
                    fault_class = cause.class().name(),
                    message = %cause.message(),
                    "Recovering from fault"
                );
                let route = ctx.table.route_for_fault(cause.class());
                ctx.retarget(route);
                recover(ctx, &cause, &self.invoker)
            }
        }
    }
}

/// Invoke the fault route currently targeted by the context.
///
/// The cause is passed as the operation's sole argument when it declares
/// exactly one parameter, and omitted otherwise.
pub(crate) fn recover(
    ctx: &mut RouteContext<'_>,
    cause: &Fault,
    invoker: &Arc<dyn TargetInvoker>,
) -> Result<Reply, Fault> {
    if let Some(status) = cause.status() {
        ctx.response.set_status(status);
    }

    let args = if let [spec] = ctx.route.parameters() {
        vec![Arg::fault(spec.name.clone(), FaultInfo::from(cause))]
    } else {
        Vec::new()
    };

    invoker.invoke(ctx.route.target(), &args)
}
