use std::sync::Arc;
use tracing::debug;

use crate::fault::Fault;
use crate::route::Route;

use super::core::{Reply, RouteContext, Stage};

/// Decides whether the current principal may use a route.
///
/// External collaborator: credential extraction and role checking live in the
/// hosting framework. A rejection aborts the chain and propagates to the
/// recovery stage like any other fault.
pub trait AuthorizationProvider: Send + Sync {
    fn authorize(&self, route: &Route) -> Result<(), Fault>;
}

/// Guards secured routes; delegates unchanged for everything else.
pub struct SecurityStage {
    next: Box<dyn Stage>,
    authorizer: Arc<dyn AuthorizationProvider>,
}

impl SecurityStage {
    #[must_use]
    pub fn new(next: Box<dyn Stage>, authorizer: Arc<dyn AuthorizationProvider>) -> Self {
        Self { next, authorizer }
    }
}

impl Stage for SecurityStage {
    fn process(&self, ctx: &mut RouteContext<'_>) -> Result<Reply, Fault> {
        if ctx.route.is_secured() {
            self.authorizer.authorize(&ctx.route)?;
            debug!(target_op = %ctx.route.target(), "Authorization granted");
        }
        self.next.process(ctx)
    }
}
