use std::sync::Arc;

use crate::fault::Fault;
use crate::negotiate::ContentNegotiator;

use super::core::{Reply, RouteContext, Stage};

/// Outermost stage: delegates, then renders the returned reply into the
/// outbound response through the content negotiator.
///
/// Error operation replies pass through here too, so failures render with
/// the same negotiation rules as successes.
pub struct RenderStage {
    next: Box<dyn Stage>,
    negotiator: Arc<ContentNegotiator>,
}

impl RenderStage {
    #[must_use]
    pub fn new(next: Box<dyn Stage>, negotiator: Arc<ContentNegotiator>) -> Self {
        Self { next, negotiator }
    }
}

impl Stage for RenderStage {
    fn process(&self, ctx: &mut RouteContext<'_>) -> Result<Reply, Fault> {
        let reply = self.next.process(ctx)?;
        if let Some(status) = reply.status {
            ctx.response.set_status(status);
        }
        let route = Arc::clone(&ctx.route);
        self.negotiator
            .render(&reply, &route, &ctx.accept, ctx.response)?;
        Ok(reply)
    }
}
