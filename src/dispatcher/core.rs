use std::sync::Arc;
use tracing::{info, warn};

use crate::exchange::{HttpRequest, HttpResponse};
use crate::fault::Fault;
use crate::negotiate::ContentNegotiator;
use crate::params::ParameterResolver;
use crate::pipeline::{recover, Pipeline, Reply, RouteContext, TargetInvoker};
use crate::pipeline::AuthorizationProvider;
use crate::route::RouteTable;

/// Front door of the core: matches a request against the route table, builds
/// the request-scoped context, and runs the processing pipeline.
///
/// Match failures take the same fault path as failures inside the chain: the
/// `ROUTE_NOT_FOUND` fault is routed to a fault route (the default one unless
/// a declared route handles it), its error operation is invoked, and the
/// reply is rendered through the standard negotiation rules.
///
/// Built once at startup; immutable and shareable across request threads.
pub struct Dispatcher {
    table: Arc<RouteTable>,
    pipeline: Pipeline,
    invoker: Arc<dyn TargetInvoker>,
    negotiator: Arc<ContentNegotiator>,
}

impl Dispatcher {
    /// Assemble a dispatcher around the canonical pipeline.
    #[must_use]
    pub fn new(
        table: Arc<RouteTable>,
        resolver: Arc<ParameterResolver>,
        invoker: Arc<dyn TargetInvoker>,
        authorizer: Arc<dyn AuthorizationProvider>,
        negotiator: Arc<ContentNegotiator>,
    ) -> Self {
        let pipeline = Pipeline::standard(
            resolver,
            Arc::clone(&invoker),
            authorizer,
            Arc::clone(&negotiator),
        );
        Self {
            table,
            pipeline,
            invoker,
            negotiator,
        }
    }

    /// Assemble a dispatcher around an explicitly composed pipeline.
    #[must_use]
    pub fn with_pipeline(
        table: Arc<RouteTable>,
        pipeline: Pipeline,
        invoker: Arc<dyn TargetInvoker>,
        negotiator: Arc<ContentNegotiator>,
    ) -> Self {
        Self {
            table,
            pipeline,
            invoker,
            negotiator,
        }
    }

    /// The route table this dispatcher serves.
    #[must_use]
    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// Dispatch one request.
    pub fn dispatch(
        &self,
        request: &dyn HttpRequest,
        response: &mut dyn HttpResponse,
    ) -> Result<Reply, Fault> {
        let accept = request.accept();
        match self
            .table
            .route_for(request.method(), request.path(), &accept)
        {
            Ok(route) => {
                info!(
                    method = %request.method(),
                    path = request.path(),
                    target_op = %route.target(),
                    "Dispatching request"
                );
                let mut ctx = RouteContext::new(route, request, response, &self.table);
                self.pipeline.process(&mut ctx)
            }
            Err(fault) => {
                warn!(
                    method = %request.method(),
                    path = request.path(),
                    "Dispatching unmatched request to fault route"
                );
                let route = self.table.route_for_fault(fault.class());
                let mut ctx = RouteContext::new(route, request, response, &self.table);
                let reply = recover(&mut ctx, &fault, &self.invoker)?;
                if let Some(status) = reply.status {
                    ctx.response.set_status(status);
                }
                let route = Arc::clone(&ctx.route);
                self.negotiator
                    .render(&reply, &route, &ctx.accept, ctx.response)?;
                Ok(reply)
            }
        }
    }
}
