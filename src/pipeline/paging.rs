use std::sync::Arc;
use tracing::debug;

use crate::fault::Fault;
use crate::pagination::{PageInfo, PaginationCalculator};
use crate::params::{Arg, ParameterResolver};

use super::core::{Reply, RouteContext, Stage};
use super::invoke::TargetInvoker;

/// Handles paginated routes: builds the page window, invokes the target with
/// it prepended, and attaches link headers to collection replies.
///
/// Non-paginated routes delegate unchanged to the inner chain.
pub struct PaginationStage {
    next: Box<dyn Stage>,
    resolver: Arc<ParameterResolver>,
    invoker: Arc<dyn TargetInvoker>,
    calculator: PaginationCalculator,
}

impl PaginationStage {
    #[must_use]
    pub fn new(
        next: Box<dyn Stage>,
        resolver: Arc<ParameterResolver>,
        invoker: Arc<dyn TargetInvoker>,
    ) -> Self {
        Self {
            next,
            resolver,
            invoker,
            calculator: PaginationCalculator::new(),
        }
    }
}

impl Stage for PaginationStage {
    fn process(&self, ctx: &mut RouteContext<'_>) -> Result<Reply, Fault> {
        let Some(config) = ctx.route.pagination().cloned() else {
            return self.next.process(ctx);
        };

        let args = self.resolver.resolve(&ctx.route, ctx.request)?;
        let offset = resolved_u64(&args, &config.offset_param).unwrap_or(config.default_offset);
        let limit = resolved_u64(&args, &config.limit_param).unwrap_or(config.default_limit);
        let page = PageInfo::new(&config, offset, limit);

        debug!(
            target_op = %ctx.route.target(),
            offset = page.offset,
            limit = page.limit,
            "Paginated invocation"
        );

        let mut call_args = Vec::with_capacity(args.len() + 1);
        call_args.push(Arg::page("page", page.clone()));
        call_args.extend(args);

        let mut reply = self
            .invoker
            .invoke(ctx.route.target(), &call_args)
            .map_err(Fault::invocation)?;

        // Only collection replies get links; anything else passes through.
        if let Some(items) = reply.body.as_array() {
            let result_len = items.len();
            let headers = self.calculator.link_headers(
                &config,
                &page,
                ctx.request.path(),
                ctx.request.query_string(),
                None,
                result_len,
            );
            for (name, value) in headers {
                reply.set_header(&name, value);
            }
        }

        Ok(reply)
    }
}

fn resolved_u64(args: &[Arg], name: &str) -> Option<u64> {
    args.iter()
        .find(|arg| arg.name == name)
        .and_then(Arg::as_scalar)
        .and_then(|value| value.as_u64())
}
