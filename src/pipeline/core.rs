use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::Arc;

use crate::exchange::{HttpRequest, HttpResponse};
use crate::fault::Fault;
use crate::negotiate::ContentNegotiator;
use crate::params::ParameterResolver;
use crate::route::{Route, RouteTable};

use super::invoke::{InvocationStage, TargetInvoker};
use super::paging::PaginationStage;
use super::recover::RecoveryStage;
use super::render::RenderStage;
use super::security::{AuthorizationProvider, SecurityStage};

/// Maximum inline reply headers before heap allocation. Replies rarely carry
/// more than a content type and a couple of pagination links.
pub const MAX_INLINE_HEADERS: usize = 8;

/// Stack-allocated header storage for reply values.
pub type HeaderVec = SmallVec<[(String, String); MAX_INLINE_HEADERS]>;

/// Result of a target invocation, threaded through the stages.
///
/// `headers` is the reply's response-headers capability: the negotiator
/// copies them onto the outbound response before the body is written, which
/// is how pagination link headers travel. `status`, when present, overrides
/// the response status at render time.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub status: Option<u16>,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl Reply {
    /// Reply with the given body and no explicit status.
    #[must_use]
    pub fn new(body: Value) -> Self {
        Self {
            status: None,
            headers: HeaderVec::new(),
            body,
        }
    }

    /// Reply with an explicit status.
    #[must_use]
    pub fn with_status(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            headers: HeaderVec::new(),
            body,
        }
    }

    /// Header lookup, case-insensitive.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value));
    }
}

/// Request-scoped dispatch state.
///
/// Created once per dispatch and threaded mutably through the stages; never
/// shared across requests. Recovery retargets the context at a fault route
/// mid-flight, which is why the route table rides along.
pub struct RouteContext<'a> {
    /// The route currently targeted; swapped by fault recovery.
    pub route: Arc<Route>,
    /// Normalized request path.
    pub path: String,
    /// Parsed accept preferences, in client order.
    pub accept: Vec<String>,
    pub request: &'a dyn HttpRequest,
    pub response: &'a mut dyn HttpResponse,
    pub table: &'a RouteTable,
}

impl<'a> RouteContext<'a> {
    #[must_use]
    pub fn new(
        route: Arc<Route>,
        request: &'a dyn HttpRequest,
        response: &'a mut dyn HttpResponse,
        table: &'a RouteTable,
    ) -> Self {
        let path = request.path().to_string();
        let accept = request.accept();
        Self {
            route,
            path,
            accept,
            request,
            response,
            table,
        }
    }

    /// Swap the targeted route, keeping the rest of the state.
    pub fn retarget(&mut self, route: Arc<Route>) {
        self.route = route;
    }
}

/// One link of the processing chain.
///
/// A stage owns its delegate and may short-circuit, delegate unchanged, or
/// delegate and post-process the result. Stages are composed once at startup
/// and hold no per-request state, so one chain serves all request threads.
pub trait Stage: Send + Sync {
    fn process(&self, ctx: &mut RouteContext<'_>) -> Result<Reply, Fault>;
}

/// The composed processing chain.
///
/// Built via [`Pipeline::standard`] for the canonical stage order or
/// [`Pipeline::builder`] for explicit composition.
pub struct Pipeline {
    head: Box<dyn Stage>,
}

impl Pipeline {
    /// Start composing from the innermost (base) stage.
    #[must_use]
    pub fn builder(base: Box<dyn Stage>) -> PipelineBuilder {
        PipelineBuilder { head: base }
    }

    /// The canonical chain, outermost first: response rendering, fault
    /// recovery, security, pagination, base invocation.
    #[must_use]
    pub fn standard(
        resolver: Arc<ParameterResolver>,
        invoker: Arc<dyn TargetInvoker>,
        authorizer: Arc<dyn AuthorizationProvider>,
        negotiator: Arc<ContentNegotiator>,
    ) -> Self {
        Pipeline::builder(Box::new(InvocationStage::new(
            Arc::clone(&resolver),
            Arc::clone(&invoker),
        )))
        .wrap(|inner| PaginationStage::new(inner, resolver, Arc::clone(&invoker)))
        .wrap(|inner| SecurityStage::new(inner, authorizer))
        .wrap(|inner| RecoveryStage::new(inner, invoker))
        .wrap(|inner| RenderStage::new(inner, negotiator))
        .build()
    }

    /// Run the request through the chain.
    pub fn process(&self, ctx: &mut RouteContext<'_>) -> Result<Reply, Fault> {
        self.head.process(ctx)
    }
}

/// Explicit inner-to-outer chain composition.
///
/// Each [`wrap`](PipelineBuilder::wrap) call wraps the chain built so far, so
/// the last wrap is the outermost stage. This keeps the composition order a
/// visible, testable piece of startup configuration rather than an implicit
/// discovery order.
pub struct PipelineBuilder {
    head: Box<dyn Stage>,
}

impl PipelineBuilder {
    /// Wrap the current chain in another stage.
    #[must_use]
    pub fn wrap<F, S>(self, wrap: F) -> Self
    where
        F: FnOnce(Box<dyn Stage>) -> S,
        S: Stage + 'static,
    {
        Self {
            head: Box::new(wrap(self.head)),
        }
    }

    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline { head: self.head }
    }
}
