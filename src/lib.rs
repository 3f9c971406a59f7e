//! # Switchyard
//!
//! **Switchyard** is a request-routing and dispatch core for building HTTP
//! endpoints declaratively. It matches incoming requests to registered
//! operations, binds operation arguments from multiple request sources,
//! negotiates a response representation, and recovers from failures by
//! rerouting to declared error handlers.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`route`]** - Immutable route descriptors, the fluent builder, and the
//!   route table with its matching and fault-routing algorithms
//! - **[`pipeline`]** - The composable request-processing chain (rendering,
//!   fault recovery, security, pagination, base invocation)
//! - **[`params`]** - Parameter resolution with source precedence, type
//!   conversion, and entity binding
//! - **[`negotiate`]** - Content negotiation between declared representations
//!   and client preferences
//! - **[`pagination`]** - Offset/limit pagination math and link headers
//! - **[`fault`]** - The failure taxonomy and fault-class hierarchy
//! - **[`exchange`]** - Transport-facing request/response interfaces
//! - **[`dispatcher`]** - The per-request entry point tying it all together
//!
//! The HTTP transport, handler construction, view templating, and body codecs
//! stay outside the core, consumed through the narrow traits in [`exchange`],
//! [`pipeline`], [`params`], and [`negotiate`].
//!
//! ## Request flow
//!
//! ```text
//! transport ──▶ Dispatcher::dispatch
//!                 │  RouteTable::route_for (declaration order, first match)
//!                 ▼
//!               RenderStage ─▶ RecoveryStage ─▶ SecurityStage
//!                 ─▶ PaginationStage ─▶ InvocationStage
//!                      │ ParameterResolver (query → header → cookie →
//!                      │                    default → path position)
//!                      ▼
//!                 TargetInvoker (external)
//! ```
//!
//! On failure anywhere inside the chain, the recovery stage unwraps the root
//! cause, resolves a fault route (first declared filter wins, falling back to
//! the default fault route), invokes its error operation with the cause, and
//! the reply renders through the normal negotiation path.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use http::Method;
//! use switchyard::dispatcher::Dispatcher;
//! use switchyard::negotiate::{ContentNegotiator, JsonRenderer};
//! use switchyard::params::{CodecRegistry, ConverterRegistry, ParameterResolver};
//! use switchyard::route::{ParamType, ParameterSpec, Route, RouteTable};
//! # use switchyard::pipeline::{AuthorizationProvider, TargetInvoker};
//! # fn invoker() -> Arc<dyn TargetInvoker> { unimplemented!() }
//! # fn authorizer() -> Arc<dyn AuthorizationProvider> { unimplemented!() }
//!
//! let table = RouteTable::builder()
//!     .route(
//!         Route::builder()
//!             .path("/cars/{id}")
//!             .method(Method::GET)
//!             .target("CarHandler", "show")
//!             .param(ParameterSpec::path("id", ParamType::Integer))
//!             .produces(&["application/json"])
//!             .build()?,
//!     )
//!     .build()?;
//!
//! let mut negotiator = ContentNegotiator::new();
//! negotiator.register(Arc::new(JsonRenderer));
//!
//! let resolver = ParameterResolver::new(
//!     Arc::new(ConverterRegistry::with_defaults()),
//!     Arc::new(CodecRegistry::with_json()),
//! );
//!
//! let dispatcher = Dispatcher::new(
//!     Arc::new(table),
//!     Arc::new(resolver),
//!     invoker(),
//!     authorizer(),
//!     Arc::new(negotiator),
//! );
//! # Ok::<(), switchyard::route::ConfigError>(())
//! ```
//!
//! ## Concurrency
//!
//! Everything built at startup (table, registries, pipeline, dispatcher)
//! is immutable and shared across request threads without locking. Request
//! state lives in per-dispatch values and is never shared. Processing is one
//! synchronous call stack per request; the core neither suspends nor times
//! out.

pub mod dispatcher;
pub mod exchange;
pub mod fault;
pub mod negotiate;
pub mod pagination;
pub mod params;
pub mod pipeline;
pub mod route;

pub use dispatcher::Dispatcher;
pub use exchange::{HttpRequest, HttpResponse};
pub use fault::{Fault, FaultClass, FaultInfo};
pub use negotiate::{ContentNegotiator, JsonRenderer, Renderer, ViewResolver};
pub use pagination::{PageInfo, PaginationCalculator};
pub use params::{
    Arg, ArgValue, BodyCodec, CodecRegistry, ConverterRegistry, ParameterResolver,
};
pub use pipeline::{
    AuthorizationProvider, Pipeline, Reply, RouteContext, Stage, TargetInvoker,
};
pub use route::{
    ConfigError, PaginationConfig, PaginationStyle, ParamSource, ParamType, ParameterSpec,
    Route, RouteTable, TargetRef,
};
