//! # Pipeline Module
//!
//! The composable request-processing chain.
//!
//! ## Stage order
//!
//! Each [`Stage`] wraps a delegate and may short-circuit, delegate unchanged,
//! or delegate and post-process. The canonical composition, outermost first:
//!
//! 1. [`RenderStage`]: delegates, then negotiates and renders the reply.
//! 2. [`RecoveryStage`]: catches faults from inside, reroutes to a fault
//!    route, and returns the error operation's reply in their place.
//! 3. [`SecurityStage`]: authorizes secured routes before anything runs.
//! 4. [`PaginationStage`]: builds the page window for paginated routes and
//!    attaches link headers to collection replies.
//! 5. [`InvocationStage`]: resolves arguments and invokes the target.
//!
//! Because recovery sits inside rendering, an error operation's reply is
//! rendered with exactly the same negotiation rules as a success.
//!
//! ## Lifecycle
//!
//! The chain is composed once at startup ([`Pipeline::standard`] or the
//! explicit [`Pipeline::builder`] + `wrap` form) and holds no per-request
//! state; one instance serves all request threads. Per-request state lives in
//! [`RouteContext`], which threads mutably through the stages.

mod core;
mod invoke;
mod paging;
mod recover;
mod render;
mod security;

pub use core::{HeaderVec, Pipeline, PipelineBuilder, Reply, RouteContext, Stage, MAX_INLINE_HEADERS};
pub use invoke::{InvocationStage, TargetInvoker};
pub use paging::PaginationStage;
pub use recover::RecoveryStage;
pub use render::RenderStage;
pub use security::{AuthorizationProvider, SecurityStage};

pub(crate) use recover::recover;
