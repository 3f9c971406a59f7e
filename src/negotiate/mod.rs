//! # Negotiate Module
//!
//! Content negotiation between a route's declared representations and the
//! client's accept preferences.
//!
//! The [`ContentNegotiator`] holds the [`Renderer`] registry and picks the
//! representation by intersecting the route's `produces` list with the
//! parsed accept list, in `produces` order: a route producing
//! `[application/json, text/html]` renders JSON even for an accept header of
//! `text/html, application/json`. Empty or wildcard accept lists fall back to
//! the renderer accepting `*/*` ([`JsonRenderer`] by convention).

mod core;
mod json;

pub use core::{ContentNegotiator, Renderer, ViewResolver};
pub use json::JsonRenderer;
