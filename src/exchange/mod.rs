//! # Exchange Module
//!
//! Narrow interfaces to the HTTP transport.
//!
//! The dispatch core never talks to a socket or an HTTP parser. The hosting
//! framework adapts its own request/response types to [`HttpRequest`] and
//! [`HttpResponse`] and hands them to the
//! [`Dispatcher`](crate::dispatcher::Dispatcher) once per request. All I/O
//! through these traits is synchronous; a blocked read blocks the request's
//! thread.
//!
//! The parsing helpers ([`parse_query_params`], [`parse_cookies`],
//! [`parse_accept`]) are what transports typically use when implementing
//! [`HttpRequest`].

mod request;
mod response;

pub use request::{parse_accept, parse_cookies, parse_query_params, HttpRequest};
pub use response::HttpResponse;
