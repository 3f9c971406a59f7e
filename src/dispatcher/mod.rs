//! # Dispatcher Module
//!
//! The [`Dispatcher`] ties the pieces together: route table, parameter
//! resolver, target invoker, authorization provider, and content negotiator,
//! composed around the canonical pipeline. Hosting transports call
//! [`Dispatcher::dispatch`] once per request with their adapted
//! request/response views.

mod core;

pub use core::Dispatcher;
