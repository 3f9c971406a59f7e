//! # Route Module
//!
//! Route descriptors and the route table.
//!
//! ## Overview
//!
//! A [`Route`] is an immutable descriptor binding a request pattern (or a
//! set of fault classes) to a target operation. Routes are declared through
//! the fluent [`RouteBuilder`] and collected into a [`RouteTable`], which
//! resolves incoming requests ([`RouteTable::route_for`]) and thrown faults
//! ([`RouteTable::route_for_fault`]) to routes.
//!
//! ## Matching
//!
//! Both resolution algorithms are linear scans in declaration order with
//! first-match-wins semantics. There is no specificity ranking: declaration
//! order is the only precedence. For fault routes in particular this means a
//! route handling a broad class declared before a route handling one of its
//! subclasses will always win; this contract is deliberate and covered by
//! tests rather than silently "fixed".
//!
//! ## Construction
//!
//! Tables are built once at startup. All validation (target presence, fault
//! filters rooted at [`crate::fault::FAULT`], converter availability for
//! every declared parameter type) happens at build time and raises
//! [`ConfigError`], which is fatal to startup.

mod builder;
mod core;
mod table;

pub use builder::{ConfigError, RouteBuilder};
pub use core::{
    PaginationConfig, PaginationStyle, ParamSource, ParamType, ParameterSpec, Route, TargetRef,
};
pub use table::{RouteTable, RouteTableBuilder};
