//! # Pagination Module
//!
//! Offset/limit pagination math and link computation.
//!
//! [`PageInfo`] is the request-scoped window handed to paginated target
//! operations; [`PaginationCalculator`] turns a window, the originating
//! query string, and the result-set size into link header values, in either
//! header-pair or RFC 5988 web-linking form. The calculator rewrites the
//! literal query string textually rather than parsing it, so unrelated
//! parameters keep their exact wire form and ordering.

mod core;

pub use core::{rewrite_query, PageInfo, PageLinks, PaginationCalculator};
