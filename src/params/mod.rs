//! # Params Module
//!
//! Parameter resolution: extracting and converting operation arguments from a
//! request according to the matched route's parameter descriptors.
//!
//! ## Source precedence
//!
//! Named parameters (query, header, cookie, path kinds alike) resolve through
//! one strict chain, first success wins:
//!
//! 1. query/form parameter of that name
//! 2. header of that name
//! 3. cookie of that name
//! 4. the descriptor's declared default, converted
//! 5. positional path extraction from the route template's `{` offset
//!
//! A multi-valued query parameter where one value is expected fails with
//! `MULTIPLE_VALUES_UNSUPPORTED` rather than silently picking one; exhausting
//! all five sources fails with `MISSING_PARAMETER`.
//!
//! ## Entity binding
//!
//! Entity parameters bind structurally from uniquely-named form fields
//! (dotted names become nested objects) and otherwise fall back to a body
//! codec selected by the route's consumes list against the [`CodecRegistry`].
//!
//! ## Conversion
//!
//! String values pass through the [`ConverterRegistry`]; the registry is
//! consulted at route-build time so an unregistered parameter type fails
//! startup.

mod convert;
mod entity;
mod resolver;

pub use convert::{ConvertError, Converter, ConverterRegistry};
pub use entity::{bind_form_entity, BodyCodec, CodecRegistry, JsonBodyCodec};
pub use resolver::{Arg, ArgValue, ParameterResolver};
