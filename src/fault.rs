//! # Fault Module
//!
//! Failure taxonomy for the dispatch core.
//!
//! A [`Fault`] is the value that travels up the processing pipeline when a
//! request cannot be completed. Instead of relying on `dyn Any` downcasting,
//! every fault carries an explicit [`FaultClass`] descriptor. Classes form a
//! single-parent hierarchy rooted at [`FAULT`]; fault routes declare the
//! classes they handle and matching walks the ancestor chain
//! (assignable-from semantics).
//!
//! Faults can wrap other faults. The innermost fault, the *root cause*, is
//! what fault-route matching operates on, so a target failure wrapped in an
//! [`INVOCATION`] fault still routes by its original class.
//!
//! Configuration errors raised while building routes are a separate type
//! ([`crate::route::ConfigError`]); they abort startup and are never
//! expressed as faults.

use serde::Serialize;
use std::fmt;

/// Descriptor for one class of failure.
///
/// Classes are declared as `static` values and referenced by address, so two
/// classes are the same class only when they are the same `static`. Every
/// class has at most one parent; the built-in taxonomy chains up to [`FAULT`].
///
/// ```
/// use switchyard::fault::{FaultClass, FAULT};
///
/// static STORAGE: FaultClass = FaultClass::new("Storage", &FAULT);
/// static TIMEOUT: FaultClass = FaultClass::new("StorageTimeout", &STORAGE);
///
/// assert!(STORAGE.assignable_from(&TIMEOUT));
/// assert!(!TIMEOUT.assignable_from(&STORAGE));
/// ```
#[derive(Debug)]
pub struct FaultClass {
    name: &'static str,
    parent: Option<&'static FaultClass>,
}

impl FaultClass {
    /// Declare a class under the given parent.
    #[must_use]
    pub const fn new(name: &'static str, parent: &'static FaultClass) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    /// Declare a class with no parent.
    ///
    /// Only classes whose ancestor chain ends at [`FAULT`] are accepted as
    /// route filters; a foreign root is rejected at route-build time.
    #[must_use]
    pub const fn new_root(name: &'static str) -> Self {
        Self { name, parent: None }
    }

    /// Class name as declared.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parent class, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&'static FaultClass> {
        self.parent
    }

    /// Whether `self` and `other` are the same declared class.
    #[inline]
    #[must_use]
    pub fn same(&self, other: &FaultClass) -> bool {
        std::ptr::eq(self, other)
    }

    /// Whether a fault of class `other` can be handled by a filter declaring
    /// `self`: true when `other` is `self` or a descendant of `self`.
    #[must_use]
    pub fn assignable_from(&self, other: &FaultClass) -> bool {
        let mut current = Some(other);
        while let Some(class) = current {
            if self.same(class) {
                return true;
            }
            current = class.parent;
        }
        false
    }

    /// The root of this class's ancestor chain.
    #[must_use]
    pub fn root(&self) -> &FaultClass {
        let mut current = self;
        while let Some(parent) = current.parent {
            current = parent;
        }
        current
    }
}

impl fmt::Display for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Root of the built-in failure hierarchy. Every routable fault class must
/// chain up to this value.
pub static FAULT: FaultClass = FaultClass::new_root("Fault");

/// No route matched the request's method, path, and accept preferences.
pub static ROUTE_NOT_FOUND: FaultClass = FaultClass::new("RouteNotFound", &FAULT);

/// No registered renderer satisfies the route's produces list and the
/// client's accept preferences.
pub static NO_ACCEPTABLE_RESPONDER: FaultClass =
    FaultClass::new("NoAcceptableResponder", &FAULT);

/// A declared parameter could not be resolved from any source.
pub static MISSING_PARAMETER: FaultClass = FaultClass::new("MissingParameter", &FAULT);

/// A single-valued parameter was supplied more than once.
pub static MULTIPLE_VALUES_UNSUPPORTED: FaultClass =
    FaultClass::new("MultipleValuesUnsupported", &FAULT);

/// No body codec is registered for any of the route's consumed media types.
pub static NO_CONSUMER_FOR_MEDIA_TYPE: FaultClass =
    FaultClass::new("NoConsumerForMediaType", &FAULT);

/// A parameter value could not be converted to its declared type.
pub static PARAMETER_CONVERSION: FaultClass =
    FaultClass::new("ParameterConversion", &FAULT);

/// The request body could not be decoded by the selected codec.
pub static MALFORMED_ENTITY: FaultClass = FaultClass::new("MalformedEntity", &FAULT);

/// The authorization provider rejected the request.
pub static UNAUTHORIZED: FaultClass = FaultClass::new("Unauthorized", &FAULT);

/// Wrapper around a failure thrown by a target operation. The wrapped cause
/// is what fault-route matching sees.
pub static INVOCATION: FaultClass = FaultClass::new("Invocation", &FAULT);

/// A request-time failure.
///
/// Carries the class used for fault-route matching, a human-readable message,
/// an optional HTTP status (the "status-code capability" honored by the
/// recovery stage), and an optional cause chain.
#[derive(Debug)]
pub struct Fault {
    class: &'static FaultClass,
    message: String,
    status: Option<u16>,
    cause: Option<Box<Fault>>,
}

impl Fault {
    /// Create a fault of the given class.
    #[must_use]
    pub fn new(class: &'static FaultClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
            status: None,
            cause: None,
        }
    }

    /// Attach an HTTP status to this fault.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach a cause, making this fault a wrapper.
    #[must_use]
    pub fn caused_by(mut self, cause: Fault) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// The class this fault routes by.
    #[must_use]
    pub fn class(&self) -> &'static FaultClass {
        self.class
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, if this fault carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Direct cause, if this fault wraps another.
    #[must_use]
    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_deref()
    }

    /// The innermost fault of the cause chain.
    #[must_use]
    pub fn root_cause(&self) -> &Fault {
        let mut current = self;
        while let Some(cause) = current.cause.as_deref() {
            current = cause;
        }
        current
    }

    /// Consume the chain, returning the innermost fault by value.
    #[must_use]
    pub fn into_root_cause(mut self) -> Fault {
        while let Some(cause) = self.cause {
            self = *cause;
        }
        self
    }

    /// No route matched the request.
    #[must_use]
    pub fn route_not_found(method: &http::Method, path: &str) -> Self {
        Self::new(
            &ROUTE_NOT_FOUND,
            format!("no route matches {method} {path}"),
        )
        .with_status(404)
    }

    /// No renderer satisfies the negotiation.
    #[must_use]
    pub fn no_acceptable_responder(accept: &[String]) -> Self {
        Self::new(
            &NO_ACCEPTABLE_RESPONDER,
            format!("no renderer satisfies accept preferences {accept:?}"),
        )
        .with_status(406)
    }

    /// A parameter is missing from every source.
    #[must_use]
    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            &MISSING_PARAMETER,
            format!("parameter '{name}' was not supplied by any source"),
        )
        .with_status(400)
    }

    /// A single-valued parameter arrived with multiple values.
    #[must_use]
    pub fn multiple_values(name: &str) -> Self {
        Self::new(
            &MULTIPLE_VALUES_UNSUPPORTED,
            format!("parameter '{name}' has multiple values but expects one"),
        )
        .with_status(400)
    }

    /// No codec can consume the route's declared media types.
    #[must_use]
    pub fn no_consumer(consumes: &[String]) -> Self {
        Self::new(
            &NO_CONSUMER_FOR_MEDIA_TYPE,
            format!("no body codec registered for media types {consumes:?}"),
        )
        .with_status(415)
    }

    /// The authorization provider rejected the request.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(&UNAUTHORIZED, message).with_status(401)
    }

    /// Wrap a failure thrown by a target operation.
    #[must_use]
    pub fn invocation(cause: Fault) -> Self {
        Self::new(
            &INVOCATION,
            format!("target operation failed: {}", cause.message),
        )
        .caused_by(cause)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.class.name, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Fault {}

/// Serializable summary of a fault, handed to error operations as their sole
/// argument when they declare one parameter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FaultInfo {
    /// Name of the fault class of the root cause.
    pub class: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status carried by the fault, if any.
    pub status: Option<u16>,
}

impl From<&Fault> for FaultInfo {
    fn from(fault: &Fault) -> Self {
        Self {
            class: fault.class.name.to_string(),
            message: fault.message.clone(),
            status: fault.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BRANCH: FaultClass = FaultClass::new("Branch", &FAULT);
    static LEAF: FaultClass = FaultClass::new("Leaf", &BRANCH);

    #[test]
    fn assignability_walks_ancestors() {
        assert!(FAULT.assignable_from(&LEAF));
        assert!(BRANCH.assignable_from(&LEAF));
        assert!(LEAF.assignable_from(&LEAF));
        assert!(!LEAF.assignable_from(&BRANCH));
    }

    #[test]
    fn root_cause_unwraps_wrappers() {
        let inner = Fault::new(&LEAF, "boom").with_status(503);
        let wrapped = Fault::invocation(inner);
        assert!(wrapped.class().same(&INVOCATION));
        assert!(wrapped.root_cause().class().same(&LEAF));
        assert_eq!(wrapped.into_root_cause().status(), Some(503));
    }
}
