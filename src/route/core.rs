use crate::fault::FaultClass;
use http::Method;
use std::collections::HashSet;
use std::fmt;

use super::builder::RouteBuilder;

/// Where a parameter value is taken from.
///
/// `Entity` parameters bind from the request body (or structurally from form
/// fields); the other kinds are named values resolved through the common
/// source-precedence chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Path,
    Query,
    Header,
    Cookie,
    Entity,
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSource::Path => write!(f, "Path"),
            ParamSource::Query => write!(f, "Query"),
            ParamSource::Header => write!(f, "Header"),
            ParamSource::Cookie => write!(f, "Cookie"),
            ParamSource::Entity => write!(f, "Entity"),
        }
    }
}

/// Declared target type of a parameter.
///
/// Named parameters arrive as strings and pass through the converter
/// registered for their type key; `Entity` parameters bind structurally or
/// through a body codec instead. `Custom` keys must have a converter
/// registered before the route table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Integer,
    Number,
    Boolean,
    Entity,
    Custom(&'static str),
}

impl ParamType {
    /// Key this type resolves converters under.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            ParamType::Text => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Entity => "entity",
            ParamType::Custom(key) => key,
        }
    }
}

/// Descriptor for one operation argument.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub source: ParamSource,
    pub target_type: ParamType,
    pub default_value: Option<String>,
}

impl ParameterSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, source: ParamSource, target_type: ParamType) -> Self {
        Self {
            name: name.into(),
            source,
            target_type,
            default_value: None,
        }
    }

    #[must_use]
    pub fn query(name: impl Into<String>, target_type: ParamType) -> Self {
        Self::new(name, ParamSource::Query, target_type)
    }

    #[must_use]
    pub fn header(name: impl Into<String>, target_type: ParamType) -> Self {
        Self::new(name, ParamSource::Header, target_type)
    }

    #[must_use]
    pub fn cookie(name: impl Into<String>, target_type: ParamType) -> Self {
        Self::new(name, ParamSource::Cookie, target_type)
    }

    #[must_use]
    pub fn path(name: impl Into<String>, target_type: ParamType) -> Self {
        Self::new(name, ParamSource::Path, target_type)
    }

    /// Body-bound parameter.
    #[must_use]
    pub fn entity(name: impl Into<String>) -> Self {
        Self::new(name, ParamSource::Entity, ParamType::Entity)
    }

    /// Attach a default value, used when every request source is exhausted.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Symbolic identifier of a target operation: handler type plus operation
/// name. Resolved and invoked by the external
/// [`TargetInvoker`](crate::pipeline::TargetInvoker).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetRef {
    pub handler: String,
    pub operation: String,
}

impl TargetRef {
    #[must_use]
    pub fn new(handler: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            operation: operation.into(),
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.handler, self.operation)
    }
}

/// Presentation mode for pagination links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationStyle {
    /// Emit `{prefix}Links-Previous` / `{prefix}Links-Next` header pairs.
    HeaderPair { prefix: String },
    /// Emit a single RFC 5988 `Link` header.
    WebLinking,
}

/// Per-route pagination configuration, attached at build time.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    pub offset_param: String,
    pub limit_param: String,
    pub default_offset: u64,
    pub default_limit: u64,
    pub style: PaginationStyle,
}

impl PaginationConfig {
    /// Header-pair mode with the conventional `offset`/`limit` parameter
    /// names and a limit of 25.
    #[must_use]
    pub fn header_pair(prefix: impl Into<String>) -> Self {
        Self {
            offset_param: "offset".to_string(),
            limit_param: "limit".to_string(),
            default_offset: 0,
            default_limit: 25,
            style: PaginationStyle::HeaderPair {
                prefix: prefix.into(),
            },
        }
    }

    /// Web-linking mode with the conventional parameter names.
    #[must_use]
    pub fn web_linking() -> Self {
        Self {
            offset_param: "offset".to_string(),
            limit_param: "limit".to_string(),
            default_offset: 0,
            default_limit: 25,
            style: PaginationStyle::WebLinking,
        }
    }

    #[must_use]
    pub fn param_names(mut self, offset: impl Into<String>, limit: impl Into<String>) -> Self {
        self.offset_param = offset.into();
        self.limit_param = limit.into();
        self
    }

    #[must_use]
    pub fn defaults(mut self, offset: u64, limit: u64) -> Self {
        self.default_offset = offset;
        self.default_limit = limit;
        self
    }
}

/// Immutable descriptor of one routable operation.
///
/// Built once at startup through [`Route::builder`] and shared behind `Arc`
/// for the process lifetime. A route is either a normal route (methods and
/// usually a path) or a fault route (non-empty fault filters); the builder
/// enforces the split.
///
/// Path templates carry at most one `{param}` marker. Matching against a
/// parameterized template is a literal-prefix check up to the marker, not a
/// full template decomposition.
#[derive(Debug, Clone)]
pub struct Route {
    pub(crate) path: Option<String>,
    pub(crate) brace_offset: Option<usize>,
    pub(crate) methods: HashSet<Method>,
    pub(crate) target: TargetRef,
    pub(crate) parameters: Vec<ParameterSpec>,
    pub(crate) produces: Vec<String>,
    pub(crate) consumes: Vec<String>,
    pub(crate) roles: HashSet<String>,
    pub(crate) fault_filters: Vec<&'static FaultClass>,
    pub(crate) pagination: Option<PaginationConfig>,
}

impl Route {
    /// Start a fluent route declaration.
    #[must_use]
    pub fn builder() -> RouteBuilder {
        RouteBuilder::new()
    }

    /// Path template, if this route matches by path.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Byte offset of the `{` marker in the path template.
    #[must_use]
    pub fn brace_offset(&self) -> Option<usize> {
        self.brace_offset
    }

    /// Whether the path template carries a `{param}` marker.
    #[must_use]
    pub fn is_parameterized(&self) -> bool {
        self.brace_offset.is_some()
    }

    /// HTTP methods this route answers. Read-only snapshot.
    #[must_use]
    pub fn methods(&self) -> &HashSet<Method> {
        &self.methods
    }

    /// Target operation identifier.
    #[must_use]
    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    /// Parameter descriptors in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Producible media types in declaration order.
    #[must_use]
    pub fn produces(&self) -> &[String] {
        &self.produces
    }

    /// Consumable media types in declaration order.
    #[must_use]
    pub fn consumes(&self) -> &[String] {
        &self.consumes
    }

    /// Authorization role names. Read-only snapshot.
    #[must_use]
    pub fn roles(&self) -> &HashSet<String> {
        &self.roles
    }

    /// Fault classes this route handles; non-empty only for fault routes.
    #[must_use]
    pub fn fault_filters(&self) -> &[&'static FaultClass] {
        &self.fault_filters
    }

    /// Pagination configuration, if the route is paginated.
    #[must_use]
    pub fn pagination(&self) -> Option<&PaginationConfig> {
        self.pagination.as_ref()
    }

    /// Whether the route requires authorization.
    #[must_use]
    pub fn is_secured(&self) -> bool {
        !self.roles.is_empty()
    }

    /// Whether this route handles faults rather than requests.
    #[must_use]
    pub fn is_fault_route(&self) -> bool {
        !self.fault_filters.is_empty()
    }

    /// Whether the route matches the request's method, path, and accept
    /// preferences.
    ///
    /// Parameterized templates match by literal prefix: the template text
    /// before `{` must equal the same-length prefix of the request path,
    /// whatever the suffix. Media compatibility holds when the produces list
    /// intersects the accept list, or the accept list is empty or contains
    /// `*/*`.
    #[must_use]
    pub fn matches(&self, method: &Method, path: &str, accept: &[String]) -> bool {
        if !self.methods.contains(method) {
            return false;
        }
        let path_ok = match (&self.path, self.brace_offset) {
            (Some(template), None) => template == path,
            (Some(template), Some(offset)) => {
                path.len() >= offset && template.as_bytes()[..offset] == path.as_bytes()[..offset]
            }
            (None, _) => false,
        };
        if !path_ok {
            return false;
        }
        accept.is_empty()
            || accept.iter().any(|a| a == "*/*")
            || self.produces.iter().any(|p| accept.iter().any(|a| a == p))
    }

    /// Whether a fault of the given class is handled by one of this route's
    /// declared filters (ancestor-of-or-equal semantics).
    #[must_use]
    pub fn handles(&self, class: &FaultClass) -> bool {
        self.fault_filters
            .iter()
            .any(|filter| filter.assignable_from(class))
    }
}
