use http::Method;
use std::collections::HashSet;
use std::fmt;

use crate::fault::{FaultClass, FAULT};

use super::core::{PaginationConfig, ParameterSpec, Route, TargetRef};

/// Route configuration error.
///
/// Raised while building a [`Route`] or a
/// [`RouteTable`](crate::route::RouteTable). Configuration errors are fatal
/// to startup and are never routed through fault recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Every route needs a target operation.
    MissingTarget,
    /// A route with a path declared no methods and no fault filters, so it
    /// could never match.
    PathWithoutMethods {
        /// The unreachable path template.
        path: String,
    },
    /// A path template carried more than one `{param}` marker.
    ///
    /// Matching distinguishes a single parameter position; additional markers
    /// would silently become literal text.
    MultipleMarkers {
        /// The offending path template.
        path: String,
    },
    /// A fault filter does not chain up to the core failure root.
    ForeignFaultClass {
        /// Name of the rejected class.
        class: &'static str,
    },
    /// A replacement default fault route does not handle the root class, so
    /// faults with no matching route would have nowhere to go.
    DefaultFaultRouteTooNarrow {
        /// Target of the rejected route.
        target: String,
    },
    /// A parameter's declared type has no registered converter.
    NoConverter {
        /// Name of the parameter.
        parameter: String,
        /// Converter key that failed to resolve.
        type_key: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingTarget => {
                write!(f, "route configuration error: no target operation declared")
            }
            ConfigError::PathWithoutMethods { path } => {
                write!(
                    f,
                    "route configuration error: path '{path}' declared without any HTTP method \
                    and can never match"
                )
            }
            ConfigError::MultipleMarkers { path } => {
                write!(
                    f,
                    "route configuration error: path '{path}' carries more than one {{param}} \
                    marker; only one parameter position is supported"
                )
            }
            ConfigError::ForeignFaultClass { class } => {
                write!(
                    f,
                    "route configuration error: fault filter '{class}' is not rooted at the \
                    core Fault class"
                )
            }
            ConfigError::DefaultFaultRouteTooNarrow { target } => {
                write!(
                    f,
                    "route configuration error: default fault route '{target}' must handle \
                    the root Fault class"
                )
            }
            ConfigError::NoConverter {
                parameter,
                type_key,
            } => {
                write!(
                    f,
                    "route configuration error: parameter '{parameter}' declares type \
                    '{type_key}' but no converter is registered for it"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Fluent builder for [`Route`] values.
///
/// Each declaration step records symbolic identifiers directly; nothing is
/// captured reflectively. Validation happens in [`build`](Self::build), so a
/// bad declaration fails at startup, not at request time.
///
/// # Example
///
/// ```
/// use http::Method;
/// use switchyard::route::{ParamType, ParameterSpec, Route};
///
/// let route = Route::builder()
///     .path("/cars/{id}")
///     .method(Method::GET)
///     .target("CarHandler", "show")
///     .role("admin")
///     .param(ParameterSpec::path("id", ParamType::Integer))
///     .produces(&["application/json"])
///     .build()
///     .expect("invalid route");
///
/// assert!(route.is_parameterized());
/// assert!(route.is_secured());
/// ```
#[derive(Debug, Default)]
pub struct RouteBuilder {
    path: Option<String>,
    methods: HashSet<Method>,
    target: Option<TargetRef>,
    parameters: Vec<ParameterSpec>,
    produces: Vec<String>,
    consumes: Vec<String>,
    roles: HashSet<String>,
    fault_filters: Vec<&'static FaultClass>,
    pagination: Option<PaginationConfig>,
}

impl RouteBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path template, literal or with one `{param}` marker.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.insert(method);
        self
    }

    #[must_use]
    pub fn methods(mut self, methods: &[Method]) -> Self {
        self.methods.extend(methods.iter().cloned());
        self
    }

    /// Target operation as handler type plus operation name.
    #[must_use]
    pub fn target(mut self, handler: impl Into<String>, operation: impl Into<String>) -> Self {
        self.target = Some(TargetRef::new(handler, operation));
        self
    }

    /// Append a parameter descriptor; declaration order is invocation order.
    #[must_use]
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    #[must_use]
    pub fn produces(mut self, media_types: &[&str]) -> Self {
        self.produces
            .extend(media_types.iter().map(|m| m.to_ascii_lowercase()));
        self
    }

    #[must_use]
    pub fn consumes(mut self, media_types: &[&str]) -> Self {
        self.consumes
            .extend(media_types.iter().map(|m| m.to_ascii_lowercase()));
        self
    }

    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    #[must_use]
    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.roles.extend(roles.iter().map(|r| r.to_string()));
        self
    }

    /// Declare this route as a fault route handling the given class.
    ///
    /// May be called multiple times. Filters are checked against the core
    /// failure root in [`build`](Self::build).
    #[must_use]
    pub fn handles(mut self, class: &'static FaultClass) -> Self {
        self.fault_filters.push(class);
        self
    }

    /// Attach pagination configuration.
    #[must_use]
    pub fn paginated(mut self, config: PaginationConfig) -> Self {
        self.pagination = Some(config);
        self
    }

    /// Validate and freeze the route.
    pub fn build(self) -> Result<Route, ConfigError> {
        let target = self.target.ok_or(ConfigError::MissingTarget)?;

        for filter in &self.fault_filters {
            if !std::ptr::eq(filter.root(), &FAULT) {
                return Err(ConfigError::ForeignFaultClass {
                    class: filter.name(),
                });
            }
        }

        let brace_offset = match &self.path {
            Some(path) => {
                if path.matches('{').count() > 1 {
                    return Err(ConfigError::MultipleMarkers { path: path.clone() });
                }
                path.find('{')
            }
            None => None,
        };

        if let Some(path) = &self.path {
            if self.methods.is_empty() && self.fault_filters.is_empty() {
                return Err(ConfigError::PathWithoutMethods { path: path.clone() });
            }
        }

        Ok(Route {
            path: self.path,
            brace_offset,
            methods: self.methods,
            target,
            parameters: self.parameters,
            produces: self.produces,
            consumes: self.consumes,
            roles: self.roles,
            fault_filters: self.fault_filters,
            pagination: self.pagination,
        })
    }
}
