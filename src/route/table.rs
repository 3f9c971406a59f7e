use http::Method;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::fault::{Fault, FaultClass, FAULT};
use crate::params::ConverterRegistry;

use super::builder::ConfigError;
use super::core::{ParamSource, ParameterSpec, Route};

/// Ordered collection of routes with matching and fault-routing algorithms.
///
/// Built once at startup and immutable afterward; safe to share across
/// request threads without locking. Normal routes and fault routes are kept
/// in separate lists, each preserving declaration order.
///
/// Matching is a linear scan in declaration order: the **first** matching
/// route wins, with no specificity ranking. The same holds for fault routing,
/// which makes overlapping filters order-sensitive; see
/// [`route_for_fault`](Self::route_for_fault).
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Arc<Route>>,
    fault_routes: Vec<Arc<Route>>,
    default_fault_route: Arc<Route>,
}

impl RouteTable {
    /// Start a table declaration.
    #[must_use]
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new()
    }

    /// Normal routes in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Fault routes in declaration order, excluding the default.
    #[must_use]
    pub fn fault_routes(&self) -> &[Arc<Route>] {
        &self.fault_routes
    }

    /// The always-present fallback fault route.
    #[must_use]
    pub fn default_fault_route(&self) -> &Arc<Route> {
        &self.default_fault_route
    }

    /// Whether some route matches the request.
    #[must_use]
    pub fn has_route_for(&self, method: &Method, path: &str, accept: &[String]) -> bool {
        self.routes
            .iter()
            .any(|route| route.matches(method, path, accept))
    }

    /// Resolve the request to a route.
    ///
    /// Linear scan in declaration order; first match wins. No match yields a
    /// [`ROUTE_NOT_FOUND`](crate::fault::ROUTE_NOT_FOUND) fault.
    pub fn route_for(
        &self,
        method: &Method,
        path: &str,
        accept: &[String],
    ) -> Result<Arc<Route>, Fault> {
        debug!(method = %method, path = %path, accept = ?accept, "Route match attempt");

        for route in &self.routes {
            if route.matches(method, path, accept) {
                info!(
                    method = %method,
                    path = %path,
                    target = %route.target(),
                    route_path = route.path().unwrap_or(""),
                    "Route matched"
                );
                return Ok(Arc::clone(route));
            }
        }

        warn!(method = %method, path = %path, "No route matched");
        Err(Fault::route_not_found(method, path))
    }

    /// Resolve a fault class to the fault route that handles it.
    ///
    /// Linear scan in declaration order; the first route whose declared
    /// filter is an ancestor of (or equal to) the fault's class wins. This is
    /// **first-match, not most-specific-match**: a broad filter declared
    /// early shadows narrower filters declared later, so keep broad filters
    /// (especially the root class) last. Falls back to the default fault
    /// route when nothing matches.
    #[must_use]
    pub fn route_for_fault(&self, class: &FaultClass) -> Arc<Route> {
        for route in &self.fault_routes {
            if route.handles(class) {
                debug!(
                    fault_class = class.name(),
                    target = %route.target(),
                    "Fault route matched"
                );
                return Arc::clone(route);
            }
        }
        debug!(fault_class = class.name(), "Falling back to default fault route");
        Arc::clone(&self.default_fault_route)
    }
}

/// Builder for [`RouteTable`].
///
/// Collects routes in declaration order and validates the whole table at
/// [`build`](Self::build) time: every non-entity parameter's declared type
/// must have a converter registered, failing fast with
/// [`ConfigError::NoConverter`] otherwise.
pub struct RouteTableBuilder {
    routes: Vec<Route>,
    converters: Option<Arc<ConverterRegistry>>,
    default_fault_route: Option<Route>,
}

impl Default for RouteTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            converters: None,
            default_fault_route: None,
        }
    }

    /// Append a route; declaration order is matching precedence.
    #[must_use]
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Converter registry to validate parameter types against. Defaults to
    /// [`ConverterRegistry::with_defaults`].
    #[must_use]
    pub fn converters(mut self, converters: Arc<ConverterRegistry>) -> Self {
        self.converters = Some(converters);
        self
    }

    /// Replace the built-in default fault route.
    ///
    /// The replacement must itself handle the root fault class, or faults
    /// with no matching route would have nowhere to go.
    #[must_use]
    pub fn default_fault_route(mut self, route: Route) -> Self {
        self.default_fault_route = Some(route);
        self
    }

    /// Validate and freeze the table.
    pub fn build(self) -> Result<RouteTable, ConfigError> {
        let converters = self
            .converters
            .unwrap_or_else(|| Arc::new(ConverterRegistry::with_defaults()));

        for route in &self.routes {
            validate_parameters(route, &converters)?;
        }

        let default_fault_route = match self.default_fault_route {
            Some(route) => {
                if !route.handles(&FAULT) {
                    return Err(ConfigError::DefaultFaultRouteTooNarrow {
                        target: route.target().to_string(),
                    });
                }
                route
            }
            None => built_in_default_fault_route()?,
        };

        let (fault_routes, routes): (Vec<_>, Vec<_>) = self
            .routes
            .into_iter()
            .map(Arc::new)
            .partition(|route| route.is_fault_route());

        info!(
            routes_count = routes.len(),
            fault_routes_count = fault_routes.len(),
            "Route table built"
        );

        Ok(RouteTable {
            routes,
            fault_routes,
            default_fault_route: Arc::new(default_fault_route),
        })
    }
}

fn validate_parameters(
    route: &Route,
    converters: &ConverterRegistry,
) -> Result<(), ConfigError> {
    for spec in route.parameters() {
        if spec.source == ParamSource::Entity {
            continue;
        }
        let key = spec.target_type.key();
        if !converters.contains(key) {
            return Err(ConfigError::NoConverter {
                parameter: spec.name.clone(),
                type_key: key.to_string(),
            });
        }
    }
    Ok(())
}

/// The pre-registered fallback: handles the root fault class and passes the
/// cause through as its single argument.
fn built_in_default_fault_route() -> Result<Route, ConfigError> {
    Route::builder()
        .target("fallback", "handle_fault")
        .handles(&FAULT)
        .param(ParameterSpec::entity("cause"))
        .build()
}
