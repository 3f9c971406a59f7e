use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::exchange::HttpRequest;
use crate::fault::{Fault, FaultInfo, PARAMETER_CONVERSION};
use crate::pagination::PageInfo;
use crate::route::{ParamSource, Route};

use super::convert::ConverterRegistry;
use super::entity::{bind_form_entity, CodecRegistry};

/// One resolved operation argument.
#[derive(Debug, Clone, Serialize)]
pub struct Arg {
    pub name: String,
    pub value: ArgValue,
}

impl Arg {
    #[must_use]
    pub fn scalar(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: ArgValue::Scalar(value),
        }
    }

    #[must_use]
    pub fn page(name: impl Into<String>, page: PageInfo) -> Self {
        Self {
            name: name.into(),
            value: ArgValue::Page(page),
        }
    }

    #[must_use]
    pub fn fault(name: impl Into<String>, info: FaultInfo) -> Self {
        Self {
            name: name.into(),
            value: ArgValue::Fault(info),
        }
    }

    /// The scalar value, if this argument is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Value> {
        match &self.value {
            ArgValue::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

/// Payload of a resolved argument.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// A converted request value or bound entity.
    Scalar(Value),
    /// The pagination window, prepended by the pagination stage.
    Page(PageInfo),
    /// A fault summary, passed to error operations.
    Fault(FaultInfo),
}

/// Extracts and converts operation arguments from a request.
///
/// For each parameter descriptor of the matched route, in declaration order,
/// named parameters resolve through a strict source-precedence chain and
/// entity parameters bind from form fields or the request body. The output is
/// an ordered argument list matching the operation's parameter order.
///
/// Built once at startup around shared converter and codec registries;
/// stateless per request.
pub struct ParameterResolver {
    converters: Arc<ConverterRegistry>,
    codecs: Arc<CodecRegistry>,
}

impl ParameterResolver {
    #[must_use]
    pub fn new(converters: Arc<ConverterRegistry>, codecs: Arc<CodecRegistry>) -> Self {
        Self { converters, codecs }
    }

    /// Resolve every declared parameter of the route.
    pub fn resolve(&self, route: &Route, request: &dyn HttpRequest) -> Result<Vec<Arg>, Fault> {
        let mut args = Vec::with_capacity(route.parameters().len());
        for spec in route.parameters() {
            let value = match spec.source {
                ParamSource::Entity => self.resolve_entity(route, request)?,
                _ => self.resolve_named(route, spec, request)?,
            };
            args.push(Arg::scalar(spec.name.clone(), value));
        }
        debug!(
            target_op = %route.target(),
            arg_count = args.len(),
            "Parameters resolved"
        );
        Ok(args)
    }

    /// Bind an entity parameter: structural form binding first, then the
    /// body codec selected by the route's consumes list.
    fn resolve_entity(&self, route: &Route, request: &dyn HttpRequest) -> Result<Value, Fault> {
        let names = request.param_names();
        let fields: Vec<(&str, &[String])> = names
            .iter()
            .map(|name| (*name, request.param_values(name)))
            .collect();
        if let Some(bound) = bind_form_entity(&fields) {
            debug!(field_count = fields.len(), "Entity bound structurally from form fields");
            return Ok(bound);
        }

        for media_type in route.consumes() {
            if let Some(codec) = self.codecs.for_media_type(media_type) {
                debug!(media_type = %media_type, "Entity decoded through body codec");
                return codec.decode(&mut request.body());
            }
        }
        Err(Fault::no_consumer(route.consumes()))
    }

    /// Resolve a named parameter through the source-precedence chain:
    /// query/form value, header, cookie, declared default, positional path
    /// extraction. First success wins.
    fn resolve_named(
        &self,
        route: &Route,
        spec: &crate::route::ParameterSpec,
        request: &dyn HttpRequest,
    ) -> Result<Value, Fault> {
        let values = request.param_values(&spec.name);
        match values.len() {
            0 => {}
            1 => return self.convert(spec, &values[0]),
            _ => return Err(Fault::multiple_values(&spec.name)),
        }

        if let Some(header) = request.header(&spec.name) {
            return self.convert(spec, header);
        }

        if let Some(cookie) = request.cookie(&spec.name) {
            return self.convert(spec, cookie);
        }

        if let Some(default) = &spec.default_value {
            return self.convert(spec, default);
        }

        // Positional extraction: the path substring from the template's `{`
        // marker onward stands in for the single path parameter.
        if let Some(offset) = route.brace_offset() {
            let path = request.path();
            if path.len() > offset {
                return self.convert(spec, &path[offset..]);
            }
        }

        Err(Fault::missing_parameter(&spec.name))
    }

    fn convert(
        &self,
        spec: &crate::route::ParameterSpec,
        raw: &str,
    ) -> Result<Value, Fault> {
        let key = spec.target_type.key();
        self.converters.convert(key, raw).map_err(|e| {
            Fault::new(&PARAMETER_CONVERSION, format!("parameter '{}': {e}", spec.name))
                .with_status(400)
        })
    }
}
