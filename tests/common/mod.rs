//! Shared test doubles: in-memory request/response views, a recording
//! invoker, stub authorizers, and a small fault-class hierarchy used by the
//! fault-routing tests.

#![allow(dead_code)]

use http::Method;
use std::io::Read;
use std::sync::{Arc, Mutex, Once};

use switchyard::exchange::{parse_query_params, HttpRequest, HttpResponse};
use switchyard::fault::{Fault, FaultClass, FAULT};
use switchyard::negotiate::{ContentNegotiator, JsonRenderer};
use switchyard::params::{Arg, CodecRegistry, ConverterRegistry, ParameterResolver};
use switchyard::pipeline::{AuthorizationProvider, Reply, TargetInvoker};
use switchyard::route::{Route, TargetRef};

static TRACING: Once = Once::new();

/// Install the env-filtered log subscriber once per test binary. Run with
/// `RUST_LOG=switchyard=debug` to see dispatch events while debugging a test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// A three-level hierarchy under the core root, plus a sibling that no
// declared filter handles.
pub static EXCEPTION: FaultClass = FaultClass::new("Exception", &FAULT);
pub static SUPER_EXCEPTION: FaultClass = FaultClass::new("SuperException", &EXCEPTION);
pub static SUB_EXCEPTION: FaultClass = FaultClass::new("SubException", &SUPER_EXCEPTION);
pub static UNRELATED: FaultClass = FaultClass::new("Unrelated", &FAULT);

/// In-memory request with a builder-ish surface for the common shapes.
pub struct TestRequest {
    method: Method,
    path: String,
    query: String,
    params: Vec<(String, Vec<String>)>,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    body: Vec<u8>,
}

impl TestRequest {
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.find('?') {
            Some(pos) => (&uri[..pos], &uri[pos + 1..]),
            None => (uri, ""),
        };
        let mut request = Self {
            method,
            path: path.to_string(),
            query: query.to_string(),
            params: Vec::new(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: Vec::new(),
        };
        for (name, value) in parse_query_params(uri) {
            request.push_param(&name, &value);
        }
        request
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a form field to the merged query/form parameter map.
    pub fn form(mut self, name: &str, value: &str) -> Self {
        self.push_param(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    fn push_param(&mut self, name: &str, value: &str) {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => self.params.push((name.to_string(), vec![value.to_string()])),
        }
    }
}

impl HttpRequest for TestRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query_string(&self) -> &str {
        &self.query
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn param_values(&self, name: &str) -> &[String] {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map_or(&[], |(_, v)| v.as_slice())
    }

    fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|(n, _)| n.as_str()).collect()
    }

    fn body(&self) -> Box<dyn Read + '_> {
        Box::new(&self.body[..])
    }
}

/// In-memory response capturing status, headers, and body bytes.
pub struct TestResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Default for TestResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl TestResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

impl HttpResponse for TestResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn write_body(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }
}

type InvokeFn = dyn Fn(&TargetRef, &[Arg]) -> Result<Reply, Fault> + Send + Sync;

/// Invoker double that records every call and delegates to a closure.
pub struct RecordingInvoker {
    calls: Mutex<Vec<(TargetRef, Vec<Arg>)>>,
    behavior: Box<InvokeFn>,
}

impl RecordingInvoker {
    pub fn new<F>(behavior: F) -> Self
    where
        F: Fn(&TargetRef, &[Arg]) -> Result<Reply, Fault> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            behavior: Box::new(behavior),
        }
    }

    /// Invoker that answers every call with the same body.
    pub fn returning(body: serde_json::Value) -> Self {
        Self::new(move |_, _| Ok(Reply::new(body.clone())))
    }

    pub fn calls(&self) -> Vec<(TargetRef, Vec<Arg>)> {
        self.calls.lock().expect("invoker mutex poisoned").clone()
    }
}

impl TargetInvoker for RecordingInvoker {
    fn invoke(&self, target: &TargetRef, args: &[Arg]) -> Result<Reply, Fault> {
        self.calls
            .lock()
            .expect("invoker mutex poisoned")
            .push((target.clone(), args.to_vec()));
        (self.behavior)(target, args)
    }
}

pub struct AllowAll;

impl AuthorizationProvider for AllowAll {
    fn authorize(&self, _route: &Route) -> Result<(), Fault> {
        Ok(())
    }
}

pub struct DenyAll;

impl AuthorizationProvider for DenyAll {
    fn authorize(&self, route: &Route) -> Result<(), Fault> {
        Err(Fault::unauthorized(format!(
            "no principal holds a role required by {}",
            route.target()
        )))
    }
}

/// Negotiator with only the JSON renderer registered.
pub fn json_negotiator() -> Arc<ContentNegotiator> {
    let mut negotiator = ContentNegotiator::new();
    negotiator.register(Arc::new(JsonRenderer));
    Arc::new(negotiator)
}

/// Resolver over the default converters and the JSON codec.
pub fn default_resolver() -> Arc<ParameterResolver> {
    Arc::new(ParameterResolver::new(
        Arc::new(ConverterRegistry::with_defaults()),
        Arc::new(CodecRegistry::with_json()),
    ))
}
