mod common;

use common::{
    default_resolver, init_tracing, json_negotiator, AllowAll, DenyAll, RecordingInvoker,
    TestRequest, TestResponse, SUB_EXCEPTION, SUPER_EXCEPTION, UNRELATED,
};
use http::Method;
use serde_json::json;
use std::sync::{Arc, Mutex};
use switchyard::exchange::HttpRequest;
use switchyard::fault::Fault;
use switchyard::params::ArgValue;
use switchyard::pipeline::{Pipeline, Reply, RouteContext, Stage, TargetInvoker};
use switchyard::route::{
    PaginationConfig, ParamType, ParameterSpec, Route, RouteTable,
};

type Events = Arc<Mutex<Vec<String>>>;

struct BaseStage {
    events: Events,
}

impl Stage for BaseStage {
    fn process(&self, _ctx: &mut RouteContext<'_>) -> Result<Reply, Fault> {
        self.events.lock().expect("events").push("base".to_string());
        Ok(Reply::new(json!(null)))
    }
}

struct LabelStage {
    label: &'static str,
    events: Events,
    next: Box<dyn Stage>,
}

impl Stage for LabelStage {
    fn process(&self, ctx: &mut RouteContext<'_>) -> Result<Reply, Fault> {
        self.events
            .lock()
            .expect("events")
            .push(format!("{}:enter", self.label));
        let result = self.next.process(ctx);
        self.events
            .lock()
            .expect("events")
            .push(format!("{}:exit", self.label));
        result
    }
}

fn simple_table() -> RouteTable {
    let route = Route::builder()
        .path("/cars")
        .method(Method::GET)
        .target("CarHandler", "list")
        .build()
        .expect("route");
    RouteTable::builder().route(route).build().expect("table")
}

#[test]
fn wrap_composes_inner_to_outer() {
    init_tracing();
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let pipeline = Pipeline::builder(Box::new(BaseStage {
        events: Arc::clone(&events),
    }))
    .wrap(|inner| LabelStage {
        label: "security",
        events: Arc::clone(&events),
        next: inner,
    })
    .wrap(|inner| LabelStage {
        label: "render",
        events: Arc::clone(&events),
        next: inner,
    })
    .build();

    let table = simple_table();
    let request = TestRequest::get("/cars");
    let mut response = TestResponse::new();
    let route = table
        .route_for(&Method::GET, "/cars", &[])
        .expect("route");
    let mut ctx = RouteContext::new(route, &request, &mut response, &table);

    pipeline.process(&mut ctx).expect("reply");

    // The last wrap is the outermost stage.
    assert_eq!(
        *events.lock().expect("events"),
        [
            "render:enter",
            "security:enter",
            "base",
            "security:exit",
            "render:exit"
        ]
    );
}

#[test]
fn standard_chain_resolves_invokes_and_renders() {
    init_tracing();
    let route = Route::builder()
        .path("/cars/{id}")
        .method(Method::GET)
        .target("CarHandler", "show")
        .param(ParameterSpec::path("id", ParamType::Integer))
        .produces(&["application/json"])
        .build()
        .expect("route");
    let table = RouteTable::builder().route(route).build().expect("table");

    let invoker = Arc::new(RecordingInvoker::returning(json!({"id": 7})));
    let pipeline = Pipeline::standard(
        default_resolver(),
        Arc::clone(&invoker) as Arc<dyn TargetInvoker>,
        Arc::new(AllowAll),
        json_negotiator(),
    );

    let request = TestRequest::get("/cars/7").header("accept", "application/json");
    let mut response = TestResponse::new();
    let route = table
        .route_for(&Method::GET, "/cars/7", &request.accept())
        .expect("route");
    let mut ctx = RouteContext::new(route, &request, &mut response, &table);

    pipeline.process(&mut ctx).expect("reply");

    let calls = invoker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.operation, "show");
    assert_eq!(calls[0].1[0].as_scalar(), Some(&json!(7)));
    assert_eq!(response.body_json(), json!({"id": 7}));
    assert_eq!(
        response.header("content-type"),
        Some("application/json; charset=utf-8")
    );
}

#[test]
fn reply_status_overrides_the_response_status() {
    init_tracing();
    let table = simple_table();
    let invoker = Arc::new(RecordingInvoker::new(|_, _| {
        Ok(Reply::with_status(201, json!({"created": true})))
    }));
    let pipeline = Pipeline::standard(
        default_resolver(),
        invoker as Arc<dyn TargetInvoker>,
        Arc::new(AllowAll),
        json_negotiator(),
    );

    let request = TestRequest::get("/cars");
    let mut response = TestResponse::new();
    let route = table.route_for(&Method::GET, "/cars", &[]).expect("route");
    let mut ctx = RouteContext::new(route, &request, &mut response, &table);

    pipeline.process(&mut ctx).expect("reply");
    assert_eq!(response.status, 201);
}

#[test]
fn denied_authorization_recovers_through_the_default_fault_route() {
    init_tracing();
    let route = Route::builder()
        .path("/admin")
        .method(Method::GET)
        .target("AdminHandler", "panel")
        .role("admin")
        .build()
        .expect("route");
    let table = RouteTable::builder().route(route).build().expect("table");

    let invoker = Arc::new(RecordingInvoker::returning(json!({"recovered": true})));
    let pipeline = Pipeline::standard(
        default_resolver(),
        Arc::clone(&invoker) as Arc<dyn TargetInvoker>,
        Arc::new(DenyAll),
        json_negotiator(),
    );

    let request = TestRequest::get("/admin");
    let mut response = TestResponse::new();
    let route = table.route_for(&Method::GET, "/admin", &[]).expect("route");
    let mut ctx = RouteContext::new(route, &request, &mut response, &table);

    pipeline.process(&mut ctx).expect("recovered reply");

    // Security aborted before invocation, so the only call is the fallback.
    let calls = invoker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.handler, "fallback");
    assert_eq!(calls[0].0.operation, "handle_fault");
    assert_eq!(calls[0].1[0].name, "cause");
    assert_eq!(response.status, 401);
    assert_eq!(response.body_json(), json!({"recovered": true}));
}

#[test]
fn target_failure_routes_by_its_root_cause() {
    init_tracing();
    let route = Route::builder()
        .path("/cars")
        .method(Method::GET)
        .target("CarHandler", "list")
        .build()
        .expect("route");
    let fault_route = Route::builder()
        .target("ErrorHandler", "on_super")
        .handles(&SUPER_EXCEPTION)
        .param(ParameterSpec::entity("cause"))
        .build()
        .expect("fault route");
    let table = RouteTable::builder()
        .route(route)
        .route(fault_route)
        .build()
        .expect("table");

    let invoker = Arc::new(RecordingInvoker::new(|target, _| {
        match target.operation.as_str() {
            "list" => Err(Fault::new(&SUB_EXCEPTION, "storage gave up").with_status(503)),
            _ => Ok(Reply::new(json!({"handled": "super"}))),
        }
    }));
    let pipeline = Pipeline::standard(
        default_resolver(),
        Arc::clone(&invoker) as Arc<dyn TargetInvoker>,
        Arc::new(AllowAll),
        json_negotiator(),
    );

    let request = TestRequest::get("/cars");
    let mut response = TestResponse::new();
    let route = table.route_for(&Method::GET, "/cars", &[]).expect("route");
    let mut ctx = RouteContext::new(route, &request, &mut response, &table);

    pipeline.process(&mut ctx).expect("recovered reply");

    let calls = invoker.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0.operation, "on_super");
    // The error operation receives the root cause, not the invocation wrapper.
    match &calls[1].1[0].value {
        ArgValue::Fault(info) => {
            assert_eq!(info.class, "SubException");
            assert_eq!(info.status, Some(503));
        }
        other => panic!("expected a fault argument, got {other:?}"),
    }
    assert_eq!(response.status, 503);
    assert_eq!(response.body_json(), json!({"handled": "super"}));
}

#[test]
fn a_failing_error_operation_is_a_hard_stop() {
    init_tracing();
    let table = simple_table();
    let invoker = Arc::new(RecordingInvoker::new(|target, _| {
        match target.operation.as_str() {
            "list" => Err(Fault::new(&SUB_EXCEPTION, "first failure")),
            _ => Err(Fault::new(&UNRELATED, "second failure")),
        }
    }));
    let pipeline = Pipeline::standard(
        default_resolver(),
        invoker as Arc<dyn TargetInvoker>,
        Arc::new(AllowAll),
        json_negotiator(),
    );

    let request = TestRequest::get("/cars");
    let mut response = TestResponse::new();
    let route = table.route_for(&Method::GET, "/cars", &[]).expect("route");
    let mut ctx = RouteContext::new(route, &request, &mut response, &table);

    let fault = pipeline
        .process(&mut ctx)
        .expect_err("double failure must propagate");
    assert!(fault.class().same(&UNRELATED));
}

#[test]
fn paginated_route_gets_a_page_argument_and_link_headers() {
    init_tracing();
    let route = Route::builder()
        .path("/cars")
        .method(Method::GET)
        .target("CarHandler", "list")
        .param(ParameterSpec::query("offset", ParamType::Integer).with_default("0"))
        .param(ParameterSpec::query("limit", ParamType::Integer).with_default("10"))
        .paginated(PaginationConfig::header_pair("X-").defaults(0, 10))
        .build()
        .expect("route");
    let table = RouteTable::builder().route(route).build().expect("table");

    let items: Vec<_> = (0..10).collect();
    let invoker = Arc::new(RecordingInvoker::returning(json!(items)));
    let pipeline = Pipeline::standard(
        default_resolver(),
        Arc::clone(&invoker) as Arc<dyn TargetInvoker>,
        Arc::new(AllowAll),
        json_negotiator(),
    );

    let request = TestRequest::get("/cars?offset=10&limit=10");
    let mut response = TestResponse::new();
    let route = table
        .route_for(&Method::GET, "/cars", &[])
        .expect("route");
    let mut ctx = RouteContext::new(route, &request, &mut response, &table);

    pipeline.process(&mut ctx).expect("reply");

    let calls = invoker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1[0].name, "page");
    match &calls[0].1[0].value {
        ArgValue::Page(page) => {
            assert_eq!(page.offset, 10);
            assert_eq!(page.limit, 10);
        }
        other => panic!("expected a page argument, got {other:?}"),
    }
    assert_eq!(
        response.header("X-Links-Previous"),
        Some("/cars?offset=0&limit=10")
    );
    assert_eq!(
        response.header("X-Links-Next"),
        Some("/cars?offset=20&limit=10")
    );
}
