use std::sync::Arc;
use tracing::debug;

use crate::exchange::HttpResponse;
use crate::fault::Fault;
use crate::pipeline::Reply;
use crate::route::Route;

/// Renders reply values into one media type.
///
/// Renderers are registered with the [`ContentNegotiator`]; each declares a
/// media type and an [`accepts`](Self::accepts) predicate. The designated
/// fallback renderer additionally accepts `*/*`.
pub trait Renderer: Send + Sync {
    /// Media type this renderer produces, lowercase.
    fn media_type(&self) -> &str;

    /// Whether this renderer can produce the given media type.
    fn accepts(&self, media_type: &str) -> bool {
        self.media_type().eq_ignore_ascii_case(media_type)
    }

    /// Write the reply body to the response.
    ///
    /// The negotiator has already copied the reply's headers and set the
    /// content type when this is called.
    fn render(&self, reply: &Reply, response: &mut dyn HttpResponse) -> Result<(), Fault>;
}

/// Maps a route to a view template path.
///
/// Consumed only by view-rendering [`Renderer`] implementations supplied by
/// the hosting framework; opaque to the core.
pub trait ViewResolver: Send + Sync {
    fn template_for(&self, route: &Route) -> Option<String>;
}

/// Picks a renderer from the route's declared representations and the
/// client's accept preferences, then renders through it.
///
/// Selection computes the intersection of `produces` and the accept list
/// **preserving the produces order**: the server-declared preference wins
/// over client ordering. An empty intersection falls back to the `*/*`
/// renderer when the accept list is empty or wildcarded; otherwise the
/// negotiation fails with `NO_ACCEPTABLE_RESPONDER`.
#[derive(Default)]
pub struct ContentNegotiator {
    renderers: Vec<Arc<dyn Renderer>>,
}

impl ContentNegotiator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    /// Register a renderer. Registration order breaks ties between renderers
    /// accepting the same media type.
    pub fn register(&mut self, renderer: Arc<dyn Renderer>) {
        self.renderers.push(renderer);
    }

    /// Negotiate a representation and render the reply into the response.
    ///
    /// Side effects on success: the reply's own headers are copied onto the
    /// response first, then `content-type` is set from the negotiated media
    /// type, then the renderer writes the body.
    pub fn render(
        &self,
        reply: &Reply,
        route: &Route,
        accept: &[String],
        response: &mut dyn HttpResponse,
    ) -> Result<(), Fault> {
        let wildcard = accept.is_empty() || accept.iter().any(|a| a == "*/*");

        for media_type in route.produces() {
            if !accept.iter().any(|a| a == media_type) {
                continue;
            }
            if let Some(renderer) = self.renderer_for(media_type) {
                debug!(media_type = %media_type, "Representation negotiated");
                return self.render_as(renderer, media_type, reply, response);
            }
        }

        if wildcard {
            if let Some(renderer) = self.renderer_for("*/*") {
                let media_type = renderer.media_type().to_string();
                debug!(media_type = %media_type, "Falling back to wildcard renderer");
                return self.render_as(renderer, &media_type, reply, response);
            }
        }

        Err(Fault::no_acceptable_responder(accept))
    }

    fn renderer_for(&self, media_type: &str) -> Option<&Arc<dyn Renderer>> {
        self.renderers
            .iter()
            .find(|renderer| renderer.accepts(media_type))
    }

    fn render_as(
        &self,
        renderer: &Arc<dyn Renderer>,
        media_type: &str,
        reply: &Reply,
        response: &mut dyn HttpResponse,
    ) -> Result<(), Fault> {
        for (name, value) in &reply.headers {
            response.set_header(name, value);
        }
        response.set_header("content-type", &format!("{media_type}; charset=utf-8"));
        renderer.render(reply, response)
    }
}
