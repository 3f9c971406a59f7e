use crate::exchange::HttpResponse;
use crate::fault::{Fault, FAULT};
use crate::pipeline::Reply;

use super::core::Renderer;

/// JSON renderer, and the designated `*/*` fallback.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn media_type(&self) -> &str {
        "application/json"
    }

    fn accepts(&self, media_type: &str) -> bool {
        media_type.eq_ignore_ascii_case("application/json") || media_type == "*/*"
    }

    fn render(&self, reply: &Reply, response: &mut dyn HttpResponse) -> Result<(), Fault> {
        let bytes = serde_json::to_vec(&reply.body)
            .map_err(|e| Fault::new(&FAULT, format!("JSON rendering failed: {e}")))?;
        response.write_body(&bytes);
        Ok(())
    }
}
