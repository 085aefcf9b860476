use crate::render::Renderer;
use crate::view::StockView;

/// Emits the whole view as pretty-printed JSON for machine consumers.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, view: &StockView) {
        match serde_json::to_string_pretty(view) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = ?e, "failed to serialize view"),
        }
    }
}
