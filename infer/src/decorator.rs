use arax_core::response::Response;

/// Enriches knowledge-graph nodes and edges after construction.
///
/// Failures are reported by putting `response` into an error state.
pub trait Decorator: Send + Sync {
    fn decorate_nodes(&self, response: &mut Response);
    fn decorate_edges(&self, response: &mut Response);
}

pub struct NoOpDecorator;

impl Decorator for NoOpDecorator {
    fn decorate_nodes(&self, _response: &mut Response) {}

    fn decorate_edges(&self, _response: &mut Response) {}
}
