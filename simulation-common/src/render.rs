use crate::kind::Kind;
use crate::vecmath::Vec2;

/// Read-only view of one token, handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenView {
    pub kind: Kind,
    pub position: Vec2,
    /// Draw radius. Always equal to the collision radius.
    pub radius: f32,
}

/// Anything that can draw tokens: a frame painter, a snapshot recorder, a test probe.
pub trait TokenRenderer {
    fn render_token(&mut self, token: &TokenView);
}

impl<F> TokenRenderer for F
where
    F: FnMut(&TokenView),
{
    fn render_token(&mut self, token: &TokenView) {
        self(token)
    }
}
