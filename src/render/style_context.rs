use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::Backend;

/// Ambient style registers of a backend.
///
/// A pad render pass installs its registers through [`StyleScope`] right
/// before drawing and the previous values come back when the scope ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleContext {
    pub text_font: i16,
    pub text_size: f32,
    pub label_font: i16,
    pub label_size: f32,
    pub title_font: i16,
    pub title_size: f32,
    /// Legend label font; precision 3 fonts take `legend_text_size` in pixels.
    pub legend_font: i16,
    pub legend_text_size: f32,
    pub palette: i32,
    pub num_contours: u16,
    pub marker_size: f32,
    pub marker_size_thick: f32,
    pub line_width: f32,
    pub line_width_thick: f32,
    /// Horizontal error-bar half width as a fraction of the bin width.
    pub error_x: f64,
    pub tick_length: f32,
    pub max_digits: i32,
}

impl Default for StyleContext {
    fn default() -> Self {
        Self {
            text_font: 43,
            text_size: 24.0,
            label_font: 43,
            label_size: 22.0,
            title_font: 43,
            title_size: 26.0,
            legend_font: 43,
            legend_text_size: 24.0,
            palette: 55,
            num_contours: 20,
            marker_size: 1.2,
            marker_size_thick: 1.6,
            line_width: 1.0,
            line_width_thick: 3.0,
            error_x: 0.0,
            tick_length: 0.03,
            max_digits: 3,
        }
    }
}

impl StyleContext {
    #[must_use]
    pub fn with_text(mut self, font: i16, size: f32) -> Self {
        self.text_font = font;
        self.text_size = size;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, font: i16, size: f32) -> Self {
        self.label_font = font;
        self.label_size = size;
        self
    }

    #[must_use]
    pub fn with_titles(mut self, font: i16, size: f32) -> Self {
        self.title_font = font;
        self.title_size = size;
        self
    }

    #[must_use]
    pub fn with_legend_text(mut self, font: i16, size: f32) -> Self {
        self.legend_font = font;
        self.legend_text_size = size;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: i32) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_marker_sizes(mut self, normal: f32, thick: f32) -> Self {
        self.marker_size = normal;
        self.marker_size_thick = thick;
        self
    }

    #[must_use]
    pub fn with_line_widths(mut self, normal: f32, thick: f32) -> Self {
        self.line_width = normal;
        self.line_width_thick = thick;
        self
    }

    #[must_use]
    pub fn with_tick_length(mut self, length: f32) -> Self {
        self.tick_length = length;
        self
    }
}

/// Installs a [`StyleContext`] on a backend and reinstalls the previous one
/// on drop.
pub struct StyleScope<'a, B: Backend + ?Sized> {
    backend: &'a mut B,
    saved: StyleContext,
}

impl<'a, B: Backend + ?Sized> StyleScope<'a, B> {
    pub fn enter(backend: &'a mut B, context: &StyleContext) -> Self {
        let saved = backend.style();
        backend.apply_style(context);
        Self { backend, saved }
    }

    /// Changes registers inside the scope; they are still restored on drop.
    pub fn update(&mut self, change: impl FnOnce(&mut StyleContext)) {
        let mut context = self.backend.style();
        change(&mut context);
        self.backend.apply_style(&context);
    }
}

impl<B: Backend + ?Sized> Deref for StyleScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: Backend + ?Sized> DerefMut for StyleScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: Backend + ?Sized> Drop for StyleScope<'_, B> {
    fn drop(&mut self) {
        self.backend.apply_style(&self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::{StyleContext, StyleScope};
    use crate::render::{Backend, RecordingBackend};

    #[test]
    fn scope_restores_previous_registers() {
        let mut backend = RecordingBackend::new();
        let before = backend.style();
        {
            let mut scope = StyleScope::enter(&mut backend, &StyleContext::default().with_palette(1));
            scope.update(|ctx| ctx.error_x = 0.48);
            assert_eq!(scope.style().palette, 1);
            assert_eq!(scope.style().error_x, 0.48);
        }
        assert_eq!(backend.style(), before);
    }
}
