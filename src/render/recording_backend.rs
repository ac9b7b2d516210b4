use ordered_float::OrderedFloat;

use crate::core::Dataset;
use crate::error::{PlotError, PlotResult};
use crate::render::{
    Backend, CanvasSpec, DrawDirective, FrameFinish, LegendPlacement, NdcRect, PadFrame, PadSpec,
    PrimitiveId, StyleContext, TextExtent, TextPlacement,
};

const FIT_GRID_STEP: f64 = 0.005;
const MIN_FOOTPRINT: f64 = 0.01;

/// A recorded draw call with the ambient registers in effect at that moment.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub pad: u8,
    pub directive: DrawDirective,
    pub style: StyleContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Canvas(CanvasSpec),
    Pad(PadSpec),
    Draw(DrawRecord),
    Legend { pad: u8, legend: LegendPlacement },
    Text { pad: u8, text: TextPlacement },
    Frame { pad: u8, finish: FrameFinish },
}

#[derive(Debug, Clone)]
struct PadState {
    id: u8,
    frame: PadFrame,
    frame_claimed: bool,
    primitives: Vec<(PrimitiveId, NdcRect)>,
}

/// Headless backend used by tests and batch callers.
///
/// It records every call, estimates text metrics from character classes,
/// tracks drawn footprints in NDC and answers box-fitting queries with a
/// grid search.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    canvas_px: (f64, f64),
    style: StyleContext,
    calls: Vec<BackendCall>,
    pads: Vec<PadState>,
    next_id: u32,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            canvas_px: (710.0, 710.0),
            style: StyleContext::default(),
            calls: Vec::new(),
            pads: Vec::new(),
            next_id: 1,
        }
    }

    #[must_use]
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn draws(&self) -> impl Iterator<Item = &DrawRecord> {
        self.calls.iter().filter_map(|call| match call {
            BackendCall::Draw(record) => Some(record),
            _ => None,
        })
    }

    pub fn draws_in(&self, pad: u8) -> impl Iterator<Item = &DrawRecord> {
        self.draws().filter(move |record| record.pad == pad)
    }

    pub fn legends(&self) -> impl Iterator<Item = (u8, &LegendPlacement)> {
        self.calls.iter().filter_map(|call| match call {
            BackendCall::Legend { pad, legend } => Some((*pad, legend)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (u8, &TextPlacement)> {
        self.calls.iter().filter_map(|call| match call {
            BackendCall::Text { pad, text } => Some((*pad, text)),
            _ => None,
        })
    }

    pub fn frames(&self) -> impl Iterator<Item = (u8, &FrameFinish)> {
        self.calls.iter().filter_map(|call| match call {
            BackendCall::Frame { pad, finish } => Some((*pad, finish)),
            _ => None,
        })
    }

    /// Primitives currently placed in the active pad.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.pads.last().map_or(0, |pad| pad.primitives.len())
    }

    fn allocate_id(&mut self) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        id
    }

    fn active_pad(&mut self) -> PlotResult<&mut PadState> {
        self.pads
            .last_mut()
            .ok_or_else(|| PlotError::InvalidData("no pad has been created".to_owned()))
    }

    fn active_pad_id(&self) -> u8 {
        self.pads.last().map_or(0, |pad| pad.id)
    }

    fn default_frame(&self) -> PadFrame {
        PadFrame {
            axis: NdcRect::unit(),
            user_x: (0.0, 1.0),
            user_y: (0.0, 1.0),
            log_x: false,
            log_y: false,
            width_px: self.canvas_px.0,
            height_px: self.canvas_px.1,
        }
    }
}

/// Width estimate per character class, in units of the font size.
fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

fn claim_frame(frame: &mut PadFrame, directive: &DrawDirective) {
    if let Some(x_range) = directive.handle.x_range() {
        frame.user_x = x_range;
    }
    if let Some(bounds) = directive.display_range_y.bounds() {
        frame.user_y = bounds;
    } else if let Some((lo, hi)) = directive.handle.y_extent() {
        let lo = if lo > 0.0 && !directive.handle.is_2d() { 0.0 } else { lo };
        let span = (hi - lo).abs().max(f64::EPSILON);
        frame.user_y = (lo, hi + 0.1 * span);
    }
}

fn clamp_footprint(frame: &PadFrame, (x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> NdcRect {
    let axis = frame.axis;
    let (mut lo_x, mut hi_x) = (x1.min(x2), x1.max(x2));
    let (mut lo_y, mut hi_y) = (y1.min(y2), y1.max(y2));
    if hi_x - lo_x < MIN_FOOTPRINT {
        let mid = 0.5 * (lo_x + hi_x);
        lo_x = mid - 0.5 * MIN_FOOTPRINT;
        hi_x = mid + 0.5 * MIN_FOOTPRINT;
    }
    if hi_y - lo_y < MIN_FOOTPRINT {
        let mid = 0.5 * (lo_y + hi_y);
        lo_y = mid - 0.5 * MIN_FOOTPRINT;
        hi_y = mid + 0.5 * MIN_FOOTPRINT;
    }
    NdcRect::new(
        lo_x.clamp(axis.x1, axis.x2),
        lo_y.clamp(axis.y1, axis.y2),
        hi_x.clamp(axis.x1, axis.x2),
        hi_y.clamp(axis.y1, axis.y2),
    )
}

/// NDC rectangles covered by a drawn series.
fn footprint(frame: &PadFrame, directive: &DrawDirective) -> Vec<NdcRect> {
    if directive.option.contains("AXIS") {
        return Vec::new();
    }
    let mut rects = Vec::new();
    match &directive.handle {
        Dataset::Histogram(hist) if hist.is_2d() => rects.push(frame.axis),
        Dataset::Histogram(hist) => {
            let edges = hist.x_edges();
            for (ix, (content, error)) in hist.contents().iter().zip(hist.errors()).enumerate() {
                if *content == 0.0 && *error == 0.0 {
                    continue;
                }
                let lower = frame.user_to_ndc(edges[ix], content - error);
                let upper = frame.user_to_ndc(edges[ix + 1], content + error);
                rects.push(clamp_footprint(frame, lower, upper));
            }
        }
        Dataset::Graph(graph) => {
            for (index, (x, y)) in graph.x().iter().zip(graph.y()).enumerate() {
                let ey = graph.ey().get(index).copied().unwrap_or(0.0);
                let lower = frame.user_to_ndc(*x, y - ey);
                let upper = frame.user_to_ndc(*x, y + ey);
                rects.push(clamp_footprint(frame, lower, upper));
            }
        }
        Dataset::Function(function) => {
            if let Ok(level) = function.formula().trim().parse::<f64>() {
                let (x_min, x_max) = function.x_range();
                let lower = frame.user_to_ndc(x_min, level);
                let upper = frame.user_to_ndc(x_max, level);
                rects.push(clamp_footprint(frame, lower, upper));
            }
        }
    }
    rects.retain(|rect| !rect.is_degenerate());
    rects
}

impl Backend for RecordingBackend {
    fn create_canvas(&mut self, spec: &CanvasSpec) -> PlotResult<()> {
        if spec.width <= 0 || spec.height <= 0 {
            return Err(PlotError::InvalidData(format!(
                "canvas `{}` must have a positive size, got {}x{}",
                spec.name, spec.width, spec.height
            )));
        }
        self.canvas_px = (f64::from(spec.width), f64::from(spec.height));
        self.pads.clear();
        self.calls.push(BackendCall::Canvas(spec.clone()));
        Ok(())
    }

    fn create_pad(&mut self, spec: &PadSpec) -> PlotResult<()> {
        spec.position.validate()?;
        let axis = NdcRect::new(
            spec.margin_left,
            spec.margin_bottom,
            1.0 - spec.margin_right,
            1.0 - spec.margin_top,
        );
        axis.validate()?;
        let frame = PadFrame {
            axis,
            user_x: (0.0, 1.0),
            user_y: (0.0, 1.0),
            log_x: false,
            log_y: false,
            width_px: self.canvas_px.0 * spec.position.width(),
            height_px: self.canvas_px.1 * spec.position.height(),
        };
        self.pads.push(PadState {
            id: spec.id,
            frame,
            frame_claimed: false,
            primitives: Vec::new(),
        });
        self.calls.push(BackendCall::Pad(spec.clone()));
        Ok(())
    }

    fn style(&self) -> StyleContext {
        self.style
    }

    fn apply_style(&mut self, context: &StyleContext) {
        self.style = *context;
    }

    fn draw(&mut self, directive: &DrawDirective) -> PlotResult<PrimitiveId> {
        let id = self.allocate_id();
        let style = self.style;
        let pad = self.active_pad()?;
        if !pad.frame_claimed || directive.defines_frame {
            claim_frame(&mut pad.frame, directive);
            pad.frame_claimed = true;
        }
        for rect in footprint(&pad.frame, directive) {
            pad.primitives.push((id, rect));
        }
        let pad_id = pad.id;
        self.calls.push(BackendCall::Draw(DrawRecord {
            pad: pad_id,
            directive: directive.clone(),
            style,
        }));
        Ok(id)
    }

    fn text_extent(&self, text: &str, font: i16, size: f32) -> TextExtent {
        let size_px = if font.rem_euclid(10) == 3 {
            f64::from(size)
        } else {
            f64::from(size) * self.pad_frame().height_px
        };
        TextExtent {
            width_px: estimate_text_width_px(text, size_px),
            height_px: size_px,
        }
    }

    fn pad_frame(&self) -> PadFrame {
        self.pads
            .last()
            .map_or_else(|| self.default_frame(), |pad| pad.frame)
    }

    fn add_exclusion(&mut self, rect: NdcRect) -> PrimitiveId {
        let id = self.allocate_id();
        if let Some(pad) = self.pads.last_mut() {
            pad.primitives.push((id, rect));
        }
        id
    }

    fn remove_primitive(&mut self, id: PrimitiveId) {
        if let Some(pad) = self.pads.last_mut() {
            pad.primitives.retain(|(owner, _)| *owner != id);
        }
    }

    fn find_free_box(&self, width: f64, height: f64) -> Option<NdcRect> {
        if !(width > 0.0 && height > 0.0 && width <= 1.0 && height <= 1.0) {
            return None;
        }
        let obstacles: Vec<NdcRect> = self
            .pads
            .last()
            .map(|pad| pad.primitives.iter().map(|(_, rect)| *rect).collect())
            .unwrap_or_default();
        let columns = ((1.0 - width) / FIT_GRID_STEP).floor() as usize;
        let rows = ((1.0 - height) / FIT_GRID_STEP).floor() as usize;
        (0..=rows)
            .flat_map(|row| (0..=columns).map(move |column| (row, column)))
            .map(|(row, column)| {
                let x1 = column as f64 * FIT_GRID_STEP;
                let y1 = row as f64 * FIT_GRID_STEP;
                NdcRect::new(x1, y1, x1 + width, y1 + height)
            })
            .filter(|candidate| !obstacles.iter().any(|rect| rect.intersects(*candidate)))
            .max_by_key(|candidate| (OrderedFloat(candidate.y2), OrderedFloat(candidate.x2)))
    }

    fn draw_legend(&mut self, legend: &LegendPlacement) -> PlotResult<PrimitiveId> {
        legend.rect.validate()?;
        let id = self.allocate_id();
        let pad = self.active_pad()?;
        pad.primitives.push((id, legend.rect));
        let pad_id = pad.id;
        self.calls.push(BackendCall::Legend {
            pad: pad_id,
            legend: legend.clone(),
        });
        Ok(id)
    }

    fn draw_text(&mut self, text: &TextPlacement) -> PlotResult<PrimitiveId> {
        text.rect.validate()?;
        let id = self.allocate_id();
        let pad = self.active_pad()?;
        pad.primitives.push((id, text.rect));
        let pad_id = pad.id;
        self.calls.push(BackendCall::Text {
            pad: pad_id,
            text: text.clone(),
        });
        Ok(id)
    }

    fn finish_frame(&mut self, finish: &FrameFinish) -> PlotResult<()> {
        let pad_id = self.active_pad_id();
        let pad = self.active_pad()?;
        for (key, axis) in &finish.axes {
            let range = axis.range().bounds();
            let log = axis.is_log().unwrap_or(false);
            match key {
                crate::core::AxisKey::X => {
                    if let Some(range) = range {
                        pad.frame.user_x = range;
                    }
                    pad.frame.log_x = log;
                }
                crate::core::AxisKey::Y => {
                    if let Some(range) = range {
                        pad.frame.user_y = range;
                    }
                    pad.frame.log_y = log;
                }
                crate::core::AxisKey::Z => {}
            }
        }
        self.calls.push(BackendCall::Frame {
            pad: pad_id,
            finish: finish.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::RecordingBackend;
    use crate::core::{Histogram, Layout};
    use crate::render::{
        Backend, DrawDirective, NdcRect, PadSpec, SeriesStyle, StyleContext,
    };

    fn pad_spec() -> PadSpec {
        PadSpec {
            id: 1,
            position: NdcRect::unit(),
            margin_top: 0.05,
            margin_bottom: 0.1,
            margin_left: 0.1,
            margin_right: 0.05,
            fill: Layout::default(),
            frame: Default::default(),
            palette: None,
        }
    }

    fn style() -> SeriesStyle {
        SeriesStyle {
            marker_color: 1,
            marker_style: 20,
            marker_size: 1.0,
            line_color: 1,
            line_style: 1,
            line_width: 1.0,
            fill_color: 1,
            fill_style: 0,
            fill_opacity: 1.0,
        }
    }

    #[test]
    fn pixel_fonts_use_size_directly() {
        let mut backend = RecordingBackend::new();
        backend.create_pad(&pad_spec()).expect("pad");
        let pixel = backend.text_extent("AAA", 43, 24.0);
        assert_relative_eq!(pixel.height_px, 24.0);
        assert_relative_eq!(pixel.width_px, 3.0 * 0.58 * 24.0);
        let relative = backend.text_extent("A", 42, 0.05);
        assert_relative_eq!(relative.height_px, 0.05 * 710.0);
    }

    #[test]
    fn free_box_avoids_drawn_series_and_prefers_the_top() {
        let mut backend = RecordingBackend::new();
        backend.create_pad(&pad_spec()).expect("pad");
        let hist = Histogram::uniform("h", 4, 0.0, 4.0)
            .and_then(|hist| hist.with_counts(vec![10.0, 10.0, 10.0, 10.0]))
            .expect("valid histogram");
        backend
            .draw(&DrawDirective::new(hist.into(), "HIST", style()))
            .expect("draw");
        assert_eq!(backend.primitive_count(), 4);

        let free = backend.find_free_box(0.3, 0.1).expect("free space");
        assert_relative_eq!(free.y2, 1.0, epsilon = 1e-9);
        assert!(free.x2 <= 1.0 + 1e-9);

        let id = backend.add_exclusion(NdcRect::unit());
        assert!(backend.find_free_box(0.3, 0.1).is_none());
        backend.remove_primitive(id);
        assert!(backend.find_free_box(0.3, 0.1).is_some());
    }

    #[test]
    fn draw_records_ambient_registers() {
        let mut backend = RecordingBackend::new();
        backend.create_pad(&pad_spec()).expect("pad");
        backend.apply_style(&StyleContext {
            error_x: 0.48,
            ..StyleContext::default()
        });
        let hist = Histogram::uniform("h", 1, 0.0, 1.0).expect("valid histogram");
        backend
            .draw(&DrawDirective::new(hist.into(), "E2", style()))
            .expect("draw");
        let record = backend.draws().next().expect("recorded");
        assert_eq!(record.style.error_x, 0.48);
        assert_eq!(record.pad, 1);
    }
}
