use thiserror::Error;
use tracing::{debug, error, trace, warn};

use crate::core::{
    AxisKey, BoxItem, DatasetPool, LegendBox, LegendEntry, Pad, Plot, TextBox,
};
use crate::error::{PlotError, PlotResult};
use crate::render::{
    Backend, CanvasSpec, DrawDirective, FrameFinish, LegendPlacement, NdcRect, PadSpec,
    PrimitiveId, StyleContext, StyleScope,
};

use super::axis_linker::resolve_frame_axes;
use super::box_placement_resolver::{TickLengths, explicit_anchor, place_box};
use super::draw_command_builder::{PadDrawState, build_series_directives};
use super::legend_entry_resolver::{legend_rows, resolve_legend_entries, transient_entry};
use super::legend_layout_builder::measure_legend;
use super::plot_style::PlotStyle;
use super::text_box_layout_builder::layout_text_box;

const DEFAULT_CANVAS_PX: i32 = 710;
const DEFAULT_PAD_MARGIN: f32 = 0.1;
/// Legend receiving series that name no legend slot.
const DEFAULT_LEGEND_SLOT: u8 = 1;

/// Advisory condition met while rendering; the render went on without the
/// affected part.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderIssue {
    #[error("pad {pad}: series `{series}` skipped: {error}")]
    SeriesSkipped {
        pad: u8,
        series: String,
        error: PlotError,
    },

    #[error("pad {pad}: box {index} skipped: {error}")]
    BoxSkipped { pad: u8, index: usize, error: PlotError },

    #[error("pad {pad}: no free space for legend {legend}, placed in the corner")]
    PlacementFallback { pad: u8, legend: u8 },

    #[error("pad {pad} abandoned: {error}")]
    PadAbandoned { pad: u8, error: PlotError },
}

/// Outcome of one plot render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedPlot {
    name: String,
    pads: Vec<u8>,
    issues: Vec<RenderIssue>,
}

impl RenderedPlot {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pads that were rendered completely, in render order.
    #[must_use]
    pub fn pads(&self) -> &[u8] {
        &self.pads
    }

    #[must_use]
    pub fn issues(&self) -> &[RenderIssue] {
        &self.issues
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Renders plots onto a [`Backend`].
pub struct PlotPainter;

impl PlotPainter {
    /// Renders `style.template ⊕ plot`.
    ///
    /// Returns `None` when the plot needs more pads than the style offers or
    /// the canvas cannot be created. Every other failure only drops the
    /// affected series, box or pad and is listed in the result's issues.
    pub fn generate_plot<B: Backend + ?Sized>(
        plot: &Plot,
        style: &PlotStyle,
        pool: &DatasetPool,
        backend: &mut B,
    ) -> Option<RenderedPlot> {
        let plot = style.apply(plot);
        let name = plot.unique_name();

        if let Some(available) = style.capacity() {
            let required = plot.required_pad_count();
            if required > available {
                let err = PlotError::StructuralMismatch {
                    plot: name.clone(),
                    required,
                    available,
                };
                error!(plot = %name, error = %err, "plot does not fit its style");
                return None;
            }
        }

        let dimensions = plot.dimensions();
        let canvas = CanvasSpec {
            name: name.clone(),
            width: dimensions.width.unwrap_or(DEFAULT_CANVAS_PX),
            height: dimensions.height.unwrap_or(DEFAULT_CANVAS_PX),
            fix_aspect_ratio: dimensions.fix_aspect_ratio.unwrap_or(false),
            fill: plot.fill(),
        };
        if let Err(err) = backend.create_canvas(&canvas) {
            error!(plot = %name, error = %err, "canvas creation failed");
            return None;
        }
        debug!(
            plot = %name,
            width = canvas.width,
            height = canvas.height,
            pads = plot.required_pad_count(),
            "generating plot"
        );

        let mut rendered = RenderedPlot {
            name,
            ..RenderedPlot::default()
        };
        for pad_id in plot.pad_ids() {
            let Some(pad) = plot.resolved_pad(pad_id) else {
                continue;
            };
            let mut painter = PadPainter {
                plot: &plot,
                pad_id,
                pad: &pad,
                style,
                issues: &mut rendered.issues,
            };
            match painter.paint(pool, backend) {
                Ok(()) => rendered.pads.push(pad_id),
                Err(err) => {
                    warn!(plot = %rendered.name, pad = pad_id, error = %err, "pad abandoned");
                    rendered.issues.push(RenderIssue::PadAbandoned {
                        pad: pad_id,
                        error: err,
                    });
                }
            }
        }
        Some(rendered)
    }
}

fn pad_spec(id: u8, pad: &Pad) -> PadSpec {
    let position = pad.position();
    let margins = pad.margins();
    let margin = |value: Option<f32>| f64::from(value.unwrap_or(DEFAULT_PAD_MARGIN));
    PadSpec {
        id,
        position: NdcRect::new(
            position.xlow.unwrap_or(0.0),
            position.ylow.unwrap_or(0.0),
            position.xup.unwrap_or(1.0),
            position.yup.unwrap_or(1.0),
        ),
        margin_top: margin(margins.top),
        margin_bottom: margin(margins.bottom),
        margin_left: margin(margins.left),
        margin_right: margin(margins.right),
        fill: pad.fill(),
        frame: pad.frame(),
        palette: pad.palette,
    }
}

/// Ambient registers for one pad: the style's registers with the pad's
/// palette and default text settings on top.
fn pad_context(pad: &Pad, base: &StyleContext) -> StyleContext {
    let mut ctx = *base;
    if let Some(palette) = pad.palette {
        ctx.palette = palette;
    }
    if let Some(font) = pad.text.style {
        ctx.text_font = font;
        ctx.label_font = font;
        ctx.title_font = font;
        ctx.legend_font = font;
    }
    if let Some(size) = pad.text.scale {
        ctx.text_size = size;
        ctx.label_size = size;
        ctx.title_size = size;
        ctx.legend_text_size = size;
    }
    ctx
}

fn tick_lengths(pad: &Pad, ctx: &StyleContext) -> TickLengths {
    let length = |key| {
        f64::from(
            pad.axis(key)
                .and_then(|axis| axis.tick_length())
                .unwrap_or(ctx.tick_length),
        )
    };
    TickLengths {
        x: length(AxisKey::X),
        y: length(AxisKey::Y),
    }
}

/// Draws one directive with its temporary registers installed.
fn draw_directive<B: Backend + ?Sized>(
    scope: &mut StyleScope<'_, B>,
    directive: &DrawDirective,
) -> PlotResult<PrimitiveId> {
    if directive.error_bar_half_width.is_none() && directive.contours.is_none() {
        return scope.draw(directive);
    }
    let saved = scope.style();
    scope.update(|ctx| {
        if let Some(width) = directive.error_bar_half_width {
            ctx.error_x = width;
        }
        if let Some(contours) = directive.contours {
            ctx.num_contours = contours;
        }
    });
    let result = scope.draw(directive);
    scope.apply_style(&saved);
    result
}

struct PadPainter<'a> {
    plot: &'a Plot,
    pad_id: u8,
    pad: &'a Pad,
    style: &'a PlotStyle,
    issues: &'a mut Vec<RenderIssue>,
}

impl PadPainter<'_> {
    fn paint<B: Backend + ?Sized>(&mut self, pool: &DatasetPool, backend: &mut B) -> PlotResult<()> {
        backend.create_pad(&pad_spec(self.pad_id, self.pad))?;
        let ctx = pad_context(self.pad, self.style.context());
        let mut scope = StyleScope::enter(backend, &ctx);

        let drawn = self.draw_series(pool, &ctx, &mut scope);
        let is_2d = drawn.iter().any(|directive| directive.handle.is_2d());

        let pad = self.pad;
        let ticks = tick_lengths(pad, &ctx);
        let mut legend_slot = 0u8;
        for (index, item) in pad.boxes.iter().enumerate() {
            let result = match item {
                BoxItem::Legend(legend) => {
                    legend_slot = legend_slot.saturating_add(1);
                    self.paint_legend(&mut *scope, legend, legend_slot, &drawn, &ctx, ticks)
                }
                BoxItem::Text(text) => self.paint_text(&mut *scope, text, &ctx, ticks),
            };
            if let Err(err) = result {
                warn!(pad = self.pad_id, index, error = %err, "skipping box");
                self.issues.push(RenderIssue::BoxSkipped {
                    pad: self.pad_id,
                    index,
                    error: err,
                });
            }
        }

        let finish = FrameFinish {
            title: self.pad.title().map(str::to_owned),
            axes: resolve_frame_axes(self.plot, self.pad_id, self.style.links(), is_2d),
            is_2d,
            redraw_axes: self.pad.redraw_axes.unwrap_or(false),
        };
        scope.finish_frame(&finish)
    }

    /// Draws every series in declared order and returns what was drawn.
    fn draw_series<B: Backend + ?Sized>(
        &mut self,
        pool: &DatasetPool,
        ctx: &StyleContext,
        scope: &mut StyleScope<'_, B>,
    ) -> Vec<DrawDirective> {
        let pad = self.pad;
        let mut state = PadDrawState::new();
        let mut drawn = Vec::new();
        for data in pad.data() {
            let series = data.unique_name();
            let mut next = state.clone();
            let outcome = build_series_directives(data, pad, pool, ctx, &mut next)
                .and_then(|directives| {
                    for directive in &directives {
                        draw_directive(scope, directive)?;
                    }
                    Ok(directives)
                });
            match outcome {
                Ok(directives) => {
                    state = next;
                    trace!(pad = self.pad_id, series = %series, count = directives.len(), "series drawn");
                    drawn.extend(directives);
                }
                Err(err) => {
                    warn!(pad = self.pad_id, series = %series, error = %err, "skipping series");
                    self.issues.push(RenderIssue::SeriesSkipped {
                        pad: self.pad_id,
                        series,
                        error: err,
                    });
                }
            }
        }
        drawn
    }

    fn paint_legend<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        legend: &LegendBox,
        slot: u8,
        drawn: &[DrawDirective],
        ctx: &StyleContext,
        ticks: TickLengths,
    ) -> PlotResult<()> {
        let mut legend = legend.clone();
        legend.content.entries = drawn
            .iter()
            .filter(|directive| {
                directive
                    .legend
                    .as_ref()
                    .is_some_and(|seed| seed.slot.unwrap_or(DEFAULT_LEGEND_SLOT) == slot)
            })
            .filter_map(transient_entry)
            .collect::<Vec<LegendEntry>>();
        let entries = resolve_legend_entries(&legend.content);
        if entries.is_empty() && legend.content.title.is_none() {
            debug!(pad = self.pad_id, legend = slot, "empty legend not drawn");
            return Ok(());
        }

        let rows = legend_rows(&entries, |reference| {
            drawn
                .iter()
                .find(|directive| {
                    directive
                        .legend
                        .as_ref()
                        .is_some_and(|seed| seed.ref_data == reference)
                })
                .map(|directive| &directive.handle)
        });
        let labels: Vec<String> = rows.iter().map(|row| row.label.clone()).collect();
        let font = legend.text.style.unwrap_or(ctx.legend_font);
        let size = legend.text.scale.unwrap_or(ctx.legend_text_size);
        let num_columns = legend.num_columns();
        let metrics = measure_legend(
            &*backend,
            &labels,
            legend.content.title.as_deref(),
            num_columns,
            font,
            size,
        );

        let anchor = match legend.explicit_position() {
            Some((x, y)) => {
                explicit_anchor(&backend.pad_frame(), x, y, legend.is_user_coordinates())
            }
            _ => place_box(backend, metrics.size, ticks),
        };
        if anchor.fallback {
            warn!(pad = self.pad_id, legend = slot, "no free space for legend, using corner");
            self.issues.push(RenderIssue::PlacementFallback {
                pad: self.pad_id,
                legend: slot,
            });
        }

        let mut text = legend.text;
        text.style = Some(font);
        text.scale = Some(size);
        backend.draw_legend(&LegendPlacement {
            rect: anchor.rect(metrics.size),
            title: legend.content.title.clone(),
            num_columns,
            rows,
            border: legend.border,
            fill: legend.fill,
            text,
        })?;
        Ok(())
    }

    fn paint_text<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        text: &TextBox,
        ctx: &StyleContext,
        ticks: TickLengths,
    ) -> PlotResult<()> {
        let placement = layout_text_box(text, &backend.pad_frame(), ctx, ticks);
        backend.draw_text(&placement)?;
        Ok(())
    }
}
