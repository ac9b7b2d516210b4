use tracing::{debug, trace};

use crate::core::{
    CUT_DISABLED, Data, DataKind, Dataset, DatasetPool, DrawingOption, Function, Pad, colors,
    cut_graph, cut_histogram, styles,
};
use crate::error::{PlotError, PlotResult};
use crate::render::{DrawDirective, LegendSeed, SeriesStyle, StyleContext, ViewAngles};

use super::style_defaults_resolver::resolve_series_style;

/// Error-bar half width installed for a single `boxes` draw.
pub const BOXES_ERROR_HALF_WIDTH: f64 = 0.48;
const COLZ_CONTOURS: u16 = 256;
const RATIO_2D_VIEW: ViewAngles = ViewAngles {
    theta: 49.5,
    phi: 230.0,
};
const REFERENCE_LINE_WIDTH: f32 = 2.0;
const DEFAULT_REFERENCE_FORMULA: &str = "1";

/// Bookkeeping shared by the series of one pad, in draw order.
#[derive(Debug, Clone, Default)]
pub struct PadDrawState {
    style_index: usize,
    emitted: usize,
    reference_drawn: bool,
}

impl PadDrawState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cyclic-default index the next series will use.
    #[must_use]
    pub fn style_index(&self) -> usize {
        self.style_index
    }

    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

/// Removes the first occurrence of `token` from `option`.
fn take_token(option: &mut String, token: &str) -> bool {
    match option.find(token) {
        Some(start) => {
            option.replace_range(start..start + token.len(), "");
            true
        }
        None => false,
    }
}

fn tidy(option: &str) -> String {
    option.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cut_bounds(data: &Data) -> (f64, f64) {
    (
        data.range_x.max.unwrap_or(CUT_DISABLED),
        data.range_x.min.unwrap_or(CUT_DISABLED),
    )
}

/// Cuts, normalization and scaling, in that order.
fn apply_value_transforms(data: &Data, handle: &mut Dataset) -> PlotResult<()> {
    let (high, low) = cut_bounds(data);
    match handle {
        Dataset::Histogram(hist) => {
            cut_histogram(hist, high, low);
            if let Some(mode) = data.norm_mode {
                hist.normalize(mode)?;
            }
            if let Some(factor) = data.scale_factor {
                hist.scale(factor);
            }
        }
        Dataset::Graph(graph) => {
            cut_graph(graph, high, low);
            if data.norm_mode.is_some() {
                debug!(series = %data.unique_name(), "normalization ignored for graph");
            }
            if let Some(factor) = data.scale_factor {
                graph.scale(factor);
            }
        }
        Dataset::Function(_) => {}
    }
    Ok(())
}

fn divide(data: &Data, numerator: &Dataset, pool: &DatasetPool) -> PlotResult<Dataset> {
    let Some(denom_key) = data.denominator_unique_name() else {
        return Ok(numerator.clone());
    };
    let denominator = pool.lookup(&denom_key)?;
    match (numerator, denominator) {
        (Dataset::Histogram(num), Dataset::Histogram(den)) => {
            Ok(Dataset::Histogram(num.divide(den, data.is_correlated())?))
        }
        (Dataset::Graph(num), Dataset::Graph(den)) => Ok(Dataset::Graph(num.divide(den)?)),
        (Dataset::Function(_), _) => Err(PlotError::UnsupportedKind(data.unique_name())),
        (num, den) => Err(PlotError::TypeMismatch {
            name: denom_key,
            expected: num.kind_name(),
            found: den.kind_name(),
        }),
    }
}

fn base_option(data: &Data, pad: &Pad, handle: &Dataset) -> String {
    if let Some(options) = &data.options {
        return options.clone();
    }
    let alias = data.option_alias.or(match handle {
        Dataset::Histogram(hist) if !hist.is_2d() => pad.option_defaults.hist,
        Dataset::Graph(_) => pad.option_defaults.graph,
        _ => None,
    });
    alias.map(|alias| alias.option_str().to_owned()).unwrap_or_default()
}

fn reference_style(template: &SeriesStyle) -> SeriesStyle {
    SeriesStyle {
        marker_color: colors::BLACK,
        marker_size: 0.0,
        line_color: colors::BLACK,
        line_style: styles::LINE_SOLID,
        line_width: REFERENCE_LINE_WIDTH,
        fill_style: styles::FILL_HOLLOW,
        ..*template
    }
}

fn invisible_style(template: &SeriesStyle) -> SeriesStyle {
    SeriesStyle {
        marker_size: 0.0,
        line_color: colors::WHITE,
        line_width: 0.0,
        fill_style: styles::FILL_HOLLOW,
        ..*template
    }
}

/// Turns one series into ordered draw directives.
///
/// The first 1-D ratio of a pad is preceded by a flat reference line at 1
/// (and an axis-only frame when nothing was drawn yet) and takes the next
/// cyclic style slot. On error `state` is left untouched, so the caller can
/// skip the series and continue.
pub fn build_series_directives(
    data: &Data,
    pad: &Pad,
    pool: &DatasetPool,
    ctx: &StyleContext,
    state: &mut PadDrawState,
) -> PlotResult<Vec<DrawDirective>> {
    let key = data.unique_name();
    let source = pool.lookup(&key)?;
    let mut handle = match &data.kind {
        DataKind::Plain => source.clone(),
        DataKind::Ratio(_) => divide(data, source, pool)?,
    };
    apply_value_transforms(data, &mut handle)?;

    let mut directives = Vec::new();
    let mut style_index = state.style_index;
    let needs_reference = data.is_ratio() && !handle.is_2d() && !state.reference_drawn;
    if needs_reference {
        style_index += 1;
    }
    let mut style = resolve_series_style(pad, data, style_index, ctx);

    if needs_reference {
        if state.emitted == 0 {
            let axis_option = if matches!(handle, Dataset::Graph(_)) { "A" } else { "AXIS" };
            directives.push(DrawDirective::new(
                handle.clone(),
                axis_option,
                invisible_style(&style),
            ));
        }
        let (x_min, x_max) = handle.x_range().unwrap_or((0.0, 1.0));
        let formula = pad.ref_func.as_deref().unwrap_or(DEFAULT_REFERENCE_FORMULA);
        directives.push(DrawDirective::new(
            Function::new("reference", formula, x_min, x_max).into(),
            "SAME",
            reference_style(&style),
        ));
    }

    let is_first = state.emitted == 0 && directives.is_empty();
    let mut option = base_option(data, pad, &handle);
    let mut contours = None;
    let mut view_angles = None;
    let mut error_bar_half_width = None;

    if take_token(&mut option, "thick") {
        style.line_width = ctx.line_width_thick;
        style.marker_size = ctx.marker_size_thick;
    }
    if handle.is_2d() {
        let suffix = pad
            .option_defaults
            .hist2d
            .unwrap_or(DrawingOption::Colz)
            .option_str();
        if !option.to_ascii_uppercase().contains(suffix) {
            option.push(' ');
            option.push_str(suffix);
        }
        if suffix == DrawingOption::Colz.option_str() {
            contours = Some(COLZ_CONTOURS);
        }
        if data.is_ratio() {
            view_angles = Some(RATIO_2D_VIEW);
        }
    }
    if take_token(&mut option, "none") {
        style.line_width = 0.0;
    }
    let is_histogram = matches!(handle, Dataset::Histogram(_));
    if is_histogram && option.contains("hist") {
        option = option.replacen("hist", "HIST", 1);
    } else if is_histogram && take_token(&mut option, "band") {
        option.push_str(" E5");
        style.marker_size = 0.0;
        style.fill_color = style.line_color;
        style.fill_style = styles::FILL_SOLID;
    } else if take_token(&mut option, "boxes") {
        option.push_str(" E2");
        style.fill_style = styles::FILL_HOLLOW;
        error_bar_half_width = Some(BOXES_ERROR_HALF_WIDTH);
    }
    if !is_histogram {
        for token in ["hist", "band"] {
            if take_token(&mut option, token) {
                debug!(series = %key, token, "option token only applies to histograms, dropped");
            }
        }
    }

    match handle {
        Dataset::Graph(_) if is_first => option.push_str(" AP"),
        Dataset::Graph(_) => {}
        _ if !is_first => option.push_str(" SAME"),
        _ => {}
    }
    let option = tidy(&option);

    let legend = data
        .label()
        .filter(|label| !label.is_empty())
        .map(|label| LegendSeed {
            ref_data: key.clone(),
            label: label.to_owned(),
            draw_style: if handle.is_function_like()
                || option.to_ascii_lowercase().contains("hist")
            {
                "l".to_owned()
            } else {
                "ep".to_owned()
            },
            slot: data.legend.slot,
        });

    let mut directive = DrawDirective::new(handle, option, style);
    directive.contours = contours;
    directive.view_angles = view_angles;
    directive.error_bar_half_width = error_bar_half_width;
    directive.defines_frame = data.defines_frame();
    directive.display_range_y = data.range_y;
    directive.text_format = data.text_format.clone();
    directive.legend = legend;
    directives.push(directive);

    for directive in &mut directives {
        directive.z_order = state.emitted;
        state.emitted += 1;
    }
    if needs_reference {
        state.reference_drawn = true;
    }
    state.style_index = style_index + 1;
    trace!(
        series = %key,
        style_index,
        directives = directives.len(),
        "built series directives"
    );
    Ok(directives)
}

#[cfg(test)]
mod tests {
    use super::{PadDrawState, build_series_directives, take_token};
    use crate::core::{Data, DatasetPool, DrawingOption, Graph, Histogram, Pad, colors};
    use crate::error::PlotError;
    use crate::render::StyleContext;

    fn hist(name: &str) -> Histogram {
        Histogram::uniform(name, 4, 0.0, 4.0)
            .and_then(|hist| hist.with_counts(vec![4.0, 3.0, 2.0, 1.0]))
            .expect("valid histogram")
    }

    fn pool() -> DatasetPool {
        DatasetPool::new()
            .with("a", "in", hist("a"))
            .with("b", "in", hist("b"))
            .with(
                "g",
                "in",
                Graph::new("g", vec![0.5, 1.5, 2.5], vec![1.0, 2.0, 3.0]).expect("valid graph"),
            )
    }

    #[test]
    fn token_removal_only_touches_first_match() {
        let mut option = String::from("E1 boxes boxes");
        assert!(take_token(&mut option, "boxes"));
        assert_eq!(option, "E1  boxes");
        assert!(!take_token(&mut option, "band"));
    }

    #[test]
    fn later_histograms_draw_on_top_of_the_first() {
        let pad = Pad::new().with_default_marker_colors(vec![colors::RED, colors::BLUE]);
        let ctx = StyleContext::default();
        let mut state = PadDrawState::new();
        let first = build_series_directives(&Data::new("a", "in").with_options("hist"), &pad, &pool(), &ctx, &mut state)
            .expect("first");
        let second = build_series_directives(&Data::new("b", "in").with_option_alias(DrawingOption::Points), &pad, &pool(), &ctx, &mut state)
            .expect("second");
        assert_eq!(first[0].option, "HIST");
        assert_eq!(first[0].style.marker_color, colors::RED);
        assert_eq!(second[0].option, "EP X0 SAME");
        assert_eq!(second[0].style.marker_color, colors::BLUE);
        assert_eq!(second[0].z_order, 1);
    }

    #[test]
    fn band_fills_with_line_color_and_hides_markers() {
        let pad = Pad::new();
        let mut state = PadDrawState::new();
        let data = Data::new("a", "in").with_line_color(colors::GREEN).with_option_alias(DrawingOption::Band);
        let directives = build_series_directives(&data, &pad, &pool(), &StyleContext::default(), &mut state)
            .expect("band");
        let directive = &directives[0];
        assert_eq!(directive.option, "E5");
        assert_eq!(directive.style.marker_size, 0.0);
        assert_eq!(directive.style.fill_color, colors::GREEN);
        assert_eq!(directive.style.fill_style, 1001);
    }

    #[test]
    fn boxes_request_a_temporary_error_width() {
        let mut state = PadDrawState::new();
        let data = Data::new("a", "in").with_option_alias(DrawingOption::BoxesOnly);
        let directives = build_series_directives(&data, &Pad::new(), &pool(), &StyleContext::default(), &mut state)
            .expect("boxes");
        assert_eq!(directives[0].option, "E2");
        assert_eq!(directives[0].style.line_width, 0.0);
        assert_eq!(directives[0].error_bar_half_width, Some(0.48));
    }

    #[test]
    fn first_graph_creates_the_axis_frame() {
        let mut state = PadDrawState::new();
        let ctx = StyleContext::default();
        let graph = Data::new("g", "in").with_option_alias(DrawingOption::PointsLine);
        let first = build_series_directives(&graph, &Pad::new(), &pool(), &ctx, &mut state).expect("graph");
        let again = build_series_directives(&graph, &Pad::new(), &pool(), &ctx, &mut state).expect("graph");
        assert_eq!(first[0].option, "LP X0 AP");
        assert_eq!(again[0].option, "LP X0");
    }

    #[test]
    fn histogram_only_tokens_never_reach_graph_options() {
        let ctx = StyleContext::default();
        let mut state = PadDrawState::new();
        let hist = Data::new("g", "in").with_options("hist");
        let band = Data::new("g", "in").with_option_alias(DrawingOption::BandLine);
        let first = build_series_directives(&hist, &Pad::new(), &pool(), &ctx, &mut state).expect("graph");
        let second = build_series_directives(&band, &Pad::new(), &pool(), &ctx, &mut state).expect("graph");
        assert_eq!(first[0].option, "AP");
        assert_eq!(second[0].option, "L");
        assert!(second[0].style.marker_size > 0.0);
    }

    #[test]
    fn first_ratio_gets_axis_frame_and_reference_line() {
        let pad = Pad::new().with_default_marker_colors(vec![colors::RED, colors::BLUE]);
        let ctx = StyleContext::default();
        let mut state = PadDrawState::new();
        let ratio = Data::ratio("a", "in", "b", "in").with_label("a/b");
        let directives = build_series_directives(&ratio, &pad, &pool(), &ctx, &mut state).expect("ratio");

        let options: Vec<_> = directives.iter().map(|d| d.option.as_str()).collect();
        assert_eq!(options, vec!["AXIS", "SAME", "SAME"]);
        assert_eq!(directives[1].style.line_color, colors::BLACK);
        assert_eq!(directives[1].style.line_width, 2.0);
        assert_eq!(directives[2].style.marker_color, colors::BLUE);
        assert!(directives[2].legend.is_some());
        assert_eq!(state.style_index(), 2);

        let next = build_series_directives(&Data::ratio("b", "in", "a", "in"), &pad, &pool(), &ctx, &mut state)
            .expect("second ratio");
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].style.marker_color, colors::RED);
    }

    #[test]
    fn two_dimensional_ratio_sets_view_angles_and_contours() {
        let h2 = Histogram::new_2d("m", vec![0.0, 1.0, 2.0], vec![0.0, 1.0])
            .and_then(|hist| hist.with_counts(vec![1.0, 2.0]))
            .expect("valid histogram");
        let pool = DatasetPool::new().with("m", "in", h2.clone()).with("n", "in", h2);
        let mut state = PadDrawState::new();
        let directives = build_series_directives(
            &Data::ratio("m", "in", "n", "in"),
            &Pad::new(),
            &pool,
            &StyleContext::default(),
            &mut state,
        )
        .expect("2d ratio");
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].option, "COLZ");
        assert_eq!(directives[0].contours, Some(256));
        assert!(directives[0].view_angles.is_some());
    }

    #[test]
    fn missing_and_mismatched_data_leave_state_untouched() {
        let mut state = PadDrawState::new();
        let ctx = StyleContext::default();
        let missing = build_series_directives(&Data::new("x", "in"), &Pad::new(), &pool(), &ctx, &mut state);
        assert_eq!(missing, Err(PlotError::MissingData("x_IN_in".to_owned())));
        let mismatch = build_series_directives(&Data::ratio("a", "in", "g", "in"), &Pad::new(), &pool(), &ctx, &mut state);
        assert!(matches!(mismatch, Err(PlotError::TypeMismatch { expected: "histogram", found: "graph", .. })));
        assert_eq!(state.style_index(), 0);
        assert_eq!(state.emitted(), 0);
    }
}
