use padplot::api::{PadDrawState, build_series_directives, resolve_series_style};
use padplot::core::{Data, Dataset, DatasetPool, Histogram, Pad, colors};
use padplot::render::StyleContext;

fn counts(name: &str) -> Histogram {
    Histogram::uniform(name, 3, 0.0, 3.0)
        .and_then(|hist| hist.with_counts(vec![2.0, 4.0, 8.0]))
        .expect("valid histogram")
}

#[test]
fn series_cycle_through_the_default_colors() {
    let pad = Pad::new()
        .with_default_colors(vec![colors::RED, colors::BLUE])
        .with_data(Data::new("A", "in"))
        .with_data(Data::new("B", "in"))
        .with_data(Data::new("C", "in").with_color(-1));
    let ctx = StyleContext::default();

    let resolved: Vec<_> = pad
        .data()
        .iter()
        .enumerate()
        .map(|(index, data)| resolve_series_style(&pad, data, index, &ctx).marker_color)
        .collect();
    assert_eq!(resolved, vec![colors::RED, colors::BLUE, colors::BLUE]);
}

#[test]
fn draw_order_drives_the_style_index() {
    let pad = Pad::new()
        .with_default_colors(vec![colors::RED, colors::BLUE])
        .with_data(Data::new("A", "in"))
        .with_data(Data::new("B", "in"))
        .with_data(Data::new("C", "in").with_color(-1));
    let pool = DatasetPool::new()
        .with("A", "in", counts("A"))
        .with("B", "in", counts("B"))
        .with("C", "in", counts("C"));
    let ctx = StyleContext::default();
    let mut state = PadDrawState::new();

    let mut line_colors = Vec::new();
    for data in pad.data() {
        let directives =
            build_series_directives(data, &pad, &pool, &ctx, &mut state).expect("series built");
        line_colors.extend(directives.iter().map(|directive| directive.style.line_color));
    }
    assert_eq!(line_colors, vec![colors::RED, colors::BLUE, colors::BLUE]);
    assert_eq!(state.emitted(), 3);
}

#[test]
fn ratio_of_identical_histograms_is_flat_at_one() {
    let empty_bin = counts("num")
        .with_contents(vec![2.0, 0.0, 8.0], vec![1.0, 0.0, 2.0])
        .expect("valid contents");
    let pool = DatasetPool::new()
        .with("num", "in", empty_bin.clone())
        .with("den", "in", empty_bin.with_title("denominator"));
    let pad = Pad::new();
    let ctx = StyleContext::default();

    for correlated in [false, true] {
        let mut state = PadDrawState::new();
        let ratio = Data::ratio("num", "in", "den", "in").with_correlated_errors(correlated);
        let directives =
            build_series_directives(&ratio, &pad, &pool, &ctx, &mut state).expect("ratio built");
        let last = directives.last().expect("ratio directive");
        let Dataset::Histogram(hist) = &last.handle else {
            panic!("ratio of histograms must be a histogram");
        };
        assert_eq!(hist.contents(), &[1.0, 0.0, 1.0]);
        assert!(hist.errors().iter().all(|error| error.is_finite()));
    }
}

#[test]
fn cuts_and_scaling_follow_the_series_settings() {
    let pool = DatasetPool::new().with("h", "in", counts("h"));
    let data = Data::new("h", "in").with_range_x(0.5, 1.5).with_scale_factor(0.5);
    let mut state = PadDrawState::new();
    let directives = build_series_directives(&data, &Pad::new(), &pool, &StyleContext::default(), &mut state)
        .expect("series built");
    let Dataset::Histogram(hist) = &directives[0].handle else {
        panic!("histogram expected");
    };
    assert_eq!(hist.contents(), &[0.0, 0.0, 0.0]);

    let data = Data::new("h", "in").with_max_range_x(2.5).with_scale_factor(0.5);
    let mut state = PadDrawState::new();
    let directives = build_series_directives(&data, &Pad::new(), &pool, &StyleContext::default(), &mut state)
        .expect("series built");
    let Dataset::Histogram(hist) = &directives[0].handle else {
        panic!("histogram expected");
    };
    assert_eq!(hist.contents(), &[1.0, 2.0, 0.0]);
}
