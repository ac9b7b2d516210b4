use padplot::core::{CUT_DISABLED, Dataset, Graph, Histogram, cut_graph, cut_histogram};
use proptest::prelude::*;

fn histogram(contents: &[f64]) -> Histogram {
    Histogram::uniform("h", contents.len(), 0.0, contents.len() as f64)
        .and_then(|hist| hist.with_counts(contents.to_vec()))
        .expect("valid histogram")
}

proptest! {
    #[test]
    fn high_cut_zeroes_the_containing_bin_and_everything_after(
        contents in proptest::collection::vec(1.0f64..100.0, 1..40),
        fraction in 0.0f64..1.0
    ) {
        let mut hist = histogram(&contents);
        let high = fraction * contents.len() as f64;
        cut_histogram(&mut hist, high, CUT_DISABLED);
        let first = hist.find_bin_x(high) - 1;
        for (index, (content, error)) in hist.contents().iter().zip(hist.errors()).enumerate() {
            if index >= first {
                prop_assert_eq!(*content, 0.0);
                prop_assert_eq!(*error, 0.0);
            } else {
                prop_assert_eq!(*content, contents[index]);
            }
        }
    }

    #[test]
    fn low_cut_zeroes_the_containing_bin_and_everything_before(
        contents in proptest::collection::vec(1.0f64..100.0, 1..40),
        fraction in 0.0f64..1.0
    ) {
        let mut hist = histogram(&contents);
        let low = fraction * contents.len() as f64;
        cut_histogram(&mut hist, CUT_DISABLED, low);
        let last = hist.find_bin_x(low);
        for (index, content) in hist.contents().iter().enumerate() {
            if index < last {
                prop_assert_eq!(*content, 0.0);
            } else {
                prop_assert_eq!(*content, contents[index]);
            }
        }
    }

    #[test]
    fn histogram_cut_is_idempotent(
        contents in proptest::collection::vec(0.0f64..100.0, 1..40),
        high in -1.0f64..45.0,
        low in -1.0f64..45.0
    ) {
        let mut once = histogram(&contents);
        cut_histogram(&mut once, high, low);
        let mut twice = once.clone();
        cut_histogram(&mut twice, high, low);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn disabled_sentinel_leaves_histogram_untouched(
        contents in proptest::collection::vec(0.0f64..100.0, 1..40),
        below in 0.0f64..1_000.0
    ) {
        let original = histogram(&contents);
        let mut hist = original.clone();
        let disabled = -997.5 - below;
        cut_histogram(&mut hist, disabled, disabled);
        prop_assert_eq!(hist, original);
    }

    #[test]
    fn graph_cut_drops_only_points_outside_the_bounds(
        xs in proptest::collection::vec(-50.0f64..50.0, 0..60),
        high in -60.0f64..60.0,
        low in -60.0f64..60.0
    ) {
        let ys: Vec<f64> = (0..xs.len()).map(|i| i as f64).collect();
        let mut graph = Graph::new("g", xs.clone(), ys).expect("valid graph");
        cut_graph(&mut graph, high, low);

        let above = xs.iter().filter(|x| **x > high).count();
        let below = xs.iter().filter(|x| **x < low && **x <= high).count();
        prop_assert_eq!(graph.len(), xs.len() - above - below);
        // y holds the original index, so survivors must stay increasing
        prop_assert!(graph.y().windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(graph.x().iter().all(|x| *x <= high && *x >= low));
    }
}

#[test]
fn cut_bound_outside_the_axis_range_clears_or_keeps_everything() {
    let mut hist = histogram(&[1.0, 2.0, 3.0]);
    cut_histogram(&mut hist, 10.0, -10.0);
    assert_eq!(hist.contents(), &[1.0, 2.0, 3.0]);

    cut_histogram(&mut hist, -0.5, CUT_DISABLED);
    assert_eq!(hist.contents(), &[0.0, 0.0, 0.0]);
}

#[test]
fn malformed_datasets_fail_to_deserialize() {
    let short_contents = r#"{"histogram":{"name":"h","title":"","x_edges":[0.0,1.0,2.0,3.0],"contents":[1.0],"errors":[1.0],"entries":1}}"#;
    let no_edges = r#"{"histogram":{"name":"h","x_edges":[],"contents":[],"errors":[]}}"#;
    let ragged_graph = r#"{"graph":{"name":"g","x":[0.0,1.0],"y":[1.0]}}"#;
    let short_errors = r#"{"graph":{"name":"g","x":[0.0,1.0],"y":[1.0,2.0],"ey":[0.1]}}"#;
    for input in [short_contents, no_edges, ragged_graph, short_errors] {
        let parsed = serde_json::from_str::<Dataset>(input);
        assert!(parsed.is_err(), "accepted {input}");
    }
}

#[test]
fn valid_datasets_survive_json() {
    let hist = histogram(&[1.0, 2.0, 3.0]).with_title("counts");
    let graph = Graph::new("g", vec![0.0, 1.0], vec![2.0, 3.0])
        .and_then(|graph| graph.with_errors(vec![0.5, 0.5], vec![0.1, 0.2]))
        .expect("valid graph");
    for dataset in [Dataset::from(hist), Dataset::from(graph)] {
        let text = serde_json::to_string(&dataset).expect("serialize");
        let parsed: Dataset = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed, dataset);
    }
}
