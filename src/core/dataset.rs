//! Backing datasets that series reference by unique name, plus the value
//! transformations applied before drawing (cuts, normalization, ratios).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::data::{NormMode, unique_name};
use crate::error::{PlotError, PlotResult};

/// Cut value meaning "this side is not cut".
pub const CUT_DISABLED: f64 = -999.0;
const CUT_DISABLED_THRESHOLD: f64 = -997.0;

fn cut_enabled(value: f64) -> bool {
    value >= CUT_DISABLED_THRESHOLD
}

fn validate_edges(edges: &[f64], axis: &str) -> PlotResult<()> {
    if edges.len() < 2 {
        return Err(PlotError::InvalidData(format!(
            "{axis} binning needs at least two edges"
        )));
    }
    if edges.iter().any(|edge| !edge.is_finite()) {
        return Err(PlotError::InvalidData(format!(
            "{axis} bin edges must be finite"
        )));
    }
    if edges.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(PlotError::InvalidData(format!(
            "{axis} bin edges must be strictly increasing"
        )));
    }
    Ok(())
}

/// Binned dataset, one- or two-dimensional.
///
/// Bins are stored row-major: `index = iy * nx + ix`. A one-dimensional
/// histogram has no `y_edges` and a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HistogramRepr")]
pub struct Histogram {
    name: String,
    title: String,
    x_edges: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    y_edges: Vec<f64>,
    contents: Vec<f64>,
    errors: Vec<f64>,
    entries: u64,
}

/// Unchecked wire form of [`Histogram`].
#[derive(Deserialize)]
struct HistogramRepr {
    name: String,
    #[serde(default)]
    title: String,
    x_edges: Vec<f64>,
    #[serde(default)]
    y_edges: Vec<f64>,
    contents: Vec<f64>,
    errors: Vec<f64>,
    #[serde(default)]
    entries: u64,
}

impl TryFrom<HistogramRepr> for Histogram {
    type Error = PlotError;

    fn try_from(repr: HistogramRepr) -> PlotResult<Self> {
        let hist = if repr.y_edges.is_empty() {
            Self::new(repr.name, repr.x_edges)?
        } else {
            Self::new_2d(repr.name, repr.x_edges, repr.y_edges)?
        };
        Ok(hist
            .with_contents(repr.contents, repr.errors)?
            .with_title(repr.title)
            .with_entries(repr.entries))
    }
}

impl Histogram {
    /// Empty one-dimensional histogram over the given bin edges.
    pub fn new(name: impl Into<String>, x_edges: Vec<f64>) -> PlotResult<Self> {
        validate_edges(&x_edges, "x")?;
        let bins = x_edges.len() - 1;
        Ok(Self {
            name: name.into(),
            title: String::new(),
            x_edges,
            y_edges: Vec::new(),
            contents: vec![0.0; bins],
            errors: vec![0.0; bins],
            entries: 0,
        })
    }

    /// Empty two-dimensional histogram.
    pub fn new_2d(
        name: impl Into<String>,
        x_edges: Vec<f64>,
        y_edges: Vec<f64>,
    ) -> PlotResult<Self> {
        validate_edges(&x_edges, "x")?;
        validate_edges(&y_edges, "y")?;
        let bins = (x_edges.len() - 1) * (y_edges.len() - 1);
        Ok(Self {
            name: name.into(),
            title: String::new(),
            x_edges,
            y_edges,
            contents: vec![0.0; bins],
            errors: vec![0.0; bins],
            entries: 0,
        })
    }

    /// Evenly spaced one-dimensional binning.
    pub fn uniform(name: impl Into<String>, bins: usize, min: f64, max: f64) -> PlotResult<Self> {
        if bins == 0 || !(max > min) {
            return Err(PlotError::InvalidData(format!(
                "uniform binning needs bins > 0 and max > min, got {bins} bins over [{min}, {max}]"
            )));
        }
        let width = (max - min) / bins as f64;
        let edges = (0..=bins).map(|i| min + width * i as f64).collect();
        Self::new(name, edges)
    }

    /// Replaces bin contents and errors; lengths must match the binning.
    pub fn with_contents(mut self, contents: Vec<f64>, errors: Vec<f64>) -> PlotResult<Self> {
        let bins = self.bin_count();
        if contents.len() != bins || errors.len() != bins {
            return Err(PlotError::InvalidData(format!(
                "histogram `{}` has {bins} bins, got {} contents and {} errors",
                self.name,
                contents.len(),
                errors.len()
            )));
        }
        self.contents = contents;
        self.errors = errors;
        Ok(self)
    }

    /// Contents with Poisson errors.
    pub fn with_counts(self, counts: Vec<f64>) -> PlotResult<Self> {
        let errors = counts.iter().map(|count| count.abs().sqrt()).collect();
        let entries = counts.iter().filter(|count| **count > 0.0).map(|count| *count as u64).sum();
        let mut hist = self.with_contents(counts, errors)?;
        hist.entries = entries;
        Ok(hist)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_entries(mut self, entries: u64) -> Self {
        self.entries = entries;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn entries(&self) -> u64 {
        self.entries
    }

    #[must_use]
    pub fn is_2d(&self) -> bool {
        !self.y_edges.is_empty()
    }

    #[must_use]
    pub fn nx(&self) -> usize {
        self.x_edges.len() - 1
    }

    #[must_use]
    pub fn ny(&self) -> usize {
        self.y_edges.len().saturating_sub(1).max(1)
    }

    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.nx() * self.ny()
    }

    #[must_use]
    pub fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    #[must_use]
    pub fn y_edges(&self) -> &[f64] {
        &self.y_edges
    }

    #[must_use]
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    #[must_use]
    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (self.x_edges[0], self.x_edges[self.x_edges.len() - 1])
    }

    /// 1-based x bin containing `x`: 0 for underflow, `nx + 1` for overflow.
    #[must_use]
    pub fn find_bin_x(&self, x: f64) -> usize {
        if x < self.x_edges[0] {
            return 0;
        }
        self.x_edges.partition_point(|edge| *edge <= x)
    }

    #[must_use]
    pub fn bin_center_x(&self, ix: usize) -> f64 {
        0.5 * (self.x_edges[ix] + self.x_edges[ix + 1])
    }

    fn bin_area(&self, index: usize) -> f64 {
        let ix = index % self.nx();
        let width = self.x_edges[ix + 1] - self.x_edges[ix];
        if self.is_2d() {
            let iy = index / self.nx();
            width * (self.y_edges[iy + 1] - self.y_edges[iy])
        } else {
            width
        }
    }

    fn zero_columns(&mut self, columns: std::ops::Range<usize>) {
        let nx = self.nx();
        for row in 0..self.ny() {
            for ix in columns.clone() {
                self.contents[row * nx + ix] = 0.0;
                self.errors[row * nx + ix] = 0.0;
            }
        }
    }

    #[must_use]
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Content-weighted mean of the x bin centers.
    #[must_use]
    pub fn mean(&self) -> f64 {
        let nx = self.nx();
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (index, content) in self.contents.iter().enumerate() {
            weighted += self.bin_center_x(index % nx) * content;
            total += content;
        }
        if total == 0.0 { 0.0 } else { weighted / total }
    }

    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.contents.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.contents.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn scale(&mut self, factor: f64) {
        for content in &mut self.contents {
            *content *= factor;
        }
        for error in &mut self.errors {
            *error *= factor.abs();
        }
    }

    /// Divides by the integral; `IntegralWidth` also divides each bin by its width.
    pub fn normalize(&mut self, mode: NormMode) -> PlotResult<()> {
        let integral = self.integral();
        if integral == 0.0 || !integral.is_finite() {
            return Err(PlotError::InvalidData(format!(
                "histogram `{}` cannot be normalized: integral is {integral}",
                self.name
            )));
        }
        self.scale(1.0 / integral);
        if mode == NormMode::IntegralWidth {
            for index in 0..self.bin_count() {
                let area = self.bin_area(index);
                self.contents[index] /= area;
                self.errors[index] /= area;
            }
        }
        Ok(())
    }

    fn same_binning(&self, other: &Self) -> bool {
        self.x_edges == other.x_edges && self.y_edges == other.y_edges
    }

    /// Bin-by-bin `self / denominator`.
    ///
    /// Bins with an empty denominator are set to zero. `correlated` selects
    /// binomial errors, for numerators that are subsets of the denominator.
    pub fn divide(&self, denominator: &Self, correlated: bool) -> PlotResult<Self> {
        if !self.same_binning(denominator) {
            return Err(PlotError::TypeMismatch {
                name: denominator.name.clone(),
                expected: "histogram with matching binning",
                found: "histogram with different binning",
            });
        }
        let mut ratio = self.clone();
        for index in 0..self.bin_count() {
            let (c1, e1) = (self.contents[index], self.errors[index]);
            let (c2, e2) = (denominator.contents[index], denominator.errors[index]);
            if c2 == 0.0 {
                ratio.contents[index] = 0.0;
                ratio.errors[index] = 0.0;
                continue;
            }
            let value = c1 / c2;
            ratio.contents[index] = value;
            ratio.errors[index] = if correlated {
                (((1.0 - 2.0 * value) * e1 * e1 + value * value * e2 * e2) / (c2 * c2))
                    .abs()
                    .sqrt()
            } else {
                ((e1 / c2).powi(2) + (c1 * e2 / (c2 * c2)).powi(2)).sqrt()
            };
        }
        Ok(ratio)
    }
}

/// Zeroes every x bin at or after the bin containing `high` and every bin at
/// or before the bin containing `low`.
///
/// A bound below the disabled threshold (see [`CUT_DISABLED`]) leaves that
/// side untouched. Two-dimensional histograms are cut along x in every row.
pub fn cut_histogram(hist: &mut Histogram, high: f64, low: f64) {
    let nx = hist.nx();
    if cut_enabled(high) {
        let first = hist.find_bin_x(high).max(1) - 1;
        if first < nx {
            hist.zero_columns(first..nx);
        }
    }
    if cut_enabled(low) {
        let last = hist.find_bin_x(low).min(nx);
        hist.zero_columns(0..last);
    }
}

/// Point dataset with optional symmetric errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRepr")]
pub struct Graph {
    name: String,
    title: String,
    x: Vec<f64>,
    y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ex: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ey: Vec<f64>,
}

#[derive(Deserialize)]
struct GraphRepr {
    name: String,
    #[serde(default)]
    title: String,
    x: Vec<f64>,
    y: Vec<f64>,
    #[serde(default)]
    ex: Vec<f64>,
    #[serde(default)]
    ey: Vec<f64>,
}

impl TryFrom<GraphRepr> for Graph {
    type Error = PlotError;

    fn try_from(repr: GraphRepr) -> PlotResult<Self> {
        let mut graph = Self::new(repr.name, repr.x, repr.y)?.with_title(repr.title);
        for (errors, axis) in [(&repr.ex, "x"), (&repr.ey, "y")] {
            if !errors.is_empty() && errors.len() != graph.len() {
                return Err(PlotError::InvalidData(format!(
                    "graph `{}` has {} points, got {} {axis} errors",
                    graph.name,
                    graph.len(),
                    errors.len()
                )));
            }
        }
        graph.ex = repr.ex;
        graph.ey = repr.ey;
        Ok(graph)
    }
}

impl Graph {
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> PlotResult<Self> {
        let name = name.into();
        if x.len() != y.len() {
            return Err(PlotError::InvalidData(format!(
                "graph `{name}` has {} x values and {} y values",
                x.len(),
                y.len()
            )));
        }
        Ok(Self {
            name,
            title: String::new(),
            x,
            y,
            ex: Vec::new(),
            ey: Vec::new(),
        })
    }

    pub fn with_errors(mut self, ex: Vec<f64>, ey: Vec<f64>) -> PlotResult<Self> {
        if ex.len() != self.x.len() || ey.len() != self.x.len() {
            return Err(PlotError::InvalidData(format!(
                "graph `{}` has {} points, got {} x errors and {} y errors",
                self.name,
                self.x.len(),
                ex.len(),
                ey.len()
            )));
        }
        self.ex = ex;
        self.ey = ey;
        Ok(self)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[must_use]
    pub fn ey(&self) -> &[f64] {
        &self.ey
    }

    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let min = self.x.iter().copied().reduce(f64::min)?;
        let max = self.x.iter().copied().reduce(f64::max)?;
        Some((min, max))
    }

    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.y {
            *value *= factor;
        }
        for error in &mut self.ey {
            *error *= factor.abs();
        }
    }

    /// Linear interpolation of y (and its error) at `x`; `None` outside the
    /// sampled x range.
    fn interpolate(&self, x: f64) -> Option<(f64, f64)> {
        let mut order: Vec<usize> = (0..self.x.len()).collect();
        order.sort_by(|a, b| self.x[*a].total_cmp(&self.x[*b]));
        let error_at = |index: usize| self.ey.get(index).copied().unwrap_or(0.0);
        for pair in order.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            let (x0, x1) = (self.x[lo], self.x[hi]);
            if x < x0 || x > x1 {
                continue;
            }
            if x1 == x0 {
                return Some((self.y[lo], error_at(lo)));
            }
            let t = (x - x0) / (x1 - x0);
            let value = self.y[lo] + t * (self.y[hi] - self.y[lo]);
            let error = error_at(lo) + t * (error_at(hi) - error_at(lo));
            return Some((value, error));
        }
        match order.as_slice() {
            [only] if self.x[*only] == x => Some((self.y[*only], error_at(*only))),
            _ => None,
        }
    }

    /// Pointwise `self / denominator`, with the denominator interpolated at
    /// each numerator x. Points outside the denominator's range are dropped.
    pub fn divide(&self, denominator: &Self) -> PlotResult<Self> {
        if denominator.is_empty() {
            return Err(PlotError::InvalidData(format!(
                "graph `{}` has no points to divide by",
                denominator.name
            )));
        }
        let mut ratio = Self {
            name: self.name.clone(),
            title: self.title.clone(),
            x: Vec::with_capacity(self.len()),
            y: Vec::with_capacity(self.len()),
            ex: Vec::new(),
            ey: Vec::with_capacity(self.len()),
        };
        let has_ex = !self.ex.is_empty();
        if has_ex {
            ratio.ex.reserve(self.len());
        }
        for index in 0..self.len() {
            let Some((den, den_err)) = denominator.interpolate(self.x[index]) else {
                continue;
            };
            let num = self.y[index];
            let num_err = self.ey.get(index).copied().unwrap_or(0.0);
            let (value, error) = if den == 0.0 {
                (0.0, 0.0)
            } else {
                (
                    num / den,
                    ((num_err / den).powi(2) + (num * den_err / (den * den)).powi(2)).sqrt(),
                )
            };
            ratio.x.push(self.x[index]);
            ratio.y.push(value);
            ratio.ey.push(error);
            if has_ex {
                ratio.ex.push(self.ex[index]);
            }
        }
        Ok(ratio)
    }
}

/// Removes points with x strictly above `high` or strictly below `low`,
/// keeping the order of the survivors.
pub fn cut_graph(graph: &mut Graph, high: f64, low: f64) {
    let cut_high = cut_enabled(high);
    let cut_low = cut_enabled(low);
    if !cut_high && !cut_low {
        return;
    }
    let keep: Vec<bool> = graph
        .x
        .iter()
        .map(|x| !(cut_high && *x > high) && !(cut_low && *x < low))
        .collect();
    let mut flags = keep.iter();
    graph.y.retain(|_| flags.next().copied().unwrap_or(false));
    for column in [&mut graph.x, &mut graph.ex, &mut graph.ey] {
        if column.is_empty() {
            continue;
        }
        let mut flags = keep.iter();
        column.retain(|_| flags.next().copied().unwrap_or(false));
    }
}

/// Analytic curve drawn over a fixed x interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    name: String,
    title: String,
    formula: String,
    x_min: f64,
    x_max: f64,
}

impl Function {
    #[must_use]
    pub fn new(name: impl Into<String>, formula: impl Into<String>, x_min: f64, x_max: f64) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            formula: formula.into(),
            x_min,
            x_max,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }
}

/// Any object a series can point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Histogram(Histogram),
    Graph(Graph),
    Function(Function),
}

impl Dataset {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Histogram(_) => "histogram",
            Self::Graph(_) => "graph",
            Self::Function(_) => "function",
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Histogram(hist) => hist.name(),
            Self::Graph(graph) => graph.name(),
            Self::Function(function) => function.name(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Histogram(hist) => hist.title(),
            Self::Graph(graph) => graph.title(),
            Self::Function(function) => function.title(),
        }
    }

    #[must_use]
    pub fn is_function_like(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    #[must_use]
    pub fn is_2d(&self) -> bool {
        matches!(self, Self::Histogram(hist) if hist.is_2d())
    }

    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        match self {
            Self::Histogram(hist) => Some(hist.x_range()),
            Self::Graph(graph) => graph.x_range(),
            Self::Function(function) => Some(function.x_range()),
        }
    }

    /// Range of drawn y values, errors included.
    #[must_use]
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        let (values, errors): (&[f64], &[f64]) = match self {
            Self::Histogram(hist) if !hist.is_2d() => (hist.contents(), hist.errors()),
            Self::Histogram(hist) => {
                let (lo, hi) = (hist.y_edges[0], hist.y_edges[hist.y_edges.len() - 1]);
                return Some((lo, hi));
            }
            Self::Graph(graph) => (graph.y(), graph.ey()),
            Self::Function(_) => return None,
        };
        let mut extent: Option<(f64, f64)> = None;
        for (index, value) in values.iter().enumerate() {
            let error = errors.get(index).copied().unwrap_or(0.0);
            let (lo, hi) = (value - error, value + error);
            extent = Some(match extent {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            });
        }
        extent
    }
}

impl From<Histogram> for Dataset {
    fn from(hist: Histogram) -> Self {
        Self::Histogram(hist)
    }
}

impl From<Graph> for Dataset {
    fn from(graph: Graph) -> Self {
        Self::Graph(graph)
    }
}

impl From<Function> for Dataset {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

/// Loaded datasets keyed by `name_IN_input`, in load order.
#[derive(Debug, Clone, Default)]
pub struct DatasetPool {
    datasets: IndexMap<String, Dataset>,
}

impl DatasetPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `dataset` under `name_IN_input_id`, replacing any previous entry.
    pub fn insert(&mut self, name: &str, input_id: &str, dataset: impl Into<Dataset>) {
        self.datasets
            .insert(unique_name(name, input_id), dataset.into());
    }

    #[must_use]
    pub fn with(mut self, name: &str, input_id: &str, dataset: impl Into<Dataset>) -> Self {
        self.insert(name, input_id, dataset);
        self
    }

    #[must_use]
    pub fn get(&self, unique_name: &str) -> Option<&Dataset> {
        self.datasets.get(unique_name)
    }

    pub fn lookup(&self, unique_name: &str) -> PlotResult<&Dataset> {
        self.get(unique_name)
            .ok_or_else(|| PlotError::MissingData(unique_name.to_owned()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{
        CUT_DISABLED, Dataset, DatasetPool, Graph, Histogram, cut_graph, cut_histogram,
    };
    use crate::core::NormMode;
    use crate::error::PlotError;

    fn ramp() -> Histogram {
        Histogram::uniform("h", 5, 0.0, 5.0)
            .and_then(|hist| hist.with_counts(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
            .expect("valid histogram")
    }

    #[test]
    fn find_bin_reports_underflow_and_overflow() {
        let hist = ramp();
        assert_eq!(hist.find_bin_x(-0.1), 0);
        assert_eq!(hist.find_bin_x(0.0), 1);
        assert_eq!(hist.find_bin_x(2.5), 3);
        assert_eq!(hist.find_bin_x(5.0), 6);
    }

    #[test]
    fn cut_zeroes_high_and_low_sides() {
        let mut hist = ramp();
        cut_histogram(&mut hist, 3.5, 0.5);
        assert_eq!(hist.contents(), &[0.0, 2.0, 3.0, 0.0, 0.0]);
        assert_eq!(hist.errors()[3], 0.0);
    }

    #[test]
    fn disabled_sides_are_independent() {
        let mut hist = ramp();
        cut_histogram(&mut hist, CUT_DISABLED, 1.5);
        assert_eq!(hist.contents(), &[0.0, 0.0, 3.0, 4.0, 5.0]);

        let mut untouched = ramp();
        cut_histogram(&mut untouched, CUT_DISABLED, CUT_DISABLED);
        assert_eq!(untouched, ramp());
    }

    #[test]
    fn normalize_divides_by_integral_and_width() {
        let mut hist = Histogram::new("w", vec![0.0, 1.0, 3.0])
            .and_then(|hist| hist.with_contents(vec![2.0, 2.0], vec![0.0, 0.0]))
            .expect("valid histogram");
        hist.normalize(NormMode::IntegralWidth).expect("normalize");
        assert_relative_eq!(hist.contents()[0], 0.5);
        assert_relative_eq!(hist.contents()[1], 0.25);

        let mut empty = Histogram::uniform("e", 2, 0.0, 1.0).expect("valid histogram");
        assert!(matches!(
            empty.normalize(NormMode::Integral),
            Err(PlotError::InvalidData(_))
        ));
    }

    #[test]
    fn divide_handles_empty_denominator_bins() {
        let num = ramp();
        let den = Histogram::uniform("d", 5, 0.0, 5.0)
            .and_then(|hist| hist.with_counts(vec![2.0, 0.0, 3.0, 8.0, 5.0]))
            .expect("valid histogram");
        let ratio = num.divide(&den, false).expect("divide");
        assert_relative_eq!(ratio.contents()[0], 0.5);
        assert_eq!(ratio.contents()[1], 0.0);
        assert_eq!(ratio.errors()[1], 0.0);
        assert_relative_eq!(ratio.contents()[2], 1.0);
    }

    #[test]
    fn correlated_division_uses_binomial_errors() {
        let num = Histogram::uniform("n", 1, 0.0, 1.0)
            .and_then(|hist| hist.with_counts(vec![25.0]))
            .expect("valid histogram");
        let den = Histogram::uniform("d", 1, 0.0, 1.0)
            .and_then(|hist| hist.with_counts(vec![100.0]))
            .expect("valid histogram");
        let ratio = num.divide(&den, true).expect("divide");
        // sqrt(|(0.5 * 25 + 0.0625 * 100)| / 100^2)
        assert_relative_eq!(ratio.errors()[0], (18.75f64 / 10_000.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn divide_rejects_mismatched_binning() {
        let other = Histogram::uniform("o", 4, 0.0, 5.0).expect("valid histogram");
        assert!(matches!(
            ramp().divide(&other, false),
            Err(PlotError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn graph_cut_retains_order() {
        let mut graph = Graph::new("g", vec![3.0, 0.0, 1.0, 5.0], vec![30.0, 0.0, 10.0, 50.0])
            .expect("valid graph");
        cut_graph(&mut graph, 4.0, 0.5);
        assert_eq!(graph.x(), &[3.0, 1.0]);
        assert_eq!(graph.y(), &[30.0, 10.0]);
    }

    #[test]
    fn graph_divide_interpolates_denominator() {
        let num = Graph::new("n", vec![0.5, 1.5, 9.0], vec![1.0, 3.0, 1.0]).expect("valid graph");
        let den = Graph::new("d", vec![0.0, 2.0], vec![1.0, 3.0]).expect("valid graph");
        let ratio = num.divide(&den).expect("divide");
        assert_eq!(ratio.len(), 2);
        assert_relative_eq!(ratio.y()[0], 1.0 / 1.5);
        assert_relative_eq!(ratio.y()[1], 3.0 / 2.5);
    }

    #[test]
    fn pool_lookup_reports_missing_names() {
        let pool = DatasetPool::new().with("h", "in", ramp());
        assert!(matches!(pool.lookup("h_IN_in"), Ok(Dataset::Histogram(_))));
        assert_eq!(
            pool.lookup("x_IN_in"),
            Err(PlotError::MissingData("x_IN_in".to_owned()))
        );
    }
}
