use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{DatasetPool, Merge, Plot};
use crate::error::{PlotError, PlotResult};
use crate::render::Backend;

use super::plot_painter::{PlotPainter, RenderedPlot};
use super::plot_style::PlotStyle;

/// Named template plots plus the plots that reference them.
///
/// Plots are keyed by their unique name and rendered as
/// `template ⊕ plot` when they name a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotLibrary {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    templates: IndexMap<String, Plot>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    plots: IndexMap<String, Plot>,
}

impl PlotLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `template` under its name, replacing an older one.
    pub fn add_template(&mut self, template: Plot) {
        let name = template.name().to_owned();
        if self.templates.insert(name.clone(), template).is_some() {
            debug!(template = %name, "template replaced");
        }
    }

    /// Registers `plot`; unique names must not repeat.
    pub fn add_plot(&mut self, plot: Plot) -> PlotResult<()> {
        let key = plot.unique_name();
        if self.plots.contains_key(&key) {
            return Err(PlotError::InvalidData(format!(
                "plot `{key}` is already registered"
            )));
        }
        self.plots.insert(key, plot);
        Ok(())
    }

    #[must_use]
    pub fn template(&self, name: &str) -> Option<&Plot> {
        self.templates.get(name)
    }

    #[must_use]
    pub fn plot(&self, unique_name: &str) -> Option<&Plot> {
        self.plots.get(unique_name)
    }

    /// Unique names of the registered plots, in registration order.
    pub fn plot_names(&self) -> impl Iterator<Item = &str> {
        self.plots.keys().map(String::as_str)
    }

    /// `template ⊕ plot` for the template `plot` names, or `plot` itself.
    pub fn resolve(&self, plot: &Plot) -> PlotResult<Plot> {
        let Some(template_name) = plot.template_name() else {
            return Ok(plot.clone());
        };
        let template = self
            .templates
            .get(template_name)
            .ok_or_else(|| PlotError::MissingData(format!("template {template_name}")))?;
        Ok(template.merge(plot))
    }

    /// Renders the registered plot `unique_name` with its template applied.
    pub fn generate<B: Backend + ?Sized>(
        &self,
        unique_name: &str,
        style: &PlotStyle,
        pool: &DatasetPool,
        backend: &mut B,
    ) -> Option<RenderedPlot> {
        let Some(plot) = self.plots.get(unique_name) else {
            warn!(plot = %unique_name, "plot is not registered");
            return None;
        };
        match self.resolve(plot) {
            Ok(plot) => PlotPainter::generate_plot(&plot, style, pool, backend),
            Err(err) => {
                warn!(plot = %unique_name, error = %err, "cannot resolve plot template");
                None
            }
        }
    }

    pub fn to_json_pretty(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PlotError::PropertyTree(format!("failed to serialize plot library: {e}")))
    }

    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| PlotError::PropertyTree(format!("failed to parse plot library: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::PlotLibrary;
    use crate::api::PlotStyle;
    use crate::core::{Axis, AxisKey, DatasetPool, Pad, Plot};
    use crate::error::PlotError;
    use crate::render::RecordingBackend;

    fn library() -> PlotLibrary {
        let mut library = PlotLibrary::new();
        library.add_template(
            Plot::new("spectra", "templates")
                .with_dimensions(800, 600, false)
                .with_pad(1, Pad::new().with_axis(AxisKey::Y, Axis::new().with_log(true))),
        );
        library
            .add_plot(Plot::new("pt", "pp").with_template_name("spectra").with_pad(1, Pad::new().with_title("p_{T}")))
            .expect("first registration");
        library
    }

    #[test]
    fn resolve_merges_template_under_plot() {
        let library = library();
        let plot = library.plot("pt_IN_pp").expect("registered");
        let resolved = library.resolve(plot).expect("template exists");
        assert_eq!(resolved.unique_name(), "pt_IN_pp");
        assert_eq!(resolved.dimensions().width, Some(800));
        let pad = resolved.pad(1).expect("pad 1");
        assert_eq!(pad.title(), Some("p_{T}"));
        assert_eq!(pad.axis(AxisKey::Y).and_then(Axis::is_log), Some(true));
    }

    #[test]
    fn duplicate_plots_and_missing_templates_are_errors() {
        let mut library = library();
        assert!(matches!(
            library.add_plot(Plot::new("pt", "pp")),
            Err(PlotError::InvalidData(_))
        ));
        let orphan = Plot::new("x", "pp").with_template_name("nope");
        assert_eq!(
            library.resolve(&orphan),
            Err(PlotError::MissingData("template nope".to_owned()))
        );
    }

    #[test]
    fn generate_renders_registered_plots_only() {
        let library = library();
        let mut backend = RecordingBackend::new();
        let pool = DatasetPool::new();
        let rendered = library
            .generate("pt_IN_pp", &PlotStyle::default(), &pool, &mut backend)
            .expect("rendered");
        assert_eq!(rendered.pads(), &[1]);
        assert!(library.generate("other_IN_pp", &PlotStyle::default(), &pool, &mut backend).is_none());
    }

    #[test]
    fn library_survives_json() {
        let library = library();
        let text = library.to_json_pretty().expect("serialize");
        assert_eq!(PlotLibrary::from_json_str(&text).expect("parse"), library);
    }
}
