use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::plot::Plot;
use crate::error::{PlotError, PlotResult};

pub const PLOT_TREE_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotTreeContractV1 {
    pub schema_version: u32,
    pub plot: Plot,
}

impl Plot {
    /// Nested key/value form of this plot. Unset fields have no key.
    pub fn to_property_tree(&self) -> PlotResult<Value> {
        serde_json::to_value(self).map_err(|e| {
            PlotError::PropertyTree(format!("failed to serialize plot `{}`: {e}", self.name))
        })
    }

    pub fn from_property_tree(tree: &Value) -> PlotResult<Self> {
        Self::deserialize(tree)
            .map_err(|e| PlotError::PropertyTree(format!("failed to read plot tree: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> PlotResult<String> {
        let payload = PlotTreeContractV1 {
            schema_version: PLOT_TREE_SCHEMA_V1,
            plot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            PlotError::PropertyTree(format!("failed to serialize plot contract v1: {e}"))
        })
    }

    /// Accepts either a bare plot tree or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> PlotResult<Self> {
        let tree: Value = serde_json::from_str(input)
            .map_err(|e| PlotError::PropertyTree(format!("failed to parse plot json: {e}")))?;
        let Some(version) = tree.get("schema_version") else {
            return Self::from_property_tree(&tree);
        };
        if version.as_u64() != Some(u64::from(PLOT_TREE_SCHEMA_V1)) {
            return Err(PlotError::PropertyTree(format!(
                "unsupported plot schema version: {version}"
            )));
        }
        let payload = PlotTreeContractV1::deserialize(&tree).map_err(|e| {
            PlotError::PropertyTree(format!("failed to read plot contract v1: {e}"))
        })?;
        Ok(payload.plot)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::core::{Axis, AxisKey, Data, Pad, Plot};
    use crate::error::PlotError;

    #[test]
    fn absent_keys_mean_unset() {
        let plot = Plot::new("p", "g").with_pad(1, Pad::new().with_title("t"));
        let tree = plot.to_property_tree().expect("tree");
        assert_eq!(
            tree,
            json!({
                "name": "p",
                "group": "g",
                "dimensions": {},
                "pads": { "1": { "title": "t", "position": {}, "margins": {}, "frame": {}, "option_defaults": {} } }
            })
        );
    }

    #[test]
    fn contract_round_trip_preserves_pads_and_series() {
        let plot = Plot::new("spectrum", "pp")
            .with_template_name("default")
            .with_pad(
                1,
                Pad::new()
                    .with_axis(AxisKey::Y, Axis::new().with_log(true))
                    .with_data(Data::new("h", "in").with_label("data"))
                    .with_data(Data::ratio("a", "in", "b", "in").with_correlated_errors(true)),
            );
        let text = plot.to_json_contract_v1_pretty().expect("serialize");
        assert!(text.contains("\"schema_version\": 1"));
        assert_eq!(Plot::from_json_compat_str(&text).expect("parse"), plot);

        let bare = serde_json::to_string(&plot).expect("serialize");
        assert_eq!(Plot::from_json_compat_str(&bare).expect("parse"), plot);
    }

    #[test]
    fn rejects_unknown_schema_versions() {
        let err = Plot::from_json_compat_str(r#"{"schema_version": 9, "plot": {}}"#)
            .expect_err("unsupported");
        assert!(matches!(err, PlotError::PropertyTree(_)));
    }
}
