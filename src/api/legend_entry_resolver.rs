use crate::core::{Dataset, LegendContent, LegendEntry, Merge};
use crate::render::{DrawDirective, LegendRow};

const TOKEN_NAME: &str = "<name>";
const TOKEN_TITLE: &str = "<title>";
const TOKEN_ENTRIES: &str = "<entries>";
const TOKEN_INTEGRAL: &str = "<integral>";
const TOKEN_MEAN: &str = "<mean>";
const TOKEN_MAXIMUM: &str = "<maximum>";
const TOKEN_MINIMUM: &str = "<minimum>";

const AUTO_DRAW_STYLE: &str = "ep";

/// Replaces label tokens with properties of the backing dataset.
///
/// `<name>` and `<title>` resolve for every dataset; the numeric tokens only
/// for histograms. Unresolvable tokens stay in the label.
#[must_use]
pub fn substitute_label_tokens(label: &str, handle: Option<&Dataset>) -> String {
    let Some(handle) = handle else {
        return label.to_owned();
    };
    let mut text = label
        .replace(TOKEN_NAME, handle.name())
        .replace(TOKEN_TITLE, handle.title());
    if let Dataset::Histogram(hist) = handle {
        text = text
            .replace(TOKEN_ENTRIES, &hist.entries().to_string())
            .replace(TOKEN_INTEGRAL, &format!("{:.6}", hist.integral()))
            .replace(TOKEN_MEAN, &format!("{:.6}", hist.mean()))
            .replace(TOKEN_MAXIMUM, &format!("{:.6}", hist.maximum()))
            .replace(TOKEN_MINIMUM, &format!("{:.6}", hist.minimum()));
    }
    text
}

/// Generated legend row for a drawn series that carries a legend seed.
#[must_use]
pub fn transient_entry(directive: &DrawDirective) -> Option<LegendEntry> {
    let seed = directive.legend.as_ref()?;
    Some(LegendEntry {
        label: Some(seed.label.clone()),
        ref_data: Some(seed.ref_data.clone()),
        draw_style: Some(seed.draw_style.clone()),
        marker: directive.style.marker(),
        line: directive.style.line(),
        fill: directive.style.fill(),
        text: Default::default(),
    })
}

fn box_defaults(content: &LegendContent) -> LegendEntry {
    LegendEntry {
        draw_style: content.default_draw_style.clone(),
        marker: content.default_marker,
        line: content.default_line,
        fill: content.default_fill,
        ..LegendEntry::default()
    }
}

/// Merges the generated rows with the persistent user entries.
///
/// A user entry whose `ref_data` matches a generated row overrides that row
/// field by field, with the legend's own defaults in between. User entries
/// that match nothing are appended in id order.
#[must_use]
pub fn resolve_legend_entries(content: &LegendContent) -> Vec<LegendEntry> {
    let defaults = box_defaults(content);
    let mut matched = Vec::new();
    let mut resolved: Vec<LegendEntry> = content
        .entries
        .iter()
        .map(|generated| {
            let base = generated.merge(&defaults);
            let user = generated.ref_data.as_ref().and_then(|reference| {
                content
                    .user_entries
                    .iter()
                    .find(|(_, user)| user.ref_data.as_ref() == Some(reference))
            });
            match user {
                Some((id, user)) => {
                    matched.push(*id);
                    base.merge(user)
                }
                None => base,
            }
        })
        .collect();
    resolved.extend(
        content
            .user_entries
            .iter()
            .filter(|(id, _)| !matched.contains(*id))
            .map(|(_, user)| defaults.merge(user)),
    );
    resolved
}

/// Final rows with substituted labels; `lookup` maps `ref_data` to the drawn
/// dataset.
pub fn legend_rows<'a>(
    entries: &[LegendEntry],
    lookup: impl Fn(&str) -> Option<&'a Dataset>,
) -> Vec<LegendRow> {
    entries
        .iter()
        .map(|entry| {
            let handle = entry.ref_data.as_deref().and_then(&lookup);
            LegendRow {
                label: substitute_label_tokens(entry.label.as_deref().unwrap_or_default(), handle),
                draw_style: entry
                    .draw_style
                    .clone()
                    .unwrap_or_else(|| AUTO_DRAW_STYLE.to_owned()),
                marker: entry.marker,
                line: entry.line,
                fill: entry.fill,
                text: entry.text,
            }
        })
        .collect()
}
