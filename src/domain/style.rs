//! Style layers and the per-slice styling resolver

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::arena::WeightedTree;
use crate::domain::color::OrdinalScale;
use crate::domain::partition::Slice;

/// A single style attribute value (`"white"`, `0.5`, `true`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(s) => s.trim().parse().ok(),
            StyleValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Bool(b) => write!(f, "{b}"),
            StyleValue::Number(n) => write!(f, "{}", crate::domain::format_number(*n)),
            StyleValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

/// Flat attribute map for one style target.
pub type StyleProps = BTreeMap<String, StyleValue>;

/// Build a [`StyleProps`] from key/value pairs.
pub fn style_props<K, V, I>(pairs: I) -> StyleProps
where
    K: Into<String>,
    V: Into<StyleValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Style for the three chart targets. Also the unit of layering: a theme
/// style, a caller style and the fallback style are all `ChartStyle`s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub parent: StyleProps,
    pub data: StyleProps,
    pub labels: StyleProps,
}

/// A style layer as it appears in the ordered merge list.
pub type StyleLayer = ChartStyle;

impl ChartStyle {
    /// Global fill override (`style.data.fill`), if any.
    pub fn data_fill(&self) -> Option<String> {
        self.data.get("fill").map(ToString::to_string)
    }
}

/// Merge `overlay` onto `base`; keys present in `overlay` win.
pub fn merge_props(base: &StyleProps, overlay: &StyleProps) -> StyleProps {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Apply style layers in order, lowest precedence first.
pub fn merge_layers<'a, I>(layers: I) -> ChartStyle
where
    I: IntoIterator<Item = &'a StyleLayer>,
{
    layers
        .into_iter()
        .fold(ChartStyle::default(), |acc, layer| ChartStyle {
            parent: merge_props(&acc.parent, &layer.parent),
            data: merge_props(&acc.data, &layer.data),
            labels: merge_props(&acc.labels, &layer.labels),
        })
}

/// Resolved fill and merged style of one slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleResult {
    pub fill: String,
    pub style: StyleProps,
}

/// Resolves slice fills through an ordinal scale.
///
/// The scale remembers keys in first-request order, so resolve slices in
/// their visible order to get stable colors.
pub struct StyleResolver<'a> {
    style: &'a ChartStyle,
    scale: OrdinalScale,
}

impl<'a> StyleResolver<'a> {
    pub fn new(style: &'a ChartStyle, scale: OrdinalScale) -> Self {
        Self { style, scale }
    }

    /// Key looked up in the color scale: own name for internal nodes and a
    /// parentless root, parent's name for leaves.
    pub fn category_key<'s>(slice: &'s Slice, tree: &'s WeightedTree) -> &'s str {
        if slice.has_children {
            return &slice.data.name;
        }
        slice
            .parent
            .and_then(|idx| tree.get_node(idx))
            .map(|parent| parent.data.name.as_str())
            .unwrap_or(&slice.data.name)
    }

    pub fn fill(&mut self, slice: &Slice, tree: &WeightedTree) -> String {
        if let Some(fill) = self.style.data_fill() {
            return fill;
        }
        let key = Self::category_key(slice, tree);
        self.scale.color(key).to_string()
    }

    /// Global data style < computed fill < node's own style.
    pub fn resolve(&mut self, slice: &Slice, tree: &WeightedTree) -> StyleResult {
        let computed = self.fill(slice, tree);
        let mut style = self.style.data.clone();
        style.insert("fill".to_string(), StyleValue::Text(computed.clone()));
        if let Some(own) = &slice.data.style {
            style = merge_props(&style, own);
        }
        let fill = style
            .get("fill")
            .map(ToString::to_string)
            .unwrap_or(computed);
        trace!("slice {} resolved fill {}", slice.data.name, fill);
        StyleResult { fill, style }
    }
}
