//! Domain entities: caller-facing input structures

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::style::StyleProps;

/// One node of the caller's hierarchy.
///
/// `size` only matters on leaves. Fields that are not recognised are kept in
/// `extra` so event keys can be derived from arbitrary data fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    /// Explicit label, wins over every configured label source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelValue>,
    /// Explicit style, wins over the computed fill and the global data style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleProps>,
    /// Explicit event key for the output mapping
    #[serde(
        default,
        rename = "eventKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_key: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            children: Some(children),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: LabelValue) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_style(mut self, style: StyleProps) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_event_key(mut self, key: impl Into<String>) -> Self {
        self.event_key = Some(key.into());
        self
    }

    /// Children in input order; empty for leaves.
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// A node without children, or with an empty children list.
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Demo hierarchy used when no data is supplied.
    pub fn sample() -> Self {
        Self::branch(
            "A",
            vec![
                Self::leaf("B1", 5.0),
                Self::branch(
                    "B2",
                    vec![
                        Self::leaf("B2A", 4.0),
                        Self::branch(
                            "B2B",
                            vec![Self::leaf("B2B1", 4.0), Self::leaf("B2B2", 4.0)],
                        ),
                    ],
                ),
                Self::branch("B3", vec![Self::leaf("B3A", 3.0), Self::leaf("B3B", 5.0)]),
            ],
        )
    }
}

/// A label as supplied by the caller, before coercion to text.
///
/// `Null` means "render no label", which is different from the text `"0"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl LabelValue {
    /// Coerce to display text; `Null` yields no text.
    pub fn into_text(self) -> Option<String> {
        match self {
            LabelValue::Null => None,
            LabelValue::Bool(b) => Some(b.to_string()),
            LabelValue::Number(n) => Some(format_number(n)),
            LabelValue::Text(s) => Some(s),
        }
    }
}

impl From<&str> for LabelValue {
    fn from(s: &str) -> Self {
        LabelValue::Text(s.to_string())
    }
}

impl From<String> for LabelValue {
    fn from(s: String) -> Self {
        LabelValue::Text(s)
    }
}

impl From<f64> for LabelValue {
    fn from(n: f64) -> Self {
        LabelValue::Number(n)
    }
}

impl<T: Into<LabelValue>> From<Option<T>> for LabelValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LabelValue::Null)
    }
}

/// Render a number the way chart labels expect: `5.0` → `"5"`, `2.5` → `"2.5"`,
/// `1e21` → `"1e+21"`.
pub fn format_number(n: f64) -> String {
    if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.is_nan() {
        "NaN".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exp = format!("{n:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        n.to_string()
    }
}

/// How leaves contribute to their ancestors' totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SumBy {
    /// Leaf weight is its `size` (missing size counts as 0)
    #[default]
    Size,
    /// Leaf weight is 1
    Count,
}

impl fmt::Display for SumBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SumBy::Size => write!(f, "size"),
            SumBy::Count => write!(f, "count"),
        }
    }
}

/// Padding as configured: one number for all sides or a per-side object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaddingSpec {
    Uniform(f64),
    Sides {
        #[serde(default)]
        top: Option<f64>,
        #[serde(default)]
        bottom: Option<f64>,
        #[serde(default)]
        left: Option<f64>,
        #[serde(default)]
        right: Option<f64>,
    },
}

/// Resolved padding, one value per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

impl From<PaddingSpec> for Padding {
    fn from(spec: PaddingSpec) -> Self {
        match spec {
            PaddingSpec::Uniform(value) => Padding::uniform(value),
            PaddingSpec::Sides {
                top,
                bottom,
                left,
                right,
            } => Padding {
                top: top.unwrap_or(0.0),
                bottom: bottom.unwrap_or(0.0),
                left: left.unwrap_or(0.0),
                right: right.unwrap_or(0.0),
            },
        }
    }
}
