//! Output descriptors handed to the rendering side.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::domain::{LabelDescriptor, Padding, Slice, StyleProps, TreeNode};

/// Key of one slice entry in [`ChartProps::slices`].
///
/// Keys compare by their text, so `Index(2)` and `Named("2")` name the same
/// entry, matching the single JSON object key both serialize to.
#[derive(Debug, Clone)]
pub enum EventKey {
    Index(usize),
    Named(String),
}

impl EventKey {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            EventKey::Index(i) => Cow::Owned(i.to_string()),
            EventKey::Named(name) => Cow::Borrowed(name),
        }
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_text() == other.as_text()
    }
}

impl Eq for EventKey {}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_text().cmp(&other.as_text())
    }
}

impl Hash for EventKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_text().hash(state);
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl Serialize for EventKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EventKey::Index(i) => serializer.serialize_u64(*i as u64),
            EventKey::Named(name) => serializer.serialize_str(name),
        }
    }
}

/// Path generator input for one wedge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcParams {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl From<&Slice> for ArcParams {
    fn from(slice: &Slice) -> Self {
        Self {
            start_angle: slice.x0,
            end_angle: slice.x1,
            inner_radius: slice.y0,
            outer_radius: slice.y1,
        }
    }
}

/// Whole-chart path generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcLayout {
    pub radius: f64,
    pub bands: usize,
    pub band_width: f64,
    pub full_angle: f64,
}

impl ArcLayout {
    pub fn new(radius: f64, bands: usize) -> Self {
        Self {
            radius,
            bands,
            band_width: if bands == 0 { 0.0 } else { radius / bands as f64 },
            full_angle: TAU,
        }
    }
}

/// Translation of the chart group inside its container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    /// Centre of the padded area, pulled back so the outer ring stays inside.
    pub fn centered(width: f64, height: f64, padding: &Padding, radius: f64) -> Self {
        let offset_width = width / 2.0 + padding.left - padding.right;
        let offset_height = height / 2.0 + padding.top - padding.bottom;
        Self {
            x: if offset_width + radius > width {
                radius + padding.left - padding.right
            } else {
                offset_width
            },
            y: if offset_height + radius > height {
                radius + padding.top - padding.bottom
            } else {
                offset_height
            },
        }
    }
}

/// Tooltip for the active node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipProps {
    pub active: bool,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Chart-level descriptor for the surrounding container.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentProps {
    pub data: TreeNode,
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub radius: f64,
    pub offset: Offset,
    pub arc_layout: ArcLayout,
    pub total_weight: f64,
    pub slices: Vec<Slice>,
    pub style: StyleProps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<TooltipProps>,
}

/// Geometry and style of one visible slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataProps {
    pub index: usize,
    pub slice: Slice,
    pub arc: ArcParams,
    pub fill: String,
    pub style: StyleProps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceProps {
    pub data: DataProps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelDescriptor>,
}

/// Assembled output: the `parent` entry plus one entry per visible slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartProps {
    pub parent: ParentProps,
    pub slices: BTreeMap<EventKey, SliceProps>,
}

impl ChartProps {
    pub fn get(&self, key: &EventKey) -> Option<&SliceProps> {
        self.slices.get(key)
    }

    /// Entries in visible order.
    pub fn in_visible_order(&self) -> Vec<(&EventKey, &SliceProps)> {
        let mut entries: Vec<_> = self.slices.iter().collect();
        entries.sort_by_key(|(_, props)| props.data.index);
        entries
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
