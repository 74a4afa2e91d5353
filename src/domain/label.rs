//! Label placement: position, orientation, anchors and text.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::entities::LabelValue;
use crate::domain::error::{BoxError, DomainError, DomainResult};
use crate::domain::partition::Slice;
use crate::domain::style::{StyleProps, StyleValue};

/// Compass bucket of a slice's mid-angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Top,
    Right,
    Bottom,
    Left,
}

impl Orientation {
    pub fn from_degrees(degrees: f64) -> Self {
        if degrees < 45.0 || degrees > 315.0 {
            Orientation::Top
        } else if degrees < 135.0 {
            Orientation::Right
        } else if degrees < 225.0 {
            Orientation::Bottom
        } else {
            Orientation::Left
        }
    }

    pub fn from_radians(radians: f64) -> Self {
        Self::from_degrees(radians.to_degrees())
    }

    pub fn of(slice: &Slice) -> Self {
        Self::from_radians(slice.mid_angle())
    }

    pub fn text_anchor(self) -> TextAnchor {
        match self {
            Orientation::Top | Orientation::Bottom => TextAnchor::Middle,
            Orientation::Right => TextAnchor::Start,
            Orientation::Left => TextAnchor::End,
        }
    }

    pub fn vertical_anchor(self) -> VerticalAnchor {
        match self {
            Orientation::Left | Orientation::Right => VerticalAnchor::Middle,
            Orientation::Bottom => VerticalAnchor::Start,
            Orientation::Top => VerticalAnchor::End,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Orientation::Top => "top",
            Orientation::Right => "right",
            Orientation::Bottom => "bottom",
            Orientation::Left => "left",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl FromStr for TextAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(TextAnchor::Start),
            "middle" => Ok(TextAnchor::Middle),
            "end" => Ok(TextAnchor::End),
            other => Err(format!("unknown text anchor: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Start,
    Middle,
    End,
}

impl FromStr for VerticalAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(VerticalAnchor::Start),
            "middle" => Ok(VerticalAnchor::Middle),
            "end" => Ok(VerticalAnchor::End),
            other => Err(format!("unknown vertical anchor: {other}")),
        }
    }
}

/// Caller function computing a label from a slice and the total weight.
pub type LabelFn = Arc<dyn Fn(&Slice, f64) -> Result<LabelValue, BoxError> + Send + Sync>;

/// Configured label source. A node's own `label` field always wins over it.
#[derive(Clone, Default, Deserialize)]
#[serde(from = "Vec<LabelValue>")]
pub enum LabelSource {
    /// Node name
    #[default]
    Default,
    /// Entry at the slice's visible index; missing entries render nothing
    Indexed(Vec<LabelValue>),
    Computed(LabelFn),
}

impl LabelSource {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Slice, f64) -> Result<LabelValue, BoxError> + Send + Sync + 'static,
    {
        LabelSource::Computed(Arc::new(f))
    }
}

impl From<Vec<LabelValue>> for LabelSource {
    fn from(values: Vec<LabelValue>) -> Self {
        LabelSource::Indexed(values)
    }
}

impl fmt::Debug for LabelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelSource::Default => write!(f, "Default"),
            LabelSource::Indexed(values) => f.debug_tuple("Indexed").field(values).finish(),
            LabelSource::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

/// Placed label of one slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDescriptor {
    /// None means no label is rendered
    pub text: Option<String>,
    pub x: f64,
    pub y: f64,
    pub orientation: Orientation,
    pub text_anchor: TextAnchor,
    pub vertical_anchor: VerticalAnchor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    pub style: StyleProps,
}

/// Rounds half up, like screen-coordinate rounding in browsers.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Places labels for the visible slices of one layout.
pub struct LabelPlacer<'a> {
    source: &'a LabelSource,
    style: StyleProps,
    total_weight: f64,
}

impl<'a> LabelPlacer<'a> {
    /// `labels_style` is the merged `style.labels`; `padding` defaults to 0.
    pub fn new(source: &'a LabelSource, labels_style: &StyleProps, total_weight: f64) -> Self {
        let mut style = StyleProps::new();
        style.insert("padding".to_string(), StyleValue::Number(0.0));
        style.extend(labels_style.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            source,
            style,
            total_weight,
        }
    }

    pub fn style(&self) -> &StyleProps {
        &self.style
    }

    /// Explicit field > indexed entry > computed value > node name.
    pub fn text(&self, slice: &Slice, index: usize) -> DomainResult<Option<String>> {
        let value = match (&slice.data.label, self.source) {
            (Some(explicit), _) => explicit.clone(),
            (None, LabelSource::Indexed(values)) => {
                values.get(index).cloned().unwrap_or(LabelValue::Null)
            }
            (None, LabelSource::Computed(f)) => {
                f(slice, self.total_weight).map_err(|source| DomainError::Label {
                    name: slice.data.name.clone(),
                    source,
                })?
            }
            (None, LabelSource::Default) => LabelValue::Text(slice.data.name.clone()),
        };
        Ok(value.into_text())
    }

    pub fn place(&self, slice: &Slice, index: usize) -> DomainResult<LabelDescriptor> {
        let (x, y) = if index == 0 {
            (0.0, 0.0)
        } else {
            slice.centroid()
        };
        let orientation = Orientation::of(slice);
        let text_anchor = self
            .style_text("textAnchor")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| orientation.text_anchor());
        let vertical_anchor = self
            .style_text("verticalAnchor")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| orientation.vertical_anchor());

        Ok(LabelDescriptor {
            text: self.text(slice, index)?,
            x: round_half_up(x),
            y: round_half_up(y),
            orientation,
            text_anchor,
            vertical_anchor,
            angle: self.style.get("angle").and_then(StyleValue::as_number),
            style: self.style.clone(),
        })
    }

    fn style_text(&self, key: &str) -> Option<String> {
        self.style.get(key).map(ToString::to_string)
    }
}
