//! Chart options and their resolution into one effective configuration
//!
//! Precedence (lowest to highest):
//! 1. Fallback props (compiled defaults)
//! 2. Theme role entry (`theme.sunburst`, without its `style`)
//! 3. Caller options
//!
//! Styles are layered separately: theme style < caller style (or the
//! fallback style when the caller sets none).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{
    merge_layers, outer_radius, style_props, ChartStyle, ColorScaleSpec, LabelSource, Padding,
    PaddingSpec, Slice, SortOrder, SumBy, TreeNode, DEFAULT_MAX_DEPTH, DEFAULT_MIN_RADIANS,
};

/// Theme role consulted by the resolver.
pub const ROLE: &str = "sunburst";

/// Caller function deriving an event key from a slice and its visible index.
pub type EventKeyFn = Arc<dyn Fn(&Slice, usize) -> Option<String> + Send + Sync>;

/// How output entries are keyed when a node has no explicit `eventKey`.
#[derive(Clone, Default, Deserialize)]
#[serde(from = "RawEventKey")]
pub enum EventKeySpec {
    /// Position in the visible sequence
    #[default]
    Index,
    /// Value of a node field (`name` or any extra field)
    Field(String),
    Computed(EventKeyFn),
}

impl EventKeySpec {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Slice, usize) -> Option<String> + Send + Sync + 'static,
    {
        EventKeySpec::Computed(Arc::new(f))
    }
}

/// Integers name a field by position, like strings name it by key.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEventKey {
    Field(String),
    Position(u64),
}

impl From<RawEventKey> for EventKeySpec {
    fn from(raw: RawEventKey) -> Self {
        match raw {
            RawEventKey::Field(field) => EventKeySpec::Field(field),
            RawEventKey::Position(n) => EventKeySpec::Field(n.to_string()),
        }
    }
}

impl fmt::Debug for EventKeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKeySpec::Index => write!(f, "Index"),
            EventKeySpec::Field(field) => f.debug_tuple("Field").field(field).finish(),
            EventKeySpec::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

/// Output flavour of the assembler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Label descriptors and active-node tooltip
    #[default]
    Full,
    /// Geometry and style only; siblings sorted heaviest first unless told otherwise
    Minimal,
}

/// Options supplied by the caller. Unset fields fall through to the theme
/// and then to the fallback props.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub data: Option<TreeNode>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub padding: Option<PaddingSpec>,
    pub color_scale: Option<ColorScaleSpec>,
    pub min_radians: Option<f64>,
    pub sort_data: Option<SortOrder>,
    pub sum_by: Option<SumBy>,
    pub style: Option<ChartStyle>,
    pub labels: Option<LabelSource>,
    pub theme: Option<Theme>,
    pub event_key: Option<EventKeySpec>,
    pub active_node_index: Option<usize>,
    pub variant: Option<Variant>,
    pub max_depth: Option<usize>,
}

impl ChartOptions {
    pub fn with_data(mut self, data: TreeNode) -> Self {
        self.data = Some(data);
        self
    }

    /// Field-wise overlay: values set in `higher` win.
    pub fn overlay(self, higher: ChartOptions) -> ChartOptions {
        ChartOptions {
            data: higher.data.or(self.data),
            width: higher.width.or(self.width),
            height: higher.height.or(self.height),
            padding: higher.padding.or(self.padding),
            color_scale: higher.color_scale.or(self.color_scale),
            min_radians: higher.min_radians.or(self.min_radians),
            sort_data: higher.sort_data.or(self.sort_data),
            sum_by: higher.sum_by.or(self.sum_by),
            style: higher.style.or(self.style),
            labels: higher.labels.or(self.labels),
            theme: higher.theme.or(self.theme),
            event_key: higher.event_key.or(self.event_key),
            active_node_index: higher.active_node_index.or(self.active_node_index),
            variant: higher.variant.or(self.variant),
            max_depth: higher.max_depth.or(self.max_depth),
        }
    }
}

/// Theme object, scoped by chart role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    pub roles: BTreeMap<String, ThemeRole>,
}

impl Theme {
    pub fn role(&self, role: &str) -> Option<&ThemeRole> {
        self.roles.get(role)
    }

    pub fn with_role(mut self, role: impl Into<String>, entry: ThemeRole) -> Self {
        self.roles.insert(role.into(), entry);
        self
    }
}

/// Theme entry for one role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeRole {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<PaddingSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<ColorScaleSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_radians: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum_by: Option<SumBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_data: Option<bool>,
    /// Lowest style layer; never merged as a plain option
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ChartStyle>,
}

/// Static defaults, the bottom configuration layer.
#[derive(Debug, Clone)]
pub struct FallbackProps {
    pub data: TreeNode,
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub color_scale: ColorScaleSpec,
    pub min_radians: f64,
    pub sum_by: SumBy,
    pub style: ChartStyle,
    pub max_depth: usize,
}

impl Default for FallbackProps {
    fn default() -> Self {
        Self {
            data: TreeNode::sample(),
            width: 400.0,
            height: 400.0,
            padding: Padding::uniform(30.0),
            color_scale: ColorScaleSpec::default(),
            min_radians: DEFAULT_MIN_RADIANS,
            sum_by: SumBy::Size,
            style: ChartStyle {
                data: style_props([("cursor", "pointer"), ("stroke", "white")]),
                ..ChartStyle::default()
            },
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Fully merged configuration for one layout pass.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub data: TreeNode,
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub color_scale: ColorScaleSpec,
    pub min_radians: f64,
    pub sort: SortOrder,
    pub sum_by: SumBy,
    pub style: ChartStyle,
    pub labels: LabelSource,
    pub event_key: EventKeySpec,
    pub active_node_index: Option<usize>,
    pub variant: Variant,
    pub max_depth: usize,
}

impl EffectiveConfig {
    pub fn radius(&self) -> f64 {
        outer_radius(self.width, self.height, &self.padding)
    }
}

/// Merges caller options, theme role and fallback props.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    fallback: FallbackProps,
}

impl ConfigResolver {
    pub fn new(fallback: FallbackProps) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> &FallbackProps {
        &self.fallback
    }

    #[instrument(level = "debug", skip_all)]
    pub fn resolve(&self, options: &ChartOptions) -> EffectiveConfig {
        let empty = ThemeRole::default();
        let theme = options
            .theme
            .as_ref()
            .and_then(|t| t.role(ROLE))
            .unwrap_or(&empty);
        let fallback = &self.fallback;

        let variant = options.variant.unwrap_or_default();
        let sort = match (&options.sort_data, theme.sort_data) {
            (Some(sort), _) => sort.clone(),
            (None, Some(sort)) => SortOrder::from(sort),
            (None, None) if variant == Variant::Minimal => SortOrder::Descending,
            (None, None) => SortOrder::Input,
        };

        let caller_style = options.style.as_ref().unwrap_or(&fallback.style);
        let style = match &theme.style {
            Some(theme_style) => merge_layers([theme_style, caller_style]),
            None => merge_layers([caller_style]),
        };

        let config = EffectiveConfig {
            data: options
                .data
                .clone()
                .unwrap_or_else(|| fallback.data.clone()),
            width: options.width.or(theme.width).unwrap_or(fallback.width),
            height: options.height.or(theme.height).unwrap_or(fallback.height),
            padding: options
                .padding
                .or(theme.padding)
                .map(Padding::from)
                .unwrap_or(fallback.padding),
            color_scale: options
                .color_scale
                .clone()
                .or_else(|| theme.color_scale.clone())
                .unwrap_or_else(|| fallback.color_scale.clone()),
            min_radians: options
                .min_radians
                .or(theme.min_radians)
                .unwrap_or(fallback.min_radians),
            sort,
            sum_by: options.sum_by.or(theme.sum_by).unwrap_or(fallback.sum_by),
            style,
            labels: options.labels.clone().unwrap_or_default(),
            event_key: options.event_key.clone().unwrap_or_default(),
            active_node_index: options.active_node_index,
            variant,
            max_depth: options.max_depth.unwrap_or(fallback.max_depth),
        };
        debug!(
            "resolved config: {}x{}, radius {}, sum_by {}, sort {:?}, variant {:?}",
            config.width,
            config.height,
            config.radius(),
            config.sum_by,
            config.sort,
            config.variant
        );
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StyleValue;

    fn theme(entry: ThemeRole) -> Theme {
        Theme::default().with_role(ROLE, entry)
    }

    #[test]
    fn given_no_options_when_resolving_then_fallback_props() {
        let config = ConfigResolver::default().resolve(&ChartOptions::default());

        assert_eq!(config.width, 400.0);
        assert_eq!(config.height, 400.0);
        assert_eq!(config.padding, Padding::uniform(30.0));
        assert_eq!(config.radius(), 170.0);
        assert_eq!(config.min_radians, 0.001);
        assert_eq!(config.color_scale, ColorScaleSpec::Named("blue".into()));
        assert_eq!(config.data.name, "A");
        assert_eq!(
            config.style.data.get("stroke"),
            Some(&StyleValue::from("white"))
        );
    }

    #[test]
    fn given_theme_and_caller_when_resolving_then_caller_wins_and_theme_fills_gaps() {
        let options = ChartOptions {
            width: Some(600.0),
            theme: Some(theme(ThemeRole {
                width: Some(500.0),
                height: Some(300.0),
                ..ThemeRole::default()
            })),
            ..ChartOptions::default()
        };

        let config = ConfigResolver::default().resolve(&options);

        assert_eq!(config.width, 600.0);
        assert_eq!(config.height, 300.0);
    }

    #[test]
    fn given_theme_for_other_role_when_resolving_then_ignored() {
        let options = ChartOptions {
            theme: Some(Theme::default().with_role(
                "pie",
                ThemeRole {
                    width: Some(1.0),
                    ..ThemeRole::default()
                },
            )),
            ..ChartOptions::default()
        };

        assert_eq!(ConfigResolver::default().resolve(&options).width, 400.0);
    }

    #[test]
    fn given_theme_style_when_resolving_then_lowest_style_layer() {
        let options = ChartOptions {
            style: Some(ChartStyle {
                data: style_props([("stroke", "red")]),
                ..ChartStyle::default()
            }),
            theme: Some(theme(ThemeRole {
                style: Some(ChartStyle {
                    data: style_props([("stroke", "black"), ("strokeWidth", "2")]),
                    labels: style_props([("fontSize", "10")]),
                    ..ChartStyle::default()
                }),
                ..ThemeRole::default()
            })),
            ..ChartOptions::default()
        };

        let config = ConfigResolver::default().resolve(&options);

        assert_eq!(config.style.data.get("stroke"), Some(&StyleValue::from("red")));
        assert_eq!(
            config.style.data.get("strokeWidth"),
            Some(&StyleValue::from("2"))
        );
        assert_eq!(
            config.style.labels.get("fontSize"),
            Some(&StyleValue::from("10"))
        );
        // Caller style replaces the fallback style entirely
        assert!(config.style.data.get("cursor").is_none());
    }

    #[test]
    fn given_minimal_variant_without_sort_when_resolving_then_descending() {
        let options = ChartOptions {
            variant: Some(Variant::Minimal),
            ..ChartOptions::default()
        };
        let config = ConfigResolver::default().resolve(&options);
        assert!(matches!(config.sort, SortOrder::Descending));

        let options = ChartOptions {
            variant: Some(Variant::Minimal),
            sort_data: Some(SortOrder::Input),
            ..ChartOptions::default()
        };
        let config = ConfigResolver::default().resolve(&options);
        assert!(matches!(config.sort, SortOrder::Input));
    }

    #[test]
    fn given_json_options_when_deserializing_then_camel_case_surface() {
        let json = r##"{
            "width": 300,
            "padding": {"top": 10},
            "colorScale": ["#111", "#222"],
            "minRadians": 0.1,
            "sortData": true,
            "sumBy": "count",
            "labels": ["a", null, 3],
            "eventKey": "id",
            "theme": {"sunburst": {"height": 250}}
        }"##;

        let options: ChartOptions = serde_json::from_str(json).unwrap();
        let config = ConfigResolver::default().resolve(&options);

        assert_eq!(config.width, 300.0);
        assert_eq!(config.height, 250.0);
        assert_eq!(config.padding.top, 10.0);
        assert_eq!(config.padding.left, 0.0);
        assert_eq!(config.sum_by, SumBy::Count);
        assert!(matches!(config.sort, SortOrder::Descending));
        assert!(matches!(config.labels, LabelSource::Indexed(ref v) if v.len() == 3));
        assert!(matches!(config.event_key, EventKeySpec::Field(ref f) if f == "id"));
    }

    #[test]
    fn given_integer_event_key_when_deserializing_then_field_by_position() {
        let options: ChartOptions = serde_json::from_str(r#"{"eventKey": 2}"#).unwrap();
        assert!(matches!(options.event_key, Some(EventKeySpec::Field(ref f)) if f == "2"));
    }

    #[test]
    fn given_overlay_when_merging_options_then_higher_wins_per_field() {
        let base = ChartOptions {
            width: Some(100.0),
            height: Some(100.0),
            ..ChartOptions::default()
        };
        let higher = ChartOptions {
            width: Some(200.0),
            ..ChartOptions::default()
        };

        let merged = base.overlay(higher);

        assert_eq!(merged.width, Some(200.0));
        assert_eq!(merged.height, Some(100.0));
    }
}
