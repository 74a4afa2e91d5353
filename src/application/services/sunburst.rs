//! Sunburst layout service
//!
//! Runs the whole pipeline for one request: resolve configuration, weight
//! the hierarchy, partition, filter, style, place labels and assemble the
//! keyed output.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::application::options::{
    ChartOptions, ConfigResolver, EffectiveConfig, EventKeySpec, FallbackProps, Variant,
};
use crate::application::props::{
    ArcLayout, ArcParams, ChartProps, DataProps, EventKey, Offset, ParentProps, SliceProps,
    TooltipProps,
};
use crate::application::ApplicationResult;
use crate::domain::{
    format_number, retain_visible, HierarchyBuilder, LabelPlacer, OrdinalScale, PartitionLayout,
    Slice, StyleResolver,
};

/// Stateless layout service; safe to share between callers.
#[derive(Debug, Clone, Default)]
pub struct SunburstService {
    resolver: ConfigResolver,
}

impl SunburstService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service with custom fallback props.
    pub fn with_fallback(fallback: FallbackProps) -> Self {
        Self {
            resolver: ConfigResolver::new(fallback),
        }
    }

    pub fn resolve(&self, options: &ChartOptions) -> EffectiveConfig {
        self.resolver.resolve(options)
    }

    /// Resolve `options` and lay out the chart.
    pub fn base_props(&self, options: &ChartOptions) -> ApplicationResult<ChartProps> {
        let config = self.resolve(options);
        self.layout(&config)
    }

    /// Lay out the chart for an already resolved configuration.
    #[instrument(level = "debug", skip_all, fields(root = %config.data.name))]
    pub fn layout(&self, config: &EffectiveConfig) -> ApplicationResult<ChartProps> {
        let tree = HierarchyBuilder::new(config.sum_by)
            .with_sort(config.sort.clone())
            .with_max_depth(config.max_depth)
            .build(&config.data)?;

        let radius = config.radius();
        let partition = PartitionLayout::new(radius);
        let slices = retain_visible(partition.layout(&tree), config.min_radians);
        let total_weight = tree.total_weight();
        debug!(
            "{} visible slices, radius {}, total weight {}",
            slices.len(),
            radius,
            total_weight
        );

        let mut styles = StyleResolver::new(&config.style, OrdinalScale::new(&config.color_scale));
        let placer = LabelPlacer::new(&config.labels, &config.style.labels, total_weight);

        let mut entries = BTreeMap::new();
        for (index, slice) in slices.iter().enumerate() {
            let resolved = styles.resolve(slice, &tree);
            let labels = match config.variant {
                Variant::Full => Some(placer.place(slice, index)?),
                Variant::Minimal => None,
            };
            let key = event_key(&config.event_key, slice, index);
            let props = SliceProps {
                data: DataProps {
                    index,
                    slice: slice.clone(),
                    arc: ArcParams::from(slice),
                    fill: resolved.fill,
                    style: resolved.style,
                },
                labels,
            };
            if entries.insert(key.clone(), props).is_some() {
                debug!("event key {} used twice, keeping the later slice", key);
            }
        }

        let offset = Offset::centered(config.width, config.height, &config.padding, radius);
        let tooltip = match config.variant {
            Variant::Full => tooltip(config.active_node_index, &slices, offset),
            Variant::Minimal => None,
        };

        let parent = ParentProps {
            data: config.data.clone(),
            width: config.width,
            height: config.height,
            padding: config.padding,
            radius,
            offset,
            arc_layout: ArcLayout::new(radius, PartitionLayout::bands(tree.height())),
            total_weight,
            slices,
            style: config.style.parent.clone(),
            tooltip,
        };

        Ok(ChartProps {
            parent,
            slices: entries,
        })
    }
}

/// Node's own `eventKey`, else the configured derivation, else the index.
fn event_key(spec: &EventKeySpec, slice: &Slice, index: usize) -> EventKey {
    if let Some(own) = &slice.data.event_key {
        return EventKey::Named(own.clone());
    }
    let derived = match spec {
        EventKeySpec::Index => None,
        EventKeySpec::Field(field) if field == "name" => Some(slice.data.name.clone()),
        EventKeySpec::Field(field) => slice.data.extra.get(field).and_then(|value| match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }),
        EventKeySpec::Computed(f) => f(slice, index),
    };
    derived.map(EventKey::Named).unwrap_or(EventKey::Index(index))
}

/// Tooltip text `"<name>: <weight>"`; index 0 never activates it.
fn tooltip(active: Option<usize>, slices: &[Slice], offset: Offset) -> Option<TooltipProps> {
    let index = active.filter(|&i| i != 0)?;
    let slice = slices.get(index)?;
    Some(TooltipProps {
        active: true,
        text: format!("{}: {}", slice.data.name, format_number(slice.weight)),
        x: offset.x,
        y: offset.y,
    })
}
