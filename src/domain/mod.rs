//! Domain layer: entities and layout logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod color;
pub mod entities;
pub mod error;
pub mod label;
pub mod partition;
pub mod style;
pub mod visibility;

pub use arena::{NodeData, WeightedNode, WeightedTree};
pub use builder::{Comparator, HierarchyBuilder, SortOrder, DEFAULT_MAX_DEPTH};
pub use color::{ColorScaleSpec, OrdinalScale, Palette};
pub use entities::*;
pub use error::{BoxError, DomainError, DomainResult};
pub use label::{
    LabelDescriptor, LabelFn, LabelPlacer, LabelSource, Orientation, TextAnchor, VerticalAnchor,
};
pub use partition::{outer_radius, PartitionLayout, Slice};
pub use style::{
    merge_layers, merge_props, style_props, ChartStyle, StyleLayer, StyleProps, StyleResolver,
    StyleResult, StyleValue,
};
pub use visibility::{retain_visible, DEFAULT_MIN_RADIANS};
