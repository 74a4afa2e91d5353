//! Application layer: configuration resolution, output assembly and services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod options;
pub mod props;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{IoResultExt, ParseResultExt};
pub use options::{
    ChartOptions, ConfigResolver, EffectiveConfig, EventKeyFn, EventKeySpec, FallbackProps,
    Theme, ThemeRole, Variant, ROLE,
};
pub use props::{
    ArcLayout, ArcParams, ChartProps, DataProps, EventKey, Offset, ParentProps, SliceProps,
    TooltipProps,
};
