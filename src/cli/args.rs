//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::options::{ChartOptions, EventKeySpec, Variant};
use crate::domain::{ColorScaleSpec, LabelSource, LabelValue, PaddingSpec, SortOrder, SumBy};

/// Sunburst layout and styling engine: radial partition, colors and labels for hierarchical data
#[derive(Parser, Debug)]
#[command(name = "sunburst")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file (default: ./.sunburst.toml when present)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lay out a hierarchy and print the chart descriptors as JSON
    Layout {
        #[command(flatten)]
        chart: ChartArgs,

        /// Write JSON to FILE instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show visible slices as a table
    Slices {
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Show the weighted hierarchy as a tree
    Tree {
        /// Hierarchy file (JSON or TOML); demo tree when omitted
        #[arg(value_hint = ValueHint::FilePath)]
        data: Option<PathBuf>,

        /// How leaves are weighted
        #[arg(long, value_enum)]
        sum_by: Option<SumByArg>,

        /// Sort siblings heaviest first
        #[arg(long)]
        sort: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print config template
    Template,
}

/// Leaf weighting mode.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SumByArg {
    Size,
    Count,
}

impl From<SumByArg> for SumBy {
    fn from(arg: SumByArg) -> Self {
        match arg {
            SumByArg::Size => SumBy::Size,
            SumByArg::Count => SumBy::Count,
        }
    }
}

/// Flags shared by the chart commands. Unset flags fall through to the
/// options file, settings, theme and built-in defaults.
#[derive(Args, Debug, Default)]
pub struct ChartArgs {
    /// Hierarchy file (JSON or TOML); demo tree when omitted
    #[arg(value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Chart options document (JSON or TOML, camelCase keys)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub options: Option<PathBuf>,

    /// Theme file keyed by chart role
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub theme: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<f64>,

    #[arg(long)]
    pub height: Option<f64>,

    /// Uniform padding on every side
    #[arg(long)]
    pub padding: Option<f64>,

    /// Palette name or comma separated colors
    #[arg(long)]
    pub color_scale: Option<String>,

    /// Drop slices whose angular span is not above this
    #[arg(long)]
    pub min_radians: Option<f64>,

    #[arg(long, value_enum)]
    pub sum_by: Option<SumByArg>,

    /// Sort siblings heaviest first
    #[arg(long)]
    pub sort: bool,

    /// Geometry and style only: no labels, no tooltip
    #[arg(long)]
    pub minimal: bool,

    /// Visible index of the node to show a tooltip for
    #[arg(long)]
    pub active: Option<usize>,

    /// Label slices with their share of the total
    #[arg(long, conflicts_with = "labels")]
    pub percent: bool,

    /// Label texts by visible index; an empty entry means no label
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// Node field used as output key
    #[arg(long)]
    pub event_key: Option<String>,
}

impl ChartArgs {
    /// Options carried by explicit flags only. `--percent` is applied by
    /// the command layer, which owns the label function.
    pub fn to_options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            padding: self.padding.map(PaddingSpec::Uniform),
            color_scale: self
                .color_scale
                .as_deref()
                .map(|s| s.parse::<ColorScaleSpec>().unwrap_or_default()),
            min_radians: self.min_radians,
            sort_data: self.sort.then_some(SortOrder::Descending),
            sum_by: self.sum_by.map(SumBy::from),
            labels: self.labels.as_ref().map(|texts| {
                LabelSource::Indexed(
                    texts
                        .iter()
                        .map(|t| match t.as_str() {
                            "" => LabelValue::Null,
                            text => LabelValue::from(text),
                        })
                        .collect(),
                )
            }),
            event_key: self.event_key.clone().map(EventKeySpec::Field),
            active_node_index: self.active,
            variant: self.minimal.then_some(Variant::Minimal),
            ..ChartOptions::default()
        }
    }
}
