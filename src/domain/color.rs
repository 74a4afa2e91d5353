//! Named palettes and the ordinal color scale

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Built-in named palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Grayscale,
    Qualitative,
    Heatmap,
    Warm,
    Cool,
    Red,
    Green,
    Blue,
}

impl Palette {
    pub const ALL: [Palette; 8] = [
        Palette::Grayscale,
        Palette::Qualitative,
        Palette::Heatmap,
        Palette::Warm,
        Palette::Cool,
        Palette::Red,
        Palette::Green,
        Palette::Blue,
    ];

    pub fn colors(self) -> &'static [&'static str] {
        match self {
            Palette::Grayscale => &["#cccccc", "#969696", "#636363", "#252525"],
            Palette::Qualitative => &[
                "#334D5C", "#45B29D", "#EFC94C", "#E27A3F", "#DF5A49", "#4F7DA1", "#55DBC1",
                "#EFDA97", "#E2A37F", "#DF948A",
            ],
            Palette::Heatmap => &["#428517", "#77D200", "#D6D305", "#EC8E19", "#C92B05"],
            Palette::Warm => &["#940031", "#C43343", "#DC5429", "#FF821D", "#FFAF55"],
            Palette::Cool => &["#2746B9", "#0B69D4", "#2794DB", "#31BB76", "#60E83B"],
            Palette::Red => &["#FCAE91", "#FB6A4A", "#DE2D26", "#A50F15", "#750B0E"],
            Palette::Green => &["#354722", "#466631", "#649146", "#8AB25C", "#A9C97E"],
            Palette::Blue => &["#002C61", "#004B8F", "#006BC9", "#3795E5", "#65B4F4"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Palette::Grayscale => "grayscale",
            Palette::Qualitative => "qualitative",
            Palette::Heatmap => "heatmap",
            Palette::Warm => "warm",
            Palette::Cool => "cool",
            Palette::Red => "red",
            Palette::Green => "green",
            Palette::Blue => "blue",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configured color scale: explicit colors or a palette name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorScaleSpec {
    Colors(Vec<String>),
    Named(String),
}

impl Default for ColorScaleSpec {
    fn default() -> Self {
        ColorScaleSpec::Named(Palette::Blue.name().to_string())
    }
}

impl ColorScaleSpec {
    /// Concrete color range. Unknown palette names and empty lists resolve
    /// to the grayscale palette.
    pub fn range(&self) -> Vec<String> {
        let colors = match self {
            ColorScaleSpec::Colors(colors) if !colors.is_empty() => return colors.clone(),
            ColorScaleSpec::Colors(_) => {
                debug!("empty color list, using grayscale");
                Palette::Grayscale.colors()
            }
            ColorScaleSpec::Named(name) => Palette::from_name(name)
                .unwrap_or_else(|| {
                    debug!("unknown palette {name:?}, using grayscale");
                    Palette::Grayscale
                })
                .colors(),
        };
        colors.iter().map(|c| c.to_string()).collect()
    }
}

/// Parses a palette name, or a comma separated color list.
impl FromStr for ColorScaleSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(',') {
            Ok(ColorScaleSpec::Colors(
                s.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect(),
            ))
        } else {
            Ok(ColorScaleSpec::Named(s.trim().to_string()))
        }
    }
}

/// Ordinal mapping from category keys to colors.
///
/// Keys get consecutive range positions in the order they are first
/// requested; the range repeats once exhausted.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    range: Vec<String>,
    domain: HashMap<String, usize>,
}

impl OrdinalScale {
    pub fn new(spec: &ColorScaleSpec) -> Self {
        Self {
            range: spec.range(),
            domain: HashMap::new(),
        }
    }

    pub fn color(&mut self, key: &str) -> &str {
        let next = self.domain.len();
        let position = match self.domain.get(key) {
            Some(&position) => position,
            None => {
                self.domain.insert(key.to_string(), next);
                next
            }
        };
        &self.range[position % self.range.len()]
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }
}
