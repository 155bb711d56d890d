//! Project styles and output formats
//!
//! Styles arrive as free text ("Premium Drone Only", "premium_video") and are
//! parsed here, at the boundary, into closed types. Text that does not name a
//! known style still keeps the tier found in it by substring, so tier-gated
//! add-ons behave the same for "premium something" as for "premium video".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use reelflow_common::Error;

/// Lowercase, trim, treat `_` as a space and collapse runs of whitespace
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Style tier, gating which add-ons apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Basic,
    Deluxe,
    Premium,
    Luxury,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Basic, Tier::Deluxe, Tier::Premium, Tier::Luxury];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Deluxe => "deluxe",
            Tier::Premium => "premium",
            Tier::Luxury => "luxury",
        }
    }

    /// Highest tier named anywhere in a normalized style string
    pub fn detect(normalized: &str) -> Option<Tier> {
        Tier::ALL
            .iter()
            .rev()
            .copied()
            .find(|tier| normalized.contains(tier.as_str()))
    }

    /// Premium and luxury styles unlock captions and effects
    pub fn has_premium_addons(&self) -> bool {
        matches!(self, Tier::Premium | Tier::Luxury)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of footage the style covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKind {
    Video,
    DroneOnly,
}

impl StyleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleKind::Video => "video",
            StyleKind::DroneOnly => "drone only",
        }
    }
}

/// One of the eight priced styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectStyle {
    pub tier: Tier,
    pub kind: StyleKind,
}

impl ProjectStyle {
    pub const ALL: [ProjectStyle; 8] = [
        ProjectStyle::new(Tier::Basic, StyleKind::Video),
        ProjectStyle::new(Tier::Basic, StyleKind::DroneOnly),
        ProjectStyle::new(Tier::Deluxe, StyleKind::Video),
        ProjectStyle::new(Tier::Deluxe, StyleKind::DroneOnly),
        ProjectStyle::new(Tier::Premium, StyleKind::Video),
        ProjectStyle::new(Tier::Premium, StyleKind::DroneOnly),
        ProjectStyle::new(Tier::Luxury, StyleKind::Video),
        ProjectStyle::new(Tier::Luxury, StyleKind::DroneOnly),
    ];

    pub const fn new(tier: Tier, kind: StyleKind) -> Self {
        Self { tier, kind }
    }

    /// Row of this style in a price table
    pub fn index(&self) -> usize {
        let tier = match self.tier {
            Tier::Basic => 0,
            Tier::Deluxe => 1,
            Tier::Premium => 2,
            Tier::Luxury => 3,
        };
        let kind = match self.kind {
            StyleKind::Video => 0,
            StyleKind::DroneOnly => 1,
        };
        tier * 2 + kind
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.tier, self.kind.as_str())
    }
}

impl fmt::Display for ProjectStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProjectStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        ProjectStyle::ALL
            .iter()
            .copied()
            .find(|style| style.label() == normalized)
            .ok_or_else(|| Error::Validation(format!("Unknown style: {}", s.trim())))
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoFormat {
    Horizontal,
    Vertical,
    HorizontalAndVerticalPackage,
}

impl VideoFormat {
    pub const ALL: [VideoFormat; 3] = [
        VideoFormat::Horizontal,
        VideoFormat::Vertical,
        VideoFormat::HorizontalAndVerticalPackage,
    ];

    /// Column of this format in a price table
    pub fn index(&self) -> usize {
        match self {
            VideoFormat::Horizontal => 0,
            VideoFormat::Vertical => 1,
            VideoFormat::HorizontalAndVerticalPackage => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoFormat::Horizontal => "horizontal",
            VideoFormat::Vertical => "vertical",
            VideoFormat::HorizontalAndVerticalPackage => "horizontal and vertical package",
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for VideoFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        VideoFormat::ALL
            .iter()
            .copied()
            .find(|format| format.label() == normalized)
            .ok_or_else(|| Error::Validation(format!("Unknown format: {}", s.trim())))
    }
}

/// A style as entered, with whatever could be recognized in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSelection {
    pub normalized: String,
    pub style: Option<ProjectStyle>,
    pub tier: Option<Tier>,
}

impl StyleSelection {
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize(raw);
        let style = normalized.parse::<ProjectStyle>().ok();
        let tier = style.map(|s| s.tier).or_else(|| Tier::detect(&normalized));
        Self {
            normalized,
            style,
            tier,
        }
    }

    /// Premium-or-luxury gating, by substring
    pub fn has_premium_addons(&self) -> bool {
        self.tier.map(|t| t.has_premium_addons()).unwrap_or(false)
    }

    /// Luxury-only gating, by substring
    pub fn is_luxury(&self) -> bool {
        self.normalized.contains(Tier::Luxury.as_str())
    }
}
