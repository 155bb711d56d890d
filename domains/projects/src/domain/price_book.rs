//! Versioned price books
//!
//! Editor compensation and client billing are priced by the same line-item
//! rules against two different books. Keep them apart: `editor_price` comes
//! from [`EDITOR_BOOK_V1`], invoice breakdowns from [`CLIENT_BOOK_V1`].

use rust_decimal::Decimal;

use crate::domain::style::{ProjectStyle, StyleSelection, VideoFormat};

pub const CAPTION_WHILE_TALKING: &str = "Captions while the agent is talking";
pub const CAPTION_BEHIND_AGENT: &str = "3D Text behind the Agent Talking";
pub const CAPTION_TRACKED_GROUND: &str = "3D Text tracked on the ground etc.";

pub const EFFECT_PAINTING: &str = "Painting Transition";
pub const EFFECT_EARTH_ZOOM: &str = "Earth Zoom Transition";
pub const EFFECT_DAY_TO_NIGHT: &str = "Day to Night AI";
pub const EFFECT_VIRTUAL_STAGING: &str = "Virtual Staging AI";

/// Which styles a caption option is sold for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionGate {
    PremiumOrLuxury,
    LuxuryOnly,
}

impl CaptionGate {
    pub fn allows(&self, style: &StyleSelection) -> bool {
        match self {
            CaptionGate::PremiumOrLuxury => style.has_premium_addons(),
            CaptionGate::LuxuryOnly => style.is_luxury(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionRate {
    pub name: &'static str,
    pub price: i64,
    pub gate: CaptionGate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectRate {
    pub name: &'static str,
    pub unit_price: i64,
}

/// A complete set of unit prices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBook {
    pub version: &'static str,
    /// Rows follow [`ProjectStyle::index`], columns [`VideoFormat::index`]
    pub base: [[i64; 3]; 8],
    pub agent: i64,
    pub rush_premium: i64,
    pub rush_standard: i64,
    pub captions: &'static [CaptionRate],
    pub effects: &'static [EffectRate],
    pub per_property: i64,
}

impl PriceBook {
    /// Base price for a style/format pair; unknown combinations cost nothing
    pub fn base_price(&self, style: Option<ProjectStyle>, format: Option<VideoFormat>) -> Decimal {
        match (style, format) {
            (Some(style), Some(format)) => Decimal::from(self.base[style.index()][format.index()]),
            _ => Decimal::ZERO,
        }
    }

    pub fn rush_price(&self, style: &StyleSelection) -> Decimal {
        if style.has_premium_addons() {
            Decimal::from(self.rush_premium)
        } else {
            Decimal::from(self.rush_standard)
        }
    }

    pub fn caption(&self, name: &str) -> Option<&CaptionRate> {
        self.captions.iter().find(|c| c.name == name)
    }

    pub fn effect(&self, id: &str) -> Option<&EffectRate> {
        self.effects.iter().find(|e| e.name == id)
    }
}

pub static EDITOR_BOOK_V1: PriceBook = PriceBook {
    version: "editor-v1",
    base: [
        [500, 350, 850],
        [350, 300, 650],
        [1000, 700, 1700],
        [500, 400, 900],
        [1500, 1200, 2700],
        [800, 600, 1400],
        [1800, 1500, 3300],
        [1000, 800, 1800],
    ],
    agent: 100,
    rush_premium: 500,
    rush_standard: 200,
    captions: &[
        CaptionRate {
            name: CAPTION_WHILE_TALKING,
            price: 200,
            gate: CaptionGate::PremiumOrLuxury,
        },
        CaptionRate {
            name: CAPTION_BEHIND_AGENT,
            price: 350,
            gate: CaptionGate::PremiumOrLuxury,
        },
        CaptionRate {
            name: CAPTION_TRACKED_GROUND,
            price: 400,
            gate: CaptionGate::LuxuryOnly,
        },
    ],
    effects: &[
        EffectRate {
            name: EFFECT_PAINTING,
            unit_price: 150,
        },
        EffectRate {
            name: EFFECT_EARTH_ZOOM,
            unit_price: 150,
        },
        EffectRate {
            name: EFFECT_DAY_TO_NIGHT,
            unit_price: 150,
        },
        EffectRate {
            name: EFFECT_VIRTUAL_STAGING,
            unit_price: 300,
        },
    ],
    per_property: 100,
};

pub static CLIENT_BOOK_V1: PriceBook = PriceBook {
    version: "client-v1",
    base: [
        [40, 25, 65],
        [25, 20, 45],
        [60, 35, 95],
        [35, 30, 65],
        [80, 50, 130],
        [45, 40, 85],
        [100, 70, 170],
        [60, 50, 110],
    ],
    agent: 10,
    rush_premium: 20,
    rush_standard: 10,
    captions: &[
        CaptionRate {
            name: CAPTION_WHILE_TALKING,
            price: 10,
            gate: CaptionGate::PremiumOrLuxury,
        },
        CaptionRate {
            name: CAPTION_BEHIND_AGENT,
            price: 10,
            gate: CaptionGate::PremiumOrLuxury,
        },
        CaptionRate {
            name: CAPTION_TRACKED_GROUND,
            price: 15,
            gate: CaptionGate::LuxuryOnly,
        },
    ],
    effects: &[
        EffectRate {
            name: EFFECT_PAINTING,
            unit_price: 10,
        },
        EffectRate {
            name: EFFECT_EARTH_ZOOM,
            unit_price: 15,
        },
        EffectRate {
            name: EFFECT_DAY_TO_NIGHT,
            unit_price: 15,
        },
        EffectRate {
            name: EFFECT_VIRTUAL_STAGING,
            unit_price: 20,
        },
    ],
    per_property: 5,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::style::{StyleKind, Tier};

    #[test]
    fn test_editor_base_table() {
        let premium_drone = ProjectStyle::new(Tier::Premium, StyleKind::DroneOnly);
        assert_eq!(
            EDITOR_BOOK_V1.base_price(Some(premium_drone), Some(VideoFormat::Vertical)),
            Decimal::from(600)
        );
        assert_eq!(
            EDITOR_BOOK_V1.base_price(Some(premium_drone), None),
            Decimal::ZERO
        );
        assert_eq!(
            EDITOR_BOOK_V1.base_price(None, Some(VideoFormat::Horizontal)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_client_book_is_smaller_than_editor_book() {
        for style in ProjectStyle::ALL {
            for format in VideoFormat::ALL {
                assert!(
                    CLIENT_BOOK_V1.base_price(Some(style), Some(format))
                        < EDITOR_BOOK_V1.base_price(Some(style), Some(format))
                );
            }
        }
    }

    #[test]
    fn test_caption_gates() {
        let premium = StyleSelection::parse("premium drone only");
        let luxury = StyleSelection::parse("luxury video");
        let basic = StyleSelection::parse("basic video");

        let tracked = EDITOR_BOOK_V1.caption(CAPTION_TRACKED_GROUND).unwrap();
        assert!(!tracked.gate.allows(&premium));
        assert!(tracked.gate.allows(&luxury));

        let talking = EDITOR_BOOK_V1.caption(CAPTION_WHILE_TALKING).unwrap();
        assert!(talking.gate.allows(&premium));
        assert!(!talking.gate.allows(&basic));
    }

    #[test]
    fn test_lookups_are_exact() {
        assert!(EDITOR_BOOK_V1.caption("captions while the agent is talking").is_none());
        assert!(EDITOR_BOOK_V1.effect("Virtual Staging AI").is_some());
        assert!(EDITOR_BOOK_V1.effect("Sky Replacement").is_none());
    }
}
