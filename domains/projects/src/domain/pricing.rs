//! Itemized pricing
//!
//! [`PricingInput`] is the loose shape stored on a project and accepted from
//! callers: nullable flags, free-text style and format, captions and effects
//! inside `extra_fields`. It is parsed once into a [`PricingRequest`], and the
//! [`PriceCalculator`] prices that request against one [`PriceBook`].
//!
//! Pricing never fails. Anything unrecognized prices as zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::price_book::{PriceBook, CLIENT_BOOK_V1, EDITOR_BOOK_V1};
use crate::domain::style::{StyleSelection, VideoFormat};

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A quantity as callers send it: a number, or a number in a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Quantity {
    /// Integer value, truncating fractions; unparseable text is 0
    pub fn as_count(&self) -> i64 {
        match self {
            Quantity::Int(n) => *n,
            Quantity::Float(f) => f.trunc() as i64,
            Quantity::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                    .unwrap_or(0)
            }
        }
    }
}

/// One requested effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectEntry {
    Detailed {
        id: String,
        #[serde(default)]
        quantity: Option<Quantity>,
    },
    Id(String),
}

impl EffectEntry {
    pub fn id(&self) -> &str {
        match self {
            EffectEntry::Detailed { id, .. } | EffectEntry::Id(id) => id.trim(),
        }
    }

    /// Effective quantity, never below 1
    pub fn quantity(&self) -> i64 {
        match self {
            EffectEntry::Detailed {
                quantity: Some(q), ..
            } => q.as_count().max(1),
            _ => 1,
        }
    }
}

/// Per-property count, bare or nested as `{ "quantity": n }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerPropertyCount {
    Nested { quantity: Quantity },
    Count(Quantity),
}

impl PerPropertyCount {
    pub fn value(&self) -> i64 {
        match self {
            PerPropertyCount::Nested { quantity } | PerPropertyCount::Count(quantity) => {
                quantity.as_count()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub captions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub effects: Vec<EffectEntry>,
}

/// Pricing-relevant project attributes, as received
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub with_agent: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub rush: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub per_property: bool,
    #[serde(default)]
    pub per_property_count: Option<PerPropertyCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extra_fields: ExtraFields,
}

/// An effect after collapsing duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedEffect {
    pub id: String,
    pub quantity: i64,
}

/// Parsed pricing attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRequest {
    pub style: StyleSelection,
    pub format: Option<VideoFormat>,
    pub with_agent: bool,
    pub rush: bool,
    /// Distinct captions, in the order first given
    pub captions: Vec<String>,
    /// Effects keyed by trimmed id, first occurrence wins
    pub effects: Vec<RequestedEffect>,
    /// Set only when the per-property charge applies
    pub per_property_count: Option<i64>,
}

impl PricingRequest {
    pub fn parse(input: &PricingInput) -> Self {
        let mut captions: Vec<String> = Vec::new();
        for caption in &input.extra_fields.captions {
            if !captions.contains(caption) {
                captions.push(caption.clone());
            }
        }

        let mut effects: Vec<RequestedEffect> = Vec::new();
        for entry in &input.extra_fields.effects {
            let id = entry.id();
            if id.is_empty() || effects.iter().any(|e| e.id == id) {
                continue;
            }
            effects.push(RequestedEffect {
                id: id.to_string(),
                quantity: entry.quantity(),
            });
        }

        let per_property_count = if input.per_property {
            input
                .per_property_count
                .as_ref()
                .map(PerPropertyCount::value)
                .filter(|count| *count > 0)
        } else {
            None
        };

        Self {
            style: StyleSelection::parse(&input.style),
            format: input.format.as_deref().and_then(|f| f.parse().ok()),
            with_agent: input.with_agent,
            rush: input.rush,
            captions,
            effects,
            per_property_count,
        }
    }

    fn base_label(&self) -> String {
        let style = match self.style.style {
            Some(style) => style.label(),
            None if self.style.normalized.is_empty() => "unknown style".to_string(),
            None => self.style.normalized.clone(),
        };
        match self.format {
            Some(format) => format!("{} ({})", style, format),
            None => style,
        }
    }
}

impl From<&PricingInput> for PricingRequest {
    fn from(input: &PricingInput) -> Self {
        Self::parse(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Base,
    Agent,
    Rush,
    Caption,
    Effect,
    PerProperty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLine {
    pub kind: LineKind,
    pub description: String,
    pub amount: Decimal,
}

/// Itemized price from one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub book_version: String,
    pub lines: Vec<PriceLine>,
    pub total: Decimal,
}

impl Quote {
    pub fn descriptions(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.description.clone()).collect()
    }
}

/// Prices requests against a single price book
#[derive(Debug, Clone, Copy)]
pub struct PriceCalculator {
    book: &'static PriceBook,
}

impl PriceCalculator {
    pub fn new(book: &'static PriceBook) -> Self {
        Self { book }
    }

    /// Editor compensation
    pub fn editor() -> Self {
        Self::new(&EDITOR_BOOK_V1)
    }

    /// Client billing
    pub fn client() -> Self {
        Self::new(&CLIENT_BOOK_V1)
    }

    pub fn book(&self) -> &'static PriceBook {
        self.book
    }

    pub fn quote(&self, request: &PricingRequest) -> Quote {
        let book = self.book;
        let style = &request.style;
        let mut lines = Vec::new();

        let base = book.base_price(style.style, request.format);
        lines.push(PriceLine {
            kind: LineKind::Base,
            description: format!("Base {} - ${}", request.base_label(), base),
            amount: base,
        });

        if request.with_agent {
            let amount = Decimal::from(book.agent);
            lines.push(PriceLine {
                kind: LineKind::Agent,
                description: format!("With Agent (+${})", amount),
                amount,
            });
        }

        if request.rush {
            let amount = book.rush_price(style);
            lines.push(PriceLine {
                kind: LineKind::Rush,
                description: format!("Rush Order (+${})", amount),
                amount,
            });
        }

        for caption in &request.captions {
            let Some(rate) = book.caption(caption) else {
                continue;
            };
            if !rate.gate.allows(style) {
                continue;
            }
            let amount = Decimal::from(rate.price);
            lines.push(PriceLine {
                kind: LineKind::Caption,
                description: format!("{} (+${})", rate.name, amount),
                amount,
            });
        }

        if style.has_premium_addons() {
            for effect in &request.effects {
                let Some(rate) = book.effect(&effect.id) else {
                    continue;
                };
                let amount = line_amount(rate.unit_price, effect.quantity);
                lines.push(PriceLine {
                    kind: LineKind::Effect,
                    description: format!("{} (x{}) (+${})", rate.name, effect.quantity, amount),
                    amount,
                });
            }
        }

        if let Some(count) = request.per_property_count {
            let amount = line_amount(book.per_property, count.max(1));
            lines.push(PriceLine {
                kind: LineKind::PerProperty,
                description: format!("Per Property Line x{} (+${})", count, amount),
                amount,
            });
        }

        let total = lines
            .iter()
            .fold(Decimal::ZERO, |total, line| total.saturating_add(line.amount));
        let quote = Quote {
            book_version: book.version.to_string(),
            lines,
            total,
        };
        log_quote(request, &quote);
        quote
    }

    /// Total only
    pub fn compute(&self, request: &PricingRequest) -> Decimal {
        self.quote(request).total
    }
}

/// `unit * quantity`, saturating instead of overflowing on absurd quantities
fn line_amount(unit: i64, quantity: i64) -> Decimal {
    Decimal::from(unit).saturating_mul(Decimal::from(quantity))
}

#[mutants::skip] // Logging only
fn log_quote(request: &PricingRequest, quote: &Quote) {
    tracing::debug!(
        book = %quote.book_version,
        style = %request.style.normalized,
        format = ?request.format,
        with_agent = request.with_agent,
        rush = request.rush,
        lines = quote.lines.len(),
        total = %quote.total,
        "Computed price"
    );
}
