use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;

/// How an item is offered to the viewer.
///
/// On the wire this is the `pricingOption` field: an integer code
/// (0 = paid, 1 = free, 2 = view only). The upper-case names are accepted
/// as well so hand-written fixtures stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingKind {
    Paid,
    Free,
    ViewOnly,
}

impl PricingKind {
    fn code(self) -> u8 {
        match self {
            PricingKind::Paid => 0,
            PricingKind::Free => 1,
            PricingKind::ViewOnly => 2,
        }
    }

    fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(PricingKind::Paid),
            1 => Some(PricingKind::Free),
            2 => Some(PricingKind::ViewOnly),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "PAID" => Some(PricingKind::Paid),
            "FREE" => Some(PricingKind::Free),
            "VIEW_ONLY" => Some(PricingKind::ViewOnly),
            _ => None,
        }
    }
}

impl Serialize for PricingKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for PricingKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => PricingKind::from_code(code)
                .ok_or_else(|| D::Error::custom(format!("unknown pricing option {}", code))),
            Raw::Name(name) => PricingKind::from_name(&name)
                .ok_or_else(|| D::Error::custom(format!("unknown pricing option '{}'", name))),
        }
    }
}

/// A single catalog entry as returned by the remote endpoint.
///
/// Items are immutable once fetched. The collection is owned by
/// [`ItemStore`](super::ItemStore); everything else borrows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub creator: String,
    pub title: String,
    #[serde(rename = "pricingOption")]
    pub pricing: PricingKind,
    #[serde(rename = "imagePath", default)]
    pub image_ref: String,
    #[serde(default)]
    pub price: f64,
}

impl Item {
    /// Label shown in place of the price.
    ///
    /// Only paid items show a number. Free and view-only items always show
    /// their literal label, whatever `price` the endpoint sent.
    pub fn price_label(&self, currency_symbol: &str) -> Cow<'static, str> {
        match self.pricing {
            PricingKind::Paid => Cow::Owned(format!("{}{:.2}", currency_symbol, self.price)),
            PricingKind::Free => Cow::Borrowed("FREE"),
            PricingKind::ViewOnly => Cow::Borrowed("View Only"),
        }
    }
}
