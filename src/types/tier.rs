use schemars::JsonSchema;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Spending category a scheduled slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Lodging,
    Food,
    Activity,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Lodging, Category::Food, Category::Activity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Lodging => "lodging",
            Category::Food => "food",
            Category::Activity => "activity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour shared by the three closed tier enumerations.
pub trait Tier: Copy + fmt::Debug + Sized + 'static {
    /// Category this tier prices
    const CATEGORY: Category;
    /// Every value, from cheapest to most expensive
    const ALL: [Self; 3];
    /// Value substituted for unrecognised labels
    const MID: Self;

    /// Canonical lowercase name
    fn as_str(&self) -> &'static str;

    /// Accepted spellings, lowercase. The first entry is the canonical name.
    fn labels(&self) -> &'static [&'static str];

    /// Exact (case-insensitive) label match
    fn from_label(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.labels().iter().any(|label| *label == needle))
    }

    /// Parse a label, falling back to the mid tier for anything unrecognised
    fn resolve(raw: &str) -> Self {
        Self::from_label(raw).unwrap_or_else(|| {
            warn!(
                target: "tripbudget::tiers",
                category = %Self::CATEGORY,
                value = raw,
                fallback = Self::MID.as_str(),
                "unknown tier value, using mid tier"
            );
            Self::MID
        })
    }
}

fn deserialize_tier<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Tier,
{
    let raw = String::deserialize(deserializer)?;
    if raw.trim().is_empty() {
        return Err(D::Error::custom(format!(
            "{} tier must not be empty",
            T::CATEGORY
        )));
    }
    Ok(T::resolve(&raw))
}

/// Lodging quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LodgingTier {
    Economy,
    Standard,
    Luxury,
}

impl Tier for LodgingTier {
    const CATEGORY: Category = Category::Lodging;
    const ALL: [Self; 3] = [Self::Economy, Self::Standard, Self::Luxury];
    const MID: Self = Self::Standard;

    fn as_str(&self) -> &'static str {
        self.labels()[0]
    }

    fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Economy => &["economy", "économique", "economique"],
            Self::Standard => &["standard"],
            Self::Luxury => &["luxury", "luxe"],
        }
    }
}

/// Food quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodTier {
    Basic,
    Varied,
    Gourmet,
}

impl Tier for FoodTier {
    const CATEGORY: Category = Category::Food;
    const ALL: [Self; 3] = [Self::Basic, Self::Varied, Self::Gourmet];
    const MID: Self = Self::Varied;

    fn as_str(&self) -> &'static str {
        self.labels()[0]
    }

    fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Basic => &["basic", "basique"],
            Self::Varied => &["varied", "variée", "variee"],
            Self::Gourmet => &["gourmet", "gastronomique"],
        }
    }
}

/// Activity intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityTier {
    Discovery,
    Cultural,
    Adventure,
}

impl Tier for ActivityTier {
    const CATEGORY: Category = Category::Activity;
    const ALL: [Self; 3] = [Self::Discovery, Self::Cultural, Self::Adventure];
    const MID: Self = Self::Cultural;

    fn as_str(&self) -> &'static str {
        self.labels()[0]
    }

    fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Discovery => &["discovery", "découverte", "decouverte"],
            Self::Cultural => &["cultural", "culturel"],
            Self::Adventure => &["adventure", "aventure"],
        }
    }
}

impl<'de> Deserialize<'de> for LodgingTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_tier(deserializer)
    }
}

impl<'de> Deserialize<'de> for FoodTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_tier(deserializer)
    }
}

impl<'de> Deserialize<'de> for ActivityTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_tier(deserializer)
    }
}

macro_rules! display_tier {
    ($($tier:ty),*) => {
        $(impl fmt::Display for $tier {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_tier!(LodgingTier, FoodTier, ActivityTier);

/// One tier per category, as chosen by the traveller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tiers {
    pub lodging: LodgingTier,
    pub food: FoodTier,
    pub activity: ActivityTier,
}

impl Tiers {
    pub fn new(lodging: LodgingTier, food: FoodTier, activity: ActivityTier) -> Self {
        Self {
            lodging,
            food,
            activity,
        }
    }

    /// All 27 combinations
    pub fn all() -> impl Iterator<Item = Tiers> {
        LodgingTier::ALL.into_iter().flat_map(|lodging| {
            FoodTier::ALL.into_iter().flat_map(move |food| {
                ActivityTier::ALL
                    .into_iter()
                    .map(move |activity| Tiers::new(lodging, food, activity))
            })
        })
    }

    /// Canonical label of the tier chosen for `category`
    pub fn label(&self, category: Category) -> &'static str {
        match category {
            Category::Lodging => self.lodging.as_str(),
            Category::Food => self.food.as_str(),
            Category::Activity => self.activity.as_str(),
        }
    }
}

impl Default for Tiers {
    fn default() -> Self {
        Self::new(LodgingTier::MID, FoodTier::MID, ActivityTier::MID)
    }
}
