use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product categories known to the remote store. The wire spelling
/// (including `jewelery`) is the store's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "electronics")]
    Electronics,
    #[serde(rename = "jewelery")]
    Jewelery,
    #[serde(rename = "men's clothing")]
    MensClothing,
    #[serde(rename = "women's clothing")]
    WomensClothing,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Electronics,
        Category::Jewelery,
        Category::MensClothing,
        Category::WomensClothing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Jewelery => "jewelery",
            Category::MensClothing => "men's clothing",
            Category::WomensClothing => "women's clothing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

/// Listing selection: every record, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => c.fmt(f),
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

impl Rating {
    pub const MAX_RATE: f64 = 5.0;

    /// Pins `rate` into `[0, 5]`; a NaN rate becomes 0.
    pub fn clamped(self) -> Self {
        let rate = if self.rate.is_nan() {
            0.0
        } else {
            self.rate.clamp(0.0, Self::MAX_RATE)
        };
        Rating { rate, ..self }
    }

    pub fn stars(&self) -> StarBreakdown {
        let rate = self.clamped().rate;
        let full = rate.floor() as u8;
        let half = full < 5 && rate.fract() >= 0.5;
        StarBreakdown {
            full,
            half,
            empty: 5 - full - u8::from(half),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarBreakdown {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

/// Body of a create request. The remote store assigns the id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub image: String,
    pub rating: Rating,
}

/// What the remote store echoes back for a create. Neither the id nor the
/// rating can be relied on.
#[derive(Debug, Deserialize, Clone)]
pub struct CreatedProduct {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub rating: Option<Rating>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub items: Vec<Product>,
    pub total: usize,
    pub display_count: usize,
    pub has_more: bool,
    pub category: CategoryFilter,
    pub search: String,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub stars: StarBreakdown,
}

impl From<Product> for ProductDetail {
    fn from(product: Product) -> Self {
        let stars = product.rating.stars();
        ProductDetail { product, stars }
    }
}
