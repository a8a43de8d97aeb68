//! Product category and gender tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse product category.
///
/// The set is closed. Several tags are aliases of each other (`shoe` and
/// `footwear`, `clothing` and `clothing_textiles`) because the remote
/// classifier and the local keyword table name the same kinds differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Watch,
    Electronics,
    Phone,
    Laptop,
    Headphones,
    Tv,
    Refrigerator,
    Ac,
    WashingMachine,
    Shoe,
    Footwear,
    Clothing,
    ClothingTextiles,
    WomenEthnic,
    Accessories,
    Bag,
    HomeKitchen,
    BeautyPersonalCare,
    Book,
    Toy,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Category {
    /// Every known category, in keyword-table declaration order.
    pub const KNOWN: [Category; 20] = [
        Category::Watch,
        Category::Electronics,
        Category::Phone,
        Category::Laptop,
        Category::Headphones,
        Category::Tv,
        Category::Refrigerator,
        Category::Ac,
        Category::WashingMachine,
        Category::Shoe,
        Category::Footwear,
        Category::Clothing,
        Category::ClothingTextiles,
        Category::WomenEthnic,
        Category::Accessories,
        Category::Bag,
        Category::HomeKitchen,
        Category::BeautyPersonalCare,
        Category::Book,
        Category::Toy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Watch => "watch",
            Category::Electronics => "electronics",
            Category::Phone => "phone",
            Category::Laptop => "laptop",
            Category::Headphones => "headphones",
            Category::Tv => "tv",
            Category::Refrigerator => "refrigerator",
            Category::Ac => "ac",
            Category::WashingMachine => "washing_machine",
            Category::Shoe => "shoe",
            Category::Footwear => "footwear",
            Category::Clothing => "clothing",
            Category::ClothingTextiles => "clothing_textiles",
            Category::WomenEthnic => "women_ethnic",
            Category::Accessories => "accessories",
            Category::Bag => "bag",
            Category::HomeKitchen => "home_kitchen",
            Category::BeautyPersonalCare => "beauty_personal_care",
            Category::Book => "book",
            Category::Toy => "toy",
            Category::Unknown => "unknown",
        }
    }

    /// Parse a tag. Unrecognized tags (e.g. `generic_other`) map to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        Self::KNOWN
            .iter()
            .copied()
            .find(|c| c.as_str() == tag)
            .unwrap_or(Category::Unknown)
    }

    pub fn is_known(&self) -> bool {
        *self != Category::Unknown
    }

    /// Categories where listings are routinely split by gender.
    pub fn is_apparel(&self) -> bool {
        matches!(
            self,
            Category::Clothing
                | Category::ClothingTextiles
                | Category::WomenEthnic
                | Category::Footwear
                | Category::Shoe
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target gender of a product. `Unisex` never constrains filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    #[default]
    #[serde(other)]
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Unisex => "unisex",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "female" | "women" | "woman" => Gender::Female,
            "male" | "men" | "man" => Gender::Male,
            _ => Gender::Unisex,
        }
    }

    /// Search token used to keep apparel results on the right side.
    pub fn query_token(&self) -> Option<&'static str> {
        match self {
            Gender::Female => Some("women"),
            Gender::Male => Some("men"),
            Gender::Unisex => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub gender: Gender,
}

impl Classification {
    pub fn new(category: Category, gender: Gender) -> Self {
        Self { category, gender }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}
