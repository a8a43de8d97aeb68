//! Fixed keyword tables.
//!
//! Every table is immutable. Where order matters (first match wins) the table
//! is an ordered slice and must be read front to back.

use greenchoice_protocols::Category;
use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens dropped from normalized queries. Gender words are kept on purpose.
pub const QUERY_NOISE: &[&str] = &[
    "model", "with", "for", "pack", "combo", "set", "new", "latest", "assured",
];

/// Category words re-appended to a normalized query even past the token cap.
pub const MUST_KEEP: &[&str] = &[
    // apparel
    "top", "tops", "tshirt", "tee", "shirt", "dress", "kurti", "saree", "jeans", "hoodie",
    "sweatshirt", "jacket", "blazer",
    // accessories
    "watch", "watches", "belt", "strap", "band", "handbag", "bag",
    // electronics
    "phone", "mobile", "smartphone", "laptop", "earbuds", "headphones", "earphone", "earphones",
];

/// Groups of interchangeable words. Any member matches any other member.
pub const SYNONYM_GROUPS: &[&[&str]] = &[
    &["belt", "strap", "band"],
    &["hoodie", "sweatshirt"],
    &["phone", "mobile", "smartphone"],
    &["saree", "sari"],
    &["tshirt", "tee"],
];

/// Ordered category rules. Detection scans top to bottom.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Watch, &["watch", "watches", "smartwatch", "wristwatch"]),
    (
        Category::Electronics,
        &[
            "phone", "smartphone", "iphone", "android", "laptop", "notebook", "chromebook",
            "headphone", "earphone", "earbud", "headset", "smartwatch",
        ],
    ),
    (Category::Phone, &["phone", "smartphone", "iphone", "android"]),
    (Category::Laptop, &["laptop", "notebook", "chromebook"]),
    (Category::Headphones, &["headphone", "earphone", "earbud", "headset"]),
    (Category::Tv, &["television", "smart tv", "led tv"]),
    (Category::Refrigerator, &["fridge", "refrigerator"]),
    (Category::Ac, &["air conditioner", "ac"]),
    (Category::WashingMachine, &["washing machine", "washer"]),
    (
        Category::Shoe,
        &[
            "shoe", "shoes", "sneaker", "sneakers", "sports shoe", "slipper", "sandal", "sandals",
            "heels", "boot", "boots",
        ],
    ),
    (
        Category::Footwear,
        &[
            "shoe", "shoes", "sneaker", "sneakers", "sports shoe", "slipper", "sandal", "sandals",
            "heels", "boot", "boots",
        ],
    ),
    (
        Category::Clothing,
        &[
            "tshirt", "t-shirt", "tee", "shirt", "top", "tops", "kurti", "kurtis", "dress",
            "dresses", "jeans", "trouser", "trousers", "jacket", "hoodie", "sweater", "saree",
            "sari",
        ],
    ),
    (
        Category::ClothingTextiles,
        &[
            "tshirt", "t-shirt", "tee", "shirt", "top", "tops", "kurti", "kurtis", "dress",
            "dresses", "jeans", "trouser", "trousers", "jacket", "hoodie", "sweater", "saree",
            "sari",
        ],
    ),
    (
        Category::WomenEthnic,
        &[
            "saree", "sari", "lehenga", "ghagra", "chaniya", "salwar", "kameez", "anarkali",
            "dupatta", "kurti", "kurta set", "ethnic wear",
        ],
    ),
    (Category::Accessories, &["bag", "backpack", "handbag", "purse", "wallet"]),
    (Category::Bag, &["bag", "backpack", "handbag", "purse", "wallet"]),
    (
        Category::HomeKitchen,
        &[
            "towel", "bath towel", "bedsheet", "bed sheet", "duvet", "blanket", "bottle",
            "water bottle", "flask", "pan", "kadhai", "pressure cooker", "cookware",
        ],
    ),
    (
        Category::BeautyPersonalCare,
        &[
            "cream", "moisturizer", "serum", "lotion", "facewash", "face wash", "lipstick",
            "foundation", "eyeliner", "compact", "shampoo", "soap",
        ],
    ),
    (Category::Book, &["book", "novel", "paperback", "hardcover"]),
    (Category::Toy, &["toy", "doll", "lego", "puzzle", "game"]),
];

/// Signals that override every other rule and force `women_ethnic`.
pub const WOMEN_ETHNIC_PRIORITY: &[&str] =
    &["saree", "sari", "lehenga", "kurti", "anarkali", "salwar", "ethnic"];

/// A `women_ethnic` candidate must name one of these garments.
pub const WOMEN_ETHNIC_GARMENTS: &[&str] =
    &["saree", "sari", "kurti", "anarkali", "salwar", "lehenga"];

pub const FEMALE_WORDS: &[&str] =
    &["women", "womens", "woman", "lady", "ladies", "girl", "girls", "female"];

pub const MALE_WORDS: &[&str] = &["men", "mens", "man", "boy", "boys", "male"];

/// Gender signals looked for in candidate titles and URLs.
pub const FEMALE_SIGNALS: &[&str] =
    &["women", "womens", "ladies", "lady", "girl", "girls", "female"];

pub const MALE_SIGNALS: &[&str] = &["men", "mens", "male", "boy", "boys"];

/// Category-defining words for the relevance guard, in priority order.
pub const MUST_HAVE: &[&str] = &[
    // clothing tops
    "top", "tops", "tshirt", "tee", "shirt", "hoodie", "hoodies", "sweatshirt", "sweatshirts",
    "jacket", "jackets", "blazer", "coat",
    // ethnic
    "kurti", "kurtis", "kurta", "kurtas", "saree", "sari", "lehenga",
    // bottoms
    "jeans", "trouser", "trousers", "shorts", "skirt", "skirts", "palazzo", "leggings",
    // footwear
    "shoe", "shoes", "sneaker", "sneakers", "sandals", "heel", "heels", "flipflop", "flipflops",
    // accessories
    "watch", "watches", "bag", "bags", "belt", "belts", "wallet", "wallets",
    // electronics
    "phone", "mobile", "smartphone", "laptop", "earbuds", "headphones", "earphone", "earphones",
];

/// Pairwise exclusions: a base title containing any left word rejects
/// candidates containing any right word.
pub const CONFLICT_RULES: &[(&[&str], &[&str])] = &[
    (&["hoodie", "sweatshirt"], &["shirt"]),
    (&["kurti", "kurta"], &["saree", "lehenga"]),
    (&["shoe"], &["shirt"]),
];

/// Multi-word product phrases, checked before single type words.
pub static PHRASE_PRIORITY: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bkey\s*(holder|hanger)\b", "key holder"),
        (r"\bshoe\s*rack\b", "shoe rack"),
        (r"\bwall\s*clock\b", "wall clock"),
        (r"\bwater\s*bottle\b", "water bottle"),
        (r"\bphone\s*(cover|case)\b|\bback\s*cover\b", "phone case"),
        (r"\bbedsheet\b|\bbed\s*sheet\b", "bedsheet"),
        (r"\bpillow\s*cover\b", "pillow cover"),
    ]
    .into_iter()
    .filter_map(|(pattern, phrase)| Regex::new(pattern).ok().map(|re| (re, phrase)))
    .collect()
});

/// Product type words for smart queries, in priority order.
pub const TYPE_PRIORITY: &[&str] = &[
    // apparel
    "top", "tops", "kurti", "kurtis", "dress", "dresses", "saree", "sari", "lehenga", "tshirt",
    "tee", "shirt", "jeans", "trouser", "trousers",
    // accessories
    "handbag", "bag", "backpack", "wallet",
    // wearables and footwear
    "watch", "watches", "smartwatch", "shoe", "shoes", "sneaker", "sneakers", "sandal", "sandals",
    // electronics
    "phone", "mobile", "laptop", "headphones", "earbuds",
    // home
    "holder", "hanger", "rack", "clock", "bottle", "bedsheet", "pillow", "curtain", "lamp", "vase",
];

/// Words never used as extra smart-query signal.
pub const QUERY_STOP_WORDS: &[&str] = &[
    "for", "with", "pack", "combo", "set", "new", "latest", "assured", "solid", "printed",
    "regular", "fit", "casual", "formal", "fashion", "stylish", "women", "womens", "men", "mens",
    "girl", "girls", "boy", "boys", "premium", "original", "authentic", "inches", "inch", "cm",
    "mm", "pcs", "piece", "pieces", "design",
];

/// Marketing phrases removed before building the strict-site query.
pub const CLEAN_QUERY_STOP: &[&str] = &[
    "with dupatta", "for women", "for men", "new", "latest", "combo", "set", "offer",
    "collection", "fashion", "printed", "stylish", "trendy", "bottomwear",
];

/// The only words a strict-site query may contain.
pub const CLEAN_QUERY_KEEP: &[&str] = &[
    "kurti", "kurta", "dress", "gown", "lehenga", "saree", "shirt", "tshirt", "top", "jeans",
    "blouse", "dupatta",
];

/// Keywords describing `category`. Empty for `Unknown`.
pub fn category_keywords(category: Category) -> &'static [&'static str] {
    CATEGORY_RULES
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_category_has_keywords() {
        for category in Category::KNOWN {
            assert!(!category_keywords(category).is_empty(), "{category} has no keywords");
        }
    }

    #[test]
    fn test_unknown_has_no_keywords() {
        assert!(category_keywords(Category::Unknown).is_empty());
    }

    #[test]
    fn test_rules_follow_declaration_order() {
        let order: Vec<Category> = CATEGORY_RULES.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, Category::KNOWN.to_vec());
    }

    #[test]
    fn test_phrase_patterns_compile() {
        assert_eq!(PHRASE_PRIORITY.len(), 7);
    }

    #[test]
    fn test_conflict_bases_are_guard_words() {
        for (bases, _) in CONFLICT_RULES {
            for base in *bases {
                assert!(MUST_HAVE.contains(base));
            }
        }
    }
}
