use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplacementCategory {
    pub id: &'static str,
    pub title: &'static str,
    pub keywords: &'static [&'static str],
    pub description: &'static str,
}

/// Searched in this order; a dish is reported under the first category that claims it.
pub const REPLACEMENT_CATEGORIES: &[ReplacementCategory] = &[
    ReplacementCategory {
        id: "chicken",
        title: "Chicken & Poultry Swaps",
        keywords: &["chicken", "poultry", "drumstick", "chops"],
        description: "Tender, high-protein alternatives that keep the spice balance intact.",
    },
    ReplacementCategory {
        id: "seafood",
        title: "Seafood Swaps",
        keywords: &["fish", "prawn", "shrimp", "seafood"],
        description: "Ocean-inspired textures using coastal-friendly produce.",
    },
    ReplacementCategory {
        id: "egg",
        title: "Egg Swaps",
        keywords: &["egg", "omelette", "scramble"],
        description: "Protein-rich replacements that stay fluffy and satisfying.",
    },
    ReplacementCategory {
        id: "mutton",
        title: "Mutton & Red Meat Swaps",
        keywords: &["mutton", "lamb", "goat", "beef"],
        description: "Slow-cooked comfort foods reimagined with plants.",
    },
];

pub const DIRECT_GROUP_ID: &str = "direct";
pub const DIRECT_GROUP_TITLE: &str = "Plant-based matches";
pub const DIRECT_GROUP_DESCRIPTION: &str = "Closest dishes we could find for your search.";
