use std::collections::HashSet;

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::{debug, error};

use crate::categories::{
    ReplacementCategory, DIRECT_GROUP_DESCRIPTION, DIRECT_GROUP_ID, DIRECT_GROUP_TITLE,
    REPLACEMENT_CATEGORIES,
};
use crate::types::{DishDetail, ReplacementGroup};

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

static BUNDLED: Lazy<Catalog> = Lazy::new(|| match Catalog::from_json(BUNDLED_CATALOG) {
    Ok(catalog) => catalog,
    Err(err) => {
        error!(error = %err, "bundled dish catalog is unreadable, serving an empty catalog");
        Catalog::default()
    }
});

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid dish catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory dish collection, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    dishes: Vec<DishDetail>,
}

impl Catalog {
    /// The catalog embedded in the binary, parsed on first use.
    pub fn bundled() -> &'static Catalog {
        &BUNDLED
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let dishes: Vec<DishDetail> = serde_json::from_str(raw)?;
        Ok(Self { dishes })
    }

    pub fn dishes(&self) -> &[DishDetail] {
        &self.dishes
    }

    pub fn dish_by_slug(&self, slug: &str) -> Option<&DishDetail> {
        self.dishes.iter().find(|dish| dish.slug == slug)
    }

    pub fn categories(&self) -> &'static [ReplacementCategory] {
        REPLACEMENT_CATEGORIES
    }

    /// Group plant-based substitutes for a free-text dish search.
    ///
    /// Categories are tried in order and a dish appears at most once, under
    /// the first category that claims it. When no category keyword matches,
    /// dishes whose name or `replaces` list contain the query form a single
    /// `direct` group.
    pub fn find_replacement_groups(&self, query: &str) -> Vec<ReplacementGroup> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let normalized = trimmed.to_lowercase();
        let tokens = tokenize(&normalized);

        let mut seen: HashSet<&str> = HashSet::new();
        let mut groups = Vec::new();

        for category in REPLACEMENT_CATEGORIES {
            let matched: Vec<&str> = category
                .keywords
                .iter()
                .copied()
                .filter(|keyword| keyword_matches(keyword, &normalized, &tokens))
                .collect();

            if matched.is_empty() {
                continue;
            }

            let dishes: Vec<DishDetail> = self
                .dishes
                .iter()
                .filter(|dish| {
                    dish.categories.iter().any(|id| id == category.id)
                        || dish.replaces.iter().any(|item| {
                            let item = item.to_lowercase();
                            matched.iter().any(|keyword| item.contains(keyword))
                        })
                })
                .filter(|dish| seen.insert(dish.slug.as_str()))
                .cloned()
                .collect();

            if dishes.is_empty() {
                continue;
            }

            groups.push(ReplacementGroup {
                id: category.id.to_string(),
                title: category.title.to_string(),
                keywords: matched.iter().map(|k| k.to_string()).collect(),
                description: category.description.to_string(),
                dishes,
            });
        }

        if !groups.is_empty() {
            debug!(query = trimmed, groups = groups.len(), "matched replacement categories");
            return groups;
        }

        let direct: Vec<DishDetail> = self
            .dishes
            .iter()
            .filter(|dish| {
                dish.name.to_lowercase().contains(&normalized)
                    || dish
                        .replaces
                        .iter()
                        .any(|item| item.to_lowercase().contains(&normalized))
            })
            .cloned()
            .collect();

        if direct.is_empty() {
            return Vec::new();
        }

        vec![ReplacementGroup {
            id: DIRECT_GROUP_ID.to_string(),
            title: DIRECT_GROUP_TITLE.to_string(),
            keywords: vec![trimmed.to_string()],
            description: DIRECT_GROUP_DESCRIPTION.to_string(),
            dishes: direct,
        }]
    }
}

/// Distinct runs of `[a-z0-9]` in an already lower-cased query.
fn tokenize(normalized: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    for token in normalized
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|token| !token.is_empty())
    {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

// Prefix matching both ways lets "chick" and "chickens" hit "chicken".
fn keyword_matches(keyword: &str, normalized: &str, tokens: &[&str]) -> bool {
    normalized.contains(keyword)
        || tokens
            .iter()
            .any(|token| keyword.starts_with(token) || token.starts_with(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slugs(group: &ReplacementGroup) -> Vec<&str> {
        group.dishes.iter().map(|dish| dish.slug.as_str()).collect()
    }

    #[test]
    fn bundled_catalog_loads_every_dish() {
        let catalog = Catalog::bundled();
        assert_eq!(catalog.dishes().len(), 13);

        let curry = catalog.dish_by_slug("tempeh-coastal-curry").unwrap();
        assert_eq!(curry.name, "Tempeh Coastal Curry");
        assert_eq!(curry.rating, Some(4.8));
        assert_eq!(curry.price_swap.as_deref(), Some("₹150"));
        assert!(catalog.dish_by_slug("unknown-dish").is_none());
    }

    #[test]
    fn tokenize_splits_and_deduplicates() {
        assert_eq!(tokenize("butter chicken, chicken-65!"), vec!["butter", "chicken", "65"]);
        assert!(tokenize("--").is_empty());
    }

    #[test]
    fn keyword_prefixes_match_both_directions() {
        assert!(keyword_matches("chicken", "chick", &["chick"]));
        assert!(keyword_matches("egg", "eggs", &["eggs"]));
        assert!(!keyword_matches("fish", "paneer", &["paneer"]));
    }

    #[test]
    fn empty_query_yields_nothing() {
        assert!(Catalog::bundled().find_replacement_groups("   ").is_empty());
    }

    #[test]
    fn chicken_query_returns_chicken_group() {
        let groups = Catalog::bundled().find_replacement_groups("Butter Chicken");
        assert_eq!(groups.len(), 1);

        let group = &groups[0];
        assert_eq!(group.id, "chicken");
        assert_eq!(group.title, "Chicken & Poultry Swaps");
        assert_eq!(group.keywords, vec!["chicken"]);
        assert!(slugs(group).contains(&"tofu-butter-masala"));
        assert!(slugs(group).contains(&"paneer-tikka"));
        assert!(!slugs(group).contains(&"banana-blossom-fry"));
    }

    #[test]
    fn dishes_are_reported_once_across_groups() {
        let groups = Catalog::bundled().find_replacement_groups("chicken or mutton");
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["chicken", "mutton"]);

        // Everything else in the mutton category was already claimed by chicken.
        assert_eq!(slugs(&groups[1]), vec!["tempeh-coastal-curry"]);

        let mut all: Vec<&str> = groups.iter().flat_map(slugs).collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn plural_and_partial_words_match_keywords() {
        let groups = Catalog::bundled().find_replacement_groups("Scrambled eggs");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "egg");
        assert_eq!(groups[0].keywords, vec!["egg", "scramble"]);
        assert_eq!(
            slugs(&groups[0]),
            vec!["mushroom-biryani", "paneer-bhurji", "soya-chunk-biryani"]
        );
    }

    #[test]
    fn name_search_falls_back_to_direct_group() {
        let groups = Catalog::bundled().find_replacement_groups("  Paneer ");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "direct");
        assert_eq!(groups[0].title, "Plant-based matches");
        assert_eq!(groups[0].keywords, vec!["Paneer"]);
        assert_eq!(slugs(&groups[0]), vec!["paneer-bhurji", "paneer-tikka"]);
    }

    #[test]
    fn replaces_entries_feed_the_fallback() {
        let groups = Catalog::bundled().find_replacement_groups("keema");
        assert_eq!(groups[0].id, "direct");
        assert_eq!(
            slugs(&groups[0]),
            vec!["mushroom-biryani", "soya-chunk-biryani"]
        );
    }

    #[test]
    fn unmatched_query_yields_nothing() {
        assert!(Catalog::bundled().find_replacement_groups("pizza").is_empty());
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        assert!(Catalog::from_json("{\"not\": \"a list\"}").is_err());
    }
}
