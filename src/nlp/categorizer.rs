use std::collections::HashSet;

use super::categories::{CATEGORIES, DEFAULT_CATEGORY};
use super::normalizer::Normalizer;

struct Category {
    label: &'static str,
    keywords: &'static [&'static str],
    stems: HashSet<String>,
}

/// Assigns exactly one category label to an article.
///
/// Keyword stems are computed once at construction, in the declared table
/// order. Categorization is total: every input maps to a label from the
/// category table or to the default label, never to an error.
pub struct Categorizer {
    normalizer: Normalizer,
    categories: Vec<Category>,
}

impl Categorizer {
    pub fn new(normalizer: Normalizer) -> Self {
        let categories = CATEGORIES
            .iter()
            .map(|&(label, keywords)| Category {
                label,
                keywords,
                stems: keywords.iter().map(|kw| normalizer.stem_word(kw)).collect(),
            })
            .collect();

        Self {
            normalizer,
            categories,
        }
    }

    /// Returns the category with the most keyword matches across the
    /// concatenated title and description. Ties resolve to the category
    /// declared first in the table; zero matches yield the default label.
    pub fn categorize(&self, title: &str, description: &str) -> &'static str {
        let text = format!("{title} {description}");

        if self.normalizer.is_degraded() {
            return self.categorize_substring(&text);
        }

        let tokens = self.normalizer.normalize(&text);
        let mut counts = vec![0usize; self.categories.len()];
        for token in &tokens {
            for (count, category) in counts.iter_mut().zip(&self.categories) {
                if category.stems.contains(token.as_str()) {
                    *count += 1;
                }
            }
        }

        let max_count = counts.iter().copied().max().unwrap_or(0);
        if max_count == 0 {
            return DEFAULT_CATEGORY;
        }

        self.categories
            .iter()
            .zip(&counts)
            .find(|(_, &count)| count == max_count)
            .map(|(category, _)| category.label)
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Degraded-mode algorithm: raw case-insensitive substring search,
    /// first category in declared order with at least one hit.
    fn categorize_substring(&self, text: &str) -> &'static str {
        let haystack = text.to_lowercase();
        for category in &self.categories {
            if category
                .keywords
                .iter()
                .any(|kw| haystack.contains(&kw.to_lowercase()))
            {
                return category.label;
            }
        }
        DEFAULT_CATEGORY
    }
}
