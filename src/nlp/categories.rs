/// Label assigned when no category keyword matches.
pub const DEFAULT_CATEGORY: &str = "Miscellaneous";

/// Static category keyword table. The declaration order is significant:
/// ties in keyword-match counts resolve to the category listed first.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Politics",
        &[
            "government", "election", "president", "minister", "parliament",
            "law", "policy", "political", "vote", "senator", "congress",
        ],
    ),
    (
        "Technology",
        &[
            "tech", "technology", "software", "hardware", "internet",
            "digital", "app", "computer", "device", "robot", "AI",
        ],
    ),
    (
        "Health",
        &[
            "health", "medical", "medicine", "doctor", "disease", "virus",
            "hospital", "patient", "treatment", "vaccine", "pandemic",
        ],
    ),
    (
        "Business",
        &[
            "business", "economy", "market", "finance", "stock", "trade",
            "company", "investor", "economic", "bank", "money",
        ],
    ),
    (
        "Science",
        &[
            "science", "research", "scientist", "study", "discovery",
            "experiment", "space", "planet", "climate", "physics", "biology",
        ],
    ),
    (
        "Sports",
        &[
            "sport", "football", "soccer", "basketball", "tennis", "player",
            "team", "game", "match", "olympic", "championship",
        ],
    ),
];
