mod categories;
mod categorizer;
mod normalizer;
mod stopwords;

pub use categorizer::Categorizer;
pub use normalizer::Normalizer;
