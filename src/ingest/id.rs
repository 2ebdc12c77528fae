/// Derives the stable article identifier from its canonical URL and title.
///
/// The same (url, title) pair always hashes to the same digest across
/// process restarts; the whole dedup scheme rests on this.
pub fn article_id(url: &str, title: &str) -> String {
    format!("{:x}", md5::compute(format!("{url}_{title}")))
}
