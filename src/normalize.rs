// 🧹 Title Normalizer - Canonical form used for every comparison

/// Lower-case, trim, and collapse each whitespace run to a single space.
///
/// Total and pure: `normalize_title(normalize_title(x)) == normalize_title(x)`.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());

    for word in lowered.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }

    normalized
}
