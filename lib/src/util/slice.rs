pub trait IsSubset<T> {
    fn is_subset(&self, other: &[T]) -> bool;
}

impl<T: PartialEq> IsSubset<T> for &[T] {
    fn is_subset(&self, other: &[T]) -> bool {
        self.iter().all(|x| other.contains(x))
    }
}

/// Truncate a string to at most `max_chars` characters, respecting char boundaries.
/// Returns the (possibly shortened) string and whether anything was cut off.
pub fn truncate_chars(s: &str, max_chars: usize) -> (&str, bool) {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => (&s[..idx], true),
        None => (s, false),
    }
}
