//! List trimming to a maximum participant count.

/// Keep the first `max_size` elements, in order. Shorter lists pass through.
pub fn trim<T>(mut list: Vec<T>, max_size: usize) -> Vec<T> {
    list.truncate(max_size);
    list
}

/// Borrowing variant of [`trim`].
pub fn trim_slice<T>(list: &[T], max_size: usize) -> &[T] {
    &list[..list.len().min(max_size)]
}
