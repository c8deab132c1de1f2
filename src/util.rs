/// Order-insensitive comparison used for the set-like collections of the model.
pub fn vecs_eq_without_order<T: PartialEq>(first: &[T], second: &[T]) -> bool {
    if first.len() != second.len() {
        return false;
    }

    for element in first {
        if !second.contains(element) {
            return false;
        }
    }

    for element in second {
        if !first.contains(element) {
            return false;
        }
    }

    true
}

/// Removes duplicates while keeping the position of the first appearance.
pub fn dedup_keep_first<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut result: Vec<T> = Vec::new();
    for item in items {
        if !result.contains(&item) {
            result.push(item);
        }
    }
    result
}
