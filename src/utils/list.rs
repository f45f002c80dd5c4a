//! List-style value handling
//!
//! Values may carry several elements separated by [`LIST_DELIMITER`]. A
//! backslash escapes the delimiter (and itself).

/// Delimiter used for list-style values
pub const LIST_DELIMITER: char = ',';

/// Split a raw value into trimmed list elements.
///
/// An empty (or all-whitespace) value is an empty list.
pub fn split_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }

    let mut elements = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) if next == LIST_DELIMITER || next == '\\' => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            c if c == LIST_DELIMITER => {
                elements.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    elements.push(current.trim().to_string());

    elements
}
