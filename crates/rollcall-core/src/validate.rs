//! Primitive field validators used by outer surfaces before calling the
//! store. Loose on purpose: the store's own natural-key checks are the
//! real gate.

/// A plausible academic year: four digits, 1900–2099.
pub fn is_valid_year(year: &str) -> bool {
  year.len() == 4
    && year.parse::<u16>().is_ok_and(|y| (1900..=2099).contains(&y))
}

/// A name field: letters (Latin or Cyrillic) and hyphens, non-empty.
pub fn is_valid_name(name: &str) -> bool {
  !name.is_empty() && name.chars().all(|c| c.is_alphabetic() || c == '-')
}
