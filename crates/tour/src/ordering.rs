use std::cmp::Ordering;

use catalog::School;
use foundation::{LatLng, SchoolId};

/// The ordered subset of a catalog that the route is drawn through.
///
/// Ordering contract:
/// - Only schools with an `order` are present.
/// - Sorted by `(order, name)`, names compared with [`compare_names`].
/// - Ties on both keys keep catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedSequence {
    schools: Vec<School>,
}

impl OrderedSequence {
    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&School> {
        self.schools.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &School> + '_ {
        self.schools.iter()
    }

    pub fn as_slice(&self) -> &[School] {
        &self.schools
    }

    /// Index of the first school carrying `order`.
    pub fn position_of_order(&self, order: u32) -> Option<usize> {
        self.schools.iter().position(|s| s.order == Some(order))
    }

    pub fn position_of_id(&self, id: &SchoolId) -> Option<usize> {
        self.schools.iter().position(|s| &s.id == id)
    }

    pub fn coordinates(&self) -> Vec<LatLng> {
        self.schools.iter().map(|s| s.position).collect()
    }
}

/// Builds the route order from a catalog. Never mutates `schools`.
pub fn ordered_sequence(schools: &[School]) -> OrderedSequence {
    let mut ordered: Vec<School> = schools.iter().filter(|s| s.is_ordered()).cloned().collect();
    // `sort_by` is stable, which the tie contract relies on.
    ordered.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| compare_names(&a.name, &b.name)));
    OrderedSequence { schools: ordered }
}

/// Name comparison following Bulgarian collation order.
///
/// Levels, each consulted only when the previous ties:
/// 1. Letters without accent or case. Non-letters sort first, then Cyrillic,
///    then Latin, then any other script.
/// 2. Accents: an unaccented Latin letter sorts before its accented forms.
/// 3. Case: lowercase before uppercase.
/// 4. Raw code points, so distinct names never compare equal.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (ka, kb) = (CollationKey::of(a), CollationKey::of(b));
    ka.primary
        .cmp(&kb.primary)
        .then_with(|| ka.secondary.cmp(&kb.secondary))
        .then_with(|| ka.tertiary.cmp(&kb.tertiary))
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Script {
    Neutral,
    Cyrillic,
    Latin,
    Other,
}

#[derive(Debug, Default)]
struct CollationKey {
    primary: Vec<(Script, char)>,
    secondary: Vec<u32>,
    tertiary: Vec<bool>,
}

impl CollationKey {
    fn of(name: &str) -> Self {
        let mut key = CollationKey::default();
        for c in name.chars() {
            key.tertiary.push(c.is_uppercase());
            let lower = c.to_lowercase();
            if is_cyrillic(c) {
                key.primary.extend(lower.map(|l| (Script::Cyrillic, l)));
                key.secondary.push(0);
            } else if c.is_ascii_alphabetic() {
                key.primary.extend(lower.map(|l| (Script::Latin, l)));
                key.secondary.push(0);
            } else if is_extended_latin(c) {
                let base = unidecode::unidecode_char(c);
                key.primary.extend(
                    base.chars()
                        .filter(char::is_ascii_alphabetic)
                        .map(|l| (Script::Latin, l.to_ascii_lowercase())),
                );
                key.secondary.extend(lower.map(u32::from));
            } else if c.is_alphabetic() {
                key.primary.extend(lower.map(|l| (Script::Other, l)));
                key.secondary.push(0);
            } else {
                key.primary.push((Script::Neutral, c));
                key.secondary.push(0);
            }
        }
        key
    }
}

fn is_cyrillic(c: char) -> bool {
    matches!(
        c,
        '\u{0400}'..='\u{052F}'
            | '\u{1C80}'..='\u{1C8F}'
            | '\u{2DE0}'..='\u{2DFF}'
            | '\u{A640}'..='\u{A69F}'
    )
}

fn is_extended_latin(c: char) -> bool {
    c.is_alphabetic() && matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
}
