// String id interning: maps opaque log identifiers to dense u32 ids.
//
// Ids are assigned in natural order (numeric ids ascending by value, then
// everything else lexicographically), so "lowest id wins a tie" means the
// same thing for interned ids as for the raw identifiers, and it does not
// depend on the order lines appear in the log.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Bidirectional mapping between raw identifiers and dense ids.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    names: Vec<String>,
    ids: HashMap<String, u32>,
}

impl Interner {
    /// Build an interner from every identifier that will ever be looked up.
    ///
    /// Duplicates are collapsed; ids follow [`natural_cmp`] order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort_by(|a, b| natural_cmp(a, b));
        names.dedup();

        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i as u32))
            .collect();

        Self { names, ids }
    }

    /// Dense id for a raw identifier, if it was interned.
    pub fn id(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// Raw identifier for a dense id.
    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Raw identifier for display; falls back to `#<id>` for ids this
    /// interner never issued.
    pub fn display(&self, id: u32) -> String {
        self.name(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{id}"))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Natural identifier order: unsigned integers by value first, then the rest
/// lexicographically. Equal values with different spellings ("7", "007")
/// fall back to string order so the ordering stays total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
