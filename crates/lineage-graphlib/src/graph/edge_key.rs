//! Edge keys.
//!
//! Edges are addressed by `v -> w` plus an optional `name`, so two people can be joined by more
//! than one kind of edge (e.g. a `parent` edge and a `spouse` edge).

/// Owned key stored in the edge index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(v: impl Into<String>, w: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: name.map(str::to_string),
        }
    }
}

/// Borrowed form of [`EdgeKey`] for lookups without allocating.
///
/// Its derived `Hash` feeds the same fields in the same order as `EdgeKey`'s, and `&str` hashes
/// like `String`, so both land in the same bucket.
#[derive(Clone, Copy, Hash)]
pub(super) struct KeyRef<'a> {
    pub v: &'a str,
    pub w: &'a str,
    pub name: Option<&'a str>,
}

impl hashbrown::Equivalent<EdgeKey> for KeyRef<'_> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        self.v == key.v && self.w == key.w && self.name == key.name.as_deref()
    }
}
