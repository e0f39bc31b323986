//! Cache line record.

/// A single cache line: validity, dirty bit, tag, and the address it was filled from.
///
/// The full `address` is kept so an evicted line can be written back, or
/// handed to a victim cache, by its real address rather than just its tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// Line holds data.
    pub valid: bool,
    /// Line has been written since it was filled.
    pub dirty: bool,
    /// Tag of the resident block.
    pub tag: u64,
    /// Address of the access that filled this line.
    pub address: u64,
}

impl Block {
    /// An empty slot.
    pub const INVALID: Self = Self {
        valid: false,
        dirty: false,
        tag: 0,
        address: 0,
    };

    /// Creates a valid line for `tag`, filled by an access to `address`.
    #[inline]
    pub const fn filled(tag: u64, address: u64, dirty: bool) -> Self {
        Self {
            valid: true,
            dirty,
            tag,
            address,
        }
    }

    /// Lookup match: the line is valid and holds `tag`.
    ///
    /// Invalid lines never match, whatever their tag field says.
    #[inline]
    pub const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }
}
