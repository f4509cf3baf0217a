//! Declaration flags.
//!
//! Each declaration kind has its own closed flag set, so an attribute can
//! never carry `ABSTRACT` and a node can never carry `NO_INIT`. Mutually
//! exclusive bits (the visibilities) are still representable: the validator
//! reports every conflicting pair rather than rejecting at construction.

use bitflags::bitflags;

/// Access level of a generated member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// The C++ access-specifier keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }

    /// Upper-case name used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Protected => "PROTECTED",
            Visibility::Private => "PRIVATE",
        }
    }
}

bitflags! {
    /// Flags on an attribute.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct AttrFlags: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        /// Suppress the generated `Get_`/`Set_` accessors.
        const NO_INLINES = 1 << 4;
        /// Initialised from default code, not from a constructor parameter.
        const NO_INIT = 1 << 5;

        const VISIBILITY = Self::PUBLIC.bits() | Self::PROTECTED.bits() | Self::PRIVATE.bits();
    }
}

bitflags! {
    /// Flags on a method.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MethodFlags: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        /// Pure virtual: signature only.
        const ABSTRACT = 1 << 4;
        /// Body lives in a hand-written translation unit.
        const EXTERNAL = 1 << 5;

        const VISIBILITY = Self::PUBLIC.bits() | Self::PROTECTED.bits() | Self::PRIVATE.bits();
    }
}

bitflags! {
    /// Flags on a node.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct NodeFlags: u8 {
        /// No instances: no enum tag, no `Factory`, pure virtual type accessors.
        const ABSTRACT = 1 << 0;
    }
}

/// Every pair of visibilities that may not be combined, in reporting order.
pub(crate) const VISIBILITY_PAIRS: [(Visibility, Visibility); 3] = [
    (Visibility::Public, Visibility::Protected),
    (Visibility::Public, Visibility::Private),
    (Visibility::Protected, Visibility::Private),
];

impl AttrFlags {
    fn bit(vis: Visibility) -> Self {
        match vis {
            Visibility::Public => Self::PUBLIC,
            Visibility::Protected => Self::PROTECTED,
            Visibility::Private => Self::PRIVATE,
        }
    }

    /// The access level used for emission.
    ///
    /// Attributes default to protected once validated; an unvalidated
    /// attribute with no bit set also reads as protected.
    pub fn visibility(self) -> Visibility {
        if self.contains(Self::PUBLIC) {
            Visibility::Public
        } else if self.contains(Self::PROTECTED) || !self.intersects(Self::VISIBILITY) {
            Visibility::Protected
        } else {
            Visibility::Private
        }
    }

    /// Pairs of visibility bits that are set together.
    pub fn visibility_conflicts(self) -> Vec<(Visibility, Visibility)> {
        VISIBILITY_PAIRS
            .iter()
            .copied()
            .filter(|&(a, b)| self.contains(Self::bit(a) | Self::bit(b)))
            .collect()
    }
}

impl MethodFlags {
    fn bit(vis: Visibility) -> Self {
        match vis {
            Visibility::Public => Self::PUBLIC,
            Visibility::Protected => Self::PROTECTED,
            Visibility::Private => Self::PRIVATE,
        }
    }

    /// The access level used for emission. Methods default to public.
    pub fn visibility(self) -> Visibility {
        if self.contains(Self::PRIVATE) {
            Visibility::Private
        } else if self.contains(Self::PROTECTED) {
            Visibility::Protected
        } else {
            Visibility::Public
        }
    }

    /// Pairs of visibility bits that are set together.
    pub fn visibility_conflicts(self) -> Vec<(Visibility, Visibility)> {
        VISIBILITY_PAIRS
            .iter()
            .copied()
            .filter(|&(a, b)| self.contains(Self::bit(a) | Self::bit(b)))
            .collect()
    }
}
