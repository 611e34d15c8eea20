//! Stale override detection.

use crate::semantic::{MemberSymbol, SemanticFacade};

/// How an override relates to the member it overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// The declaration does not override anything.
    NotOverride,
    /// Bound to its base member, with matching type and accessibility.
    UpToDate,
    /// The override no longer binds, e.g. the base member's parameters changed
    /// or it was renamed away.
    BrokenLink,
    /// Bound, but the base member's type or accessibility moved on.
    Changed {
        type_changed: bool,
        accessibility_changed: bool,
    },
}

impl Mismatch {
    /// Whether the declaration should go on to rule matching.
    pub fn is_candidate(self) -> bool {
        matches!(self, Mismatch::BrokenLink | Mismatch::Changed { .. })
    }
}

/// Return type of a method or type of a property differs by identity.
/// Implicit conversions don't count as equal.
pub fn type_mismatch<S: MemberSymbol>(facade: &dyn SemanticFacade, symbol: &S, base: &S) -> bool {
    !facade.is_identity(symbol.member_type(), base.member_type())
}

pub fn accessibility_mismatch<S: MemberSymbol>(symbol: &S, base: &S) -> bool {
    symbol.declared_accessibility() != base.declared_accessibility()
}

/// Classify `symbol` against `overridden`, the base member its override link
/// currently resolves to.
pub fn detect<S: MemberSymbol>(
    facade: &dyn SemanticFacade,
    symbol: &S,
    overridden: Option<&S>,
) -> Mismatch {
    if !symbol.is_override() {
        return Mismatch::NotOverride;
    }

    let Some(base) = overridden else {
        return Mismatch::BrokenLink;
    };

    let type_changed = type_mismatch(facade, symbol, base);
    let accessibility_changed = accessibility_mismatch(symbol, base);
    if type_changed || accessibility_changed {
        Mismatch::Changed {
            type_changed,
            accessibility_changed,
        }
    } else {
        Mismatch::UpToDate
    }
}
