/// The base member an override is rewritten against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BaseResolution<S> {
    /// The override link still binds.
    DirectOverride(S),
    /// Found by name after the link broke, searching the immediate base type
    /// first and then its ancestors.
    NameLookupFallback(S),
    Unresolved,
}

impl<S> BaseResolution<S> {
    /// Prefer the direct link; only run `fallback` when there is none.
    pub fn resolve(direct: Option<S>, fallback: impl FnOnce() -> Option<S>) -> Self {
        match direct {
            Some(symbol) => BaseResolution::DirectOverride(symbol),
            None => fallback()
                .map(BaseResolution::NameLookupFallback)
                .unwrap_or(BaseResolution::Unresolved),
        }
    }

    pub fn symbol(&self) -> Option<&S> {
        match self {
            BaseResolution::DirectOverride(s) | BaseResolution::NameLookupFallback(s) => Some(s),
            BaseResolution::Unresolved => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BaseResolution::DirectOverride(_) => "direct",
            BaseResolution::NameLookupFallback(_) => "name_lookup",
            BaseResolution::Unresolved => "unresolved",
        }
    }
}
