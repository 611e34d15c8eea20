//! Rebuilding override signatures from their base member.
//!
//! Each piece (parameter list, type span, modifier list) is replaced as a
//! whole by freshly built syntax, and the outer trivia of the replaced piece is
//! moved onto the new one. Nothing outside the replaced spans is touched.

use super::kinds::OverridableDeclaration;
use super::resolve::BaseResolution;
use crate::semantic::{
    Accessibility, MemberSymbol, ParameterSymbol, SemanticFacade, TypeRef, ACCESSIBILITY_KEYWORDS,
};
use crate::syntax::factory;
use crate::syntax::token::transfer_trivia;
use crate::syntax::{ModifierList, ParameterList, TypeSyntax};

/// Outcome of a rewrite step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rewrite<T> {
    Unchanged,
    Changed(T),
}

impl<T> Rewrite<T> {
    pub fn is_changed(&self) -> bool {
        matches!(self, Rewrite::Changed(_))
    }

    /// The rewritten value, or `original` if nothing changed.
    pub fn or(self, original: T) -> T {
        match self {
            Rewrite::Changed(value) => value,
            Rewrite::Unchanged => original,
        }
    }
}

/// Positional comparison by type identity and ref kind. Names, defaults and
/// `params` don't matter for binding.
pub fn parameters_equal(
    facade: &dyn SemanticFacade,
    a: &[ParameterSymbol],
    b: &[ParameterSymbol],
) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.ref_kind == y.ref_kind && facade.is_identity(&x.ty, &y.ty))
}

/// A parameter list declaring `parameters`, framed by the trivia of `old`.
pub fn rewrite_parameter_list(old: &ParameterList, parameters: &[ParameterSymbol]) -> ParameterList {
    let mut list = factory::parameter_list(parameters);
    list.open.leading = old.open.leading.clone();
    list.close.trailing = old.close.trailing.clone();
    list
}

/// A type span for `ty` in place of `old`.
pub fn rewrite_type(old: &TypeSyntax, ty: &TypeRef) -> TypeSyntax {
    let mut new = factory::type_syntax(ty);
    transfer_trivia(&mut new.tokens, &old.tokens);
    new
}

/// Modifiers spelling `accessibility`, followed by the non-access modifiers of
/// `old` in their original order. `override` is added if it went missing.
pub fn rewrite_modifiers(old: &ModifierList, accessibility: Accessibility) -> ModifierList {
    let mut rest: Vec<&str> = old
        .keywords()
        .filter(|k| !ACCESSIBILITY_KEYWORDS.contains(k))
        .collect();
    if !rest.contains(&"override") {
        rest.push("override");
    }

    let mut list = factory::modifier_list(accessibility, rest);
    transfer_trivia(&mut list.tokens, &old.tokens);
    list
}

/// Rebuild the signature of `node` to match the resolved base member.
///
/// Type and accessibility fixes are applied independently. Returns
/// [`Rewrite::Unchanged`] when the base could not be resolved or the rebuilt
/// declaration is identical to the original.
pub fn rewrite_signature<D: OverridableDeclaration>(
    facade: &dyn SemanticFacade,
    node: &D,
    symbol: &D::Symbol,
    base: &BaseResolution<D::Symbol>,
) -> Rewrite<D> {
    let Some(base) = base.symbol() else {
        return Rewrite::Unchanged;
    };

    let mut rewritten = node.clone().rewrite_types(facade, symbol, base);

    if symbol.declared_accessibility() != base.declared_accessibility() {
        let modifiers = rewrite_modifiers(rewritten.modifiers(), base.declared_accessibility());
        rewritten = rewritten.with_modifiers(modifiers);
    }

    if rewritten == *node {
        Rewrite::Unchanged
    } else {
        Rewrite::Changed(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{ApiModel, RefKind, SemanticModel};
    use crate::syntax::{SourceText, Token, TriviaList};

    fn spaced(text: &str) -> Token {
        Token::new(text).with_trailing(TriviaList::space())
    }

    #[test]
    fn test_parameters_equal_by_identity_and_ref_kind() {
        let api = ApiModel::new();
        let model = SemanticModel::api_only(&api);

        let a = vec![ParameterSymbol::new("dt", "float")];
        let b = vec![ParameterSymbol::new("delta", "System.Single")];
        assert!(parameters_equal(&model, &a, &b));

        let by_ref = vec![ParameterSymbol::new("dt", "float").with_ref_kind(RefKind::Ref)];
        assert!(!parameters_equal(&model, &a, &by_ref));

        let wider = vec![ParameterSymbol::new("dt", "double")];
        assert!(!parameters_equal(&model, &a, &wider));
        assert!(!parameters_equal(&model, &a, &[]));
    }

    #[test]
    fn test_rewrite_type_keeps_outer_trivia() {
        let old = TypeSyntax::new(vec![Token::new("float")
            .with_leading(TriviaList::parse("\n\t"))
            .with_trailing(TriviaList::parse("  "))]);
        let new = rewrite_type(&old, &TypeRef::new("System.Collections.Generic.List<Item>"));
        assert_eq!(new.to_source(), "\n\tSystem.Collections.Generic.List<Item>  ");
    }

    #[test]
    fn test_rewrite_parameter_list_keeps_outer_trivia() {
        let old = ParameterList {
            open: Token::new("(").with_leading(TriviaList::parse(" ")),
            parameters: Vec::new(),
            separators: Vec::new(),
            close: Token::new(")").with_trailing(TriviaList::parse(" // tick\n")),
        };
        let new = rewrite_parameter_list(&old, &[ParameterSymbol::new("dt", "double")]);
        assert_eq!(new.to_source(), " (double dt) // tick\n");
    }

    #[test]
    fn test_rewrite_modifiers_keeps_other_modifiers() {
        let old = ModifierList::new(vec![
            spaced("protected").with_leading(TriviaList::parse("    ")),
            spaced("sealed"),
            spaced("override"),
        ]);
        let new = rewrite_modifiers(&old, Accessibility::Public);
        assert_eq!(new.to_source(), "    public sealed override ");
    }

    #[test]
    fn test_rewrite_modifiers_restores_override() {
        let old = ModifierList::new(vec![spaced("internal")]);
        let new = rewrite_modifiers(&old, Accessibility::ProtectedInternal);
        assert_eq!(new.to_source(), "protected internal override ");
    }

    #[test]
    fn test_rewrite_or_original() {
        assert_eq!(Rewrite::Changed(2).or(1), 2);
        assert_eq!(Rewrite::Unchanged.or(1), 1);
        assert!(!Rewrite::<i32>::Unchanged.is_changed());
    }
}
