//! Per-kind hooks for the shared reconcile pipeline.

use super::signature::{parameters_equal, rewrite_parameter_list, rewrite_type};
use crate::semantic::{MemberSymbol, MethodSymbol, PropertySymbol, SemanticFacade};
use crate::syntax::{
    MethodDeclaration, ModifierList, PropertyDeclaration, Scope, SourceText, Token,
};

/// A declaration that can override a base member.
pub trait OverridableDeclaration: Clone + PartialEq + SourceText {
    type Symbol: MemberSymbol;

    /// Used in log events.
    const KIND: &'static str;

    fn declared_symbol(&self, facade: &dyn SemanticFacade, scope: &Scope) -> Option<Self::Symbol>;

    fn overridden(facade: &dyn SemanticFacade, symbol: &Self::Symbol) -> Option<Self::Symbol>;

    fn lookup(facade: &dyn SemanticFacade, ty: &str, name: &str) -> Option<Self::Symbol>;

    /// Replace the type spans that differ from `base` by identity: return type
    /// and parameter list for methods, the property type for properties.
    fn rewrite_types(self, facade: &dyn SemanticFacade, symbol: &Self::Symbol, base: &Self::Symbol)
        -> Self;

    fn modifiers(&self) -> &ModifierList;

    fn with_modifiers(self, modifiers: ModifierList) -> Self;

    /// Token whose trailing trivia receives the rule note.
    fn annotation_anchor_mut(&mut self) -> &mut Token;
}

impl OverridableDeclaration for MethodDeclaration {
    type Symbol = MethodSymbol;

    const KIND: &'static str = "method";

    fn declared_symbol(&self, facade: &dyn SemanticFacade, scope: &Scope) -> Option<MethodSymbol> {
        facade.declared_method(scope, self)
    }

    fn overridden(facade: &dyn SemanticFacade, symbol: &MethodSymbol) -> Option<MethodSymbol> {
        facade.overridden_method(symbol)
    }

    fn lookup(facade: &dyn SemanticFacade, ty: &str, name: &str) -> Option<MethodSymbol> {
        facade.lookup_method(ty, name)
    }

    fn rewrite_types(
        mut self,
        facade: &dyn SemanticFacade,
        symbol: &MethodSymbol,
        base: &MethodSymbol,
    ) -> Self {
        if !parameters_equal(facade, &symbol.parameters, &base.parameters) {
            self.parameter_list = rewrite_parameter_list(&self.parameter_list, &base.parameters);
        }
        if !facade.is_identity(&symbol.return_type, &base.return_type) {
            self.return_type = rewrite_type(&self.return_type, &base.return_type);
        }
        self
    }

    fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }

    fn with_modifiers(mut self, modifiers: ModifierList) -> Self {
        self.modifiers = modifiers;
        self
    }

    fn annotation_anchor_mut(&mut self) -> &mut Token {
        &mut self.parameter_list.close
    }
}

impl OverridableDeclaration for PropertyDeclaration {
    type Symbol = PropertySymbol;

    const KIND: &'static str = "property";

    fn declared_symbol(&self, facade: &dyn SemanticFacade, scope: &Scope) -> Option<PropertySymbol> {
        facade.declared_property(scope, self)
    }

    fn overridden(facade: &dyn SemanticFacade, symbol: &PropertySymbol) -> Option<PropertySymbol> {
        facade.overridden_property(symbol)
    }

    fn lookup(facade: &dyn SemanticFacade, ty: &str, name: &str) -> Option<PropertySymbol> {
        facade.lookup_property(ty, name)
    }

    fn rewrite_types(
        mut self,
        facade: &dyn SemanticFacade,
        symbol: &PropertySymbol,
        base: &PropertySymbol,
    ) -> Self {
        if !facade.is_identity(&symbol.ty, &base.ty) {
            self.ty = rewrite_type(&self.ty, &base.ty);
        }
        self
    }

    fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }

    fn with_modifiers(mut self, modifiers: ModifierList) -> Self {
        self.modifiers = modifiers;
        self
    }

    fn annotation_anchor_mut(&mut self) -> &mut Token {
        &mut self.identifier
    }
}
