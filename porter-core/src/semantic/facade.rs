//! The semantic queries the reconciler consumes.

use super::symbols::{MethodSymbol, PropertySymbol, TypeRef};
use crate::syntax::{MethodDeclaration, PropertyDeclaration, Scope};

/// Read-only semantic information about one compilation unit.
///
/// Implementations answer questions about the tree as it was *before* any
/// rewriting; the reconciler resolves declared symbols before it replaces
/// anything.
pub trait SemanticFacade {
    /// Symbol declared by a method node, or `None` if it cannot be resolved.
    fn declared_method(&self, scope: &Scope, node: &MethodDeclaration) -> Option<MethodSymbol>;

    /// Symbol declared by a property node, or `None` if it cannot be resolved.
    fn declared_property(&self, scope: &Scope, node: &PropertyDeclaration)
        -> Option<PropertySymbol>;

    /// The base method `symbol` overrides, if the override still binds.
    fn overridden_method(&self, symbol: &MethodSymbol) -> Option<MethodSymbol>;

    /// The base property `symbol` overrides, if the override still binds.
    fn overridden_property(&self, symbol: &PropertySymbol) -> Option<PropertySymbol>;

    /// First method called `name` visible on `ty` (including inherited ones).
    fn lookup_method(&self, ty: &str, name: &str) -> Option<MethodSymbol>;

    /// Property called `name` visible on `ty` (including inherited ones).
    fn lookup_property(&self, ty: &str, name: &str) -> Option<PropertySymbol>;

    /// Whether `a` and `b` denote the very same type. Convertible is not enough.
    fn is_identity(&self, a: &TypeRef, b: &TypeRef) -> bool;

    /// Immediate base type of `ty`.
    fn base_type(&self, ty: &str) -> Option<String>;

    /// Whether `ancestor` appears in the base chain of `ty` (not `ty` itself).
    fn is_ancestor(&self, ty: &str, ancestor: &str) -> bool;

    /// Whether two type names denote the same type.
    fn same_type(&self, a: &str, b: &str) -> bool {
        self.is_identity(&TypeRef::new(a), &TypeRef::new(b))
    }
}
