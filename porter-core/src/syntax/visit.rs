//! Bottom-up tree rewriting.
//!
//! A [`SyntaxRewriter`] gets a `visit_*` call per node. The default
//! implementations delegate to the matching `walk_*` function, which rebuilds
//! the node from its rewritten children. Overriding a `visit_*` method and
//! calling `walk_*` first gives a depth-first rewrite where children are
//! finished before their parent is looked at.

use super::nodes::{
    CompilationUnit, ContainerDeclaration, ContainerKind, MemberDeclaration, MethodDeclaration,
    PropertyDeclaration,
};
use crate::error::Result;

/// A type enclosing the node being visited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeScope {
    pub name: String,
    pub base_types: Vec<String>,
}

/// Where in the tree a visited node sits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scope {
    pub namespaces: Vec<String>,
    /// Enclosing types, outermost first.
    pub types: Vec<TypeScope>,
}

impl Scope {
    /// The innermost enclosing type.
    pub fn containing_type(&self) -> Option<&TypeScope> {
        self.types.last()
    }

    /// Scope for the members of `container`.
    pub fn enter(&self, container: &ContainerDeclaration) -> Scope {
        let mut inner = self.clone();
        match container.kind {
            ContainerKind::Namespace => inner.namespaces.push(container.name.clone()),
            ContainerKind::Type => inner.types.push(TypeScope {
                name: container.name.clone(),
                base_types: container.base_types.clone(),
            }),
        }
        inner
    }
}

pub trait SyntaxRewriter {
    fn visit_unit(&mut self, unit: CompilationUnit) -> Result<CompilationUnit> {
        walk_unit(self, unit)
    }

    fn visit_member(&mut self, scope: &Scope, member: MemberDeclaration) -> Result<MemberDeclaration> {
        walk_member(self, scope, member)
    }

    fn visit_container(
        &mut self,
        scope: &Scope,
        container: ContainerDeclaration,
    ) -> Result<ContainerDeclaration> {
        walk_container(self, scope, container)
    }

    fn visit_method(&mut self, scope: &Scope, node: MethodDeclaration) -> Result<MethodDeclaration> {
        walk_method(self, scope, node)
    }

    fn visit_property(
        &mut self,
        scope: &Scope,
        node: PropertyDeclaration,
    ) -> Result<PropertyDeclaration> {
        walk_property(self, scope, node)
    }
}

pub fn walk_unit<R: SyntaxRewriter + ?Sized>(
    rewriter: &mut R,
    unit: CompilationUnit,
) -> Result<CompilationUnit> {
    let CompilationUnit {
        members,
        end_of_file,
    } = unit;
    let scope = Scope::default();

    let members = members
        .into_iter()
        .map(|member| rewriter.visit_member(&scope, member))
        .collect::<Result<Vec<_>>>()?;

    Ok(CompilationUnit {
        members,
        end_of_file,
    })
}

pub fn walk_member<R: SyntaxRewriter + ?Sized>(
    rewriter: &mut R,
    scope: &Scope,
    member: MemberDeclaration,
) -> Result<MemberDeclaration> {
    Ok(match member {
        MemberDeclaration::Method(m) => MemberDeclaration::Method(rewriter.visit_method(scope, m)?),
        MemberDeclaration::Property(p) => {
            MemberDeclaration::Property(rewriter.visit_property(scope, p)?)
        }
        MemberDeclaration::Container(c) => {
            MemberDeclaration::Container(rewriter.visit_container(scope, c)?)
        }
        other @ MemberDeclaration::Other(_) => other,
    })
}

pub fn walk_container<R: SyntaxRewriter + ?Sized>(
    rewriter: &mut R,
    scope: &Scope,
    container: ContainerDeclaration,
) -> Result<ContainerDeclaration> {
    let inner = scope.enter(&container);
    let ContainerDeclaration {
        kind,
        name,
        base_types,
        header,
        members,
        footer,
    } = container;

    let members = members
        .into_iter()
        .map(|member| rewriter.visit_member(&inner, member))
        .collect::<Result<Vec<_>>>()?;

    Ok(ContainerDeclaration {
        kind,
        name,
        base_types,
        header,
        members,
        footer,
    })
}

/// Method bodies hold no declarations the rewriter visits, so the interior
/// comes back as is.
pub fn walk_method<R: SyntaxRewriter + ?Sized>(
    _rewriter: &mut R,
    _scope: &Scope,
    node: MethodDeclaration,
) -> Result<MethodDeclaration> {
    Ok(node)
}

pub fn walk_property<R: SyntaxRewriter + ?Sized>(
    _rewriter: &mut R,
    _scope: &Scope,
    node: PropertyDeclaration,
) -> Result<PropertyDeclaration> {
    Ok(node)
}
