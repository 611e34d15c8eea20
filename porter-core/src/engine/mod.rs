//! Override reconciliation.
//!
//! [`OverrideRewriter`] walks a compilation unit bottom-up. For every method
//! and property that overrides a base member it decides whether the override
//! went stale, looks up the migration rule for it and, if there is one,
//! rebuilds the signature from the base member and leaves the rule's note.

pub mod annotate;
pub mod detect;
pub mod kinds;
pub mod resolve;
pub mod signature;

pub use detect::{detect, Mismatch};
pub use kinds::OverridableDeclaration;
pub use resolve::BaseResolution;
pub use signature::{rewrite_signature, Rewrite};

use tracing::{debug, trace};

use crate::error::Result;
use crate::rules::RuleTable;
use crate::semantic::{MemberSymbol, SemanticFacade};
use crate::syntax::visit::{walk_method, walk_property};
use crate::syntax::{CompilationUnit, MethodDeclaration, PropertyDeclaration, Scope, SyntaxRewriter};

/// Rewrites stale overrides in one compilation unit.
pub struct OverrideRewriter<'a> {
    facade: &'a dyn SemanticFacade,
    rules: &'a RuleTable,
}

impl<'a> OverrideRewriter<'a> {
    pub fn new(facade: &'a dyn SemanticFacade, rules: &'a RuleTable) -> Self {
        Self { facade, rules }
    }

    /// Reconcile one declaration whose symbol was resolved against the
    /// original tree. `node` is the already walked declaration.
    pub fn reconcile<D: OverridableDeclaration>(
        &self,
        symbol: Option<D::Symbol>,
        node: D,
    ) -> Result<D> {
        let Some(symbol) = symbol else {
            trace!(kind = D::KIND, "Declaration has no symbol, skipping");
            return Ok(node);
        };

        let direct = D::overridden(self.facade, &symbol);
        let mismatch = detect(self.facade, &symbol, direct.as_ref());
        if !mismatch.is_candidate() {
            return Ok(node);
        }

        let containing_type = symbol.containing_type();
        let member = symbol.name();
        debug!(kind = D::KIND, containing_type, member, ?mismatch, "Stale override");

        let Some(rule) = self.rules.find(self.facade, containing_type, member)? else {
            return Ok(node);
        };

        let base = BaseResolution::resolve(direct, || {
            self.facade
                .base_type(containing_type)
                .and_then(|ty| D::lookup(self.facade, &ty, member))
        });

        let (node, leave_note) = if rule.signature_changed {
            match rewrite_signature(self.facade, &node, &symbol, &base) {
                Rewrite::Changed(rewritten) => (rewritten, true),
                Rewrite::Unchanged => (node, false),
            }
        } else {
            (node, true)
        };

        debug!(
            kind = D::KIND,
            containing_type,
            member,
            base = base.kind(),
            leave_note,
            "Rule applied"
        );

        Ok(match rule.note() {
            Some(note) if leave_note => annotate::annotate(node, note),
            _ => node,
        })
    }
}

impl SyntaxRewriter for OverrideRewriter<'_> {
    fn visit_method(&mut self, scope: &Scope, node: MethodDeclaration) -> Result<MethodDeclaration> {
        let symbol = node.declared_symbol(self.facade, scope);
        let node = walk_method(self, scope, node)?;
        self.reconcile(symbol, node)
    }

    fn visit_property(
        &mut self,
        scope: &Scope,
        node: PropertyDeclaration,
    ) -> Result<PropertyDeclaration> {
        let symbol = node.declared_symbol(self.facade, scope);
        let node = walk_property(self, scope, node)?;
        self.reconcile(symbol, node)
    }
}

/// Run the override rewriter over a whole unit.
pub fn rewrite_unit(
    unit: CompilationUnit,
    facade: &dyn SemanticFacade,
    rules: &RuleTable,
) -> Result<CompilationUnit> {
    OverrideRewriter::new(facade, rules).visit_unit(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{
        Accessibility, ApiMethod, ApiModel, ApiProperty, ApiType, ParameterSymbol, SemanticModel,
    };
    use crate::syntax::{
        factory, ContainerDeclaration, ContainerKind, MemberDeclaration, SourceText, Token,
        TriviaList, TypeSyntax,
    };

    fn api() -> ApiModel {
        ApiModel::new().with_type(
            "ModItem",
            ApiType::new()
                .with_method(ApiMethod::new(
                    "Update",
                    Accessibility::Public,
                    "void",
                    vec![ParameterSymbol::new("dt", "double")],
                ))
                .with_property(ApiProperty::new("Scale", Accessibility::Public, "double")),
        )
    }

    fn spaced(text: &str) -> Token {
        factory::keyword(text)
    }

    fn method(access: &str, param_type: &str) -> MethodDeclaration {
        MethodDeclaration {
            modifiers: crate::syntax::ModifierList::new(vec![spaced(access), spaced("override")]),
            return_type: TypeSyntax::new(vec![spaced("void")]),
            identifier: Token::new("Update"),
            parameter_list: {
                let mut list = factory::parameter_list(&[ParameterSymbol::new("dt", param_type)]);
                list.close.trailing = TriviaList::space();
                list
            },
            body: vec![spaced("{"), Token::new("}")],
            ..Default::default()
        }
    }

    fn unit_with(members: Vec<MemberDeclaration>) -> CompilationUnit {
        CompilationUnit {
            members: vec![MemberDeclaration::Container(ContainerDeclaration {
                kind: ContainerKind::Type,
                name: "MyItem".to_string(),
                base_types: vec!["ModItem".to_string()],
                header: Vec::new(),
                members,
                footer: Vec::new(),
            })],
            ..Default::default()
        }
    }

    fn rules(signature_changed: bool) -> RuleTable {
        let mut builder = RuleTable::builder();
        if signature_changed {
            builder.declare_signature_change("ModItem", "Update", Some("Update takes a double"));
        } else {
            builder.declare_removed("ModItem", "Update", "Use PostUpdate");
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_stale_method_rewritten_and_annotated() {
        let api = api();
        let unit = unit_with(vec![MemberDeclaration::Method(method("public", "float"))]);
        let model = SemanticModel::new(&api, &unit);

        let out = rewrite_unit(unit, &model, &rules(true)).unwrap();
        assert_eq!(
            out.to_source(),
            "public override void Update(double dt) /* Update takes a double */ { }"
        );
    }

    #[test]
    fn test_up_to_date_method_untouched() {
        let api = api();
        let unit = unit_with(vec![MemberDeclaration::Method(method("public", "double"))]);
        let model = SemanticModel::new(&api, &unit);

        let out = rewrite_unit(unit.clone(), &model, &rules(true)).unwrap();
        assert_eq!(out, unit);
    }

    #[test]
    fn test_removed_rule_only_annotates() {
        let api = ApiModel::new().with_type("ModItem", ApiType::new());
        let unit = unit_with(vec![MemberDeclaration::Method(method("public", "float"))]);
        let model = SemanticModel::new(&api, &unit);

        let out = rewrite_unit(unit, &model, &rules(false)).unwrap();
        assert_eq!(
            out.to_source(),
            "public override void Update(float dt) /* Note: Removed. Use PostUpdate */ { }"
        );
    }

    #[test]
    fn test_fallback_finds_member_on_further_ancestor() {
        let api = ApiModel::new()
            .with_type(
                "ModType",
                ApiType::new().with_method(ApiMethod::new(
                    "Update",
                    Accessibility::Public,
                    "void",
                    vec![ParameterSymbol::new("dt", "double")],
                )),
            )
            .with_type("ModItem", ApiType::new().with_base("ModType"));
        let unit = unit_with(vec![MemberDeclaration::Method(method("protected", "float"))]);
        let model = SemanticModel::new(&api, &unit);

        let out = rewrite_unit(unit, &model, &rules(true)).unwrap();
        assert_eq!(
            out.to_source(),
            "public override void Update(double dt) /* Update takes a double */ { }"
        );
    }

    #[test]
    fn test_property_accessibility_fixed() {
        let api = api();
        let property = PropertyDeclaration {
            modifiers: crate::syntax::ModifierList::new(vec![spaced("protected"), spaced("override")]),
            ty: TypeSyntax::new(vec![spaced("double")]),
            identifier: Token::new("Scale").with_trailing(TriviaList::space()),
            body: vec![spaced("=>"), Token::new("1;")],
            ..Default::default()
        };
        let unit = unit_with(vec![MemberDeclaration::Property(property)]);
        let model = SemanticModel::new(&api, &unit);

        let mut builder = RuleTable::builder();
        builder.declare_signature_change("ModItem", "Scale", None);
        let table = builder.build().unwrap();

        let out = rewrite_unit(unit, &model, &table).unwrap();
        assert_eq!(out.to_source(), "public override double Scale => 1;");
    }
}
