//! In-memory semantic model.
//!
//! [`ApiModel`] describes the framework as it looks *now*: its types, their
//! base types and the current signatures of their overridable members. It is
//! usually loaded from a TOML or JSON file:
//!
//! ```toml
//! [types.ModType]
//!
//! [types.ModItem]
//! base = "ModType"
//!
//! [[types.ModItem.methods]]
//! name = "Update"
//! accessibility = "public"
//! returns = "void"
//! parameters = [{ name = "dt", type = "double" }]
//!
//! [[types.ModItem.properties]]
//! name = "Scale"
//! type = "double"
//! ```
//!
//! [`SemanticModel`] pairs an `ApiModel` with one compilation unit and answers
//! the [`SemanticFacade`] queries for it. Declared symbols come straight from
//! the declaration syntax; override links are bound the way C# binds them:
//! methods by name and parameter list, properties by name.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::facade::SemanticFacade;
use super::symbols::{
    Accessibility, MethodSymbol, ParameterSymbol, PropertySymbol, RefKind, TypeRef,
};
use crate::error::{PorterError, Result};
use crate::syntax::{
    CompilationUnit, ContainerKind, MemberDeclaration, MethodDeclaration, PropertyDeclaration,
    Scope,
};

fn default_accessibility() -> Accessibility {
    Accessibility::Public
}

fn default_return_type() -> TypeRef {
    TypeRef::new("void")
}

/// Current signature of a framework method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMethod {
    pub name: String,
    #[serde(default = "default_accessibility")]
    pub accessibility: Accessibility,
    #[serde(default = "default_return_type")]
    pub returns: TypeRef,
    #[serde(default)]
    pub parameters: Vec<ParameterSymbol>,
}

impl ApiMethod {
    pub fn new(
        name: impl Into<String>,
        accessibility: Accessibility,
        returns: impl Into<String>,
        parameters: Vec<ParameterSymbol>,
    ) -> Self {
        Self {
            name: name.into(),
            accessibility,
            returns: TypeRef::new(returns),
            parameters,
        }
    }

    fn symbol(&self, containing_type: &str) -> MethodSymbol {
        MethodSymbol {
            name: self.name.clone(),
            containing_type: containing_type.to_string(),
            accessibility: self.accessibility,
            parameters: self.parameters.clone(),
            return_type: self.returns.clone(),
            is_override: false,
        }
    }
}

/// Current signature of a framework property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProperty {
    pub name: String,
    #[serde(default = "default_accessibility")]
    pub accessibility: Accessibility,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl ApiProperty {
    pub fn new(name: impl Into<String>, accessibility: Accessibility, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accessibility,
            ty: TypeRef::new(ty),
        }
    }

    fn symbol(&self, containing_type: &str) -> PropertySymbol {
        PropertySymbol {
            name: self.name.clone(),
            containing_type: containing_type.to_string(),
            accessibility: self.accessibility,
            ty: self.ty.clone(),
            is_override: false,
        }
    }
}

/// A framework type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiType {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub methods: Vec<ApiMethod>,
    #[serde(default)]
    pub properties: Vec<ApiProperty>,
}

impl ApiType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_method(mut self, method: ApiMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_property(mut self, property: ApiProperty) -> Self {
        self.properties.push(property);
        self
    }
}

/// The framework API the source is being migrated to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiModel {
    #[serde(default)]
    pub types: BTreeMap<String, ApiType>,
}

impl ApiModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, name: impl Into<String>, ty: ApiType) -> Self {
        self.types.insert(name.into(), ty);
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a model from a `.toml` or `.json` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(PorterError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// Find a type by exact key, falling back to an unqualified match.
    pub fn get_type(&self, name: &str) -> Option<(&str, &ApiType)> {
        if let Some((key, ty)) = self.types.get_key_value(name) {
            return Some((key.as_str(), ty));
        }

        let wanted = TypeRef::new(name).canonical();
        self.types
            .iter()
            .find(|(key, _)| TypeRef::new(key.as_str()).canonical() == wanted)
            .map(|(key, ty)| (key.as_str(), ty))
    }
}

/// Semantic view of one compilation unit against an [`ApiModel`].
#[derive(Clone, Debug)]
pub struct SemanticModel<'a> {
    api: &'a ApiModel,
    /// Types declared in the unit, by canonical name, with their base lists.
    source_types: HashMap<String, Vec<String>>,
}

impl<'a> SemanticModel<'a> {
    pub fn new(api: &'a ApiModel, unit: &CompilationUnit) -> Self {
        let mut source_types = HashMap::new();
        index_types(&unit.members, &mut source_types);
        Self { api, source_types }
    }

    /// A model that knows no source types, only the API.
    pub fn api_only(api: &'a ApiModel) -> Self {
        Self {
            api,
            source_types: HashMap::new(),
        }
    }

    /// Base chain of `ty`, nearest first. Stops on cycles.
    fn ancestors(&self, ty: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([TypeRef::new(ty).canonical()]);
        let mut current = self.base_type(ty);

        while let Some(next) = current {
            if !seen.insert(TypeRef::new(next.as_str()).canonical()) {
                break;
            }
            current = self.base_type(&next);
            chain.push(next);
        }

        chain
    }

    fn self_and_ancestors(&self, ty: &str) -> Vec<String> {
        let mut chain = vec![ty.to_string()];
        chain.extend(self.ancestors(ty));
        chain
    }

    fn parameters_match(&self, a: &[ParameterSymbol], b: &[ParameterSymbol]) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .zip(b)
                .all(|(x, y)| x.ref_kind == y.ref_kind && self.is_identity(&x.ty, &y.ty))
    }
}

fn index_types(members: &[MemberDeclaration], out: &mut HashMap<String, Vec<String>>) {
    for member in members {
        if let MemberDeclaration::Container(container) = member {
            if container.kind == ContainerKind::Type {
                // Partial declarations contribute to one base list.
                let bases = out
                    .entry(TypeRef::new(container.name.as_str()).canonical())
                    .or_default();
                for base in &container.base_types {
                    if !bases.contains(base) {
                        bases.push(base.clone());
                    }
                }
            }
            index_types(&container.members, out);
        }
    }
}

fn parameter_symbols(node: &MethodDeclaration) -> Option<Vec<ParameterSymbol>> {
    node.parameter_list
        .parameters
        .iter()
        .map(|p| {
            let ty = p.ty.as_ref()?;
            Some(ParameterSymbol {
                name: p.identifier.text.clone(),
                ty: TypeRef::new(ty.text()),
                ref_kind: RefKind::from_modifiers(p.modifier_keywords()),
                is_params: p.modifier_keywords().any(|m| m == "params"),
                default_value: p.default_text(),
            })
        })
        .collect()
}

impl SemanticFacade for SemanticModel<'_> {
    fn declared_method(&self, scope: &Scope, node: &MethodDeclaration) -> Option<MethodSymbol> {
        let containing = scope.containing_type()?;
        if node.name().is_empty() || node.return_type.tokens.is_empty() {
            return None;
        }

        Some(MethodSymbol {
            name: node.name().to_string(),
            containing_type: containing.name.clone(),
            accessibility: Accessibility::from_modifiers(node.modifiers.keywords()),
            parameters: parameter_symbols(node)?,
            return_type: TypeRef::new(node.return_type.text()),
            is_override: node.modifiers.contains("override") && node.explicit_interface.is_empty(),
        })
    }

    fn declared_property(
        &self,
        scope: &Scope,
        node: &PropertyDeclaration,
    ) -> Option<PropertySymbol> {
        let containing = scope.containing_type()?;
        if node.name().is_empty() || node.ty.tokens.is_empty() {
            return None;
        }

        Some(PropertySymbol {
            name: node.name().to_string(),
            containing_type: containing.name.clone(),
            accessibility: Accessibility::from_modifiers(node.modifiers.keywords()),
            ty: TypeRef::new(node.ty.text()),
            is_override: node.modifiers.contains("override") && node.explicit_interface.is_empty(),
        })
    }

    fn overridden_method(&self, symbol: &MethodSymbol) -> Option<MethodSymbol> {
        if !symbol.is_override {
            return None;
        }

        self.ancestors(&symbol.containing_type)
            .iter()
            .filter_map(|ty| self.api.get_type(ty))
            .find_map(|(key, ty)| {
                ty.methods
                    .iter()
                    .find(|m| {
                        m.name == symbol.name && self.parameters_match(&m.parameters, &symbol.parameters)
                    })
                    .map(|m| m.symbol(key))
            })
    }

    fn overridden_property(&self, symbol: &PropertySymbol) -> Option<PropertySymbol> {
        if !symbol.is_override {
            return None;
        }

        self.ancestors(&symbol.containing_type)
            .iter()
            .filter_map(|ty| self.api.get_type(ty))
            .find_map(|(key, ty)| {
                ty.properties
                    .iter()
                    .find(|p| p.name == symbol.name)
                    .map(|p| p.symbol(key))
            })
    }

    fn lookup_method(&self, ty: &str, name: &str) -> Option<MethodSymbol> {
        self.self_and_ancestors(ty)
            .iter()
            .filter_map(|t| self.api.get_type(t))
            .find_map(|(key, t)| t.methods.iter().find(|m| m.name == name).map(|m| m.symbol(key)))
    }

    fn lookup_property(&self, ty: &str, name: &str) -> Option<PropertySymbol> {
        self.self_and_ancestors(ty)
            .iter()
            .filter_map(|t| self.api.get_type(t))
            .find_map(|(key, t)| {
                t.properties
                    .iter()
                    .find(|p| p.name == name)
                    .map(|p| p.symbol(key))
            })
    }

    fn is_identity(&self, a: &TypeRef, b: &TypeRef) -> bool {
        a.canonical() == b.canonical()
    }

    fn base_type(&self, ty: &str) -> Option<String> {
        let declared = self
            .source_types
            .get(&TypeRef::new(ty).canonical())
            .and_then(|bases| bases.first());
        if let Some(base) = declared {
            return Some(base.clone());
        }
        self.api.get_type(ty).and_then(|(_, t)| t.base.clone())
    }

    fn is_ancestor(&self, ty: &str, ancestor: &str) -> bool {
        self.ancestors(ty).iter().any(|t| self.same_type(t, ancestor))
    }
}
