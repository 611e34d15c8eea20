//! Symbols handed out by the semantic layer.

use serde::{Deserialize, Serialize};

/// Declared accessibility of a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    #[serde(rename = "not_applicable")]
    NotApplicable,
    #[serde(rename = "private")]
    Private,
    #[serde(rename = "private protected")]
    PrivateProtected,
    #[serde(rename = "protected")]
    Protected,
    #[serde(rename = "internal")]
    Internal,
    #[serde(rename = "protected internal")]
    ProtectedInternal,
    #[serde(rename = "public")]
    Public,
}

/// Every keyword that contributes to accessibility.
pub const ACCESSIBILITY_KEYWORDS: &[&str] = &["public", "protected", "internal", "private"];

impl Accessibility {
    /// Keywords that spell this accessibility in a modifier list.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Accessibility::NotApplicable => &[],
            Accessibility::Private => &["private"],
            Accessibility::PrivateProtected => &["private", "protected"],
            Accessibility::Protected => &["protected"],
            Accessibility::Internal => &["internal"],
            Accessibility::ProtectedInternal => &["protected", "internal"],
            Accessibility::Public => &["public"],
        }
    }

    /// Accessibility spelled by a modifier list. Members without any access
    /// keyword are private.
    pub fn from_modifiers<'a>(modifiers: impl IntoIterator<Item = &'a str>) -> Self {
        let (mut public, mut protected, mut internal, mut private) = (false, false, false, false);
        for modifier in modifiers {
            match modifier {
                "public" => public = true,
                "protected" => protected = true,
                "internal" => internal = true,
                "private" => private = true,
                _ => {}
            }
        }

        match (public, protected, internal, private) {
            (true, _, _, _) => Accessibility::Public,
            (_, true, true, _) => Accessibility::ProtectedInternal,
            (_, true, _, true) => Accessibility::PrivateProtected,
            (_, true, _, _) => Accessibility::Protected,
            (_, _, true, _) => Accessibility::Internal,
            _ => Accessibility::Private,
        }
    }
}

/// How an argument is passed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    #[default]
    None,
    Ref,
    Out,
    In,
}

impl RefKind {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            RefKind::None => None,
            RefKind::Ref => Some("ref"),
            RefKind::Out => Some("out"),
            RefKind::In => Some("in"),
        }
    }

    pub fn from_modifiers<'a>(modifiers: impl IntoIterator<Item = &'a str>) -> Self {
        modifiers
            .into_iter()
            .find_map(|m| match m {
                "ref" => Some(RefKind::Ref),
                "out" => Some(RefKind::Out),
                "in" => Some(RefKind::In),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// C# keyword aliases and the CLR type names they stand for.
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("bool", "Boolean"),
    ("byte", "Byte"),
    ("sbyte", "SByte"),
    ("char", "Char"),
    ("decimal", "Decimal"),
    ("double", "Double"),
    ("float", "Single"),
    ("int", "Int32"),
    ("uint", "UInt32"),
    ("nint", "IntPtr"),
    ("nuint", "UIntPtr"),
    ("long", "Int64"),
    ("ulong", "UInt64"),
    ("short", "Int16"),
    ("ushort", "UInt16"),
    ("object", "Object"),
    ("string", "String"),
    ("void", "Void"),
];

/// A type as written, e.g. `float`, `System.Single` or `List<Item>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identity key: names unqualified, keyword aliases mapped to CLR names,
    /// tuple element names dropped. `float`, `Single` and `System.Single` all
    /// map to `Single`; `(int a, int b)` maps to `(Int32,Int32)`.
    pub fn canonical(&self) -> String {
        map_names(&self.0, false, false, |name| {
            let simple = name.rsplit('.').next().unwrap_or(name);
            let simple = simple.trim_start_matches('@');
            TYPE_ALIASES
                .iter()
                .find(|(alias, _)| *alias == simple)
                .map(|(_, clr)| (*clr).to_string())
                .unwrap_or_else(|| simple.to_string())
        })
    }

    /// How the type should be spelled in rewritten source: keyword aliases
    /// where C# has one, otherwise the name as given.
    pub fn display(&self) -> String {
        map_names(&self.0, true, true, |name| {
            let simple = name.strip_prefix("System.").unwrap_or(name);
            TYPE_ALIASES
                .iter()
                .find(|(_, clr)| *clr == simple)
                .map(|(alias, _)| (*alias).to_string())
                .unwrap_or_else(|| name.to_string())
        })
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Characters that make up a (possibly dotted) name in a type expression.
pub(crate) fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '@'
}

#[derive(Debug, PartialEq)]
enum Piece {
    Name(String),
    Punct(char),
}

fn pieces(text: &str) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut name = String::new();
    for c in text.chars() {
        if is_name_char(c) {
            name.push(c);
            continue;
        }
        if !name.is_empty() {
            out.push(Piece::Name(std::mem::take(&mut name)));
        }
        if !c.is_whitespace() {
            out.push(Piece::Punct(c));
        }
    }
    if !name.is_empty() {
        out.push(Piece::Name(name));
    }
    out
}

/// Rewrite every dotted name in a type expression through `map`.
///
/// Whitespace collapses to one space between a type and the name after it
/// (`ref int`, `List<int> items`) and disappears around other punctuation,
/// except for a space after `,` when `spaced`. Tuple element names are
/// dropped unless `element_names`.
fn map_names(
    text: &str,
    spaced: bool,
    element_names: bool,
    map: impl Fn(&str) -> String,
) -> String {
    let text = text.replace("global::", "");
    let pieces = pieces(&text);
    let mut out = String::with_capacity(text.len());
    let mut open: Vec<char> = Vec::new();
    let mut prev: Option<&Piece> = None;

    for (i, piece) in pieces.iter().enumerate() {
        let next = pieces.get(i + 1);
        match piece {
            Piece::Punct(c) => {
                match c {
                    '<' | '(' | '[' => open.push(*c),
                    '>' | ')' | ']' => {
                        open.pop();
                    }
                    _ => {}
                }
                out.push(*c);
                if *c == ',' && spaced && !matches!(next, Some(Piece::Punct(',' | ']'))) {
                    out.push(' ');
                }
            }
            Piece::Name(name) => {
                let follows_type = matches!(
                    prev,
                    Some(Piece::Name(_) | Piece::Punct('>' | ']' | ')' | '?' | '*'))
                );
                let ends_element = matches!(next, Some(Piece::Punct(',' | ')')));
                let in_tuple = open.last() == Some(&'(');
                if !(in_tuple && follows_type && ends_element && !element_names) {
                    if follows_type && !name.starts_with('.') {
                        out.push(' ');
                    }
                    out.push_str(&map(name));
                }
            }
        }
        prev = Some(piece);
    }

    out
}

/// A formal parameter of a method symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub ref_kind: RefKind,
    #[serde(default)]
    pub is_params: bool,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::new(ty),
            ref_kind: RefKind::None,
            is_params: false,
            default_value: None,
        }
    }

    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A resolved method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSymbol {
    pub name: String,
    pub containing_type: String,
    pub accessibility: Accessibility,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: TypeRef,
    pub is_override: bool,
}

/// A resolved property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySymbol {
    pub name: String,
    pub containing_type: String,
    pub accessibility: Accessibility,
    pub ty: TypeRef,
    pub is_override: bool,
}

/// What the reconciler needs from any overridable member symbol.
pub trait MemberSymbol {
    fn name(&self) -> &str;
    fn containing_type(&self) -> &str;
    fn declared_accessibility(&self) -> Accessibility;
    fn is_override(&self) -> bool;
    /// Return type of a method, type of a property.
    fn member_type(&self) -> &TypeRef;
}

impl MemberSymbol for MethodSymbol {
    fn name(&self) -> &str {
        &self.name
    }

    fn containing_type(&self) -> &str {
        &self.containing_type
    }

    fn declared_accessibility(&self) -> Accessibility {
        self.accessibility
    }

    fn is_override(&self) -> bool {
        self.is_override
    }

    fn member_type(&self) -> &TypeRef {
        &self.return_type
    }
}

impl MemberSymbol for PropertySymbol {
    fn name(&self) -> &str {
        &self.name
    }

    fn containing_type(&self) -> &str {
        &self.containing_type
    }

    fn declared_accessibility(&self) -> Accessibility {
        self.accessibility
    }

    fn is_override(&self) -> bool {
        self.is_override
    }

    fn member_type(&self) -> &TypeRef {
        &self.ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessibility_from_modifiers() {
        assert_eq!(
            Accessibility::from_modifiers(["public", "override"]),
            Accessibility::Public
        );
        assert_eq!(
            Accessibility::from_modifiers(["protected", "internal", "override"]),
            Accessibility::ProtectedInternal
        );
        assert_eq!(
            Accessibility::from_modifiers(["private", "protected"]),
            Accessibility::PrivateProtected
        );
        assert_eq!(
            Accessibility::from_modifiers(["override"]),
            Accessibility::Private
        );
    }

    #[test]
    fn test_accessibility_keywords() {
        assert_eq!(
            Accessibility::ProtectedInternal.keywords(),
            &["protected", "internal"]
        );
        assert!(Accessibility::NotApplicable.keywords().is_empty());
    }

    #[test]
    fn test_canonical_type_identity() {
        assert_eq!(TypeRef::new("float").canonical(), "Single");
        assert_eq!(TypeRef::new("System.Single").canonical(), "Single");
        assert_eq!(
            TypeRef::new("System.Collections.Generic.List< int >").canonical(),
            TypeRef::new("List<Int32>").canonical()
        );
        assert_ne!(
            TypeRef::new("float").canonical(),
            TypeRef::new("double").canonical()
        );
        assert_eq!(TypeRef::new("global::Terraria.Item").canonical(), "Item");
    }

    #[test]
    fn test_display_prefers_keywords() {
        assert_eq!(TypeRef::new("System.Double").display(), "double");
        assert_eq!(TypeRef::new("Int32[]").display(), "int[]");
        assert_eq!(
            TypeRef::new("Dictionary<String,Item>").display(),
            "Dictionary<string, Item>"
        );
        assert_eq!(TypeRef::new("Terraria.Item").display(), "Terraria.Item");
    }

    #[test]
    fn test_multi_word_types_keep_their_spaces() {
        assert_eq!(TypeRef::new("ref int").canonical(), "ref Int32");
        assert_eq!(
            TypeRef::new("ref  int").canonical(),
            TypeRef::new("ref System.Int32").canonical()
        );
        assert_eq!(TypeRef::new("ref readonly int").display(), "ref readonly int");
        assert_ne!(
            TypeRef::new("ref int").canonical(),
            TypeRef::new("int").canonical()
        );
    }

    #[test]
    fn test_tuple_element_names() {
        assert_eq!(
            TypeRef::new("(int width, int height)").canonical(),
            "(Int32,Int32)"
        );
        assert_eq!(
            TypeRef::new("(int w, int h)").canonical(),
            TypeRef::new("(System.Int32, Int32)").canonical()
        );
        assert_eq!(
            TypeRef::new("(Int32 width, List<int> items)").display(),
            "(int width, List<int> items)"
        );
        assert_eq!(TypeRef::new("int[,]").display(), "int[,]");
    }

    #[test]
    fn test_ref_kind_from_modifiers() {
        assert_eq!(RefKind::from_modifiers(["ref"]), RefKind::Ref);
        assert_eq!(RefKind::from_modifiers(["this"]), RefKind::None);
        assert_eq!(RefKind::Out.keyword(), Some("out"));
    }
}
