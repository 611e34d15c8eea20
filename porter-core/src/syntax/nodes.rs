//! Declaration nodes of the lossless tree.
//!
//! Only the parts of a declaration the reconciler reads or replaces get their
//! own structure; everything else (attributes, bodies, accessor lists) is kept
//! as an opaque token run so it renders back untouched.

use serde::{Deserialize, Serialize};

use super::token::{tokens_text, write_tokens, Token, TriviaList};
use crate::semantic::symbols::is_name_char;

/// Anything that can render itself back to source text.
pub trait SourceText {
    fn write_source(&self, out: &mut String);

    fn to_source(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }
}

impl SourceText for Token {
    fn write_source(&self, out: &mut String) {
        Token::write_source(self, out);
    }
}

/// The token span of a type reference, e.g. `List<int>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSyntax {
    pub tokens: Vec<Token>,
}

impl TypeSyntax {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Type text without trivia. Adjacent words keep one space between them,
    /// so `ref int` doesn't read as `refint`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            let joins_words = out.ends_with(is_name_char)
                && token.text.starts_with(is_name_char)
                && !token.text.starts_with('.')
                && !out.ends_with('.');
            if joins_words {
                out.push(' ');
            }
            out.push_str(&token.text);
        }
        out
    }
}

impl SourceText for TypeSyntax {
    fn write_source(&self, out: &mut String) {
        write_tokens(&self.tokens, out);
    }
}

/// Declaration modifiers such as `public override`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierList {
    pub tokens: Vec<Token>,
}

impl ModifierList {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.text.as_str())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords().any(|k| k == keyword)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl SourceText for ModifierList {
    fn write_source(&self, out: &mut String) {
        write_tokens(&self.tokens, out);
    }
}

/// A single formal parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Attributes and parameter modifiers (`ref`, `out`, `in`, `params`, `this`).
    pub modifiers: Vec<Token>,
    /// Absent only for implicitly typed lambda-style parameters.
    pub ty: Option<TypeSyntax>,
    pub identifier: Token,
    /// `= value` including the equals sign.
    pub default: Vec<Token>,
}

impl Parameter {
    pub fn modifier_keywords(&self) -> impl Iterator<Item = &str> {
        self.modifiers.iter().map(|t| t.text.as_str())
    }

    /// Default value text without the `=`.
    pub fn default_text(&self) -> Option<String> {
        match self.default.split_first() {
            Some((eq, rest)) if eq.text == "=" && !rest.is_empty() => Some(tokens_text(rest)),
            _ => None,
        }
    }
}

impl SourceText for Parameter {
    fn write_source(&self, out: &mut String) {
        write_tokens(&self.modifiers, out);
        if let Some(ty) = &self.ty {
            ty.write_source(out);
        }
        self.identifier.write_source(out);
        write_tokens(&self.default, out);
    }
}

/// `( parameter, parameter )`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterList {
    pub open: Token,
    pub parameters: Vec<Parameter>,
    /// The commas between parameters; always one fewer than `parameters`.
    pub separators: Vec<Token>,
    pub close: Token,
}

impl SourceText for ParameterList {
    fn write_source(&self, out: &mut String) {
        self.open.write_source(out);
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                if let Some(separator) = self.separators.get(i - 1) {
                    separator.write_source(out);
                }
            }
            parameter.write_source(out);
        }
        self.close.write_source(out);
    }
}

/// A method declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub attributes: Vec<Token>,
    pub modifiers: ModifierList,
    pub return_type: TypeSyntax,
    /// `IFoo.` for explicit interface implementations.
    pub explicit_interface: Vec<Token>,
    pub identifier: Token,
    pub type_parameters: Vec<Token>,
    pub parameter_list: ParameterList,
    /// Constraint clauses and the block, expression body or `;`.
    pub body: Vec<Token>,
}

impl MethodDeclaration {
    pub fn name(&self) -> &str {
        &self.identifier.text
    }
}

impl SourceText for MethodDeclaration {
    fn write_source(&self, out: &mut String) {
        write_tokens(&self.attributes, out);
        self.modifiers.write_source(out);
        self.return_type.write_source(out);
        write_tokens(&self.explicit_interface, out);
        self.identifier.write_source(out);
        write_tokens(&self.type_parameters, out);
        self.parameter_list.write_source(out);
        write_tokens(&self.body, out);
    }
}

/// A property declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    pub attributes: Vec<Token>,
    pub modifiers: ModifierList,
    pub ty: TypeSyntax,
    pub explicit_interface: Vec<Token>,
    pub identifier: Token,
    /// Accessor list, expression body and initializer.
    pub body: Vec<Token>,
}

impl PropertyDeclaration {
    pub fn name(&self) -> &str {
        &self.identifier.text
    }
}

impl SourceText for PropertyDeclaration {
    fn write_source(&self, out: &mut String) {
        write_tokens(&self.attributes, out);
        self.modifiers.write_source(out);
        self.ty.write_source(out);
        write_tokens(&self.explicit_interface, out);
        self.identifier.write_source(out);
        write_tokens(&self.body, out);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerKind {
    Namespace,
    Type,
}

/// A namespace or type declaration holding further members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDeclaration {
    pub kind: ContainerKind,
    pub name: String,
    /// Base class and interfaces as written in the base list.
    pub base_types: Vec<String>,
    /// Everything up to and including the opening brace
    /// (or the `;` of a file-scoped namespace).
    pub header: Vec<Token>,
    pub members: Vec<MemberDeclaration>,
    /// Closing brace and optional trailing `;`.
    pub footer: Vec<Token>,
}

impl SourceText for ContainerDeclaration {
    fn write_source(&self, out: &mut String) {
        write_tokens(&self.header, out);
        for member in &self.members {
            member.write_source(out);
        }
        write_tokens(&self.footer, out);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberDeclaration {
    Method(MethodDeclaration),
    Property(PropertyDeclaration),
    Container(ContainerDeclaration),
    /// Declarations the reconciler never touches (fields, usings, ...).
    Other(Vec<Token>),
}

impl SourceText for MemberDeclaration {
    fn write_source(&self, out: &mut String) {
        match self {
            MemberDeclaration::Method(m) => m.write_source(out),
            MemberDeclaration::Property(p) => p.write_source(out),
            MemberDeclaration::Container(c) => c.write_source(out),
            MemberDeclaration::Other(tokens) => write_tokens(tokens, out),
        }
    }
}

/// A whole source file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub members: Vec<MemberDeclaration>,
    /// Trivia after the last token.
    pub end_of_file: TriviaList,
}

impl SourceText for CompilationUnit {
    fn write_source(&self, out: &mut String) {
        for member in &self.members {
            member.write_source(out);
        }
        self.end_of_file.write_source(out);
    }
}
