//! Lossless syntax tree for C# declarations.
//!
//! The tree keeps every token together with its trivia, so rewriting one part
//! of a declaration leaves the rest of the file byte-for-byte intact.

pub mod factory;
pub mod nodes;
pub mod token;
pub mod visit;

pub use nodes::{
    CompilationUnit, ContainerDeclaration, ContainerKind, MemberDeclaration, MethodDeclaration,
    ModifierList, Parameter, ParameterList, PropertyDeclaration, SourceText, TypeSyntax,
};
pub use token::{Token, Trivia, TriviaList};
pub use visit::{Scope, SyntaxRewriter, TypeScope};
