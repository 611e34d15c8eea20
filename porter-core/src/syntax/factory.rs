//! Builds fresh syntax from symbols.
//!
//! Nodes produced here carry only the single spaces needed between tokens;
//! callers move the outer trivia of the node being replaced onto them.

use super::nodes::{ModifierList, Parameter, ParameterList, TypeSyntax};
use super::token::{Token, TriviaList};
use crate::semantic::symbols::is_name_char;
use crate::semantic::{Accessibility, ParameterSymbol, TypeRef};

/// A bare token followed by one space.
pub fn keyword(text: &str) -> Token {
    Token::new(text).with_trailing(TriviaList::space())
}

/// Tokens for a type reference, spelled the way C# source would spell it.
pub fn type_syntax(ty: &TypeRef) -> TypeSyntax {
    let text = ty.display();
    let mut tokens = Vec::new();
    let mut name = String::new();

    for c in text.chars() {
        if is_name_char(c) {
            name.push(c);
            continue;
        }
        if !name.is_empty() {
            tokens.push(Token::new(std::mem::take(&mut name)));
        }
        if c == ' ' {
            if let Some(last) = tokens.last_mut() {
                last.trailing = TriviaList::space();
            }
            continue;
        }
        tokens.push(Token::new(c.to_string()));
    }
    if !name.is_empty() {
        tokens.push(Token::new(name));
    }

    TypeSyntax::new(tokens)
}

/// A parameter declaring `symbol`, e.g. `ref int count = 0`.
pub fn parameter(symbol: &ParameterSymbol) -> Parameter {
    let mut modifiers = Vec::new();
    if symbol.is_params {
        modifiers.push(keyword("params"));
    }
    if let Some(kw) = symbol.ref_kind.keyword() {
        modifiers.push(keyword(kw));
    }

    let mut ty = type_syntax(&symbol.ty);
    if let Some(last) = ty.tokens.last_mut() {
        last.trailing = TriviaList::space();
    }

    let mut identifier = Token::new(symbol.name.clone());
    let default = match &symbol.default_value {
        Some(value) => {
            identifier.trailing = TriviaList::space();
            vec![keyword("="), Token::new(value.clone())]
        }
        None => Vec::new(),
    };

    Parameter {
        modifiers,
        ty: Some(ty),
        identifier,
        default,
    }
}

/// `(a, b, c)` built from parameter symbols.
pub fn parameter_list(parameters: &[ParameterSymbol]) -> ParameterList {
    let parameters: Vec<Parameter> = parameters.iter().map(parameter).collect();
    let separators = (1..parameters.len()).map(|_| keyword(",")).collect();

    ParameterList {
        open: Token::new("("),
        parameters,
        separators,
        close: Token::new(")"),
    }
}

/// Access keywords for `accessibility`, then `rest`, each followed by a space.
pub fn modifier_list<'a>(
    accessibility: Accessibility,
    rest: impl IntoIterator<Item = &'a str>,
) -> ModifierList {
    let mut tokens: Vec<Token> = accessibility.keywords().iter().map(|k| keyword(k)).collect();
    tokens.extend(rest.into_iter().map(keyword));
    ModifierList::new(tokens)
}
