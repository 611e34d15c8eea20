//! C# frontend: tree-sitter parse tree to lossless declaration tree.
//!
//! Source is first cut into tokens (the non-empty leaves of the parse tree),
//! with everything between leaves kept as trivia. Declarations are then
//! assembled from token ranges covered by the tree-sitter nodes, so every
//! token lands in exactly one place and the tree renders back to the input.

use tree_sitter::{Node, Parser};
use tracing::warn;

use super::helpers::{
    field_or_kind, find_child_by_type, find_children_by_type, get_node_text, leaf_spans,
    named_children,
};
use crate::error::{PorterError, Result};
use crate::syntax::{
    CompilationUnit, ContainerDeclaration, ContainerKind, MemberDeclaration, MethodDeclaration,
    ModifierList, Parameter, ParameterList, PropertyDeclaration, Token, TriviaList, TypeSyntax,
};

const PARAMETER_MODIFIERS: &[&str] = &["this", "scoped", "ref", "out", "in", "readonly", "params"];

/// Parse C# source code.
pub fn parse(source: &str) -> Result<CompilationUnit> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
        .map_err(|e| PorterError::Parse {
            message: format!("Failed to set C# language: {}", e),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| PorterError::Parse {
        message: "Failed to parse C# source".to_string(),
    })?;
    let root = tree.root_node();
    if root.has_error() {
        warn!("C# source has syntax errors; unrecognised declarations are left as is");
    }

    let builder = Builder::new(source, &root);
    Ok(builder.unit(&root))
}

/// Tokens of one file plus the byte offset each starts at.
struct Builder<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    starts: Vec<usize>,
    end_of_file: TriviaList,
}

impl<'s> Builder<'s> {
    fn new(source: &'s str, root: &Node) -> Self {
        let mut tokens: Vec<Token> = Vec::new();
        let mut starts = Vec::new();
        let mut pos = 0;

        for (start, end) in leaf_spans(root) {
            if start < pos {
                continue;
            }
            let gap = &source[pos..start];
            let leading = match tokens.last_mut() {
                Some(prev) => {
                    let (trailing, leading) = TriviaList::split_gap(gap);
                    prev.trailing = trailing;
                    leading
                }
                None => TriviaList::parse(gap),
            };
            tokens.push(Token::new(&source[start..end]).with_leading(leading));
            starts.push(start);
            pos = end;
        }

        let tail = &source[pos..];
        let end_of_file = match tokens.last_mut() {
            Some(last) => {
                let (trailing, rest) = TriviaList::split_gap(tail);
                last.trailing = trailing;
                rest
            }
            None => TriviaList::parse(tail),
        };

        Self {
            source,
            tokens,
            starts,
            end_of_file,
        }
    }

    /// Index of the first token starting at or after `byte`.
    fn index(&self, byte: usize) -> usize {
        self.starts.partition_point(|&s| s < byte)
    }

    /// Token range covered by `node`.
    fn range(&self, node: &Node) -> (usize, usize) {
        (self.index(node.start_byte()), self.index(node.end_byte()))
    }

    fn take(&self, from: usize, to: usize) -> Vec<Token> {
        self.tokens[from..to].to_vec()
    }

    /// The single token covered by `node`.
    fn single(&self, node: &Node) -> Option<(usize, Token)> {
        let (a, b) = self.range(node);
        (b == a + 1).then(|| (a, self.tokens[a].clone()))
    }

    fn text(&self, node: &Node) -> String {
        get_node_text(node, self.source).to_string()
    }

    fn unit(self, root: &Node) -> CompilationUnit {
        let members = self.items(0, self.tokens.len(), named_children(root));
        CompilationUnit {
            members,
            end_of_file: self.end_of_file,
        }
    }

    /// Members covering tokens `from..to`. Tokens not claimed by any child
    /// become opaque members so nothing is dropped.
    fn items(&self, from: usize, to: usize, children: Vec<Node>) -> Vec<MemberDeclaration> {
        let mut members = Vec::new();
        let mut pos = from;

        for child in children {
            let (a, b) = self.range(&child);
            if a >= b || a < pos || b > to {
                continue;
            }
            if a > pos {
                members.push(MemberDeclaration::Other(self.take(pos, a)));
            }
            members.push(self.member(&child, a, b));
            pos = b;
        }
        if pos < to {
            members.push(MemberDeclaration::Other(self.take(pos, to)));
        }

        members
    }

    fn member(&self, node: &Node, a: usize, b: usize) -> MemberDeclaration {
        let structured = match node.kind() {
            "method_declaration" => self.method(node, a, b).map(MemberDeclaration::Method),
            "property_declaration" => self.property(node, a, b).map(MemberDeclaration::Property),
            "class_declaration"
            | "struct_declaration"
            | "record_declaration"
            | "record_struct_declaration"
            | "interface_declaration" => self.type_declaration(node, a, b),
            "namespace_declaration" => self.namespace(node, a, b),
            "file_scoped_namespace_declaration" => self.file_scoped_namespace(node, a, b),
            _ => None,
        };

        structured.unwrap_or_else(|| MemberDeclaration::Other(self.take(a, b)))
    }

    /// A container whose members sit in a `{ ... }` declaration list.
    fn braced(
        &self,
        kind: ContainerKind,
        name: String,
        base_types: Vec<String>,
        body: &Node,
        a: usize,
        b: usize,
    ) -> Option<MemberDeclaration> {
        let (open, end) = self.range(body);
        if self.tokens.get(open)?.text != "{" || open < a || end > b {
            return None;
        }
        let close = match self.tokens.get(end.checked_sub(1)?) {
            Some(token) if token.text == "}" && end - 1 > open => end - 1,
            _ => end,
        };

        Some(MemberDeclaration::Container(ContainerDeclaration {
            kind,
            name,
            base_types,
            header: self.take(a, open + 1),
            members: self.items(open + 1, close, named_children(body)),
            footer: self.take(close, b),
        }))
    }

    fn type_declaration(&self, node: &Node, a: usize, b: usize) -> Option<MemberDeclaration> {
        let name = self.text(&node.child_by_field_name("name")?);
        let base_types = find_child_by_type(node, "base_list")
            .map(|list| self.base_types(&list))
            .unwrap_or_default();
        let body = field_or_kind(node, "body", "declaration_list")?;

        self.braced(ContainerKind::Type, name, base_types, &body, a, b)
    }

    fn base_types(&self, list: &Node) -> Vec<String> {
        named_children(list)
            .iter()
            .filter_map(|child| match child.kind() {
                "argument_list" => None,
                "primary_constructor_base_type" => child.named_child(0).map(|ty| self.text(&ty)),
                _ => Some(self.text(child)),
            })
            .collect()
    }

    fn namespace(&self, node: &Node, a: usize, b: usize) -> Option<MemberDeclaration> {
        let name = self.text(&node.child_by_field_name("name")?);
        let body = field_or_kind(node, "body", "declaration_list")?;
        self.braced(ContainerKind::Namespace, name, Vec::new(), &body, a, b)
    }

    /// `namespace Foo;` followed by the rest of the file.
    fn file_scoped_namespace(&self, node: &Node, a: usize, b: usize) -> Option<MemberDeclaration> {
        let name_node = node.child_by_field_name("name")?;
        let semicolon = find_child_by_type(node, ";")?;
        let (_, header_end) = self.range(&semicolon);
        if header_end <= a || header_end > b {
            return None;
        }

        let members = named_children(node)
            .into_iter()
            .filter(|child| child.start_byte() >= semicolon.end_byte())
            .collect();

        Some(MemberDeclaration::Container(ContainerDeclaration {
            kind: ContainerKind::Namespace,
            name: self.text(&name_node),
            base_types: Vec::new(),
            header: self.take(a, header_end),
            members: self.items(header_end, b, members),
            footer: Vec::new(),
        }))
    }

    /// End of the attribute lists in front of a member's modifiers.
    fn attributes_end(&self, node: &Node, a: usize) -> usize {
        find_children_by_type(node, "attribute_list")
            .iter()
            .map(|list| self.range(list).1)
            .max()
            .unwrap_or(a)
    }

    fn method(&self, node: &Node, a: usize, b: usize) -> Option<MethodDeclaration> {
        let returns = node
            .child_by_field_name("returns")
            .or_else(|| node.child_by_field_name("type"))?;
        let name = node.child_by_field_name("name")?;
        let parameters = field_or_kind(node, "parameters", "parameter_list")?;

        let attributes_end = self.attributes_end(node, a);
        let (type_start, type_end) = self.range(&returns);
        let (name_index, identifier) = self.single(&name)?;
        let (params_start, params_end) = self.range(&parameters);

        let ordered = a <= attributes_end
            && attributes_end <= type_start
            && type_start < type_end
            && type_end <= name_index
            && name_index < params_start
            && params_end <= b;
        if !ordered {
            return None;
        }

        Some(MethodDeclaration {
            attributes: self.take(a, attributes_end),
            modifiers: ModifierList::new(self.take(attributes_end, type_start)),
            return_type: TypeSyntax::new(self.take(type_start, type_end)),
            explicit_interface: self.take(type_end, name_index),
            identifier,
            type_parameters: self.take(name_index + 1, params_start),
            parameter_list: self.parameter_list(&parameters)?,
            body: self.take(params_end, b),
        })
    }

    fn property(&self, node: &Node, a: usize, b: usize) -> Option<PropertyDeclaration> {
        let ty = node.child_by_field_name("type")?;
        let name = node.child_by_field_name("name")?;

        let attributes_end = self.attributes_end(node, a);
        let (type_start, type_end) = self.range(&ty);
        let (name_index, identifier) = self.single(&name)?;

        let ordered = a <= attributes_end
            && attributes_end <= type_start
            && type_start < type_end
            && type_end <= name_index
            && name_index < b;
        if !ordered {
            return None;
        }

        Some(PropertyDeclaration {
            attributes: self.take(a, attributes_end),
            modifiers: ModifierList::new(self.take(attributes_end, type_start)),
            ty: TypeSyntax::new(self.take(type_start, type_end)),
            explicit_interface: self.take(type_end, name_index),
            identifier,
            body: self.take(name_index + 1, b),
        })
    }

    fn parameter_list(&self, node: &Node) -> Option<ParameterList> {
        let mut open = None;
        let mut close = None;
        let mut parameters = Vec::new();
        let mut separators = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_extra() {
                continue;
            }
            match child.kind() {
                "(" => open = Some(self.single(&child)?.1),
                ")" => close = Some(self.single(&child)?.1),
                "," => separators.push(self.single(&child)?.1),
                "parameter" => parameters.push(self.parameter(&child)?),
                _ => return None,
            }
        }

        if separators.len() + 1 != parameters.len() && !(parameters.is_empty() && separators.is_empty()) {
            return None;
        }

        Some(ParameterList {
            open: open?,
            parameters,
            separators,
            close: close?,
        })
    }

    fn parameter(&self, node: &Node) -> Option<Parameter> {
        let (a, b) = self.range(node);
        let name = node.child_by_field_name("name")?;
        let (name_index, identifier) = self.single(&name)?;

        let (modifiers, ty) = match node.child_by_field_name("type") {
            Some(ty) => {
                let (mut type_start, type_end) = self.range(&ty);
                if type_start < a || type_start >= type_end || type_end != name_index {
                    return None;
                }
                // `ref int x` may come back with `ref` inside the type node.
                while type_end - type_start > 1
                    && PARAMETER_MODIFIERS.contains(&self.tokens[type_start].text.as_str())
                {
                    type_start += 1;
                }
                (
                    self.take(a, type_start),
                    Some(TypeSyntax::new(self.take(type_start, type_end))),
                )
            }
            None => (self.take(a, name_index), None),
        };

        Some(Parameter {
            modifiers,
            ty,
            identifier,
            default: self.take(name_index + 1, b),
        })
    }
}
