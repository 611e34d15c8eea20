//! Leaves rule notes next to rewritten declarations.

use super::kinds::OverridableDeclaration;
use crate::syntax::{Token, Trivia};

/// `/* note */`, with any `*/` in the note defused.
pub fn block_comment(note: &str) -> Trivia {
    Trivia::BlockComment(format!("/* {} */", note.trim().replace("*/", "* /")))
}

/// Put the comment right after `token`, ahead of its existing trailing trivia.
/// Returns false if the same comment is already there.
pub fn attach(token: &mut Token, note: &str) -> bool {
    let comment = block_comment(note);
    if token.trailing.contains(&comment) {
        return false;
    }
    token.trailing.insert(0, comment);
    token.trailing.insert(0, Trivia::Whitespace(" ".to_string()));
    true
}

/// Annotate a declaration on its anchor token.
pub fn annotate<D: OverridableDeclaration>(mut node: D, note: &str) -> D {
    attach(node.annotation_anchor_mut(), note);
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{SourceText, TriviaList};

    #[test]
    fn test_attach_before_existing_trivia() {
        let mut token = Token::new(")").with_trailing(TriviaList::parse(" // old\n"));
        assert!(attach(&mut token, "Note: Removed. Use Foo"));
        assert_eq!(token.to_source(), ") /* Note: Removed. Use Foo */ // old\n");
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut token = Token::new("Scale").with_trailing(TriviaList::space());
        assert!(attach(&mut token, "changed"));
        assert!(!attach(&mut token, "changed"));
        assert_eq!(token.to_source(), "Scale /* changed */ ");
    }

    #[test]
    fn test_block_comment_escapes_terminator() {
        assert_eq!(
            block_comment("a */ b"),
            Trivia::BlockComment("/* a * / b */".to_string())
        );
    }
}
