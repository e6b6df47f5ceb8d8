//! Outline rendering of syntax trees.

use crate::syntax::SyntaxNode;
use std::fmt;

/// Renders a node and its descendants, one node per line:
///
/// ```text
/// └──BinaryExpression
///     ├──NumberExpression
///     │   └──Number 1
///     ├──PlusOperator
///     └──NumberExpression
///         └──Number 2
/// ```
pub struct TreeDisplay<'a> {
    root: SyntaxNode<'a>,
}

impl<'a> TreeDisplay<'a> {
    pub fn new(root: impl Into<SyntaxNode<'a>>) -> Self {
        TreeDisplay { root: root.into() }
    }

    pub fn lines(&self) -> Vec<String> {
        self.to_string().lines().map(str::to_string).collect()
    }
}

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // (node, depth, is_last); `rails[d]` is whether the ancestor at depth d
        // was the last of its siblings.
        let mut stack = vec![(self.root, 0, true)];
        let mut rails: Vec<bool> = Vec::new();

        while let Some((node, depth, is_last)) = stack.pop() {
            rails.truncate(depth);
            for &last in &rails {
                f.write_str(if last { "    " } else { "│   " })?;
            }
            f.write_str(if is_last { "└──" } else { "├──" })?;
            write!(f, "{}", node.kind())?;
            if let SyntaxNode::Token(token) = node {
                if let Some(value) = token.value {
                    write!(f, " {}", value)?;
                }
            }
            writeln!(f)?;
            rails.push(is_last);

            let children = node.children();
            let last = children.len().saturating_sub(1);
            stack.extend(
                children
                    .into_iter()
                    .enumerate()
                    .rev()
                    .map(|(i, child)| (child, depth + 1, i == last)),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxTree;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_nested_tree() {
        let tree = SyntaxTree::parse("1+(2)");
        let expected = "\
└──BinaryExpression
    ├──NumberExpression
    │   └──Number 1
    ├──PlusOperator
    └──BracketedExpression
        ├──OpenBracket
        ├──NumberExpression
        │   └──Number 2
        └──CloseBracket
";
        assert_eq!(TreeDisplay::new(&tree.root).to_string(), expected);
    }

    #[test]
    fn placeholder_number_has_no_value() {
        let tree = SyntaxTree::parse("");
        assert_eq!(
            TreeDisplay::new(&tree.root).lines(),
            ["└──NumberExpression", "    └──Number"]
        );
    }

    #[test]
    fn deep_tree_renders() {
        let tree = SyntaxTree::parse(&vec!["2"; 2_000].join("*"));
        let lines = TreeDisplay::new(&tree.root).lines();
        // Four lines per product plus two for the leftmost operand.
        assert_eq!(lines.len(), 1_999 * 4 + 2);
        assert_eq!(lines[0], "└──BinaryExpression");
        assert_eq!(lines.last().map(String::as_str), Some("        └──Number 2"));
    }

    #[test]
    fn single_token() {
        let tree = SyntaxTree::parse("5");
        assert_eq!(TreeDisplay::new(&tree.end_of_file).to_string(), "└──EndOfFile\n");
    }
}
