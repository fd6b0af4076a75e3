//! GraphViz dump of pool contents
//!
//! Read-only rendering of the whole object pool for external
//! visualization tooling; never mutates state and is not re-parsed by
//! this crate.

use crate::codec::PayloadCodec;
use crate::error::Result;
use crate::tree::Tree;
use std::io::Write;

/// Dump the tree's pool as a GraphViz digraph
///
/// One record per pool slot (free slots render greyed), one edge per
/// parent→child relation and one dotted edge per sibling link. Payload
/// cells come from the codec's single-line `format_payload` hook.
pub fn dump_graphviz<T, C>(tree: &Tree<T>, codec: &C, out: &mut dyn Write) -> Result<()>
where
    C: PayloadCodec<Value = T>,
{
    writeln!(out, "digraph arbor {{")?;
    writeln!(out, "\tnode [shape=record]")?;
    writeln!(out, "\tsubgraph cluster_pool {{")?;

    for (index, value) in tree.pool().slots() {
        match value {
            Some(node) => {
                let mut buf = Vec::new();
                codec.format_payload(node.payload(), &mut buf)?;
                let payload = escape_record(&String::from_utf8_lossy(&buf));
                let parent = if node.parent().is_some() {
                    node.parent().index().to_string()
                } else {
                    "none".to_string()
                };
                writeln!(
                    out,
                    "\t\tnode{} [label=\"Node {} | {{parent | {}}} | {{payload | {}}}\"]",
                    index, index, parent, payload
                )?;
            }
            None => {
                writeln!(
                    out,
                    "\t\tnode{} [label=\"Slot {} | free\" color=gray]",
                    index, index
                )?;
            }
        }
    }
    writeln!(out, "\t}}")?;

    for (index, value) in tree.pool().slots() {
        if let Some(node) = value {
            if node.parent().is_some() {
                writeln!(out, "\tnode{} -> node{}", node.parent().index(), index)?;
            }
            if node.next_sibling().is_some() {
                writeln!(
                    out,
                    "\tnode{} -> node{} [style=dotted]",
                    index,
                    node.next_sibling().index()
                )?;
            }
        }
    }

    writeln!(out, "}}")?;
    Ok(())
}

/// Escape characters that delimit GraphViz record labels.
fn escape_record(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' | '}' | '|' | '<' | '>' | '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TextPayload;
    use crate::error::Result;

    #[test]
    fn test_dump_records_and_edges() -> Result<()> {
        let mut tree = Tree::new();
        let root = tree.root();
        *tree.payload_mut(root)? = 10;
        let a = tree.add_child(root, 20)?;
        tree.add_child(root, 30)?;
        tree.add_child(a, 40)?;

        let mut out = Vec::new();
        dump_graphviz(&tree, &TextPayload::new(), &mut out)?;
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("digraph arbor {"));
        assert!(text.contains("node [shape=record]"));
        assert!(text.contains("{parent | none} | {payload | 10}"));
        // root -> both children, first child -> grandchild
        assert!(text.contains("\tnode0 -> node1\n"));
        assert!(text.contains("\tnode0 -> node2\n"));
        assert!(text.contains("\tnode1 -> node3\n"));
        // sibling link is dotted
        assert!(text.contains("\tnode1 -> node2 [style=dotted]\n"));
        assert!(text.ends_with("}\n"));
        Ok(())
    }

    #[test]
    fn test_dump_marks_free_slots() -> Result<()> {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.add_child(root, 1)?;
        tree.add_child(root, 2)?;
        tree.remove_child(root, 0)?;

        let mut out = Vec::new();
        dump_graphviz(&tree, &TextPayload::new(), &mut out)?;
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Slot 1 | free"));
        Ok(())
    }

    #[test]
    fn test_record_escaping() {
        assert_eq!(escape_record("a|b"), "a\\|b");
        assert_eq!(escape_record("{x}"), "\\{x\\}");
        assert_eq!(escape_record("plain"), "plain");
    }
}
