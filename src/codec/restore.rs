//! Recursive-descent restorer for the bracketed-text format

use super::payload::{is_token, LineSource, PayloadCodec};
use crate::error::{Error, Result};
use crate::pool::NodeId;
use crate::tree::Tree;
use std::io::BufRead;
use tracing::debug;

/// Restore a tree from its textual form
///
/// Builds a fresh tree and, when the first line is a `{` token, restores
/// the stored structure into the existing root node (no extra
/// allocation). Any other first line, including immediate end of input,
/// yields the bare-root tree; that is not an error.
pub fn restore_tree<T, C>(codec: &C, input: &mut dyn BufRead) -> Result<Tree<T>>
where
    T: Default,
    C: PayloadCodec<Value = T>,
{
    let mut tree = Tree::new();
    let mut lines = LineSource::new(input);
    match lines.next_line()? {
        Some(line) if is_token(&line, '{') => {
            let root = tree.root();
            restore_subtree(&mut tree, root, codec, &mut lines)?;
            debug!("restored tree with {} nodes", tree.node_count());
        }
        _ => debug!("input does not start with '{{', returning bare root"),
    }
    Ok(tree)
}

/// Restore the body of one node whose `{` line was already consumed
///
/// Each `{` line opens a child: it is allocated with a default payload,
/// linked after the previously restored child through the same splice
/// primitive the tree's own insertion uses, and recursed into. A `[`
/// line hands the input over to the payload hook, which fills this
/// node's payload. The matching `}` line ends the node; end of input
/// before that is a restoration error. Other lines are skipped.
pub fn restore_subtree<T, C>(
    tree: &mut Tree<T>,
    id: NodeId,
    codec: &C,
    lines: &mut LineSource<'_>,
) -> Result<()>
where
    T: Default,
    C: PayloadCodec<Value = T>,
{
    let mut last_child = NodeId::NONE;
    loop {
        let line = lines.next_line()?.ok_or_else(|| {
            Error::Restore(format!(
                "unexpected end of input after line {}",
                lines.line_number()
            ))
        })?;

        if is_token(&line, '{') {
            let child = tree.alloc_detached(T::default())?;
            tree.link_child_after(id, last_child, child)?;
            last_child = child;
            restore_subtree(tree, child, codec, lines)?;
        } else if is_token(&line, '}') {
            return Ok(());
        } else if is_token(&line, '[') {
            *tree.payload_mut(id)? = codec.read_payload(lines)?;
        }
        // stray content between tokens is tolerated and skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{store_tree, TextPayload};

    fn payloads_under(tree: &Tree<i32>, id: NodeId) -> Vec<i32> {
        tree.children(id)
            .unwrap()
            .map(|child| *tree.payload(child).unwrap())
            .collect()
    }

    #[test]
    fn test_restore_nested_input() -> Result<()> {
        let text = "{\n\t[\n\t\t1\n\t]\n\t{\n\t\t[\n\t\t\t2\n\t\t]\n\t}\n\t{\n\t\t[\n\t\t\t3\n\t\t]\n\t\t{\n\t\t\t[\n\t\t\t\t4\n\t\t\t]\n\t\t}\n\t}\n}\n";
        let tree: Tree<i32> = restore_tree(&TextPayload::new(), &mut text.as_bytes())?;

        let root = tree.root();
        assert_eq!(*tree.payload(root)?, 1);
        assert_eq!(payloads_under(&tree, root), vec![2, 3]);

        let second = tree.child_at(root, 1)?;
        assert_eq!(payloads_under(&tree, second), vec![4]);
        assert_eq!(tree.node_count(), 4);
        Ok(())
    }

    #[test]
    fn test_restore_empty_input_gives_bare_root() -> Result<()> {
        let tree: Tree<i32> = restore_tree(&TextPayload::new(), &mut "".as_bytes())?;
        assert_eq!(tree.node_count(), 1);
        assert_eq!(*tree.payload(tree.root())?, 0);
        Ok(())
    }

    #[test]
    fn test_restore_non_brace_input_gives_bare_root() -> Result<()> {
        let tree: Tree<i32> = restore_tree(&TextPayload::new(), &mut "hello\n".as_bytes())?;
        assert_eq!(tree.node_count(), 1);
        Ok(())
    }

    #[test]
    fn test_restore_premature_eof_fails() {
        let text = "{\n\t[\n\t\t1\n\t]\n\t{\n";
        let result: Result<Tree<i32>> = restore_tree(&TextPayload::new(), &mut text.as_bytes());
        assert!(matches!(result, Err(Error::Restore(_))));
    }

    #[test]
    fn test_roundtrip_preserves_shape_and_payloads() -> Result<()> {
        let mut tree = Tree::new();
        let root = tree.root();
        *tree.payload_mut(root)? = 1000;
        let a = tree.add_child(root, 1100)?;
        tree.add_child(root, 1200)?;
        tree.add_child(a, 2100)?;
        tree.add_child(a, 2200)?;

        let mut text = Vec::new();
        store_tree(&tree, &TextPayload::new(), &mut text)?;
        let restored: Tree<i32> = restore_tree(&TextPayload::new(), &mut text.as_slice())?;

        assert_eq!(restored.node_count(), tree.node_count());
        let restored_root = restored.root();
        assert_eq!(*restored.payload(restored_root)?, 1000);
        assert_eq!(payloads_under(&restored, restored_root), vec![1100, 1200]);
        let restored_a = restored.first_child(restored_root)?;
        assert_eq!(payloads_under(&restored, restored_a), vec![2100, 2200]);
        Ok(())
    }
}
