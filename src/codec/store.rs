//! Bracketed-text serializer

use super::payload::{indent, PayloadCodec};
use crate::error::Result;
use crate::pool::NodeId;
use crate::tree::Tree;
use std::io::Write;

/// Store a whole tree, root first.
pub fn store_tree<T, C>(tree: &Tree<T>, codec: &C, out: &mut dyn Write) -> Result<()>
where
    C: PayloadCodec<Value = T>,
{
    store_subtree(tree, tree.root(), 0, codec, out)
}

/// Store the subtree rooted at `id`
///
/// Preorder emit of the bracket grammar: `{`, the `[`..`]` payload block
/// written by the payload hook, each child in sibling order, then `}`.
/// Indentation is `level` tabs per structural line, payload lines get
/// two more levels; purely cosmetic.
pub fn store_subtree<T, C>(
    tree: &Tree<T>,
    id: NodeId,
    level: usize,
    codec: &C,
    out: &mut dyn Write,
) -> Result<()>
where
    C: PayloadCodec<Value = T>,
{
    indent(out, level)?;
    writeln!(out, "{{")?;

    indent(out, level + 1)?;
    writeln!(out, "[")?;
    codec.write_payload(tree.payload(id)?, level + 2, out)?;
    indent(out, level + 1)?;
    writeln!(out, "]")?;

    for child in tree.children(id)? {
        store_subtree(tree, child, level + 1, codec, out)?;
    }

    indent(out, level)?;
    writeln!(out, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TextPayload;

    #[test]
    fn test_store_two_level_tree_exact_bytes() -> Result<()> {
        let mut tree = Tree::new();
        let root = tree.root();
        *tree.payload_mut(root)? = 42;
        tree.add_child(root, 42)?;

        let mut out = Vec::new();
        store_tree(&tree, &TextPayload::new(), &mut out)?;

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n\t[\n\t\t42\n\t]\n\t{\n\t\t[\n\t\t\t42\n\t\t]\n\t}\n}\n"
        );
        Ok(())
    }

    #[test]
    fn test_store_sibling_order() -> Result<()> {
        let mut tree = Tree::new();
        let root = tree.root();
        *tree.payload_mut(root)? = 1;
        tree.add_child(root, 2)?;
        tree.add_child(root, 3)?;

        let mut out = Vec::new();
        store_tree(&tree, &TextPayload::new(), &mut out)?;
        let text = String::from_utf8(out).unwrap();

        let pos2 = text.find("\t\t\t2\n").unwrap();
        let pos3 = text.find("\t\t\t3\n").unwrap();
        assert!(pos2 < pos3);
        Ok(())
    }
}
