use ahash::AHashMap;

use crate::schema::{DisplayOption, FieldDefinition};

/// One field of a built tree. Wraps the wire definition and carries the
/// resolved position (parent, path, depth) and resolved options.
///
/// Nodes are created fresh on every build and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub(crate) definition: FieldDefinition,
    pub(crate) parent: Option<String>,
    pub(crate) children: Vec<String>,
    pub(crate) path: Vec<String>,
    pub(crate) depth: usize,
    pub(crate) options: Vec<DisplayOption>,
}

impl FieldNode {
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    /// Resolved parent id. `None` for roots, including fields demoted to
    /// root because of a dangling parent reference or a fixed cycle.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Child ids in traversal order (ascending `order`, then declaration).
    pub fn child_ids(&self) -> &[String] {
        &self.children
    }

    /// Ancestor id chain from the root down to (excluding) this node.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Distance from the resolved root; roots have depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Options resolved at build time, either copied from the inline list
    /// or fetched from the referenced code set. Empty when a code-set
    /// fetch failed.
    pub fn options(&self) -> &[DisplayOption] {
        &self.options
    }
}

/// The built, immutable hierarchy of one module's fields.
///
/// Nodes live in an id-indexed arena and relate to each other through id
/// references, so the tree is freely shareable across threads and cheap to
/// diff in tests. Lookup by id is O(1); traversal order is precomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleTree {
    pub(crate) nodes: AHashMap<String, FieldNode>,
    pub(crate) roots: Vec<String>,
    pub(crate) ordered: Vec<String>,
}

impl ModuleTree {
    pub fn get(&self, id: &str) -> Option<&FieldNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes in traversal order.
    pub fn roots(&self) -> impl Iterator<Item = &FieldNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// All nodes in depth-first pre-order: every parent strictly before
    /// its children, siblings ascending by `order`. The iterator is lazy
    /// and restartable.
    pub fn fields_in_order(&self) -> impl Iterator<Item = &FieldNode> {
        self.ordered.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Ancestors of `id`, nearest parent first. Empty for roots and
    /// unknown ids.
    pub fn ancestors(&self, id: &str) -> Vec<&FieldNode> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(id).and_then(|n| n.parent.as_deref());
        while let Some(parent_id) = current {
            match self.nodes.get(parent_id) {
                Some(parent) => {
                    out.push(parent);
                    current = parent.parent.as_deref();
                }
                None => break,
            }
        }
        out
    }

    /// All transitive children of `id` in pre-order. Empty for leaves and
    /// unknown ids.
    pub fn descendants(&self, id: &str) -> Vec<&FieldNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&str> = match self.nodes.get(id) {
            Some(node) => node.children.iter().rev().map(String::as_str).collect(),
            None => return out,
        };
        while let Some(child_id) = stack.pop() {
            if let Some(child) = self.nodes.get(child_id) {
                out.push(child);
                for grandchild in child.children.iter().rev() {
                    stack.push(grandchild);
                }
            }
        }
        out
    }
}
