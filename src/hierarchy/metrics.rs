use crate::hierarchy::tree::ModuleTree;

/// Summary figures of a built tree, shown by schema editors to hint at how
/// heavy a module has become.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HierarchyMetrics {
    pub field_count: usize,
    pub rule_count: usize,
    pub max_depth: usize,
    /// Weighted blend of size, rule load, and nesting. The weights are an
    /// implementation detail, not a contract; only relative comparisons
    /// between modules are meaningful.
    pub complexity_score: f64,
}

impl HierarchyMetrics {
    pub fn measure(tree: &ModuleTree) -> Self {
        let field_count = tree.len();
        let rule_count = tree
            .fields_in_order()
            .map(|node| node.definition().rules.len())
            .sum();
        let max_depth = tree
            .fields_in_order()
            .map(|node| node.depth())
            .max()
            .unwrap_or(0);

        let complexity_score =
            field_count as f64 + 1.5 * rule_count as f64 + 2.0 * max_depth as f64;

        Self {
            field_count,
            rule_count,
            max_depth,
            complexity_score,
        }
    }
}
