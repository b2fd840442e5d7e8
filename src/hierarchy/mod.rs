//! Converts a flat field-definition array into an indexed, immutable
//! [`ModuleTree`], resolving code sets and reporting structural defects.

use ahash::{AHashMap, AHashSet};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::codeset::CodeSetProvider;
use crate::error::{BuildCancelled, BuildWarning, SchemaError, ValidationResult};
use crate::schema::{DisplayOption, FieldDefinition};

mod autofix;
mod metrics;
mod tree;

pub use autofix::auto_fix;
pub use metrics::HierarchyMetrics;
pub use tree::{FieldNode, ModuleTree};

/// How a build reacts to a parent cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleMode {
    /// A cycle is a fatal [`SchemaError::CycleDetected`]; no tree is built.
    #[default]
    Strict,
    /// Every field on a parent cycle is demoted to a root and a
    /// [`BuildWarning::CycleDemoted`] is recorded.
    AutoFix,
}

/// Everything a build produces. `tree` is `None` exactly when
/// `validation` holds at least one error; the build is all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub tree: Option<ModuleTree>,
    pub validation: ValidationResult,
    pub metrics: HierarchyMetrics,
}

/// Builds [`ModuleTree`]s from flat field arrays.
///
/// The builder itself is cheap and reusable; each [`build`](Self::build)
/// call starts from scratch, so a changed schema simply gets rebuilt. Code
/// sets referenced by the fields are fetched through the provider, once
/// per distinct id per build.
pub struct HierarchyBuilder<'p, P: CodeSetProvider + ?Sized> {
    provider: &'p P,
    cycle_mode: CycleMode,
    cancel: CancellationToken,
}

impl<'p, P: CodeSetProvider + ?Sized> HierarchyBuilder<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            cycle_mode: CycleMode::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cycle_mode(mut self, mode: CycleMode) -> Self {
        self.cycle_mode = mode;
        self
    }

    /// Attaches a cancellation token. The build checks it between field
    /// resolutions and before dispatching fetches; once it fires the build
    /// returns [`BuildCancelled`] and yields no partial result.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Validates the fields, builds the tree, and resolves code sets.
    ///
    /// Structural errors never escape as `Err`; they come back inside
    /// [`BuildOutput::validation`] with `tree` unset, so an editor can
    /// render them without crashing. Only cancellation is an `Err`.
    pub async fn build(
        &self,
        fields: &[FieldDefinition],
    ) -> Result<BuildOutput, BuildCancelled> {
        let mut validation = ValidationResult::default();

        let by_id = self.check_unique_ids(fields, &mut validation);
        self.validate_rules(fields, &mut validation);

        if !validation.is_valid() {
            return Ok(BuildOutput {
                tree: None,
                validation,
                metrics: HierarchyMetrics::default(),
            });
        }

        let parents = self.resolve_parents(fields, &by_id, &mut validation)?;
        if !validation.is_valid() {
            return Ok(BuildOutput {
                tree: None,
                validation,
                metrics: HierarchyMetrics::default(),
            });
        }

        let mut tree = assemble_tree(fields, &parents);
        self.resolve_code_sets(fields, &mut tree, &mut validation)
            .await?;

        let metrics = HierarchyMetrics::measure(&tree);
        debug!(
            fields = metrics.field_count,
            max_depth = metrics.max_depth,
            "module tree built"
        );

        Ok(BuildOutput {
            tree: Some(tree),
            validation,
            metrics,
        })
    }

    /// Maps field id to declaration index, recording one error per
    /// duplicated id.
    fn check_unique_ids<'f>(
        &self,
        fields: &'f [FieldDefinition],
        validation: &mut ValidationResult,
    ) -> AHashMap<&'f str, usize> {
        let mut by_id: AHashMap<&str, usize> = AHashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if by_id.insert(field.id.as_str(), index).is_some() {
                validation.error(SchemaError::DuplicateFieldId {
                    id: field.id.clone(),
                });
            }
        }
        by_id
    }

    fn validate_rules(&self, fields: &[FieldDefinition], validation: &mut ValidationResult) {
        for field in fields {
            for rule in &field.rules {
                if let Err(error) = rule.validate() {
                    validation.error(error);
                }
            }
        }
    }

    /// Resolves each field's effective parent, demoting orphans (always)
    /// and cycle members (auto-fix mode) to roots.
    fn resolve_parents(
        &self,
        fields: &[FieldDefinition],
        by_id: &AHashMap<&str, usize>,
        validation: &mut ValidationResult,
    ) -> Result<Vec<Option<String>>, BuildCancelled> {
        let mut parents = Vec::with_capacity(fields.len());

        for field in fields {
            if self.cancel.is_cancelled() {
                return Err(BuildCancelled);
            }

            let Some(declared) = field.parent_id.as_deref() else {
                parents.push(None);
                continue;
            };

            if !by_id.contains_key(declared) {
                // Non-fatal: partially broken drafts stay editable.
                validation.warn(BuildWarning::DanglingParent {
                    field_id: field.id.clone(),
                    parent_id: declared.to_string(),
                });
                parents.push(None);
                continue;
            }

            if on_parent_cycle(field, fields, by_id) {
                match self.cycle_mode {
                    CycleMode::Strict => {
                        validation.error(SchemaError::CycleDetected {
                            field_id: field.id.clone(),
                        });
                        parents.push(None);
                    }
                    CycleMode::AutoFix => {
                        validation.warn(BuildWarning::CycleDemoted {
                            field_id: field.id.clone(),
                        });
                        parents.push(None);
                    }
                }
                continue;
            }

            parents.push(Some(declared.to_string()));
        }

        Ok(parents)
    }

    /// Fetches all distinct referenced code sets concurrently and attaches
    /// the resulting options. Failures and absent ids become warnings.
    async fn resolve_code_sets(
        &self,
        fields: &[FieldDefinition],
        tree: &mut ModuleTree,
        validation: &mut ValidationResult,
    ) -> Result<(), BuildCancelled> {
        let mut wanted: Vec<&str> = Vec::new();
        let mut seen: AHashSet<&str> = AHashSet::new();
        for field in fields {
            if let Some(id) = field.code_set_id.as_deref()
                && field.wants_code_set()
                && seen.insert(id)
            {
                wanted.push(id);
            }
        }
        if wanted.is_empty() {
            return Ok(());
        }
        if self.cancel.is_cancelled() {
            return Err(BuildCancelled);
        }

        // One fetch per distinct id, all in flight together; results are
        // cached for the rest of this build.
        let fetches = wanted
            .iter()
            .map(|id| self.provider.get_code_set_as_options(id));
        let results = join_all(fetches).await;

        if self.cancel.is_cancelled() {
            return Err(BuildCancelled);
        }

        let mut cache: AHashMap<&str, Option<Vec<DisplayOption>>> = AHashMap::new();
        let mut failures: AHashMap<&str, String> = AHashMap::new();
        for (id, result) in wanted.iter().zip(results) {
            match result {
                Ok(options) => {
                    cache.insert(id, options);
                }
                Err(error) => {
                    warn!(code_set = %id, %error, "code set fetch failed");
                    failures.insert(id, error.to_string());
                }
            }
        }

        for field in fields {
            let Some(set_id) = field.code_set_id.as_deref() else {
                continue;
            };
            if !field.wants_code_set() {
                continue;
            }
            match cache.get(set_id) {
                Some(Some(options)) => {
                    if let Some(node) = tree.nodes.get_mut(&field.id) {
                        node.options = options.clone();
                    }
                }
                Some(None) => {
                    validation.warn(BuildWarning::CodeSetUnresolved {
                        field_id: field.id.clone(),
                        code_set_id: set_id.to_string(),
                        reason: "code set not found at the source".to_string(),
                    });
                }
                None => {
                    let reason = failures
                        .get(set_id)
                        .cloned()
                        .unwrap_or_else(|| "fetch failed".to_string());
                    validation.warn(BuildWarning::CodeSetUnresolved {
                        field_id: field.id.clone(),
                        code_set_id: set_id.to_string(),
                        reason,
                    });
                }
            }
        }

        Ok(())
    }
}

/// True when `field` sits on a parent cycle, that is, walking its declared
/// parent chain leads back to `field` itself. A field whose chain merely
/// drains into someone else's cycle is not a member; it becomes valid once
/// the actual members are re-rooted. The visited set bounds the walk.
fn on_parent_cycle(
    field: &FieldDefinition,
    fields: &[FieldDefinition],
    by_id: &AHashMap<&str, usize>,
) -> bool {
    let mut visited: AHashSet<&str> = AHashSet::new();

    let mut current = field.parent_id.as_deref();
    while let Some(id) = current {
        if id == field.id {
            return true;
        }
        if !visited.insert(id) {
            // A foreign cycle further up the chain.
            return false;
        }
        let Some(&index) = by_id.get(id) else {
            // Dangling ancestor: the chain ends here; the ancestor itself
            // is demoted when its own turn comes.
            return false;
        };
        current = fields[index].parent_id.as_deref();
    }
    false
}

/// Links nodes into the arena and precomputes depth, path, and pre-order.
fn assemble_tree(fields: &[FieldDefinition], parents: &[Option<String>]) -> ModuleTree {
    let mut nodes: AHashMap<String, FieldNode> = AHashMap::with_capacity(fields.len());
    let decl_index: AHashMap<&str, usize> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.id.as_str(), i))
        .collect();

    for (field, parent) in fields.iter().zip(parents) {
        nodes.insert(
            field.id.clone(),
            FieldNode {
                definition: field.clone(),
                parent: parent.clone(),
                children: Vec::new(),
                path: Vec::new(),
                depth: 0,
                options: field.options.clone(),
            },
        );
    }

    let mut roots: Vec<String> = Vec::new();
    for (field, parent) in fields.iter().zip(parents) {
        match parent {
            Some(parent_id) => {
                if let Some(parent_node) = nodes.get_mut(parent_id.as_str()) {
                    parent_node.children.push(field.id.clone());
                }
            }
            None => roots.push(field.id.clone()),
        }
    }

    let sort_key = |id: &String| {
        let order = nodes.get(id).map(|n| n.definition.order).unwrap_or(0);
        let decl = decl_index.get(id.as_str()).copied().unwrap_or(usize::MAX);
        (order, decl)
    };
    roots.sort_by_key(sort_key);
    let mut sorted_children: Vec<(String, Vec<String>)> = Vec::new();
    for (id, node) in &nodes {
        let mut children = node.children.clone();
        children.sort_by_key(sort_key);
        sorted_children.push((id.clone(), children));
    }
    for (id, children) in sorted_children {
        if let Some(node) = nodes.get_mut(&id) {
            node.children = children;
        }
    }

    // Depth-first pre-order; depth and path fall out of the same walk.
    let mut ordered: Vec<String> = Vec::with_capacity(nodes.len());
    let mut stack: Vec<String> = roots.iter().rev().cloned().collect();
    while let Some(id) = stack.pop() {
        let (children, depth, path) = {
            let node = &nodes[&id];
            let (depth, path) = match node.parent.as_deref() {
                Some(parent_id) => {
                    let parent = &nodes[parent_id];
                    let mut path = parent.path.clone();
                    path.push(parent_id.to_string());
                    (parent.depth + 1, path)
                }
                None => (0, Vec::new()),
            };
            (node.children.clone(), depth, path)
        };
        if let Some(node) = nodes.get_mut(&id) {
            node.depth = depth;
            node.path = path;
        }
        ordered.push(id.clone());
        for child in children.iter().rev() {
            stack.push(child.clone());
        }
    }

    ModuleTree {
        nodes,
        roots,
        ordered,
    }
}
