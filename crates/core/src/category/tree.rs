//! Arena holding one tenant's category tree.
//!
//! Nodes live in a map keyed by id; parent links sit on the nodes and child
//! lists sit beside them. `is_group` is always derived from the child lists.

use std::collections::HashMap;

use expensa_shared::types::{AccountId, CategoryId};

use crate::category::types::ExpenseCategory;
use crate::error::ExpenseError;

/// Category tree arena.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: HashMap<CategoryId, ExpenseCategory>,
    children: HashMap<CategoryId, Vec<CategoryId>>,
    roots: Vec<CategoryId>,
}

impl CategoryTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from stored rows, rejecting dangling parents and cycles.
    pub fn from_categories(
        categories: impl IntoIterator<Item = ExpenseCategory>,
    ) -> Result<Self, ExpenseError> {
        let mut tree = Self::new();
        for category in categories {
            tree.nodes.insert(category.id, category);
        }

        let mut links: Vec<(Option<CategoryId>, CategoryId)> = tree
            .nodes
            .values()
            .map(|c| (c.parent_id, c.id))
            .collect();
        links.sort_by(|a, b| tree.nodes[&a.1].code.cmp(&tree.nodes[&b.1].code));

        for (parent, id) in links {
            match parent {
                Some(parent_id) if tree.nodes.contains_key(&parent_id) => {
                    tree.children.entry(parent_id).or_default().push(id);
                }
                Some(parent_id) => {
                    return Err(ExpenseError::TreeCorrupted(format!(
                        "category {} points at missing parent {parent_id}",
                        tree.nodes[&id].code
                    )));
                }
                None => tree.roots.push(id),
            }
        }

        tree.check_integrity()?;
        let ids: Vec<CategoryId> = tree.nodes.keys().copied().collect();
        for id in ids {
            let has_children = !tree.children(id).is_empty();
            if let Some(node) = tree.nodes.get_mut(&id) {
                node.is_group = has_children;
            }
        }
        Ok(tree)
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a category.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&ExpenseCategory> {
        self.nodes.get(&id)
    }

    /// Looks up a category or fails with `CategoryNotFound`.
    pub fn require(&self, id: CategoryId) -> Result<&ExpenseCategory, ExpenseError> {
        self.nodes.get(&id).ok_or(ExpenseError::CategoryNotFound(id))
    }

    pub(crate) fn require_mut(
        &mut self,
        id: CategoryId,
    ) -> Result<&mut ExpenseCategory, ExpenseError> {
        self.nodes
            .get_mut(&id)
            .ok_or(ExpenseError::CategoryNotFound(id))
    }

    /// Root category ids ordered by code.
    #[must_use]
    pub fn roots(&self) -> &[CategoryId] {
        &self.roots
    }

    /// Child ids of a category ordered by code.
    #[must_use]
    pub fn children(&self, id: CategoryId) -> &[CategoryId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// All categories in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ExpenseCategory> {
        self.nodes.values()
    }

    /// All categories ordered by code.
    #[must_use]
    pub fn sorted_by_code(&self) -> Vec<&ExpenseCategory> {
        let mut all: Vec<&ExpenseCategory> = self.nodes.values().collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        all
    }

    /// The category bound to `account_id`, if any.
    #[must_use]
    pub fn find_by_account(&self, account_id: AccountId) -> Option<&ExpenseCategory> {
        self.nodes.values().find(|c| c.account_id == account_id)
    }

    /// True if some category already uses `code`.
    #[must_use]
    pub fn code_taken(&self, code: &str) -> bool {
        self.nodes.values().any(|c| c.code == code)
    }

    /// Breadcrumb from the root down to `id` (inclusive).
    pub fn path(&self, id: CategoryId) -> Result<Vec<&ExpenseCategory>, ExpenseError> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            let node = self.require(cid)?;
            path.push(node);
            if path.len() > self.nodes.len() {
                return Err(ExpenseError::TreeCorrupted(format!(
                    "cycle through category {}",
                    node.code
                )));
            }
            current = node.parent_id;
        }
        path.reverse();
        Ok(path)
    }

    /// Every id, children before their parents.
    #[must_use]
    pub fn post_order(&self) -> Vec<CategoryId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(CategoryId, bool)> =
            self.roots.iter().rev().map(|id| (*id, false)).collect();
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                out.push(id);
            } else {
                stack.push((id, true));
                for child in self.children(id).iter().rev() {
                    stack.push((*child, false));
                }
            }
        }
        out
    }

    /// Adds a category under its parent, flipping the parent to a group.
    pub(crate) fn insert(&mut self, category: ExpenseCategory) -> Result<(), ExpenseError> {
        let id = category.id;
        match category.parent_id {
            Some(parent_id) => {
                self.require_mut(parent_id)?.is_group = true;
                let siblings = self.children.entry(parent_id).or_default();
                siblings.push(id);
                let nodes = &self.nodes;
                siblings.sort_by(|a, b| {
                    let code_a = nodes.get(a).map_or(category.code.as_str(), |c| c.code.as_str());
                    let code_b = nodes.get(b).map_or(category.code.as_str(), |c| c.code.as_str());
                    code_a.cmp(code_b)
                });
            }
            None => {
                self.roots.push(id);
                let nodes = &self.nodes;
                self.roots.sort_by(|a, b| {
                    let code_a = nodes.get(a).map_or(category.code.as_str(), |c| c.code.as_str());
                    let code_b = nodes.get(b).map_or(category.code.as_str(), |c| c.code.as_str());
                    code_a.cmp(code_b)
                });
            }
        }
        self.nodes.insert(id, category);
        Ok(())
    }

    /// Removes a childless category. A parent left without children reverts to a leaf.
    pub(crate) fn remove(&mut self, id: CategoryId) -> Result<ExpenseCategory, ExpenseError> {
        let node = self.require(id)?;
        if !self.children(id).is_empty() {
            return Err(ExpenseError::CategoryInUse {
                code: node.code.clone(),
                reason: "it still has child categories".to_string(),
            });
        }
        let parent_id = node.parent_id;
        let removed = self
            .nodes
            .remove(&id)
            .ok_or(ExpenseError::CategoryNotFound(id))?;
        self.children.remove(&id);
        match parent_id {
            Some(parent_id) => {
                let now_empty = self.children.get_mut(&parent_id).is_none_or(|siblings| {
                    siblings.retain(|c| *c != id);
                    siblings.is_empty()
                });
                if now_empty {
                    self.children.remove(&parent_id);
                    if let Some(parent) = self.nodes.get_mut(&parent_id) {
                        parent.is_group = false;
                    }
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        Ok(removed)
    }

    /// Verifies that every parent chain ends at a root within `len` steps.
    pub fn check_integrity(&self) -> Result<(), ExpenseError> {
        for node in self.nodes.values() {
            let mut steps = 0usize;
            let mut current = node.parent_id;
            while let Some(parent_id) = current {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(ExpenseError::TreeCorrupted(format!(
                        "cycle through category {}",
                        node.code
                    )));
                }
                current = self
                    .nodes
                    .get(&parent_id)
                    .ok_or_else(|| {
                        ExpenseError::TreeCorrupted(format!(
                            "category {} points at missing parent {parent_id}",
                            node.code
                        ))
                    })?
                    .parent_id;
            }
        }
        Ok(())
    }
}
