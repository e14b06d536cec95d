//! Org tree derived from "reports-to" relations.
//!
//! A node's children are the members whose relations name it. The relation
//! graph may contain cycles, dangling ids and members reporting to several
//! people; the builder reduces it to a tree where every member appears at
//! most once:
//! - a member already on the root-to-node path is never added again
//!   (ancestor guard)
//! - a member already claimed anywhere in the tree is skipped
//!   (first-discovered placement wins)
//!
//! Expansion uses an explicit stack over an arena, so deep chains do not
//! grow the call stack.

use std::collections::HashSet;

use tracing::debug;

use crate::error::LayoutError;
use crate::model::Member;

mod adjacency;

use adjacency::ReportsIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode<'a> {
    pub member: &'a Member,
    pub children: Vec<HierarchyNode<'a>>,
}

impl<'a> HierarchyNode<'a> {
    pub fn leaf(member: &'a Member) -> Self {
        Self { member, children: Vec::new() }
    }

    pub fn id(&self) -> &'a str {
        let member: &'a Member = self.member;
        &member.id
    }

    /// Pre-order traversal, children in stored order.
    pub fn iter(&self) -> PreOrder<'_, 'a> {
        PreOrder { stack: vec![self] }
    }

    /// Number of nodes, including this one.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Levels in the tree; a lone root has depth 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, d)) = stack.pop() {
            max = max.max(d);
            stack.extend(node.children.iter().map(|c| (c, d + 1)));
        }
        max
    }

    /// Member ids in pre-order.
    pub fn ids(&self) -> Vec<&'a str> {
        self.iter().map(|n| n.id()).collect()
    }

    pub fn find(&self, id: &str) -> Option<&HierarchyNode<'a>> {
        self.iter().find(|n| n.member.id == id)
    }
}

pub struct PreOrder<'t, 'a> {
    stack: Vec<&'t HierarchyNode<'a>>,
}

impl<'t, 'a> Iterator for PreOrder<'t, 'a> {
    type Item = &'t HierarchyNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Arena slot used while expanding.
struct Slot {
    member: usize,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Walk the parent chain from `slot` looking for `member`.
fn on_path(slots: &[Slot], slot: usize, member: usize) -> bool {
    let mut cur = Some(slot);
    while let Some(s) = cur {
        if slots[s].member == member {
            return true;
        }
        cur = slots[s].parent;
    }
    false
}

/// Build the tree rooted at `root_id`.
///
/// Children keep input order. Dangling relation ids are ignored.
pub fn build_tree<'a>(
    members: &'a [Member],
    root_id: &str,
) -> Result<HierarchyNode<'a>, LayoutError> {
    let index = ReportsIndex::from_members(members);
    let root = index
        .index_of(root_id)
        .ok_or_else(|| LayoutError::RootNotFound(root_id.to_string()))?;

    let mut slots = vec![Slot { member: root, parent: None, children: Vec::new() }];
    let mut claimed: HashSet<usize> = HashSet::from([root]);
    let mut stack = vec![0usize];

    // A node claims all its direct reports before any of them expands.
    while let Some(s) = stack.pop() {
        let mut kids = Vec::new();
        for &candidate in index.reports_to(&members[slots[s].member].id) {
            if on_path(&slots, s, candidate) || !claimed.insert(candidate) {
                continue;
            }
            kids.push(slots.len());
            slots.push(Slot { member: candidate, parent: Some(s), children: Vec::new() });
        }
        stack.extend(kids.iter().rev());
        slots[s].children = kids;
    }

    debug!(root = root_id, nodes = slots.len(), members = members.len(), "org tree built");
    Ok(assemble(members, slots))
}

/// Fold the arena into nested nodes. Children always sit at higher indices
/// than their parent, so a reverse sweep sees every child first.
fn assemble<'a>(members: &'a [Member], slots: Vec<Slot>) -> HierarchyNode<'a> {
    let root_member = &members[slots[0].member];
    let mut built: Vec<Option<HierarchyNode<'a>>> = Vec::with_capacity(slots.len());
    built.resize_with(slots.len(), || None);

    for (i, slot) in slots.iter().enumerate().rev() {
        let children = slot.children.iter().filter_map(|&c| built[c].take()).collect();
        built[i] = Some(HierarchyNode { member: &members[slot.member], children });
    }

    built
        .into_iter()
        .next()
        .flatten()
        .unwrap_or_else(|| HierarchyNode::leaf(root_member))
}
