// Reverse "reports-to" index for tree building.
//
// Members list who they report to; the tree needs the opposite direction
// (who reports to me). Built once per call so child lookup is O(1).

use std::collections::HashMap;

use crate::model::Member;

#[derive(Debug, Clone)]
pub struct ReportsIndex<'a> {
    /// Member id -> index of its first occurrence in the input.
    by_id: HashMap<&'a str, usize>,
    /// Member id -> indices of members reporting to it, in input order.
    reports: HashMap<&'a str, Vec<usize>>,
}

impl<'a> ReportsIndex<'a> {
    pub fn from_members(members: &'a [Member]) -> Self {
        let mut by_id: HashMap<&str, usize> = HashMap::new();
        for (i, m) in members.iter().enumerate() {
            by_id.entry(m.id.as_str()).or_insert(i);
        }

        let mut reports: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, m) in members.iter().enumerate() {
            for target in &m.relations {
                // Dangling references never match a node; skip them here.
                if !by_id.contains_key(target.as_str()) {
                    continue;
                }
                let list = reports.entry(target.as_str()).or_default();
                // Repeated relation entries on one member count once.
                if list.last() != Some(&i) {
                    list.push(i);
                }
            }
        }

        Self { by_id, reports }
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Members reporting to `id`, in input order, or empty slice if none.
    pub fn reports_to(&self, id: &str) -> &[usize] {
        self.reports.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
