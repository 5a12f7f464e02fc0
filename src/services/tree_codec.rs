//! Tree Codec: converts between the nested bookmark tree and the flat
//! parent-pointer records stored in the `bookmarks` table.
//!
//! Both directions are pure: no I/O, inputs are never mutated.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::types::bookmark::{BookmarkNode, FlatRecord};

/// Flattens `nodes` depth-first, pre-order.
///
/// Each emitted record carries `parent_id` and its index within the slice it
/// came from as `order`. Pass `None` as `parent_id` for the root level.
pub fn flatten(nodes: &[BookmarkNode], parent_id: Option<&str>) -> Vec<FlatRecord> {
    let mut out = Vec::new();
    flatten_into(nodes, parent_id, &mut out);
    out
}

fn flatten_into(nodes: &[BookmarkNode], parent_id: Option<&str>, out: &mut Vec<FlatRecord>) {
    for (index, node) in nodes.iter().enumerate() {
        out.push(FlatRecord {
            id: node.id.clone(),
            parent_id: parent_id.map(str::to_string),
            order: index as u32,
            title: node.title.clone(),
            url: node.url.clone(),
            description: node.description.clone(),
            icon: node.icon.clone(),
        });
        flatten_into(&node.children, Some(&node.id), out);
    }
}

/// Rebuilds the tree from flat records and returns the root-level nodes.
///
/// Records are grouped by `parent_id` and sorted by `order` (ties broken by
/// id so the output is deterministic). Records whose parent chain never
/// reaches the root are orphans: they are left out of the result and a
/// warning is logged, but reconstruction never fails.
pub fn reconstruct(records: &[FlatRecord]) -> Vec<BookmarkNode> {
    let mut groups: HashMap<Option<&str>, Vec<&FlatRecord>> = HashMap::new();
    for record in records {
        groups
            .entry(record.parent_id.as_deref())
            .or_default()
            .push(record);
    }
    for siblings in groups.values_mut() {
        siblings.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    }

    let mut visited = HashSet::new();
    let roots = build_level(None, &groups, &mut visited);

    let orphaned = records.len() - visited.len();
    if orphaned > 0 {
        warn!("{} bookmark record(s) have no path to the root and were skipped", orphaned);
    }
    roots
}

fn build_level<'r>(
    parent_id: Option<&'r str>,
    groups: &HashMap<Option<&'r str>, Vec<&'r FlatRecord>>,
    visited: &mut HashSet<&'r str>,
) -> Vec<BookmarkNode> {
    let Some(siblings) = groups.get(&parent_id) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(siblings.len());
    for &record in siblings {
        // Duplicate ids would otherwise let a node contain itself.
        if !visited.insert(record.id.as_str()) {
            continue;
        }
        nodes.push(BookmarkNode {
            id: record.id.clone(),
            title: record.title.clone(),
            url: record.url.clone(),
            description: record.description.clone(),
            icon: record.icon.clone(),
            children: build_level(Some(record.id.as_str()), groups, visited),
        });
    }
    nodes
}
