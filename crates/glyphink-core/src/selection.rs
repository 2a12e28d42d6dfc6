//! Selection sets and stroke groups.

use crate::stroke::{GroupId, StrokeGroup, StrokeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Set of selected stroke ids.
pub type Selection = HashSet<StrokeId>;

/// Close `requested` under group membership.
///
/// Any stroke that shares a group with a requested stroke is added, until
/// nothing changes.
pub fn expand_selection(requested: &Selection, groups: &GroupTable) -> Selection {
    let mut result = requested.clone();
    loop {
        let before = result.len();
        for group in groups.iter() {
            if group.stroke_ids.iter().any(|id| result.contains(id)) {
                result.extend(group.stroke_ids.iter().copied());
            }
        }
        if result.len() == before {
            return result;
        }
    }
}

/// All groups of a glyph, in creation order.
///
/// A stroke id is a member of at most one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupTable {
    groups: Vec<StrokeGroup>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrokeGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Group containing `id`, if any.
    pub fn group_of(&self, id: StrokeId) -> Option<&StrokeGroup> {
        self.groups.iter().find(|g| g.contains(id))
    }

    /// Whether any stroke of `selected` belongs to a group.
    pub fn has_group_for(&self, selected: &Selection) -> bool {
        selected.iter().any(|id| self.group_of(*id).is_some())
    }

    /// Group the selected strokes together.
    ///
    /// The strokes leave any group they were in; groups left empty are dropped.
    /// Returns the new group's id, or `None` if fewer than two strokes were given.
    pub fn group(&mut self, selected: &Selection) -> Option<GroupId> {
        if selected.len() < 2 {
            return None;
        }
        for group in &mut self.groups {
            group.stroke_ids.retain(|id| !selected.contains(id));
        }
        self.groups.retain(|g| !g.is_empty());

        let group = StrokeGroup::new(selected.iter().copied());
        let id = group.id();
        self.groups.push(group);
        Some(id)
    }

    /// Dissolve every group that has a member in `selected`.
    ///
    /// Returns the number of dissolved groups.
    pub fn ungroup(&mut self, selected: &Selection) -> usize {
        let before = self.groups.len();
        self.groups
            .retain(|g| !g.stroke_ids.iter().any(|id| selected.contains(id)));
        before - self.groups.len()
    }

    /// Drop ids that no longer name a stroke, then drop empty groups.
    pub fn prune(&mut self, existing: &HashSet<StrokeId>) {
        for group in &mut self.groups {
            group.stroke_ids.retain(|id| existing.contains(id));
        }
        self.groups.retain(|g| !g.is_empty());
    }

    /// Add a group whose members are taken as-is.
    pub(crate) fn insert(&mut self, group: StrokeGroup) {
        self.groups.push(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ids(n: usize) -> Vec<StrokeId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn set(ids: &[StrokeId]) -> Selection {
        ids.iter().copied().collect()
    }

    fn assert_disjoint(table: &GroupTable) {
        let mut seen = HashSet::new();
        for group in table.iter() {
            assert!(!group.is_empty());
            for id in &group.stroke_ids {
                assert!(seen.insert(*id), "stroke {id} is in two groups");
            }
        }
    }

    #[test]
    fn test_group_requires_two() {
        let s = ids(1);
        let mut table = GroupTable::new();
        assert_eq!(table.group(&set(&s)), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_expand_pulls_in_group() {
        let s = ids(3);
        let mut table = GroupTable::new();
        table.group(&set(&s[..2]));

        let expanded = expand_selection(&set(&s[..1]), &table);
        assert_eq!(expanded, set(&s[..2]));
        // Idempotent.
        assert_eq!(expand_selection(&expanded, &table), expanded);
        // Ungrouped stroke stays alone.
        assert_eq!(expand_selection(&set(&s[2..]), &table), set(&s[2..]));
    }

    #[test]
    fn test_regroup_moves_strokes() {
        let s = ids(4);
        let mut table = GroupTable::new();
        table.group(&set(&s[..2]));
        table.group(&set(&s[2..]));
        // Take one stroke from each group.
        let new_id = table.group(&set(&[s[1], s[2]]));
        assert_disjoint(&table);
        assert_eq!(table.len(), 3);
        assert_eq!(table.group_of(s[1]).map(|g| g.id()), new_id);
        assert_eq!(table.group_of(s[0]).map(|g| g.len()), Some(1));
    }

    #[test]
    fn test_regroup_drops_emptied_group() {
        let s = ids(3);
        let mut table = GroupTable::new();
        table.group(&set(&s[..2]));
        table.group(&set(&s));
        assert_eq!(table.len(), 1);
        assert_eq!(table.group_of(s[0]).map(|g| g.len()), Some(3));
    }

    #[test]
    fn test_ungroup_dissolves_whole_group() {
        let s = ids(4);
        let mut table = GroupTable::new();
        table.group(&set(&s[..2]));
        table.group(&set(&s[2..]));
        assert_eq!(table.ungroup(&set(&[s[0]])), 1);
        assert!(table.group_of(s[1]).is_none());
        assert!(table.group_of(s[3]).is_some());
        assert_eq!(table.ungroup(&set(&[s[0]])), 0);
    }

    #[test]
    fn test_prune_removes_deleted() {
        let s = ids(3);
        let mut table = GroupTable::new();
        table.group(&set(&s[..2]));
        table.prune(&set(&s[1..]));
        assert_eq!(table.group_of(s[1]).map(|g| g.len()), Some(1));
        table.prune(&set(&s[2..]));
        assert!(table.is_empty());
    }

    #[test]
    fn test_disjoint_after_sequences() {
        let s = ids(6);
        let mut table = GroupTable::new();
        let ops: [(&[usize], bool); 7] = [
            (&[0, 1], true),
            (&[2, 3, 4], true),
            (&[1, 2], true),
            (&[3], false),
            (&[0, 4, 5], true),
            (&[5], false),
            (&[0, 1, 2, 3, 4, 5], true),
        ];
        for (members, is_group) in ops {
            let selection: Selection = members.iter().map(|&i| s[i]).collect();
            if is_group {
                table.group(&selection);
            } else {
                table.ungroup(&selection);
            }
            assert_disjoint(&table);
            for id in &s {
                let expanded = expand_selection(&set(&[*id]), &table);
                assert_eq!(expand_selection(&expanded, &table), expanded);
            }
        }
        assert_eq!(table.len(), 1);
    }
}
