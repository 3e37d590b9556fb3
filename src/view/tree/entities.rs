use super::node::{Key, TreeData, TreeNode};
use super::selection::range_in_order;
use std::collections::{HashMap, HashSet};

/// Metadata about a single node, derived from its position in the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntity {
    pub key: Key,
    /// Parent key (None for root nodes)
    pub parent: Option<Key>,
    /// Child keys in display order
    pub children: Vec<Key>,
    /// Depth (roots are 0)
    pub level: usize,
    /// Position path such as "0-2-1"
    pub pos: String,
    /// Index in document (pre-order) order
    pub index: usize,
    pub is_leaf: bool,
    pub disabled: bool,
}

/// Key to entity index built once per dataset
///
/// Used to walk from a key to the root and to compute contiguous ranges in
/// display order.
#[derive(Debug, Clone, Default)]
pub struct KeyEntities {
    entities: HashMap<Key, KeyEntity>,
    /// All keys in document order
    order: Vec<Key>,
    /// Root keys in display order
    roots: Vec<Key>,
}

impl KeyEntities {
    /// Build the index for a dataset
    ///
    /// Duplicate keys are not validated; the last occurrence wins in the map.
    pub fn from_data(data: &TreeData) -> Self {
        let mut index = Self::default();
        for (i, node) in data.roots.iter().enumerate() {
            index.roots.push(node.key.clone());
            index.insert(node, None, 0, i.to_string());
        }
        index
    }

    fn insert(&mut self, node: &TreeNode, parent: Option<&Key>, level: usize, pos: String) {
        let entity = KeyEntity {
            key: node.key.clone(),
            parent: parent.cloned(),
            children: node.children.iter().map(|c| c.key.clone()).collect(),
            level,
            pos: pos.clone(),
            index: self.order.len(),
            is_leaf: node.is_leaf(),
            disabled: node.disabled,
        };
        self.order.push(node.key.clone());
        self.entities.insert(node.key.clone(), entity);

        for (i, child) in node.children.iter().enumerate() {
            self.insert(child, Some(&node.key), level + 1, format!("{pos}-{i}"));
        }
    }

    pub fn get(&self, key: &Key) -> Option<&KeyEntity> {
        self.entities.get(key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entities.contains_key(key)
    }

    /// All keys in document order
    pub fn keys(&self) -> &[Key] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Expand every given key together with all of its ancestors
    ///
    /// Walking upward stops after a disabled node. Unknown keys are dropped.
    /// The result is in document order.
    pub fn conduct_expand_parent(&self, keys: &[Key]) -> Vec<Key> {
        let mut expanded: HashSet<&Key> = HashSet::new();
        for key in keys {
            let mut current = self.get(key);
            while let Some(entity) = current {
                if !expanded.insert(&entity.key) {
                    break;
                }
                if entity.disabled {
                    break;
                }
                current = entity.parent.as_ref().and_then(|p| self.get(p));
            }
        }
        self.in_document_order(|key| expanded.contains(key))
    }

    /// Keys visible under the given expansion, in display order
    pub fn visible_keys(&self, expanded: &[Key]) -> Vec<(Key, usize)> {
        let expanded: HashSet<&Key> = expanded.iter().collect();
        let mut visible = Vec::new();
        for root in &self.roots {
            self.collect_visible(root, &expanded, &mut visible);
        }
        visible
    }

    fn collect_visible(&self, key: &Key, expanded: &HashSet<&Key>, visible: &mut Vec<(Key, usize)>) {
        let Some(entity) = self.get(key) else {
            return;
        };
        visible.push((entity.key.clone(), entity.level));
        if expanded.contains(key) {
            for child in &entity.children {
                self.collect_visible(child, expanded, visible);
            }
        }
    }

    /// Contiguous inclusive range between two keys in visible order
    ///
    /// Empty when either endpoint is missing or hidden under a collapsed
    /// ancestor.
    pub fn calc_range_keys(&self, expanded: &[Key], start: Option<&Key>, end: Option<&Key>) -> Vec<Key> {
        let visible: Vec<Key> = self
            .visible_keys(expanded)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        range_in_order(&visible, start, end)
    }

    /// Resolve keys to nodes in document order, skipping unknown keys
    pub fn keys_to_nodes<'a>(&self, data: &'a TreeData, keys: &[Key]) -> Vec<&'a TreeNode> {
        let wanted: HashSet<&Key> = keys.iter().collect();
        let mut nodes = Vec::new();
        data.walk(|node, _| {
            if wanted.contains(&node.key) {
                nodes.push(node);
            }
        });
        nodes
    }

    fn in_document_order(&self, mut keep: impl FnMut(&Key) -> bool) -> Vec<Key> {
        self.order.iter().filter(|k| keep(k)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tree::node::keys;
    use crate::view::tree::test_fixtures::sample_data;

    #[test]
    fn test_entity_metadata() {
        let entities = KeyEntities::from_data(&sample_data());
        assert_eq!(entities.len(), 9);

        let leaf = entities.get(&Key::from("0-0-0-1")).unwrap();
        assert_eq!(leaf.parent, Some(Key::from("0-0-0")));
        assert_eq!(leaf.level, 2);
        assert_eq!(leaf.pos, "0-0-1");
        assert_eq!(leaf.index, 3);
        assert!(leaf.is_leaf);

        let root = entities.get(&Key::from("0-1")).unwrap();
        assert_eq!(root.parent, None);
        assert_eq!(root.children, keys(["0-1-0"]));
        assert!(root.disabled);
    }

    #[test]
    fn test_conduct_expand_parent() {
        let entities = KeyEntities::from_data(&sample_data());
        let expanded = entities.conduct_expand_parent(&keys(["0-0-0-0", "0-0-1"]));
        assert_eq!(expanded, keys(["0-0", "0-0-0", "0-0-0-0", "0-0-1"]));
    }

    #[test]
    fn test_conduct_expand_parent_stops_at_disabled() {
        let entities = KeyEntities::from_data(&sample_data());
        // 0-1 is disabled, so it is included but 0-1's own parent walk stops there.
        let expanded = entities.conduct_expand_parent(&keys(["0-1-0-0"]));
        assert_eq!(expanded, keys(["0-1", "0-1-0", "0-1-0-0"]));

        let mut data = sample_data();
        data.roots[0].children[0].disabled = true;
        let entities = KeyEntities::from_data(&data);
        let expanded = entities.conduct_expand_parent(&keys(["0-0-0-1"]));
        assert_eq!(expanded, keys(["0-0-0", "0-0-0-1"]));
    }

    #[test]
    fn test_conduct_expand_parent_drops_unknown() {
        let entities = KeyEntities::from_data(&sample_data());
        assert!(entities.conduct_expand_parent(&keys(["nope"])).is_empty());
    }

    #[test]
    fn test_visible_keys_respect_expansion() {
        let entities = KeyEntities::from_data(&sample_data());

        let collapsed: Vec<_> = entities.visible_keys(&[]).into_iter().map(|(k, _)| k).collect();
        assert_eq!(collapsed, keys(["0-0", "0-1", "0-2"]));

        // A child expanded under a collapsed parent stays hidden
        let visible: Vec<_> = entities
            .visible_keys(&keys(["0-0-0"]))
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(visible, keys(["0-0", "0-1", "0-2"]));

        let visible = entities.visible_keys(&keys(["0-0", "0-0-0"]));
        assert_eq!(visible[2], (Key::from("0-0-0-0"), 2));
        assert_eq!(visible.len(), 7);
    }

    #[test]
    fn test_calc_range_keys_in_either_direction() {
        let entities = KeyEntities::from_data(&sample_data());
        let expanded = keys(["0-0", "0-0-0"]);

        let forward = entities.calc_range_keys(
            &expanded,
            Some(&Key::from("0-0-0-1")),
            Some(&Key::from("0-1")),
        );
        assert_eq!(forward, keys(["0-0-0-1", "0-0-1", "0-1"]));

        let backward = entities.calc_range_keys(
            &expanded,
            Some(&Key::from("0-1")),
            Some(&Key::from("0-0-0-1")),
        );
        assert_eq!(backward, forward);
    }

    #[test]
    fn test_calc_range_keys_hidden_endpoint_is_empty() {
        let entities = KeyEntities::from_data(&sample_data());
        let range = entities.calc_range_keys(
            &keys(["0-0"]),
            Some(&Key::from("0-0")),
            Some(&Key::from("0-0-0-1")),
        );
        assert!(range.is_empty());

        assert!(entities
            .calc_range_keys(&[], Some(&Key::from("0-0")), None)
            .is_empty());
    }

    #[test]
    fn test_calc_range_same_key() {
        let entities = KeyEntities::from_data(&sample_data());
        let key = Key::from("0-2");
        assert_eq!(entities.calc_range_keys(&[], Some(&key), Some(&key)), vec![key]);
    }

    #[test]
    fn test_keys_to_nodes_document_order() {
        let data = sample_data();
        let entities = KeyEntities::from_data(&data);
        let nodes = entities.keys_to_nodes(&data, &keys(["0-2", "missing", "0-0-0-0"]));
        let titles: Vec<_> = nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(titles, vec!["0-0-0-0", "0-2"]);
    }
}
