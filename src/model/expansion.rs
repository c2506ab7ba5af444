//! 展开状态：每个容器节点的展开/折叠标记
//!
//! 缺失的条目一律视为折叠。只有数组与对象节点会被记录。

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::model::path::NodePath;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    nodes: HashMap<NodePath, bool>,
}

impl ExpansionState {
    /// 完整遍历文档，将所有容器（含根）标记为展开
    pub fn collect_all(root: &Value) -> Self {
        let mut state = Self::default();
        walk_containers(root, &NodePath::root(), &mut |path| {
            state.nodes.insert(path.clone(), true);
        });
        state
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.nodes.get(path).copied().unwrap_or(false)
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn set(&mut self, path: NodePath, expanded: bool) {
        self.nodes.insert(path, expanded);
    }

    /// 翻转展开标记，返回翻转后的值；未记录的节点按折叠处理，首次切换即展开
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        let next = !self.is_expanded(path);
        self.nodes.insert(path.clone(), next);
        next
    }

    /// 为尚未记录的容器补记展开标记，已记录的保持不变
    pub fn expand_unrecorded(&mut self, root: &Value) -> usize {
        let mut added = 0;
        let nodes = &mut self.nodes;
        walk_containers(root, &NodePath::root(), &mut |path| {
            if !nodes.contains_key(path) {
                nodes.insert(path.clone(), true);
                added += 1;
            }
        });
        added
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 以字符串为键的视图，根节点使用 `root` 哨兵，顶层的 `root` 键写作 `.root`
    pub fn to_key_map(&self) -> BTreeMap<String, bool> {
        self.nodes
            .iter()
            .map(|(path, expanded)| (path.label(), *expanded))
            .collect()
    }
}

fn walk_containers(v: &Value, path: &NodePath, visit: &mut dyn FnMut(&NodePath)) {
    match v {
        Value::Object(map) => {
            visit(path);
            for (k, child) in map {
                walk_containers(child, &path.child(k.as_str()), visit);
            }
        }
        Value::Array(items) => {
            visit(path);
            for (i, child) in items.iter().enumerate() {
                walk_containers(child, &path.child(i), visit);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_all_marks_every_container() {
        let doc = json!({
            "a": 1,
            "b": [10, {"c": []}],
            "d": {"e": "x"}
        });
        let state = ExpansionState::collect_all(&doc);

        let keys: Vec<String> = state.to_key_map().into_keys().collect();
        assert_eq!(keys, vec!["b", "b[1]", "b[1].c", "d", "root"]);
        assert!(state.is_expanded(&NodePath::root()));
        assert!(!state.contains(&NodePath::from("a")), "叶子节点不应出现在展开表中");
    }

    #[test]
    fn test_key_map_separates_root_from_key_named_root() {
        let state = ExpansionState::collect_all(&json!({"root": {"x": {}}}));
        let keys: Vec<String> = state.to_key_map().into_keys().collect();
        assert_eq!(keys, vec![".root", "root", "root.x"]);
    }

    #[test]
    fn test_scalar_document_has_no_entries() {
        assert!(ExpansionState::collect_all(&json!(42)).is_empty());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let doc = json!({"a": {"b": 1}});
        let mut state = ExpansionState::collect_all(&doc);
        let path = NodePath::from("a");

        let before = state.is_expanded(&path);
        assert!(!state.toggle(&path));
        assert!(state.toggle(&path));
        assert_eq!(state.is_expanded(&path), before);
    }

    #[test]
    fn test_toggle_unrecorded_expands() {
        let mut state = ExpansionState::default();
        let path = NodePath::from("never.seen");
        assert!(!state.is_expanded(&path));
        assert!(state.toggle(&path));
        assert!(!state.toggle(&path));
    }

    #[test]
    fn test_expand_unrecorded_keeps_existing_choices() {
        let mut state = ExpansionState::collect_all(&json!({"a": {}}));
        state.set(NodePath::from("a"), false);

        let added = state.expand_unrecorded(&json!({"a": {"n": [1]}, "z": {}}));
        assert_eq!(added, 2);
        assert!(!state.is_expanded(&NodePath::from("a")));
        assert!(state.is_expanded(&NodePath::from("a.n")));
        assert!(state.is_expanded(&NodePath::from("z")));
    }
}
