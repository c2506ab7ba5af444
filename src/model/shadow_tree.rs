//! 影子树（Shadow Tree）：按展开状态把文档压平成可见行，仅存结构、路径与预览

use std::collections::HashSet;

use serde_json::Value;

use crate::model::expansion::ExpansionState;
use crate::model::path::NodePath;
use crate::model::value_kind::{classify, ValueKind};

/// 字符串预览的最大字符数
const PREVIEW_MAX_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    /// 节点在父级中的键名，或 `[i]`；根节点为 `root`
    pub label: String,
    pub path: NodePath,
    pub kind: ValueKind,
    /// 子元素数量（对象字段数 / 数组长度）
    pub children: u32,
    /// 轻量预览（字符串截断、数字/布尔/空的简短描述）
    pub preview: String,
    /// 节点深度（用于UI缩进显示）
    pub depth: u32,
    pub expanded: bool,
    /// 是否为搜索命中
    pub highlighted: bool,
}

/// 单个值的预览文本；容器展开时只显示开括号
pub fn preview_of(v: &Value, expanded: bool) -> String {
    match v {
        Value::String(s) => {
            if s.chars().count() > PREVIEW_MAX_CHARS {
                let truncated: String = s.chars().take(PREVIEW_MAX_CHARS).collect();
                format!("\"{}...\"", truncated)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(_) if expanded => "{".to_string(),
        Value::Array(_) if expanded => "[".to_string(),
        Value::Object(m) => format!("{{..}} ({} keys)", m.len()),
        Value::Array(a) => format!("[..] ({} items)", a.len()),
    }
}

/// 从根构建可见行：折叠容器的子孙不输出
pub fn build_visible_rows(
    root: &Value,
    expansion: &ExpansionState,
    highlighted: &HashSet<NodePath>,
) -> Vec<TreeRow> {
    fn walk(
        out: &mut Vec<TreeRow>,
        v: &Value,
        path: NodePath,
        depth: u32,
        expansion: &ExpansionState,
        highlighted: &HashSet<NodePath>,
    ) {
        let kind = classify(v);
        let expanded = kind.is_container() && expansion.is_expanded(&path);
        let children = match v {
            Value::Object(m) => m.len() as u32,
            Value::Array(a) => a.len() as u32,
            _ => 0,
        };
        out.push(TreeRow {
            label: path.field_name(),
            kind,
            children,
            preview: preview_of(v, expanded),
            depth,
            expanded,
            highlighted: highlighted.contains(&path),
            path: path.clone(),
        });
        if !expanded {
            return;
        }
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    walk(out, child, path.child(k.as_str()), depth + 1, expansion, highlighted);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    walk(out, child, path.child(idx), depth + 1, expansion, highlighted);
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(&mut out, root, NodePath::root(), 0, expansion, highlighted);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(rows: &[TreeRow]) -> Vec<String> {
        rows.iter().map(|r| r.path.label()).collect()
    }

    #[test]
    fn test_fully_expanded_rows() {
        let doc = json!({
            "user": {"name": "张三"},
            "items": [1, [2]]
        });
        let expansion = ExpansionState::collect_all(&doc);
        let rows = build_visible_rows(&doc, &expansion, &HashSet::new());

        assert_eq!(
            labels(&rows),
            vec!["root", "user", "user.name", "items", "items[0]", "items[1]", "items[1][0]"]
        );
        assert_eq!(rows[0].label, "root");
        assert_eq!(rows[0].children, 2);
        assert_eq!(rows[4].label, "[0]");
        assert_eq!(rows[6].depth, 3);
    }

    #[test]
    fn test_collapsed_container_hides_descendants() {
        let doc = json!({"user": {"name": "张三", "age": 30}, "flag": true});
        let mut expansion = ExpansionState::collect_all(&doc);
        expansion.toggle(&NodePath::from("user"));

        let rows = build_visible_rows(&doc, &expansion, &HashSet::new());
        assert_eq!(labels(&rows), vec!["root", "user", "flag"]);
        assert_eq!(rows[1].preview, "{..} (2 keys)");
        assert!(!rows[1].expanded);
    }

    #[test]
    fn test_missing_entries_render_collapsed() {
        let doc = json!({"a": [1, 2]});
        let rows = build_visible_rows(&doc, &ExpansionState::default(), &HashSet::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].preview, "{..} (1 keys)");
    }

    #[test]
    fn test_highlighted_rows() {
        let doc = json!({"a": 1, "b": 2});
        let expansion = ExpansionState::collect_all(&doc);
        let highlighted: HashSet<NodePath> = [NodePath::from("b")].into_iter().collect();
        let rows = build_visible_rows(&doc, &expansion, &highlighted);
        let flagged: Vec<bool> = rows.iter().map(|r| r.highlighted).collect();
        assert_eq!(flagged, vec![false, false, true]);
    }

    #[test]
    fn test_node_preview_generation() {
        assert_eq!(preview_of(&json!("短文本"), false), "\"短文本\"");
        assert!(preview_of(&json!("x".repeat(40)), false).ends_with("...\""));
        assert_eq!(preview_of(&json!(42), false), "42");
        assert_eq!(preview_of(&json!(true), false), "true");
        assert_eq!(preview_of(&json!(null), false), "null");
        assert_eq!(preview_of(&json!([1, 2, 3, 4, 5]), false), "[..] (5 items)");
        assert_eq!(preview_of(&json!([1]), true), "[");
        assert_eq!(preview_of(&json!({"k": 1}), true), "{");
    }
}
