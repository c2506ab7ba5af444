//! 变更引擎：按路径读取与就地写入嵌套值

use serde_json::{Map, Value};

use crate::model::path::{NodePath, Seg};

/// 按路径取值，路径不存在时返回 None
pub fn value_at<'a>(root: &'a Value, path: &NodePath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |current, seg| match (current, seg) {
            (Value::Object(map), Seg::Key(k)) => map.get(k),
            (Value::Array(items), Seg::Index(i)) => items.get(*i),
            _ => None,
        })
}

/// 将 `value` 写入 `root` 中 `path` 所指的位置
///
/// 沿途缺失的容器会被创建：下一步是下标时保证为数组，否则保证为对象；
/// 类型不符的中间节点会被替换。数组长度不足时以 null 补齐。
/// 空路径直接替换整个根。此函数就地修改 `root`，调用方应传入可丢弃的副本。
pub fn set_nested_value(root: &mut Value, path: &NodePath, value: Value) {
    let mut current = root;
    for seg in path.segments() {
        current = slot_mut(current, seg);
    }
    *current = value;
}

fn slot_mut<'a>(container: &'a mut Value, seg: &Seg) -> &'a mut Value {
    match seg {
        Seg::Index(index) => {
            if !container.is_array() {
                *container = Value::Array(Vec::new());
            }
            let Value::Array(items) = container else {
                unreachable!("容器已被强制为数组")
            };
            if items.len() <= *index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[*index]
        }
        Seg::Key(key) => {
            if !container.is_object() {
                *container = Value::Object(Map::new());
            }
            let Value::Object(map) = container else {
                unreachable!("容器已被强制为对象")
            };
            map.entry(key.clone()).or_insert(Value::Null)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_at() {
        let doc = json!({"a": [1, {"b": "x"}]});
        assert_eq!(value_at(&doc, &NodePath::root()), Some(&doc));
        assert_eq!(value_at(&doc, &NodePath::from("a[1].b")), Some(&json!("x")));
        assert_eq!(value_at(&doc, &NodePath::from("a[5]")), None);
        assert_eq!(value_at(&doc, &NodePath::from("a.b")), None);
        assert_eq!(value_at(&doc, &NodePath::from("missing")), None);
    }

    #[test]
    fn test_set_leaf_in_object() {
        let mut doc = json!({"a": 1, "b": [10, 20]});
        set_nested_value(&mut doc, &NodePath::from("a"), json!(5));
        assert_eq!(doc, json!({"a": 5, "b": [10, 20]}));
    }

    #[test]
    fn test_set_array_element_in_root_array() {
        let mut doc = json!([1, 2, 3]);
        set_nested_value(&mut doc, &NodePath::from("[1]"), json!(99));
        assert_eq!(doc, json!([1, 99, 3]));
    }

    #[test]
    fn test_siblings_untouched() {
        let mut doc = json!({"a": {"deep": [1, 2]}, "b": "old", "c": {"x": null}});
        let before = doc.clone();
        set_nested_value(&mut doc, &NodePath::from("b"), json!("new"));

        assert_eq!(doc["a"], before["a"]);
        assert_eq!(doc["c"], before["c"]);
        assert_eq!(doc["b"], json!("new"));
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"], "键顺序应保持不变");
    }

    #[test]
    fn test_creates_missing_intermediates() {
        let mut doc = json!({});
        set_nested_value(&mut doc, &NodePath::from("a.list[2].name"), json!("n"));
        assert_eq!(doc, json!({"a": {"list": [null, null, {"name": "n"}]}}));
    }

    #[test]
    fn test_replaces_mismatched_intermediate() {
        let mut doc = json!({"a": 5, "keep": true});
        set_nested_value(&mut doc, &NodePath::from("a[0]"), json!("x"));
        assert_eq!(doc, json!({"a": ["x"], "keep": true}));
    }

    #[test]
    fn test_root_path_replaces_document() {
        let mut doc = json!({"a": 1});
        set_nested_value(&mut doc, &NodePath::root(), json!([true]));
        assert_eq!(doc, json!([true]));
    }
}
