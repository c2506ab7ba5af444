//! 搜索引擎：按属性条件深度优先匹配节点，并让命中节点在树中可见

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::expansion::ExpansionState;
use crate::model::path::{NodePath, Seg};
use crate::model::value_kind::{classify, ValueKind, ValueParseError};

/// 搜索条件；所有已设置的字段同时满足才算命中
///
/// 空字符串与未设置等价。全部未设置表示“清除搜索”，而不是“匹配全部”。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_includes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_includes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_equals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_gt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_lt: Option<f64>,
}

fn text_filter(f: &Option<String>) -> Option<&str> {
    f.as_deref().filter(|s| !s.is_empty())
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && text_filter(&self.key_includes).is_none()
            && text_filter(&self.value_includes).is_none()
            && text_filter(&self.value_equals).is_none()
            && self.value_gt.is_none()
            && self.value_lt.is_none()
    }

    /// 判断单个节点是否满足条件；`key` 为节点自身的键，根节点为 None
    pub fn matches(&self, key: Option<&Seg>, value: &Value) -> bool {
        if let Some(kind) = self.kind {
            if classify(value) != kind {
                return false;
            }
        }
        if let Some(needle) = text_filter(&self.key_includes) {
            // 根节点没有键
            match key {
                Some(seg) if seg.key_text().contains(needle) => {}
                _ => return false,
            }
        }
        if text_filter(&self.value_includes).is_some() || text_filter(&self.value_equals).is_some() {
            let text = natural_string(value);
            if let Some(needle) = text_filter(&self.value_includes) {
                if !text.contains(needle) {
                    return false;
                }
            }
            if let Some(expected) = text_filter(&self.value_equals) {
                if text != expected {
                    return false;
                }
            }
        }
        if self.value_gt.is_some() || self.value_lt.is_some() {
            let Some(n) = value.as_f64() else {
                return false;
            };
            // 与 NaN 无法比较，此时不命中
            if self.value_gt.is_some_and(|gt| n.partial_cmp(&gt) != Some(Ordering::Greater)) {
                return false;
            }
            if self.value_lt.is_some_and(|lt| n.partial_cmp(&lt) != Some(Ordering::Less)) {
                return false;
            }
        }
        true
    }
}

/// 解析搜索面板中的数值界限；空白表示未设置，NaN 与无穷大被拒绝
pub fn parse_bound(raw: &str) -> Result<Option<f64>, ValueParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(ValueParseError::InvalidNumberFormat),
    }
}

/// 一条命中结果
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub path: NodePath,
    pub value: Value,
}

/// 值的自然字符串形式：字符串取原文，其余为紧凑 JSON
pub fn natural_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 先序深度优先搜索；对象按键插入顺序，数组按下标顺序
pub fn search(root: &Value, criteria: &SearchCriteria) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    if criteria.is_empty() {
        return hits;
    }
    visit(root, &NodePath::root(), criteria, &mut hits);
    hits
}

fn visit(v: &Value, path: &NodePath, criteria: &SearchCriteria, hits: &mut Vec<SearchHit>) {
    if criteria.matches(path.last(), v) {
        hits.push(SearchHit {
            path: path.clone(),
            value: v.clone(),
        });
    }
    match v {
        Value::Object(map) => {
            for (k, child) in map {
                visit(child, &path.child(k.as_str()), criteria, hits);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                visit(child, &path.child(i), criteria, hits);
            }
        }
        _ => {}
    }
}

/// 展开路径上的所有祖先容器，根节点总是展开
pub fn expand_path(path: &NodePath, expansion: &mut ExpansionState) {
    expansion.set(NodePath::root(), true);
    for ancestor in path.ancestors() {
        expansion.set(ancestor, true);
    }
}
