//! DocumentState：可编辑文档的核心状态（快照、上次保存的副本、展开状态、脏标记）

use serde_json::Value;
use thiserror::Error;

use crate::model::expansion::ExpansionState;
use crate::model::mutation::{set_nested_value, value_at};
use crate::model::path::NodePath;
use crate::model::search::{expand_path, search, SearchCriteria, SearchHit};
use crate::model::value_kind::{parse_by_original_type, ValueParseError};
use crate::utils::clipboard::ClipboardError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Value(#[from] ValueParseError),
    #[error("路径不存在: {0}")]
    PathNotFound(String),
    #[error("当前为只读模式，无法编辑")]
    ReadOnly,
    #[error("保存失败: {0}")]
    HostSave(String),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

#[derive(Debug, Clone)]
pub struct DocumentState {
    data: Value,
    original: Value,
    expansion: ExpansionState,
    edit_mode: bool,
    has_changes: bool,
}

impl DocumentState {
    /// 以宿主数据的副本建立文档，并展开全部容器节点
    pub fn new(data: Value) -> Self {
        let expansion = ExpansionState::collect_all(&data);
        tracing::info!("文档已载入，容器节点: {}", expansion.len());
        Self {
            original: data.clone(),
            data,
            expansion,
            edit_mode: false,
            has_changes: false,
        }
    }

    /// 用新数据重新初始化，编辑模式保持不变
    pub fn reload(&mut self, data: Value) {
        let edit_mode = self.edit_mode;
        *self = Self::new(data);
        self.edit_mode = edit_mode;
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// 上次保存（或载入）时的快照
    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.expansion.is_expanded(path)
    }

    /// 切换节点的展开状态，返回切换后的值
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        let expanded = self.expansion.toggle(path);
        tracing::debug!("节点{}: {}", if expanded { "展开" } else { "折叠" }, path.label());
        expanded
    }

    pub fn value_at(&self, path: &NodePath) -> Option<&Value> {
        value_at(&self.data, path)
    }

    /// 按原类型解析编辑文本并写入；解析失败时快照不变
    pub fn edit(&mut self, path: &NodePath, raw: &str) -> Result<(), EditorError> {
        let original = self
            .value_at(path)
            .ok_or_else(|| EditorError::PathNotFound(path.label()))?;
        let parsed = match parse_by_original_type(raw, original) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("编辑被拒绝 {}: {}", path.label(), e);
                return Err(e.into());
            }
        };
        self.set_value(path, parsed);
        tracing::info!("节点已更新: {}", path.label());
        Ok(())
    }

    /// 写入已解析的值：先复制快照，在副本上修改，再整体替换
    pub fn set_value(&mut self, path: &NodePath, value: Value) {
        let mut next = self.data.clone();
        set_nested_value(&mut next, path, value);
        self.data = next;
        // 编辑引入的新容器默认展开
        self.expansion.expand_unrecorded(&self.data);
        self.has_changes = self.data != self.original;
    }

    /// 把当前快照的副本交给宿主保存；成功后更新已保存副本并清除脏标记
    ///
    /// 宿主回调失败时返回 [`EditorError::HostSave`]，脏标记保持不变。
    pub fn save<F>(&mut self, on_save: F) -> Result<(), EditorError>
    where
        F: FnOnce(Value) -> anyhow::Result<()>,
    {
        if let Err(e) = on_save(self.data.clone()) {
            tracing::error!("宿主保存失败: {:#}", e);
            return Err(EditorError::HostSave(format!("{:#}", e)));
        }
        self.original = self.data.clone();
        self.has_changes = false;
        tracing::info!("文档已保存");
        Ok(())
    }

    /// 执行搜索，并展开所有命中节点的祖先使其可见
    pub fn search(&mut self, criteria: &SearchCriteria) -> Vec<SearchHit> {
        let hits = search(&self.data, criteria);
        for hit in &hits {
            expand_path(&hit.path, &mut self.expansion);
        }
        tracing::info!("搜索完成，命中 {} 个节点", hits.len());
        hits
    }

    /// 选中搜索结果时使用：展开祖先，命中的容器本身也展开
    pub fn reveal(&mut self, path: &NodePath) {
        expand_path(path, &mut self.expansion);
        if self.value_at(path).is_some_and(|v| v.is_array() || v.is_object()) {
            self.expansion.set(path.clone(), true);
        }
    }
}
