//! 编辑器组件：宿主提供初始数据、保存/关闭回调与用户角色，组件负责其余交互状态

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::data_core::{DocumentState, EditorError};
use crate::model::path::NodePath;
use crate::model::search::{SearchCriteria, SearchHit};
use crate::model::shadow_tree::{build_visible_rows, TreeRow};
use crate::model::value_kind::{classify, format_for_edit, ValueKind};
use crate::vm::bridge::DEFAULT_FILE_NAME;

/// 宿主保存回调：收到当前文档的独立副本
pub type SaveCallback = Box<dyn FnMut(Value) -> anyhow::Result<()>>;
/// 宿主关闭回调
pub type CloseCallback = Box<dyn FnMut()>;
/// 可选的“定位到节点”能力（例如滚动到可见区域）
pub type RevealCallback = Box<dyn FnMut(&NodePath)>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => f.write_str("Admin"),
            UserRole::User => f.write_str("User"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            r if r.eq_ignore_ascii_case("admin") => Ok(UserRole::Admin),
            r if r.eq_ignore_ascii_case("user") => Ok(UserRole::User),
            other => Err(format!("未知角色: {}", other)),
        }
    }
}

/// 打开编辑弹窗所需的信息
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub path: NodePath,
    /// 字段显示名
    pub field: String,
    pub kind: ValueKind,
    /// 编辑框初始文本
    pub text: String,
}

pub struct JsonTreeEditor {
    file_name: String,
    role: UserRole,
    state: DocumentState,
    search_visible: bool,
    results: Vec<SearchHit>,
    highlighted: HashSet<NodePath>,
    on_save: SaveCallback,
    on_close: CloseCallback,
    reveal: Option<RevealCallback>,
}

impl JsonTreeEditor {
    /// 创建组件；初始数据被接管为内部快照，宿主持有的数据不会被修改
    pub fn new(
        initial_data: Value,
        file_name: Option<String>,
        role: UserRole,
        on_save: SaveCallback,
        on_close: CloseCallback,
    ) -> Self {
        let file_name = file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        tracing::info!("编辑器已创建: {} (角色: {})", file_name, role);
        Self {
            file_name,
            role,
            state: DocumentState::new(initial_data),
            search_visible: false,
            results: Vec::new(),
            highlighted: HashSet::new(),
            on_save,
            on_close,
            reveal: None,
        }
    }

    pub fn with_reveal(mut self, reveal: RevealCallback) -> Self {
        self.reveal = Some(reveal);
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn data(&self) -> &Value {
        self.state.data()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.state.is_edit_mode()
    }

    pub fn has_changes(&self) -> bool {
        self.state.has_changes()
    }

    /// 只有管理员可以切换编辑模式（展示层的门控，不是安全边界）
    pub fn can_toggle_edit_mode(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// 切换编辑/查看模式，返回切换后的模式；非管理员调用时保持不变
    pub fn toggle_edit_mode(&mut self) -> bool {
        if !self.can_toggle_edit_mode() {
            tracing::warn!("角色 {} 无权切换编辑模式", self.role);
            return self.state.is_edit_mode();
        }
        let next = !self.state.is_edit_mode();
        self.state.set_edit_mode(next);
        next
    }

    pub fn toggle_node(&mut self, path: &NodePath) -> bool {
        self.state.toggle(path)
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.state.is_expanded(path)
    }

    /// 当前展开状态下的可见行
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        build_visible_rows(self.state.data(), self.state.expansion(), &self.highlighted)
    }

    /// 准备编辑某个节点：返回字段名、原类型与编辑框初始文本
    pub fn begin_edit(&self, path: &NodePath) -> Result<EditSession, EditorError> {
        if !self.state.is_edit_mode() {
            return Err(EditorError::ReadOnly);
        }
        let value = self
            .state
            .value_at(path)
            .ok_or_else(|| EditorError::PathNotFound(path.label()))?;
        Ok(EditSession {
            path: path.clone(),
            field: path.field_name(),
            kind: classify(value),
            text: format_for_edit(value),
        })
    }

    /// 提交编辑；解析失败时返回错误且文档不变，调用方应保持弹窗打开
    pub fn commit_edit(&mut self, path: &NodePath, raw: &str) -> Result<(), EditorError> {
        if !self.state.is_edit_mode() {
            return Err(EditorError::ReadOnly);
        }
        self.state.edit(path, raw)
    }

    /// 保存按钮是否可用
    pub fn can_save(&self) -> bool {
        self.state.is_edit_mode() && self.state.has_changes()
    }

    /// 每次调用恰好触发一次宿主保存回调
    pub fn save(&mut self) -> Result<(), EditorError> {
        let on_save = &mut self.on_save;
        self.state.save(|data| on_save(data))
    }

    /// 每次调用恰好触发一次宿主关闭回调
    pub fn close(&mut self) {
        tracing::info!("编辑器关闭: {}", self.file_name);
        (self.on_close)();
    }

    /// 显式重新载入宿主数据（组件不会自动跟随宿主数据变化）
    pub fn reload(&mut self, data: Value) {
        self.state.reload(data);
        self.clear_search();
    }

    pub fn is_search_visible(&self) -> bool {
        self.search_visible
    }

    pub fn toggle_search_panel(&mut self) -> bool {
        self.search_visible = !self.search_visible;
        self.search_visible
    }

    /// 执行搜索并高亮命中节点；空条件等同于清除搜索
    pub fn search(&mut self, criteria: &SearchCriteria) -> &[SearchHit] {
        if criteria.is_empty() {
            self.clear_search();
            return &self.results;
        }
        self.results = self.state.search(criteria);
        self.highlighted = self.results.iter().map(|hit| hit.path.clone()).collect();
        &self.results
    }

    pub fn clear_search(&mut self) {
        self.results.clear();
        self.highlighted.clear();
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn highlighted(&self) -> &HashSet<NodePath> {
        &self.highlighted
    }

    pub fn is_highlighted(&self, path: &NodePath) -> bool {
        self.highlighted.contains(path)
    }

    /// 选中一条搜索结果：展开其祖先与命中的容器本身，再请宿主定位
    pub fn select_result(&mut self, path: &NodePath) {
        self.state.reveal(path);
        if let Some(reveal) = self.reveal.as_mut() {
            reveal(path);
        }
    }
}
