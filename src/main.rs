//! 程序入口：初始化日志、加载 Slint UI，并把编辑器组件接到窗口上

use std::{cell::RefCell, path::Path, rc::Rc};

use anyhow::{anyhow, Context};
use serde_json::Value;
use slint::{ComponentHandle, ModelRc, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

use json_tree_editor::model::search::parse_bound;
use json_tree_editor::model::shadow_tree::preview_of;
use json_tree_editor::utils::clipboard::copy_to_clipboard;
use json_tree_editor::utils::config::HostConfig;
use json_tree_editor::utils::fs::{display_name, read_json_file, write_json_file};
use json_tree_editor::vm::bridge::*;
use json_tree_editor::{
    EditorError, JsonTreeEditor, NodePath, SearchCriteria, SearchHit, TreeRow, UserRole, ValueKind,
};

slint::include_modules!();

impl From<&TreeRow> for TreeRowData {
    fn from(row: &TreeRow) -> Self {
        Self {
            label: row.label.clone().into(),
            path: row.path.to_string().into(),
            kind: row.kind.as_str().into(),
            preview: row.preview.clone().into(),
            depth: row.depth as i32,
            container: row.kind.is_container(),
            expanded: row.expanded,
            highlighted: row.highlighted,
        }
    }
}

impl From<&SearchHit> for SearchHitData {
    fn from(hit: &SearchHit) -> Self {
        Self {
            path: hit.path.to_string().into(),
            label: hit.path.label().into(),
            preview: preview_of(&hit.value, false).into(),
        }
    }
}

type SharedEditor = Rc<RefCell<Option<JsonTreeEditor>>>;

/// VM桥接器：管理UI与编辑器组件的交互
struct ViewModelBridge {
    editor: SharedEditor,
    role: UserRole,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(app_window: &AppWindow, role: UserRole) -> Self {
        let bridge = Self {
            editor: Rc::new(RefCell::new(None)),
            role,
        };
        bridge.setup_callbacks(app_window);
        bridge
    }

    fn initialize_ui(&self, app_window: &AppWindow) {
        app_window.set_is_admin(self.role == UserRole::Admin);
        app_window.set_file_name(DEFAULT_FILE_NAME.into());
        app_window.set_status_message(STATUS_READY.into());
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        let role = self.role;

        // === 打开文件 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_load_file(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    let result = Self::handle_load_file(&app_window, &editor, role);
                    Self::report(&app_window, result);
                }
            });
        }

        // === 展开/折叠节点 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_node(move |path| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::with_editor(&app_window, &editor, |ed| {
                        ed.toggle_node(&NodePath::from(path.as_str()));
                        Ok(())
                    });
                }
            });
        }

        // === 编辑模式切换 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_edit_mode(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::with_editor(&app_window, &editor, |ed| {
                        if !ed.can_toggle_edit_mode() {
                            return Err(EditorError::ReadOnly.into());
                        }
                        let editing = ed.toggle_edit_mode();
                        app_window.set_status_message(
                            if editing { STATUS_EDIT_MODE } else { STATUS_VIEW_MODE }.into(),
                        );
                        Ok(())
                    });
                }
            });
        }

        // === 打开编辑弹窗 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_open_editor(move |path| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::with_editor(&app_window, &editor, |ed| {
                        let session = ed.begin_edit(&NodePath::from(path.as_str()))?;
                        app_window.set_editor_path(session.path.to_string().into());
                        app_window.set_editor_field(session.field.into());
                        app_window.set_editor_kind(session.kind.as_str().into());
                        app_window.set_editor_text(session.text.into());
                        app_window.set_editor_error("".into());
                        app_window.set_editor_open(true);
                        Ok(())
                    });
                }
            });
        }

        // === 提交编辑 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_commit_edit(move |path, text| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_commit_edit(&app_window, &editor, path.as_str(), text.as_str());
                }
            });
        }

        // === 取消编辑 ===
        {
            let app_window_weak = app_window.as_weak();
            app_window.on_cancel_edit(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_editor_open(false);
                    app_window.set_editor_error("".into());
                }
            });
        }

        // === 保存 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_save_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::with_editor(&app_window, &editor, |ed| {
                        ed.save()?;
                        app_window.set_status_message(STATUS_SAVED.into());
                        Ok(())
                    });
                }
            });
        }

        // === 关闭 ===
        {
            let editor = self.editor.clone();
            app_window.on_close_pressed(move || {
                match editor.borrow_mut().as_mut() {
                    Some(ed) => ed.close(),
                    None => Self::quit(),
                }
            });
        }

        // === 搜索面板显隐 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_search(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::with_editor(&app_window, &editor, |ed| {
                        ed.toggle_search_panel();
                        Ok(())
                    });
                }
            });
        }

        // === 执行搜索 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_run_search(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::with_editor(&app_window, &editor, |ed| {
                        let criteria = Self::criteria_from_ui(&app_window)?;
                        if criteria.is_empty() {
                            ed.clear_search();
                            app_window.set_status_message(STATUS_SEARCH_CLEARED.into());
                            return Ok(());
                        }
                        let count = ed.search(&criteria).len();
                        app_window.set_status_message(format!("搜索完成，命中 {} 个节点", count).into());
                        Ok(())
                    });
                }
            });
        }

        // === 清除搜索 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_clear_search(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_search_type(SEARCH_TYPE_ANY.into());
                    app_window.set_search_key("".into());
                    app_window.set_search_value("".into());
                    app_window.set_search_equals("".into());
                    app_window.set_search_gt("".into());
                    app_window.set_search_lt("".into());
                    Self::with_editor(&app_window, &editor, |ed| {
                        ed.clear_search();
                        app_window.set_status_message(STATUS_SEARCH_CLEARED.into());
                        Ok(())
                    });
                }
            });
        }

        // === 选中搜索结果 ===
        {
            let editor = self.editor.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_search_result_selected(move |path| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::with_editor(&app_window, &editor, |ed| {
                        ed.select_result(&NodePath::from(path.as_str()));
                        Ok(())
                    });
                }
            });
        }

        // === 复制节点路径 ===
        {
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_path(move |path| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    let json_path = NodePath::from(path.as_str()).to_json_path();
                    let result = copy_to_clipboard(&json_path)
                        .map(|_| {
                            app_window.set_status_message(format!("{}: {}", STATUS_COPIED, json_path).into());
                        })
                        .map_err(anyhow::Error::from);
                    Self::report(&app_window, result);
                }
            });
        }
    }

    /// 在已打开的文档上执行操作，结束后刷新界面；出错时写入状态栏
    fn with_editor<F>(app_window: &AppWindow, editor: &SharedEditor, op: F)
    where
        F: FnOnce(&mut JsonTreeEditor) -> anyhow::Result<()>,
    {
        let mut guard = editor.borrow_mut();
        let Some(ed) = guard.as_mut() else {
            app_window.set_status_message(STATUS_NO_DOCUMENT.into());
            return;
        };
        let result = op(ed);
        Self::refresh_ui(app_window, ed);
        Self::report(app_window, result);
    }

    fn report(app_window: &AppWindow, result: anyhow::Result<()>) {
        if let Err(e) = result {
            tracing::warn!("操作失败: {:#}", e);
            app_window.set_status_message(format!("{}{:#}", STATUS_ERROR_PREFIX, e).into());
        }
    }

    fn quit() {
        if let Err(e) = slint::quit_event_loop() {
            tracing::error!("退出事件循环失败: {}", e);
        }
    }

    /// 把组件状态同步到窗口属性
    fn refresh_ui(app_window: &AppWindow, ed: &JsonTreeEditor) {
        app_window.set_document_loaded(true);
        app_window.set_file_name(ed.file_name().into());
        app_window.set_edit_mode(ed.is_edit_mode());
        app_window.set_has_changes(ed.has_changes());
        app_window.set_can_save(ed.can_save());
        app_window.set_search_visible(ed.is_search_visible());

        let rows: Vec<TreeRowData> = ed.visible_rows().iter().map(TreeRowData::from).collect();
        app_window.set_tree_model(ModelRc::new(VecModel::from(rows)));

        let hits: Vec<SearchHitData> = ed.results().iter().map(SearchHitData::from).collect();
        app_window.set_search_results(ModelRc::new(VecModel::from(hits)));
    }

    fn handle_load_file(app_window: &AppWindow, editor: &SharedEditor, role: UserRole) -> anyhow::Result<()> {
        let Some(path) = Self::show_file_dialog() else {
            app_window.set_status_message(STATUS_NO_FILE_SELECTED.into());
            return Ok(());
        };
        Self::open_file(app_window, editor, role, &path)
    }

    /// 读取文件并创建编辑器组件；保存回调把文档写回同一文件
    fn open_file(app_window: &AppWindow, editor: &SharedEditor, role: UserRole, path: &Path) -> anyhow::Result<()> {
        let data = read_json_file(path).with_context(|| format!("无法打开 {}", path.display()))?;

        let target = path.to_path_buf();
        let on_save = Box::new(move |doc: Value| -> anyhow::Result<()> {
            write_json_file(&target, &doc).with_context(|| format!("写入 {} 失败", target.display()))?;
            tracing::info!("已写回文件: {}", target.display());
            Ok(())
        });
        let on_close = Box::new(Self::quit);

        let app_window_weak = app_window.as_weak();
        let reveal = Box::new(move |node: &NodePath| {
            if let Some(app_window) = app_window_weak.upgrade() {
                app_window.set_status_message(format!("已定位: {}", node.label()).into());
            }
        });

        let ed = JsonTreeEditor::new(data, display_name(path), role, on_save, on_close).with_reveal(reveal);
        Self::refresh_ui(app_window, &ed);
        *editor.borrow_mut() = Some(ed);

        app_window.set_editor_open(false);
        app_window.set_status_message(format!("{}: {}", STATUS_LOADED, path.display()).into());
        Ok(())
    }

    /// 提交编辑；解析失败时错误显示在弹窗内，弹窗保持打开
    fn handle_commit_edit(app_window: &AppWindow, editor: &SharedEditor, path: &str, text: &str) {
        let mut guard = editor.borrow_mut();
        let Some(ed) = guard.as_mut() else {
            app_window.set_editor_open(false);
            app_window.set_status_message(STATUS_NO_DOCUMENT.into());
            return;
        };
        match ed.commit_edit(&NodePath::from(path), text) {
            Ok(()) => {
                app_window.set_editor_open(false);
                app_window.set_editor_error("".into());
                app_window.set_status_message(STATUS_EDIT_APPLIED.into());
                Self::refresh_ui(app_window, ed);
            }
            Err(EditorError::ReadOnly) => {
                app_window.set_editor_open(false);
                app_window.set_status_message(STATUS_READ_ONLY.into());
            }
            Err(e) => app_window.set_editor_error(e.to_string().into()),
        }
    }

    /// 从搜索面板读取条件
    fn criteria_from_ui(app_window: &AppWindow) -> anyhow::Result<SearchCriteria> {
        let kind = match app_window.get_search_type().as_str() {
            SEARCH_TYPE_ANY | "" => None,
            other => Some(other.parse::<ValueKind>()?),
        };
        let text = |s: slint::SharedString| {
            let s = s.to_string();
            (!s.is_empty()).then_some(s)
        };
        Ok(SearchCriteria {
            kind,
            key_includes: text(app_window.get_search_key()),
            value_includes: text(app_window.get_search_value()),
            value_equals: text(app_window.get_search_equals()),
            value_gt: Self::bound_from_ui(app_window.get_search_gt().as_str(), "大于")?,
            value_lt: Self::bound_from_ui(app_window.get_search_lt().as_str(), "小于")?,
        })
    }

    fn bound_from_ui(raw: &str, label: &str) -> anyhow::Result<Option<f64>> {
        parse_bound(raw).with_context(|| format!("“{}”条件不是有效数字: {}", label, raw.trim()))
    }

    fn show_file_dialog() -> Option<std::path::PathBuf> {
        rfd::FileDialog::new()
            .add_filter("JSON文件", &["json"])
            .pick_file()
    }
}

fn main() -> anyhow::Result<()> {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let config = HostConfig::from_env();
    let app = AppWindow::new().map_err(|e| anyhow!("UI 初始化失败: {}", e))?;

    let bridge = ViewModelBridge::new(&app, config.role);
    bridge.initialize_ui(&app);

    if let Some(path) = &config.initial_file {
        let result = ViewModelBridge::open_file(&app, &bridge.editor, config.role, path);
        ViewModelBridge::report(&app, result);
    }

    tracing::info!("应用启动成功，角色: {}", config.role);
    app.run().map_err(|e| anyhow!("事件循环异常: {}", e))?;
    Ok(())
}
