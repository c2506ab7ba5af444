//! VM桥接层：连接Slint UI与编辑器组件
//!
//! 注意：UI绑定的具体实现在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供公共常量

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_LOADED: &str = "文件加载完成";
pub const STATUS_NO_FILE_SELECTED: &str = "未选择文件";
pub const STATUS_SAVED: &str = "保存成功";
pub const STATUS_EDIT_APPLIED: &str = "修改已应用（尚未保存）";
pub const STATUS_EDIT_MODE: &str = "已进入编辑模式";
pub const STATUS_VIEW_MODE: &str = "已切换为查看模式";
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_SEARCH_CLEARED: &str = "搜索已清除";
pub const STATUS_READ_ONLY: &str = "只读模式下不能编辑";
pub const STATUS_NO_DOCUMENT: &str = "尚未打开文件";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

/// 宿主未提供文件名时使用的名称
pub const DEFAULT_FILE_NAME: &str = "data.json";

/// 搜索面板类型下拉框中“不限类型”的取值
pub const SEARCH_TYPE_ANY: &str = "any";
