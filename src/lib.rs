//! JSON树形编辑器库
//!
//! 提供基于路径寻址的文档模型、保持类型的就地编辑、按属性搜索，
//! 以及供宿主嵌入的编辑器组件。遵循MVVM架构模式。

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{DocumentState, EditorError};
pub use model::path::{NodePath, Seg};
pub use model::search::{SearchCriteria, SearchHit};
pub use model::shadow_tree::{build_visible_rows, TreeRow};
pub use model::value_kind::{ValueKind, ValueParseError};
pub use vm::editor::{EditSession, JsonTreeEditor, UserRole};
