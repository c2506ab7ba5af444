//! VM层：编辑器组件与宿主之间的边界

pub mod bridge;
pub mod editor;
