//! 数据模型层：路径寻址、类型分类、展开状态、变更与搜索

pub mod data_core;
pub mod expansion;
pub mod mutation;
pub mod path;
pub mod search;
pub mod shadow_tree;
pub mod value_kind;
