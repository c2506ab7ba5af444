//! 宿主配置：启动参数与环境变量

use std::path::PathBuf;

use crate::vm::editor::UserRole;

/// 指定用户角色的环境变量
pub const ROLE_ENV: &str = "JSON_TREE_EDITOR_ROLE";

#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub role: UserRole,
    /// 启动时直接打开的文件
    pub initial_file: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            role: UserRole::Admin,
            initial_file: None,
        }
    }
}

impl HostConfig {
    /// 从进程参数与环境变量读取
    pub fn from_env() -> Self {
        let role = std::env::var(ROLE_ENV).ok();
        Self::from_parts(std::env::args().skip(1), role.as_deref())
    }

    /// `args` 不含程序名；第一个参数视为要打开的文件
    pub fn from_parts<I>(args: I, role: Option<&str>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let initial_file = args
            .into_iter()
            .find(|a| !a.trim().is_empty())
            .map(PathBuf::from);
        let role = match role.map(str::trim).filter(|r| !r.is_empty()) {
            None => UserRole::Admin,
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}，按普通用户处理", e);
                UserRole::User
            }),
        };
        Self { role, initial_file }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let cfg = HostConfig::from_parts(Vec::new(), None);
        assert_eq!(cfg, HostConfig::default());
        assert_eq!(cfg.role, UserRole::Admin);
    }

    #[test]
    fn test_first_argument_is_initial_file() {
        let cfg = HostConfig::from_parts(args(&["settings.json", "ignored"]), Some("user"));
        assert_eq!(cfg.initial_file, Some(PathBuf::from("settings.json")));
        assert_eq!(cfg.role, UserRole::User);
    }

    #[test]
    fn test_unknown_role_falls_back_to_user() {
        let cfg = HostConfig::from_parts(Vec::new(), Some("superuser"));
        assert_eq!(cfg.role, UserRole::User);

        let blank = HostConfig::from_parts(Vec::new(), Some("  "));
        assert_eq!(blank.role, UserRole::Admin);
    }
}
