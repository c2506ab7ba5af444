//! 剪贴板：把节点的 JSONPath 复制给用户

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("剪贴板错误: {0}")]
    Clip(String),
}

/// 将文本复制到系统剪贴板
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.set_contents(text.to_string())
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

/// 从系统剪贴板获取文本（用于测试）
#[cfg(test)]
pub fn get_clipboard_contents() -> Result<String, ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.get_contents()
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::path::NodePath;

    #[test]
    #[ignore = "需要系统剪贴板"]
    fn test_copy_json_path() {
        let path = NodePath::from("users[0].display name");
        let text = path.to_json_path();

        copy_to_clipboard(&text).expect("复制到剪贴板应该成功");
        let content = get_clipboard_contents().expect("从剪贴板读取应该成功");
        assert_eq!(content, "$.users[0]['display name']");
    }

    #[test]
    fn test_error_message() {
        let err = ClipboardError::Clip("no display".into());
        assert_eq!(err.to_string(), "剪贴板错误: no display");
    }
}
