//! 文件读写：宿主层用来载入和落盘 JSON 文档

use std::{fs::File, io::BufReader, io::Write, path::Path};

use serde_json::Value;

use crate::model::data_core::EditorError;

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path) -> Result<Value, EditorError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Value = serde_json::from_reader(rdr)?;
    tracing::debug!("已读取: {}", p.display());
    Ok(v)
}

/// 将JSON数据保存到文件（两空格缩进，末尾换行）
pub fn write_json_file(p: &Path, value: &Value) -> Result<(), EditorError> {
    let mut f = File::create(p)?;
    serde_json::to_writer_pretty(&mut f, value)?;
    f.write_all(b"\n")?;
    tracing::debug!("已写入: {}", p.display());
    Ok(())
}

/// 取路径中的文件名，用于编辑器标题
pub fn display_name(p: &Path) -> Option<String> {
    p.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read_keeps_key_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let doc = json!({"z": 1, "a": {"nested": [true, null]}, "m": "文本"});

        write_json_file(&path, &doc).unwrap();
        let back = read_json_file(&path).unwrap();
        assert_eq!(back, doc);

        let keys: Vec<&String> = back.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"z\": 1"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_json_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, EditorError::Io(_)));
    }

    #[test]
    fn test_read_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_json_file(&path), Err(EditorError::Parse(_))));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/tmp/cfg/app.json")).as_deref(), Some("app.json"));
        assert_eq!(display_name(Path::new("/")), None);
    }
}
