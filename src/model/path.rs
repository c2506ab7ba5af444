//! 路径寻址：节点在文档中的结构化位置与规范字符串之间的互转
//!
//! 规范字符串形式：根为空串，对象字段为 `.key`（位于开头时省略点号），
//! 数组元素为 `[index]`。键中的 `.`、`[`、`]`、`\` 以反斜杠转义，
//! 空键写作 `[""]`，因此任何键都能无歧义往返。

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 展开状态表与显示标签中代表根节点的哨兵
pub const ROOT_LABEL: &str = "root";

/// 空键在规范字符串中的写法
const EMPTY_KEY_TOKEN: &str = "[\"\"]";

/// 路径中的一步
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seg {
    /// 对象字段
    Key(String),
    /// 数组下标（从0开始）
    Index(usize),
}

impl Seg {
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }

    /// 节点自身的键文本：字段名，或下标的十进制形式（搜索 keyIncludes 使用）
    pub fn key_text(&self) -> String {
        match self {
            Seg::Key(k) => k.clone(),
            Seg::Index(i) => i.to_string(),
        }
    }

    /// 树视图中的字段标签：字段名，或 `[i]`
    pub fn label(&self) -> String {
        match self {
            Seg::Key(k) => k.clone(),
            Seg::Index(i) => format!("[{}]", i),
        }
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

/// 从根出发的节点地址；空路径即根节点
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<Seg>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Seg> {
        self.0.last()
    }

    /// 追加一步得到子路径（不修改自身）
    pub fn child(&self, seg: impl Into<Seg>) -> NodePath {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(seg.into());
        NodePath(segments)
    }

    /// 所有严格祖先路径，从根开始由浅到深
    pub fn ancestors(&self) -> impl Iterator<Item = NodePath> + '_ {
        (0..self.0.len()).map(move |n| NodePath(self.0[..n].to_vec()))
    }

    /// 显示用标签：根节点为 `root`，其余为规范字符串
    ///
    /// 顶层键恰好名为 `root` 时写作 `.root`，与根节点区分（解析结果不变）。
    pub fn label(&self) -> String {
        if self.is_root() {
            return ROOT_LABEL.to_string();
        }
        let text = self.to_string();
        if text == ROOT_LABEL {
            format!(".{}", text)
        } else {
            text
        }
    }

    /// 末段的字段标签，根节点为 `root`
    pub fn field_name(&self) -> String {
        self.last().map(Seg::label).unwrap_or_else(|| ROOT_LABEL.to_string())
    }

    /// RFC 9535 JSONPath 形式（用于复制给外部工具）
    pub fn to_json_path(&self) -> String {
        let mut out = String::from("$");
        for seg in &self.0 {
            match seg {
                Seg::Index(i) => {
                    let _ = write!(out, "[{}]", i);
                }
                Seg::Key(k) if is_shorthand_name(k) => {
                    out.push('.');
                    out.push_str(k);
                }
                // 字段含特殊字符时使用 bracket-notation
                Seg::Key(k) => {
                    let quoted = k.replace('\\', "\\\\").replace('\'', "\\'");
                    let _ = write!(out, "['{}']", quoted);
                }
            }
        }
        out
    }
}

fn is_shorthand_name(k: &str) -> bool {
    let mut chars = k.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn needs_escape(ch: char) -> bool {
    matches!(ch, '.' | '[' | ']' | '\\')
}

/// 写入一个对象字段；非首段时先写点号，空键写作 `[""]`
fn write_key<W: fmt::Write>(out: &mut W, key: &str, leading: bool) -> fmt::Result {
    if key.is_empty() {
        return out.write_str(EMPTY_KEY_TOKEN);
    }
    if !leading {
        out.write_char('.')?;
    }
    for ch in key.chars() {
        if needs_escape(ch) {
            out.write_char('\\')?;
        }
        out.write_char(ch)?;
    }
    Ok(())
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                Seg::Key(k) => write_key(f, k, i == 0)?,
                Seg::Index(n) => write!(f, "[{}]", n)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        NodePath(parse_path(s))
    }
}

impl FromStr for NodePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NodePath::from(s))
    }
}

/// 由父路径字符串与一步组合出子路径字符串
pub fn child_path(parent: &str, seg: &Seg) -> String {
    match seg {
        Seg::Index(i) => format!("{}[{}]", parent, i),
        Seg::Key(k) => {
            let mut out = String::with_capacity(parent.len() + k.len() + 4);
            out.push_str(parent);
            // 写入 String 不会失败
            let _ = write_key(&mut out, k, parent.is_empty());
            out
        }
    }
}

/// 取路径末段的显示名；空路径返回 `root`
pub fn field_name_of(path: &str) -> String {
    NodePath::from(path).field_name()
}

/// 按 `.` 与方括号拆分路径，丢弃连续分隔符产生的空片段
///
/// 方括号内全为数字时得到 [`Seg::Index`]，`[""]` 为空键，其余一律为 [`Seg::Key`]。
/// 反斜杠转义其后的一个字符。
pub fn parse_path(path: &str) -> Vec<Seg> {
    fn flush_key(token: &mut String, out: &mut Vec<Seg>) {
        if !token.is_empty() {
            out.push(Seg::Key(std::mem::take(token)));
        }
    }
    fn flush_bracket(token: &mut String, out: &mut Vec<Seg>) {
        if token.is_empty() {
            return;
        }
        let text = std::mem::take(token);
        let seg = if text == "\"\"" {
            Seg::Key(String::new())
        } else if text.chars().all(|c| c.is_ascii_digit()) {
            text.parse::<usize>().map(Seg::Index).unwrap_or(Seg::Key(text))
        } else {
            Seg::Key(text)
        };
        out.push(seg);
    }

    let mut segments = Vec::new();
    let mut token = String::new();
    let mut in_bracket = false;
    let mut chars = path.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    token.push(next);
                }
            }
            '.' if !in_bracket => flush_key(&mut token, &mut segments),
            '[' if !in_bracket => {
                flush_key(&mut token, &mut segments);
                in_bracket = true;
            }
            ']' if in_bracket => {
                flush_bracket(&mut token, &mut segments);
                in_bracket = false;
            }
            _ => token.push(ch),
        }
    }
    if in_bracket {
        flush_bracket(&mut token, &mut segments);
    } else {
        flush_key(&mut token, &mut segments);
    }
    segments
}
