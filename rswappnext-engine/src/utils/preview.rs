use std::fmt::{self, Write};

/// 日志中的模式 / 脚本片段预览
/// 连续空白折叠为一个空格，首部空白丢弃；超过 `limit` 个字符时以 `…` 结尾
#[derive(Clone, Copy)]
pub struct CompactPreview<'a> {
    text: &'a str,
    limit: usize,
}

impl fmt::Display for CompactPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut written = 0usize;
        let mut pending_space = false;

        for ch in self.text.trim_start().chars() {
            if ch.is_whitespace() {
                pending_space = true;
                continue;
            }
            let needed = if pending_space { 2 } else { 1 };
            if written + needed > self.limit {
                return f.write_char('…');
            }
            if pending_space {
                f.write_char(' ')?;
                pending_space = false;
            }
            f.write_char(ch)?;
            written += needed;
        }
        Ok(())
    }
}

#[inline]
pub fn preview_compact(text: &str, limit: usize) -> CompactPreview<'_> {
    CompactPreview { text, limit }
}
