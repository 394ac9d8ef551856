//! 语句切分
//!
//! 按 `;` 切分 SQL 文本，同时识别引号、注释、`DELIMITER` 指令以及
//! `BEGIN ... END` / `CASE ... END` 块，块内的 `;` 不会切断语句。

const DEFAULT_DELIMITER: &str = ";";

/// 把一段 SQL 切分为独立语句
///
/// 返回的每条语句都去掉了注释和首尾空白，并以 `;` 结尾；只含注释或
/// 空白的片段会被丢弃。
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut splitter = StatementSplitter::default();
    for line in sql.lines() {
        splitter.feed_line(line);
    }
    splitter.finish()
}

#[derive(Default)]
struct StatementSplitter {
    statements: Vec<String>,
    current: String,
    /// 自定义分隔符，None 表示 `;`
    delimiter: Option<String>,
    word: String,
    depth: usize,
    pending_begin: bool,
    pending_end: bool,
    /// 当前语句的第一个关键字
    head: Option<String>,
    quote: Option<char>,
    in_block_comment: bool,
}

impl StatementSplitter {
    fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER)
    }

    fn feed_line(&mut self, line: &str) {
        if self.quote.is_none() && !self.in_block_comment && self.current.trim().is_empty() {
            if let Some(delimiter) = parse_delimiter_directive(line) {
                self.delimiter = if delimiter == DEFAULT_DELIMITER {
                    None
                } else {
                    Some(delimiter)
                };
                self.current.clear();
                return;
            }
        }

        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];

            if self.in_block_comment {
                if ch == '*' && chars.get(i + 1) == Some(&'/') {
                    self.in_block_comment = false;
                    self.current.push(' ');
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            if let Some(quote) = self.quote {
                self.current.push(ch);
                if ch == '\\' && quote != '`' {
                    if let Some(next) = chars.get(i + 1) {
                        self.current.push(*next);
                        i += 2;
                        continue;
                    }
                } else if ch == quote {
                    self.quote = None;
                }
                i += 1;
                continue;
            }

            if self.starts_with_delimiter(&chars, i) {
                self.flush_word();
                self.close_pending_at_delimiter();
                let delimiter_len = self.delimiter().chars().count();
                if self.delimiter.is_some() || self.depth == 0 {
                    self.end_statement();
                } else {
                    self.current.push(';');
                }
                i += delimiter_len;
                continue;
            }

            match ch {
                '\'' | '"' | '`' => {
                    self.flush_word();
                    self.quote = Some(ch);
                    self.current.push(ch);
                }
                '#' => {
                    self.flush_word();
                    break;
                }
                '-' if chars.get(i + 1) == Some(&'-')
                    && chars.get(i + 2).is_none_or(|c| c.is_whitespace()) =>
                {
                    self.flush_word();
                    break;
                }
                '/' if chars.get(i + 1) == Some(&'*') => {
                    self.flush_word();
                    self.in_block_comment = true;
                    i += 2;
                    continue;
                }
                c if c.is_alphanumeric() || c == '_' || c == '$' => {
                    self.word.push(c);
                    self.current.push(c);
                }
                c => {
                    self.flush_word();
                    self.current.push(c);
                }
            }
            i += 1;
        }

        self.flush_word();
        self.current.push('\n');
    }

    fn starts_with_delimiter(&self, chars: &[char], at: usize) -> bool {
        let mut idx = at;
        for expected in self.delimiter().chars() {
            match chars.get(idx) {
                Some(c) if *c == expected => idx += 1,
                _ => return false,
            }
        }
        true
    }

    /// 单词结束时更新块深度
    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        let word = std::mem::take(&mut self.word).to_ascii_uppercase();
        if self.head.is_none() {
            self.head = Some(word.clone());
        }

        if self.pending_begin {
            self.pending_begin = false;
            if word == "WORK" {
                return;
            }
            self.depth += 1;
        }

        if self.pending_end {
            self.pending_end = false;
            match word.as_str() {
                // END IF / END LOOP 等只结束控制结构，不结束 BEGIN 块
                "IF" | "LOOP" | "WHILE" | "REPEAT" => return,
                "CASE" => {
                    self.depth = self.depth.saturating_sub(1);
                    return;
                }
                _ => self.depth = self.depth.saturating_sub(1),
            }
        }

        match word.as_str() {
            // 只有 CREATE 语句（触发器、存储过程）里的 BEGIN 才开启块
            "BEGIN" if self.depth > 0 || self.head.as_deref() == Some("CREATE") => {
                self.pending_begin = true
            }
            "CASE" => self.depth += 1,
            "END" => self.pending_end = true,
            _ => {}
        }
    }

    fn close_pending_at_delimiter(&mut self) {
        // `BEGIN;` 是事务语句，不开启块
        self.pending_begin = false;
        if self.pending_end {
            self.pending_end = false;
            self.depth = self.depth.saturating_sub(1);
        }
    }

    fn end_statement(&mut self) {
        let statement = self.current.trim();
        if !statement.is_empty() {
            self.statements.push(format!("{statement};"));
        }
        self.current.clear();
        self.depth = 0;
        self.head = None;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush_word();
        self.close_pending_at_delimiter();
        self.end_statement();
        self.statements
    }
}

/// 识别 `DELIMITER $$` 这类客户端指令
fn parse_delimiter_directive(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let (keyword, rest) = trimmed.split_once(char::is_whitespace)?;
    if !keyword.eq_ignore_ascii_case("DELIMITER") {
        return None;
    }
    let delimiter = rest.trim();
    if delimiter.is_empty() {
        None
    } else {
        Some(delimiter.to_string())
    }
}
