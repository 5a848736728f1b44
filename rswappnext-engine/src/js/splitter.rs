/// 按分号切分脚本语句
/// 单引号、双引号、模板字符串内的分号不切分；反斜杠转义下一个字符。
/// 每条语句保留结尾分号并去除首尾空白，空语句丢弃。
pub fn split_statements(source: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    let mut in_single = false;
    let mut in_double = false;
    let mut in_template = false;
    let mut escape_next = false;

    for ch in source.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => {
                current.push(ch);
                escape_next = true;
                continue;
            }
            '"' if !in_single && !in_template => in_double = !in_double,
            '\'' if !in_double && !in_template => in_single = !in_single,
            '`' if !in_single && !in_double => in_template = !in_template,
            ';' if !in_single && !in_double && !in_template => {
                current.push(ch);
                push_trimmed(&mut statements, &current);
                current.clear();
                continue;
            }
            _ => {}
        }

        current.push(ch);
    }

    push_trimmed(&mut statements, &current);
    statements
}

fn push_trimmed(statements: &mut Vec<String>, statement: &str) {
    let trimmed = statement.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}
