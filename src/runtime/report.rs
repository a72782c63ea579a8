use super::errors::ParseError;

/// Format in a human-readable way a parse error
pub fn pretty_format_parse_err(input: &str, err: &ParseError) -> String {
    let line_number = err.line().to_string();
    let padding = " ".repeat(err.column() - 1 + line_number.len() + 3);

    format!(
        "ERROR: At line {}, column {}:\n\n{} | {}\n{}^\n{}{}",
        err.line(),
        err.column(),
        line_number,
        input.lines().nth(err.line() - 1).unwrap_or(""),
        padding,
        padding,
        err.content()
    )
}
