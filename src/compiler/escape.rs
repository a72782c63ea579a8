//! Decoding of the characters of literals and classes

/// Decode the first character of a string, which may be an escape sequence
///
/// Returns the character and the remaining text, or `None` if the string is empty or starts with an invalid
/// escape sequence.
pub fn decode_char(text: &str) -> Option<(char, &str)> {
    let mut chars = text.chars();

    match chars.next()? {
        '\\' => {}
        c => return Some((c, chars.as_str())),
    }

    let rest = chars.as_str();
    let escaped = rest.chars().next()?;

    let simple = match escaped {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\'' | '"' | '[' | ']' | '\\' => Some(escaped),
        _ => None,
    };

    if let Some(c) = simple {
        return Some((c, &rest[1..]));
    }

    // Octal: three digits if the first one is 0-2, otherwise one or two
    let digits = rest.bytes().take(3).take_while(|b| (b'0'..=b'7').contains(b)).count();

    let len = match digits {
        0 => return None,
        3 if rest.as_bytes()[0] <= b'2' => 3,
        1 => 1,
        _ => 2,
    };

    let value = u32::from_str_radix(&rest[..len], 8).ok()?;

    Some((char::from_u32(value)?, &rest[len..]))
}

/// Decode a whole string
///
/// Returns the offset of the first invalid escape sequence on error.
pub fn unescape(text: &str) -> Result<String, usize> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        let (c, next) = decode_char(rest).ok_or(text.len() - rest.len())?;
        out.push(c);
        rest = next;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc", "abc")]
    #[case(r"a\nb", "a\nb")]
    #[case(r"\r\t", "\r\t")]
    #[case(r#"\'\"\[\]\\"#, "'\"[]\\")]
    #[case(r"\101\60", "A0")]
    #[case(r"\0", "\0")]
    #[case(r"\377", "\u{1f}7")]
    #[case(r"\1234", "S4")]
    #[case("é", "é")]
    fn decodes(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(unescape(text).unwrap(), expected);
    }

    #[rstest]
    #[case(r"\q", 0)]
    #[case(r"ab\", 2)]
    #[case(r"a\8", 1)]
    fn rejects(#[case] text: &str, #[case] offset: usize) {
        assert_eq!(unescape(text), Err(offset));
    }

    #[test]
    fn first_char_and_rest() {
        assert_eq!(decode_char(r"\n-z"), Some(('\n', "-z")));
        assert_eq!(decode_char("a-z"), Some(('a', "-z")));
        assert_eq!(decode_char(""), None);
    }
}
