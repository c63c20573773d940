//! Shared utility functions for code generation.

/// Convert a camelCase or PascalCase identifier to snake_case.
///
/// Runs of uppercase letters are treated as a single word, except that the
/// last letter of a run is attached to a following lowercase word
/// (`"HTTPServer"` -> `"http_server"`). Any non-lowercase character that
/// follows an uppercase one is considered part of the run, so digits stay
/// glued to acronyms (`"ID2"` -> `"id2"`).
pub fn camel_to_snake(name: &str) -> String {
    let mut ret = String::with_capacity(name.len() + 4);

    let mut multiple_upper = false;
    let mut last_upper: Option<char> = None;

    for c in name.chars() {
        let is_upper = c.is_uppercase() || (last_upper.is_some() && !c.is_lowercase());

        if let Some(upper) = last_upper {
            // Separate before the first uppercase char of a run, and before the
            // last one when a lowercase word follows (the 'S' in "HTTPServer").
            let first_in_row = !multiple_upper;
            let last_in_row = !is_upper;

            if !ret.is_empty() && (first_in_row || last_in_row) {
                ret.push('_');
            }
            ret.extend(upper.to_lowercase());
        }

        // Hold uppercase chars back until we know whether a separator is due.
        if is_upper {
            multiple_upper = last_upper.is_some();
            last_upper = Some(c);
            continue;
        }

        ret.push(c);
        last_upper = None;
        multiple_upper = false;
    }

    if let Some(upper) = last_upper {
        ret.extend(upper.to_lowercase());
    }
    ret
}

/// Return the last `/`-separated segment of a module path.
///
/// Trailing slashes are ignored. An empty path yields `"."` and a path made
/// only of slashes yields `"/"`.
pub fn last_path_segment(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Double-quoted Go string literal for `s`.
///
/// Backslashes, quotes and control characters are escaped the way
/// `strconv.Quote` does; other characters are kept as-is.
pub fn go_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if (c as u32) < 0x80 && c.is_control() => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Double-quoted JSON string for `s`.
pub fn json_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_snake_fixtures() {
        assert_eq!(camel_to_snake("ID"), "id");
        assert_eq!(camel_to_snake("UserID"), "user_id");
        assert_eq!(camel_to_snake("HTTPServer"), "http_server");
        assert_eq!(camel_to_snake("already_snake"), "already_snake");
        assert_eq!(camel_to_snake(""), "");
    }

    #[test]
    fn test_camel_to_snake_words() {
        assert_eq!(camel_to_snake("Hello"), "hello");
        assert_eq!(camel_to_snake("HelloWorld"), "hello_world");
        assert_eq!(camel_to_snake("userName"), "user_name");
        assert_eq!(camel_to_snake("A"), "a");
        assert_eq!(camel_to_snake("lowercase"), "lowercase");
    }

    #[test]
    fn test_camel_to_snake_acronyms() {
        assert_eq!(camel_to_snake("ServeHTTP"), "serve_http");
        assert_eq!(camel_to_snake("XMLHttpRequest"), "xml_http_request");
        assert_eq!(camel_to_snake("UserIDs"), "user_i_ds");
        assert_eq!(camel_to_snake("GetHTTPResponseCode"), "get_http_response_code");
    }

    #[test]
    fn test_camel_to_snake_digits_join_uppercase_run() {
        assert_eq!(camel_to_snake("ID2"), "id2");
        assert_eq!(camel_to_snake("Base64Value"), "base64_value");
        assert_eq!(camel_to_snake("Sha256"), "sha256");
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("encoding/json"), "json");
        assert_eq!(last_path_segment("example.com/app/models"), "models");
        assert_eq!(last_path_segment("models"), "models");
        assert_eq!(last_path_segment("example.com/app/"), "app");
        assert_eq!(last_path_segment(""), ".");
        assert_eq!(last_path_segment("//"), "/");
    }

    #[test]
    fn test_go_string_literal() {
        assert_eq!(go_string_literal("name"), r#""name""#);
        assert_eq!(go_string_literal(r#"na"me"#), r#""na\"me""#);
        assert_eq!(go_string_literal(r"a\b"), r#""a\\b""#);
        assert_eq!(go_string_literal("a\tb\n"), r#""a\tb\n""#);
        assert_eq!(go_string_literal("\u{1}\u{7f}"), r#""\x01\x7f""#);
        assert_eq!(go_string_literal("größe"), "\"größe\"");
    }

    #[test]
    fn test_json_string_literal() {
        assert_eq!(json_string_literal("id"), r#""id""#);
        assert_eq!(json_string_literal(r#"na"me"#), r#""na\"me""#);
        assert_eq!(json_string_literal("a\u{1}"), r#""a\u0001""#);
    }

    #[test]
    fn test_json_key_inside_go_literal() {
        let payload = format!("{}:", json_string_literal(r#"na"me"#));
        assert_eq!(go_string_literal(&payload), r#""\"na\\\"me\":""#);
    }
}
