//! Float-to-text and minified-mode token-separation rules (spec.md §4.7).

fn is_ident_class(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether a space must be inserted between two tokens in minified mode so
/// the lexer does not glue them back together into one token. Beyond the
/// two cases spec.md calls out explicitly (`-` next to unary `-`, a keyword
/// next to unary `+`), any two identifier/keyword/digit characters need
/// separating, and `/` next to `/` or `*` would start a comment.
pub fn needs_space(last: char, first: char) -> bool {
    if is_ident_class(last) && is_ident_class(first) {
        return true;
    }
    if (last == '+' && first == '+') || (last == '-' && first == '-') {
        return true;
    }
    if last == '/' && (first == '/' || first == '*') {
        return true;
    }
    false
}

fn strip_leading_zero(s: String) -> String {
    if let Some(rest) = s.strip_prefix("0.") {
        format!(".{rest}")
    } else if let Some(rest) = s.strip_prefix("-0.") {
        format!("-.{rest}")
    } else {
        s
    }
}

fn format_decimal(value: f64, minify: bool) -> String {
    let s = if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e18 {
        format!("{}.0", value as i64)
    } else {
        let mut s = format!("{value}");
        if !s.contains('.') {
            s.push_str(".0");
        }
        s
    };
    if minify {
        strip_leading_zero(s)
    } else {
        s
    }
}

fn format_exponential(value: f64, minify: bool) -> String {
    let s = format!("{value:e}");
    if minify {
        strip_leading_zero(s)
    } else {
        s
    }
}

/// Picks whichever of the decimal or exponential rendering is shorter. A
/// decimal point is always kept, in both modes, so a float literal never
/// re-lexes as an int (`1.0` stays `1.0`, never shrinks to `1`). A leading
/// zero before the point is stripped in minified mode only (`.5` rather
/// than `0.5`).
pub fn format_float(value: f64, minify: bool) -> String {
    let decimal = format_decimal(value, minify);
    let exponential = format_exponential(value, minify);
    if exponential.len() < decimal.len() {
        exponential
    } else {
        decimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_value_keeps_its_point_even_when_minified() {
        assert_eq!(format_float(1.0, true), "1.0");
        assert_eq!(format_float(1.0, false), "1.0");
    }

    #[test]
    fn fractional_value_loses_its_leading_zero_only_when_minified() {
        assert_eq!(format_float(0.5, true), ".5");
        assert_eq!(format_float(0.5, false), "0.5");
        assert_eq!(format_float(-0.5, true), "-.5");
    }

    #[test]
    fn doubled_plus_or_minus_needs_a_separating_space() {
        assert!(needs_space('-', '-'));
        assert!(needs_space('+', '+'));
        assert!(!needs_space('-', '+'));
    }

    #[test]
    fn adjacent_identifier_characters_need_a_separating_space() {
        assert!(needs_space('t', 'x'));
        assert!(needs_space('1', 'x'));
        assert!(!needs_space(')', 'x'));
    }

    #[test]
    fn slash_next_to_slash_or_star_would_start_a_comment() {
        assert!(needs_space('/', '/'));
        assert!(needs_space('/', '*'));
        assert!(!needs_space('/', '='));
    }
}
