fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_ascii_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if ch.is_ascii_graphic() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn format_line(code: &str, stage: &str, action: &str, reason: &str, err: &str) -> String {
    format!(
        "GUTGUARDIAN_WARN code={} stage={} action={} reason={} err={}",
        sanitize_value(code),
        sanitize_value(stage),
        sanitize_value(action),
        sanitize_value(reason),
        sanitize_value(err),
    )
}

pub fn emit(code: &str, stage: &str, action: &str, reason: &str, err: &str) {
    eprintln!("{}", format_line(code, stage, action, reason, err));
}

#[cfg(test)]
mod tests {
    use super::{format_line, sanitize_value};

    #[test]
    fn sanitize_value_rewrites_whitespace() {
        assert_eq!(sanitize_value("a b\tc"), "a_b_c");
    }

    #[test]
    fn sanitize_value_falls_back_for_empty() {
        assert_eq!(sanitize_value("   "), "na");
    }

    #[test]
    fn format_line_keeps_one_token_per_field() {
        let line = format_line(
            "ADVICE_FAILED",
            "advice",
            "apologize",
            "remote call",
            "status 429 Too Many Requests",
        );
        assert_eq!(
            line,
            "GUTGUARDIAN_WARN code=ADVICE_FAILED stage=advice action=apologize reason=remote_call err=status_429_Too_Many_Requests"
        );
    }
}
