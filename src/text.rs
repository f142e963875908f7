//! Text cleanup shared by the selector, summarizer and speech stages.

/// Strip HTML markup and collapse whitespace. Tags become word separators so
/// `<p>a</p><p>b</p>` does not fuse into `ab`; the handful of entities feeds
/// actually emit are decoded, unknown ones are dropped.
pub fn clean_text(input: &str) -> String {
    let stripped = input.replace("<![CDATA[", " ").replace("]]>", " ");

    let mut out = String::with_capacity(stripped.len());
    let mut chars = stripped.chars().peekable();
    let mut in_tag = false;

    while let Some(c) = chars.next() {
        if in_tag {
            if c == '>' {
                in_tag = false;
                out.push(' ');
            }
            continue;
        }
        match c {
            '<' => in_tag = true,
            '&' => {
                let mut entity = String::new();
                let mut terminated = false;
                while let Some(&next) = chars.peek() {
                    if next == ';' {
                        chars.next();
                        terminated = true;
                        break;
                    }
                    if entity.len() >= 8 || !(next.is_ascii_alphanumeric() || next == '#') {
                        break;
                    }
                    entity.push(next);
                    chars.next();
                }
                if terminated {
                    match entity.as_str() {
                        "amp" => out.push('&'),
                        "lt" => out.push('<'),
                        "gt" => out.push('>'),
                        "quot" => out.push('"'),
                        "apos" | "#39" => out.push('\''),
                        "nbsp" | "#160" => out.push(' '),
                        _ => {}
                    }
                } else {
                    out.push('&');
                    out.push_str(&entity);
                }
            }
            _ => out.push(c),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Characters beyond alphanumerics and whitespace that survive the spoken
/// projection. Everything else (emoji, bullets, separator rules, brackets)
/// is dropped.
const SPOKEN_PUNCTUATION: &str = ".,!?;:'\"()%$-/";

/// Project chat-formatted digest text down to something a speech synthesizer
/// can read aloud. Keeps one line per input line, drops lines that end up
/// empty after the character filter.
pub fn speech_plain_text(text: &str) -> String {
    let mut lines = Vec::new();

    for line in text.lines() {
        let kept: String = line
            .chars()
            .filter(|c| {
                c.is_alphanumeric() || c.is_whitespace() || SPOKEN_PUNCTUATION.contains(*c)
            })
            .collect();
        let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }

    lines.join("\n")
}
