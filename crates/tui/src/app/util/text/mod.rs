use unicode_width::UnicodeWidthChar;

pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0).max(1)
}

pub fn visual_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for ch in line.chars() {
        let ch_width = char_width(ch);
        if current_width + ch_width > width && !current.is_empty() {
            lines.push(current);
            current = String::new();
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }
    lines.push(current);
    lines
}

pub fn truncate_to_width(text: &str, width: usize) -> String {
    if visual_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width <= 3 {
        return ".".repeat(width);
    }

    let target = width - 3;
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if used + w > target {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

/// Keeps only the last `width` columns of `text`, for a single-line input that scrolls.
pub fn tail_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let w = char_width(ch);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    text[start..].to_string()
}

pub fn sanitize_for_tui(value: &str) -> String {
    // Runtime output can include tabs, carriage returns, or ANSI escape sequences.
    // Rendered raw, those move the terminal cursor and draw into the next line.
    let mut out = String::new();
    let mut col = 0_usize;
    let tab_width = 4_usize;
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => {
                let Some(next) = chars.peek().copied() else {
                    continue;
                };

                if next == '[' {
                    // CSI: ESC [ ... final_byte
                    chars.next();
                    for seq in chars.by_ref() {
                        if (0x40..=0x7e).contains(&(seq as u32)) {
                            break;
                        }
                    }
                    continue;
                }

                if next == ']' {
                    // OSC: ESC ] ... BEL or ST (ESC \)
                    chars.next();
                    loop {
                        match chars.next() {
                            None | Some('\x07') => break,
                            Some('\x1b') => {
                                if chars.peek().copied() == Some('\\') {
                                    chars.next();
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                    continue;
                }

                let _ = chars.next();
            }
            '\t' => {
                let next_stop = ((col / tab_width) + 1) * tab_width;
                let spaces = next_stop.saturating_sub(col).max(1);
                out.push_str(&" ".repeat(spaces));
                col += spaces;
            }
            '\r' => {}
            c if c.is_control() => {
                out.push(' ');
                col += 1;
            }
            c => {
                out.push(c);
                col += char_width(c);
            }
        }
    }

    out
}
