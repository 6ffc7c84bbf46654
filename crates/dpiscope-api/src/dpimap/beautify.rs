// Minified-script reformatter.
//
// The console asset arrives as one long minified line. Before fragment
// extraction we reimpose a predictable layout: newline-plus-indent after
// every brace, bracket, comma and semicolon, and a space after every
// colon. The scanner is string-aware so braces and colons inside string
// literals never affect layout. The colon spacing matters beyond
// readability: the extracted fragments are later parsed as keyed data,
// and `name:"X"` is only parseable once it reads `name: "X"`.

const INDENT: &str = "    ";

pub(crate) fn beautify(source: &str) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    let mut depth: usize = 0;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => {
                in_string = Some(c);
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                depth += 1;
                break_line(&mut out, depth);
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                break_line(&mut out, depth);
                out.push(c);
            }
            ',' | ';' => {
                out.push(c);
                break_line(&mut out, depth);
            }
            ':' => {
                out.push(c);
                if chars.peek().is_some_and(|next| !next.is_whitespace()) {
                    out.push(' ');
                }
            }
            c if c.is_whitespace() => {
                // collapse source whitespace; layout is reimposed above
                if !out.ends_with([' ', '\n']) && !out.is_empty() {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn break_line(out: &mut String, depth: usize) {
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
