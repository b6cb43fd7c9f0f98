/// Split a user-supplied JVM argument line.
///
/// Whitespace separates arguments except inside double quotes. The quotes
/// themselves are dropped, `\"` yields a literal quote, and arguments already
/// in `existing` (or repeated in the line) are skipped.
pub fn tokenize_vmargs(line: &str, existing: &[String]) -> Vec<String> {
    fn push(token: &mut String, existing: &[String], out: &mut Vec<String>) {
        if !token.is_empty() && !existing.contains(token) && !out.contains(token) {
            out.push(std::mem::take(token));
        }
        token.clear();
    }

    let mut out = Vec::new();

    let mut token = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'"') => {
                chars.next();
                token.push('"');
            }
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => push(&mut token, existing, &mut out),
            c => token.push(c),
        }
    }
    push(&mut token, existing, &mut out);
    out
}
