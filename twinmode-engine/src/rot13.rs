/// Rotates ASCII letters by 13 places. Everything else passes through.
pub fn transform(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            'a'..='z' => rotate(ch, b'a'),
            'A'..='Z' => rotate(ch, b'A'),
            other => other,
        })
        .collect()
}

fn rotate(ch: char, base: u8) -> char {
    (((ch as u8 - base + 13) % 26) + base) as char
}
