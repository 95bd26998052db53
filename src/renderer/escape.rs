//! HTML escaping for interpolated values

use std::fmt::{self, Write};

/// Write `text` with `&`, `<`, `>` and `"` replaced by entities
pub fn escape_html<W: Write + ?Sized>(text: &str, out: &mut W) -> fmt::Result {
    let mut last = 0;
    for (i, b) in text.bytes().enumerate() {
        let entity = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            _ => continue,
        };
        out.write_str(&text[last..i])?;
        out.write_str(entity)?;
        last = i + 1;
    }
    out.write_str(&text[last..])
}
