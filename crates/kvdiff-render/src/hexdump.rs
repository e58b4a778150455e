//! Canonical hex dump.
//!
//! ```text
//! 00000000  68 65 6c 6c 6f 20 77 6f  72 6c 64                 |hello world|
//! ```

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Hex dump of `data`, one line per 16 bytes, each line newline-terminated.
///
/// Empty input produces an empty string.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(BYTES_PER_LINE) * 79);
    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let _ = write!(out, "{:08x}  ", line * BYTES_PER_LINE);
        for i in 0..BYTES_PER_LINE {
            match chunk.get(i) {
                Some(b) => {
                    let _ = write!(out, "{b:02x} ");
                }
                None => out.push_str("   "),
            }
            if i == 7 || i == 15 {
                out.push(' ');
            }
        }
        out.push('|');
        out.extend(chunk.iter().map(|&b| printable(b)));
        out.push_str("|\n");
    }
    out
}

/// Hex dump of at most `limit` bytes, noting how many were left out.
pub fn hex_dump_limited(data: &[u8], limit: Option<usize>) -> String {
    match limit {
        Some(max) if data.len() > max => {
            let mut out = hex_dump(&data[..max]);
            let _ = writeln!(out, "... ({} more bytes)", data.len() - max);
            out
        }
        _ => hex_dump(data),
    }
}

fn printable(b: u8) -> char {
    if (0x20..=0x7e).contains(&b) {
        b as char
    } else {
        '.'
    }
}
