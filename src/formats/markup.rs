// MarkupLite to plain text
//
// Tags are dropped, entities decoded, whitespace collapsed. Block
// elements end a paragraph with a blank line; <script>, <style> and
// <head> bodies are discarded.

use alloc::string::String;

pub fn strip_markup(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Emitter::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'<' => pos = out.tag(input, pos + 1),
            b'&' => {
                let (decoded, advance) = decode_entity(&input[pos..]);
                match decoded {
                    Some(c) => out.push(c),
                    None => out.push('&'),
                }
                pos += advance;
            }
            _ => {
                // tags and entities start on ASCII bytes, so `pos` is a
                // char boundary here
                let Some(c) = input[pos..].chars().next() else {
                    break;
                };
                out.push(c);
                pos += c.len_utf8();
            }
        }
    }

    out.finish()
}

struct Emitter {
    out: String,
    last_was_space: bool,
    trailing_newlines: u8,
}

impl Emitter {
    fn with_capacity(cap: usize) -> Self {
        Self {
            out: String::with_capacity(cap),
            last_was_space: true,
            trailing_newlines: 1,
        }
    }

    fn push(&mut self, c: char) {
        if c == '\n' {
            self.newline();
        } else if is_markup_ws(c) {
            if !self.last_was_space {
                self.out.push(' ');
                self.last_was_space = true;
                self.trailing_newlines = 0;
            }
        } else {
            self.out.push(c);
            self.last_was_space = false;
            self.trailing_newlines = 0;
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.trailing_newlines = self.trailing_newlines.saturating_add(1);
        self.last_was_space = true;
    }

    fn block_break(&mut self) {
        if self.out.is_empty() {
            return;
        }
        while self.trailing_newlines < 2 {
            self.out.push('\n');
            self.trailing_newlines += 1;
        }
        self.last_was_space = true;
    }

    // `pos` points just past '<'; returns the offset after the construct
    fn tag(&mut self, input: &str, mut pos: usize) -> usize {
        let bytes = input.as_bytes();
        if pos >= bytes.len() {
            return bytes.len();
        }
        match bytes[pos] {
            b'!' => return skip_bang(bytes, pos),
            b'?' => return skip_past(bytes, pos, b"?>"),
            _ => {}
        }

        let closing = bytes[pos] == b'/';
        if closing {
            pos += 1;
        }
        let name_start = pos;
        while pos < bytes.len() && !is_tag_delim(bytes[pos]) {
            pos += 1;
        }
        let name = &bytes[name_start..pos];
        let after = skip_past(bytes, pos, b">");

        if name.eq_ignore_ascii_case(b"br") {
            self.newline();
        } else if is_block_element(name) {
            self.block_break();
        }

        if !closing && is_skipped_element(name) {
            return find_close_tag(bytes, after, name).unwrap_or(bytes.len());
        }
        after
    }

    fn finish(mut self) -> String {
        let kept = self.out.trim_end_matches([' ', '\n']).len();
        self.out.truncate(kept);
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out
    }
}

fn is_block_element(name: &[u8]) -> bool {
    const BLOCKS: &[&[u8]] = &[
        b"p", b"div", b"h1", b"h2", b"h3", b"h4", b"h5", b"h6", b"li", b"ul", b"ol", b"dl",
        b"dt", b"dd", b"tr", b"blockquote", b"section", b"article", b"header", b"footer", b"pre",
        b"hr", b"table",
    ];
    BLOCKS.iter().any(|b| b.eq_ignore_ascii_case(name))
}

fn is_skipped_element(name: &[u8]) -> bool {
    [&b"script"[..], b"style", b"head"]
        .iter()
        .any(|s| s.eq_ignore_ascii_case(name))
}

// offset just past the matching `</name ...>`
fn find_close_tag(bytes: &[u8], mut pos: usize, name: &[u8]) -> Option<usize> {
    while pos + 2 < bytes.len() {
        if bytes[pos] == b'<' && bytes[pos + 1] == b'/' {
            let start = pos + 2;
            let mut end = start;
            while end < bytes.len() && !is_tag_delim(bytes[end]) {
                end += 1;
            }
            if bytes[start..end].eq_ignore_ascii_case(name) {
                return Some(skip_past(bytes, end, b">"));
            }
        }
        pos += 1;
    }
    None
}

// decoded char (None when unrecognised) and bytes consumed
fn decode_entity(s: &str) -> (Option<char>, usize) {
    let rest = &s.as_bytes()[1..];
    let scan = rest.len().min(12);
    let Some(semi) = rest[..scan].iter().position(|&b| b == b';') else {
        return (None, 1);
    };
    let entity = &rest[..semi];

    let decoded = match entity {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        b"nbsp" => Some(' '),
        b"mdash" => Some('\u{2014}'),
        b"ndash" => Some('\u{2013}'),
        b"lsquo" => Some('\u{2018}'),
        b"rsquo" => Some('\u{2019}'),
        b"ldquo" => Some('\u{201C}'),
        b"rdquo" => Some('\u{201D}'),
        b"hellip" => Some('\u{2026}'),
        b"copy" => Some('\u{00A9}'),
        _ => match entity {
            [b'#', b'x' | b'X', hex @ ..] => parse_radix(hex, 16),
            [b'#', dec @ ..] => parse_radix(dec, 10),
            _ => None,
        },
    };

    match decoded {
        Some(c) => (Some(c), semi + 2),
        None => (None, 1),
    }
}

fn parse_radix(digits: &[u8], radix: u32) -> Option<char> {
    if digits.is_empty() {
        return None;
    }
    let mut val = 0u32;
    for &b in digits {
        let d = (b as char).to_digit(radix)?;
        val = val.checked_mul(radix)?.checked_add(d)?;
    }
    match val {
        0 => None,
        0xA0 => Some(' '),
        _ => char::from_u32(val),
    }
}

#[inline]
fn is_markup_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

#[inline]
fn is_tag_delim(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/')
}

fn skip_past(bytes: &[u8], pos: usize, terminator: &[u8]) -> usize {
    bytes[pos.min(bytes.len())..]
        .windows(terminator.len())
        .position(|w| w == terminator)
        .map_or(bytes.len(), |i| pos + i + terminator.len())
}

fn skip_bang(bytes: &[u8], pos: usize) -> usize {
    let rest = &bytes[pos..];
    if rest.starts_with(b"!--") {
        skip_past(bytes, pos + 3, b"-->")
    } else if rest.starts_with(b"![CDATA[") {
        skip_past(bytes, pos + 8, b"]]>")
    } else {
        skip_past(bytes, pos, b">")
    }
}
