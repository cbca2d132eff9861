//! Lenient streaming HTML tokenizer.
//!
//! Produces just enough structure for page analysis: doctypes, start and end
//! tags with attributes, text and comments. It never fails; malformed markup
//! degrades to text or bogus comments. Tag and attribute names are
//! lower-cased. `script`, `style`, `title` and `textarea` bodies are raw text
//! up to their end tag.

use std::borrow::Cow;

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "title", "textarea"];
const MAX_REFERENCE_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Doctype(Doctype),
    StartTag { name: String, attrs: Vec<Attribute>, self_closing: bool },
    EndTag { name: String },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// Look up an attribute value by (lower-case) key.
#[must_use]
pub fn attr<'a>(attrs: &'a [Attribute], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.as_str())
}

pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a raw-text start tag; the next token is its body.
    raw_text_end: Option<String>,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0, raw_text_end: None }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn skip_whitespace(&self, mut i: usize) -> usize {
        let bytes = self.bytes();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    /// Index of the next `>` at or after `from`, or end of input.
    fn find_gt(&self, from: usize) -> usize {
        self.input[from..]
            .find('>')
            .map_or(self.input.len(), |i| from + i)
    }

    fn raw_text(&mut self, tag: &str) -> Option<Token> {
        let rest = &self.input[self.pos..];
        let end = find_end_tag(rest, tag).unwrap_or(rest.len());
        let body = &rest[..end];
        self.pos += end;

        if body.is_empty() {
            return None;
        }
        let text = if tag == "script" || tag == "style" {
            body.to_owned()
        } else {
            decode_entities(body).into_owned()
        };
        Some(Token::Text(text))
    }

    fn text(&mut self) -> Token {
        let start = self.pos;
        // A `<` that did not open markup is literal text.
        let scan_from = if self.bytes()[start] == b'<' { start + 1 } else { start };
        let end = self.input[scan_from..]
            .find('<')
            .map_or(self.input.len(), |i| scan_from + i);
        self.pos = end;
        Token::Text(decode_entities(&self.input[start..end]).into_owned())
    }

    fn markup(&mut self) -> Option<Token> {
        let rest = &self.input[self.pos..];
        let next = rest.as_bytes().get(1).copied()?;

        if rest.starts_with("<!--") {
            let body_start = self.pos + 4;
            let (body_end, resume) = self.input[body_start..]
                .find("-->")
                .map_or((self.input.len(), self.input.len()), |i| (body_start + i, body_start + i + 3));
            self.pos = resume;
            return Some(Token::Comment(self.input[body_start..body_end].to_owned()));
        }

        match next {
            b'!' => {
                let body_start = self.pos + 2;
                let end = self.find_gt(body_start);
                let body = &self.input[body_start..end];
                self.pos = (end + 1).min(self.input.len());
                if body.get(..7).is_some_and(|kw| kw.eq_ignore_ascii_case("doctype")) {
                    Some(Token::Doctype(parse_doctype(&body[7..])))
                } else {
                    Some(Token::Comment(body.to_owned()))
                }
            }
            b'?' => {
                let body_start = self.pos + 2;
                let end = self.find_gt(body_start);
                self.pos = (end + 1).min(self.input.len());
                Some(Token::Comment(self.input[body_start..end].to_owned()))
            }
            b'/' => {
                let name_start = self.pos + 2;
                let end = self.find_gt(name_start);
                let inner = &self.input[name_start..end];
                self.pos = (end + 1).min(self.input.len());
                if inner.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    let name = inner
                        .split(|c: char| c.is_ascii_whitespace() || c == '/')
                        .next()
                        .unwrap_or_default()
                        .to_ascii_lowercase();
                    Some(Token::EndTag { name })
                } else {
                    Some(Token::Comment(inner.to_owned()))
                }
            }
            c if c.is_ascii_alphabetic() => Some(self.start_tag()),
            _ => None,
        }
    }

    fn start_tag(&mut self) -> Token {
        let bytes = self.bytes();
        let len = bytes.len();
        let mut i = self.pos + 1;

        let name_start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'/' && bytes[i] != b'>' {
            i += 1;
        }
        let name = self.input[name_start..i].to_ascii_lowercase();

        let mut attrs: Vec<Attribute> = Vec::new();
        let mut self_closing = false;

        loop {
            i = self.skip_whitespace(i);
            if i >= len {
                break;
            }
            match bytes[i] {
                b'>' => {
                    i += 1;
                    break;
                }
                b'/' => {
                    i += 1;
                    if bytes.get(i) == Some(&b'>') {
                        self_closing = true;
                        i += 1;
                        break;
                    }
                    continue;
                }
                _ => {}
            }

            let key_start = i;
            while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'/' | b'>' | b'=') {
                i += 1;
            }
            if i == key_start {
                // Stray `=`.
                i += 1;
                continue;
            }
            let key = self.input[key_start..i].to_ascii_lowercase();

            i = self.skip_whitespace(i);
            let mut value = String::new();
            if bytes.get(i) == Some(&b'=') {
                i = self.skip_whitespace(i + 1);
                match bytes.get(i).copied() {
                    Some(quote @ (b'"' | b'\'')) => {
                        let value_start = i + 1;
                        let value_end = self.input[value_start..]
                            .find(char::from(quote))
                            .map_or(len, |j| value_start + j);
                        value = decode_entities(&self.input[value_start..value_end]).into_owned();
                        i = (value_end + 1).min(len);
                    }
                    Some(_) => {
                        let value_start = i;
                        while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                            i += 1;
                        }
                        value = decode_entities(&self.input[value_start..i]).into_owned();
                    }
                    None => {}
                }
            }

            // Duplicate attributes: the first one wins.
            if !attrs.iter().any(|a| a.key == key) {
                attrs.push(Attribute { key, value });
            }
        }

        self.pos = i;
        if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.raw_text_end = Some(name.clone());
        }
        Token::StartTag { name, attrs, self_closing }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(tag) = self.raw_text_end.take() {
            if let Some(token) = self.raw_text(&tag) {
                return Some(token);
            }
        }
        if self.pos >= self.input.len() {
            return None;
        }
        if self.bytes()[self.pos] == b'<' {
            if let Some(token) = self.markup() {
                return Some(token);
            }
        }
        Some(self.text())
    }
}

/// Offset of the first `</tag` in `rest` whose name ends at whitespace, `/`,
/// `>` or end of input. Matching is ASCII case-insensitive and does not copy.
fn find_end_tag(rest: &str, tag: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    rest.match_indices("</").map(|(i, _)| i).find(|&i| {
        let name_end = i + 2 + tag.len();
        bytes
            .get(i + 2..name_end)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag.as_bytes()))
            && bytes
                .get(name_end)
                .is_none_or(|&b| b.is_ascii_whitespace() || b == b'/' || b == b'>')
    })
}

// =============================================================================
// DOCTYPE
// =============================================================================

/// Parse the part of a doctype after the `doctype` keyword, e.g.
/// ` html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://..."`.
fn parse_doctype(body: &str) -> Doctype {
    let mut rest = body.trim_start();
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = rest[..name_end].to_ascii_lowercase();
    rest = rest[name_end..].trim_start();

    let mut doctype = Doctype { name, public_id: None, system_id: None };
    let keyword_end = rest.find(|c: char| c.is_whitespace() || c == '"' || c == '\'').unwrap_or(rest.len());
    let keyword = &rest[..keyword_end];
    rest = &rest[keyword_end..];

    if keyword.eq_ignore_ascii_case("public") {
        let (public_id, after) = quoted(rest);
        doctype.public_id = public_id;
        doctype.system_id = quoted(after).0;
    } else if keyword.eq_ignore_ascii_case("system") {
        doctype.system_id = quoted(rest).0;
    }
    doctype
}

/// Read one quoted string after optional whitespace.
fn quoted(input: &str) -> (Option<String>, &str) {
    let input = input.trim_start();
    let Some(quote) = input.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return (None, input);
    };
    let body = &input[1..];
    match body.find(quote) {
        Some(end) => (Some(body[..end].to_owned()), &body[end + 1..]),
        None => (Some(body.to_owned()), ""),
    }
}

// =============================================================================
// CHARACTER REFERENCES
// =============================================================================

/// Decode the common named and all numeric character references.
/// Unrecognized references are left as written.
#[must_use]
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        if let Some((ch, consumed)) = decode_reference(tail) {
            out.push(ch);
            rest = &tail[consumed..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(tail: &str) -> Option<(char, usize)> {
    let (semi, _) = tail
        .char_indices()
        .take(MAX_REFERENCE_LEN)
        .find(|(_, c)| *c == ';')?;
    let name = &tail[1..semi];
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some((ch, semi + 1))
}

#[cfg(test)]
#[path = "tokenizer_test.rs"]
mod tests;
