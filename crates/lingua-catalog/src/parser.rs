//! Catalog document parser.
//!
//! Converts a serialized catalog document — the XML-flavored translation
//! source format produced by the authoring toolchain — into a [`Catalog`].
//! The parser is a deterministic cursor over the raw text: no parser
//! framework, no retained state between calls, one pass.
//!
//! # Invariants
//!
//! 1. **Pure**: `parse` is a function from bytes to `Catalog` with no side
//!    effects; a failed parse yields a [`ParseError`], never a partial
//!    catalog.
//! 2. **Line-addressed errors**: every structural error carries the
//!    1-based line it was detected on.
//! 3. **Tolerant of the authoring surface**: unknown elements (locations,
//!    dependency lists, future extensions) are skipped without error;
//!    stale `vanished`/`obsolete` entries are retained but flagged.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Bad encoding | non-UTF-8 bytes or a non-UTF-8 `encoding` declaration | `InvalidUtf8` / `UnsupportedEncoding` |
//! | Unclosed block | EOF inside an element | `UnexpectedEof` |
//! | Mismatched tag | close tag differs from open tag | `MismatchedTag` |
//! | Missing field | context without `<name>`, message without `<source>` | `MissingField` |
//! | Bad entity | bare `&`, unknown or unterminated reference | `BadEntity` |

use std::fmt;

use memchr::{memchr, memchr_iter};

use crate::escape::unescape;
use crate::model::{Catalog, Context, Message, MessageText, TranslationState};

/// What went wrong while parsing a catalog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The document is not valid UTF-8.
    InvalidUtf8,
    /// The XML declaration names an encoding other than UTF-8.
    UnsupportedEncoding(String),
    /// The document ended inside an open construct.
    UnexpectedEof { expected: String },
    /// Text or markup appeared where the grammar does not allow it.
    UnexpectedContent { found: String },
    /// A closing tag did not match the element being closed.
    MismatchedTag { expected: String, found: String },
    /// A required attribute is absent or empty.
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    /// A required child element is absent or empty.
    MissingField {
        element: &'static str,
        field: &'static str,
    },
    /// A malformed or unknown entity reference.
    BadEntity { entity: String },
}

/// Parse failure with the 1-based line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    line: u32,
}

impl ParseError {
    #[must_use]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            ParseErrorKind::InvalidUtf8 => write!(f, "document is not valid UTF-8"),
            ParseErrorKind::UnsupportedEncoding(enc) => {
                write!(f, "unsupported document encoding `{enc}` (only UTF-8 is accepted)")
            }
            ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of document, expected {expected}")
            }
            ParseErrorKind::UnexpectedContent { found } => {
                write!(f, "unexpected content: {found}")
            }
            ParseErrorKind::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            ParseErrorKind::MissingAttribute { element, attribute } => {
                write!(f, "<{element}> is missing a non-empty `{attribute}` attribute")
            }
            ParseErrorKind::MissingField { element, field } => {
                write!(f, "<{element}> is missing a non-empty <{field}>")
            }
            ParseErrorKind::BadEntity { entity } => {
                write!(f, "invalid entity reference `{entity}`")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a serialized catalog document.
///
/// Pure transformation: the returned [`Catalog`] is a self-contained value
/// and the input is not retained. See the module docs for the accepted
/// grammar and failure modes.
pub fn parse(document: &[u8]) -> Result<Catalog, ParseError> {
    let text = decode(document)?;
    Parser::new(text).parse_document()
}

/// Validate UTF-8 (stripping a leading BOM) and any declared encoding.
fn decode(document: &[u8]) -> Result<&str, ParseError> {
    let document = document.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(document);
    let text = match std::str::from_utf8(document) {
        Ok(text) => text,
        Err(err) => {
            let line = 1 + count_newlines(&document[..err.valid_up_to()]);
            return Err(ParseError {
                kind: ParseErrorKind::InvalidUtf8,
                line,
            });
        }
    };
    if let Some(encoding) = declared_encoding(text) {
        if !encoding.eq_ignore_ascii_case("utf-8") {
            return Err(ParseError {
                kind: ParseErrorKind::UnsupportedEncoding(encoding.to_string()),
                line: 1,
            });
        }
    }
    Ok(text)
}

/// Extract the `encoding` value from a leading XML declaration, if any.
fn declared_encoding(text: &str) -> Option<&str> {
    let decl = text.trim_start().strip_prefix("<?xml")?;
    let decl = &decl[..decl.find("?>")?];
    let after = decl.split_once("encoding")?.1.trim_start();
    let after = after.strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after[1..];
    Some(&value[..value.find(quote)?])
}

fn count_newlines(bytes: &[u8]) -> u32 {
    memchr_iter(b'\n', bytes).count() as u32
}

/// An opening tag with its decoded attributes.
struct Tag<'a> {
    name: &'a str,
    attrs: Vec<(&'a str, String)>,
    self_closing: bool,
    line: u32,
}

impl Tag<'_> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Structural events pulled from the document between elements.
enum Node<'a> {
    Open(Tag<'a>),
    Close(&'a str, u32),
    Eof,
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    line: u32,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0, line: 1 }
    }

    // ── Document grammar ────────────────────────────────────────────────

    fn parse_document(mut self) -> Result<Catalog, ParseError> {
        let root = match self.next_node()? {
            Node::Open(tag) if tag.name == "TS" => tag,
            Node::Open(tag) => {
                return Err(self.err_at(
                    tag.line,
                    ParseErrorKind::UnexpectedContent {
                        found: format!("<{}> (expected <TS>)", tag.name),
                    },
                ));
            }
            Node::Close(name, line) => {
                return Err(self.err_at(
                    line,
                    ParseErrorKind::UnexpectedContent {
                        found: format!("</{name}> (expected <TS>)"),
                    },
                ));
            }
            Node::Eof => {
                return Err(self.err(ParseErrorKind::UnexpectedEof {
                    expected: "<TS>".to_string(),
                }));
            }
        };

        let locale = root
            .attr("language")
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                self.err_at(
                    root.line,
                    ParseErrorKind::MissingAttribute {
                        element: "TS",
                        attribute: "language",
                    },
                )
            })?
            .to_string();
        let format_version = root.attr("version").map(str::to_string);

        let mut contexts = Vec::new();
        if !root.self_closing {
            loop {
                match self.next_node()? {
                    Node::Open(tag) if tag.name == "context" => {
                        contexts.push(self.parse_context(&tag)?);
                    }
                    // Dependency lists and future top-level extensions.
                    Node::Open(tag) => self.skip_element(&tag)?,
                    Node::Close("TS", _) => break,
                    Node::Close(name, line) => {
                        return Err(self.err_at(
                            line,
                            ParseErrorKind::MismatchedTag {
                                expected: "TS".to_string(),
                                found: name.to_string(),
                            },
                        ));
                    }
                    Node::Eof => {
                        return Err(self.err(ParseErrorKind::UnexpectedEof {
                            expected: "</TS>".to_string(),
                        }));
                    }
                }
            }
        }

        match self.next_node()? {
            Node::Eof => Ok(Catalog {
                locale,
                format_version,
                contexts,
            }),
            Node::Open(tag) => Err(self.err_at(
                tag.line,
                ParseErrorKind::UnexpectedContent {
                    found: format!("<{}> after </TS>", tag.name),
                },
            )),
            Node::Close(name, line) => Err(self.err_at(
                line,
                ParseErrorKind::UnexpectedContent {
                    found: format!("</{name}> after </TS>"),
                },
            )),
        }
    }

    fn parse_context(&mut self, open: &Tag<'a>) -> Result<Context, ParseError> {
        let mut name: Option<String> = None;
        let mut messages = Vec::new();

        if !open.self_closing {
            loop {
                match self.next_node()? {
                    Node::Open(tag) if tag.name == "name" => {
                        name = Some(self.read_element_text(&tag)?);
                    }
                    Node::Open(tag) if tag.name == "message" => {
                        messages.push(self.parse_message(&tag)?);
                    }
                    Node::Open(tag) => self.skip_element(&tag)?,
                    Node::Close("context", _) => break,
                    Node::Close(found, line) => {
                        return Err(self.err_at(
                            line,
                            ParseErrorKind::MismatchedTag {
                                expected: "context".to_string(),
                                found: found.to_string(),
                            },
                        ));
                    }
                    Node::Eof => {
                        return Err(self.err(ParseErrorKind::UnexpectedEof {
                            expected: "</context>".to_string(),
                        }));
                    }
                }
            }
        }

        let name = name.filter(|n| !n.is_empty()).ok_or_else(|| {
            self.err_at(
                open.line,
                ParseErrorKind::MissingField {
                    element: "context",
                    field: "name",
                },
            )
        })?;
        Ok(Context { name, messages })
    }

    fn parse_message(&mut self, open: &Tag<'a>) -> Result<Message, ParseError> {
        let numerus = open.attr("numerus") == Some("yes");
        let mut source: Option<String> = None;
        let mut singular: Option<String> = None;
        let mut forms: Option<Vec<String>> = None;
        let mut state = TranslationState::Finished;
        let mut comment = None;
        let mut translator_comment = None;
        let mut extra_comment = None;

        if !open.self_closing {
            loop {
                match self.next_node()? {
                    Node::Open(tag) if tag.name == "source" => {
                        source = Some(self.read_element_text(&tag)?);
                    }
                    Node::Open(tag) if tag.name == "translation" => {
                        state = match tag.attr("type") {
                            Some("unfinished") => TranslationState::Unfinished,
                            Some("vanished") | Some("obsolete") => TranslationState::Vanished,
                            _ => TranslationState::Finished,
                        };
                        if numerus {
                            forms = Some(self.parse_numerus_forms(&tag)?);
                        } else {
                            singular = Some(self.read_element_text(&tag)?);
                        }
                    }
                    Node::Open(tag) if tag.name == "comment" => {
                        comment = Some(self.read_element_text(&tag)?);
                    }
                    Node::Open(tag) if tag.name == "translatorcomment" => {
                        translator_comment = Some(self.read_element_text(&tag)?);
                    }
                    Node::Open(tag) if tag.name == "extracomment" => {
                        extra_comment = Some(self.read_element_text(&tag)?);
                    }
                    // <location>, <oldsource>, and friends.
                    Node::Open(tag) => self.skip_element(&tag)?,
                    Node::Close("message", _) => break,
                    Node::Close(found, line) => {
                        return Err(self.err_at(
                            line,
                            ParseErrorKind::MismatchedTag {
                                expected: "message".to_string(),
                                found: found.to_string(),
                            },
                        ));
                    }
                    Node::Eof => {
                        return Err(self.err(ParseErrorKind::UnexpectedEof {
                            expected: "</message>".to_string(),
                        }));
                    }
                }
            }
        }

        let source = source.filter(|s| !s.is_empty()).ok_or_else(|| {
            self.err_at(
                open.line,
                ParseErrorKind::MissingField {
                    element: "message",
                    field: "source",
                },
            )
        })?;
        let text = if numerus {
            MessageText::Plural(forms.unwrap_or_default())
        } else {
            MessageText::Singular(singular.unwrap_or_default())
        };
        Ok(Message {
            source,
            text,
            state,
            comment,
            translator_comment,
            extra_comment,
        })
    }

    /// Collect `<numerusform>` variants until `</translation>`.
    fn parse_numerus_forms(&mut self, open: &Tag<'a>) -> Result<Vec<String>, ParseError> {
        let mut forms = Vec::new();
        if open.self_closing {
            return Ok(forms);
        }
        loop {
            match self.next_node()? {
                Node::Open(tag) if tag.name == "numerusform" => {
                    forms.push(self.read_element_text(&tag)?);
                }
                Node::Open(tag) => self.skip_element(&tag)?,
                Node::Close("translation", _) => return Ok(forms),
                Node::Close(found, line) => {
                    return Err(self.err_at(
                        line,
                        ParseErrorKind::MismatchedTag {
                            expected: "translation".to_string(),
                            found: found.to_string(),
                        },
                    ));
                }
                Node::Eof => {
                    return Err(self.err(ParseErrorKind::UnexpectedEof {
                        expected: "</translation>".to_string(),
                    }));
                }
            }
        }
    }

    // ── Lexical layer ───────────────────────────────────────────────────

    /// Pull the next structural event, skipping whitespace, comments,
    /// processing instructions, and `<!…>` declarations.
    fn next_node(&mut self) -> Result<Node<'a>, ParseError> {
        loop {
            let start_line = self.line;
            let text = self.take_until_lt();
            if let Some(found) = first_non_ws(text) {
                return Err(self.err_at(
                    start_line + count_newlines(&text.as_bytes()[..found.1]),
                    ParseErrorKind::UnexpectedContent {
                        found: format!("stray text `{}`", found.0),
                    },
                ));
            }
            if self.at_eof() {
                return Ok(Node::Eof);
            }
            if self.eat("<!--") {
                self.skip_comment()?;
            } else if self.rest().starts_with("<?") {
                self.skip_to("?>")?;
            } else if self.rest().starts_with("<!") {
                self.skip_to(">")?;
            } else if self.rest().starts_with("</") {
                let (name, line) = self.read_close_tag()?;
                return Ok(Node::Close(name, line));
            } else {
                return Ok(Node::Open(self.read_open_tag()?));
            }
        }
    }

    /// Read the text content of a leaf element and its matching close tag.
    fn read_element_text(&mut self, open: &Tag<'a>) -> Result<String, ParseError> {
        if open.self_closing {
            return Ok(String::new());
        }
        let start_line = self.line;
        let raw = self.take_until_lt();
        if self.at_eof() {
            return Err(self.err(ParseErrorKind::UnexpectedEof {
                expected: format!("</{}>", open.name),
            }));
        }
        if !self.rest().starts_with("</") {
            return Err(self.err(ParseErrorKind::UnexpectedContent {
                found: format!("markup inside <{}>", open.name),
            }));
        }
        let (found, line) = self.read_close_tag()?;
        if found != open.name {
            return Err(self.err_at(
                line,
                ParseErrorKind::MismatchedTag {
                    expected: open.name.to_string(),
                    found: found.to_string(),
                },
            ));
        }
        unescape(raw)
            .map(|cow| cow.into_owned())
            .map_err(|e| {
                self.err_at(
                    start_line + count_newlines(&raw.as_bytes()[..e.offset()]),
                    ParseErrorKind::BadEntity {
                        entity: e.entity().to_string(),
                    },
                )
            })
    }

    /// Skip an element and everything inside it, by nesting depth.
    fn skip_element(&mut self, open: &Tag<'a>) -> Result<(), ParseError> {
        if open.self_closing {
            return Ok(());
        }
        let mut depth = 1usize;
        loop {
            self.take_until_lt();
            if self.at_eof() {
                return Err(self.err(ParseErrorKind::UnexpectedEof {
                    expected: format!("</{}>", open.name),
                }));
            }
            if self.eat("<!--") {
                self.skip_comment()?;
            } else if self.rest().starts_with("<?") {
                self.skip_to("?>")?;
            } else if self.rest().starts_with("<!") {
                self.skip_to(">")?;
            } else if self.rest().starts_with("</") {
                self.read_close_tag()?;
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            } else {
                let tag = self.read_open_tag()?;
                if !tag.self_closing {
                    depth += 1;
                }
            }
        }
    }

    fn read_open_tag(&mut self) -> Result<Tag<'a>, ParseError> {
        let line = self.line;
        self.advance(1); // '<'
        let name = self.read_name()?;
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'>') => {
                    self.advance(1);
                    return Ok(Tag {
                        name,
                        attrs,
                        self_closing: false,
                        line,
                    });
                }
                Some(b'/') => {
                    self.advance(1);
                    if self.peek() != Some(b'>') {
                        return Err(self.err(ParseErrorKind::UnexpectedContent {
                            found: format!("`/` not followed by `>` in <{name}>"),
                        }));
                    }
                    self.advance(1);
                    return Ok(Tag {
                        name,
                        attrs,
                        self_closing: true,
                        line,
                    });
                }
                Some(_) => attrs.push(self.read_attribute(name)?),
                None => {
                    return Err(self.err(ParseErrorKind::UnexpectedEof {
                        expected: format!("`>` closing <{name}>"),
                    }));
                }
            }
        }
    }

    fn read_attribute(&mut self, element: &'a str) -> Result<(&'a str, String), ParseError> {
        let name = self.read_name()?;
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Err(self.err(ParseErrorKind::UnexpectedContent {
                found: format!("attribute `{name}` in <{element}> has no value"),
            }));
        }
        self.advance(1);
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(self.err(ParseErrorKind::UnexpectedContent {
                    found: format!("unquoted value for attribute `{name}`"),
                }));
            }
        };
        self.advance(1);
        let value_line = self.line;
        let start = self.pos;
        let Some(len) = memchr(quote, self.rest().as_bytes()) else {
            return Err(self.err(ParseErrorKind::UnexpectedEof {
                expected: format!("closing quote for attribute `{name}`"),
            }));
        };
        self.advance(len);
        let raw = &self.text[start..self.pos];
        self.advance(1); // closing quote
        let value = unescape(raw).map_err(|e| {
            self.err_at(
                value_line + count_newlines(&raw.as_bytes()[..e.offset()]),
                ParseErrorKind::BadEntity {
                    entity: e.entity().to_string(),
                },
            )
        })?;
        Ok((name, value.into_owned()))
    }

    fn read_close_tag(&mut self) -> Result<(&'a str, u32), ParseError> {
        let line = self.line;
        self.advance(2); // "</"
        let name = self.read_name()?;
        self.skip_whitespace();
        if self.peek() != Some(b'>') {
            return Err(self.err(ParseErrorKind::UnexpectedContent {
                found: format!("malformed closing tag </{name}"),
            }));
        }
        self.advance(1);
        Ok((name, line))
    }

    fn read_name(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':' {
                self.pos += 1; // names never contain newlines
            } else {
                break;
            }
        }
        if self.pos == start {
            let found = self
                .rest()
                .chars()
                .next()
                .map_or_else(|| "end of document".to_string(), |c| format!("`{c}`"));
            return Err(self.err(ParseErrorKind::UnexpectedContent {
                found: format!("{found} where a tag name was expected"),
            }));
        }
        Ok(&self.text[start..self.pos])
    }

    // ── Cursor primitives ───────────────────────────────────────────────

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self, n: usize) {
        let end = (self.pos + n).min(self.text.len());
        self.line += count_newlines(&self.text.as_bytes()[self.pos..end]);
        self.pos = end;
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.advance(prefix.len());
            true
        } else {
            false
        }
    }

    /// Consume and return everything up to the next `<` (or EOF).
    fn take_until_lt(&mut self) -> &'a str {
        let start = self.pos;
        let len = memchr(b'<', self.rest().as_bytes()).unwrap_or(self.rest().len());
        self.advance(len);
        &self.text[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                }
                _ => break,
            }
        }
    }

    /// Skip past a `<!--` comment (the opener is already consumed).
    fn skip_comment(&mut self) -> Result<(), ParseError> {
        self.skip_to("-->")
    }

    fn skip_to(&mut self, delimiter: &str) -> Result<(), ParseError> {
        match self.rest().find(delimiter) {
            Some(i) => {
                self.advance(i + delimiter.len());
                Ok(())
            }
            None => Err(self.err(ParseErrorKind::UnexpectedEof {
                expected: format!("`{delimiter}`"),
            })),
        }
    }

    fn err(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            line: self.line,
        }
    }

    fn err_at(&self, line: u32, kind: ParseErrorKind) -> ParseError {
        ParseError { kind, line }
    }
}

/// First non-whitespace character and its byte offset, if any.
fn first_non_ws(text: &str) -> Option<(char, usize)> {
    text.char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, c)| (c, i))
}
