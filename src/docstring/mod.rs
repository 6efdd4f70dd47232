//! Documentation comment parsing.
//!
//! Turns a raw docstring into a [`ParsedDoc`] with summary, description,
//! parameters, returns, raised exceptions, examples and free-form notes.
//! Three dialects are understood:
//!
//! - [`Dialect::Google`]: `Args:` style headers with indented entries
//! - [`Dialect::Numpy`]: underlined headers with `name : type` entries
//! - [`Dialect::Sphinx`]: `:param name:` field lists
//!
//! Detection scans line by line and commits to the first dialect whose
//! markers appear. Text without markers becomes summary and description.
//! Parsing never fails; questionable input is reported as [`DocIssue`]s.

mod google;
mod numpy;
mod sphinx;

use std::fmt;

/// Regex patterns for parsing (compiled once)
mod patterns {
    use std::sync::LazyLock;

    pub static GOOGLE_HEADER: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(
            r"^(?i)(args|arguments|parameters|params|keyword args|keyword arguments|other parameters|returns|return|yields|yield|raises|exceptions|examples|example|attributes|notes|note|warnings|warning|warns|see also|todo|references|methods):$",
        )
        .unwrap()
    });

    pub static NUMPY_HEADER: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(
            r"^(?i)(parameters|params|other parameters|returns|yields|receives|raises|warns|warnings|see also|notes|references|examples|attributes|methods)$",
        )
        .unwrap()
    });

    pub static UNDERLINE: LazyLock<regex::Regex> =
        LazyLock::new(|| regex::Regex::new(r"^-{3,}$").unwrap());

    pub static SPHINX_FIELD: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(
            r"^:(param|parameter|arg|argument|key|keyword|type|returns?|rtype|raises?|except|exception|var|ivar|cvar|vartype|yields?|ytype)\b",
        )
        .unwrap()
    });

    /// `:name args: content` (args and content optional)
    pub static SPHINX_FIELD_PARTS: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(r"^:([A-Za-z_]+)(?:\s+([^:]*?))?\s*:(?:\s+(.*))?$").unwrap()
    });

    /// `name (type): description` or `name: description`
    pub static GOOGLE_PARAM: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(r"^(\*{0,2}[A-Za-z_][\w.]*)\s*(?:\((.+?)\))?\s*:(?:\s+(.*))?$").unwrap()
    });

    /// `ExceptionType: description`
    pub static GOOGLE_RAISES: LazyLock<regex::Regex> =
        LazyLock::new(|| regex::Regex::new(r"^([A-Za-z_][\w.]*)\s*:(?:\s+(.*))?$").unwrap());

    /// `name : type` or `name1, name2 : type` or a bare `name`
    pub static NUMPY_PARAM: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(
            r"^(\*{0,2}[A-Za-z_][\w.]*(?:\s*,\s*\*{0,2}[A-Za-z_][\w.]*)*)\s*(?::\s*(.*))?$",
        )
        .unwrap()
    });

    /// `name : type` in a NumPy returns section
    pub static NUMPY_NAMED_RETURN: LazyLock<regex::Regex> =
        LazyLock::new(|| regex::Regex::new(r"^([A-Za-z_]\w*)\s+:\s+(.+)$").unwrap());

    pub static IDENTIFIER: LazyLock<regex::Regex> =
        LazyLock::new(|| regex::Regex::new(r"^[A-Za-z_][\w.]*$").unwrap());
}

// ============================================================================
// Parsed model
// ============================================================================

/// The documentation dialect a docstring was parsed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Dialect {
    Google,
    Numpy,
    Sphinx,
}

impl Dialect {
    pub fn display(&self) -> &'static str {
        match self {
            Dialect::Google => "google",
            Dialect::Numpy => "numpy",
            Dialect::Sphinx => "sphinx",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// A documented parameter or attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParamDoc {
    pub name: String,
    pub type_expr: Option<String>,
    pub description: String,
}

/// A documented return or yield value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReturnDoc {
    /// Only NumPy docstrings name return values
    pub name: Option<String>,
    pub type_expr: Option<String>,
    pub description: String,
}

/// A documented raised exception
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RaisesDoc {
    pub exception: String,
    pub description: String,
}

/// Text that belongs to no structured section
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Note {
    pub heading: Option<String>,
    pub body: String,
}

/// Structured documentation. Missing sections are empty, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedDoc {
    pub dialect: Option<Dialect>,
    pub summary: String,
    pub description: String,
    pub params: Vec<ParamDoc>,
    pub returns: Vec<ReturnDoc>,
    pub yields: Vec<ReturnDoc>,
    pub raises: Vec<RaisesDoc>,
    pub examples: Vec<String>,
    pub attributes: Vec<ParamDoc>,
    pub notes: Vec<Note>,
}

impl ParsedDoc {
    pub fn param(&self, name: &str) -> Option<&ParamDoc> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn is_structured(&self) -> bool {
        self.dialect.is_some()
    }

    fn param_mut(&mut self, name: &str) -> &mut ParamDoc {
        match self.params.iter().position(|p| p.name == name) {
            Some(idx) => &mut self.params[idx],
            None => {
                self.params.push(ParamDoc {
                    name: name.to_string(),
                    ..ParamDoc::default()
                });
                let last = self.params.len() - 1;
                &mut self.params[last]
            }
        }
    }

    fn attribute_mut(&mut self, name: &str) -> &mut ParamDoc {
        match self.attributes.iter().position(|p| p.name == name) {
            Some(idx) => &mut self.attributes[idx],
            None => {
                self.attributes.push(ParamDoc {
                    name: name.to_string(),
                    ..ParamDoc::default()
                });
                let last = self.attributes.len() - 1;
                &mut self.attributes[last]
            }
        }
    }
}

/// Something in a docstring that was parsed on a best-effort basis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocIssue {
    /// Zero-based line within the cleaned docstring
    pub line: usize,
    pub message: String,
}

impl DocIssue {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse a raw docstring.
pub fn parse(raw: &str) -> ParsedDoc {
    parse_with_issues(raw).0
}

/// Parse a raw docstring, also returning every best-effort decision made.
pub fn parse_with_issues(raw: &str) -> (ParsedDoc, Vec<DocIssue>) {
    let text = cleandoc(raw);
    let lines = doc_lines(raw, &text);
    let mut doc = ParsedDoc::default();
    let mut issues = Vec::new();

    match first_marker(&lines) {
        Some((dialect, start)) => {
            doc.dialect = Some(dialect);
            fill_preamble(&mut doc, &lines[..start]);
            let rest = &lines[start..];
            match dialect {
                Dialect::Google => google::parse(&mut doc, rest, &mut issues),
                Dialect::Numpy => numpy::parse(&mut doc, rest, &mut issues),
                Dialect::Sphinx => sphinx::parse(&mut doc, rest, &mut issues),
            }
        }
        None => fill_preamble(&mut doc, &lines),
    }

    (doc, issues)
}

/// Which dialect a docstring's first marker belongs to, if any.
pub fn detect_dialect(raw: &str) -> Option<Dialect> {
    let text = cleandoc(raw);
    first_marker(&doc_lines(raw, &text)).map(|(dialect, _)| dialect)
}

/// Strip a docstring's common indentation the way `inspect.cleandoc` does.
///
/// Tabs expand to 8 columns, the first line loses its leading whitespace,
/// remaining lines lose their shared margin, and leading/trailing blank
/// lines are removed.
pub fn cleandoc(raw: &str) -> String {
    let expanded: Vec<String> = raw.lines().map(expand_tabs).collect();
    let Some((first, rest)) = expanded.split_first() else {
        return String::new();
    };

    let margin = margin_of(rest);

    let mut out: Vec<&str> = Vec::with_capacity(expanded.len());
    out.push(first.trim());
    for line in rest {
        let trimmed = line.trim_end();
        if trimmed.len() >= margin && trimmed.is_char_boundary(margin) {
            out.push(&trimmed[margin..]);
        } else {
            out.push(trimmed.trim_start());
        }
    }

    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// Shared indentation of the non-blank lines
fn margin_of(lines: &[String]) -> usize {
    lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0)
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let next = (col / 8 + 1) * 8;
            out.extend(std::iter::repeat_n(' ', next - col));
            col = next;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

// ============================================================================
// Shared line model
// ============================================================================

/// One docstring line with its indentation split off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Line<'a> {
    number: usize,
    indent: usize,
    text: &'a str,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .map(|(number, raw)| {
            let body = raw.trim_start_matches(' ');
            Line {
                number,
                indent: raw.len() - body.len(),
                text: body.trim_end(),
            }
        })
        .collect()
}

/// Lines of the cleaned docstring `text`.
///
/// A header written on the opening line (`"""Args:`) had no margin, yet
/// `cleandoc` strips one from its body. That margin is put back on the
/// following lines so the entries stay indented below the header.
fn doc_lines<'a>(raw: &str, text: &'a str) -> Vec<Line<'a>> {
    let mut lines = split_lines(text);
    let opens_with_header = raw.lines().next().is_some_and(|l| !l.trim().is_empty())
        && lines
            .first()
            .is_some_and(|l| patterns::GOOGLE_HEADER.is_match(l.text));
    if opens_with_header {
        let rest: Vec<String> = raw.lines().skip(1).map(expand_tabs).collect();
        let margin = margin_of(&rest);
        for line in lines.iter_mut().skip(1).filter(|l| !l.is_blank()) {
            line.indent += margin;
        }
    }
    lines
}

fn next_non_blank<'a>(lines: &[Line<'a>], from: usize) -> Option<Line<'a>> {
    lines.iter().skip(from).find(|l| !l.is_blank()).copied()
}

/// The first line that carries a dialect marker
fn first_marker(lines: &[Line<'_>]) -> Option<(Dialect, usize)> {
    (0..lines.len()).find_map(|i| marker_at(lines, i).map(|dialect| (dialect, i)))
}

fn marker_at(lines: &[Line<'_>], i: usize) -> Option<Dialect> {
    let line = lines[i];
    if line.is_blank() {
        None
    } else if patterns::SPHINX_FIELD.is_match(line.text) {
        Some(Dialect::Sphinx)
    } else if numpy::is_known_header(lines, i) {
        Some(Dialect::Numpy)
    } else if google::is_header(lines, i) {
        Some(Dialect::Google)
    } else {
        None
    }
}

/// A marker belonging to a dialect other than `current`
fn is_foreign_marker(lines: &[Line<'_>], i: usize, current: Dialect) -> bool {
    if patterns::UNDERLINE.is_match(lines[i].text) && current != Dialect::Numpy {
        return true;
    }
    marker_at(lines, i).is_some_and(|d| d != current)
}

/// Summary is the first paragraph; description is everything after it.
fn fill_preamble(doc: &mut ParsedDoc, lines: &[Line<'_>]) {
    let start = lines.iter().position(|l| !l.is_blank()).unwrap_or(lines.len());
    let lines = &lines[start..];
    let end = lines.iter().position(|l| l.is_blank()).unwrap_or(lines.len());
    doc.summary = join_words(&lines[..end]);
    doc.description = block_text(&lines[end..]);
}

/// Join non-blank lines into a single line
fn join_words(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(|l| l.text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lines with their shared indentation removed, blank lines kept inside
fn block_text(lines: &[Line<'_>]) -> String {
    let margin = lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(|l| l.indent)
        .min()
        .unwrap_or(0);
    let text = lines
        .iter()
        .map(|l| {
            if l.is_blank() {
                String::new()
            } else {
                format!("{}{}", " ".repeat(l.indent - margin), l.text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    text.trim_matches('\n').to_string()
}

/// Blank-line separated blocks, each as block text
fn paragraphs(lines: &[Line<'_>]) -> Vec<String> {
    lines
        .split(|l| l.is_blank())
        .filter(|chunk| !chunk.is_empty())
        .map(block_text)
        .collect()
}

/// An entry head line plus its more-indented continuation lines
#[derive(Debug, Clone)]
struct Entry<'a> {
    head: Line<'a>,
    rest: Vec<Line<'a>>,
}

impl Entry<'_> {
    fn continuation(&self) -> String {
        join_words(&self.rest)
    }
}

/// Split a section body into entries: lines at the body's base indentation
/// start entries, deeper lines continue the previous one.
fn split_entries<'a>(body: &[Line<'a>]) -> Vec<Entry<'a>> {
    let Some(base) = body.iter().filter(|l| !l.is_blank()).map(|l| l.indent).next() else {
        return Vec::new();
    };
    let mut entries: Vec<Entry<'a>> = Vec::new();
    for line in body.iter().filter(|l| !l.is_blank()) {
        match entries.last_mut() {
            Some(entry) if line.indent > base => entry.rest.push(*line),
            _ => entries.push(Entry {
                head: *line,
                rest: Vec::new(),
            }),
        }
    }
    entries
}

/// Append `extra` to `target`, separated by a space
fn append_text(target: &mut String, extra: &str) {
    let extra = extra.trim();
    if extra.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(extra);
}

/// Does `text` read like a type expression rather than prose?
///
/// `Optional[int]`, `dict[str, int]` and `int | None` qualify;
/// `True if found` does not.
fn looks_like_type(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    let compact = text
        .replace(", ", ",")
        .replace(" | ", "|")
        .replace(" or ", "|");
    !compact.contains(char::is_whitespace)
        && compact
            .chars()
            .all(|c| c.is_alphanumeric() || "_.[](),|'\"*~".contains(c))
}

/// Where folded text from a foreign marker goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Params,
    Attributes,
    Returns,
    Yields,
    Raises,
    Examples,
    Notes,
}

fn section_kind(heading: &str) -> SectionKind {
    match heading.to_ascii_lowercase().as_str() {
        "args" | "arguments" | "parameters" | "params" | "keyword args" | "keyword arguments"
        | "other parameters" | "receives" => SectionKind::Params,
        "attributes" => SectionKind::Attributes,
        "returns" | "return" => SectionKind::Returns,
        "yields" | "yield" => SectionKind::Yields,
        "raises" | "exceptions" => SectionKind::Raises,
        "examples" | "example" => SectionKind::Examples,
        _ => SectionKind::Notes,
    }
}
