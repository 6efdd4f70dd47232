//! Google style: `Args:` headers followed by indented entries.

use super::{
    Dialect, DocIssue, Entry, Line, Note, ParamDoc, ParsedDoc, RaisesDoc, ReturnDoc,
    SectionKind, append_text, is_foreign_marker, join_words, looks_like_type, next_non_blank,
    paragraphs, patterns, section_kind, split_entries,
};

/// A known header line whose next content line is indented deeper
pub(super) fn is_header(lines: &[Line<'_>], i: usize) -> bool {
    let line = lines[i];
    patterns::GOOGLE_HEADER.is_match(line.text)
        && next_non_blank(lines, i + 1).is_some_and(|next| next.indent > line.indent)
}

struct Section<'a> {
    heading: &'a str,
    body: Vec<Line<'a>>,
}

pub(super) fn parse(doc: &mut ParsedDoc, lines: &[Line<'_>], issues: &mut Vec<DocIssue>) {
    let base = lines.first().map(|l| l.indent).unwrap_or(0);
    let mut sections: Vec<Section<'_>> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if line.indent <= base && is_header(lines, i) {
            sections.push(Section {
                heading: line.text.trim_end_matches(':'),
                body: Vec::new(),
            });
        } else if let Some(section) = sections.last_mut() {
            section.body.push(*line);
        }
    }

    for section in &sections {
        apply_section(doc, section, issues);
    }
}

fn apply_section(doc: &mut ParsedDoc, section: &Section<'_>, issues: &mut Vec<DocIssue>) {
    let kind = section_kind(section.heading);
    match kind {
        SectionKind::Params | SectionKind::Attributes => {
            let mut parsed: Vec<ParamDoc> = Vec::new();
            for entry in fold_foreign(split_entries(&section.body), &section.body, issues) {
                parse_param_entry(&entry, &mut parsed, issues);
            }
            let target = if kind == SectionKind::Params {
                &mut doc.params
            } else {
                &mut doc.attributes
            };
            target.extend(parsed);
        }
        SectionKind::Returns | SectionKind::Yields => {
            let text = join_words(&section.body);
            if text.is_empty() {
                return;
            }
            let value = split_typed(&text);
            if kind == SectionKind::Returns {
                doc.returns.push(value);
            } else {
                doc.yields.push(value);
            }
        }
        SectionKind::Raises => {
            for entry in fold_foreign(split_entries(&section.body), &section.body, issues) {
                parse_raises_entry(&entry, &mut doc.raises, issues);
            }
        }
        SectionKind::Examples => doc.examples.extend(paragraphs(&section.body)),
        SectionKind::Notes => doc.notes.push(Note {
            heading: Some(section.heading.to_string()),
            body: super::block_text(&section.body),
        }),
    }
}

/// Merge entries that start with another dialect's marker into the entry before them.
fn fold_foreign<'a>(
    entries: Vec<Entry<'a>>,
    body: &[Line<'a>],
    issues: &mut Vec<DocIssue>,
) -> Vec<Entry<'a>> {
    let mut out: Vec<Entry<'a>> = Vec::with_capacity(entries.len());
    for entry in entries {
        let idx = body
            .iter()
            .position(|l| l.number == entry.head.number)
            .unwrap_or(0);
        let foreign = is_foreign_marker(body, idx, Dialect::Google);
        match out.last_mut() {
            Some(previous) if foreign => {
                issues.push(DocIssue::new(
                    entry.head.number,
                    format!("mixed docstring styles: '{}' folded into previous entry", entry.head.text),
                ));
                previous.rest.push(entry.head);
                previous.rest.extend(entry.rest);
            }
            _ => out.push(entry),
        }
    }
    out
}

fn parse_param_entry(entry: &Entry<'_>, parsed: &mut Vec<ParamDoc>, issues: &mut Vec<DocIssue>) {
    if let Some(caps) = patterns::GOOGLE_PARAM.captures(entry.head.text) {
        let mut description = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        append_text(&mut description, &entry.continuation());
        parsed.push(ParamDoc {
            name: caps[1].to_string(),
            type_expr: caps.get(2).map(|m| m.as_str().trim().to_string()),
            description,
        });
        return;
    }

    issues.push(DocIssue::new(
        entry.head.number,
        format!("malformed entry '{}'", entry.head.text),
    ));
    match parsed.last_mut() {
        Some(previous) => {
            append_text(&mut previous.description, entry.head.text);
            append_text(&mut previous.description, &entry.continuation());
        }
        None => {
            let (name, rest) = entry
                .head
                .text
                .split_once(char::is_whitespace)
                .unwrap_or((entry.head.text, ""));
            let mut description = rest.trim().to_string();
            append_text(&mut description, &entry.continuation());
            parsed.push(ParamDoc {
                name: name.to_string(),
                type_expr: None,
                description,
            });
        }
    }
}

fn parse_raises_entry(entry: &Entry<'_>, raises: &mut Vec<RaisesDoc>, issues: &mut Vec<DocIssue>) {
    let (exception, mut description) = match patterns::GOOGLE_RAISES.captures(entry.head.text) {
        Some(caps) => (
            caps[1].to_string(),
            caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
        ),
        None if patterns::IDENTIFIER.is_match(entry.head.text) => {
            (entry.head.text.to_string(), String::new())
        }
        None => {
            issues.push(DocIssue::new(
                entry.head.number,
                format!("malformed exception entry '{}'", entry.head.text),
            ));
            let (first, rest) = entry
                .head
                .text
                .split_once(char::is_whitespace)
                .unwrap_or((entry.head.text, ""));
            (first.trim_end_matches(':').to_string(), rest.trim().to_string())
        }
    };
    append_text(&mut description, &entry.continuation());
    raises.push(RaisesDoc {
        exception,
        description,
    });
}

/// `type: description` when the part before the colon reads as a type
fn split_typed(text: &str) -> ReturnDoc {
    match text.split_once(':') {
        Some((head, tail)) if looks_like_type(head) => ReturnDoc {
            name: None,
            type_expr: Some(head.trim().to_string()),
            description: tail.trim().to_string(),
        },
        _ => ReturnDoc {
            name: None,
            type_expr: None,
            description: text.to_string(),
        },
    }
}
