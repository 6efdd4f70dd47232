//! NumPy style: headers underlined with dashes, `name : type` entries.

use super::{
    Dialect, DocIssue, Entry, Line, Note, ParamDoc, ParsedDoc, RaisesDoc, ReturnDoc,
    SectionKind, append_text, block_text, is_foreign_marker, paragraphs, patterns, section_kind,
    split_entries,
};

/// Any non-blank line followed by a dash underline
fn is_header(lines: &[Line<'_>], i: usize) -> bool {
    !lines[i].is_blank()
        && !patterns::UNDERLINE.is_match(lines[i].text)
        && lines
            .get(i + 1)
            .is_some_and(|next| patterns::UNDERLINE.is_match(next.text))
}

/// A header with a recognised section name
pub(super) fn is_known_header(lines: &[Line<'_>], i: usize) -> bool {
    is_header(lines, i) && patterns::NUMPY_HEADER.is_match(lines[i].text)
}

struct Section<'a> {
    heading: &'a str,
    body: Vec<Line<'a>>,
}

pub(super) fn parse(doc: &mut ParsedDoc, lines: &[Line<'_>], issues: &mut Vec<DocIssue>) {
    let mut sections: Vec<Section<'_>> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if is_header(lines, i) {
            sections.push(Section {
                heading: lines[i].text,
                body: Vec::new(),
            });
            i += 2;
            continue;
        }
        if let Some(section) = sections.last_mut() {
            section.body.push(lines[i]);
        }
        i += 1;
    }

    for section in &sections {
        apply_section(doc, section, issues);
    }
}

fn apply_section(doc: &mut ParsedDoc, section: &Section<'_>, issues: &mut Vec<DocIssue>) {
    let kind = section_kind(section.heading);
    let entries = fold_foreign(split_entries(&section.body), &section.body, issues);
    match kind {
        SectionKind::Params | SectionKind::Attributes => {
            let mut parsed = Vec::new();
            for entry in &entries {
                parse_param_entry(entry, &mut parsed, issues);
            }
            if kind == SectionKind::Params {
                doc.params.extend(parsed);
            } else {
                doc.attributes.extend(parsed);
            }
        }
        SectionKind::Returns | SectionKind::Yields => {
            let values: Vec<ReturnDoc> = entries.iter().map(parse_return_entry).collect();
            if kind == SectionKind::Returns {
                doc.returns.extend(values);
            } else {
                doc.yields.extend(values);
            }
        }
        SectionKind::Raises => {
            for entry in entries {
                doc.raises.push(RaisesDoc {
                    exception: entry.head.text.to_string(),
                    description: entry.continuation(),
                });
            }
        }
        SectionKind::Examples => doc.examples.extend(paragraphs(&section.body)),
        SectionKind::Notes => doc.notes.push(Note {
            heading: Some(section.heading.to_string()),
            body: block_text(&section.body),
        }),
    }
}

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
        match out.last_mut() {
            Some(previous) if is_foreign_marker(body, idx, Dialect::Numpy) => {
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
    let Some(caps) = patterns::NUMPY_PARAM.captures(entry.head.text) else {
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
        return;
    };

    let type_expr = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty());
    let description = entry.continuation();
    // `x, y : int` documents both names
    for name in caps[1].split(',') {
        parsed.push(ParamDoc {
            name: name.trim().to_string(),
            type_expr: type_expr.clone(),
            description: description.clone(),
        });
    }
}

fn parse_return_entry(entry: &Entry<'_>) -> ReturnDoc {
    match patterns::NUMPY_NAMED_RETURN.captures(entry.head.text) {
        Some(caps) => ReturnDoc {
            name: Some(caps[1].to_string()),
            type_expr: Some(caps[2].trim().to_string()),
            description: entry.continuation(),
        },
        None => ReturnDoc {
            name: None,
            type_expr: Some(entry.head.text.to_string()),
            description: entry.continuation(),
        },
    }
}
