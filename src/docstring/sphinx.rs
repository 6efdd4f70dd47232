//! Sphinx / reST field lists: `:param name: description`.

use super::{
    Dialect, DocIssue, Line, Note, ParsedDoc, RaisesDoc, ReturnDoc, append_text, block_text,
    is_foreign_marker, patterns,
};

/// Where continuation lines are appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    None,
    Param(usize),
    Attribute(usize),
    Return,
    Yield,
    Raise(usize),
    Note(usize),
}

pub(super) fn parse(doc: &mut ParsedDoc, lines: &[Line<'_>], issues: &mut Vec<DocIssue>) {
    let mut target = Target::None;
    let mut after_blank = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if line.is_blank() {
            after_blank = true;
            i += 1;
            continue;
        }

        if line.text.starts_with(":")
            && apply_field(doc, line, &mut target, issues)
        {
            after_blank = false;
            i += 1;
            continue;
        }

        // A doctest block after a blank line stands on its own
        if line.text.starts_with(">>>") && (after_blank || target == Target::None) {
            let end = lines[i..]
                .iter()
                .position(|l| l.is_blank())
                .map_or(lines.len(), |n| i + n);
            doc.examples.push(block_text(&lines[i..end]));
            target = Target::None;
            i = end;
            continue;
        }

        let continues = target != Target::None && (!after_blank || line.indent > 0);
        if continues {
            if is_foreign_marker(lines, i, Dialect::Sphinx) {
                issues.push(DocIssue::new(
                    line.number,
                    format!("mixed docstring styles: '{}' folded into previous field", line.text),
                ));
            }
            append_to(doc, target, line.text);
        } else {
            doc.notes.push(Note {
                heading: None,
                body: line.text.to_string(),
            });
            target = Target::Note(doc.notes.len() - 1);
        }
        after_blank = false;
        i += 1;
    }
}

/// Handle one `:field args: content` line; false if it is not a field.
fn apply_field(
    doc: &mut ParsedDoc,
    line: Line<'_>,
    target: &mut Target,
    issues: &mut Vec<DocIssue>,
) -> bool {
    let Some(caps) = patterns::SPHINX_FIELD_PARTS.captures(line.text) else {
        return false;
    };
    let field = caps[1].to_ascii_lowercase();
    let args = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    let content = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");

    *target = match field.as_str() {
        "param" | "parameter" | "arg" | "argument" | "key" | "keyword" => {
            let Some((type_expr, name)) = split_type_and_name(args) else {
                issues.push(DocIssue::new(line.number, format!("field ':{field}:' has no name")));
                return fold_unnamed(doc, target, line);
            };
            let param = doc.param_mut(name);
            if let Some(type_expr) = type_expr {
                param.type_expr = Some(type_expr.to_string());
            }
            append_text(&mut param.description, content);
            Target::Param(doc.params.iter().position(|p| p.name == name).unwrap_or(0))
        }
        "type" => {
            if args.is_empty() {
                issues.push(DocIssue::new(line.number, "field ':type:' has no name"));
                return fold_unnamed(doc, target, line);
            }
            doc.param_mut(args).type_expr = Some(content.to_string());
            Target::Param(doc.params.iter().position(|p| p.name == args).unwrap_or(0))
        }
        "var" | "ivar" | "cvar" => {
            let Some((type_expr, name)) = split_type_and_name(args) else {
                issues.push(DocIssue::new(line.number, format!("field ':{field}:' has no name")));
                return fold_unnamed(doc, target, line);
            };
            let attribute = doc.attribute_mut(name);
            if let Some(type_expr) = type_expr {
                attribute.type_expr = Some(type_expr.to_string());
            }
            append_text(&mut attribute.description, content);
            Target::Attribute(doc.attributes.iter().position(|a| a.name == name).unwrap_or(0))
        }
        "vartype" => {
            doc.attribute_mut(args).type_expr = Some(content.to_string());
            Target::Attribute(doc.attributes.iter().position(|a| a.name == args).unwrap_or(0))
        }
        "returns" | "return" => {
            append_text(&mut first_value(&mut doc.returns).description, content);
            Target::Return
        }
        "rtype" => {
            first_value(&mut doc.returns).type_expr = Some(content.to_string());
            Target::Return
        }
        "yields" | "yield" => {
            append_text(&mut first_value(&mut doc.yields).description, content);
            Target::Yield
        }
        "ytype" => {
            first_value(&mut doc.yields).type_expr = Some(content.to_string());
            Target::Yield
        }
        "raises" | "raise" | "except" | "exception" => {
            doc.raises.push(RaisesDoc {
                exception: args.to_string(),
                description: content.to_string(),
            });
            Target::Raise(doc.raises.len() - 1)
        }
        _ => {
            let heading = if args.is_empty() {
                caps[1].to_string()
            } else {
                format!("{} {}", &caps[1], args)
            };
            doc.notes.push(Note {
                heading: Some(heading),
                body: content.to_string(),
            });
            Target::Note(doc.notes.len() - 1)
        }
    };
    true
}

/// `name` or `type name` (the type may contain spaces)
fn split_type_and_name(args: &str) -> Option<(Option<&str>, &str)> {
    let args = args.trim();
    if args.is_empty() {
        return None;
    }
    match args.rsplit_once(char::is_whitespace) {
        Some((type_expr, name)) => Some((Some(type_expr.trim()), name)),
        None => Some((None, args)),
    }
}

/// A nameless field joins whatever came before it.
fn fold_unnamed(doc: &mut ParsedDoc, target: &mut Target, line: Line<'_>) -> bool {
    if *target == Target::None {
        doc.notes.push(Note {
            heading: None,
            body: line.text.to_string(),
        });
        *target = Target::Note(doc.notes.len() - 1);
    } else {
        append_to(doc, *target, line.text);
    }
    true
}

fn first_value(values: &mut Vec<ReturnDoc>) -> &mut ReturnDoc {
    if values.is_empty() {
        values.push(ReturnDoc::default());
    }
    &mut values[0]
}

fn append_to(doc: &mut ParsedDoc, target: Target, text: &str) {
    let slot = match target {
        Target::None => return,
        Target::Param(idx) => doc.params.get_mut(idx).map(|p| &mut p.description),
        Target::Attribute(idx) => doc.attributes.get_mut(idx).map(|a| &mut a.description),
        Target::Return => doc.returns.first_mut().map(|r| &mut r.description),
        Target::Yield => doc.yields.first_mut().map(|r| &mut r.description),
        Target::Raise(idx) => doc.raises.get_mut(idx).map(|r| &mut r.description),
        Target::Note(idx) => doc.notes.get_mut(idx).map(|n| &mut n.body),
    };
    if let Some(slot) = slot {
        append_text(slot, text);
    }
}
