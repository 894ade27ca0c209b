use super::{named_children, PyNode};
use crate::module::{Call, Expr};

/// Convert an expression node into an [`Expr`]
///
/// Names are left unresolved; the loader binds them to definitions.
pub(super) fn parse_expr(node: &PyNode<'_>, module_name: &str) -> Expr {
    match node.kind().as_ref() {
        "string" => {
            let text = node.text();
            decode_string_literal(&text)
                .map(Expr::Str)
                .unwrap_or_else(|| Expr::Other(text.to_string()))
        }
        "concatenated_string" => {
            let mut joined = String::new();
            for part in named_children(node) {
                match decode_string_literal(&part.text()) {
                    Some(decoded) => joined.push_str(&decoded),
                    None => return Expr::Other(node.text().to_string()),
                }
            }
            Expr::Str(joined)
        }
        "identifier" => Expr::Name(node.text().to_string()),
        "attribute" => attribute_path(node)
            .map(Expr::Attribute)
            .unwrap_or_else(|| Expr::Other(node.text().to_string())),
        "call" => parse_call(node, module_name),
        "lambda" => Expr::Lambda(module_name.to_string()),
        "list" | "tuple" => Expr::Sequence(
            named_children(node)
                .map(|item| parse_expr(&item, module_name))
                .collect(),
        ),
        "parenthesized_expression" => match named_children(node).next() {
            Some(inner) => parse_expr(&inner, module_name),
            None => Expr::Other(node.text().to_string()),
        },
        _ => Expr::Other(node.text().to_string()),
    }
}

fn parse_call(node: &PyNode<'_>, module_name: &str) -> Expr {
    let Some(function) = node.field("function") else {
        return Expr::Other(node.text().to_string());
    };

    let mut call = Call {
        func: Box::new(parse_expr(&function, module_name)),
        args: Vec::new(),
        kwargs: Vec::new(),
    };

    if let Some(arguments) = node.field("arguments") {
        // `f(x for x in y)` passes a generator, which is never a literal
        if arguments.kind() == "argument_list" {
            for argument in named_children(&arguments) {
                match argument.kind().as_ref() {
                    "keyword_argument" => {
                        let (Some(name), Some(value)) =
                            (argument.field("name"), argument.field("value"))
                        else {
                            continue;
                        };
                        call.kwargs
                            .push((name.text().to_string(), parse_expr(&value, module_name)));
                    }
                    "list_splat" | "dictionary_splat" => {}
                    _ => call.args.push(parse_expr(&argument, module_name)),
                }
            }
        }
    }

    Expr::Call(call)
}

/// `a.b.c` as path components; `None` when the object is not a plain name chain
fn attribute_path(node: &PyNode<'_>) -> Option<Vec<String>> {
    let object = node.field("object")?;
    let attribute = node.field("attribute")?;

    let mut parts = match object.kind().as_ref() {
        "identifier" => vec![object.text().to_string()],
        "attribute" => attribute_path(&object)?,
        _ => return None,
    };
    parts.push(attribute.text().to_string());
    Some(parts)
}

/// Decode a Python string literal into its value
///
/// Handles `r`/`u` prefixes, single and triple quotes and the common escape
/// sequences. Byte strings and f-strings are not constant text and yield `None`.
pub fn decode_string_literal(text: &str) -> Option<String> {
    let quote_start = text.find(['"', '\''])?;
    let prefix = text[..quote_start].to_ascii_lowercase();
    if !prefix.chars().all(|c| c == 'r' || c == 'u') {
        return None;
    }
    let raw = prefix.contains('r');
    let quoted = &text[quote_start..];

    let inner = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|quote| quoted.strip_prefix(quote)?.strip_suffix(quote))?;

    if raw {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            // line continuation
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
