use winnow::prelude::*;
use winnow::ascii::{digit0, digit1, multispace1, till_line_ending};
use winnow::combinator::{alt, delimited, eof, opt, preceded, repeat, terminated};
use winnow::error::ParserError;
use winnow::token::{any, one_of, take_until, take_while};

use crate::attrs::Attributes;
use crate::builder::unquote;
use crate::dot_ast::*;
use crate::error::{Error, Result};

pub fn parse_dot(input: &str) -> Result<DotDocument> {
    let mut input = input;
    dot_document(&mut input).map_err(|_| {
        let context = input.lines().next().unwrap_or("").trim();
        let message = if context.is_empty() {
            "unexpected end of input".to_string()
        } else if context.chars().count() > 40 {
            let head: String = context.chars().take(40).collect();
            format!("unexpected `{head}...`")
        } else {
            format!("unexpected `{context}`")
        };
        Error::Syntax { message }
    })
}

fn dot_document(input: &mut &str) -> winnow::Result<DotDocument> {
    ws.parse_next(input)?;
    let strict = opt(terminated(keyword("strict"), ws))
        .parse_next(input)?
        .is_some();
    let kind = alt((
        keyword("digraph").value(GraphKind::Digraph),
        keyword("graph").value(GraphKind::Graph),
    ))
    .parse_next(input)?;
    ws.parse_next(input)?;
    let id = opt(terminated(id, ws)).parse_next(input)?;
    let statements = block.parse_next(input)?;
    (ws, eof).parse_next(input)?;

    Ok(DotDocument {
        strict,
        kind,
        id,
        statements,
    })
}

/// Whitespace and comments: `//`, `#` to end of line, `/* */`.
fn ws(input: &mut &str) -> winnow::Result<()> {
    repeat(0.., alt((multispace1.void(), line_comment, block_comment))).parse_next(input)
}

fn line_comment(input: &mut &str) -> winnow::Result<()> {
    (alt(("//", "#")), till_line_ending).void().parse_next(input)
}

fn block_comment(input: &mut &str) -> winnow::Result<()> {
    ("/*", take_until(0.., "*/"), "*/").void().parse_next(input)
}

/// Matches `kw` case-insensitively as a whole identifier.
fn keyword(kw: &'static str) -> impl FnMut(&mut &str) -> winnow::Result<()> {
    move |input: &mut &str| {
        identifier
            .verify(move |s: &str| s.eq_ignore_ascii_case(kw))
            .void()
            .parse_next(input)
    }
}

/// `{ stmt [;,] ... }`
fn block(input: &mut &str) -> winnow::Result<Vec<Statement>> {
    '{'.parse_next(input)?;
    let mut statements = Vec::new();
    loop {
        ws.parse_next(input)?;
        if opt('}').parse_next(input)?.is_some() {
            return Ok(statements);
        }
        if input.is_empty() {
            return Err(ParserError::from_input(input));
        }
        statements.push(statement.parse_next(input)?);
        ws.parse_next(input)?;
        opt(one_of([';', ','])).parse_next(input)?;
    }
}

fn statement(input: &mut &str) -> winnow::Result<Statement> {
    alt((
        subgraph.map(Statement::SubGraph),
        attr_statement,
        id_statement,
    ))
    .parse_next(input)
}

fn subgraph(input: &mut &str) -> winnow::Result<SubGraphStmt> {
    let id = opt(preceded(
        (keyword("subgraph"), ws),
        opt(terminated(id, ws)),
    ))
    .parse_next(input)?;
    let statements = block.parse_next(input)?;
    Ok(SubGraphStmt {
        id: id.flatten(),
        statements,
    })
}

fn attr_statement(input: &mut &str) -> winnow::Result<Statement> {
    let target = alt((
        keyword("graph").value(AttrTarget::Graph),
        keyword("node").value(AttrTarget::Node),
        keyword("edge").value(AttrTarget::Edge),
    ))
    .parse_next(input)?;
    ws.parse_next(input)?;
    let attributes = attr_list.parse_next(input)?;
    Ok(Statement::Attributes(target, attributes))
}

/// Node statement, edge chain, or `key = value`.
fn id_statement(input: &mut &str) -> winnow::Result<Statement> {
    let first = node_id.parse_next(input)?;
    ws.parse_next(input)?;

    if first.port.is_none() && opt('=').parse_next(input)?.is_some() {
        ws.parse_next(input)?;
        let value = id.parse_next(input)?;
        return Ok(Statement::Assign(first.id, value));
    }

    let rest: Vec<NodeId> =
        repeat(0.., preceded((edge_op, ws), terminated(node_id, ws))).parse_next(input)?;
    let attributes = opt(attr_list).parse_next(input)?;

    if rest.is_empty() {
        return Ok(Statement::Node(NodeStmt {
            node: first,
            attributes,
        }));
    }
    let mut chain = Vec::with_capacity(rest.len() + 1);
    chain.push(first);
    chain.extend(rest);
    Ok(Statement::Edge(EdgeStmt { chain, attributes }))
}

fn edge_op(input: &mut &str) -> winnow::Result<()> {
    alt(("->", "--")).void().parse_next(input)
}

fn node_id(input: &mut &str) -> winnow::Result<NodeId> {
    let id = id.parse_next(input)?;
    let port = opt(preceded(':', port)).parse_next(input)?;
    Ok(NodeId { id, port })
}

fn port(input: &mut &str) -> winnow::Result<String> {
    let (name, compass) = (id, opt(preceded(':', id))).parse_next(input)?;
    Ok(match compass {
        Some(compass) => format!("{name}:{compass}"),
        None => name,
    })
}

/// One or more `[...]` lists, merged.
fn attr_list(input: &mut &str) -> winnow::Result<Attributes> {
    let lists: Vec<Attributes> = repeat(1.., terminated(bracketed_attrs, ws)).parse_next(input)?;
    Ok(lists.into_iter().flatten().collect())
}

fn bracketed_attrs(input: &mut &str) -> winnow::Result<Attributes> {
    '['.parse_next(input)?;
    let mut attributes = Attributes::new();
    loop {
        ws.parse_next(input)?;
        if opt(']').parse_next(input)?.is_some() {
            return Ok(attributes);
        }
        let key = id.parse_next(input)?;
        ws.parse_next(input)?;
        '='.parse_next(input)?;
        ws.parse_next(input)?;
        let value = id.parse_next(input)?;
        attributes.insert(key, value);
        ws.parse_next(input)?;
        opt(one_of([';', ','])).parse_next(input)?;
    }
}

fn id(input: &mut &str) -> winnow::Result<String> {
    alt((
        quoted_string,
        html_string,
        numeral.map(|s: &str| s.to_string()),
        identifier.map(|s: &str| s.to_string()),
    ))
    .parse_next(input)
}

fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    (
        one_of(|c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn numeral<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    (
        opt('-'),
        alt(((".", digit1).void(), (digit1, opt((".", digit0))).void())),
    )
        .take()
        .parse_next(input)
}

/// `"..."` optionally joined with `+`; each part goes through `unquote`.
fn quoted_string(input: &mut &str) -> winnow::Result<String> {
    let first = quoted_raw.parse_next(input)?;
    let rest: Vec<&str> = repeat(0.., preceded((ws, '+', ws), quoted_raw)).parse_next(input)?;
    let mut text = unquote(first);
    for part in rest {
        text.push_str(&unquote(part));
    }
    Ok(text)
}

fn quoted_raw<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    delimited('"', quoted_body, '"').take().parse_next(input)
}

fn quoted_body(input: &mut &str) -> winnow::Result<()> {
    repeat(
        0..,
        alt((
            ("\\", any).void(),
            take_while(1.., |c: char| c != '"' && c != '\\').void(),
        )),
    )
    .parse_next(input)
}

/// `<...>` with balanced angle brackets; the outer pair is dropped.
fn html_string(input: &mut &str) -> winnow::Result<String> {
    '<'.parse_next(input)?;
    let mut depth = 1usize;
    let mut end = None;
    for (i, c) in input.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let Some(end) = end else {
        return Err(ParserError::from_input(input));
    };
    let rest: &str = input;
    let body = rest[..end].to_string();
    *input = &rest[end + 1..];
    Ok(body)
}
