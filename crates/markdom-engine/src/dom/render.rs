//! HTML, plain text and canonical markdown views of a node.
//!
//! Each renderer is one exhaustive `match` over [`NodeKind`]; kinds without
//! markup of their own render their children in order.

use std::fmt::{self, Write};

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use super::{LinkForm, Node, NodeKind};

pub(super) struct Html<'d>(pub(super) Node<'d>);

impl fmt::Display for Html<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        html(self.0, f)
    }
}

pub(super) struct Markdown<'d>(pub(super) Node<'d>);

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        markdown(self.0, f)
    }
}

// === HTML ===

fn html(node: Node<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match node.kind() {
        NodeKind::Document => join_blocks(node, f, |block| Html(block).to_string()),
        NodeKind::Header { level, id } => {
            write!(f, "<h{level} id=\"{}\">", attr(id))?;
            html_children(node, f)?;
            write!(f, "</h{level}>")
        }
        NodeKind::Paragraph => element(node, f, "p"),
        NodeKind::BlockQuote => element(node, f, "blockquote"),
        NodeKind::OrderedList { start: 1, .. } => element(node, f, "ol"),
        NodeKind::OrderedList { start, .. } => {
            write!(f, "<ol start=\"{start}\">")?;
            html_children(node, f)?;
            f.write_str("</ol>")
        }
        NodeKind::BulletList { .. } => element(node, f, "ul"),
        NodeKind::ListItem => element(node, f, "li"),
        NodeKind::CodeBlock { language, literal } => {
            if language.is_empty() {
                f.write_str("<pre><code>")?;
            } else {
                write!(f, "<pre><code class=\"language-{}\">", attr(language))?;
            }
            write!(f, "{}</code></pre>", text(literal))
        }
        NodeKind::ThematicBreak => f.write_str("<hr />"),
        NodeKind::Reference { .. } => Ok(()),
        NodeKind::Toc => listing(node, f, "toc"),
        NodeKind::Tof => listing(node, f, "tof"),
        NodeKind::PageBreak => f.write_str("<div class=\"page-break\"></div>"),
        NodeKind::LatexBlock { rendered, .. } => {
            write!(f, "<div class=\"latex-block\">{rendered}</div>")
        }
        NodeKind::Text { value } => write!(f, "{}", text(value)),
        NodeKind::Bold { .. } => element(node, f, "strong"),
        NodeKind::Italics { .. } => element(node, f, "em"),
        NodeKind::Strikethrough => element(node, f, "del"),
        NodeKind::Link { url, alt, .. } => {
            write!(f, "<a href=\"{}\"", attr(url))?;
            title(f, alt)?;
            f.write_char('>')?;
            html_children(node, f)?;
            f.write_str("</a>")
        }
        NodeKind::Image { url, alt, id, .. } => {
            write!(
                f,
                "<img id=\"{}\" src=\"{}\" alt=\"{}\"",
                attr(id),
                attr(url),
                attr(&node.to_string())
            )?;
            title(f, alt)?;
            f.write_str(" />")
        }
        NodeKind::InlineCode { value } => write!(f, "<code>{}</code>", text(value)),
        NodeKind::InlineLatex { rendered, .. } => {
            write!(f, "<span class=\"latex-inline\">{rendered}</span>")
        }
        NodeKind::SoftBreak => f.write_char('\n'),
    }
}

fn html_children(node: Node<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    node.children().try_for_each(|child| html(child, f))
}

fn element(node: Node<'_>, f: &mut fmt::Formatter<'_>, tag: &str) -> fmt::Result {
    write!(f, "<{tag}>")?;
    html_children(node, f)?;
    write!(f, "</{tag}>")
}

fn title(f: &mut fmt::Formatter<'_>, alt: &str) -> fmt::Result {
    if alt.is_empty() {
        return Ok(());
    }
    write!(f, " title=\"{}\"", attr(alt))
}

/// A TOC or TOF: one anchor per entry, pointing at the entry's id.
fn listing(node: Node<'_>, f: &mut fmt::Formatter<'_>, class: &str) -> fmt::Result {
    write!(f, "<nav class=\"{class}\"><ul>")?;
    for entry in node.children() {
        let target = match entry.kind() {
            NodeKind::Header { id, .. } | NodeKind::Image { id, .. } => id.as_str(),
            _ => "",
        };
        write!(
            f,
            "<li><a href=\"#{}\">{}</a></li>",
            attr(target),
            text(&entry.to_string())
        )?;
    }
    f.write_str("</ul></nav>")
}

// === Plain text ===

pub(super) fn plain(node: Node<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match node.kind() {
        NodeKind::Document => join_blocks(node, f, |block| block.to_string()),
        NodeKind::OrderedList { .. }
        | NodeKind::BulletList { .. }
        | NodeKind::Toc
        | NodeKind::Tof => {
            for (i, child) in node.children().enumerate() {
                if i > 0 {
                    f.write_char('\n')?;
                }
                plain(child, f)?;
            }
            Ok(())
        }
        NodeKind::CodeBlock { literal, .. } | NodeKind::LatexBlock { literal, .. } => {
            f.write_str(literal)
        }
        NodeKind::ThematicBreak | NodeKind::Reference { .. } | NodeKind::PageBreak => Ok(()),
        NodeKind::Text { value }
        | NodeKind::InlineCode { value }
        | NodeKind::InlineLatex { value, .. } => f.write_str(value),
        NodeKind::SoftBreak => f.write_char('\n'),
        NodeKind::Header { .. }
        | NodeKind::Paragraph
        | NodeKind::BlockQuote
        | NodeKind::ListItem
        | NodeKind::Bold { .. }
        | NodeKind::Italics { .. }
        | NodeKind::Strikethrough
        | NodeKind::Link { .. }
        | NodeKind::Image { .. } => node.children().try_for_each(|child| plain(child, f)),
    }
}

/// Document blocks, separated by newlines, skipping blocks that render empty.
fn join_blocks(
    node: Node<'_>,
    f: &mut fmt::Formatter<'_>,
    render: impl Fn(Node<'_>) -> String,
) -> fmt::Result {
    let mut first = true;
    for block in node.children() {
        let rendered = render(block);
        if rendered.is_empty() {
            continue;
        }
        if !first {
            f.write_char('\n')?;
        }
        f.write_str(&rendered)?;
        first = false;
    }
    Ok(())
}

// === Markdown ===

fn markdown(node: Node<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match node.kind() {
        NodeKind::Document => markdown_document(node, f),
        NodeKind::Header { level, .. } => {
            write!(f, "{} ", "#".repeat(*level))?;
            markdown_children(node, f)
        }
        NodeKind::BlockQuote => {
            f.write_str("> ")?;
            for child in node.children() {
                match child.kind() {
                    NodeKind::SoftBreak => f.write_str("\n> ")?,
                    _ => markdown(child, f)?,
                }
            }
            Ok(())
        }
        NodeKind::OrderedList { .. } | NodeKind::BulletList { .. } => markdown_list(node, f),
        NodeKind::CodeBlock { language, literal } => {
            writeln!(f, "```{language}")?;
            if !literal.is_empty() {
                writeln!(f, "{literal}")?;
            }
            f.write_str("```")
        }
        NodeKind::ThematicBreak => f.write_str("---"),
        NodeKind::Reference {
            reference_id,
            url,
            alt,
        } => {
            write!(f, "[{reference_id}]: {url}")?;
            if !alt.is_empty() {
                write!(f, " \"{alt}\"")?;
            }
            Ok(())
        }
        NodeKind::Toc => f.write_str("[TOC]"),
        NodeKind::Tof => f.write_str("[TOF]"),
        NodeKind::PageBreak => f.write_str("[PAGEBREAK]"),
        NodeKind::LatexBlock { literal, .. } => {
            f.write_str("$$\n")?;
            if !literal.is_empty() {
                writeln!(f, "{literal}")?;
            }
            f.write_str("$$")
        }
        NodeKind::Text { value } => f.write_str(value),
        NodeKind::Bold { marker } => delimited(node, f, &format!("{marker}{marker}")),
        NodeKind::Italics { marker } => delimited(node, f, &marker.to_string()),
        NodeKind::Strikethrough => delimited(node, f, "~~"),
        NodeKind::Link {
            url,
            alt,
            reference_id,
            form,
        } => markdown_link(node, f, (url.as_str(), alt.as_str(), reference_id.as_deref(), *form)),
        NodeKind::Image {
            url,
            alt,
            reference_id,
            form,
            ..
        } => {
            f.write_char('!')?;
            markdown_link(node, f, (url.as_str(), alt.as_str(), reference_id.as_deref(), *form))
        }
        NodeKind::InlineCode { value } => write!(f, "`{value}`"),
        NodeKind::InlineLatex { value, .. } => write!(f, "${value}$"),
        NodeKind::SoftBreak => f.write_char('\n'),
        NodeKind::Paragraph | NodeKind::ListItem => markdown_children(node, f),
    }
}

fn markdown_children(node: Node<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    node.children().try_for_each(|child| markdown(child, f))
}

/// Blocks keep the number of source rows between them, and the source's
/// trailing newlines are written back after the last block.
fn markdown_document(node: Node<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut previous: Option<Node<'_>> = None;
    for block in node.children() {
        if let Some(previous) = previous {
            let gap = block.from().row.saturating_sub(previous.to().row).max(1);
            f.write_str(&"\n".repeat(gap))?;
        }
        markdown(block, f)?;
        previous = Some(block);
    }

    if let Some(last) = previous {
        let trailing = node.document().end().row.saturating_sub(last.to().row);
        f.write_str(&"\n".repeat(trailing))?;
    }
    Ok(())
}

/// One item per row, indented two spaces per enclosing list. Ordered items are
/// renumbered from the list's start.
fn markdown_list(node: Node<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let indent = "  ".repeat(node.list_depth());
    for (i, item) in node.children().enumerate() {
        if i > 0 {
            f.write_char('\n')?;
        }
        match node.kind() {
            NodeKind::OrderedList { start, .. } => write!(f, "{indent}{}. ", start + i as u64)?,
            NodeKind::BulletList { marker, .. } => write!(f, "{indent}{marker} ")?,
            _ => f.write_str(&indent)?,
        }
        markdown(item, f)?;
    }
    Ok(())
}

fn delimited(node: Node<'_>, f: &mut fmt::Formatter<'_>, delimiter: &str) -> fmt::Result {
    f.write_str(delimiter)?;
    markdown_children(node, f)?;
    f.write_str(delimiter)
}

fn markdown_link(
    node: Node<'_>,
    f: &mut fmt::Formatter<'_>,
    (url, alt, reference_id, form): (&str, &str, Option<&str>, LinkForm),
) -> fmt::Result {
    f.write_char('[')?;
    markdown_children(node, f)?;
    f.write_char(']')?;
    match form {
        LinkForm::Inline => {
            write!(f, "({url}")?;
            if !alt.is_empty() {
                write!(f, " \"{alt}\"")?;
            }
            f.write_char(')')
        }
        LinkForm::Reference => write!(f, "[{}]", reference_id.unwrap_or_default()),
        LinkForm::Collapsed => f.write_str("[]"),
    }
}
