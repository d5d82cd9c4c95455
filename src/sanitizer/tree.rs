//! Policy-driven serialization of a parsed HTML tree.

use ego_tree::NodeRef;
use scraper::Html;
use scraper::node::{Doctype, Node};

use super::policy::{ElementVerdict, PreviewPolicy};

/// HTML5 void elements that must not have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// HTML elements whose text children are emitted verbatim. Elements with
/// the same local name inside `<svg>` or `<math>` hold ordinary text.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// Serialize a parsed document back to a string, applying `policy` to every
/// element and attribute on the way.
pub(crate) fn serialize_document(html: &Html, policy: &PreviewPolicy) -> String {
    let mut out = String::new();
    serialize_node(html.tree.root(), policy, false, &mut out);
    out
}

fn serialize_node(node: NodeRef<Node>, policy: &PreviewPolicy, raw_text: bool, out: &mut String) {
    match node.value() {
        Node::Document | Node::Fragment => {
            for child in node.children() {
                serialize_node(child, policy, false, out);
            }
        }
        Node::Doctype(doctype) => serialize_doctype(doctype, out),
        Node::Element(el) => {
            let tag = el.name();
            let is_html = &*el.name.ns == HTML_NAMESPACE;
            let attrs: Vec<(&str, &str)> = el.attrs().collect();

            match policy.element_verdict(tag, &attrs) {
                ElementVerdict::Remove => {
                    tracing::debug!("Removed <{tag}> element");
                    return;
                }
                ElementVerdict::Unwrap => {
                    tracing::debug!("Unwrapped <{tag}> element");
                    for child in node.children() {
                        serialize_node(child, policy, false, out);
                    }
                    return;
                }
                ElementVerdict::Keep => {}
            }

            out.push('<');
            out.push_str(tag);
            for (k, v) in attrs {
                if !policy.allows_attribute(tag, k, v) {
                    tracing::debug!("Dropped attribute {k} on <{tag}>");
                    continue;
                }
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(v));
                out.push('"');
            }
            out.push('>');

            if is_html && VOID_ELEMENTS.contains(&tag) {
                return;
            }

            let raw_children = is_html && RAW_TEXT_ELEMENTS.contains(&tag);
            for child in node.children() {
                serialize_node(child, policy, raw_children, out);
            }

            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Node::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&html_escape::encode_text(&**text));
            }
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        _ => {}
    }
}

fn serialize_doctype(doctype: &Doctype, out: &mut String) {
    out.push_str("<!DOCTYPE ");
    out.push_str(doctype.name());
    let (public_id, system_id) = (doctype.public_id(), doctype.system_id());
    if !public_id.is_empty() {
        out.push_str(" PUBLIC \"");
        out.push_str(&html_escape::encode_double_quoted_attribute(public_id));
        out.push('"');
        if !system_id.is_empty() {
            out.push_str(" \"");
            out.push_str(&html_escape::encode_double_quoted_attribute(system_id));
            out.push('"');
        }
    } else if !system_id.is_empty() {
        out.push_str(" SYSTEM \"");
        out.push_str(&html_escape::encode_double_quoted_attribute(system_id));
        out.push('"');
    }
    out.push('>');
}
