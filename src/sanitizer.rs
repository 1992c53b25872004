//! HTML sanitization: whitelist-based tag and attribute filtering.
//!
//! Two independent passes: a structural pass over a parsed tree (primary),
//! then a narrow regex safety net for attribute patterns a parser edge case
//! might let through. A final step normalizes whitespace. If the structural
//! pass cannot produce a tree at all, sanitization degrades to plain-text
//! extraction rather than failing the publish workflow.

use crate::constants::{
    SanitizeFlags, DEFAULT_ALLOWED_ATTRIBUTES, DEFAULT_ALLOWED_TAGS, DEFAULT_FORBIDDEN_ATTRIBUTES,
    DROPPED_TAGS, REGEXPS, VOID_ELEMS,
};
use crate::utils;
use ego_tree::NodeRef;
use kuchikikiki::traits::*;
use scraper::{Html, Node};
use std::collections::{HashMap, HashSet};

/// Whitelist data driving sanitization. Immutable for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct Policy {
    allowed_tags: HashSet<String>,
    allowed_attributes: HashMap<String, Vec<String>>,
    forbidden_attributes: HashSet<String>,
    dropped_tags: HashSet<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            allowed_attributes: DEFAULT_ALLOWED_ATTRIBUTES
                .iter()
                .map(|(tag, attrs)| {
                    (
                        tag.to_string(),
                        attrs.iter().map(|a| a.to_string()).collect(),
                    )
                })
                .collect(),
            forbidden_attributes: DEFAULT_FORBIDDEN_ATTRIBUTES
                .iter()
                .map(|a| a.to_string())
                .collect(),
            dropped_tags: DROPPED_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Policy {
    /// Whether elements with this tag survive sanitization.
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    /// Whether this tag is removed together with its subtree. Tags in this
    /// set carry text that must never leak into output (script bodies, CSS).
    pub fn drops_tag(&self, tag: &str) -> bool {
        self.dropped_tags.contains(tag)
    }

    /// Whether `attribute` survives on an element with tag name `tag`.
    pub fn keeps_attribute(&self, tag: &str, attribute: &str) -> bool {
        if self.forbidden_attributes.contains(attribute) || attribute.starts_with("data-") {
            return false;
        }
        self.allowed_attributes
            .get(tag)
            .is_some_and(|allowed| allowed.iter().any(|a| a == attribute))
    }

    pub fn allow_tag(mut self, tag: impl Into<String>) -> Self {
        self.allowed_tags.insert(tag.into());
        self
    }

    pub fn allow_attribute(mut self, tag: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.allowed_attributes
            .entry(tag.into())
            .or_default()
            .push(attribute.into());
        self
    }
}

/// Whitelist HTML sanitizer.
///
/// ```
/// use pressroom::Sanitizer;
///
/// let sanitizer = Sanitizer::new();
/// let clean = sanitizer.sanitize(r#"<h1 style="color:red">Title</h1>"#);
/// assert_eq!(clean, "<h1>Title</h1>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    policy: Policy,
    flags: SanitizeFlags,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: Policy) -> Self {
        Self {
            policy,
            flags: SanitizeFlags::default(),
        }
    }

    /// Replace which supplementary passes run after the structural pass.
    pub fn flags(mut self, flags: SanitizeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Clean raw markup down to the whitelisted subset.
    ///
    /// Never fails: empty input returns an empty string, and input the tree
    /// pass cannot handle degrades to plain-text extraction.
    pub fn sanitize(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let mut cleaned = match self.structural_pass(raw) {
            Some(html) => html,
            None => {
                log::debug!("structural pass yielded no tree, degrading to plain text");
                return self.text_only(raw);
            }
        };

        if self.flags.contains(SanitizeFlags::REGEX_FALLBACK) {
            cleaned = strip_residual_attributes(&cleaned);
        }
        if self.flags.contains(SanitizeFlags::NORMALIZE_WHITESPACE) {
            cleaned = normalize_markup_whitespace(&cleaned);
        }

        cleaned.trim().to_string()
    }

    /// Extract plain text with all markup removed, single-space separated.
    pub fn text_only(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }

        let document = kuchikikiki::parse_html().one(html);
        let mut parts = Vec::new();
        for text_node in document.descendants().text_nodes() {
            let borrowed = text_node.borrow();
            let trimmed = borrowed.trim();
            if !trimmed.is_empty() {
                parts.push(utils::normalize_whitespace(trimmed));
            }
        }
        parts.join(" ")
    }

    /// Walk the parsed tree and re-serialize only what the policy allows.
    ///
    /// The input tree is never mutated: disallowed elements are unwrapped by
    /// serializing their children in place, dropped elements are skipped
    /// outright, and surviving elements are emitted with filtered attributes.
    fn structural_pass(&self, raw: &str) -> Option<String> {
        let fragment = Html::parse_fragment(raw);
        let root = fragment.tree.root();
        root.children().next()?;

        let mut out = String::with_capacity(raw.len());
        for child in root.children() {
            self.serialize_node(child, &mut out);
        }
        Some(out)
    }

    fn serialize_node(&self, node: NodeRef<'_, Node>, out: &mut String) {
        match node.value() {
            Node::Text(text) => {
                out.push_str(&v_htmlescape::escape(text).to_string());
            }
            Node::Element(element) => {
                let tag = element.name();

                if self.policy.drops_tag(tag) {
                    return;
                }
                if !self.policy.allows_tag(tag) {
                    // Unwrap: the element vanishes, its children stay.
                    for child in node.children() {
                        self.serialize_node(child, out);
                    }
                    return;
                }

                out.push('<');
                out.push_str(tag);
                for (name, value) in element.attrs() {
                    if self.policy.keeps_attribute(tag, name) {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        out.push_str(&utils::escape_attr(value));
                        out.push('"');
                    }
                }
                out.push('>');

                if VOID_ELEMS.contains(&tag) {
                    return;
                }
                for child in node.children() {
                    self.serialize_node(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            // Comments, doctypes, and processing instructions are dropped.
            _ => {}
        }
    }
}

/// Regex safety net over the serialized markup: removes residual `style`,
/// `class`, `id`, and `data-*` attributes in either quote style. Kept
/// separate from the structural pass so each is testable on its own.
fn strip_residual_attributes(html: &str) -> String {
    let mut result = REGEXPS.data_attr.replace_all(html, "").to_string();
    result = REGEXPS.style_attr.replace_all(&result, "").to_string();
    result = REGEXPS.class_attr.replace_all(&result, "").to_string();
    result = REGEXPS.id_attr.replace_all(&result, "").to_string();
    result
}

/// Collapse whitespace between tags, squeeze internal runs to single spaces,
/// and drop stray whitespace before a closing `>`.
fn normalize_markup_whitespace(html: &str) -> String {
    let mut result = REGEXPS.between_tags.replace_all(html, "><").to_string();
    result = REGEXPS.multi_whitespace.replace_all(&result, " ").to_string();
    result = REGEXPS.before_close.replace_all(&result, ">").to_string();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_whitelisted(html: &str) {
        let policy = Policy::default();
        let doc = Html::parse_fragment(html);
        for node in doc.tree.root().descendants() {
            if let Node::Element(element) = node.value() {
                let tag = element.name();
                if tag == "html" {
                    continue;
                }
                assert!(policy.allows_tag(tag), "unexpected tag <{tag}> in output");
                for (name, _) in element.attrs() {
                    assert!(
                        policy.keeps_attribute(tag, name),
                        "unexpected attribute {name} on <{tag}>"
                    );
                }
            }
        }
    }

    #[test]
    fn test_strips_styling_and_data_attributes() {
        let sanitizer = Sanitizer::new();
        let cleaned = sanitizer
            .sanitize(r#"<h1 style="color:red" class="x">Title</h1><p data-x="1">Hello world</p>"#);
        assert_eq!(cleaned, "<h1>Title</h1><p>Hello world</p>");
    }

    #[test]
    fn test_script_removed_with_subtree() {
        let sanitizer = Sanitizer::new();
        let cleaned = sanitizer.sanitize("<p>Before</p><script>alert(1)</script><p>After</p>");
        assert_eq!(cleaned, "<p>Before</p><p>After</p>");
        assert!(!cleaned.contains("alert"));
    }

    #[test]
    fn test_style_block_removed_with_subtree() {
        let sanitizer = Sanitizer::new();
        let cleaned = sanitizer.sanitize("<style>p { color: red }</style><p>Text</p>");
        assert_eq!(cleaned, "<p>Text</p>");
    }

    #[test]
    fn test_disallowed_wrapper_unwrapped() {
        let sanitizer = Sanitizer::new();
        let cleaned = sanitizer.sanitize("<article><p>Kept</p><section><p>Also kept</p></section></article>");
        assert_eq!(cleaned, "<p>Kept</p><p>Also kept</p>");
    }

    #[test]
    fn test_attribute_whitelist_per_tag() {
        let sanitizer = Sanitizer::new();
        let cleaned = sanitizer.sanitize(
            r#"<a href="https://example.com/a" onclick="steal()" title="t" rel="nofollow" target="_blank">link</a>"#,
        );
        assert_eq!(
            cleaned,
            r#"<a href="https://example.com/a" title="t" target="_blank">link</a>"#
        );
    }

    #[test]
    fn test_img_keeps_only_src_alt_title() {
        let sanitizer = Sanitizer::new();
        let cleaned = sanitizer
            .sanitize(r#"<img src="/a.jpg" alt="A" width="100" height="50" loading="lazy">"#);
        assert_eq!(cleaned, r#"<img src="/a.jpg" alt="A">"#);
    }

    #[test]
    fn test_blockquote_keeps_cite() {
        let sanitizer = Sanitizer::new();
        let cleaned =
            sanitizer.sanitize(r#"<blockquote cite="https://example.com" class="q">Quoted</blockquote>"#);
        assert_eq!(cleaned, r#"<blockquote cite="https://example.com">Quoted</blockquote>"#);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let sanitizer = Sanitizer::new();
        assert_eq!(sanitizer.sanitize(""), "");
        assert_eq!(sanitizer.sanitize("   \n\t  "), "");
    }

    #[test]
    fn test_uppercase_tags_normalized() {
        let sanitizer = Sanitizer::new();
        assert_eq!(sanitizer.sanitize(r#"<P STYLE="x">Hi</P>"#), "<p>Hi</p>");
    }

    #[test]
    fn test_text_entities_escaped() {
        let sanitizer = Sanitizer::new();
        assert_eq!(
            sanitizer.sanitize("<p>Fish & chips</p>"),
            "<p>Fish &amp; chips</p>"
        );
    }

    #[test]
    fn test_whitespace_normalized() {
        let sanitizer = Sanitizer::new();
        let cleaned = sanitizer.sanitize("<p>a    b</p>\n\n   <p>c</p>");
        assert_eq!(cleaned, "<p>a b</p><p>c</p>");
    }

    #[test]
    fn test_idempotence() {
        let sanitizer = Sanitizer::new();
        let messy = r#"
            <div class="wrap" data-id="3">
                <h2 style="font-size:2em">Heading</h2>
                <article><p onclick="x()">One   two</p></article>
                <script>var a = 1;</script>
                <ul><li>item</li></ul>
            </div>
        "#;
        let once = sanitizer.sanitize(messy);
        let twice = sanitizer.sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_whitelist_closure() {
        let sanitizer = Sanitizer::new();
        let messy = r#"
            <main><nav><a href="/x" class="m">nav link</a></nav>
            <h1 id="top">Title</h1>
            <p data-p="1" style="color:blue">Body <span aria-label="s">span</span></p>
            <video src="v.mp4">fallback</video>
            <table border="1"><tr><td valign="top">cell</td></tr></table></main>
        "#;
        let cleaned = sanitizer.sanitize(messy);
        assert_whitelisted(&cleaned);
    }

    #[test]
    fn test_regex_safety_net_alone() {
        let residual = r#"<p style="color:red" class='wide' id="p1" data-k='v'>text</p>"#;
        assert_eq!(strip_residual_attributes(residual), "<p>text</p>");
    }

    #[test]
    fn test_custom_policy() {
        let policy = Policy::default()
            .allow_tag("figure")
            .allow_attribute("img", "loading");
        let sanitizer = Sanitizer::with_policy(policy);
        let cleaned =
            sanitizer.sanitize(r#"<figure><img src="/a.png" loading="lazy"></figure>"#);
        assert_eq!(cleaned, r#"<figure><img src="/a.png" loading="lazy"></figure>"#);
    }

    #[test]
    fn test_text_only() {
        let sanitizer = Sanitizer::new();
        let text = sanitizer.text_only("<h1>A title</h1><p>Some   body</p>");
        assert_eq!(text, "A title Some body");
    }

    #[test]
    fn test_comments_dropped() {
        let sanitizer = Sanitizer::new();
        assert_eq!(
            sanitizer.sanitize("<p>keep</p><!-- secret note -->"),
            "<p>keep</p>"
        );
    }
}
