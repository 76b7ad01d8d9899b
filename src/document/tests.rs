// src/document/tests.rs

use super::rewrite::{apply_kerning, strip_kerning, APPLIED_CLASS};
use super::*;
use crate::cache::{ProfileStore, SpacingCache};
use crate::config::{ExcludeRule, KerningConfig};
use crate::error::Result;
use crate::gap::KerningResult;
use crate::kerning::KerningEngine;

/// Engine with canned answers: pairs ending in "o" are tightened by a quarter
/// em times the factor, everything else is normal. Records every call.
#[derive(Debug, Default)]
struct ScriptedEngine {
    prepared: Vec<(String, String, String)>,
    asked: Vec<(String, String, String)>,
}

impl KerningEngine for ScriptedEngine {
    fn prepare<S: ProfileStore + ?Sized>(
        &mut self,
        left: &str,
        right: &str,
        font: &FontDescriptor,
        _store: &mut S,
    ) -> Result<()> {
        self.prepared
            .push((left.into(), right.into(), font.font_family.clone()));
        Ok(())
    }

    fn kerning<S: ProfileStore + ?Sized>(
        &mut self,
        left: &str,
        right: &str,
        font: &FontDescriptor,
        factor: f64,
        _store: &mut S,
    ) -> Result<KerningResult> {
        self.asked
            .push((left.into(), right.into(), font.font_family.clone()));
        Ok(if right == "o" {
            KerningResult::Tighten(0.25 * factor)
        } else {
            KerningResult::Normal
        })
    }
}

fn paragraph(text: &str) -> (Document, NodeId) {
    let mut doc = Document::new(Element::new("div"));
    let p = doc.create_element(Element::new("p"));
    let t = doc.create_text(text);
    doc.append_child(p, t);
    let root = doc.root();
    doc.append_child(root, p);
    (doc, p)
}

#[test_log::test]
fn test_tree_links() {
    let mut doc = Document::new(Element::new("div"));
    let root = doc.root();
    let a = doc.create_text("a");
    let c = doc.create_text("c");
    doc.append_child(root, a);
    doc.append_child(root, c);
    let b = doc.create_element(Element::new("b"));
    doc.insert_before(root, b, c);
    assert_eq!(doc.children(root), vec![a, b, c]);

    doc.detach(a);
    assert_eq!(doc.children(root), vec![b, c]);
    assert_eq!(doc.parent(a), None);
    doc.detach(c);
    assert_eq!(doc.children(root), vec![b]);
    doc.append_child(root, c);
    assert_eq!(doc.children(root), vec![b, c]);
}

#[test_log::test]
fn test_normalize_merges_text() {
    let mut doc = Document::new(Element::new("p"));
    let root = doc.root();
    for t in ["T", "", "E", "ST"] {
        let n = doc.create_text(t);
        doc.append_child(root, n);
    }
    doc.normalize(root);
    assert_eq!(doc.children(root).len(), 1);
    assert_eq!(doc.to_html(root), "<p>TEST</p>");
}

#[test_log::test]
fn test_to_html_escapes() {
    let mut doc = Document::new(Element::new("p").with_letter_spacing("normal"));
    let root = doc.root();
    let t = doc.create_text("a<b & \"c\"");
    doc.append_child(root, t);
    assert_eq!(
        doc.to_html(root),
        "<p style=\"letter-spacing: normal\">a&lt;b &amp; &quot;c&quot;</p>"
    );
}

#[test_log::test]
fn test_apply_wraps_all_but_last_grapheme() {
    let (mut doc, p) = paragraph("lo");
    let root = doc.root();
    let mut engine = ScriptedEngine::default();
    let mut cache = SpacingCache::new();
    let config = KerningConfig::default();

    let stats = apply_kerning(&mut doc, root, &config, &mut engine, &mut cache).unwrap();
    assert_eq!(stats.pairs, 1);
    assert_eq!(stats.tightened, 1);
    assert_eq!(
        doc.to_html(p),
        format!(
            "<p><span class=\"{}\" style=\"letter-spacing: -0.125em\">l</span>o</p>",
            APPLIED_CLASS
        )
    );
    assert_eq!(engine.prepared.len(), 1);
    assert_eq!(engine.asked.len(), 1);
}

#[test_log::test]
fn test_apply_is_idempotent() {
    let (mut doc, p) = paragraph("foo bar");
    let root = doc.root();
    let mut engine = ScriptedEngine::default();
    let mut cache = SpacingCache::new();
    let config = KerningConfig::default();

    apply_kerning(&mut doc, root, &config, &mut engine, &mut cache).unwrap();
    let once = doc.to_html(p);
    apply_kerning(&mut doc, root, &config, &mut engine, &mut cache).unwrap();
    assert_eq!(doc.to_html(p), once);

    strip_kerning(&mut doc, root);
    assert_eq!(doc.to_html(p), "<p>foo bar</p>");
}

#[test_log::test]
fn test_zero_factor_only_strips() {
    let (mut doc, p) = paragraph("oo");
    let root = doc.root();
    let mut engine = ScriptedEngine::default();
    let mut cache = SpacingCache::new();
    let config = KerningConfig::default();
    apply_kerning(&mut doc, root, &config, &mut engine, &mut cache).unwrap();

    let off = KerningConfig {
        factor: 0.0,
        ..KerningConfig::default()
    };
    let stats = apply_kerning(&mut doc, root, &off, &mut engine, &mut cache).unwrap();
    assert_eq!(stats, Default::default());
    assert_eq!(doc.to_html(p), "<p>oo</p>");
}

#[test_log::test]
fn test_excluded_pairs_skip_the_engine() {
    let (mut doc, _) = paragraph("aoア");
    let root = doc.root();
    let mut engine = ScriptedEngine::default();
    let mut cache = SpacingCache::new();
    let config = KerningConfig {
        exclude: vec![ExcludeRule::Range(0x00, 0xff)],
        ..KerningConfig::default()
    };
    let stats = apply_kerning(&mut doc, root, &config, &mut engine, &mut cache).unwrap();
    assert_eq!(stats.pairs, 2);
    assert_eq!(stats.excluded, 2);
    assert!(engine.prepared.is_empty());
    assert!(engine.asked.is_empty());
}

#[test_log::test]
fn test_skips_excluded_tags_and_explicit_spacing() {
    let mut doc = Document::new(Element::new("div"));
    let root = doc.root();
    for element in [
        Element::new("textarea"),
        Element::new("span").with_letter_spacing("0.1em"),
        Element::new("SCRIPT"),
    ] {
        let e = doc.create_element(element);
        let t = doc.create_text("xo");
        doc.append_child(e, t);
        doc.append_child(root, e);
    }
    let blank = doc.create_text("  \n ");
    doc.append_child(root, blank);

    let mut engine = ScriptedEngine::default();
    let stats = apply_kerning(
        &mut doc,
        root,
        &KerningConfig::default(),
        &mut engine,
        &mut SpacingCache::new(),
    )
    .unwrap();
    assert_eq!(stats.text_nodes, 0);
    assert!(engine.asked.is_empty());
}

#[test_log::test]
fn test_font_is_inherited_from_nearest_ancestor() {
    let mut doc = Document::new(
        Element::new("div").with_font(FontDescriptor::new("Outer", "normal", "400")),
    );
    let root = doc.root();
    let inner = doc.create_element(
        Element::new("em").with_font(FontDescriptor::new("Inner", "italic", "400")),
    );
    let t1 = doc.create_text("ab");
    let t2 = doc.create_text("cd");
    doc.append_child(inner, t2);
    doc.append_child(root, t1);
    doc.append_child(root, inner);

    let mut engine = ScriptedEngine::default();
    apply_kerning(
        &mut doc,
        root,
        &KerningConfig::default(),
        &mut engine,
        &mut SpacingCache::new(),
    )
    .unwrap();
    assert_eq!(
        engine.asked,
        vec![
            ("a".to_string(), "b".to_string(), "Outer".to_string()),
            ("c".to_string(), "d".to_string(), "Inner".to_string()),
        ]
    );
}

#[test_log::test]
fn test_strip_merges_only_consecutive_spans() {
    let mut doc = Document::new(Element::new("p"));
    let root = doc.root();
    let outer = doc.create_element(Element::new("b"));
    for (i, g) in ["A", "B", "C"].iter().enumerate() {
        let node = if i == 1 {
            doc.create_text(*g)
        } else {
            let span = doc.create_element(Element::new("span").with_class(APPLIED_CLASS));
            let t = doc.create_text(*g);
            doc.append_child(span, t);
            span
        };
        doc.append_child(outer, node);
    }
    doc.append_child(root, outer);

    strip_kerning(&mut doc, root);
    assert_eq!(doc.to_html(root), "<p><b>ABC</b></p>");
    assert_eq!(doc.children(outer).len(), 1);
}

#[test_log::test]
fn test_deep_nesting_does_not_recurse() {
    let mut doc = Document::new(Element::new("div"));
    let mut parent = doc.root();
    for _ in 0..100_000 {
        let child = doc.create_element(Element::new("span"));
        doc.append_child(parent, child);
        parent = child;
    }
    let t = doc.create_text("xo");
    doc.append_child(parent, t);

    let mut engine = ScriptedEngine::default();
    let root = doc.root();
    let stats = apply_kerning(
        &mut doc,
        root,
        &KerningConfig::default(),
        &mut engine,
        &mut SpacingCache::new(),
    )
    .unwrap();
    assert_eq!(stats.tightened, 1);
    assert_eq!(doc.text_content(root), "xo");
}

fn unwrap_class(e: &Element) -> bool {
    e.class.as_deref() == Some("unwrap")
}

fn push_text(doc: &mut Document, parent: NodeId, text: &str) {
    let t = doc.create_text(text);
    doc.append_child(parent, t);
}

fn push_element(doc: &mut Document, parent: NodeId, element: Element) -> NodeId {
    let e = doc.create_element(element);
    doc.append_child(parent, e);
    e
}

#[test_log::test]
fn test_unwrap_merges_surrounding_text() {
    let mut doc = Document::new(Element::new("p"));
    let p = doc.root();
    push_text(&mut doc, p, "T");
    let span = push_element(&mut doc, p, Element::new("span").with_class("unwrap"));
    push_text(&mut doc, span, "E");
    push_text(&mut doc, p, "ST");

    assert_eq!(doc.unwrap_elements(p, unwrap_class), 1);
    assert_eq!(doc.to_html(p), "<p>TEST</p>");
    assert_eq!(doc.children(p).len(), 1);
}

#[test_log::test]
fn test_unwrap_multiple_siblings() {
    let mut doc = Document::new(Element::new("div"));
    let div = doc.root();
    let hello = push_element(&mut doc, div, Element::new("span").with_class("unwrap"));
    push_text(&mut doc, hello, "Hello");
    push_text(&mut doc, div, " ");
    let world = push_element(&mut doc, div, Element::new("span").with_class("unwrap"));
    push_text(&mut doc, world, "World");
    push_text(&mut doc, div, "!");

    assert_eq!(doc.unwrap_elements(div, unwrap_class), 2);
    assert_eq!(doc.to_html(div), "<div>Hello World!</div>");
}

#[test_log::test]
fn test_unwrap_inside_kept_element() {
    let mut doc = Document::new(Element::new("div"));
    let div = doc.root();
    let outer = push_element(&mut doc, div, Element::new("span").with_class("outer"));
    push_text(&mut doc, outer, "Outer ");
    let inner = push_element(&mut doc, outer, Element::new("span").with_class("unwrap"));
    push_text(&mut doc, inner, "Inner");
    push_text(&mut doc, outer, " Text");

    doc.unwrap_elements(div, unwrap_class);
    assert_eq!(
        doc.to_html(div),
        "<div><span class=\"outer\">Outer Inner Text</span></div>"
    );
    assert_eq!(doc.children(outer).len(), 1);
}

#[test_log::test]
fn test_unwrap_without_matches_changes_nothing() {
    let (mut doc, p) = paragraph("This is a text-only paragraph.");
    let before = doc.to_html(p);
    assert_eq!(doc.unwrap_elements(p, unwrap_class), 0);
    assert_eq!(doc.to_html(p), before);
}

#[test_log::test]
fn test_unwrap_lifts_nested_structure() {
    let mut doc = Document::new(Element::new("article"));
    let article = doc.root();
    let h1 = push_element(&mut doc, article, Element::new("h1"));
    push_text(&mut doc, h1, "Title");
    let p = push_element(&mut doc, article, Element::new("p"));
    push_text(&mut doc, p, "Text ");
    let link = push_element(&mut doc, p, Element::new("a").with_class("unwrap"));
    push_text(&mut doc, link, "Link");
    push_text(&mut doc, p, " continues");
    let wrapper = push_element(&mut doc, article, Element::new("div").with_class("unwrap"));
    let ul = push_element(&mut doc, wrapper, Element::new("ul"));
    for item in ["Item 1", "Item 2"] {
        let li = push_element(&mut doc, ul, Element::new("li"));
        push_text(&mut doc, li, item);
    }

    assert_eq!(doc.unwrap_elements(article, unwrap_class), 2);
    assert_eq!(doc.to_html(p), "<p>Text Link continues</p>");
    assert_eq!(doc.parent(ul), Some(article));
    assert_eq!(doc.children(article), vec![h1, p, ul]);
}

#[test_log::test]
fn test_unwrap_by_tag() {
    let mut doc = Document::new(Element::new("div"));
    let div = doc.root();
    let first = push_element(&mut doc, div, Element::new("em"));
    push_text(&mut doc, first, "This is for testing");
    push_text(&mut doc, div, " ");
    let normal = push_element(&mut doc, div, Element::new("span"));
    push_text(&mut doc, normal, "Normal span");
    let bang = push_element(&mut doc, div, Element::new("em"));
    push_text(&mut doc, bang, "!");

    doc.unwrap_elements(div, |e| e.tag == "em");
    assert_eq!(
        doc.to_html(div),
        "<div>This is for testing <span>Normal span</span>!</div>"
    );
}

#[test_log::test]
fn test_unwrap_empty_and_textless_elements() {
    let mut doc = Document::new(Element::new("div"));
    let div = doc.root();
    push_text(&mut doc, div, "before");
    push_element(&mut doc, div, Element::new("span").with_class("unwrap"));
    push_text(&mut doc, div, "after");
    let holder = push_element(&mut doc, div, Element::new("span").with_class("unwrap"));
    let img = push_element(&mut doc, holder, Element::new("img"));

    doc.unwrap_elements(div, unwrap_class);
    assert_eq!(doc.to_html(div), "<div>beforeafter<img></img></div>");
    assert_eq!(doc.parent(img), Some(div));
}

#[test_log::test]
fn test_unwrap_deep_nesting_does_not_recurse() {
    let mut doc = Document::new(Element::new("div"));
    let mut parent = doc.root();
    for _ in 0..100_000 {
        parent = push_element(&mut doc, parent, Element::new("b"));
    }
    let target = push_element(&mut doc, parent, Element::new("i").with_class("unwrap"));
    push_text(&mut doc, target, "x");

    let root = doc.root();
    assert_eq!(doc.unwrap_elements(root, unwrap_class), 1);
    assert_eq!(doc.text_content(root), "x");
    assert_eq!(doc.element(parent).map(|e| e.tag.as_str()), Some("b"));
    assert!(doc.first_child(parent).is_some_and(|c| doc.text(c) == Some("x")));
}
