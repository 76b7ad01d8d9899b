// src/document/rewrite.rs

//! Applying and removing spacing annotations.
//!
//! Each grapheme of a kerned text node except the last is wrapped in a
//! `<span class="optical-kerning-applied">` carrying the letter-spacing that
//! tightens it against its successor; the last grapheme stays plain text.
//! Removing annotations turns those spans back into text, so applying twice
//! gives the same tree as applying once.

use super::{Document, Element, NodeId};
use crate::cache::ProfileStore;
use crate::config::KerningConfig;
use crate::error::Result;
use crate::font::FontDescriptor;
use crate::gap::KerningResult;
use crate::kerning::KerningEngine;
use crate::text::{graphemes, is_blank, is_excluded, pairwise};
use log::{debug, info};

/// Class marking spans created by [`apply_kerning`].
pub const APPLIED_CLASS: &str = "optical-kerning-applied";

/// Counters from one [`apply_kerning`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub text_nodes: usize,
    pub pairs: usize,
    pub tightened: usize,
    pub excluded: usize,
}

fn is_applied(doc: &Document, id: NodeId) -> bool {
    doc.element(id)
        .is_some_and(|e| e.class.as_deref() == Some(APPLIED_CLASS))
}

/// Replaces every run of consecutive annotation spans under `root` with a
/// single text node holding their text, then normalizes.
pub fn strip_kerning(doc: &mut Document, root: NodeId) {
    let mut work = vec![root];
    let mut stripped = 0;
    while let Some(element) = work.pop() {
        let mut run: Vec<NodeId> = Vec::new();
        for child in doc.children(element) {
            if is_applied(doc, child) {
                run.push(child);
                continue;
            }
            stripped += replace_run(doc, element, &mut run);
            if doc.element(child).is_some() {
                work.push(child);
            }
        }
        stripped += replace_run(doc, element, &mut run);
    }
    doc.normalize(root);
    if stripped > 0 {
        debug!("Stripped {} annotation spans", stripped);
    }
}

fn replace_run(doc: &mut Document, parent: NodeId, run: &mut Vec<NodeId>) -> usize {
    let Some(&first) = run.first() else {
        return 0;
    };
    let text: String = run.iter().map(|&n| doc.text_content(n)).collect();
    let replacement = doc.create_text(text);
    doc.insert_before(parent, replacement, first);
    for &span in run.iter() {
        doc.detach(span);
    }
    let count = run.len();
    run.clear();
    count
}

/// A text node to kern and the font it renders with.
struct TextJob {
    node: NodeId,
    font: FontDescriptor,
}

fn collect_jobs(doc: &Document, root: NodeId, config: &KerningConfig) -> Vec<TextJob> {
    let mut jobs = Vec::new();
    let mut work: Vec<NodeId> = doc.children(root).into_iter().rev().collect();
    while let Some(node) = work.pop() {
        if let Some(e) = doc.element(node) {
            if e.letter_spacing.is_some() || config.is_tag_excluded(&e.tag) {
                continue;
            }
            work.extend(doc.children(node).into_iter().rev());
        } else if let Some(text) = doc.text(node) {
            if is_blank(text) {
                continue;
            }
            let font = doc
                .inherited_font(node)
                .cloned()
                .unwrap_or_else(|| config.font.clone());
            jobs.push(TextJob { node, font });
        }
    }
    jobs
}

/// Removes old annotations under `root` and, unless the factor is zero,
/// annotates every eligible text node with fresh spacing.
///
/// Elements with an excluded tag or an explicit letter-spacing are skipped
/// with their whole subtree. Pairs touching an excluded grapheme get normal
/// spacing without a measurement.
pub fn apply_kerning<E, S>(
    doc: &mut Document,
    root: NodeId,
    config: &KerningConfig,
    engine: &mut E,
    store: &mut S,
) -> Result<RewriteStats>
where
    E: KerningEngine,
    S: ProfileStore + ?Sized,
{
    strip_kerning(doc, root);
    let mut stats = RewriteStats::default();
    if config.factor == 0.0 {
        return Ok(stats);
    }

    let jobs = collect_jobs(doc, root, config);

    // First pass lets batching engines queue every measurement up front.
    for job in &jobs {
        let text = doc.text(job.node).unwrap_or_default();
        for (g0, g1) in pairwise(graphemes(text)) {
            if !is_excluded(g0, &config.exclude) && !is_excluded(g1, &config.exclude) {
                engine.prepare(g0, g1, &job.font, store)?;
            }
        }
    }

    for job in &jobs {
        let text = doc.text(job.node).unwrap_or_default().to_string();
        let segments = graphemes(&text);
        if segments.len() < 2 {
            continue;
        }
        let last = segments[segments.len() - 1];
        let Some(parent) = doc.parent(job.node) else {
            continue;
        };
        stats.text_nodes += 1;

        for (g0, g1) in pairwise(segments.iter().copied()) {
            stats.pairs += 1;
            let result = if is_excluded(g0, &config.exclude) || is_excluded(g1, &config.exclude) {
                stats.excluded += 1;
                KerningResult::Normal
            } else {
                engine.kerning(g0, g1, &job.font, config.factor, store)?
            };
            if result != KerningResult::Normal {
                stats.tightened += 1;
            }

            let span = doc.create_element(
                Element::new("span")
                    .with_class(APPLIED_CLASS)
                    .with_letter_spacing(result.letter_spacing()),
            );
            let glyph = doc.create_text(g0);
            doc.append_child(span, glyph);
            doc.insert_before(parent, span, job.node);
        }

        let tail = doc.create_text(last);
        doc.insert_before(parent, tail, job.node);
        doc.detach(job.node);
    }

    info!(
        "Kerned {} text nodes: {} pairs, {} tightened, {} excluded",
        stats.text_nodes, stats.pairs, stats.tightened, stats.excluded
    );
    Ok(stats)
}
