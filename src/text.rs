// src/text.rs

//! Text helpers for the rewriter: grapheme segmentation, pair iteration and
//! exclusion rules.

use crate::config::ExcludeRule;
use icu_segmenter::GraphemeClusterSegmenter;

/// Splits `text` into extended grapheme clusters.
///
/// Segmentation is locale-independent; no locale can be passed in.
pub fn graphemes(text: &str) -> Vec<&str> {
    let segmenter = GraphemeClusterSegmenter::new();
    let breaks: Vec<usize> = segmenter.segment_str(text).collect();
    breaks.windows(2).map(|w| &text[w[0]..w[1]]).collect()
}

/// Yields each element together with its successor: `[a, b, c]` gives
/// `(a, b)` and `(b, c)`.
pub fn pairwise<I>(iter: I) -> Pairwise<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Clone,
{
    let mut iter = iter.into_iter();
    let prev = iter.next();
    Pairwise { iter, prev }
}

#[derive(Debug, Clone)]
pub struct Pairwise<I: Iterator> {
    iter: I,
    prev: Option<I::Item>,
}

impl<I> Iterator for Pairwise<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = (I::Item, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.iter.next()?;
        let prev = self.prev.replace(next.clone())?;
        Some((prev, next))
    }
}

impl ExcludeRule {
    /// Whether the first codepoint of `grapheme` falls under this rule.
    pub fn matches(&self, grapheme: &str) -> bool {
        let Some(first) = grapheme.chars().next() else {
            return false;
        };
        match self {
            ExcludeRule::Chars(chars) => chars.chars().any(|c| c == first),
            ExcludeRule::Range(start, end) => (*start..=*end).contains(&u32::from(first)),
        }
    }
}

pub fn is_excluded(grapheme: &str, rules: &[ExcludeRule]) -> bool {
    rules.iter().any(|rule| rule.matches(grapheme))
}

/// True for text the rewriter leaves alone: empty or only whitespace.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}
