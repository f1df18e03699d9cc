//! Recursive character splitter.
//!
//! Text is cut on the coarsest boundary that yields pieces of at most
//! `chunk_size` characters: paragraphs, then lines, then sentences, then
//! words. Small neighbouring pieces are merged back up to the limit. Text
//! with none of those boundaries is hard-cut by character count. Lengths are
//! counted in `char`s, never bytes.

use std::collections::VecDeque;

/// Boundaries tried in order. The empty separator means "hard cut".
const SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    /// Characters carried over from the end of one chunk into the next.
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 0 }
    }
}

impl ChunkerConfig {
    fn size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `text` into trimmed, non-empty chunks of at most `chunk_size` chars.
pub fn split_text(text: &str, cfg: &ChunkerConfig) -> Vec<String> {
    let mut out = Vec::new();
    if char_len(text) <= cfg.size() {
        push_trimmed(&mut out, text);
    } else {
        split_recursive(text, &SEPARATORS, cfg, &mut out);
    }
    out
}

fn push_trimmed(out: &mut Vec<String>, s: &str) {
    let t = s.trim();
    if !t.is_empty() {
        out.push(t.to_string());
    }
}

fn split_recursive(text: &str, separators: &[&str], cfg: &ChunkerConfig, out: &mut Vec<String>) {
    let pos = separators
        .iter()
        .position(|sep| sep.is_empty() || text.contains(sep))
        .unwrap_or(separators.len().saturating_sub(1));
    let sep = separators.get(pos).copied().unwrap_or("");
    let rest = separators.get(pos + 1..).unwrap_or(&[]);

    if sep.is_empty() {
        hard_split(text, cfg.size(), out);
        return;
    }

    let mut fitting: Vec<&str> = Vec::new();
    for piece in text.split(sep) {
        if piece.trim().is_empty() {
            continue;
        }
        if char_len(piece) <= cfg.size() {
            fitting.push(piece);
        } else {
            if !fitting.is_empty() {
                merge(&fitting, sep, cfg, out);
                fitting.clear();
            }
            split_recursive(piece, rest, cfg, out);
        }
    }
    if !fitting.is_empty() {
        merge(&fitting, sep, cfg, out);
    }
}

fn hard_split(text: &str, size: usize, out: &mut Vec<String>) {
    let chars: Vec<char> = text.chars().collect();
    for window in chars.chunks(size) {
        let s: String = window.iter().collect();
        push_trimmed(out, &s);
    }
}

fn joined_len(parts: &VecDeque<&str>, sep_len: usize) -> usize {
    let body: usize = parts.iter().map(|p| char_len(p)).sum();
    body + sep_len * parts.len().saturating_sub(1)
}

fn join(parts: &VecDeque<&str>, sep: &str) -> String {
    parts.iter().copied().collect::<Vec<_>>().join(sep)
}

/// Greedily pack pieces (each already within the limit) into chunks.
fn merge(pieces: &[&str], sep: &str, cfg: &ChunkerConfig, out: &mut Vec<String>) {
    let size = cfg.size();
    let sep_len = char_len(sep);
    let mut current: VecDeque<&str> = VecDeque::new();

    for piece in pieces {
        let piece_len = char_len(piece);
        let grown = joined_len(&current, sep_len) + piece_len + if current.is_empty() { 0 } else { sep_len };

        if grown > size && !current.is_empty() {
            push_trimmed(out, &join(&current, sep));
            // Keep a tail for overlap, as long as the next piece still fits.
            while !current.is_empty() {
                let kept = joined_len(&current, sep_len);
                if kept > cfg.chunk_overlap || kept + sep_len + piece_len > size {
                    current.pop_front();
                } else {
                    break;
                }
            }
        }
        current.push_back(piece);
    }

    if !current.is_empty() {
        push_trimmed(out, &join(&current, sep));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cfg(chunk_size: usize, chunk_overlap: usize) -> ChunkerConfig {
        ChunkerConfig { chunk_size, chunk_overlap }
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        assert_eq!(split_text("  Hello world  ", &cfg(100, 0)), vec!["Hello world"]);
        assert!(split_text("   ", &cfg(100, 0)).is_empty());
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = "First paragraph here.\n\nSecond paragraph here.\n\nThird one.";
        let chunks = split_text(text, &cfg(25, 0));
        assert_eq!(
            chunks,
            vec!["First paragraph here.", "Second paragraph here.", "Third one."]
        );
    }

    #[test]
    fn test_merges_small_pieces() {
        let text = "a b c d e f g h i j";
        let chunks = split_text(text, &cfg(7, 0));
        assert_eq!(chunks, vec!["a b c d", "e f g h", "i j"]);
    }

    #[test]
    fn test_overlap_carries_tail() {
        let text = "one two three four five six";
        let chunks = split_text(text, &cfg(13, 5));
        assert_eq!(chunks, vec!["one two three", "three four", "four five six"]);
    }

    #[test]
    fn test_hard_cut_without_boundaries() {
        let text = "x".repeat(25);
        let chunks = split_text(&text, &cfg(10, 0));
        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![10, 10, 5]);
    }

    #[test]
    fn test_never_exceeds_chunk_size() {
        let mut text = String::new();
        for i in 0..200 {
            text.push_str(&format!("Sentence number {i} talks about sleep and diet. "));
            if i % 7 == 0 {
                text.push_str("\n\n");
            }
            if i % 13 == 0 {
                text.push_str(&"z".repeat(90));
                text.push('\n');
            }
        }
        for (size, overlap) in [(50, 0), (80, 20), (120, 119), (1000, 0)] {
            let chunks = split_text(&text, &cfg(size, overlap));
            assert!(!chunks.is_empty());
            assert!(
                chunks.iter().all(|c| c.chars().count() <= size),
                "chunk over {size}"
            );
        }
    }

    #[test]
    fn test_multibyte_counted_as_chars() {
        let text = "é".repeat(30);
        let chunks = split_text(&text, &cfg(10, 0));
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() == 10));
    }
}
