//! In-memory lexical retrieval over document chunks (Okapi BM25).

use std::collections::{HashMap, HashSet};

const K1: f64 = 1.2;
const B: f64 = 0.75;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from", "how",
    "i", "if", "in", "is", "it", "my", "of", "on", "or", "should", "that", "the", "this", "to",
    "what", "when", "which", "who", "why", "with", "you", "your",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub source: String,
    pub page: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f64,
}

/// Lower-cased alphanumeric terms, stopwords and single letters removed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 1)
        .map(str::to_lowercase)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

pub struct LexicalIndex {
    chunks: Vec<Chunk>,
    term_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    doc_freq: HashMap<String, usize>,
    avg_len: f64,
}

impl LexicalIndex {
    pub fn build(chunks: Vec<Chunk>) -> Self {
        let mut term_freqs = Vec::with_capacity(chunks.len());
        let mut doc_lens = Vec::with_capacity(chunks.len());
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for chunk in &chunks {
            let terms = tokenize(&chunk.text);
            doc_lens.push(terms.len());
            let mut tf: HashMap<String, usize> = HashMap::new();
            for t in terms {
                *tf.entry(t).or_default() += 1;
            }
            for t in tf.keys() {
                *doc_freq.entry(t.clone()).or_default() += 1;
            }
            term_freqs.push(tf);
        }

        let avg_len = if doc_lens.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f64 / doc_lens.len() as f64
        };

        Self { chunks, term_freqs, doc_lens, doc_freq, avg_len }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn idf(&self, term: &str) -> f64 {
        let n = self.chunks.len() as f64;
        let df = self.doc_freq.get(term).copied().unwrap_or(0) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Up to `k` chunks sharing at least one term with the query, best first.
    /// Equal scores keep document order.
    pub fn search(&self, query: &str, k: usize) -> Vec<ScoredChunk> {
        let terms: HashSet<String> = tokenize(query).into_iter().collect();
        if terms.is_empty() || self.avg_len == 0.0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = self
            .term_freqs
            .iter()
            .enumerate()
            .filter_map(|(i, tf)| {
                let len_norm = 1.0 - B + B * self.doc_lens[i] as f64 / self.avg_len;
                let score: f64 = terms
                    .iter()
                    .filter_map(|t| tf.get(t).map(|f| (t, *f as f64)))
                    .map(|(t, f)| self.idf(t) * f * (K1 + 1.0) / (f + K1 * len_norm))
                    .sum();
                (score > 0.0).then_some((i, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored
            .into_iter()
            .map(|(i, score)| ScoredChunk { chunk: self.chunks[i].clone(), score })
            .collect()
    }
}
