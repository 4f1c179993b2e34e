use std::collections::HashSet;

/// Common English function words excluded from word frequencies
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "couldn", "did", "didn", "do", "does", "doesn",
    "doing", "don", "down", "during", "each", "few", "for", "from", "further", "had", "hadn",
    "has", "hasn", "have", "haven", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "let",
    "ll", "me", "more", "most", "mustn", "my", "myself", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "re", "same", "shan", "she", "should", "shouldn", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "ve", "very", "was", "wasn", "we",
    "were", "weren", "what", "when", "where", "which", "while", "who", "whom", "why", "with",
    "won", "would", "wouldn", "you", "your", "yours", "yourself", "yourselves",
];

/// Builds the stop-word set, adding `extra` words (lowercased)
pub fn stop_word_set<S: AsRef<str>>(extra: &[S]) -> HashSet<String> {
    STOP_WORDS
        .iter()
        .map(|w| w.to_string())
        .chain(extra.iter().map(|w| w.as_ref().to_lowercase()))
        .collect()
}
