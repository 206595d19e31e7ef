use search_core::tokenizer::{StandardTokenizer, Tokenizer};

#[test]
fn it_normalizes_and_lowercases() {
    let words = StandardTokenizer::new().tokenize("ＡrrayList Collection.toArray()");
    // NFKC folds the fullwidth letter
    assert_eq!(words, vec!["arraylist", "collection", "toarray"]);
}

#[test]
fn it_filters_stopwords() {
    let words = StandardTokenizer::new().tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"fox".to_string()));
}

#[test]
fn all_stopword_text_is_empty() {
    assert!(StandardTokenizer::new().tokenize("to be or not to be").is_empty());
    assert!(StandardTokenizer::new().tokenize("  ").is_empty());
}
