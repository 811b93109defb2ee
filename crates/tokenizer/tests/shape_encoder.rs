use shapepiece_core::{PieceVocab, Segmenter, UnigramSegmenter};
use shapepiece_tokenizer::{Bpe, SentencepieceBpe};
use std::io::Write;
use std::sync::Arc;

const WORDS: &[&str] = &["▁cafe", "▁hello", "▁world", "▁the", "▁cat", "ing", "▁un"];

fn vocab_entries(extra: &[&str]) -> Vec<(String, f32)> {
    let mut entries: Vec<(String, f32)> = ["<unk>", "<s>", "</s>", "<pad>"]
        .iter()
        .map(|p| (p.to_string(), 0.0))
        .collect();
    entries.push(("▁".to_string(), -10.0));
    entries.extend(('a'..='z').map(|c| (c.to_string(), -10.0)));
    for piece in WORDS.iter().chain(extra) {
        entries.push((piece.to_string(), -10.0 / piece.chars().count() as f32));
    }
    entries
}

fn encoder_with(extra: &[&str], encode_shapes: bool) -> SentencepieceBpe {
    let vocab = PieceVocab::from_entries(vocab_entries(extra)).unwrap();
    SentencepieceBpe::new(Arc::new(UnigramSegmenter::new(vocab)), encode_shapes)
}

fn encoder(encode_shapes: bool) -> SentencepieceBpe {
    encoder_with(&[], encode_shapes)
}

const SAMPLES: &[&str] = &[
    "hello world",
    "Hello World",
    "  the   cat  ",
    "Hello, World!",
    "Café",
    "unhelloing THE Cat",
    "naïve résumé",
    "tab\tseparated\nlines",
    "\u{0130}stanbul",
    "snow ☃ man",
    "MiXeD CaSe",
];

#[test]
fn plain_mode_round_trips_modulo_whitespace() {
    let bpe = encoder(false);
    for &text in SAMPLES {
        let expected = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let encoded = bpe.encode(text).unwrap();
        assert!(!encoded.contains("  "), "{:?}", encoded);
        assert_eq!(bpe.decode(&encoded), expected, "input {:?}", text);
    }
}

#[test]
fn shape_mode_emits_one_token_per_lowercase_piece() {
    let bpe = encoder(true);
    for &text in SAMPLES {
        let segmentation = bpe.shape_segmentation(text).unwrap();
        let encoded = bpe.encode(text).unwrap();
        assert_eq!(
            encoded.split_whitespace().count(),
            segmentation.pieces.len(),
            "input {:?} -> {:?}",
            text,
            encoded
        );
    }
}

#[test]
fn segmentation_boundaries_partition_the_text() {
    let bpe = encoder(true);
    for &text in SAMPLES {
        let segmentation = bpe.shape_segmentation(text).unwrap();
        assert_eq!(segmentation.boundaries[0], 0);
        assert!(segmentation.boundaries.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(
            segmentation.boundaries.len(),
            segmentation.pieces.len() + 1
        );
        assert!(segmentation.is_aligned(), "input {:?}", text);
        assert_eq!(
            *segmentation.boundaries.last().unwrap(),
            segmentation.base.chars().count() + 1
        );
    }
}

#[test]
fn shape_mode_keeps_original_casing() {
    let bpe = encoder(true);
    assert_eq!(bpe.encode("Hello World").unwrap(), "▁Hello ▁World");
    assert_eq!(bpe.encode("HELLO").unwrap(), "▁HELLO");
    assert_eq!(bpe.encode("hello").unwrap(), "▁hello");
}

#[test]
fn shape_mode_strips_accents_before_segmenting() {
    let bpe = encoder(true);
    assert_eq!(bpe.encode("Café").unwrap(), "▁Cafe");
    assert_eq!(bpe.shape_segmentation("Café").unwrap().base, "Cafe");
}

#[test]
fn cased_vocabulary_entries_do_not_change_the_lookup() {
    // The lookup is done on the lower-cased span, so `▁Cafe` being present
    // or not makes no difference.
    let without = encoder(true);
    let with = encoder_with(&["▁Cafe"], true);
    assert_eq!(without.encode("Café").unwrap(), with.encode("Café").unwrap());
}

#[test]
fn uncovered_spans_become_unk() {
    let bpe = encoder(true);
    assert_eq!(bpe.encode("Café ☃").unwrap(), "▁Cafe ▁ <unk>");
    assert_eq!(bpe.encode("Hello, World!").unwrap(), "▁Hello <unk> ▁World <unk>");
}

#[test]
fn greek_final_sigma_matches_lowercase_vocabulary() {
    let vocab = PieceVocab::from_entries([("<unk>", 0.0), ("▁οδος", -1.0), ("▁σοφια", -1.0)])
        .unwrap();
    let bpe = SentencepieceBpe::new(Arc::new(UnigramSegmenter::new(vocab)), true);
    assert_eq!(bpe.encode("οδος").unwrap(), "▁οδος");
    assert_eq!(bpe.encode("ΟΔΟΣ").unwrap(), "▁ΟΔΟΣ");
    assert_eq!(bpe.encode("Οδος ΣΟΦΙΑ").unwrap(), "▁Οδος ▁ΣΟΦΙΑ");
}

#[test]
fn whitespace_is_collapsed_at_word_boundaries() {
    let bpe = encoder(true);
    let expected = "▁Hello ▁World";
    assert_eq!(bpe.encode("  Hello   World  ").unwrap(), expected);
    assert_eq!(bpe.encode("Hello\tWorld\n").unwrap(), expected);
}

#[test]
fn multi_char_lowercase_keeps_alignment() {
    let bpe = encoder(true);
    let encoded = bpe.encode("\u{0130}stanbul").unwrap();
    // İ decomposes into I + combining dot, and the dot is stripped.
    assert_eq!(bpe.decode(&encoded), "Istanbul");
}

#[test]
fn empty_input_gives_empty_output() {
    assert_eq!(encoder(false).encode("").unwrap(), "");
    assert_eq!(encoder(true).encode("").unwrap(), "");
    assert_eq!(encoder(true).encode("   ").unwrap(), "");
}

#[test]
fn decode_restores_words() {
    let bpe = encoder(false);
    assert_eq!(bpe.decode("▁hello▁world"), "hello world");
    assert_eq!(bpe.decode("▁hel lo ▁wor ld"), "hello world");
    assert_eq!(bpe.decode(""), "");
}

#[test]
fn reserved_tokens_begin_words() {
    let bpe = encoder(true);
    for token in ["<unk>", "<s>", "</s>", "<pad>"] {
        assert!(bpe.is_beginning_of_word(token), "{}", token);
    }
}

#[test]
fn word_start_glyph_decides_other_tokens() {
    let bpe = encoder(true);
    assert!(bpe.is_beginning_of_word("▁hello"));
    assert!(bpe.is_beginning_of_word("▁"));
    assert!(!bpe.is_beginning_of_word("ing"));
    assert!(!bpe.is_beginning_of_word("<mask>"));
    assert!(!bpe.is_beginning_of_word(""));
}

#[test]
fn batch_encoding_matches_line_by_line() {
    let bpe = encoder(true);
    let lines: Vec<String> = SAMPLES.iter().map(|s| s.to_string()).collect();
    let batch = bpe.encode_batch(&lines).unwrap();
    let single: Vec<String> = lines.iter().map(|l| bpe.encode(l).unwrap()).collect();
    assert_eq!(batch, single);
}

#[test]
fn load_from_vocab_file() {
    let mut file = tempfile::Builder::new().suffix(".vocab").tempfile().unwrap();
    for (piece, score) in vocab_entries(&[]) {
        writeln!(file, "{}\t{}", piece, score).unwrap();
    }

    let bpe = SentencepieceBpe::load(file.path(), true).unwrap();
    assert!(bpe.encode_shapes());
    assert_eq!(bpe.segmenter().unk_id(), 0);
    assert_eq!(bpe.encode("The Cat").unwrap(), "▁The ▁Cat");
}

#[test]
fn encoder_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SentencepieceBpe>();

    let bpe: Arc<dyn Bpe> = Arc::new(encoder(true));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let bpe = Arc::clone(&bpe);
            std::thread::spawn(move || bpe.encode("Hello World").unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "▁Hello ▁World");
    }
}
