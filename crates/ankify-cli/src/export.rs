//! Anki plain-text deck export.
//!
//! Writes the tab-separated format Anki's "Import File" dialog reads, with
//! header lines naming the separator, the notetype column and the deck:
//!
//! ```text
//! #separator:tab
//! #html:true
//! #notetype column:1
//! #deck:Cell Biology
//! Basic	What does ATP stand for?	Adenosine triphosphate
//! Cloze	{{c1::Mitochondria}} produce ATP.	Organelles
//! ```

use ankify_domain::traits::DeckExporter;
use ankify_domain::{Card, DeckArtifact};
use std::convert::Infallible;

/// Exporter producing an importable Anki text file
#[derive(Debug, Clone, Copy, Default)]
pub struct AnkiTextExporter;

impl AnkiTextExporter {
    /// Create a new exporter
    pub fn new() -> Self {
        Self
    }
}

impl DeckExporter for AnkiTextExporter {
    type Error = Infallible;

    fn export(&self, title: &str, cards: &[Card]) -> Result<DeckArtifact, Self::Error> {
        let mut out = String::new();
        out.push_str("#separator:tab\n");
        out.push_str("#html:true\n");
        out.push_str("#notetype column:1\n");
        out.push_str(&format!("#deck:{}\n", header_value(title)));

        for card in cards {
            out.push_str(&format!(
                "{}\t{}\t{}\n",
                card.template().as_str(),
                field(&card.front),
                field(&card.back)
            ));
        }

        Ok(DeckArtifact {
            file_name: file_name(title),
            bytes: out.into_bytes(),
        })
    }
}

/// Escape a field: tabs would split it, raw newlines would end the row
fn field(text: &str) -> String {
    text.replace('\t', " ")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

fn header_value(text: &str) -> String {
    text.replace(['\n', '\r', '\t'], " ")
}

/// Deck file name: spaces and path separators become underscores
pub fn file_name(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "deck".to_string()
    } else {
        stem
    };
    format!("{}.txt", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ankify_domain::CardMode;

    fn export(title: &str, cards: &[Card]) -> (String, String) {
        let artifact = AnkiTextExporter::new().export(title, cards).unwrap();
        (artifact.file_name, String::from_utf8(artifact.bytes).unwrap())
    }

    #[test]
    fn test_headers_and_rows() {
        let cards = vec![
            Card::new("What is ATP?", "Energy currency", CardMode::BasicRecall).unwrap(),
            Card::new("{{c1::Mitochondria}} make ATP", "Organelles", CardMode::FillInBlank).unwrap(),
        ];
        let (name, body) = export("Cell Biology", &cards);

        assert_eq!(name, "Cell_Biology.txt");
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "#separator:tab");
        assert_eq!(lines[1], "#html:true");
        assert_eq!(lines[2], "#notetype column:1");
        assert_eq!(lines[3], "#deck:Cell Biology");
        assert_eq!(lines[4], "Basic\tWhat is ATP?\tEnergy currency");
        assert_eq!(lines[5], "Cloze\t{{c1::Mitochondria}} make ATP\tOrganelles");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_fields_are_escaped() {
        let cards = vec![Card::new("Line one\nLine\ttwo", "A\r\nB", CardMode::Mechanism).unwrap()];
        let (_, body) = export("Deck", &cards);
        assert!(body.ends_with("Basic\tLine one<br>Line two\tA<br>B\n"));
    }

    #[test]
    fn test_card_order_preserved() {
        let cards: Vec<Card> = (0..5)
            .map(|i| Card::new(&format!("Q{}", i), "A", CardMode::BasicRecall).unwrap())
            .collect();
        let (_, body) = export("Deck", &cards);
        let fronts: Vec<&str> = body
            .lines()
            .skip(4)
            .map(|l| l.split('\t').nth(1).unwrap())
            .collect();
        assert_eq!(fronts, vec!["Q0", "Q1", "Q2", "Q3", "Q4"]);
    }

    #[test]
    fn test_empty_deck_has_headers_only() {
        let (_, body) = export("Empty", &[]);
        assert_eq!(body.lines().count(), 4);
    }

    #[test]
    fn test_file_name_sanitized() {
        assert_eq!(file_name("My Deck"), "My_Deck.txt");
        assert_eq!(file_name("../etc/passwd"), ".._etc_passwd.txt");
        assert_eq!(file_name("   "), "deck.txt");
        assert_eq!(file_name(".."), "deck.txt");
    }
}
