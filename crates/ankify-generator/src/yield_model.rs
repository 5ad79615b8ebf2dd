//! Yield dial → card density, targets and call sizes
//!
//! Yield 0 asks for broad coverage (18 cards per 1000 words), yield 1 for
//! only the highest-yield material (6 cards per 1000 words). Rounding is
//! half-to-even throughout.

use ankify_extractor::word_count;

/// Cards per 1000 words at yield 1
pub const MIN_DENSITY: f64 = 6.0;

/// Cards per 1000 words at yield 0
pub const MAX_DENSITY: f64 = 18.0;

/// Facts requested per 1000 chunk words in the exhaustive pipeline
pub const FACTS_PER_1000_WORDS: f64 = 110.0;

/// Fewest facts requested from a chunk in the exhaustive pipeline
pub const MIN_FACTS_PER_CHUNK: usize = 40;

/// Clamp a yield level into `[0, 1]`; NaN counts as 0
pub fn clamp_yield(yield_level: f64) -> f64 {
    if yield_level.is_nan() {
        0.0
    } else {
        yield_level.clamp(0.0, 1.0)
    }
}

/// Target cards per 1000 words at `yield_level`
///
/// # Examples
///
/// ```
/// use ankify_generator::yield_model::density_per_1000_words;
///
/// assert_eq!(density_per_1000_words(0.0), 18.0);
/// assert_eq!(density_per_1000_words(1.0), 6.0);
/// assert_eq!(density_per_1000_words(0.5), 12.0);
/// ```
pub fn density_per_1000_words(yield_level: f64) -> f64 {
    let y = clamp_yield(yield_level);
    MIN_DENSITY + (1.0 - y) * (MAX_DENSITY - MIN_DENSITY)
}

fn scaled(words: usize, per_1000: f64) -> usize {
    let value = (words as f64 / 1000.0 * per_1000).round_ties_even();
    if value <= 0.0 {
        0
    } else {
        value as usize
    }
}

/// Card target for a text of `total_words` words, never below `floor`
pub fn estimate_for_words(total_words: usize, floor: usize, yield_level: f64) -> usize {
    floor.max(scaled(total_words, density_per_1000_words(yield_level)))
}

/// Card target for `text`, never below `floor`
pub fn estimate_total_cards(text: &str, floor: usize, yield_level: f64) -> usize {
    estimate_for_words(word_count(text), floor, yield_level)
}

/// Cards to ask for in one balanced call
///
/// Starts from a yield-dependent base (12 at yield 0, 6 at yield 1, kept in
/// `3..=16`), grows by 4 up to 20 when more than 100 cards are still wanted,
/// and never exceeds either remaining bound. Always at least 1.
pub fn choose_call_size(
    yield_level: f64,
    remaining_overall: usize,
    remaining_for_chunk: usize,
) -> usize {
    let y = clamp_yield(yield_level);
    let mut base = ((12.0 - 6.0 * y).round_ties_even() as usize).clamp(3, 16);
    if remaining_overall > 100 {
        base = (base + 4).min(20);
    }
    base.min(remaining_overall).min(remaining_for_chunk).max(1)
}

/// Card target for one chunk in the balanced pipeline; at least 1
pub fn chunk_card_target(chunk_words: usize, yield_level: f64) -> usize {
    scaled(chunk_words, density_per_1000_words(yield_level)).max(1)
}

/// Facts to request from one chunk in the exhaustive pipeline
///
/// The defaults are [`FACTS_PER_1000_WORDS`] and [`MIN_FACTS_PER_CHUNK`].
pub fn facts_for_chunk(chunk_words: usize, per_1000_words: f64, minimum: usize) -> usize {
    minimum.max(scaled(chunk_words, per_1000_words))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_endpoints_and_clamping() {
        assert_eq!(density_per_1000_words(0.0), 18.0);
        assert_eq!(density_per_1000_words(1.0), 6.0);
        assert_eq!(density_per_1000_words(-3.0), 18.0);
        assert_eq!(density_per_1000_words(7.0), 6.0);
        assert_eq!(density_per_1000_words(f64::NAN), 18.0);
    }

    #[test]
    fn test_estimate_total_cards() {
        let text = vec!["word"; 1000].join(" ");
        assert_eq!(estimate_total_cards(&text, 5, 1.0), 6);
        assert_eq!(estimate_total_cards(&text, 40, 1.0), 40);
        assert_eq!(estimate_total_cards(&text, 0, 0.0), 18);
        assert_eq!(estimate_total_cards("", 3, 0.5), 3);
    }

    #[test]
    fn test_estimate_ignores_citations() {
        let text = format!("{} [1] [2] [3]", vec!["word"; 500].join(" "));
        assert_eq!(estimate_total_cards(&text, 0, 1.0), 3);
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        // 250 words at density 18 → 4.5 → 4
        assert_eq!(estimate_for_words(250, 0, 0.0), 4);
        // 750 words at density 6 → 4.5 → 4
        assert_eq!(chunk_card_target(750, 1.0), 4);
        // yield 0.25 → base 10.5 → 10
        assert_eq!(choose_call_size(0.25, 50, 50), 10);
    }

    #[test]
    fn test_choose_call_size_examples() {
        assert_eq!(choose_call_size(0.0, 50, 50), 12);
        assert_eq!(choose_call_size(1.0, 50, 50), 6);
        assert_eq!(choose_call_size(0.0, 500, 500), 16);
        assert_eq!(choose_call_size(1.0, 500, 500), 10);
        assert_eq!(choose_call_size(0.6, 4, 50), 4);
        assert_eq!(choose_call_size(0.6, 50, 2), 2);
        assert_eq!(choose_call_size(0.6, 0, 0), 1);
    }

    #[test]
    fn test_chunk_targets() {
        assert_eq!(chunk_card_target(700, 0.6), 8);
        assert_eq!(chunk_card_target(10, 1.0), 1);
        assert_eq!(chunk_card_target(0, 0.0), 1);
    }

    #[test]
    fn test_facts_for_chunk() {
        let facts = |words| facts_for_chunk(words, FACTS_PER_1000_WORDS, MIN_FACTS_PER_CHUNK);
        assert_eq!(facts(100), 40);
        assert_eq!(facts(700), 77);
        assert_eq!(facts(1000), 110);
        assert_eq!(facts_for_chunk(1000, 50.0, 10), 50);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn density_is_non_increasing(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(density_per_1000_words(lo) >= density_per_1000_words(hi));
        }

        #[test]
        fn density_stays_in_range(y in -10.0f64..10.0) {
            let d = density_per_1000_words(y);
            prop_assert!((MIN_DENSITY..=MAX_DENSITY).contains(&d));
        }

        #[test]
        fn call_size_within_bounds(
            y in 0.0f64..=1.0,
            overall in 1usize..1000,
            chunk in 1usize..1000,
        ) {
            let n = choose_call_size(y, overall, chunk);
            prop_assert!(n >= 1);
            prop_assert!(n <= overall);
            prop_assert!(n <= chunk);
            prop_assert!(n <= 20);
        }

        #[test]
        fn estimate_respects_floor(words in 0usize..100_000, floor in 0usize..500, y in 0.0f64..=1.0) {
            prop_assert!(estimate_for_words(words, floor, y) >= floor);
        }
    }
}
