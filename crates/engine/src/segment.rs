use serde::{Deserialize, Serialize};

/// Inclusive range of word indices inside one caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRange {
    pub start: usize,
    pub end: usize,
}

impl WordRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

/// A contiguous run of caption words rendered as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSegment {
    pub text: String,
    pub is_highlighted: bool,
    pub start_index: usize,
    pub end_index: usize,
}

/// Splits caption text into words on single spaces.
///
/// Consecutive spaces produce empty words, which keeps the index space identical to
/// the one highlight ranges are authored against.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(' ').collect()
}

/// Partitions caption words into highlighted runs and plain single words.
///
/// The scan walks word indices left to right. An index covered by a highlight emits
/// one segment spanning that whole highlight and jumps past its end; any other
/// index emits a single plain word. The first matching highlight in slice order
/// wins. Ranges are not validated here: out-of-bounds ends are clipped to the
/// caption and overlapping ranges produce whatever the scan yields.
///
/// # Example
/// ```
/// use caption_engine::{WordRange, segment_words};
///
/// let segments = segment_words("The age between 16 to", &[WordRange::new(1, 2)]);
/// let texts: Vec<&str> = segments.iter().map(|segment| segment.text.as_str()).collect();
/// assert_eq!(texts, ["The", "age between", "16", "to"]);
/// assert!(segments[1].is_highlighted);
/// ```
pub fn segment_words(text: &str, highlights: &[WordRange]) -> Vec<WordSegment> {
    let words = split_words(text);
    let mut segments = Vec::with_capacity(words.len());
    let mut cursor = 0usize;

    while cursor < words.len() {
        match highlights.iter().find(|range| range.contains(cursor)) {
            Some(range) => {
                let upper = range.end.saturating_add(1).min(words.len());
                let lower = range.start.min(upper);
                segments.push(WordSegment {
                    text: words[lower..upper].join(" "),
                    is_highlighted: true,
                    start_index: range.start,
                    end_index: range.end,
                });
                cursor = range.end.saturating_add(1);
            }
            None => {
                segments.push(WordSegment {
                    text: words[cursor].to_owned(),
                    is_highlighted: false,
                    start_index: cursor,
                    end_index: cursor,
                });
                cursor += 1;
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::{WordRange, WordSegment, segment_words};

    fn plain(text: &str, index: usize) -> WordSegment {
        WordSegment {
            text: text.to_owned(),
            is_highlighted: false,
            start_index: index,
            end_index: index,
        }
    }

    #[test]
    fn highlighted_range_becomes_one_segment() {
        let segments = segment_words("The age between 16 to", &[WordRange::new(1, 2)]);
        assert_eq!(
            segments,
            vec![
                plain("The", 0),
                WordSegment {
                    text: "age between".to_owned(),
                    is_highlighted: true,
                    start_index: 1,
                    end_index: 2,
                },
                plain("16", 3),
                plain("to", 4),
            ]
        );
    }

    #[test]
    fn no_highlights_yield_one_plain_segment_per_word() {
        let segments = segment_words("yet deciding phases of our", &[]);
        assert_eq!(segments.len(), 5);
        assert!(segments.iter().all(|segment| !segment.is_highlighted));
        assert!(
            segments
                .iter()
                .enumerate()
                .all(|(index, segment)| segment.start_index == index && segment.end_index == index)
        );
    }

    #[test]
    fn well_formed_highlights_cover_every_index_exactly_once() {
        let text = "anxiety, and even moments of depression";
        let highlights = [WordRange::new(0, 0), WordRange::new(3, 5)];
        let segments = segment_words(text, &highlights);

        let mut expected_next = 0;
        for segment in &segments {
            assert_eq!(segment.start_index, expected_next);
            assert!(segment.end_index >= segment.start_index);
            expected_next = segment.end_index + 1;
        }
        assert_eq!(expected_next, 6);
        assert_eq!(segments[2].text, "even");
        assert_eq!(segments[3].text, "moments of depression");
    }

    #[test]
    fn whole_caption_highlight_is_a_single_segment() {
        let segments = segment_words("fail hard,", &[WordRange::new(0, 1)]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "fail hard,");
        assert!(segments[0].is_highlighted);
    }

    #[test]
    fn out_of_bounds_highlight_is_clipped_without_panicking() {
        let segments = segment_words("ever.", &[WordRange::new(0, 4)]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "ever.");
        assert_eq!(segments[0].end_index, 4);
    }

    #[test]
    fn overlapping_highlights_take_the_first_match_and_terminate() {
        let highlights = [WordRange::new(0, 1), WordRange::new(1, 2)];
        let segments = segment_words("a b c d", &highlights);
        let texts: Vec<&str> = segments.iter().map(|segment| segment.text.as_str()).collect();
        assert_eq!(texts, vec!["a b", "b c", "d"]);
    }
}
