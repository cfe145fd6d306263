use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Matcher, Utf32String};

/// Topic suggestions for a search box: case-insensitive substring matches
/// in topic-set order.
pub struct TopicSuggester {
    matcher: Matcher,
}

impl TopicSuggester {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Whitespace-only input yields nothing.
    pub fn suggest<'a>(&mut self, input: &str, topics: &'a [String]) -> Vec<&'a str> {
        if input.trim().is_empty() {
            return Vec::new();
        }
        let atom = Atom::new(
            input,
            CaseMatching::Ignore,
            Normalization::Never,
            AtomKind::Substring,
            false,
        );

        topics
            .iter()
            .filter(|topic| {
                let haystack = Utf32String::from(topic.as_str());
                atom.score(haystack.slice(..), &mut self.matcher).is_some()
            })
            .map(String::as_str)
            .collect()
    }
}

impl Default for TopicSuggester {
    fn default() -> Self {
        Self::new()
    }
}
