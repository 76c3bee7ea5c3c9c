//! Origin and destination extraction.
//!
//! Three strategies are tried in order:
//! 1. an airport code pair joined by a dash ("DEL-BOM");
//! 2. the text lines just before and just after the first line holding a
//!    clock time;
//! 3. the first two capitalized word runs anywhere in the text.
//!
//! Strategy 3 only fills the slots left empty by strategy 2.

use super::patterns::{
    CAPITALIZED_SEQUENCE, COLUMN_HEADER, DURATION, FLIGHT_DESIGNATOR, LAYOVER_KEYWORD, ROUTE_CODES,
    TERMINAL_PLACE, TIME,
};

/// Origin and destination found in a text span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl Route {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

/// Route extractor.
#[derive(Debug, Clone, Default)]
pub struct RouteExtractor {
    /// Lower-cased words that are never city names.
    ignored_words: Vec<String>,
}

impl RouteExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Words (case-insensitive) never taken as city names.
    pub fn with_ignored_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_words
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
        self
    }

    /// Extract origin and destination from a span.
    pub fn extract(&self, text: &str) -> Route {
        if let Some(route) = self.from_codes(text) {
            return route;
        }

        let mut route = self.from_neighbour_lines(text);
        if !route.is_complete() {
            let candidates = self.capitalized_candidates(text);
            if candidates.len() >= 2 {
                if route.from.is_none() {
                    route.from = Some(candidates[0].clone());
                }
                if route.to.is_none() {
                    route.to = Some(candidates[1].clone());
                }
            }
        }

        route
    }

    fn from_codes(&self, text: &str) -> Option<Route> {
        ROUTE_CODES
            .captures(text)
            .map(|caps| Route::new(&caps[1], &caps[2]))
    }

    fn from_neighbour_lines(&self, text: &str) -> Route {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        let mut route = Route::default();
        let Some(idx) = lines.iter().position(|l| TIME.is_match(l)) else {
            return route;
        };

        if idx > 0 && self.is_place_line(lines[idx - 1]) {
            route.from = Some(lines[idx - 1].to_string());
        }
        if let Some(next) = lines.get(idx + 1) {
            if self.is_place_line(next) {
                route.to = Some(next.to_string());
            }
        }

        route
    }

    /// A line that could name a city: starts with a letter and carries no
    /// time, duration, flight number or layout keyword.
    fn is_place_line(&self, line: &str) -> bool {
        line.chars().next().is_some_and(char::is_alphabetic)
            && !TIME.is_match(line)
            && !DURATION.is_match(line)
            && !FLIGHT_DESIGNATOR.is_match(line)
            && !LAYOVER_KEYWORD.is_match(line)
            && !COLUMN_HEADER.is_match(line)
            && !self.is_ignored(line)
    }

    fn is_ignored(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.ignored_words.iter().any(|w| *w == word)
    }

    /// Distinct capitalized word runs, left to right.
    ///
    /// When fewer than two runs exist, the runs are broken into single
    /// words so that "Raipur Kolkata" still yields two candidates.
    fn capitalized_candidates(&self, text: &str) -> Vec<String> {
        let mut runs: Vec<Vec<&str>> = Vec::new();

        for line in text.lines() {
            for m in CAPITALIZED_SEQUENCE.find_iter(line) {
                let mut current: Vec<&str> = Vec::new();
                for word in m.as_str().split_whitespace() {
                    if self.is_ignored(word) {
                        if !current.is_empty() {
                            runs.push(std::mem::take(&mut current));
                        }
                    } else {
                        current.push(word);
                    }
                }
                if !current.is_empty() {
                    runs.push(current);
                }
            }
        }

        let candidates = distinct(runs.iter().map(|run| run.join(" ")));
        if candidates.len() >= 2 {
            return candidates;
        }

        distinct(runs.iter().flatten().map(|word| word.to_string()))
    }
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Origin and destination from a terminal line ("DELHI (T2) MUMBAI (T1)").
pub fn extract_terminal_places(text: &str) -> Option<Route> {
    text.lines().find_map(|line| {
        let places: Vec<&str> = TERMINAL_PLACE
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|p| !p.is_empty())
            .collect();

        match places.as_slice() {
            [from, to, ..] => Some(Route::new(*from, *to)),
            _ => None,
        }
    })
}
