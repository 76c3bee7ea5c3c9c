//! OCR text cleanup applied before parsing.

/// Known OCR misreads and their corrections.
pub const OCR_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("Olh", "01h"),
    ("0lh", "01h"),
    ("O1h", "01h"),
    ("(12)", "(T2)"),
];

/// Cleans raw OCR text: fixes known misreads, unifies line endings, trims
/// every line and drops blank lines.
///
/// Normalizing already-normalized text returns it unchanged.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    substitutions: Vec<(String, String)>,
}

impl TextNormalizer {
    /// Create a normalizer with the built-in substitution table.
    pub fn new() -> Self {
        Self {
            substitutions: OCR_SUBSTITUTIONS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Append an extra literal substitution.
    pub fn with_substitution(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        if !from.is_empty() {
            self.substitutions.push((from, to.into()));
        }
        self
    }

    /// Append several literal substitutions.
    pub fn with_substitutions<I>(self, substitutions: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        substitutions
            .into_iter()
            .fold(self, |normalizer, (from, to)| normalizer.with_substitution(from, to))
    }

    /// Normalize raw OCR text.
    pub fn normalize(&self, raw: &str) -> String {
        let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");

        for (from, to) in &self.substitutions {
            if text.contains(from.as_str()) {
                text = text.replace(from.as_str(), to);
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize text with the built-in substitution table.
pub fn normalize_text(raw: &str) -> String {
    TextNormalizer::new().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_misreads() {
        assert_eq!(normalize_text("Olh 25m"), "01h 25m");
        assert_eq!(normalize_text("DELHI (12)"), "DELHI (T2)");
    }

    #[test]
    fn test_lines_trimmed() {
        assert_eq!(
            normalize_text("  6E 2341 \r\n\r\n\tRaipur\r16:55  18:20  \n\n"),
            "6E 2341\nRaipur\n16:55  18:20"
        );
    }

    #[test]
    fn test_idempotent() {
        let raw = " DEL-BOM # 6E 2341\n\nOperated by IndiGo \r\n 06:00 08:10\nOlh 10m\nDELHI (12) MUMBAI (T1)\n";
        let once = normalize_text(raw);
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_custom_substitution() {
        let normalizer = TextNormalizer::new()
            .with_substitution("Kolkota", "Kolkata")
            .with_substitution("", "ignored");
        assert_eq!(normalizer.normalize("Raipur Kolkota"), "Raipur Kolkata");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\t\n"), "");
    }
}
