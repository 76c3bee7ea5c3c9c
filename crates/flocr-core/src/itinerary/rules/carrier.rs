//! Carrier name extraction.

use super::patterns::OPERATED_BY;

/// Carrier named on an "Operated by ..." line.
pub fn extract_operated_by(text: &str) -> Option<String> {
    OPERATED_BY
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_operated_by() {
        assert_eq!(
            extract_operated_by("DEL-BOM # 6E 2341\nOperated by IndiGo\n06:00 08:10"),
            Some("IndiGo".to_string())
        );
        assert_eq!(extract_operated_by("operated by: Air India "), Some("Air India".to_string()));
        assert_eq!(extract_operated_by("Nonstop"), None);
    }
}
