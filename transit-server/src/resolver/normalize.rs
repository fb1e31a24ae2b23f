//! Text normalization for fuzzy matching.
//!
//! Stop names in the feed are French with accents and abbreviations;
//! queries arrive in whatever shape the rider typed. Both sides are
//! folded to a common form before scoring.

/// Abbreviations expanded during normalization (applied after
/// lowercasing and accent folding).
const ABBREVIATIONS: [(&str, &str); 8] = [
    ("st-", "saint-"),
    ("st ", "saint "),
    ("ste-", "sainte-"),
    ("ste ", "sainte "),
    ("boul.", "boulevard"),
    ("boul ", "boulevard "),
    ("av.", "avenue"),
    ("av ", "avenue "),
];

/// Separators that mark a cross-street query ("Sherbrooke at Berri").
const CROSS_STREET_SEPARATORS: [&str; 5] = [" at ", " et ", " and ", " & ", " @ "];

/// Fold one character to its unaccented lowercase form.
fn fold_char(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' => 'a',
        'ç' => 'c',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' => 'i',
        'ô' | 'ö' => 'o',
        'ù' | 'û' | 'ü' => 'u',
        other => other,
    }
}

/// Normalize text for matching: lowercase, fold accents, expand
/// abbreviations, collapse whitespace.
///
/// # Examples
///
/// ```
/// use transit_server::resolver::normalize_text;
///
/// assert_eq!(
///     normalize_text("St-Michel / Boul. Crémazie"),
///     "saint-michel / boulevard cremazie"
/// );
/// ```
pub fn normalize_text(text: &str) -> String {
    let mut result: String = text
        .trim()
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(fold_char)
        .collect();

    for (abbrev, expanded) in ABBREVIATIONS {
        if result.contains(abbrev) {
            result = result.replace(abbrev, expanded);
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a cross-street query into its two normalized street names, or
/// `None` when the query names a single place.
pub fn parse_cross_street(query: &str) -> Option<(String, String)> {
    let lowered = query.to_lowercase();

    let (left, right) = if let Some((l, r)) = lowered.split_once('/') {
        (l, r)
    } else {
        let sep = CROSS_STREET_SEPARATORS
            .iter()
            .find(|sep| lowered.contains(**sep))?;
        lowered.split_once(*sep)?
    };

    let street1 = normalize_text(left);
    let street2 = normalize_text(right);
    if street1.is_empty() || street2.is_empty() {
        return None;
    }
    Some((street1, street2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_text("  BERRI-UQAM  "), "berri-uqam");
    }

    #[test]
    fn folds_french_accents() {
        assert_eq!(normalize_text("Préfontaine"), "prefontaine");
        assert_eq!(normalize_text("Crémazie"), "cremazie");
        assert_eq!(normalize_text("Côte-des-Neiges"), "cote-des-neiges");
    }

    #[test]
    fn expands_abbreviations() {
        assert_eq!(normalize_text("St-Denis"), "saint-denis");
        assert_eq!(normalize_text("Ste-Catherine"), "sainte-catherine");
        assert_eq!(normalize_text("Boul. Pie-IX"), "boulevard pie-ix");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_text("Mont   Royal"), "mont royal");
    }

    #[test]
    fn cross_street_with_slash() {
        assert_eq!(
            parse_cross_street("Sherbrooke / Saint-Denis"),
            Some(("sherbrooke".to_string(), "saint-denis".to_string()))
        );
    }

    #[test]
    fn cross_street_with_word_separators() {
        assert_eq!(
            parse_cross_street("Sherbrooke at Berri"),
            Some(("sherbrooke".to_string(), "berri".to_string()))
        );
        assert_eq!(
            parse_cross_street("St-Denis et Beaubien"),
            Some(("saint-denis".to_string(), "beaubien".to_string()))
        );
    }

    #[test]
    fn single_place_is_not_cross_street() {
        assert_eq!(parse_cross_street("McGill"), None);
        assert_eq!(parse_cross_street("Sherbrooke /"), None);
    }
}
