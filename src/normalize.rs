// Name normalization: reduce a raw name string to its comparison form.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Generational and honorific suffix tokens dropped during normalization.
const SUFFIX_TOKENS: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v", "phd", "md"];

/// Reduce a raw name to its canonical comparison form.
///
/// Accents are stripped via NFKD decomposition, the string is lowercased,
/// punctuation becomes whitespace, suffix tokens ("jr", "iii", ...) are
/// dropped, and whitespace runs collapse to single spaces. Two names that
/// normalize equal are treated as the same identity candidate.
///
/// Total and idempotent: never fails, and `normalize(normalize(x)) ==
/// normalize(x)` for all inputs.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // NFKD-decompose, drop combining marks, lowercase.
    let stripped: String = raw
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    // Punctuation to spaces so suffix tokens stand alone ("jr." -> "jr").
    let spaced: String = stripped
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    // Drop suffix tokens and collapse whitespace in a single pass.
    let mut out = String::with_capacity(spaced.len());
    for token in spaced.split_whitespace() {
        if SUFFIX_TOKENS.contains(&token) {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  LeBron   James "), "lebron james");
    }

    #[test]
    fn strips_accents() {
        assert_eq!(normalize("José Alvarado"), "jose alvarado");
        assert_eq!(normalize("José Alvarado"), normalize("Jose Alvarado"));
        assert_eq!(normalize("Dāvis Bertāns"), "davis bertans");
    }

    #[test]
    fn strips_suffix_tokens() {
        assert_eq!(normalize("Tim Hardaway Jr."), normalize("Tim Hardaway"));
        assert_eq!(normalize("Gary Payton II"), "gary payton");
        assert_eq!(normalize("Wendell Moore Jr"), "wendell moore");
    }

    #[test]
    fn suffix_tokens_only_match_standalone() {
        // "jr" embedded in a longer token is not a suffix.
        assert_eq!(normalize("Jrue Holiday"), "jrue holiday");
        assert_eq!(normalize("Vit Krejci"), "vit krejci");
    }

    #[test]
    fn punctuation_becomes_whitespace() {
        assert_eq!(normalize("Shaquille O'Neal"), "shaquille o neal");
        assert_eq!(normalize("A.C. Green"), "a c green");
        assert_eq!(normalize("Smith-Jones, Karl"), "smith jones karl");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("..."), "");
    }

    #[test]
    fn idempotent() {
        for raw in [
            "José Alvarado",
            "Tim Hardaway Jr.",
            "  LeBron   James ",
            "Smith-Jones, Karl",
            "",
            "already normalized",
            "Gary Payton II",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn digits_are_preserved() {
        assert_eq!(normalize("Luka D0ncic"), "luka d0ncic");
    }
}
