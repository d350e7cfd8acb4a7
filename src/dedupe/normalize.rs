//! Title normalization.
//!
//! Pure text transforms, no side effects. `normalize_title` folds case,
//! diacritics, punctuation, and part markers into a comparison-friendly
//! form; `strip_version_noise` then removes versioning/mix/live vocabulary
//! to yield the "core" title the equivalence cascade operates on.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Fixed vocabularies
// ---------------------------------------------------------------------------

/// Versioning / mix / live-performance markers stripped from normalized
/// titles. Applied in order, so "remix" must come before "mix".
const VERSION_NOISE: &[&str] = &[
    "album version",
    "single version",
    "radio edit",
    "clean edit",
    "clean version",
    "clean",
    "dirty",
    "explicit version",
    "explicit",
    "instrumental",
    "remix",
    "mix",
    "demo",
    "alternate version",
    "mastered",
    "original mix",
    "live at",
    "live in",
    "live",
    "a cappella",
    "acapella",
    "promo only",
];

/// Targeted substring rewrites applied after case/diacritic folding.
/// An ordered slice, not a map, so the output is deterministic.
const REPLACEMENTS: &[(&str, &str)] = &[
    (" pt ", " part "),
    ("pt.", " part "),
    ("featuring", " feat "),
    ("feat.", " feat "),
    ("\u{2013}", "-"), // en dash
    ("\u{2014}", "-"), // em dash
    ("&", " and "),
    ("official video", ""),
    ("remastered", ""),
    ("single version", ""),
    ("original mix", ""),
];

/// Everything except letters, digits, whitespace, and hyphens.
static RE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s-]").expect("punctuation regex"));

/// Whole-word Roman numerals ii–x. Longest alternatives first.
static RE_ROMAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(viii|iii|vii|ii|iv|vi|ix|v|x)\b").expect("roman regex"));

// ---------------------------------------------------------------------------
// normalize_title
// ---------------------------------------------------------------------------

/// Fold a raw title into its normalized comparison form.
///
/// Steps, in order: lower-case; NFD decomposition + combining-mark removal;
/// fixed substring rewrites; punctuation stripping (letters/digits/spaces/
/// hyphens survive); whole-word Roman numerals ii–x to digits; token-level
/// part-marker folding ("part ii"/"part two" → "part 2"); whitespace
/// collapse.
pub fn normalize_title(raw: &str) -> String {
    let mut s = strip_diacritics(&raw.to_lowercase());

    for (from, to) in REPLACEMENTS {
        if s.contains(from) {
            s = s.replace(from, to);
        }
    }

    s = RE_PUNCTUATION.replace_all(&s, " ").into_owned();

    s = RE_ROMAN
        .replace_all(&s, |caps: &regex::Captures<'_>| roman_to_digits(&caps[0]))
        .into_owned();

    let mut toks: Vec<String> = s.split_whitespace().map(str::to_string).collect();
    for i in 0..toks.len() {
        if toks[i] == "pt" {
            toks[i] = "part".to_string();
        }
        if toks[i] == "part" && i + 1 < toks.len() {
            if toks[i + 1] == "ii" || toks[i + 1] == "two" {
                toks[i + 1] = "2".to_string();
            }
        }
    }

    toks.join(" ")
}

/// Remove the fixed version-noise vocabulary from an already-normalized
/// title, yielding the core title.
pub fn strip_version_noise(normalized: &str) -> String {
    let mut s = normalized.to_string();
    for tag in VERSION_NOISE {
        if s.contains(tag) {
            s = s.replace(tag, " ");
        }
    }
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// NFD-decompose and drop combining marks, so "Sūpērman" → "superman".
fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn roman_to_digits(word: &str) -> &'static str {
    match word {
        "ii" => " 2",
        "iii" => " 3",
        "iv" => " 4",
        "v" => " 5",
        "vi" => " 6",
        "vii" => " 7",
        "viii" => " 8",
        "ix" => " 9",
        "x" => " 10",
        _ => " ",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    // -- normalize_title ----------------------------------------------------

    #[test_case("Sūpērman", "superman" ; "diacritics folded")]
    #[test_case("Súperman", "superman" ; "acute accent folded")]
    #[test_case("LOSE YOURSELF", "lose yourself" ; "case folded")]
    #[test_case("Lose Yourself – Remastered", "lose yourself -" ; "en dash and remastered")]
    #[test_case("Airplanes (feat. Hayley Williams)", "airplanes feat hayley williams" ; "feat dot")]
    #[test_case("Airplanes featuring Hayley Williams", "airplanes feat hayley williams" ; "featuring word")]
    #[test_case("Drum & Bass", "drum and bass" ; "ampersand")]
    #[test_case("Stan Pt. 2", "stan part 2" ; "pt dot to part")]
    #[test_case("Stan pt two", "stan part 2" ; "part two to digit")]
    #[test_case("Symphony No. II", "symphony no 2" ; "roman two")]
    #[test_case("Bitch Please II", "bitch please 2" ; "trailing roman")]
    #[test_case("Chapter VIII", "chapter 8" ; "roman eight")]
    #[test_case("Mockingbird (Official Video)", "mockingbird" ; "promo phrase removed")]
    #[test_case("When I'm Gone", "when i m gone" ; "apostrophe stripped")]
    #[test_case("No-Love", "no-love" ; "hyphen survives")]
    fn normalize_cases(input: &str, want: &str) {
        assert_eq!(normalize_title(input), want);
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_title("  Lose   Yourself  "), "lose yourself");
    }

    #[test]
    fn normalize_is_deterministic() {
        let a = normalize_title("Stan Pt. II (Remastered) & More");
        let b = normalize_title("Stan Pt. II (Remastered) & More");
        assert_eq!(a, b);
    }

    // -- strip_version_noise ------------------------------------------------

    #[test_case("lose yourself album version", "lose yourself" ; "album version")]
    #[test_case("stan drum and bass remix", "stan drum and bass" ; "remix before mix")]
    #[test_case("kill you - clean edit", "kill you -" ; "clean edit")]
    #[test_case("lose yourself - live in detroit 2009", "lose yourself - detroit 2009" ; "live in")]
    #[test_case("stan radio edit", "stan" ; "radio edit")]
    #[test_case("renegade explicit", "renegade" ; "explicit")]
    fn noise_cases(input: &str, want: &str) {
        assert_eq!(strip_version_noise(input), want);
    }

    #[test]
    fn core_of_pure_noise_is_empty() {
        assert_eq!(strip_version_noise("instrumental demo remix"), "");
    }
}
