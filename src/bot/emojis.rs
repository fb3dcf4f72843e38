//! Custom emoji ids for implementation languages.
//!
//! These point at emojis uploaded to the application; unknown languages
//! simply render without one.

/// Custom emoji id for a language name, if one is registered.
#[must_use]
pub fn language_emoji(language: &str) -> Option<u64> {
    let id = match language {
        "C" => 1_403_420_439_388_094_575,
        "C++" => 1_403_420_442_244_546_732,
        "C#" => 1_403_420_444_450_619_462,
        "Java" => 1_403_420_452_843_425_873,
        "Kotlin" => 1_403_420_457_432_121_446,
        "Javascript" => 1_403_420_455_196_692_633,
        "PHP" => 1_403_420_459_122_556_948,
        "Python" => 1_403_420_466_017_996_911,
        "Ruby" => 1_403_420_468_773_388_379,
        "Lua" => 1_407_859_842_860_847_215,
        "Elixir" => 1_403_420_448_963_694_602,
        "Go" => 1_403_420_450_922_696_844,
        "Rust" => 1_403_420_503_007_432_795,
        "Dart" => 1_403_420_445_977_350_207,
        _ => return None,
    };
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_has_emoji() {
        assert!(language_emoji("Rust").is_some());
        assert!(language_emoji("C#").is_some());
    }

    #[test]
    fn test_unknown_language_has_none() {
        assert!(language_emoji("COBOL").is_none());
        assert!(language_emoji("rust").is_none());
    }
}
