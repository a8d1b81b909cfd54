use std::sync::OnceLock;

use log::warn;
use regex::Regex;

/// Marker that follows the lecturer identifier in the export file names.
pub const LECTURER_SUFFIX: &str = "STMT";

/// Name used when the file name does not carry a lecturer identifier.
pub const UNKNOWN_LECTURER: &str = "Unknown";

/// Finds the lecturer identifier in the name of an export file.
///
/// The identifier is a run of ASCII letters right after an underscore and
/// right before `STMT`, such as `JohnDoe` in
/// `KL_Kuesioner_202312_JohnDoeSTMT (1).csv`. The first underscore that
/// starts such a run wins. When the run contains `STMT` more than once, the
/// identifier extends to the last one.
pub fn lecturer_id(file_name: &str) -> Option<&str> {
    let re = lecturer_pattern()?;
    let caps = re.captures(file_name)?;
    caps.get(1).map(|m| m.as_str())
}

fn lecturer_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            let pattern = format!("_([A-Za-z]+){}", LECTURER_SUFFIX);
            match Regex::new(&pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("lecturer_pattern: cannot compile {:?}: {}", pattern, e);
                    None
                }
            }
        })
        .as_ref()
}

/// Inserts a space before every capital letter: `JohnDoe` becomes `John Doe`.
pub fn format_lecturer_name(id: &str) -> String {
    let mut res = String::with_capacity(id.len() + 4);
    for c in id.chars() {
        if c.is_ascii_uppercase() {
            res.push(' ');
        }
        res.push(c);
    }
    res.trim().to_string()
}

/// The lecturer identifier and the readable name, with the default when the
/// file name does not match.
pub fn lecturer_from_file_name(file_name: &str) -> (String, String) {
    match lecturer_id(file_name) {
        Some(id) => (id.to_string(), format_lecturer_name(id)),
        None => (UNKNOWN_LECTURER.to_string(), UNKNOWN_LECTURER.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_identifier() {
        assert_eq!(
            lecturer_id("KL_Kuesioner_202312_JohnDoeSTMT (1).csv"),
            Some("JohnDoe")
        );
        assert_eq!(
            lecturer_id("KL_Kuesioner_202312_MochammadFathurridhoHermantoSTMT (1).csv"),
            Some("MochammadFathurridhoHermanto")
        );
    }

    #[test]
    fn formats_the_name() {
        assert_eq!(format_lecturer_name("JohnDoe"), "John Doe");
        assert_eq!(
            format_lecturer_name("MochammadFathurridhoHermanto"),
            "Mochammad Fathurridho Hermanto"
        );
        assert_eq!(format_lecturer_name("doe"), "doe");
    }

    #[test]
    fn extends_to_the_last_marker() {
        assert_eq!(lecturer_id("x_AbSTMTCdSTMT.csv"), Some("AbSTMTCd"));
    }

    #[test]
    fn needs_a_non_empty_identifier() {
        assert_eq!(lecturer_id("KL_STMT.csv"), None);
        assert_eq!(lecturer_id("KL_STMT_JaneSTMT.csv"), Some("Jane"));
    }

    #[test]
    fn missing_pattern() {
        assert_eq!(lecturer_id("survey.csv"), None);
        assert_eq!(lecturer_id("KL_Kuesioner_202312.csv"), None);
        assert_eq!(lecturer_id("KL_Kuesioner_202312_JohnDoe.csv"), None);
        assert_eq!(
            lecturer_from_file_name("survey.csv"),
            ("Unknown".to_string(), "Unknown".to_string())
        );
    }

    #[test]
    fn file_name_with_digits_before_the_name() {
        // The underscore must directly precede the letters.
        assert_eq!(lecturer_id("KL_2023JohnSTMT.csv"), None);
    }
}
