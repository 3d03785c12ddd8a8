/// Text formatting helpers used by the card renderer
use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens that keep a canonical casing instead of being title-cased
pub const PRESERVE_CASE: &[&str] = &[
    "VFX", "3D", "4D", "3DGS", "4DGS", "AI", "AR", "VR", "XR", "NeRF", "LiDAR",
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?-u:\w)\S*").unwrap());
static LOCATION_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/\s*").unwrap());

/// Capitalize each word, lowercase the rest, except for tokens on the
/// preserve list (matched case-insensitively, emitted in canonical form).
pub fn title_case(input: &str) -> String {
    WORD.replace_all(input, |caps: &regex::Captures| {
        let word = &caps[0];
        let upper = word.to_uppercase();
        if let Some(preserved) = PRESERVE_CASE.iter().find(|p| p.to_uppercase() == upper) {
            return preserved.to_string();
        }
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            return String::new();
        };
        let mut titled: String = first.to_uppercase().collect();
        titled.push_str(&chars.as_str().to_lowercase());
        titled
    })
    .into_owned()
}

/// Host part of a URL for display: no scheme, no leading "www.", no path
pub fn display_host(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.split('/').next().unwrap_or(rest)
}

/// Split a location on `/` (with surrounding whitespace) into segments
pub fn location_segments(location: &str) -> Vec<&str> {
    LOCATION_SEPARATOR.split(location).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("jANE doe"), "Jane Doe");
        assert_eq!(title_case("motion designer"), "Motion Designer");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_preserves_acronyms() {
        assert_eq!(title_case("vfx artist"), "VFX Artist");
        assert_eq!(title_case("nerf and lidar"), "NeRF And LiDAR");
        assert_eq!(title_case("3dgs studio"), "3DGS Studio");
    }

    #[test]
    fn test_title_case_token_includes_trailing_punctuation() {
        // The token "vfx)" is not on the preserve list
        assert_eq!(title_case("(vfx) lab"), "(Vfx) Lab");
        assert_eq!(title_case("vfx, 3dgs"), "Vfx, 3DGS");
    }

    #[test]
    fn test_title_case_keeps_whitespace() {
        assert_eq!(title_case("a  b"), "A  B");
    }

    #[test]
    fn test_display_host() {
        assert_eq!(display_host("https://www.example.com/work/1"), "example.com");
        assert_eq!(display_host("http://studio.io"), "studio.io");
        assert_eq!(display_host("example.org/path"), "example.org");
        assert_eq!(display_host("https://sub.www.site.com"), "sub.www.site.com");
    }

    #[test]
    fn test_location_segments() {
        assert_eq!(location_segments("Tokyo / Berlin"), vec!["Tokyo", "Berlin"]);
        assert_eq!(location_segments("Paris"), vec!["Paris"]);
        assert_eq!(location_segments("A/B /C"), vec!["A", "B", "C"]);
    }
}
