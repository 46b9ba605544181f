use regex::Regex;
use std::sync::OnceLock;

use super::constant::SLUG_MAX_LENGTH;

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"))
}

/// 由标题生成 URL 安全的 slug
///
/// 小写化，德语变音转写，其余非字母数字字符合并为 `-`，最长 96 个字符。
pub fn slugify(title: &str) -> String {
    let mut transliterated = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        match c {
            'ä' => transliterated.push_str("ae"),
            'ö' => transliterated.push_str("oe"),
            'ü' => transliterated.push_str("ue"),
            'ß' => transliterated.push_str("ss"),
            _ => transliterated.push(c),
        }
    }

    let slug = separator_pattern().replace_all(&transliterated, "-");
    let slug = slug.trim_matches('-');
    let truncated = if slug.len() > SLUG_MAX_LENGTH {
        &slug[..SLUG_MAX_LENGTH]
    } else {
        slug
    };
    truncated.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Spaghetti Carbonara"), "spaghetti-carbonara");
        assert_eq!(slugify("  Omas  Apfelkuchen!  "), "omas-apfelkuchen");
    }

    #[test]
    fn test_slugify_umlauts() {
        assert_eq!(slugify("Käsespätzle für Große"), "kaesespaetzle-fuer-grosse");
    }

    #[test]
    fn test_slugify_truncates() {
        let title = "a ".repeat(100);
        let slug = slugify(&title);
        assert!(slug.len() <= SLUG_MAX_LENGTH);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("!!!"), "");
    }
}
