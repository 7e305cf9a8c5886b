/// Casing helpers shared by the dictionary-driven passes.
///
/// Replacement casing mirrors the matched span: an all-uppercase match keeps
/// the replacement uppercase, a capitalized match capitalizes it, anything
/// else lowercases it.

/// True when the string contains at least one alphabetic character and every
/// alphabetic character is uppercase.
pub fn is_all_uppercase(s: &str) -> bool {
    let mut saw_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            saw_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    saw_alpha
}

/// True when the first character is an uppercase letter.
pub fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Uppercase the first character, lowercase the rest.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Title-case every word: an alphabetic character is uppercased when it
/// follows a non-alphabetic character (space, hyphen, apostrophe), lowercased
/// otherwise.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Choose the casing of `replacement` so that it mirrors the casing of the
/// matched span.
pub fn mirror_case(matched: &str, replacement: &str) -> String {
    if is_all_uppercase(matched) {
        replacement.to_uppercase()
    } else if starts_uppercase(matched) {
        capitalize_first(replacement)
    } else {
        replacement.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_all_uppercase() {
        assert!(is_all_uppercase("ETAT"));
        assert!(is_all_uppercase("AGUILAR-ROMERO"));
        assert!(!is_all_uppercase("Etat"));
        assert!(!is_all_uppercase("etat"));
        assert!(!is_all_uppercase("123"));
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("état"), "État");
        assert_eq!(capitalize_first("ETAT"), "Etat");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("aguilar romero"), "Aguilar Romero");
        assert_eq!(title_case("aguilar-romero"), "Aguilar-Romero");
        assert_eq!(title_case("AGUILAR ROMERO"), "Aguilar Romero");
    }

    #[test]
    fn test_mirror_case() {
        assert_eq!(mirror_case("ETAT", "état"), "ÉTAT");
        assert_eq!(mirror_case("Etat", "état"), "État");
        assert_eq!(mirror_case("etat", "État"), "état");
    }
}
