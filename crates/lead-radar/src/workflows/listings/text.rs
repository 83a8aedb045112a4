use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Case and diacritic insensitive form of a label: `"  Jardim  Paulísta "` -> `"jardim paulista"`.
pub fn fold_label(value: &str) -> String {
    let stripped: String = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
