//! English inflection for table names
//!
//! Only what table naming needs: pluralizing the last word of a snake_case
//! name and converting identifiers to snake_case.

const UNCOUNTABLE: &[&str] = &[
    "audio",
    "bison",
    "chassis",
    "data",
    "deer",
    "education",
    "equipment",
    "evidence",
    "feedback",
    "firmware",
    "fish",
    "furniture",
    "hardware",
    "information",
    "knowledge",
    "metadata",
    "money",
    "moose",
    "news",
    "offspring",
    "police",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "traffic",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("analysis", "analyses"),
    ("cactus", "cacti"),
    ("child", "children"),
    ("crisis", "crises"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("index", "indices"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("man", "men"),
    ("medium", "media"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("quiz", "quizzes"),
    ("shelf", "shelves"),
    ("thesis", "theses"),
    ("tooth", "teeth"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("woman", "women"),
];

const O_ES: &[&str] = &["echo", "hero", "potato", "tomato", "veto"];

/// Pluralize the last `_`-separated word of `name`.
///
/// Words that already look plural (`users`, `people`) are kept as they are.
pub fn pluralize(name: &str) -> String {
    let (prefix, word) = match name.rfind('_') {
        Some(idx) => name.split_at(idx + 1),
        None => ("", name),
    };

    if word.is_empty() {
        return name.to_string();
    }

    let lower = word.to_ascii_lowercase();
    let plural = pluralize_word(&lower);
    format!("{}{}", prefix, match_case(word, &plural))
}

fn pluralize_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == word) {
        return word.to_string();
    }

    if word.ends_with("ss") || word.ends_with("us") {
        return format!("{}es", word);
    }
    if word.ends_with('s') {
        return word.to_string();
    }
    if word.ends_with('x') || word.ends_with('z') || word.ends_with("ch") || word.ends_with("sh")
    {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{}ies", stem);
        }
    }
    if O_ES.contains(&word) {
        return format!("{}es", word);
    }

    format!("{}s", word)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Carry the casing of `original` over to `inflected`
fn match_case(original: &str, inflected: &str) -> String {
    if original.len() > 1 && original.chars().all(|c| !c.is_ascii_lowercase()) {
        return inflected.to_ascii_uppercase();
    }
    // keep the original characters over the shared stem, e.g. BlogPost -> BlogPosts
    let shared = original
        .chars()
        .zip(inflected.chars())
        .take_while(|(o, i)| o.to_ascii_lowercase() == *i)
        .count();
    original.chars().take(shared).chain(inflected.chars().skip(shared)).collect()
}

/// Convert `BlogPost` / `blog post` / `blog_post` to `blog_post`
pub fn snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for c in name.trim().chars() {
        if c.is_whitespace() {
            if !result.ends_with('_') {
                result.push('_');
            }
        } else if c.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
