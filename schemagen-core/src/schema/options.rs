//! Parsed column options

/// Token marking a column as optional
pub const NULLABLE: &str = "nullable";
/// Token forcing a reference column to point at `users`
pub const USERS: &str = "users";

/// The `options` string of a column, parsed once.
///
/// Options are separated by `|`, whitespace, or `,` outside rule arguments.
/// `nullable` and `users` are flags; every other token is a literal
/// validation rule (`unique`, `email`, `between:1,10`, ...), kept in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOptions {
    pub nullable: bool,
    pub force_users_reference: bool,
    pub literal_rules: Vec<String>,
}

impl ColumnOptions {
    pub fn parse(raw: &str) -> Self {
        let mut options = Self::default();

        for token in raw.split(|c: char| c == '|' || c.is_whitespace()) {
            // commas belong to rule arguments (`between:1,10`), otherwise they separate options
            if token.contains(':') {
                options.push(token);
            } else {
                token.split(',').for_each(|part| options.push(part));
            }
        }

        options
    }

    fn push(&mut self, token: &str) {
        match token.trim() {
            "" => {}
            NULLABLE => self.nullable = true,
            USERS => self.force_users_reference = true,
            rule => self.literal_rules.push(rule.to_string()),
        }
    }

    /// `:nullable` storage suffix, or nothing
    pub fn nullable_suffix(&self) -> &'static str {
        if self.nullable {
            ":nullable"
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options() {
        assert_eq!(ColumnOptions::parse(""), ColumnOptions::default());
        assert_eq!(ColumnOptions::parse("  | "), ColumnOptions::default());
    }

    #[test]
    fn test_flags_and_rules() {
        let options = ColumnOptions::parse("nullable|unique|users|email");
        assert!(options.nullable);
        assert!(options.force_users_reference);
        assert_eq!(options.literal_rules, vec!["unique", "email"]);
        assert_eq!(options.nullable_suffix(), ":nullable");
    }

    #[test]
    fn test_whitespace_separated_flags() {
        let options = ColumnOptions::parse("users nullable");
        assert!(options.nullable);
        assert!(options.force_users_reference);
        assert!(options.literal_rules.is_empty());
    }

    #[test]
    fn test_rule_arguments_are_not_split() {
        let options = ColumnOptions::parse("between:1,10|exists:users,id");
        assert!(!options.force_users_reference);
        assert_eq!(options.literal_rules, vec!["between:1,10", "exists:users,id"]);
        assert_eq!(options.nullable_suffix(), "");
    }

    #[test]
    fn test_comma_separated_flags() {
        let options = ColumnOptions::parse("nullable,unique");
        assert!(options.nullable);
        assert_eq!(options.literal_rules, vec!["unique"]);

        let options = ColumnOptions::parse("users, nullable|max:5");
        assert!(options.force_users_reference);
        assert!(options.nullable);
        assert_eq!(options.literal_rules, vec!["max:5"]);
    }
}
