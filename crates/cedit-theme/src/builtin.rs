//! Named preset themes.

use crate::highlight::Theme;

/// Look up a builtin theme by name.
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn builtin_theme(name: &str) -> Option<Theme> {
    match name {
        "terminal" | "default" => Some(Theme::terminal()),
        "mono" => Some(Theme::mono()),
        "dusk" => Some(Theme::dusk()),
        _ => None,
    }
}

/// List all available builtin theme names.
#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &["terminal", "default", "mono", "dusk"]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtins_resolve() {
        for name in builtin_names() {
            assert!(builtin_theme(name).is_some(), "Builtin '{name}' missing");
        }
    }

    #[test]
    fn unknown_returns_none() {
        assert!(builtin_theme("nonexistent").is_none());
    }

    #[test]
    fn default_is_terminal() {
        assert_eq!(builtin_theme("default").unwrap().name, "terminal");
    }

    #[test]
    fn names_match_themes() {
        assert_eq!(builtin_theme("mono").unwrap().name, "mono");
        assert_eq!(builtin_theme("dusk").unwrap().name, "dusk");
    }
}
