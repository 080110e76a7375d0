//! Flag overrides supplied through the page URL's query string.
//!
//! Two independent syntaxes are recognized:
//!
//! - `?features.dark-mode=` forces `dark-mode` to true, `?features.dark-mode=false` forces it to
//!   false, and any other value is taken as the flag's value (parsed as a float when a number is
//!   expected).
//! - `?features=a,b,c` forces each listed flag to true. This form is additive-boolean only; it
//!   cannot set false or non-boolean values.
//!
//! The dotted form always wins over the list form.
use url::Url;

use crate::{FlagValue, ValueKind};

/// Ambient source of the current page URL.
///
/// Returns an empty string when no URL is available (e.g., outside a browser-like host), which
/// yields no overrides. Implemented for closures:
///
/// ```
/// # use flagwrap::LocationSource;
/// let location = || "https://app.example.com/?features=beta".to_owned();
/// assert_eq!(location.current_url(), "https://app.example.com/?features=beta");
/// ```
pub trait LocationSource {
    /// The current page URL, or an empty string when unavailable.
    fn current_url(&self) -> String;
}

impl<F: Fn() -> String> LocationSource for F {
    fn current_url(&self) -> String {
        self()
    }
}

/// Compute the override for `flag_key` from the ambient page URL.
///
/// Convenience over [`parse_override`] for callers holding a [`LocationSource`].
pub fn override_from(
    location: &impl LocationSource,
    flag_key: &str,
    expected: ValueKind,
) -> Option<FlagValue> {
    parse_override(&location.current_url(), flag_key, expected)
}

/// Compute the override for `flag_key` from `current_url`'s query string.
///
/// Returns `None` when the URL is malformed or carries no override for this flag — never an
/// error. When `expected` is [`ValueKind::Number`], the override is coerced with standard float
/// parsing; unparseable values yield `FlagValue::Number(NAN)`, which callers must treat as
/// present but unusable.
///
/// # Examples
/// ```
/// # use flagwrap::{parse_override, FlagValue, ValueKind};
/// let url = "https://app.example.com/?features.email-frequency=weekly&features=beta";
/// assert_eq!(
///     parse_override(url, "email-frequency", ValueKind::String),
///     Some(FlagValue::String("weekly".to_owned())),
/// );
/// assert_eq!(
///     parse_override(url, "beta", ValueKind::Boolean),
///     Some(FlagValue::Boolean(true)),
/// );
/// assert_eq!(parse_override(url, "new-nav", ValueKind::Boolean), None);
/// ```
pub fn parse_override(current_url: &str, flag_key: &str, expected: ValueKind) -> Option<FlagValue> {
    let url = Url::parse(current_url).ok()?;
    let dotted_key = format!("features.{}", flag_key);

    // First occurrence wins when a parameter is repeated.
    let mut dotted = None;
    let mut list = None;
    for (name, value) in url.query_pairs() {
        if dotted.is_none() && name == dotted_key {
            dotted = Some(value.into_owned());
        } else if list.is_none() && name == "features" {
            list = Some(value.into_owned());
        }
    }

    if let Some(raw) = dotted {
        let value = match raw.as_str() {
            "" => FlagValue::Boolean(true),
            "false" => FlagValue::Boolean(false),
            _ => FlagValue::String(raw),
        };
        return Some(coerce(value, expected));
    }

    if list?.split(',').any(|name| name == flag_key) {
        return Some(FlagValue::Boolean(true));
    }
    None
}

/// Reinterpret an override under the expected kind.
///
/// Only `Number` changes the value: the textual forms of boolean overrides do not parse as
/// floats and therefore coerce to NaN.
fn coerce(value: FlagValue, expected: ValueKind) -> FlagValue {
    if expected != ValueKind::Number {
        return value;
    }
    match value {
        FlagValue::String(raw) => FlagValue::Number(raw.parse().unwrap_or(f64::NAN)),
        FlagValue::Boolean(_) => FlagValue::Number(f64::NAN),
        FlagValue::Number(n) => FlagValue::Number(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_means_true() {
        assert_eq!(
            parse_override("http://x/?features.dark-mode=", "dark-mode", ValueKind::Boolean),
            Some(FlagValue::Boolean(true))
        );
    }

    #[test]
    fn false_value_means_false() {
        assert_eq!(
            parse_override(
                "http://x/?features.dark-mode=false",
                "dark-mode",
                ValueKind::Boolean
            ),
            Some(FlagValue::Boolean(false))
        );
    }

    #[test]
    fn other_values_pass_through_as_strings() {
        assert_eq!(
            parse_override(
                "http://x/?features.email-frequency=weekly",
                "email-frequency",
                ValueKind::String
            ),
            Some(FlagValue::String("weekly".to_owned()))
        );
    }

    #[test]
    fn numeric_expectation_parses_floats() {
        assert_eq!(
            parse_override("http://x/?features.threshold=3.5", "threshold", ValueKind::Number),
            Some(FlagValue::Number(3.5))
        );
    }

    #[test]
    fn unparseable_numbers_yield_nan() {
        let value =
            parse_override("http://x/?features.threshold=weekly", "threshold", ValueKind::Number)
                .unwrap();
        assert!(matches!(value, FlagValue::Number(n) if n.is_nan()));
    }

    #[test]
    fn boolean_overrides_coerce_to_nan_for_numeric_flags() {
        for url in [
            "http://x/?features.threshold=",
            "http://x/?features.threshold=false",
        ] {
            let value = parse_override(url, "threshold", ValueKind::Number).unwrap();
            assert!(matches!(value, FlagValue::Number(n) if n.is_nan()), "{url}");
        }
    }

    #[test]
    fn list_form_enables_listed_flags() {
        let url = "http://x/?features=a,b,c";
        assert_eq!(
            parse_override(url, "b", ValueKind::Boolean),
            Some(FlagValue::Boolean(true))
        );
        assert_eq!(parse_override(url, "z", ValueKind::Boolean), None);
    }

    #[test]
    fn list_form_requires_exact_match() {
        let url = "http://x/?features=show-user-email";
        assert_eq!(parse_override(url, "user-email", ValueKind::Boolean), None);
        assert_eq!(parse_override(url, "show-user", ValueKind::Boolean), None);
    }

    #[test]
    fn no_query_means_no_override() {
        assert_eq!(parse_override("http://x/", "anything", ValueKind::Boolean), None);
    }

    #[test]
    fn malformed_urls_mean_no_override() {
        assert_eq!(parse_override("", "anything", ValueKind::Boolean), None);
        assert_eq!(parse_override("not a url", "anything", ValueKind::Boolean), None);
    }

    #[test]
    fn dotted_form_wins_over_list_form() {
        assert_eq!(
            parse_override("http://x/?features.a=false&features=a", "a", ValueKind::Boolean),
            Some(FlagValue::Boolean(false))
        );
        // Same outcome regardless of parameter order.
        assert_eq!(
            parse_override("http://x/?features=a&features.a=false", "a", ValueKind::Boolean),
            Some(FlagValue::Boolean(false))
        );
    }

    #[test]
    fn ambient_location_is_consulted() {
        let location = || "http://x/?features=beta".to_owned();
        assert_eq!(
            override_from(&location, "beta", ValueKind::Boolean),
            Some(FlagValue::Boolean(true))
        );

        let unavailable = String::new;
        assert_eq!(override_from(&unavailable, "beta", ValueKind::Boolean), None);
    }
}
