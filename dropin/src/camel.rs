//! Attribute-name case conversion.

/// Converts a hyphen-delimited name into camel case.
///
/// The first segment is kept as-is; every later segment has its first
/// character uppercased and the remainder passed through unchanged.
///
/// ```rust
/// use dropin::camel::kebab_to_camel;
///
/// assert_eq!(kebab_to_camel("payment-option-priority"), "paymentOptionPriority");
/// assert_eq!(kebab_to_camel("locale"), "locale");
/// ```
#[must_use]
pub fn kebab_to_camel(input: &str) -> String {
    let mut segments = input.split('-');
    let mut result = String::with_capacity(input.len());
    if let Some(first) = segments.next() {
        result.push_str(first);
    }
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            result.extend(head.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_multiple_segments() {
        assert_eq!(kebab_to_camel("foo-bar-baz"), "fooBarBaz");
    }

    #[test]
    fn test_without_hyphen_is_noop() {
        assert_eq!(kebab_to_camel("foo"), "foo");
        assert_eq!(kebab_to_camel(""), "");
    }

    #[test]
    fn test_first_segment_case_is_preserved() {
        assert_eq!(kebab_to_camel("Paypal-credit"), "PaypalCredit");
    }

    #[test]
    fn test_later_segments_only_touch_first_char() {
        assert_eq!(kebab_to_camel("data-xML-hTTP"), "dataXMLHTTP");
        assert_eq!(kebab_to_camel("paypal-cREDIT"), "paypalCREDIT");
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        assert_eq!(kebab_to_camel("foo--bar"), "fooBar");
        assert_eq!(kebab_to_camel("foo-"), "foo");
    }
}
