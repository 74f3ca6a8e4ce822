pub trait StringExtensions {
    /// Parse the leading base-10 integer of a string, ignoring anything after it.
    /// E.g. `"42abc".parse_int_prefix() == Some(42)` and `"abc".parse_int_prefix() == None`.
    fn parse_int_prefix(&self) -> Option<i64>;
}

impl StringExtensions for str {
    fn parse_int_prefix(&self) -> Option<i64> {
        let trimmed = self.trim_start();
        let (sign_len, digits) = match trimmed.as_bytes().first() {
            Some(b'+') | Some(b'-') => (1, &trimmed[1..]),
            _ => (0, trimmed),
        };
        let digits_len = digits.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits_len == 0 {
            return None;
        }
        trimmed[..sign_len + digits_len].parse::<i64>().ok()
    }
}

impl StringExtensions for String {
    fn parse_int_prefix(&self) -> Option<i64> {
        self.as_str().parse_int_prefix()
    }
}

#[test]
fn test_parse_int_prefix() {
    assert_eq!("12".parse_int_prefix(), Some(12));
    assert_eq!("  -3".parse_int_prefix(), Some(-3));
    assert_eq!("+8".parse_int_prefix(), Some(8));
    assert_eq!("10px".parse_int_prefix(), Some(10));
    assert_eq!("1.9".parse_int_prefix(), Some(1));
    assert_eq!("invalid-id".parse_int_prefix(), None);
    assert_eq!("".parse_int_prefix(), None);
    assert_eq!("-".parse_int_prefix(), None);
    assert_eq!("NaN".parse_int_prefix(), None);
    assert_eq!("99999999999999999999".parse_int_prefix(), None);
    assert_eq!("7".to_string().parse_int_prefix(), Some(7));
}
