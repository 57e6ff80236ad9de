//! Channel payload parsing
//!
//! The payload is everything after the channel label's colon. Parsing is
//! all-or-nothing per line: one malformed token marks the whole channel
//! absent for this attempt, so a corrupt value never yields a half-filled
//! slot and never aborts the rest of the frame.

/// Parse a comma-separated payload into an ordered sequence of values.
///
/// Tokens are trimmed before parsing. Returns `None` if any token fails to
/// parse as a float; the sequence length is whatever the line carried
/// (arity is not validated here).
pub fn parse_channel_payload(payload: &str) -> Option<Vec<f64>> {
    payload
        .split(',')
        .map(|token| token.trim().parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_floats() {
        assert_eq!(
            parse_channel_payload("9.8,0.0,0.0"),
            Some(vec![9.8, 0.0, 0.0])
        );
    }

    #[test]
    fn test_parse_integers_and_negatives() {
        assert_eq!(
            parse_channel_payload("1,-2,3e-1"),
            Some(vec![1.0, -2.0, 0.3])
        );
    }

    #[test]
    fn test_parse_trims_token_whitespace() {
        assert_eq!(
            parse_channel_payload(" 1.5 , 2.5 "),
            Some(vec![1.5, 2.5])
        );
    }

    #[test]
    fn test_single_value() {
        assert_eq!(parse_channel_payload("42"), Some(vec![42.0]));
    }

    #[test]
    fn test_length_follows_source_line() {
        // No arity enforced: seven values on a flex line parse as seven.
        let values = parse_channel_payload("1,2,3,4,5,6,7").unwrap();
        assert_eq!(values.len(), 7);
    }

    #[test]
    fn test_any_bad_token_nulls_the_whole_channel() {
        assert_eq!(parse_channel_payload("1.0,x,3.0"), None);
        assert_eq!(parse_channel_payload("abc"), None);
    }

    #[test]
    fn test_empty_payload_is_malformed() {
        assert_eq!(parse_channel_payload(""), None);
    }

    #[test]
    fn test_trailing_comma_is_malformed() {
        // "1,2," splits into a trailing empty token, which does not parse.
        assert_eq!(parse_channel_payload("1,2,"), None);
    }
}
