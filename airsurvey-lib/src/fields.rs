//! Comma separated field cursor.

/// Yields successive comma separated tokens from a borrowed line while exposing the
/// portion of the line not yet consumed.
///
/// Empty tokens are yielded in place, so a token's position in the iteration is its
/// position in the record.
///
/// # Example
/// ```
/// use airsurvey::fields::Fields;
///
/// let mut fields = Fields::new("$TRM,1000,23.5,");
/// assert_eq!(fields.next(), Some("$TRM"));
/// assert_eq!(fields.remainder(), Some("1000,23.5,"));
/// assert_eq!(fields.next(), Some("1000"));
/// assert_eq!(fields.next(), Some("23.5"));
/// assert_eq!(fields.next(), Some(""));
/// assert_eq!(fields.next(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    rest: Option<&'a str>,
}

impl<'a> Fields<'a> {
    pub const DELIMITER: char = ',';

    #[must_use]
    pub fn new(line: &'a str) -> Self {
        Fields { rest: Some(line) }
    }

    /// The unconsumed part of the line, or `None` if the last token has been yielded,
    /// i.e., there was no delimiter after it.
    #[must_use]
    pub fn remainder(&self) -> Option<&'a str> {
        self.rest
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match rest.split_once(Self::DELIMITER) {
            Some((token, tail)) => {
                self.rest = Some(tail);
                Some(token)
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}
