/// A raw lexical token, as returned by [`Lexer::next_token`](crate::Lexer::next_token).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `$`
    Dollar,
    /// `,`
    Comma,
    /// `*`
    Asterisk,
    /// A run of ASCII letters
    String(String),
    /// A run of digits, `.` and `-`, read as a decimal
    Number(f64),
    /// End of the sentence
    Eof,
}

impl Token {
    /// Whether this token ends the sentence.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}
