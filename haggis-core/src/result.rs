pub type Result<T> = std::result::Result<T, Error>;

/// Every failure names the stage it came from, so a bad log can be
/// told apart from a bad transport string by the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid card token '{0}'")]
    Card(String),
    #[error("line {line}: {message}")]
    Line { line: usize, message: String },
    #[error("line {line}: lookahead: {message}")]
    Lookahead { line: usize, message: String },
    #[error("invalid input: {0}")]
    Input(String),
    #[error("encode: {0}")]
    Encode(String),
    #[error("decode: {0}")]
    Decode(String),
}
