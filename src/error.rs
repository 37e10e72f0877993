use thiserror::Error;

/// Errors that callers are expected to handle.
///
/// Limit and continuity violations are not errors; see [`crate::CheckReturn`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolyError {
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEnd(&'static str),

    #[error("invalid {what} `{token}`")]
    InvalidToken { what: &'static str, token: String },

    #[error("unexpected trailing input `{0}`")]
    TrailingInput(String),

    #[error("chunk {index} has {found} dofs but the trajectory has {expected}")]
    DofMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("no discretized step of {step} found to the right of t = {tcur}")]
    NoDiscretizedStep { step: f64, tcur: f64 },
}

pub type Result<T> = std::result::Result<T, PolyError>;

/// Pulls the next token and parses it, naming `what` in the error.
pub(crate) fn next_token<'a, I, T>(tokens: &mut I, what: &'static str) -> Result<T>
where
    I: Iterator<Item = &'a str>,
    T: std::str::FromStr,
{
    let token = tokens.next().ok_or(PolyError::UnexpectedEnd(what))?;
    token.parse().map_err(|_| PolyError::InvalidToken {
        what,
        token: token.to_string(),
    })
}

/// Fails if anything but whitespace is left.
pub(crate) fn expect_end<'a, I>(tokens: &mut I) -> Result<()>
where
    I: Iterator<Item = &'a str>,
{
    match tokens.next() {
        Some(token) => Err(PolyError::TrailingInput(token.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_token_parses_and_reports() {
        let mut tokens = "3 x".split_whitespace();
        let n: usize = next_token(&mut tokens, "degree").unwrap();
        assert_eq!(3, n);
        let err = next_token::<_, f64>(&mut tokens, "coefficient").unwrap_err();
        assert_eq!(
            PolyError::InvalidToken {
                what: "coefficient",
                token: "x".to_string(),
            },
            err
        );
        let err = next_token::<_, f64>(&mut tokens, "coefficient").unwrap_err();
        assert_eq!("unexpected end of input while reading coefficient", err.to_string());
    }

    #[test]
    fn expect_end_rejects_leftovers() {
        let mut tokens = "1.5".split_whitespace();
        assert!(expect_end(&mut tokens).is_err());
        assert!(expect_end(&mut tokens).is_ok());
    }
}
