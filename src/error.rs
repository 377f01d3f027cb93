pub type ThumbforgeResult<T> = Result<T, ThumbforgeError>;

#[derive(thiserror::Error, Debug)]
pub enum ThumbforgeError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbforgeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ThumbforgeError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ThumbforgeError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            ThumbforgeError::storage("x")
                .to_string()
                .contains("storage error:")
        );
        assert!(
            ThumbforgeError::not_found("x")
                .to_string()
                .contains("not found:")
        );
        assert!(
            ThumbforgeError::generation("x")
                .to_string()
                .contains("generation error:")
        );
        assert!(
            ThumbforgeError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ThumbforgeError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
