pub type CamlinkResult<T> = Result<T, CamlinkError>;

#[derive(thiserror::Error, Debug)]
pub enum CamlinkError {
    #[error("selection error: {0}")]
    Selection(String),

    #[error("attribute error: {0}")]
    Attribute(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CamlinkError {
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    pub fn attribute(msg: impl Into<String>) -> Self {
        Self::Attribute(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
