use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    Json(String),
    Xml(String),
    Feed(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl From<quick_xml::DeError> for Error {
    fn from(e: quick_xml::DeError) -> Self {
        Self::Xml(e.to_string())
    }
}

impl Error {
    pub fn feed_error(msg: &str) -> Self {
        Self::Feed(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON Parse Error: {msg}"),
            Self::Xml(msg) => write!(f, "XML Parse Error: {msg}"),
            Self::Feed(msg) => write!(f, "Feed Structure Error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
