use std::fmt;

/// Errors surfaced while rendering through trellis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrellisError {
    /// A named store was requested but no ancestor provides it.
    MissingStore(String),
    /// A component failed to render.
    Render(String),
}

impl fmt::Display for TrellisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrellisError::MissingStore(name) => write!(
                f,
                "Store \"{}\" is not available! Did you forget to provide it through a StoreProvider?",
                name
            ),
            TrellisError::Render(msg) => write!(f, "Render Error: {}", msg),
        }
    }
}

impl std::error::Error for TrellisError {}

pub type TrellisResult<T> = Result<T, TrellisError>;

/// Reports an error the render loop cannot return to a caller, such as a
/// failure inside a reactive re-render.
pub fn handle_error(err: TrellisError) {
    crate::log::console_error(&format!("Unhandled Trellis Error: {}", err));
}
