/// Error types for lattice construction, mesh export and configuration.
use thiserror::Error;

use crate::lattice::Element;

/// Result type used across the core library.
pub type Result<T> = std::result::Result<T, Fd3Error>;

/// Errors produced by the core library.
#[derive(Debug, Error)]
pub enum Fd3Error {
    /// The covering pairs do not describe an acyclic relation.
    #[error("covering relation contains a cycle through element {element}")]
    Cycle {
        /// An element lying on the cycle.
        element: Element,
    },

    /// A covering pair names a label outside the element range.
    #[error("element {element} is out of range for a poset of {size} elements")]
    UnknownElement {
        /// The offending label.
        element: Element,
        /// Number of elements in the poset.
        size: usize,
    },

    /// More elements than `Element` can label.
    #[error("a poset of {size} elements cannot be labelled, at most {max} are supported")]
    TooManyElements {
        /// Requested number of elements.
        size: usize,
        /// Largest supported size.
        max: usize,
    },

    /// The 3D embedding disagrees with the order relation.
    #[error("embedding mismatch: {message}")]
    Embedding {
        /// What did not match.
        message: String,
    },

    /// STL content could not be parsed.
    #[error("invalid STL: {message}")]
    InvalidStl {
        /// Description of what was invalid.
        message: String,
    },

    /// Binary STL ended before the declared triangle count.
    #[error("unexpected end of STL data after {read} of {expected} triangles")]
    UnexpectedEof {
        /// Triangles the header promised.
        expected: u32,
        /// Triangles actually present.
        read: u32,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be decoded.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Fd3Error {
    /// Create an `InvalidStl` error with the given message.
    #[must_use]
    pub fn invalid_stl(message: impl Into<String>) -> Self {
        Self::InvalidStl {
            message: message.into(),
        }
    }

    /// Create an `Embedding` error with the given message.
    #[must_use]
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }
}
