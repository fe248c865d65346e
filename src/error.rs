//! Error types for collation data construction and settings resolution.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the data builder, data queries and settings resolution.
///
/// Iterating over text never fails: every code point has a weight.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The mapping of a code point needs the iterator (expansion, context, Hangul)
    #[error("mapping for U+{0:04X} does not resolve to exactly one collation element")]
    NotSingleCe(u32),

    /// An expansion is longer than a CE32 length field can express
    #[error("expansion of {0} collation elements exceeds the maximum of 31")]
    ExpansionTooLong(usize),

    /// An arena grew beyond what a CE32 index field can address
    #[error("arena index {0:#x} exceeds the maximum of 0x7ffff")]
    IndexOverflow(usize),

    /// The requested reordering needs more primary lead bytes than exist
    #[error("reordering needs more primary lead bytes than are available")]
    ReorderOverflow,

    /// Duplicate or misplaced reorder codes
    #[error("invalid reorder codes: {0}")]
    InvalidReorderCodes(String),

    /// Not a Unicode code point
    #[error("invalid code point: {0:#x}")]
    InvalidCodePoint(u32),

    /// A mapping that cannot be encoded
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    /// Malformed script/reorder-group table
    #[error("invalid reorder groups: {0}")]
    InvalidGroups(String),

    /// The data violates a runtime invariant
    #[error("internal data error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid mapping error
    pub fn invalid_mapping(msg: impl Into<String>) -> Self {
        Error::InvalidMapping(msg.into())
    }

    /// Create an invalid reorder codes error
    pub fn invalid_reorder_codes(msg: impl Into<String>) -> Self {
        Error::InvalidReorderCodes(msg.into())
    }

    /// Create an invalid groups error
    pub fn invalid_groups(msg: impl Into<String>) -> Self {
        Error::InvalidGroups(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}
