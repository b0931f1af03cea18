pub mod logging;

/// Type alias for an immutable string without its capacity
pub type ImStr = Box<str>;
