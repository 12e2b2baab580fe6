pub mod registration;

// Re-export registration module for easier access
pub use registration::*;
