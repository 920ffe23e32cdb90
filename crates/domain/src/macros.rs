//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Several domain enums (HTTP methods, credential backends) travel as plain
//! strings through configuration files and request builders. This macro
//! provides a single implementation for both Display and FromStr, with
//! case-insensitive parsing and a canonical string representation.
//!
//! # Example
//!
//! ```rust
//! use devconsole_domain::impl_wire_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Backend {
//!     Memory,
//!     File,
//! }
//!
//! impl_wire_conversions!(Backend {
//!     Memory => "memory",
//!     File => "file",
//! });
//!
//! assert_eq!("FILE".parse::<Backend>(), Ok(Backend::File));
//! assert_eq!(Backend::Memory.to_string(), "memory");
//! ```

/// Implements Display and FromStr traits for wire-level enums
///
/// This macro generates:
/// - Display trait: writes the canonical string for each variant
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// The canonical strings must be written in lowercase for parsing to
/// round-trip; Display writes them exactly as given.
#[macro_export]
macro_rules! impl_wire_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                let lowered = s.to_lowercase();
                $(
                    if lowered == $str.to_lowercase() {
                        return ::core::result::Result::Ok(Self::$variant);
                    }
                )+
                ::core::result::Result::Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
