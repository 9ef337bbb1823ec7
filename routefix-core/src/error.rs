//! Error types for the routefix core library.
//!
//! Each error enum carries a stable machine-readable code so the CLI can
//! report failures in structured logs without matching on display strings.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Errors raised while configuring, writing, or reading connection fixtures.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The requested row count was zero.
    #[error("row count must be at least 1 (got 0)")]
    ZeroRows,
    /// Fewer than two locations make a connection without self-loops impossible.
    #[error("location count must be at least 2 (got {got})")]
    TooFewLocations {
        /// The location count supplied by the caller.
        got: usize,
    },
    /// Reading or writing a fixture file failed.
    #[error("I/O failure on `{}`: {source}", path.display())]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`FixtureError`] variants.
    enum FixtureErrorCode for FixtureError {
        /// The requested row count was zero.
        ZeroRows => ZeroRows => "FIXTURE_ZERO_ROWS",
        /// Fewer than two locations were requested.
        TooFewLocations => TooFewLocations { .. } => "FIXTURE_TOO_FEW_LOCATIONS",
        /// Reading or writing a fixture file failed.
        Io => Io { .. } => "FIXTURE_IO",
    }
}

impl FixtureError {
    /// Returns `true` when the error stems from invalid generation parameters
    /// rather than the filesystem.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::ZeroRows | Self::TooFewLocations { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by fastest-route queries.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RouteError {
    /// The named location does not appear in any loaded connection.
    #[error("location `{name}` is not present in the route graph")]
    UnknownLocation {
        /// Location name supplied by the caller.
        name: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`RouteError`] variants.
    enum RouteErrorCode for RouteError {
        /// The named location does not appear in any loaded connection.
        UnknownLocation => UnknownLocation { .. } => "ROUTE_UNKNOWN_LOCATION",
    }
}
