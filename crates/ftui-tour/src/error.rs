#![forbid(unsafe_code)]

//! Errors raised while loading tour configuration and scripts.
//!
//! Playback itself never fails: an empty script, an unresolvable step or a
//! missing toplevel simply ends the tour (see
//! [`HaltReason`](crate::controller::HaltReason)). Only the data loading
//! path has a typed error.

/// Why a tour file could not be turned into a [`TourConfig`] or
/// `TourDocument`.
///
/// The file path is not carried here; callers that read from disk attach it
/// (the harness reports `failed to load <path>: ...`).
///
/// [`TourConfig`]: crate::config::TourConfig
#[derive(Debug)]
pub enum LoadError {
    /// The tour file could not be read.
    Io(std::io::Error),
    /// The tour file is not valid TOML, or its tables do not match the
    /// `[config]` / `[[step]]` layout.
    #[cfg(feature = "script-config")]
    Toml(toml::de::Error),
    /// Same as [`LoadError::Toml`] for `.json` tour files.
    #[cfg(feature = "script-config")]
    Json(serde_json::Error),
    /// The file parsed but describes an unplayable tour: an out-of-range
    /// transition delay, a blank style class, a zero popover width, or a
    /// step with an empty widget name. One message per problem.
    Validation(Vec<String>),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read tour file: {e}"),
            #[cfg(feature = "script-config")]
            Self::Toml(e) => write!(f, "malformed tour TOML: {e}"),
            #[cfg(feature = "script-config")]
            Self::Json(e) => write!(f, "malformed tour JSON: {e}"),
            Self::Validation(errors) => {
                write!(f, "invalid tour: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "script-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "script-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn validation_display_joins_messages() {
        let err = LoadError::Validation(vec!["a is bad".into(), "b is worse".into()]);
        assert_eq!(err.to_string(), "invalid tour: a is bad; b is worse");
        assert!(err.source().is_none());
    }

    #[test]
    fn io_error_chains_source() {
        let err: LoadError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().starts_with("cannot read tour file: gone"));
        assert!(err.source().is_some());
    }

    #[cfg(feature = "script-config")]
    #[test]
    fn parse_errors_name_the_format() {
        let toml_err = toml::from_str::<toml::Value>("[[step]\n").unwrap_err();
        let err = LoadError::Toml(toml_err);
        assert!(err.to_string().starts_with("malformed tour TOML: "));
        assert!(err.source().is_some());

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(LoadError::Json(json_err).to_string().starts_with("malformed tour JSON: "));
    }
}
