//! One interface over the three converters, and the paste path that guesses
//! the format of clipboard text.

use thiserror::Error;

use crate::cml::{CmlConverter, CmlError};
use crate::json::{JsonConverter, JsonError};
use crate::model::Model;
use crate::sdf::{SdFileConverter, SdfError};

/// Text in, [`Model`] out, and back.
pub trait Converter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn import(&self, text: &str) -> Result<Model, Self::Error>;
    fn export(&self, model: &Model) -> Result<String, Self::Error>;
}

impl Converter for CmlConverter {
    type Error = CmlError;

    fn import(&self, text: &str) -> Result<Model, CmlError> {
        CmlConverter::import(self, text)
    }

    fn export(&self, model: &Model) -> Result<String, CmlError> {
        CmlConverter::export(self, model)
    }
}

impl Converter for SdFileConverter {
    type Error = SdfError;

    fn import(&self, text: &str) -> Result<Model, SdfError> {
        SdFileConverter::import(self, text)
    }

    fn export(&self, model: &Model) -> Result<String, SdfError> {
        SdFileConverter::export(self, model)
    }
}

impl Converter for JsonConverter {
    type Error = JsonError;

    fn import(&self, text: &str) -> Result<Model, JsonError> {
        JsonConverter::import(self, text)
    }

    fn export(&self, model: &Model) -> Result<String, JsonError> {
        JsonConverter::export(self, model)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Cml,
    Sdf,
    Json,
}

impl Format {
    /// Guess from the first non-blank character: `<` is CML, `{` is JSON,
    /// anything else is treated as an SD file.
    pub fn sniff(text: &str) -> Format {
        match text.trim_start().chars().next() {
            Some('<') => Format::Cml,
            Some('{') => Format::Json,
            _ => Format::Sdf,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "cml" | "xml" => Some(Format::Cml),
            "sdf" | "sd" | "mol" => Some(Format::Sdf),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Cml => "cml",
            Format::Sdf => "sdf",
            Format::Json => "json",
        }
    }
}

/// Outcome of one import attempt. Exactly one of `model` and `diagnostic`
/// is set.
#[derive(Debug, Clone)]
pub struct ImportAttempt {
    pub format: Format,
    pub model: Option<Model>,
    pub diagnostic: Option<String>,
}

impl ImportAttempt {
    fn from_result<E: std::fmt::Display>(format: Format, result: Result<Model, E>) -> Self {
        match result {
            Ok(model) => Self {
                format,
                model: Some(model),
                diagnostic: None,
            },
            Err(err) => Self {
                format,
                model: None,
                diagnostic: Some(err.to_string()),
            },
        }
    }

    pub fn succeeded(&self) -> bool {
        self.model.is_some()
    }
}

pub fn try_import_cml(text: &str) -> ImportAttempt {
    ImportAttempt::from_result(Format::Cml, CmlConverter::new().import(text))
}

/// An SD file that yields no molecule at all counts as a failure; the
/// recorded errors become the diagnostic.
pub fn try_import_sdf(text: &str) -> ImportAttempt {
    let result = SdFileConverter::new().and_then(|sdf| sdf.import(text));
    let mut attempt = ImportAttempt::from_result(Format::Sdf, result);
    let empty = attempt
        .model
        .as_ref()
        .is_some_and(|m| m.molecule_count() == 0);
    if let Some(model) = attempt.model.take().filter(|_| empty) {
        let diagnostic = if model.has_errors() {
            model.general_errors().join("; ")
        } else {
            "no molecules found".to_string()
        };
        attempt.diagnostic = Some(diagnostic);
    }
    attempt
}

#[derive(Debug, Error)]
#[error("text is neither CML ({cml}) nor SDF ({sdf})")]
pub struct FallbackError {
    pub cml: String,
    pub sdf: String,
}

/// Paste handling: try CML, and fall back to SDF when that fails.
pub fn import_with_fallback(text: &str) -> Result<(Format, Model), FallbackError> {
    let cml = try_import_cml(text);
    if let Some(model) = cml.model {
        return Ok((Format::Cml, model));
    }
    let cml_diagnostic = cml.diagnostic.unwrap_or_default();
    log::debug!("paste is not CML ({cml_diagnostic}); trying SDF");

    let sdf = try_import_sdf(text);
    match sdf.model {
        Some(model) => Ok((Format::Sdf, model)),
        None => Err(FallbackError {
            cml: cml_diagnostic,
            sdf: sdf.diagnostic.unwrap_or_default(),
        }),
    }
}
