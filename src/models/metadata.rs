//! Metadata side-channel codec.
//!
//! Object stores expose user metadata as HTTP headers, which do not carry
//! non-ASCII bytes reliably. The program name is therefore stored as base64
//! of its UTF-8 bytes, while the term number and year are plain decimals.
//!
//! | Tag             | Value                          |
//! |-----------------|--------------------------------|
//! | `carrera`       | base64(UTF-8 program name)     |
//! | `cuatri-numero` | term number, decimal           |
//! | `cuatri-anio`   | year, decimal                  |

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::CatalogIdentity;

/// Tag holding the encoded program name.
pub const PROGRAM_TAG: &str = "carrera";
/// Tag holding the term number.
pub const TERM_NUMBER_TAG: &str = "cuatri-numero";
/// Tag holding the year.
pub const YEAR_TAG: &str = "cuatri-anio";

/// All identity tags, in decode order.
pub const IDENTITY_TAGS: [&str; 3] = [PROGRAM_TAG, TERM_NUMBER_TAG, YEAR_TAG];

/// String tags stored alongside an object body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedMetadata(HashMap<String, String>);

impl EncodedMetadata {
    /// Encode an identity into its metadata tags.
    pub fn encode(identity: &CatalogIdentity) -> Self {
        let mut tags = HashMap::with_capacity(IDENTITY_TAGS.len());
        tags.insert(
            PROGRAM_TAG.to_string(),
            STANDARD.encode(identity.program.as_bytes()),
        );
        tags.insert(
            TERM_NUMBER_TAG.to_string(),
            identity.term_number().to_string(),
        );
        tags.insert(YEAR_TAG.to_string(), identity.year().to_string());
        Self(tags)
    }

    /// Decode the identity back out of the tags.
    ///
    /// Fails with `MissingField` on the first absent tag and with
    /// `MalformedField` on the first tag that does not decode.
    pub fn decode(&self) -> Result<CatalogIdentity> {
        let program_b64 = self.require(PROGRAM_TAG)?;
        let number = self.require(TERM_NUMBER_TAG)?;
        let year = self.require(YEAR_TAG)?;

        let bytes = STANDARD
            .decode(program_b64)
            .map_err(|e| AppError::malformed(PROGRAM_TAG, e))?;
        let program =
            String::from_utf8(bytes).map_err(|e| AppError::malformed(PROGRAM_TAG, e))?;
        let number: u32 = number
            .parse()
            .map_err(|e| AppError::malformed(TERM_NUMBER_TAG, e))?;
        let year: u32 = year
            .parse()
            .map_err(|e| AppError::malformed(YEAR_TAG, e))?;

        Ok(CatalogIdentity::new(program, number, year))
    }

    /// Raw value of a tag.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.0.get(tag).map(String::as_str)
    }

    /// Raw value of a tag, or `MissingField` if absent.
    pub fn require(&self, tag: &'static str) -> Result<&str> {
        self.get(tag).ok_or(AppError::MissingField(tag))
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for EncodedMetadata {
    fn from(tags: HashMap<String, String>) -> Self {
        Self(tags)
    }
}
