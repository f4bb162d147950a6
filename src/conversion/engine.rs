//! Conversion orchestrator
//!
//! One request runs through
//! `CheckLimits -> Detect -> Decode -> CheckDepth -> Fingerprint -> CacheLookup -> [Encode -> CacheStore]`.
//! Any failing stage ends the request; nothing is retried and a failed
//! encode never reaches the cache.

use crate::conversion::cache::{ConversionCache, Fingerprint};
use crate::conversion::config::ConversionConfig;
use crate::conversion::limits;
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::format::{InputFormat, OutputFormat};
use crate::formatter::{self, Artifact};
use crate::model::Value;
use crate::parser::{self, Detection, InputSource};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A single conversion request
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub source: InputSource,
    /// Declared input format; detected from the file name or content when absent
    pub input_format: Option<InputFormat>,
    pub output_format: OutputFormat,
}

impl ConversionRequest {
    pub fn new(source: InputSource, output_format: OutputFormat) -> Self {
        Self {
            source,
            input_format: None,
            output_format,
        }
    }

    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.input_format = Some(format);
        self
    }

    /// Build a request from external format labels such as `"yml"` or `"xlsx"`
    pub fn from_labels(
        source: InputSource,
        input_label: Option<&str>,
        output_label: &str,
    ) -> ConversionResult<Self> {
        let output_format = OutputFormat::from_label(output_label)?;
        let input_format = input_label.map(InputFormat::from_label).transpose()?;
        Ok(Self {
            source,
            input_format,
            output_format,
        })
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    pub artifact: Arc<Artifact>,
    pub source_format: InputFormat,
    pub cache_hit: bool,
    pub elapsed: Duration,
}

impl Conversion {
    pub fn bytes(&self) -> &[u8] {
        self.artifact.bytes()
    }

    pub fn content_type(&self) -> &'static str {
        self.artifact.content_type()
    }

    pub fn filename(&self) -> &str {
        self.artifact.filename()
    }
}

/// Runs requests against a shared cache
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConversionConfig,
    cache: Arc<ConversionCache>,
}

impl Converter {
    /// Create a converter with its own cache built from `config.cache_policy`
    pub fn new(config: ConversionConfig) -> ConversionResult<Self> {
        let cache = Arc::new(ConversionCache::new(config.cache_policy));
        Self::with_cache(config, cache)
    }

    /// Create a converter that shares an existing cache
    pub fn with_cache(config: ConversionConfig, cache: Arc<ConversionCache>) -> ConversionResult<Self> {
        config.validate().map_err(|message| {
            ConversionError::conversion(ConversionErrorKind::configuration(message))
        })?;
        Ok(Self { config, cache })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ConversionCache> {
        &self.cache
    }

    /// Convert a request into an artifact, reusing cached output when possible
    pub fn convert(&self, request: &ConversionRequest) -> ConversionResult<Conversion> {
        let start_time = Instant::now();

        let (source_format, value) = self.decode(&request.source, request.input_format)?;

        let fingerprint = Fingerprint::with_settings(
            &value,
            request.output_format,
            &self.config.encoder_key(request.output_format),
        );
        if let Some(artifact) = self.cache.lookup(&fingerprint) {
            return Ok(Conversion {
                artifact,
                source_format,
                cache_hit: true,
                elapsed: start_time.elapsed(),
            });
        }

        let artifact = formatter::encode(&value, request.output_format, &self.config)?;
        let artifact = self.cache.store(fingerprint, artifact);
        info!(
            from = %source_format,
            to = %request.output_format,
            bytes = artifact.len(),
            fingerprint = %fingerprint,
            "conversion stored"
        );

        Ok(Conversion {
            artifact,
            source_format,
            cache_hit: false,
            elapsed: start_time.elapsed(),
        })
    }

    /// Run the limit, detection and decode stages and return the canonical value
    pub fn decode(
        &self,
        source: &InputSource,
        declared: Option<InputFormat>,
    ) -> ConversionResult<(InputFormat, Value)> {
        limits::check_input_size(source, &self.config)?;

        let text = match source.text() {
            Ok(text) => text,
            Err(e) => return Err(not_utf8(source, declared, e)?),
        };

        let detection = parser::detect(text, source.filename(), declared, self.config.max_depth)?;
        let (format, value) = match detection {
            Detection::Sniffed(format, value) => (format, value),
            Detection::Known(format) => (format, parser::decode(text, format, &self.config)?),
        };
        debug!(format = %format, source = %source.description(), "decoded input");

        limits::check_depth(&value, &self.config)?;
        Ok((format, value))
    }
}

/// Error for a payload that is not UTF-8. Fails with the extension lookup's own
/// error when the file name is unsupported.
fn not_utf8(
    source: &InputSource,
    declared: Option<InputFormat>,
    error: std::str::Utf8Error,
) -> ConversionResult<ConversionError> {
    let known = match declared {
        Some(format) => Some(format),
        None => source
            .filename()
            .map(InputFormat::from_file_name)
            .transpose()?
            .flatten(),
    };
    Ok(match known {
        Some(format) => ConversionError::parse(
            format,
            format!("input is not valid UTF-8 ({})", error),
            None,
        ),
        None => ConversionError::unsupported("unknown", "input is not UTF-8 text"),
    })
}

/// Convert inline text with default settings and a private cache
pub fn convert_text(
    text: &str,
    input_label: Option<&str>,
    output_label: &str,
) -> ConversionResult<Conversion> {
    let converter = Converter::new(ConversionConfig::default())?;
    let request = ConversionRequest::from_labels(InputSource::inline(text), input_label, output_label)?;
    converter.convert(&request)
}
