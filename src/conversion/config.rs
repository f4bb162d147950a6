//! Configuration options for format conversion

use crate::conversion::cache::CachePolicy;
use crate::format::OutputFormat;

/// CSV field delimiter options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelimiterType {
    /// Comma delimiter (,)
    Comma,
    /// Tab delimiter (\\t)
    Tab,
    /// Pipe delimiter (|)
    Pipe,
}

impl DelimiterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelimiterType::Comma => ",",
            DelimiterType::Tab => "\t",
            DelimiterType::Pipe => "|",
        }
    }

    pub fn as_byte(&self) -> u8 {
        self.as_str().as_bytes()[0]
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "comma" | "," => Ok(DelimiterType::Comma),
            "tab" | "\t" => Ok(DelimiterType::Tab),
            "pipe" | "|" => Ok(DelimiterType::Pipe),
            other => Err(format!(
                "Invalid delimiter '{}'. Use 'comma', 'tab', or 'pipe'",
                other
            )),
        }
    }
}

/// Conversion configuration options
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Largest accepted input payload in bytes
    pub max_input_bytes: usize,
    /// Maximum nesting depth of decoded data
    pub max_depth: Option<usize>,
    /// Delimiter for CSV input and output
    pub csv_delimiter: DelimiterType,
    /// Type CSV cells (numbers, booleans, empty as null) instead of keeping text
    pub infer_csv_types: bool,
    /// Spaces per indentation level in XML output (0-8)
    pub xml_indent: u8,
    /// Wrapper element used when the value has no single root entry
    pub xml_root_name: String,
    /// Retention policy of the conversion cache
    pub cache_policy: CachePolicy,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 100 * 1024 * 1024, // 100MB
            max_depth: Some(1000),
            csv_delimiter: DelimiterType::Comma,
            infer_csv_types: true,
            xml_indent: 4,
            xml_root_name: "root".to_string(),
            cache_policy: CachePolicy::Unbounded,
        }
    }
}

impl ConversionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input size limit
    pub fn with_max_input_bytes(mut self, limit_bytes: usize) -> Self {
        self.max_input_bytes = limit_bytes;
        self
    }

    /// Set maximum nesting depth
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set CSV delimiter
    pub fn with_delimiter(mut self, delimiter: DelimiterType) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Enable/disable CSV cell typing
    pub fn with_csv_type_inference(mut self, enabled: bool) -> Self {
        self.infer_csv_types = enabled;
        self
    }

    /// Set XML indentation
    pub fn with_xml_indent(mut self, size: u8) -> Result<Self, String> {
        if size > 8 {
            return Err("XML indent must be 0-8 spaces".to_string());
        }
        self.xml_indent = size;
        Ok(self)
    }

    /// Set the XML wrapper element name
    pub fn with_xml_root_name(mut self, name: impl Into<String>) -> Self {
        self.xml_root_name = name.into();
        self
    }

    /// Set the cache retention policy
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Settings that change the encoded bytes for `format`
    pub fn encoder_key(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Csv => format!("delimiter={}", self.csv_delimiter.as_str()),
            OutputFormat::Xml => format!("indent={};root={}", self.xml_indent, self.xml_root_name),
            _ => String::new(),
        }
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.xml_indent > 8 {
            return Err("XML indent must be 0-8 spaces".to_string());
        }

        if self.max_input_bytes == 0 {
            return Err("Input size limit must be greater than 0".to_string());
        }

        if let Some(depth) = self.max_depth {
            if depth == 0 {
                return Err("Max depth must be at least 1".to_string());
            }
        }

        if !crate::formatter::xml::is_valid_name(&self.xml_root_name) {
            return Err(format!(
                "'{}' is not a valid XML element name",
                self.xml_root_name
            ));
        }

        if let CachePolicy::Bounded { max_entries: 0 } = self.cache_policy {
            return Err("Bounded cache needs at least one entry".to_string());
        }

        Ok(())
    }
}
