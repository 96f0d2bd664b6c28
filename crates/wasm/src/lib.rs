//! WASM bindings for rtfmerge
//!
//! This crate provides JavaScript-friendly API for:
//! - Merging RTF templates with data in one call
//! - Parsing a template once and merging it many times
//! - Value formatting and legacy RTF encoding helpers
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { mergeTemplate, RtfTemplate } from 'rtfmerge-wasm';
//!
//! await init();
//!
//! // One-shot merge
//! const { text, protocol } = mergeTemplate(rtf, { to: { name1: "Mueller" } });
//!
//! // Parse once, merge per recipient
//! const template = new RtfTemplate(rtf);
//! for (const recipient of recipients) {
//!   const output = template.merge(recipient, { locale: "de-DE" });
//! }
//! ```

use serde::Serialize;
use template::{MergeConfig, Merger, ParsedTemplate, Protocol, Value};
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Merge result handed to JavaScript
#[derive(Serialize)]
struct MergeResult {
    text: String,
    protocol: Vec<String>,
}

impl MergeResult {
    fn new(text: String, protocol: &Protocol) -> Self {
        Self {
            text,
            protocol: protocol.lines(),
        }
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Read an optional config object; `undefined` and `null` mean defaults
fn read_config(config: JsValue) -> Result<MergeConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(MergeConfig::default());
    }
    let config: MergeConfig = serde_wasm_bindgen::from_value(config)?;
    config.validate().map_err(to_js_error)?;
    Ok(config)
}

/// Merge a template with data
///
/// @param text - RTF template text
/// @param vars - Data object for the fields
/// @param config - Optional `{ locale, utcOffsetMinutes, rowCount, strictMarkers, reportStructure }`
/// @returns `{ text, protocol }`
#[wasm_bindgen(js_name = mergeTemplate)]
pub fn merge_template(text: &str, vars: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let config = read_config(config)?;
    let vars: Value = serde_wasm_bindgen::from_value(vars)?;

    let output = template::merge_template(text, &vars, &config);
    Ok(serde_wasm_bindgen::to_value(&MergeResult::new(
        output.text,
        &output.protocol,
    ))?)
}

/// Apply the legacy RTF escape transform
///
/// @param text - Text to encode
/// @returns Text with non-ASCII characters as `\'hh` escapes
#[wasm_bindgen(js_name = encodeLegacy)]
pub fn encode_legacy(text: &str) -> String {
    rtf_text::encode_legacy(text)
}

/// Format a number for a locale
///
/// @param n - Number to format
/// @param locale - Locale tag (e.g., "de-DE")
/// @param options - Format options (e.g., "style=currency,currency=EUR")
/// @returns Formatted number
#[wasm_bindgen(js_name = formatNumber)]
pub fn format_number(n: f64, locale: &str, options: &str) -> Result<String, JsValue> {
    let locale = rtf_text::Locale::from_tag(locale).map_err(to_js_error)?;
    let options = rtf_text::FormatOptions::parse(options).map_err(to_js_error)?;
    Ok(rtf_text::format_number(n, &locale, &options))
}

/// A parsed RTF template
#[wasm_bindgen]
pub struct RtfTemplate {
    parsed: ParsedTemplate,
}

#[wasm_bindgen]
impl RtfTemplate {
    /// Parse template text
    ///
    /// @param text - RTF template text
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> RtfTemplate {
        RtfTemplate {
            parsed: ParsedTemplate::parse(text),
        }
    }

    /// Parse template text, reporting open tags used in the wrong context
    ///
    /// @param text - RTF template text
    #[wasm_bindgen(js_name = strict)]
    pub fn strict(text: &str) -> RtfTemplate {
        RtfTemplate {
            parsed: ParsedTemplate::parse_with(text, true),
        }
    }

    /// Number of top-level elements (fields and table rows)
    #[wasm_bindgen(getter, js_name = elementCount)]
    pub fn element_count(&self) -> usize {
        self.parsed.elements().len()
    }

    /// Structural problems found while parsing
    ///
    /// @returns Array of messages
    pub fn warnings(&self) -> js_sys::Array {
        self.parsed
            .warnings()
            .iter()
            .map(|w| JsValue::from_str(&w.to_string()))
            .collect()
    }

    /// Elements as plain objects
    ///
    /// @returns Array of `{ type, start, end, name, ... }`
    pub fn elements(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.parsed.elements())?)
    }

    /// Merge with data
    ///
    /// @param vars - Data object for the fields
    /// @param config - Optional merge configuration
    /// @returns `{ text, protocol }`
    pub fn merge(&self, vars: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
        let config = read_config(config)?;
        let vars: Value = serde_wasm_bindgen::from_value(vars)?;

        let mut protocol = Protocol::new();
        let text = Merger::new(&config).merge(&self.parsed, &vars, &mut protocol);
        Ok(serde_wasm_bindgen::to_value(&MergeResult::new(text, &protocol))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_encode_legacy() {
        assert_eq!(encode_legacy("Müller"), "M\\'fcller");
        assert_eq!(encode_legacy("plain"), "plain");
    }

    #[wasm_bindgen_test]
    fn test_format_number() {
        assert_eq!(format_number(1234.5, "en-US", "").unwrap(), "1,234.5");
        assert_eq!(
            format_number(0.25, "de-DE", "style=percent").unwrap(),
            "25\u{a0}%"
        );
    }

    #[wasm_bindgen_test]
    fn test_template_elements() {
        let template = RtfTemplate::new("a :#field:x#: b :#field:y");
        assert_eq!(template.element_count(), 1);
        assert_eq!(template.parsed.warnings().len(), 1);
    }
}
