//! WASM bindings for the hand receipt generator.
//!
//! Tables cross the boundary as `{ headers: string[], rows: any[][] }`;
//! receipts come back as plain objects with the amount as a string.

use wasm_bindgen::prelude::*;

use rasid_core::ingest::{CsvSource, TableSource};
use rasid_core::{
    rupees_in_words, BatchProcessor, CellValue, HtmlRenderer, RasidConfig, RawTable,
    ReceiptRecord, WordsCache,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Spell the whole-rupee part of an amount, e.g. 1500.5 -> "One Thousand Five Hundred".
#[wasm_bindgen]
pub fn amount_to_words(amount: f64) -> Result<String, JsValue> {
    CellValue::Float(amount)
        .to_decimal()
        .and_then(rupees_in_words)
        .ok_or_else(|| JsValue::from_str(&format!("invalid amount: {}", amount)))
}

/// Validate and normalize a table, returning the receipts in row order.
#[wasm_bindgen]
pub fn process_table(table: JsValue) -> Result<JsValue, JsValue> {
    ReceiptGenerator::new().process(table)
}

/// Render a table straight to printable HTML.
#[wasm_bindgen]
pub fn render_html(table: JsValue) -> Result<String, JsValue> {
    ReceiptGenerator::new().render_html(table)
}

/// Receipt generator class holding a configuration and a words cache.
#[wasm_bindgen]
pub struct ReceiptGenerator {
    config: RasidConfig,
    cache: WordsCache,
}

#[wasm_bindgen]
impl ReceiptGenerator {
    /// Create a generator with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_config(RasidConfig::default())
    }

    /// Create a generator from a JSON configuration (missing keys take defaults).
    #[wasm_bindgen]
    pub fn from_json(config: &str) -> Result<ReceiptGenerator, JsValue> {
        let config: RasidConfig = serde_json::from_str(config).map_err(to_js_error)?;
        Ok(Self::with_config(config))
    }

    /// Current configuration as JSON.
    #[wasm_bindgen]
    pub fn config_json(&self) -> Result<String, JsValue> {
        serde_json::to_string_pretty(&self.config).map_err(to_js_error)
    }

    /// Change the row cap.
    #[wasm_bindgen]
    pub fn set_max_rows(&mut self, max_rows: usize) {
        self.config.batch.max_rows = max_rows;
    }

    /// Validate and normalize a table.
    #[wasm_bindgen]
    pub fn process(&mut self, table: JsValue) -> Result<JsValue, JsValue> {
        let receipts = self.receipts(table)?;
        serde_wasm_bindgen::to_value(&receipts).map_err(to_js_error)
    }

    /// Validate and normalize CSV text (first line is the header row).
    #[wasm_bindgen]
    pub fn process_csv(&mut self, text: &str) -> Result<JsValue, JsValue> {
        let table = CsvSource::from_reader(text.as_bytes())
            .read_table(self.config.batch.max_rows)
            .map_err(to_js_error)?;
        let receipts = generate(&table, &self.config, &mut self.cache).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&receipts).map_err(to_js_error)
    }

    /// Render a table to printable HTML, one receipt per page.
    #[wasm_bindgen]
    pub fn render_html(&mut self, table: JsValue) -> Result<String, JsValue> {
        let receipts = self.receipts(table)?;
        HtmlRenderer::new(self.config.render.clone())
            .render_string(&receipts)
            .map_err(to_js_error)
    }

    /// Number of amounts currently cached.
    #[wasm_bindgen(getter)]
    pub fn cached_words(&self) -> usize {
        self.cache.len()
    }
}

impl ReceiptGenerator {
    fn with_config(config: RasidConfig) -> Self {
        let cache = WordsCache::new(config.batch.words_cache_size);
        Self { config, cache }
    }

    fn receipts(&mut self, table: JsValue) -> Result<Vec<ReceiptRecord>, JsValue> {
        let table: RawTable = serde_wasm_bindgen::from_value(table).map_err(to_js_error)?;
        generate(&table, &self.config, &mut self.cache).map_err(to_js_error)
    }
}

impl Default for ReceiptGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn generate(
    table: &RawTable,
    config: &RasidConfig,
    cache: &mut WordsCache,
) -> rasid_core::Result<Vec<ReceiptRecord>> {
    let batch = BatchProcessor::new(config.batch.clone()).process_with_cache(table, cache)?;
    Ok(batch.into_receipts())
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
