use oot_core::core_api::{ConsoleVersion, Engine, SUGGESTED_FILENAME};
use oot_render::{FieldSelection, render_json_full, render_json_selected, render_text};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebInspectOptions {
    pub json_output: bool,
    /// 1-based slot; only meaningful with `fields`.
    pub slot: Option<u8>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

#[wasm_bindgen]
pub fn inspect_sra(save_bytes: &[u8], options: JsValue) -> Result<String, JsValue> {
    let parsed_options = parse_options(options).map_err(|err| err.to_js_value())?;
    inspect_sra_impl(save_bytes, &parsed_options).map_err(|err| err.to_js_value())
}

/// Copies a RAM snapshot into `slot` (1-based) of `save_bytes`, or of a blank
/// save when `save_bytes` is empty, and returns the new file.
#[wasm_bindgen]
pub fn import_ram(
    save_bytes: &[u8],
    ram_bytes: &[u8],
    version: &str,
    slot: u8,
) -> Result<Vec<u8>, JsValue> {
    import_ram_impl(save_bytes, ram_bytes, version, slot).map_err(|err| err.to_js_value())
}

#[wasm_bindgen]
pub fn blank_sra() -> Result<Vec<u8>, JsValue> {
    Engine::new()
        .blank()
        .to_bytes()
        .map_err(|err| WebError::new("export_failed", err.to_string()).to_js_value())
}

#[wasm_bindgen]
pub fn suggested_filename() -> String {
    SUGGESTED_FILENAME.to_string()
}

fn inspect_sra_impl(save_bytes: &[u8], options: &WebInspectOptions) -> Result<String, WebError> {
    if save_bytes.is_empty() {
        return Err(WebError::new(
            "unsupported_file",
            "The uploaded file is empty. Please provide a .sra battery save.",
        ));
    }

    let fields = parse_fields(&options.fields)?;
    let slot = parse_slot(options.slot)?;

    let session = Engine::new()
        .open_bytes(save_bytes)
        .map_err(|err| WebError::new("parse_failed", err.to_string()))?;

    if !options.json_output {
        return render_text(&session).map_err(|err| WebError::new("render_failed", err.to_string()));
    }

    let value = if fields.is_any_selected() {
        render_json_selected(&session, &fields, slot)
    } else {
        render_json_full(&session)
    }
    .map_err(|err| WebError::new("render_failed", err.to_string()))?;

    serde_json::to_string_pretty(&value).map_err(|err| {
        WebError::new(
            "render_failed",
            format!("failed to serialize rendered JSON output: {err}"),
        )
    })
}

fn import_ram_impl(
    save_bytes: &[u8],
    ram_bytes: &[u8],
    version: &str,
    slot: u8,
) -> Result<Vec<u8>, WebError> {
    let version = ConsoleVersion::from_name(version)
        .map_err(|err| WebError::new("invalid_options", err.message))?;
    let Some(slot) = parse_slot(Some(slot))? else {
        return Err(WebError::new("invalid_options", "A target slot is required."));
    };

    let engine = Engine::new();
    let mut session = if save_bytes.is_empty() {
        engine.blank()
    } else {
        engine
            .open_bytes(save_bytes)
            .map_err(|err| WebError::new("parse_failed", err.to_string()))?
    };

    session
        .import_ram(ram_bytes, version, slot)
        .map_err(|err| WebError::new("import_failed", err.to_string()))?;
    session
        .to_bytes()
        .map_err(|err| WebError::new("export_failed", err.to_string()))
}

fn parse_options(options: JsValue) -> Result<WebInspectOptions, WebError> {
    if options.is_null() || options.is_undefined() {
        return Ok(WebInspectOptions::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse web inspect options: {err}"),
        )
    })
}

/// Turns a 1-based slot number into a 0-based index.
fn parse_slot(raw_slot: Option<u8>) -> Result<Option<usize>, WebError> {
    match raw_slot {
        None => Ok(None),
        Some(slot @ 1..=3) => Ok(Some(usize::from(slot) - 1)),
        Some(other) => Err(WebError::new(
            "invalid_options",
            format!("Invalid slot {other}. Expected 1, 2 or 3"),
        )),
    }
}

fn parse_fields(raw_fields: &[String]) -> Result<FieldSelection, WebError> {
    let mut fields = FieldSelection::default();
    for raw in raw_fields {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => fields.name = true,
            "rupees" => fields.rupees = true,
            "deaths" => fields.deaths = true,
            "hearts" => fields.hearts = true,
            "health" => fields.health = true,
            "skulltulas" => fields.skulltulas = true,
            "defense" => fields.defense = true,
            "quest" => fields.quest = true,
            "settings" => fields.settings = true,
            _ => {
                return Err(WebError::new(
                    "invalid_options",
                    format!("Unknown field '{raw}'"),
                ));
            }
        }
    }
    Ok(fields)
}
