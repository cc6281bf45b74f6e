//! Station record types shared across the registry

use serde::{Deserialize, Serialize};

use crate::constants::schema;

/// One live record per distinct station identity.
///
/// `station_url` is the unique key. `last_seen` is only ever advanced by an
/// accepted registration. Optional fields are whatever the station chose to
/// report; the store clamps them to the schema column widths on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub station_url: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub station_type: Option<String>,
    pub station_model: Option<String>,
    pub weewx_info: Option<String>,
    pub python_info: Option<String>,
    pub platform_info: Option<String>,
    pub config_path: Option<String>,
    pub entry_path: Option<String>,
    /// Network address of the reporting client (IPv4 or IPv6 textual form)
    pub last_addr: String,
    /// Unix epoch seconds of the most recent accepted registration
    pub last_seen: i64,
}

impl StationRecord {
    /// Read one of the queryable info fields by name.
    ///
    /// Missing values surface as `None`; the stats engine buckets those
    /// under "N/A".
    pub fn info_value(&self, field: crate::consolidate::InfoField) -> Option<&str> {
        use crate::consolidate::InfoField;
        match field {
            InfoField::StationType => self.station_type.as_deref(),
            InfoField::StationModel => self.station_model.as_deref(),
            InfoField::WeewxInfo => self.weewx_info.as_deref(),
            InfoField::PythonInfo => self.python_info.as_deref(),
            InfoField::PlatformInfo => self.platform_info.as_deref(),
            InfoField::ConfigPath => self.config_path.as_deref(),
            InfoField::EntryPath => self.entry_path.as_deref(),
        }
    }

    /// Clamp every string field to its schema column width.
    ///
    /// Mirrors what the relational schema would do on insert, so the memory
    /// store behaves like the real one. Truncation is on a char boundary.
    pub fn clamp_to_schema(mut self) -> Self {
        clamp(&mut self.station_url, schema::STATION_URL);
        clamp_opt(&mut self.description, schema::DESCRIPTION);
        clamp_opt(&mut self.station_type, schema::STATION_TYPE);
        clamp_opt(&mut self.station_model, schema::STATION_MODEL);
        clamp_opt(&mut self.weewx_info, schema::WEEWX_INFO);
        clamp_opt(&mut self.python_info, schema::PYTHON_INFO);
        clamp_opt(&mut self.platform_info, schema::PLATFORM_INFO);
        clamp_opt(&mut self.config_path, schema::CONFIG_PATH);
        clamp_opt(&mut self.entry_path, schema::ENTRY_PATH);
        clamp(&mut self.last_addr, schema::LAST_ADDR);
        self
    }
}

fn clamp(s: &mut String, max_chars: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
}

fn clamp_opt(s: &mut Option<String>, max_chars: usize) {
    if let Some(s) = s.as_mut() {
        clamp(s, max_chars);
    }
}

/// Raw registration payload before validation.
///
/// Every field is an opaque string exactly as received, whether it arrived
/// as v1 query parameters or a v2 JSON body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRegistration {
    pub station_url: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub station_type: Option<String>,
    pub station_model: Option<String>,
    pub weewx_info: Option<String>,
    pub python_info: Option<String>,
    pub platform_info: Option<String>,
    pub config_path: Option<String>,
    pub entry_path: Option<String>,
}

impl RawRegistration {
    /// Build from decoded query-string pairs (v1 surface). Unknown keys are
    /// ignored, matching the original registry's column intersection.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            raw.set_field(key.as_ref(), value.into());
        }
        raw
    }

    /// Build from a v2 JSON object. Scalar values are stringified so that
    /// `"latitude": 45.0` and `"latitude": "45.0"` are treated alike;
    /// nested arrays/objects are ignored.
    pub fn from_json(body: &serde_json::Value) -> Self {
        let mut raw = Self::default();
        if let Some(map) = body.as_object() {
            for (key, value) in map {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => continue,
                };
                raw.set_field(key, text);
            }
        }
        raw
    }

    fn set_field(&mut self, key: &str, value: String) {
        match key {
            "station_url" => self.station_url = Some(value),
            "description" => self.description = Some(value),
            "latitude" => self.latitude = Some(value),
            "longitude" => self.longitude = Some(value),
            "station_type" => self.station_type = Some(value),
            "station_model" => self.station_model = Some(value),
            "weewx_info" => self.weewx_info = Some(value),
            "python_info" => self.python_info = Some(value),
            "platform_info" => self.platform_info = Some(value),
            "config_path" => self.config_path = Some(value),
            "entry_path" => self.entry_path = Some(value),
            _ => {}
        }
    }
}
