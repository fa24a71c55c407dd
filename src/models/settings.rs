use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::{Number, Value};

/// Persisted configuration document (`config.yaml`).
///
/// Groups the application does not interpret are kept in `extra` so that a
/// load/save cycle never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub telegram_setting: TelegramSetting,

    #[serde(default)]
    pub order_setting: IndexMap<String, OrderValue>,

    #[serde(default)]
    pub listing_setting: ListingSetting,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramSetting {
    #[serde(default = "default_session")]
    pub session: String,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Default for TelegramSetting {
    fn default() -> Self {
        Self {
            session: default_session(),
            extra: IndexMap::new(),
        }
    }
}

pub(crate) fn default_session() -> String {
    "anon".to_string()
}

/// Allow/deny list toggles.
///
/// `whitelist` and `blacklist` are filled from `whitelist.txt` and
/// `blacklist.txt` at load time and never written into the document. Any
/// other keys in the group are carried in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingSetting {
    #[serde(default)]
    pub whitelist_activate: bool,

    #[serde(default)]
    pub blacklist_activate: bool,

    #[serde(skip)]
    pub whitelist: Vec<String>,

    #[serde(skip)]
    pub blacklist: Vec<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A single `order_setting` value.
///
/// Older documents store numbers as quoted strings; normalization turns every
/// string that parses as a float into [`OrderValue::Number`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderValue {
    Bool(bool),
    Number(Number),
    Text(String),
    Other(Value),
}

impl OrderValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OrderValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OrderValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OrderValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for OrderValue {
    fn from(value: bool) -> Self {
        OrderValue::Bool(value)
    }
}

impl From<f64> for OrderValue {
    fn from(value: f64) -> Self {
        OrderValue::Number(Number::from(value))
    }
}

impl From<i64> for OrderValue {
    fn from(value: i64) -> Self {
        OrderValue::Number(Number::from(value))
    }
}

impl From<&str> for OrderValue {
    fn from(value: &str) -> Self {
        OrderValue::Text(value.to_string())
    }
}

impl Settings {
    /// Whether short orders are enabled (`order_setting.make_short`).
    pub fn make_short(&self) -> bool {
        self.order_setting
            .get("make_short")
            .and_then(OrderValue::as_bool)
            .unwrap_or(false)
    }

    /// Numeric `order_setting` value by key.
    pub fn order_number(&self, key: &str) -> Option<f64> {
        self.order_setting.get(key).and_then(OrderValue::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.telegram_setting.session, "anon");
        assert!(!settings.listing_setting.whitelist_activate);
        assert!(!settings.listing_setting.blacklist_activate);
        assert!(!settings.make_short());
    }

    #[test]
    fn test_order_values_keep_their_shape() {
        let yaml = r#"
telegram_setting:
  session: main
  api_id: 12345
order_setting:
  leverage: 10
  ratio: 0.25
  mode: fast
  make_short: true
"#;
        let settings: Settings = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(settings.telegram_setting.session, "main");
        assert!(settings.telegram_setting.extra.contains_key("api_id"));
        assert_eq!(settings.order_number("leverage"), Some(10.0));
        assert_eq!(settings.order_number("ratio"), Some(0.25));
        assert_eq!(settings.order_setting["mode"].as_str(), Some("fast"));
        assert!(settings.make_short());
    }

    #[test]
    fn test_list_entries_are_not_serialized() {
        let mut settings = Settings::default();
        settings.listing_setting.whitelist = vec!["BTCUSDT".to_string()];
        settings.listing_setting.blacklist = vec!["DOGEUSDT".to_string()];

        let yaml = serde_yaml_ng::to_string(&settings).unwrap();

        assert!(yaml.contains("whitelist_activate"));
        assert!(!yaml.contains("whitelist:"));
        assert!(!yaml.contains("blacklist:"));
        assert!(!yaml.contains("BTCUSDT"));
    }

    #[test]
    fn test_unknown_listing_keys_survive_round_trip() {
        let yaml = "listing_setting:\n  whitelist_activate: true\n  max_symbols: 5\n";
        let settings: Settings = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(settings.listing_setting.whitelist_activate);
        assert!(settings.listing_setting.extra.contains_key("max_symbols"));

        let written = serde_yaml_ng::to_string(&settings).unwrap();
        assert!(written.contains("max_symbols: 5"));
    }

    #[test]
    fn test_unknown_groups_survive_round_trip() {
        let yaml = "telegram_setting:\n  session: anon\nexchange_setting:\n  name: binance\n";
        let settings: Settings = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(settings.extra.contains_key("exchange_setting"));

        let written = serde_yaml_ng::to_string(&settings).unwrap();
        let reread: Settings = serde_yaml_ng::from_str(&written).unwrap();
        assert_eq!(reread, settings);
    }
}
