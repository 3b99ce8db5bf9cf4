//! Wire types for the outfit generation service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::intake::IntakeRecord;

/// Which search back end the service should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Demo,
    Serpapi,
}

impl GenerationMode {
    /// Human label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Demo => "demo-modus",
            Self::Serpapi => "live zoeken (SerpAPI)",
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Demo => write!(f, "demo"),
            Self::Serpapi => write!(f, "serpapi"),
        }
    }
}

/// Body of `POST /api/generate`.
#[derive(Clone, Serialize)]
pub struct GenerateRequest {
    pub intake: IntakeRecord,
    pub mode: GenerationMode,
    /// `None` serializes as `null`, meaning "use the server's key".
    pub serpapi_api_key: Option<String>,
    pub outfits_count: u32,
}

impl std::fmt::Debug for GenerateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateRequest")
            .field("intake", &self.intake)
            .field("mode", &self.mode)
            .field(
                "serpapi_api_key",
                &self.serpapi_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("outfits_count", &self.outfits_count)
            .finish()
    }
}

/// One garment in an outfit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitItem {
    pub category: String,
    pub title: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub merchant: Option<String>,
    /// Passed through as-is; its shape is owned by the service.
    #[serde(default)]
    pub cheaper_alternative: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    pub name: String,
    pub items: Vec<OutfitItem>,
    pub total: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Body of a successful `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub outfits: Vec<Outfit>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub independent_note: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub allocation: BTreeMap<String, f64>,
}

/// Body of `GET /api/meta`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceMeta {
    #[serde(default)]
    pub has_serpapi: bool,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_null_key() {
        let req = GenerateRequest {
            intake: IntakeRecord::default(),
            mode: GenerationMode::Demo,
            serpapi_api_key: None,
            outfits_count: 3,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["mode"], "demo");
        assert_eq!(json["serpapi_api_key"], serde_json::Value::Null);
        assert_eq!(json["outfits_count"], 3);
        assert_eq!(json["intake"]["country"], "NL");
    }

    #[test]
    fn request_debug_redacts_key() {
        let req = GenerateRequest {
            intake: IntakeRecord::default(),
            mode: GenerationMode::Serpapi,
            serpapi_api_key: Some("secret-123".into()),
            outfits_count: 3,
        };
        let debug = format!("{req:?}");
        assert!(!debug.contains("secret-123"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn response_parses_service_payload() {
        let body = serde_json::json!({
            "palette": {"colors": ["navy", "white", "grey", "black", "stone"]},
            "allocation": {"outer": 62.5, "_total": 250.0},
            "outfits": [{
                "name": "Outfit 1",
                "items": [{
                    "category": "outer",
                    "title": "Navy overshirt (demo)",
                    "price": 55.0,
                    "currency": "EUR",
                    "link": "#",
                    "image": null,
                    "merchant": "demo",
                    "cheaper_alternative": null
                }],
                "total": 55.0,
                "currency": "EUR"
            }],
            "explanation": "Rustig palet.",
            "independent_note": "Geen affiliate.",
            "country": "NL",
            "currency": "EUR"
        });
        let resp: GenerateResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.outfits.len(), 1);
        assert_eq!(resp.outfits[0].items[0].merchant.as_deref(), Some("demo"));
        assert!(resp.outfits[0].items[0].image.is_none());
        assert_eq!(resp.palette.colors.len(), 5);
        assert_eq!(resp.allocation["_total"], 250.0);
    }

    #[test]
    fn meta_tolerates_missing_fields() {
        let meta: ServiceMeta = serde_json::from_str("{}").unwrap();
        assert!(!meta.has_serpapi);
    }
}
