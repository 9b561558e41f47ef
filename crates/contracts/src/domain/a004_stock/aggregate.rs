use crate::domain::common::{Identified, RowId};
use serde::{Deserialize, Serialize};

/// One line of the global stock state (`GET /v1/stock`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    #[serde(default, alias = "id")]
    pub produit_id: Option<RowId>,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub categorie: Option<String>,
    #[serde(default)]
    pub quantite_disponible: Option<f64>,
    #[serde(default)]
    pub valorisation: Option<f64>,
    #[serde(default)]
    pub point_de_commande: Option<f64>,
    #[serde(default)]
    pub en_alerte: Option<bool>,
}

impl Identified for StockLevel {
    fn row_id(&self) -> RowId {
        self.produit_id.unwrap_or_default()
    }
}

/// Low-stock alert (`GET /v1/stock/alertes`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    #[serde(default, alias = "id")]
    pub produit_id: Option<RowId>,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default, alias = "stockActuel")]
    pub quantite_disponible: Option<f64>,
    #[serde(default)]
    pub point_de_commande: Option<f64>,
}

impl Identified for StockAlert {
    fn row_id(&self) -> RowId {
        self.produit_id.unwrap_or_default()
    }
}

/// Flatten an arbitrary JSON document into `(path, value)` pairs.
///
/// Used for the per-product stock endpoint, whose shape the client does not
/// rely on. Arrays are indexed (`lots[0].quantite`).
pub fn flatten_fields(value: &serde_json::Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    flatten_into(String::new(), value, &mut out);
    out
}

fn flatten_into(prefix: String, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    use serde_json::Value;
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(path, child, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(format!("{}[{}]", prefix, i), child, out);
            }
        }
        Value::Null => out.push((prefix, "-".to_string())),
        Value::String(s) => out.push((prefix, s.clone())),
        other => out.push((prefix, other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_level_aliases() {
        let level: StockLevel = serde_json::from_str(
            r#"{"id":5,"reference":"TX-05","nom":"Soie","quantiteDisponible":3,"enAlerte":true}"#,
        )
        .unwrap();
        assert_eq!(level.row_id(), 5);
        assert_eq!(level.en_alerte, Some(true));

        let alert: StockAlert =
            serde_json::from_str(r#"{"produitId":2,"nom":"Lin","stockActuel":1}"#).unwrap();
        assert_eq!(alert.quantite_disponible, Some(1.0));
    }

    #[test]
    fn test_flatten_fields() {
        let doc = serde_json::json!({
            "produit": "Soie",
            "lots": [{"numeroLot": "L1", "quantite": 4}],
            "peremption": null
        });
        let fields = flatten_fields(&doc);
        assert!(fields.contains(&("produit".to_string(), "Soie".to_string())));
        assert!(fields.contains(&("lots[0].numeroLot".to_string(), "L1".to_string())));
        assert!(fields.contains(&("lots[0].quantite".to_string(), "4".to_string())));
        assert!(fields.contains(&("peremption".to_string(), "-".to_string())));
    }
}
