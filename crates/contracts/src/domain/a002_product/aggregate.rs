use crate::domain::common::{Identified, RowId};
use crate::shared::validation::{FieldErrors, FieldSpec, ValidationRules};
use serde::{Deserialize, Serialize};

// ============================================================================
// Record
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RowId,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prix_unitaire: Option<f64>,
    #[serde(default)]
    pub categorie: Option<String>,
    #[serde(default)]
    pub stock_initial: Option<f64>,
    #[serde(default)]
    pub stock_actuel: Option<f64>,
    #[serde(default)]
    pub point_de_commande: Option<f64>,
    #[serde(default)]
    pub unite_mesure: Option<String>,
}

impl Identified for Product {
    fn row_id(&self) -> RowId {
        self.id
    }
}

impl Product {
    /// Label used in select boxes: "REF - Nom"
    pub fn display_name(&self) -> String {
        if self.reference.is_empty() {
            self.nom.clone()
        } else {
            format!("{} - {}", self.reference, self.nom)
        }
    }
}

// ============================================================================
// DTO (create / update payload)
// ============================================================================
/// Numeric fields are `None` while the input holds no parseable number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub reference: String,
    pub nom: String,
    pub description: String,
    pub prix_unitaire: Option<f64>,
    pub categorie: String,
    pub stock_initial: Option<f64>,
    pub point_de_commande: Option<f64>,
    pub unite_mesure: String,
}

impl ProductDto {
    pub const REFERENCE: FieldSpec = FieldSpec::new(
        "reference",
        "Référence",
        ValidationRules::required().max_length(50),
    );
    pub const NOM: FieldSpec =
        FieldSpec::new("nom", "Nom", ValidationRules::required().max_length(200));
    pub const DESCRIPTION: FieldSpec =
        FieldSpec::new("description", "Description", ValidationRules::required());
    pub const PRIX_UNITAIRE: FieldSpec = FieldSpec::new(
        "prixUnitaire",
        "Prix unitaire",
        ValidationRules::required().min(0.0),
    );
    pub const CATEGORIE: FieldSpec =
        FieldSpec::new("categorie", "Catégorie", ValidationRules::required());
    pub const STOCK_INITIAL: FieldSpec = FieldSpec::new(
        "stockInitial",
        "Stock initial",
        ValidationRules::required().min(0.0),
    );
    pub const POINT_DE_COMMANDE: FieldSpec = FieldSpec::new(
        "pointDeCommande",
        "Point de commande",
        ValidationRules::required().min(0.0),
    );
    pub const UNITE_MESURE: FieldSpec =
        FieldSpec::new("uniteMesure", "Unité de mesure", ValidationRules::required());

    pub fn from_record(p: &Product) -> Self {
        Self {
            reference: p.reference.clone(),
            nom: p.nom.clone(),
            description: p.description.clone().unwrap_or_default(),
            prix_unitaire: p.prix_unitaire,
            categorie: p.categorie.clone().unwrap_or_default(),
            stock_initial: p.stock_initial,
            point_de_commande: p.point_de_commande,
            unite_mesure: p.unite_mesure.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check_text(&Self::REFERENCE, &self.reference);
        errors.check_text(&Self::NOM, &self.nom);
        errors.check_text(&Self::DESCRIPTION, &self.description);
        errors.check_number(&Self::PRIX_UNITAIRE, self.prix_unitaire);
        errors.check_text(&Self::CATEGORIE, &self.categorie);
        errors.check_number(&Self::STOCK_INITIAL, self.stock_initial);
        errors.check_number(&Self::POINT_DE_COMMANDE, self.point_de_commande);
        errors.check_text(&Self::UNITE_MESURE, &self.unite_mesure);
        errors
    }
}
