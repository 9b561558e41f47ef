use crate::domain::a002_product::aggregate::Product;
use crate::domain::common::{Identified, RowId};
use crate::shared::validation::{FieldErrors, FieldSpec, ValidationRules};
use serde::{Deserialize, Serialize};

// ============================================================================
// Record
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: RowId,
    #[serde(default)]
    pub numero_commande: String,
    #[serde(default)]
    pub fournisseur: Option<SupplierRef>,
    #[serde(default)]
    pub fournisseur_id: Option<RowId>,
    #[serde(default)]
    pub date_commande: Option<String>,
    /// Backend-owned status; the client never interprets it
    #[serde(default)]
    pub statut: Option<String>,
    #[serde(default)]
    pub montant_total: Option<f64>,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub lignes_commande: Vec<OrderLine>,
}

impl Identified for PurchaseOrder {
    fn row_id(&self) -> RowId {
        self.id
    }
}

impl PurchaseOrder {
    pub fn supplier_id(&self) -> Option<RowId> {
        self.fournisseur_id
            .or_else(|| self.fournisseur.as_ref().and_then(SupplierRef::id))
    }
}

/// The backend sends the supplier either as a plain name or as a nested record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupplierRef {
    Name(String),
    #[serde(rename_all = "camelCase")]
    Record {
        #[serde(default)]
        id: Option<RowId>,
        #[serde(default)]
        raison_sociale: Option<String>,
    },
}

impl SupplierRef {
    pub fn id(&self) -> Option<RowId> {
        match self {
            Self::Name(_) => None,
            Self::Record { id, .. } => *id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Record { raison_sociale, .. } => raison_sociale.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default)]
    pub produit_id: Option<RowId>,
    #[serde(default)]
    pub produit_nom: String,
    #[serde(default)]
    pub produit_reference: String,
    #[serde(default)]
    pub quantite: Option<f64>,
    #[serde(default)]
    pub prix_unitaire: Option<f64>,
    #[serde(default)]
    pub sous_total: f64,
}

impl OrderLine {
    /// Copy name and reference of the chosen product into the line
    pub fn select_product(&mut self, product: Option<&Product>) {
        self.produit_id = product.map(|p| p.id);
        self.produit_nom = product.map(|p| p.nom.clone()).unwrap_or_default();
        self.produit_reference = product.map(|p| p.reference.clone()).unwrap_or_default();
        if self.prix_unitaire.is_none() {
            self.prix_unitaire = product.and_then(|p| p.prix_unitaire);
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.quantite.unwrap_or(0.0) * self.prix_unitaire.unwrap_or(0.0)
    }
}

/// Body of the reception transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionRequest {
    /// Local time, `YYYY-MM-DDTHH:MM:SS`
    pub date_reception: String,
    pub observations: String,
}

// ============================================================================
// DTO (create / update payload)
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderDto {
    pub numero_commande: String,
    pub fournisseur_id: Option<RowId>,
    pub date_commande: String,
    pub observations: String,
    pub lignes_commande: Vec<OrderLine>,
}

impl Default for PurchaseOrderDto {
    fn default() -> Self {
        Self {
            numero_commande: String::new(),
            fournisseur_id: None,
            date_commande: String::new(),
            observations: String::new(),
            lignes_commande: vec![OrderLine::default()],
        }
    }
}

impl PurchaseOrderDto {
    pub const NUMERO_COMMANDE: FieldSpec = FieldSpec::new(
        "numeroCommande",
        "N° commande",
        ValidationRules::required().max_length(50),
    );
    pub const FOURNISSEUR: FieldSpec =
        FieldSpec::new("fournisseurId", "Fournisseur", ValidationRules::required());
    pub const DATE_COMMANDE: FieldSpec =
        FieldSpec::new("dateCommande", "Date de commande", ValidationRules::required());
    pub const OBSERVATIONS: FieldSpec = FieldSpec::new(
        "observations",
        "Observations",
        ValidationRules::none().max_length(1000),
    );
    pub const LINES: FieldSpec =
        FieldSpec::new("lignesCommande", "Lignes de commande", ValidationRules::required());
    pub const LINE_PRODUCT: FieldSpec =
        FieldSpec::new("produitId", "Produit", ValidationRules::required());
    pub const LINE_QUANTITY: FieldSpec =
        FieldSpec::new("quantite", "Quantité", ValidationRules::required().min(1.0));
    pub const LINE_PRICE: FieldSpec =
        FieldSpec::new("prixUnitaire", "Prix unitaire", ValidationRules::required().min(0.0));

    /// Error key of a line field: `lignesCommande[1].quantite`
    pub fn line_key(index: usize, field: &str) -> String {
        format!("{}[{}].{}", Self::LINES.name, index, field)
    }

    pub fn from_record(order: &PurchaseOrder) -> Self {
        let lines = if order.lignes_commande.is_empty() {
            vec![OrderLine::default()]
        } else {
            order.lignes_commande.clone()
        };
        Self {
            numero_commande: order.numero_commande.clone(),
            fournisseur_id: order.supplier_id(),
            date_commande: order
                .date_commande
                .as_deref()
                .map(|d| d.split('T').next().unwrap_or(d).to_string())
                .unwrap_or_default(),
            observations: order.observations.clone().unwrap_or_default(),
            lignes_commande: lines,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check_text(&Self::NUMERO_COMMANDE, &self.numero_commande);
        errors.check_selected(&Self::FOURNISSEUR, self.fournisseur_id);
        errors.check_text(&Self::DATE_COMMANDE, &self.date_commande);
        errors.check_text(&Self::OBSERVATIONS, &self.observations);

        if self.lignes_commande.is_empty() {
            errors.insert(Self::LINES.name, "Au moins une ligne de commande est requise");
        }

        for (index, line) in self.lignes_commande.iter().enumerate() {
            let mut line_errors = FieldErrors::new();
            line_errors.check_selected(&Self::LINE_PRODUCT, line.produit_id);
            line_errors.check_number(&Self::LINE_QUANTITY, line.quantite);
            line_errors.check_number(&Self::LINE_PRICE, line.prix_unitaire);
            for (field, message) in line_errors.iter() {
                errors.insert(Self::line_key(index, field), message);
            }
        }

        errors
    }

    /// Payload as sent: line subtotals filled in, nothing else recomputed
    pub fn with_subtotals(&self) -> Self {
        let mut dto = self.clone();
        for line in &mut dto.lignes_commande {
            line.sous_total = line.subtotal();
        }
        dto
    }

    pub fn total(&self) -> f64 {
        self.lignes_commande.iter().map(OrderLine::subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: RowId, price: Option<f64>) -> Product {
        Product {
            id,
            reference: format!("P-{}", id),
            nom: format!("Produit {}", id),
            description: None,
            prix_unitaire: price,
            categorie: None,
            stock_initial: None,
            stock_actuel: None,
            point_de_commande: None,
            unite_mesure: None,
        }
    }

    #[test]
    fn test_subtotals_computed_at_submission() {
        let mut dto = PurchaseOrderDto::default();
        dto.lignes_commande[0].select_product(Some(&product(3, Some(2.5))));
        dto.lignes_commande[0].quantite = Some(4.0);
        assert_eq!(dto.lignes_commande[0].sous_total, 0.0);

        let payload = dto.with_subtotals();
        assert_eq!(payload.lignes_commande[0].sous_total, 10.0);
        assert_eq!(payload.lignes_commande[0].produit_nom, "Produit 3");
        assert_eq!(payload.lignes_commande[0].produit_reference, "P-3");
        assert_eq!(payload.total(), 10.0);
    }

    #[test]
    fn test_line_errors_are_indexed() {
        let mut dto = PurchaseOrderDto {
            numero_commande: "CMD-1".into(),
            fournisseur_id: Some(1),
            date_commande: "2026-10-01".into(),
            ..Default::default()
        };
        dto.lignes_commande.push(OrderLine {
            produit_id: Some(2),
            quantite: Some(0.0),
            prix_unitaire: Some(1.0),
            ..Default::default()
        });

        let errors = dto.validate();
        assert!(errors.get("lignesCommande[0].produitId").is_some());
        assert!(errors.get("lignesCommande[1].quantite").is_some());
        assert!(errors.get("lignesCommande[1].produitId").is_none());
        assert!(errors.get("numeroCommande").is_none());
    }

    #[test]
    fn test_supplier_ref_shapes() {
        let by_name: PurchaseOrder =
            serde_json::from_str(r#"{"id":1,"fournisseur":"Atlas","statut":"EN_ATTENTE"}"#)
                .unwrap();
        assert_eq!(by_name.fournisseur.as_ref().and_then(|f| f.name()), Some("Atlas"));
        assert_eq!(by_name.supplier_id(), None);

        let nested: PurchaseOrder = serde_json::from_str(
            r#"{"id":2,"fournisseur":{"id":9,"raisonSociale":"Atlas"},"dateCommande":"2026-01-05T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(nested.supplier_id(), Some(9));
        let dto = PurchaseOrderDto::from_record(&nested);
        assert_eq!(dto.fournisseur_id, Some(9));
        assert_eq!(dto.date_commande, "2026-01-05");
        assert_eq!(dto.lignes_commande.len(), 1);
    }
}
