use crate::domain::common::{Identified, RowId};
use crate::shared::validation::{FieldErrors, FieldSpec, Pattern, ValidationRules};
use serde::{Deserialize, Serialize};

// ============================================================================
// Record
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: RowId,
    #[serde(default)]
    pub raison_sociale: String,
    #[serde(default)]
    pub adresse: String,
    #[serde(default)]
    pub ville: String,
    #[serde(default)]
    pub personne_contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub ice: String,
}

impl Identified for Supplier {
    fn row_id(&self) -> RowId {
        self.id
    }
}

// ============================================================================
// DTO (create / update payload)
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDto {
    pub raison_sociale: String,
    pub adresse: String,
    pub ville: String,
    pub personne_contact: String,
    pub email: String,
    pub telephone: String,
    pub ice: String,
}

impl SupplierDto {
    pub const RAISON_SOCIALE: FieldSpec = FieldSpec::new(
        "raisonSociale",
        "Raison sociale",
        ValidationRules::required().max_length(200),
    );
    pub const ADRESSE: FieldSpec =
        FieldSpec::new("adresse", "Adresse", ValidationRules::required());
    pub const VILLE: FieldSpec =
        FieldSpec::new("ville", "Ville", ValidationRules::required().max_length(100));
    pub const PERSONNE_CONTACT: FieldSpec = FieldSpec::new(
        "personneContact",
        "Personne contact",
        ValidationRules::required().max_length(150),
    );
    pub const EMAIL: FieldSpec = FieldSpec::new(
        "email",
        "Email",
        ValidationRules::required().pattern(Pattern::Email),
    );
    pub const TELEPHONE: FieldSpec = FieldSpec::new(
        "telephone",
        "Téléphone",
        ValidationRules::required().pattern(Pattern::Phone),
    );
    pub const ICE: FieldSpec =
        FieldSpec::new("ice", "ICE", ValidationRules::required().exact_length(15));

    pub const FIELDS: [FieldSpec; 7] = [
        Self::RAISON_SOCIALE,
        Self::ADRESSE,
        Self::VILLE,
        Self::PERSONNE_CONTACT,
        Self::EMAIL,
        Self::TELEPHONE,
        Self::ICE,
    ];

    pub fn from_record(s: &Supplier) -> Self {
        Self {
            raison_sociale: s.raison_sociale.clone(),
            adresse: s.adresse.clone(),
            ville: s.ville.clone(),
            personne_contact: s.personne_contact.clone(),
            email: s.email.clone(),
            telephone: s.telephone.clone(),
            ice: s.ice.clone(),
        }
    }

    fn value_of(&self, field: &str) -> &str {
        match field {
            "raisonSociale" => &self.raison_sociale,
            "adresse" => &self.adresse,
            "ville" => &self.ville,
            "personneContact" => &self.personne_contact,
            "email" => &self.email,
            "telephone" => &self.telephone,
            "ice" => &self.ice,
            _ => "",
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for spec in &Self::FIELDS {
            errors.check_text(spec, self.value_of(spec.name));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn valid_dto() -> SupplierDto {
        SupplierDto {
            raison_sociale: "Atlas Tissus SARL".into(),
            adresse: "12 rue des Teinturiers".into(),
            ville: "Casablanca".into(),
            personne_contact: "Samira B.".into(),
            email: "contact@atlas-tissus.ma".into(),
            telephone: "+212522000000".into(),
            ice: "001234567000089".into(),
        }
    }

    #[test]
    fn test_valid_supplier_passes() {
        assert!(valid_dto().validate().is_empty());
    }

    #[test]
    fn test_empty_form_flags_all_seven_fields() {
        let errors = SupplierDto::default().validate();
        assert_eq!(errors.len(), 7);
        for spec in &SupplierDto::FIELDS {
            assert!(errors.get(spec.name).is_some(), "missing marker for {}", spec.name);
        }
    }

    #[test]
    fn test_format_rules() {
        let mut dto = valid_dto();
        dto.email = "not-an-email".into();
        dto.telephone = "123".into();
        dto.ice = "0012".into();
        let errors = dto.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.get("email").is_some());
        assert!(errors.get("telephone").is_some());
        assert!(errors.get("ice").is_some());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(valid_dto()).unwrap();
        assert!(json.get("raisonSociale").is_some());
        assert!(json.get("personneContact").is_some());

        let record: Supplier = serde_json::from_str(
            r#"{"id":4,"raisonSociale":"X","ville":"Rabat"}"#,
        )
        .unwrap();
        assert_eq!(record.id, 4);
        assert_eq!(record.ville, "Rabat");
        assert_eq!(SupplierDto::from_record(&record).raison_sociale, "X");
    }
}
