use contracts::domain::a001_supplier::aggregate::Supplier;
use contracts::domain::a002_product::aggregate::Product;
use contracts::domain::a003_purchase_order::aggregate::{OrderLine, PurchaseOrder, PurchaseOrderDto};
use contracts::domain::common::RowId;
use contracts::shared::FieldErrors;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::list::OrderController;
use crate::domain::a001_supplier::api::fetch_suppliers;
use crate::domain::a002_product::api::fetch_products;
use crate::shared::components::ui::fields::{id_option_value, parse_id};
use crate::shared::components::ui::{Button, ButtonVariant, NumberField, SelectField, TextAreaField, TextField};
use crate::shared::components::FormModal;
use crate::shared::crud::{signals, FormModel};
use crate::shared::dialogs::Dialogs;
use crate::shared::http::ApiError;

impl FormModel for PurchaseOrderDto {
    type Row = PurchaseOrder;

    fn from_row(row: &PurchaseOrder) -> Self {
        PurchaseOrderDto::from_record(row)
    }

    fn validate(&self) -> FieldErrors {
        PurchaseOrderDto::validate(self)
    }
}

/// Choices offered by the order form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderReferences {
    pub suppliers: Vec<Supplier>,
    pub products: Vec<Product>,
}

impl OrderReferences {
    pub fn supplier_options(&self) -> Vec<(String, String)> {
        self.suppliers
            .iter()
            .map(|s| (s.id.to_string(), s.raison_sociale.clone()))
            .collect()
    }

    pub fn product_options(&self) -> Vec<(String, String)> {
        self.products
            .iter()
            .map(|p| (p.id.to_string(), format!("{} - {}", p.reference, p.nom)))
            .collect()
    }

    pub fn product(&self, id: Option<RowId>) -> Option<&Product> {
        let id = id?;
        self.products.iter().find(|p| p.id == id)
    }
}

/// Fetch suppliers and products for the form; a failure keeps what was
/// loaded before
pub async fn load_references<D: Dialogs>(references: RwSignal<OrderReferences>, dialogs: D) {
    let loaded = async { Ok::<_, ApiError>((fetch_suppliers().await?, fetch_products().await?)) };
    match loaded.await {
        Ok((suppliers, products)) => {
            log::debug!("order form: {} suppliers, {} products", suppliers.len(), products.len());
            references.set(OrderReferences { suppliers, products });
        }
        Err(error) => {
            log::warn!("order form references: {:?}", error);
            dialogs.alert(&format!(
                "Erreur lors du chargement des fournisseurs et produits\n{}",
                error
            ));
        }
    }
}

pub fn add_line(form: &mut PurchaseOrderDto) {
    form.lignes_commande.push(OrderLine::default());
}

/// The last remaining line cannot be removed
pub fn remove_line(form: &mut PurchaseOrderDto, index: usize) -> bool {
    if form.lignes_commande.len() <= 1 || index >= form.lignes_commande.len() {
        return false;
    }
    form.lignes_commande.remove(index);
    true
}

pub fn choose_product(form: &mut PurchaseOrderDto, index: usize, product: Option<&Product>) {
    if let Some(line) = form.lignes_commande.get_mut(index) {
        line.select_product(product);
    }
}

#[component]
fn OrderLineRow(ctl: OrderController, references: RwSignal<OrderReferences>, index: usize) -> impl IntoView {
    let state = *ctl.state();
    let line = move || {
        state.with(|s| {
            s.form_values()
                .and_then(|f| f.lignes_commande.get(index).cloned())
                .unwrap_or_default()
        })
    };
    let key = |field: &str| PurchaseOrderDto::line_key(index, field);

    let on_product = Callback::new(move |raw: String| {
        let chosen = references.with_untracked(|r| r.product(parse_id(&raw)).cloned());
        ctl.update_form(|f| choose_product(f, index, chosen.as_ref()));
    });

    view! {
        <div class="order-line">
            <SelectField
                label="Produit"
                value=Signal::derive(move || id_option_value(line().produit_id))
                options=Signal::derive(move || references.with(OrderReferences::product_options))
                on_change=on_product
                error=signals::error(state, key(PurchaseOrderDto::LINE_PRODUCT.name))
            />
            <NumberField
                label="Quantité"
                value=Signal::derive(move || line().quantite)
                on_input=Callback::new(move |v| ctl.update_form(|f| {
                    if let Some(l) = f.lignes_commande.get_mut(index) {
                        l.quantite = v;
                    }
                }))
                error=signals::error(state, key(PurchaseOrderDto::LINE_QUANTITY.name))
            />
            <NumberField
                label="Prix unitaire (DH)"
                step="0.01".to_string()
                value=Signal::derive(move || line().prix_unitaire)
                on_input=Callback::new(move |v| ctl.update_form(|f| {
                    if let Some(l) = f.lignes_commande.get_mut(index) {
                        l.prix_unitaire = v;
                    }
                }))
                error=signals::error(state, key(PurchaseOrderDto::LINE_PRICE.name))
            />
            <div class="order-line__subtotal">{move || format!("{:.2} DH", line().subtotal())}</div>
            <Button
                variant=ButtonVariant::Secondary
                disabled=Signal::derive(move || {
                    state.with(|s| s.form_values().map_or(0, |f| f.lignes_commande.len()) <= 1)
                })
                on_click=Callback::new(move |_| ctl.update_form(|f| {
                    remove_line(f, index);
                }))
            >
                "Retirer"
            </Button>
        </div>
    }
}

/// Create / edit form of a purchase order with its lines
#[component]
pub fn OrderDetails(ctl: OrderController, references: RwSignal<OrderReferences>) -> impl IntoView {
    let state = *ctl.state();

    let on_submit = Callback::new(move |_| {
        spawn_local(async move {
            ctl.submit().await;
        });
    });

    let line_count = move || state.with(|s| s.form_values().map_or(0, |f| f.lignes_commande.len()));
    let total = move || state.with(|s| s.form_values().map_or(0.0, PurchaseOrderDto::total));

    view! {
        <FormModal
            title=signals::title(state, "Nouvelle commande", "Modifier la commande")
            on_close=Callback::new(move |_| ctl.close_form())
            on_submit=on_submit
            submitting=signals::submitting(state)
            error=signals::submit_error(state)
        >
            <div class="form__row">
                <TextField
                    label="N° commande"
                    value=signals::text(state, |f| &f.numero_commande)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.numero_commande = v))
                    error=signals::error(state, PurchaseOrderDto::NUMERO_COMMANDE.name)
                />
                <TextField
                    label="Date de commande"
                    input_type="date".to_string()
                    value=signals::text(state, |f| &f.date_commande)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.date_commande = v))
                    error=signals::error(state, PurchaseOrderDto::DATE_COMMANDE.name)
                />
            </div>
            <SelectField
                label="Fournisseur"
                value=Signal::derive(move || {
                    state.with(|s| id_option_value(s.form_values().and_then(|f| f.fournisseur_id)))
                })
                options=Signal::derive(move || references.with(OrderReferences::supplier_options))
                on_change=Callback::new(move |raw: String| {
                    ctl.update_form(|f| f.fournisseur_id = parse_id(&raw))
                })
                error=signals::error(state, PurchaseOrderDto::FOURNISSEUR.name)
            />
            <TextAreaField
                label="Observations"
                value=signals::text(state, |f| &f.observations)
                on_input=Callback::new(move |v| ctl.update_form(|f| f.observations = v))
                error=signals::error(state, PurchaseOrderDto::OBSERVATIONS.name)
            />

            <div class="order-lines">
                <div class="order-lines__header">
                    <h3>"Lignes de commande"</h3>
                    <Button
                        variant=ButtonVariant::Secondary
                        on_click=Callback::new(move |_| ctl.update_form(add_line))
                    >
                        "+ Ajouter une ligne"
                    </Button>
                </div>
                {move || {
                    (0..line_count())
                        .map(|index| view! { <OrderLineRow ctl=ctl references=references index=index /> })
                        .collect_view()
                }}
                {move || {
                    state
                        .with(|s| s.form.as_ref().and_then(|f| f.visible_error(PurchaseOrderDto::LINES.name)))
                        .map(|message| view! { <div class="form__error">{message}</div> })
                }}
                <div class="order-lines__total">{move || format!("Total : {:.2} DH", total())}</div>
            </div>
        </FormModal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: RowId, price: f64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "reference": format!("TX-{}", id),
            "nom": format!("Tissu {}", id),
            "prixUnitaire": price
        }))
        .unwrap()
    }

    #[test]
    fn test_last_line_cannot_be_removed() {
        let mut form = PurchaseOrderDto::default();
        assert!(!remove_line(&mut form, 0));
        add_line(&mut form);
        assert_eq!(form.lignes_commande.len(), 2);
        assert!(!remove_line(&mut form, 5));
        assert!(remove_line(&mut form, 0));
        assert_eq!(form.lignes_commande.len(), 1);
    }

    #[test]
    fn test_choosing_product_fills_line() {
        let references = OrderReferences {
            suppliers: Vec::new(),
            products: vec![product(1, 4.0), product(2, 9.5)],
        };
        let mut form = PurchaseOrderDto::default();
        choose_product(&mut form, 0, references.product(Some(2)));
        let line = &form.lignes_commande[0];
        assert_eq!(line.produit_id, Some(2));
        assert_eq!(line.produit_reference, "TX-2");
        assert_eq!(line.prix_unitaire, Some(9.5));

        choose_product(&mut form, 0, references.product(None));
        assert_eq!(form.lignes_commande[0].produit_id, None);
        assert_eq!(form.lignes_commande[0].produit_nom, "");
    }

    #[test]
    fn test_product_options_label() {
        let references = OrderReferences {
            suppliers: Vec::new(),
            products: vec![product(3, 1.0)],
        };
        assert_eq!(
            references.product_options(),
            vec![("3".to_string(), "TX-3 - Tissu 3".to_string())]
        );
    }
}
