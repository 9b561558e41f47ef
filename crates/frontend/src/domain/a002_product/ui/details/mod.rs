use contracts::domain::a002_product::aggregate::{Product, ProductDto};
use contracts::shared::FieldErrors;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::list::ProductController;
use crate::shared::components::ui::{NumberField, TextAreaField, TextField};
use crate::shared::components::FormModal;
use crate::shared::crud::{signals, FormModel};

impl FormModel for ProductDto {
    type Row = Product;

    fn from_row(row: &Product) -> Self {
        ProductDto::from_record(row)
    }

    fn validate(&self) -> FieldErrors {
        ProductDto::validate(self)
    }
}

#[component]
pub fn ProductDetails(ctl: ProductController) -> impl IntoView {
    let state = *ctl.state();

    view! {
        <FormModal
            title=signals::title(state, "Nouveau produit", "Modifier le produit")
            on_close=Callback::new(move |_| ctl.close_form())
            on_submit=Callback::new(move |_| {
                spawn_local(async move {
                    ctl.submit().await;
                });
            })
            submitting=signals::submitting(state)
            error=signals::submit_error(state)
        >
            <div class="form__row">
                <TextField
                    label="Référence"
                    value=signals::text(state, |f| &f.reference)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.reference = v))
                    error=signals::error(state, ProductDto::REFERENCE.name)
                />
                <TextField
                    label="Nom"
                    value=signals::text(state, |f| &f.nom)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.nom = v))
                    error=signals::error(state, ProductDto::NOM.name)
                />
            </div>
            <TextAreaField
                label="Description"
                value=signals::text(state, |f| &f.description)
                on_input=Callback::new(move |v| ctl.update_form(|f| f.description = v))
                error=signals::error(state, ProductDto::DESCRIPTION.name)
            />
            <div class="form__row">
                <NumberField
                    label="Prix unitaire (DH)"
                    step="0.01".to_string()
                    value=signals::number(state, |f| f.prix_unitaire)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.prix_unitaire = v))
                    error=signals::error(state, ProductDto::PRIX_UNITAIRE.name)
                />
                <TextField
                    label="Catégorie"
                    value=signals::text(state, |f| &f.categorie)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.categorie = v))
                    error=signals::error(state, ProductDto::CATEGORIE.name)
                />
            </div>
            <div class="form__row">
                <NumberField
                    label="Stock initial"
                    value=signals::number(state, |f| f.stock_initial)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.stock_initial = v))
                    error=signals::error(state, ProductDto::STOCK_INITIAL.name)
                />
                <NumberField
                    label="Point de commande"
                    value=signals::number(state, |f| f.point_de_commande)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.point_de_commande = v))
                    error=signals::error(state, ProductDto::POINT_DE_COMMANDE.name)
                />
                <TextField
                    label="Unité de mesure"
                    placeholder="m, kg, pièce...".to_string()
                    value=signals::text(state, |f| &f.unite_mesure)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.unite_mesure = v))
                    error=signals::error(state, ProductDto::UNITE_MESURE.name)
                />
            </div>
        </FormModal>
    }
}
