use contracts::domain::a001_supplier::aggregate::{Supplier, SupplierDto};
use contracts::shared::FieldErrors;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::list::SupplierController;
use crate::shared::components::ui::{TextAreaField, TextField};
use crate::shared::components::FormModal;
use crate::shared::crud::{signals, FormModel};

impl FormModel for SupplierDto {
    type Row = Supplier;

    fn from_row(row: &Supplier) -> Self {
        SupplierDto::from_record(row)
    }

    fn validate(&self) -> FieldErrors {
        SupplierDto::validate(self)
    }
}

/// Create / edit form of a supplier, shown while the screen's form is open
#[component]
pub fn SupplierDetails(ctl: SupplierController) -> impl IntoView {
    let state = *ctl.state();

    let on_submit = Callback::new(move |_| {
        spawn_local(async move {
            ctl.submit().await;
        });
    });

    view! {
        <FormModal
            title=signals::title(state, "Nouveau fournisseur", "Modifier le fournisseur")
            on_close=Callback::new(move |_| ctl.close_form())
            on_submit=on_submit
            submitting=signals::submitting(state)
            error=signals::submit_error(state)
        >
            <TextField
                label="Raison sociale"
                value=signals::text(state, |f| &f.raison_sociale)
                on_input=Callback::new(move |v| ctl.update_form(|f| f.raison_sociale = v))
                error=signals::error(state, SupplierDto::RAISON_SOCIALE.name)
            />
            <TextField
                label="Personne contact"
                value=signals::text(state, |f| &f.personne_contact)
                on_input=Callback::new(move |v| ctl.update_form(|f| f.personne_contact = v))
                error=signals::error(state, SupplierDto::PERSONNE_CONTACT.name)
            />
            <div class="form__row">
                <TextField
                    label="Email"
                    input_type="email".to_string()
                    value=signals::text(state, |f| &f.email)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.email = v))
                    error=signals::error(state, SupplierDto::EMAIL.name)
                />
                <TextField
                    label="Téléphone"
                    placeholder="+212600000000".to_string()
                    value=signals::text(state, |f| &f.telephone)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.telephone = v))
                    error=signals::error(state, SupplierDto::TELEPHONE.name)
                />
            </div>
            <TextAreaField
                label="Adresse"
                value=signals::text(state, |f| &f.adresse)
                on_input=Callback::new(move |v| ctl.update_form(|f| f.adresse = v))
                error=signals::error(state, SupplierDto::ADRESSE.name)
            />
            <div class="form__row">
                <TextField
                    label="Ville"
                    value=signals::text(state, |f| &f.ville)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.ville = v))
                    error=signals::error(state, SupplierDto::VILLE.name)
                />
                <TextField
                    label="ICE"
                    placeholder="15 caractères".to_string()
                    value=signals::text(state, |f| &f.ice)
                    on_input=Callback::new(move |v| ctl.update_form(|f| f.ice = v))
                    error=signals::error(state, SupplierDto::ICE.name)
                />
            </div>
        </FormModal>
    }
}
