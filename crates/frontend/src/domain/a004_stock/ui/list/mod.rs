pub mod state;

use contracts::domain::a004_stock::aggregate::{StockAlert, StockLevel};
use leptos::prelude::*;
use leptos::task::spawn_local;

use self::state::{StockController, StockState};
use crate::domain::a004_stock::api::StockEndpoints;
use crate::shared::components::ui::fields::{id_option_value, parse_id};
use crate::shared::components::ui::{Button, ButtonVariant, SelectField};
use crate::shared::components::{CellValue, ColumnKind, DataTable, TableColumn};
use crate::shared::dialogs::BrowserDialogs;

pub type StockScreen = StockController<StockEndpoints, RwSignal<StockState>, BrowserDialogs>;

fn format_amount(value: Option<&CellValue>) -> String {
    match value.and_then(CellValue::as_f64) {
        Some(amount) => format!("{:.2}", amount),
        None => "-".to_string(),
    }
}

fn format_alert(value: Option<&CellValue>) -> String {
    match value.and_then(CellValue::as_bool) {
        Some(true) => "⚠️ Oui".to_string(),
        Some(false) => "Non".to_string(),
        None => "-".to_string(),
    }
}

pub fn level_columns() -> Vec<TableColumn<StockLevel>> {
    vec![
        TableColumn::new("reference", "Référence", |l: &StockLevel| CellValue::non_empty(&l.reference)),
        TableColumn::new("nom", "Nom", |l: &StockLevel| CellValue::non_empty(&l.nom)),
        TableColumn::new("categorie", "Catégorie", |l: &StockLevel| {
            l.categorie.as_deref().and_then(CellValue::non_empty)
        }),
        TableColumn::new("quantiteDisponible", "Quantité", |l: &StockLevel| {
            l.quantite_disponible.map(CellValue::from)
        })
        .kind(ColumnKind::Number),
        TableColumn::new("valorisation", "Valorisation (DH)", |l: &StockLevel| l.valorisation.map(CellValue::from))
            .kind(ColumnKind::Number)
            .format(format_amount),
        TableColumn::new("pointDeCommande", "Point de Commande", |l: &StockLevel| {
            l.point_de_commande.map(CellValue::from)
        })
        .kind(ColumnKind::Number),
        TableColumn::new("enAlerte", "Alerte", |l: &StockLevel| l.en_alerte.map(CellValue::from))
            .kind(ColumnKind::Status)
            .format(format_alert),
    ]
}

pub fn alert_columns() -> Vec<TableColumn<StockAlert>> {
    vec![
        TableColumn::new("reference", "Référence", |a: &StockAlert| CellValue::non_empty(&a.reference)),
        TableColumn::new("nom", "Nom", |a: &StockAlert| CellValue::non_empty(&a.nom)),
        TableColumn::new("quantiteDisponible", "Quantité", |a: &StockAlert| {
            a.quantite_disponible.map(CellValue::from)
        })
        .kind(ColumnKind::Number),
        TableColumn::new("pointDeCommande", "Point de Commande", |a: &StockAlert| {
            a.point_de_commande.map(CellValue::from)
        })
        .kind(ColumnKind::Number),
    ]
}

#[component]
pub fn StockView() -> impl IntoView {
    let state = RwSignal::new(StockState::default());
    let ctl: StockScreen = StockController::new(StockEndpoints, state, BrowserDialogs);

    let load = move || {
        spawn_local(async move {
            ctl.refresh_levels().await;
        });
    };

    Effect::new(move |_| {
        if state.with_untracked(|s| s.levels.is_idle()) {
            load();
            spawn_local(async move {
                ctl.load_products().await;
            });
        }
    });

    let loading = Signal::derive(move || state.with(|s| s.levels.is_loading()));
    let alerts_visible = move || state.with(|s| s.alerts_visible);

    let product_options = Signal::derive(move || {
        state.with(|s| {
            s.products
                .rows
                .iter()
                .map(|p| (p.id.to_string(), format!("{} - {}", p.reference, p.nom)))
                .collect::<Vec<_>>()
        })
    });

    let lookup_fields = move || {
        state.with(|s| s.lookup.fields.clone())
            .into_iter()
            .map(|(path, value)| {
                view! {
                    <div class="stock-lookup__field">
                        <span class="stock-lookup__key">{path}</span>
                        <span class="stock-lookup__value">{value}</span>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"État du stock"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        variant=ButtonVariant::Secondary
                        on_click=Callback::new(move |_| {
                            spawn_local(async move {
                                ctl.load_valuation().await;
                            })
                        })
                    >
                        "Valorisation"
                    </Button>
                    <Button
                        variant=ButtonVariant::Secondary
                        on_click=Callback::new(move |_| {
                            if state.with_untracked(|s| s.alerts_visible) {
                                ctl.hide_alerts();
                            } else {
                                spawn_local(async move {
                                    ctl.show_alerts().await;
                                });
                            }
                        })
                    >
                        {move || if alerts_visible() { "Masquer les alertes" } else { "Alertes" }}
                    </Button>
                    <Button
                        variant=ButtonVariant::Secondary
                        disabled=loading
                        on_click=Callback::new(move |_| load())
                    >
                        "Actualiser"
                    </Button>
                </div>
            </div>

            {move || {
                state
                    .with(|s| s.valuation.clone())
                    .map(|text| view! { <div class="stock-valuation">{text}</div> })
            }}

            <div class="page__content">
                <DataTable
                    columns=level_columns()
                    rows=Signal::derive(move || state.with(|s| s.levels.rows.clone()))
                    loading=loading
                    empty_message="Aucun stock"
                />
            </div>

            <div class="stock-lookup">
                <h2 class="page__subtitle">"Stock par produit"</h2>
                <SelectField
                    label="Produit"
                    value=Signal::derive(move || state.with(|s| id_option_value(s.lookup.product_id)))
                    options=product_options
                    on_change=Callback::new(move |raw: String| {
                        let id = parse_id(&raw);
                        spawn_local(async move {
                            ctl.lookup(id).await;
                        });
                    })
                />
                <div class="stock-lookup__fields">{lookup_fields}</div>
            </div>

            <Show when=alerts_visible>
                <div class="stock-alerts">
                    <h2 class="page__subtitle">"Alertes de stock"</h2>
                    <DataTable
                        columns=alert_columns()
                        rows=Signal::derive(move || state.with(|s| s.alerts.rows.clone()))
                        loading=Signal::derive(move || state.with(|s| s.alerts.is_loading()))
                        empty_message="Aucune alerte"
                    />
                </div>
            </Show>
        </div>
    }
}
