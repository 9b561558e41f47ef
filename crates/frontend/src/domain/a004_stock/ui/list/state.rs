//! Stock screen state and its loading operations

use contracts::domain::a002_product::aggregate::Product;
use contracts::domain::a004_stock::aggregate::{flatten_fields, StockAlert, StockLevel};
use contracts::domain::common::RowId;

use crate::domain::a004_stock::api::StockApi;
use crate::shared::crud::{load_list, HasList, ListState};
use crate::shared::dialogs::Dialogs;
use crate::shared::state::StateCell;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductLookup {
    pub product_id: Option<RowId>,
    /// `(path, value)` pairs of the returned document
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockState {
    pub levels: ListState<StockLevel>,
    pub alerts: ListState<StockAlert>,
    pub alerts_visible: bool,
    pub products: ListState<Product>,
    pub lookup: ProductLookup,
    pub valuation: Option<String>,
}

impl HasList<StockLevel> for StockState {
    fn list(&self) -> &ListState<StockLevel> {
        &self.levels
    }

    fn list_mut(&mut self) -> &mut ListState<StockLevel> {
        &mut self.levels
    }
}

impl HasList<StockAlert> for StockState {
    fn list(&self) -> &ListState<StockAlert> {
        &self.alerts
    }

    fn list_mut(&mut self) -> &mut ListState<StockAlert> {
        &mut self.alerts
    }
}

impl HasList<Product> for StockState {
    fn list(&self) -> &ListState<Product> {
        &self.products
    }

    fn list_mut(&mut self) -> &mut ListState<Product> {
        &mut self.products
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StockController<A, C, D> {
    api: A,
    state: C,
    dialogs: D,
}

impl<A, C, D> StockController<A, C, D>
where
    A: StockApi,
    C: StateCell<StockState>,
    D: Dialogs,
{
    pub fn new(api: A, state: C, dialogs: D) -> Self {
        Self { api, state, dialogs }
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    pub async fn refresh_levels(&self) -> bool {
        load_list::<StockState, StockLevel, C, D, _>(
            &self.state,
            &self.dialogs,
            "Erreur lors du chargement de l'état du stock",
            self.api.levels(),
        )
        .await
    }

    pub async fn load_products(&self) -> bool {
        load_list::<StockState, Product, C, D, _>(
            &self.state,
            &self.dialogs,
            "Erreur lors du chargement des produits",
            self.api.products(),
        )
        .await
    }

    /// Show the alerts table, fetching it every time it is opened
    pub async fn show_alerts(&self) -> bool {
        self.state.write(|s| s.alerts_visible = true);
        load_list::<StockState, StockAlert, C, D, _>(
            &self.state,
            &self.dialogs,
            "Erreur lors du chargement des alertes",
            self.api.alerts(),
        )
        .await
    }

    pub fn hide_alerts(&self) {
        self.state.write(|s| s.alerts_visible = false);
    }

    pub async fn load_valuation(&self) -> bool {
        match self.api.valuation().await {
            Ok(text) => {
                log::debug!("stock valuation loaded");
                self.state.write(|s| s.valuation = Some(text.trim().to_string()));
                true
            }
            Err(error) => {
                log::warn!("stock valuation: {:?}", error);
                self.dialogs.alert(&format!(
                    "Erreur lors du chargement de la valorisation\n{}",
                    error
                ));
                false
            }
        }
    }

    /// Fetch the stock of the chosen product; no choice sends nothing
    pub async fn lookup(&self, product_id: Option<RowId>) -> bool {
        let Some(id) = product_id else {
            self.state.write(|s| s.lookup = ProductLookup::default());
            return false;
        };
        self.state.write(|s| s.lookup.product_id = Some(id));

        match self.api.product_stock(id).await {
            Ok(document) => {
                let fields = flatten_fields(&document);
                log::debug!("stock of product {}: {} fields", id, fields.len());
                self.state.write(|s| {
                    if s.lookup.product_id == Some(id) {
                        s.lookup.fields = fields;
                    }
                });
                true
            }
            Err(error) => {
                log::warn!("stock of product {}: {:?}", id, error);
                self.state.write(|s| s.lookup.fields.clear());
                self.dialogs.alert(&format!(
                    "Erreur lors du chargement du stock du produit\n{}",
                    error
                ));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::crud::ListPhase;
    use crate::shared::dialogs::testing::RecordingDialogs;
    use crate::shared::http::ApiError;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeStock {
        valuation: RefCell<Option<Result<String, ApiError>>>,
        lookups: RefCell<Vec<RowId>>,
        alert_calls: RefCell<usize>,
    }

    #[async_trait(?Send)]
    impl StockApi for Rc<FakeStock> {
        async fn levels(&self) -> Result<Vec<StockLevel>, ApiError> {
            Ok(vec![serde_json::from_value(json!({"produitId": 1, "nom": "Coton"})).unwrap()])
        }

        async fn product_stock(&self, product_id: RowId) -> Result<Value, ApiError> {
            self.lookups.borrow_mut().push(product_id);
            Ok(json!({"produitId": product_id, "lots": [{"quantite": 12}]}))
        }

        async fn alerts(&self) -> Result<Vec<StockAlert>, ApiError> {
            *self.alert_calls.borrow_mut() += 1;
            Err(ApiError::from_status(403, ""))
        }

        async fn valuation(&self) -> Result<String, ApiError> {
            self.valuation
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Ok(String::new()))
        }

        async fn products(&self) -> Result<Vec<Product>, ApiError> {
            Ok(Vec::new())
        }
    }

    type Cell = Rc<RefCell<StockState>>;

    fn setup() -> (
        StockController<Rc<FakeStock>, Cell, Rc<RecordingDialogs>>,
        Rc<FakeStock>,
        Rc<RecordingDialogs>,
    ) {
        let api = Rc::new(FakeStock::default());
        let dialogs = Rc::new(RecordingDialogs::accepting());
        let cell: Cell = Rc::new(RefCell::new(StockState::default()));
        (StockController::new(api.clone(), cell, dialogs.clone()), api, dialogs)
    }

    #[test]
    fn test_lists_load_independently() {
        let (ctl, api, dialogs) = setup();
        assert!(block_on(ctl.refresh_levels()));
        assert!(!block_on(ctl.show_alerts()));

        ctl.state().read(|s| {
            assert_eq!(s.levels.rows.len(), 1);
            assert_eq!(s.levels.phase, ListPhase::Loaded);
            assert_eq!(s.alerts.phase, ListPhase::LoadError);
            assert!(s.alerts_visible);
        });
        assert_eq!(*api.alert_calls.borrow(), 1);
        assert_eq!(dialogs.alert_count(), 1);

        ctl.hide_alerts();
        assert!(!ctl.state().read(|s| s.alerts_visible));
    }

    #[test]
    fn test_lookup_without_product_sends_nothing() {
        let (ctl, api, _) = setup();
        assert!(!block_on(ctl.lookup(None)));
        assert!(api.lookups.borrow().is_empty());

        assert!(block_on(ctl.lookup(Some(4))));
        assert_eq!(*api.lookups.borrow(), vec![4]);
        let fields = ctl.state().read(|s| s.lookup.fields.clone());
        assert!(fields.contains(&("lots[0].quantite".to_string(), "12".to_string())));
        assert!(fields.contains(&("produitId".to_string(), "4".to_string())));
    }

    #[test]
    fn test_valuation_is_plain_text() {
        let (ctl, api, dialogs) = setup();
        *api.valuation.borrow_mut() = Some(Ok("Valorisation totale: 15230.00 DH\n".into()));
        assert!(block_on(ctl.load_valuation()));
        assert_eq!(
            ctl.state().read(|s| s.valuation.clone()).as_deref(),
            Some("Valorisation totale: 15230.00 DH")
        );

        *api.valuation.borrow_mut() = Some(Err(ApiError::from_status(500, "")));
        assert!(!block_on(ctl.load_valuation()));
        assert_eq!(
            ctl.state().read(|s| s.valuation.clone()).as_deref(),
            Some("Valorisation totale: 15230.00 DH")
        );
        assert_eq!(dialogs.alert_count(), 1);
    }
}
