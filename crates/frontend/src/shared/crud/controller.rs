use std::future::Future;
use std::marker::PhantomData;

use contracts::domain::common::{Identified, RowId};
use contracts::shared::FieldErrors;

use super::state::{CrudState, FormMode, FormState, HasList, ListPhase};
use super::{DeleteResource, FormModel, ListResource, SubmitResource};
use crate::shared::dialogs::Dialogs;
use crate::shared::http::ApiError;
use crate::shared::state::StateCell;

/// Texts a screen shows around its CRUD operations
#[derive(Debug, Clone, Copy)]
pub struct ScreenMessages {
    /// Used in logs
    pub entity: &'static str,
    pub load_failed: &'static str,
    pub save_failed: &'static str,
    pub delete_confirm: &'static str,
    pub delete_failed: &'static str,
    pub created: Option<&'static str>,
    pub updated: Option<&'static str>,
    pub deleted: Option<&'static str>,
}

/// Texts of a one-off backend action (status transition, toggle, ...)
#[derive(Debug, Clone, Copy)]
pub struct ActionMessages {
    pub name: &'static str,
    /// Asked before anything is sent; `None` runs without asking
    pub confirm: Option<&'static str>,
    pub success: &'static str,
    pub failure: &'static str,
}

fn failure_text(context: &str, error: &ApiError) -> String {
    format!("{}\n{}", context, error)
}

/// Load one list of a screen state, unless a load is already in flight.
///
/// On failure the previous rows stay visible and exactly one notification is
/// raised.
pub async fn load_list<S, T, C, D, Fut>(cell: &C, dialogs: &D, failure: &str, fetch: Fut) -> bool
where
    S: HasList<T>,
    C: StateCell<S>,
    D: Dialogs,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    if cell.read(|s| s.list().is_loading()) {
        log::debug!("load skipped: already loading");
        return false;
    }
    reload_list::<S, T, C, D, Fut>(cell, dialogs, failure, fetch).await
}

/// Load one list even while another load is in flight.
///
/// Used after writes. Whichever load started last owns the result; an older
/// one completing afterwards is discarded.
pub async fn reload_list<S, T, C, D, Fut>(
    cell: &C,
    dialogs: &D,
    failure: &str,
    fetch: Fut,
) -> bool
where
    S: HasList<T>,
    C: StateCell<S>,
    D: Dialogs,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let mut generation = 0;
    cell.write(|s| {
        let list = s.list_mut();
        list.generation += 1;
        list.phase = ListPhase::Loading;
        generation = list.generation;
    });

    let result = fetch.await;
    if cell.read(|s| s.list().generation) != generation {
        log::debug!("load {} superseded, result dropped", generation);
        return false;
    }

    match result {
        Ok(rows) => {
            log::debug!("loaded {} rows", rows.len());
            cell.write(|s| {
                let list = s.list_mut();
                list.rows = rows;
                list.phase = ListPhase::Loaded;
                list.last_error = None;
            });
            true
        }
        Err(error) => {
            log::warn!("{}: {:?}", failure, error);
            let text = error.user_message();
            cell.write(|s| {
                let list = s.list_mut();
                list.phase = ListPhase::LoadError;
                list.last_error = Some(text);
            });
            dialogs.alert(&failure_text(failure, &error));
            false
        }
    }
}

pub struct CrudController<R, F, C, D> {
    resource: R,
    state: C,
    dialogs: D,
    messages: &'static ScreenMessages,
    _form: PhantomData<fn() -> F>,
}

impl<R: Clone, F, C: Clone, D: Clone> Clone for CrudController<R, F, C, D> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            state: self.state.clone(),
            dialogs: self.dialogs.clone(),
            messages: self.messages,
            _form: PhantomData,
        }
    }
}

impl<R: Copy, F, C: Copy, D: Copy> Copy for CrudController<R, F, C, D> {}

impl<R, F, C, D> CrudController<R, F, C, D>
where
    R: ListResource + SubmitResource<F> + DeleteResource,
    R::Row: Identified,
    F: FormModel<Row = R::Row>,
    C: StateCell<CrudState<R::Row, F>>,
    D: Dialogs,
{
    pub fn new(resource: R, state: C, dialogs: D, messages: &'static ScreenMessages) -> Self {
        Self {
            resource,
            state,
            dialogs,
            messages,
            _form: PhantomData,
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub async fn refresh(&self) -> bool {
        log::debug!("{}: refresh", self.messages.entity);
        load_list::<CrudState<R::Row, F>, R::Row, C, D, _>(
            &self.state,
            &self.dialogs,
            self.messages.load_failed,
            self.resource.list(),
        )
        .await
    }

    /// Refetch after a successful write, even over a load in flight
    async fn reload(&self) -> bool {
        log::debug!("{}: reload after write", self.messages.entity);
        reload_list::<CrudState<R::Row, F>, R::Row, C, D, _>(
            &self.state,
            &self.dialogs,
            self.messages.load_failed,
            self.resource.list(),
        )
        .await
    }

    pub fn open_create(&self) {
        self.open_with(FormMode::Create, F::default());
    }

    /// Prefill the form from the row with `id`; unknown ids leave it closed
    pub fn open_edit(&self, id: RowId) -> bool {
        let values = self
            .state
            .read(|s| s.list.find(id).map(F::from_row));
        match values {
            Some(values) => {
                self.open_with(FormMode::Edit(id), values);
                true
            }
            None => {
                log::warn!("{}: no row {} to edit", self.messages.entity, id);
                false
            }
        }
    }

    pub fn open_with(&self, mode: FormMode, values: F) {
        self.state
            .write(|s| s.form = Some(FormState::new(mode, values)));
    }

    pub fn close_form(&self) {
        self.state.write(|s| s.form = None);
    }

    /// Edit the open form; markers are recomputed once the form is touched
    pub fn update_form(&self, edit: impl FnOnce(&mut F)) {
        self.state.write(|s| {
            if let Some(form) = s.form.as_mut() {
                edit(&mut form.values);
                if form.touched {
                    form.errors = form.values.validate();
                }
            }
        });
    }

    /// Validate locally, send, then close and refetch on success.
    ///
    /// Invalid forms never reach the network. A refused submission keeps the
    /// form open with the backend's field markers.
    pub async fn submit(&self) -> bool {
        let pending = self.state.read(|s| {
            s.form
                .as_ref()
                .filter(|f| !f.is_submitting)
                .map(|f| (f.mode, f.values.clone()))
        });
        let Some((mode, values)) = pending else {
            return false;
        };

        let errors = values.validate();
        if !errors.is_empty() {
            log::debug!(
                "{}: {} invalid field(s), not sent",
                self.messages.entity,
                errors.len()
            );
            self.state.write(|s| {
                if let Some(form) = s.form.as_mut() {
                    form.errors = errors;
                    form.touched = true;
                }
            });
            return false;
        }

        self.state.write(|s| {
            if let Some(form) = s.form.as_mut() {
                form.is_submitting = true;
                form.errors = FieldErrors::new();
                form.submit_error = None;
            }
        });

        match self.resource.submit(mode, &values).await {
            Ok(()) => {
                log::info!("{}: saved ({:?})", self.messages.entity, mode);
                self.close_form();
                let announce = match mode {
                    FormMode::Create => self.messages.created,
                    FormMode::Edit(_) => self.messages.updated,
                };
                if let Some(text) = announce {
                    self.dialogs.alert(text);
                }
                self.reload().await;
                true
            }
            Err(error) => {
                let text = error.user_message();
                let fields = error.field_errors().cloned().unwrap_or_default();
                self.state.write(|s| {
                    if let Some(form) = s.form.as_mut() {
                        form.is_submitting = false;
                        form.touched = true;
                        form.errors = fields;
                        form.submit_error = Some(text);
                    }
                });
                self.dialogs
                    .alert(&failure_text(self.messages.save_failed, &error));
                false
            }
        }
    }

    /// Delete after explicit confirmation; refused confirmation sends nothing
    pub async fn delete(&self, id: RowId) -> bool {
        if !self.dialogs.confirm(self.messages.delete_confirm) {
            log::debug!("{}: delete {} cancelled", self.messages.entity, id);
            return false;
        }

        match self.resource.delete(id).await {
            Ok(()) => {
                log::info!("{}: deleted {}", self.messages.entity, id);
                if let Some(text) = self.messages.deleted {
                    self.dialogs.alert(text);
                }
                self.reload().await;
                true
            }
            Err(error) => {
                self.dialogs
                    .alert(&failure_text(self.messages.delete_failed, &error));
                false
            }
        }
    }

    /// Confirm, run a one-off action, then refetch and announce success.
    ///
    /// `call` receives the dialogs so it can ask for extra input after the
    /// confirmation. Legality of the action is left to the backend.
    pub async fn run_action<Fut>(
        &self,
        action: &ActionMessages,
        call: impl FnOnce(&D) -> Fut,
    ) -> bool
    where
        Fut: Future<Output = Result<(), ApiError>>,
    {
        if let Some(question) = action.confirm {
            if !self.dialogs.confirm(question) {
                log::debug!("{}: {} cancelled", self.messages.entity, action.name);
                return false;
            }
        }

        match call(&self.dialogs).await {
            Ok(()) => {
                log::info!("{}: {} done", self.messages.entity, action.name);
                self.reload().await;
                self.dialogs.alert(action.success);
                true
            }
            Err(error) => {
                self.dialogs.alert(&failure_text(action.failure, &error));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::crud::testing::FakeResource;
    use crate::shared::crud::{ListState, ScreenPhase};
    use crate::shared::dialogs::testing::RecordingDialogs;
    use contracts::shared::{FieldSpec, ValidationRules};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: RowId,
        name: String,
    }

    impl Identified for Item {
        fn row_id(&self) -> RowId {
            self.id
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct ItemForm {
        name: String,
    }

    const NAME: FieldSpec = FieldSpec::new("name", "Nom", ValidationRules::required());

    impl FormModel for ItemForm {
        type Row = Item;

        fn from_row(row: &Item) -> Self {
            Self {
                name: row.name.clone(),
            }
        }

        fn validate(&self) -> FieldErrors {
            let mut errors = FieldErrors::new();
            errors.check_text(&NAME, &self.name);
            errors
        }
    }

    static MESSAGES: ScreenMessages = ScreenMessages {
        entity: "item",
        load_failed: "Erreur lors du chargement",
        save_failed: "Erreur lors de l'enregistrement",
        delete_confirm: "Supprimer ?",
        delete_failed: "Erreur lors de la suppression",
        created: None,
        updated: Some("Modifié"),
        deleted: None,
    };

    type Cell = Rc<RefCell<CrudState<Item, ItemForm>>>;
    type Fake = Rc<FakeResource<Item, ItemForm>>;

    fn setup(
        dialogs: RecordingDialogs,
    ) -> (
        CrudController<Fake, ItemForm, Cell, Rc<RecordingDialogs>>,
        Fake,
        Rc<RecordingDialogs>,
    ) {
        let fake = FakeResource::new();
        let dialogs = Rc::new(dialogs);
        let cell: Cell = Rc::new(RefCell::new(CrudState::default()));
        let ctl = CrudController::new(fake.clone(), cell, dialogs.clone(), &MESSAGES);
        (ctl, fake, dialogs)
    }

    fn item(id: RowId, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_edit_prefills_from_row() {
        let (ctl, fake, _) = setup(RecordingDialogs::accepting());
        fake.queue_list(Ok(vec![item(1, "Coton"), item(2, "Lin")]));
        block_on(ctl.refresh());

        assert!(ctl.open_edit(2));
        let form = ctl.state().read(|s| s.form.clone()).unwrap();
        assert_eq!(form.mode, FormMode::Edit(2));
        assert_eq!(form.values.name, "Lin");
        assert!(!ctl.open_edit(99));
    }

    #[test]
    fn test_update_announces_and_refetches() {
        let (ctl, fake, dialogs) = setup(RecordingDialogs::accepting());
        fake.queue_list(Ok(vec![item(1, "Coton")]));
        block_on(ctl.refresh());

        ctl.open_edit(1);
        ctl.update_form(|f| f.name = "Coton bio".into());
        assert!(block_on(ctl.submit()));

        let submits = fake.submits.borrow();
        assert_eq!(submits.len(), 1);
        assert_eq!(submits[0].0, FormMode::Edit(1));
        assert_eq!(submits[0].1.name, "Coton bio");
        assert_eq!(fake.list_calls.get(), 2);
        assert_eq!(*dialogs.alerts.borrow(), vec!["Modifié".to_string()]);
        assert_eq!(ctl.state().read(|s| s.phase()), ScreenPhase::Loaded);
    }

    #[test]
    fn test_refused_submit_keeps_form_with_markers() {
        let (ctl, fake, dialogs) = setup(RecordingDialogs::accepting());
        *fake.submit_result.borrow_mut() = Err(ApiError::from_status(
            409,
            r#"{"message":"Doublon","errors":{"name":"Nom déjà utilisé"}}"#,
        ));

        ctl.open_create();
        ctl.update_form(|f| f.name = "Coton".into());
        assert!(!block_on(ctl.submit()));

        let form = ctl.state().read(|s| s.form.clone()).unwrap();
        assert!(!form.is_submitting);
        assert_eq!(form.visible_error("name").as_deref(), Some("Nom déjà utilisé"));
        assert_eq!(form.submit_error.as_deref(), Some("Doublon"));
        assert_eq!(fake.list_calls.get(), 0);
        assert_eq!(dialogs.alert_count(), 1);
    }

    #[test]
    fn test_local_validation_never_reaches_network() {
        let (ctl, fake, dialogs) = setup(RecordingDialogs::accepting());
        ctl.open_create();
        assert!(!block_on(ctl.submit()));

        assert!(fake.submits.borrow().is_empty());
        assert_eq!(dialogs.alert_count(), 0);
        let form = ctl.state().read(|s| s.form.clone()).unwrap();
        assert!(form.touched);
        assert!(form.visible_error("name").is_some());

        ctl.update_form(|f| f.name = "ok".into());
        let form = ctl.state().read(|s| s.form.clone()).unwrap();
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_refresh_skipped_while_loading() {
        let (ctl, fake, _) = setup(RecordingDialogs::accepting());
        ctl.state()
            .write(|s| s.list.phase = ListPhase::Loading);
        assert!(!block_on(ctl.refresh()));
        assert_eq!(fake.list_calls.get(), 0);
    }

    #[test]
    fn test_writes_refetch_over_a_load_in_flight() {
        let (ctl, fake, _) = setup(RecordingDialogs::accepting());
        ctl.state().write(|s| s.list.phase = ListPhase::Loading);
        fake.queue_list(Ok(vec![item(1, "Coton")]));

        ctl.open_create();
        ctl.update_form(|f| f.name = "Coton".into());
        assert!(block_on(ctl.submit()));
        assert_eq!(fake.submits.borrow().len(), 1);
        assert_eq!(fake.list_calls.get(), 1);
        assert_eq!(ctl.state().read(|s| s.list.rows.len()), 1);

        ctl.state().write(|s| s.list.phase = ListPhase::Loading);
        assert!(block_on(ctl.delete(1)));
        assert_eq!(fake.list_calls.get(), 2);
        assert_eq!(ctl.state().read(|s| s.list.phase), ListPhase::Loaded);
    }

    #[test]
    fn test_older_load_cannot_overwrite_newer_rows() {
        let cell: Rc<RefCell<ListState<Item>>> = Rc::new(RefCell::new(ListState::default()));
        let dialogs = RecordingDialogs::accepting();

        // the refetch after a write completes while the first load still waits
        let first = async {
            reload_list::<ListState<Item>, Item, _, _, _>(&cell, &dialogs, "Erreur", async {
                Ok::<_, ApiError>(vec![item(1, "Coton"), item(2, "Lin")])
            })
            .await;
            Ok::<_, ApiError>(vec![item(1, "Coton")])
        };
        assert!(!block_on(load_list::<ListState<Item>, Item, _, _, _>(
            &cell, &dialogs, "Erreur", first
        )));

        let list = cell.borrow().clone();
        assert_eq!(list.rows.len(), 2);
        assert_eq!(list.phase, ListPhase::Loaded);
        assert_eq!(dialogs.alert_count(), 0);
    }

    #[test]
    fn test_delete_failure_keeps_rows() {
        let (ctl, fake, dialogs) = setup(RecordingDialogs::accepting());
        fake.queue_list(Ok(vec![item(1, "Coton")]));
        block_on(ctl.refresh());
        *fake.delete_result.borrow_mut() = Err(ApiError::from_status(403, ""));

        assert!(!block_on(ctl.delete(1)));
        assert_eq!(*fake.deletes.borrow(), vec![1]);
        assert_eq!(ctl.state().read(|s| s.list.rows.len()), 1);
        assert_eq!(fake.list_calls.get(), 1);
        assert!(dialogs.alerts.borrow()[0].contains("permission insuffisante"));
    }

    #[test]
    fn test_action_confirm_then_refresh_then_announce() {
        static VALIDATE: ActionMessages = ActionMessages {
            name: "valider",
            confirm: Some("Valider ?"),
            success: "Validé",
            failure: "Échec",
        };

        let (ctl, fake, dialogs) = setup(RecordingDialogs::accepting());
        let calls = RefCell::new(0);
        assert!(block_on(ctl.run_action(&VALIDATE, |_| {
            *calls.borrow_mut() += 1;
            async { Ok::<(), ApiError>(()) }
        })));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(fake.list_calls.get(), 1);
        assert_eq!(*dialogs.confirms.borrow(), vec!["Valider ?".to_string()]);
        assert_eq!(*dialogs.alerts.borrow(), vec!["Validé".to_string()]);

        let (ctl, fake, dialogs) = setup(RecordingDialogs::refusing());
        assert!(!block_on(ctl.run_action(&VALIDATE, |_| {
            *calls.borrow_mut() += 1;
            async { Ok::<(), ApiError>(()) }
        })));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(fake.list_calls.get(), 0);
        assert_eq!(dialogs.alert_count(), 0);
    }
}
