use chrono::NaiveDateTime;
use contracts::domain::a003_purchase_order::aggregate::{PurchaseOrder, PurchaseOrderDto, ReceptionRequest};
use contracts::domain::common::RowId;

use crate::domain::a003_purchase_order::api::OrderTransitions;
use crate::shared::crud::{
    ActionMessages, CrudController, CrudState, DeleteResource, ListResource, SubmitResource,
};
use crate::shared::dialogs::Dialogs;
use crate::shared::state::StateCell;

pub const RECEPTION_PROMPT: &str = "Observations (optionnel):";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Receive,
    Validate,
    Cancel,
}

impl Transition {
    pub fn from_action(name: &str) -> Option<Self> {
        match name {
            "receive" => Some(Self::Receive),
            "validate" => Some(Self::Validate),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    pub fn messages(&self) -> &'static ActionMessages {
        match self {
            Self::Receive => &RECEIVE,
            Self::Validate => &VALIDATE,
            Self::Cancel => &CANCEL,
        }
    }
}

static RECEIVE: ActionMessages = ActionMessages {
    name: "réception",
    confirm: Some("Confirmer la réception de cette commande ?"),
    success: "Commande réceptionnée avec succès",
    failure: "Erreur lors de la réception de la commande",
};

static VALIDATE: ActionMessages = ActionMessages {
    name: "validation",
    confirm: Some("Êtes-vous sûr de vouloir valider cette commande ?"),
    success: "Commande validée avec succès",
    failure: "Erreur lors de la validation de la commande",
};

static CANCEL: ActionMessages = ActionMessages {
    name: "annulation",
    confirm: Some("Êtes-vous sûr de vouloir annuler cette commande ?"),
    success: "Commande annulée avec succès",
    failure: "Erreur lors de l'annulation de la commande",
};

/// Local wall-clock time as the reception endpoint expects it
pub fn reception_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Confirm, then call the transition endpoint, then refetch.
///
/// Reception also asks for optional observations once confirmed; dismissing
/// that prompt sends empty observations.
pub async fn run_transition<R, C, D>(
    ctl: &CrudController<R, PurchaseOrderDto, C, D>,
    transition: Transition,
    id: RowId,
    now: NaiveDateTime,
) -> bool
where
    R: ListResource<Row = PurchaseOrder>
        + SubmitResource<PurchaseOrderDto>
        + DeleteResource
        + OrderTransitions,
    C: StateCell<CrudState<PurchaseOrder, PurchaseOrderDto>>,
    D: Dialogs,
{
    let resource = ctl.resource();
    match transition {
        Transition::Receive => {
            ctl.run_action(transition.messages(), |dialogs| {
                let body = ReceptionRequest {
                    date_reception: reception_timestamp(now),
                    observations: dialogs.prompt(RECEPTION_PROMPT, "").unwrap_or_default(),
                };
                async move { resource.receive(id, &body).await }
            })
            .await
        }
        Transition::Validate => {
            ctl.run_action(transition.messages(), |_| resource.validate(id))
                .await
        }
        Transition::Cancel => {
            ctl.run_action(transition.messages(), |_| resource.cancel(id))
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a003_purchase_order::ui::list::MESSAGES;
    use crate::shared::crud::testing::FakeResource;
    use crate::shared::crud::FormMode;
    use crate::shared::dialogs::testing::RecordingDialogs;
    use crate::shared::http::ApiError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Fake = Rc<FakeResource<PurchaseOrder, PurchaseOrderDto>>;

    /// Fake order endpoints: CRUD through [`FakeResource`], transitions recorded
    #[derive(Clone)]
    struct FakeOrders {
        crud: Fake,
        receptions: Rc<RefCell<Vec<(RowId, ReceptionRequest)>>>,
        transitions: Rc<RefCell<Vec<(&'static str, RowId)>>>,
        answer: Rc<RefCell<Result<(), ApiError>>>,
    }

    impl FakeOrders {
        fn new() -> Self {
            Self {
                crud: FakeResource::new(),
                receptions: Rc::default(),
                transitions: Rc::default(),
                answer: Rc::new(RefCell::new(Ok(()))),
            }
        }
    }

    #[async_trait(?Send)]
    impl ListResource for FakeOrders {
        type Row = PurchaseOrder;

        async fn list(&self) -> Result<Vec<PurchaseOrder>, ApiError> {
            self.crud.list().await
        }
    }

    #[async_trait(?Send)]
    impl SubmitResource<PurchaseOrderDto> for FakeOrders {
        async fn submit(&self, mode: FormMode, form: &PurchaseOrderDto) -> Result<(), ApiError> {
            self.crud.submit(mode, form).await
        }
    }

    #[async_trait(?Send)]
    impl DeleteResource for FakeOrders {
        async fn delete(&self, id: RowId) -> Result<(), ApiError> {
            self.crud.delete(id).await
        }
    }

    #[async_trait(?Send)]
    impl OrderTransitions for FakeOrders {
        async fn receive(&self, id: RowId, body: &ReceptionRequest) -> Result<(), ApiError> {
            self.receptions.borrow_mut().push((id, body.clone()));
            self.answer.borrow().clone()
        }

        async fn validate(&self, id: RowId) -> Result<(), ApiError> {
            self.transitions.borrow_mut().push(("validate", id));
            self.answer.borrow().clone()
        }

        async fn cancel(&self, id: RowId) -> Result<(), ApiError> {
            self.transitions.borrow_mut().push(("cancel", id));
            self.answer.borrow().clone()
        }
    }

    type Cell = Rc<RefCell<CrudState<PurchaseOrder, PurchaseOrderDto>>>;

    fn setup(
        dialogs: RecordingDialogs,
    ) -> (
        CrudController<FakeOrders, PurchaseOrderDto, Cell, Rc<RecordingDialogs>>,
        FakeOrders,
        Rc<RecordingDialogs>,
    ) {
        let fake = FakeOrders::new();
        let dialogs = Rc::new(dialogs);
        let cell: Cell = Rc::new(RefCell::new(CrudState::default()));
        let ctl = CrudController::new(fake.clone(), cell, dialogs.clone(), &MESSAGES);
        (ctl, fake, dialogs)
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 9)
            .and_then(|d| d.and_hms_opt(14, 5, 7))
            .unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(reception_timestamp(noon()), "2026-03-09T14:05:07");
    }

    #[test]
    fn test_receive_asks_observations_after_confirming() {
        let (ctl, fake, dialogs) = setup(RecordingDialogs {
            confirm_answer: true,
            prompt_answer: Some("Carton abîmé".into()),
            ..RecordingDialogs::default()
        });

        assert!(block_on(run_transition(&ctl, Transition::Receive, 12, noon())));
        let receptions = fake.receptions.borrow();
        assert_eq!(receptions.len(), 1);
        assert_eq!(receptions[0].0, 12);
        assert_eq!(receptions[0].1.date_reception, "2026-03-09T14:05:07");
        assert_eq!(receptions[0].1.observations, "Carton abîmé");
        assert_eq!(fake.crud.list_calls.get(), 1);
        assert_eq!(
            *dialogs.alerts.borrow(),
            vec!["Commande réceptionnée avec succès".to_string()]
        );
    }

    #[test]
    fn test_dismissed_prompt_sends_empty_observations() {
        let (ctl, fake, _) = setup(RecordingDialogs::accepting());
        assert!(block_on(run_transition(&ctl, Transition::Receive, 3, noon())));
        assert_eq!(fake.receptions.borrow()[0].1.observations, "");
    }

    #[test]
    fn test_refused_confirmation_calls_nothing() {
        let (ctl, fake, dialogs) = setup(RecordingDialogs::refusing());
        for transition in [Transition::Receive, Transition::Validate, Transition::Cancel] {
            assert!(!block_on(run_transition(&ctl, transition, 5, noon())));
        }
        assert!(fake.receptions.borrow().is_empty());
        assert!(fake.transitions.borrow().is_empty());
        assert_eq!(dialogs.confirms.borrow().len(), 3);
        assert_eq!(dialogs.alert_count(), 0);
    }

    #[test]
    fn test_backend_refusal_is_surfaced_as_returned() {
        let (ctl, fake, dialogs) = setup(RecordingDialogs::accepting());
        *fake.answer.borrow_mut() = Err(ApiError::from_status(
            400,
            r#"{"Erreur":"La commande n'est pas en attente"}"#,
        ));

        assert!(!block_on(run_transition(&ctl, Transition::Validate, 8, noon())));
        assert_eq!(*fake.transitions.borrow(), vec![("validate", 8)]);
        assert_eq!(fake.crud.list_calls.get(), 0);
        let alerts = dialogs.alerts.borrow();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("La commande n'est pas en attente"));
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Transition::from_action("cancel"), Some(Transition::Cancel));
        assert_eq!(Transition::from_action("edit"), None);
    }
}
