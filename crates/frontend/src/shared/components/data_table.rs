//! Generic data table
//!
//! Columns are configured once with a typed accessor (or a dotted path into
//! the row's serialized form, split at construction). Cell resolution is a
//! pure function of columns and rows, rendered by [`DataTable`].

use std::sync::Arc;

use contracts::domain::common::{Identified, RowId};
use leptos::prelude::*;
use serde::Serialize;
use serde_json::Value;

/// Shown for absent values when a column has no formatter
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Text cell, absent when the text is blank
    pub fn non_empty(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| Self::Text(trimmed.to_string()))
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(true) => "Oui".to_string(),
            Self::Bool(false) => "Non".to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Type tag, used for alignment and styling only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Date,
    Status,
}

impl ColumnKind {
    fn class(&self) -> &'static str {
        match self {
            Self::Text => "data-table__cell",
            Self::Number => "data-table__cell data-table__cell--number",
            Self::Date => "data-table__cell data-table__cell--date",
            Self::Status => "data-table__cell data-table__cell--status",
        }
    }
}

pub type Accessor<T> = Arc<dyn Fn(&T) -> Option<CellValue> + Send + Sync>;
pub type Formatter = Arc<dyn Fn(Option<&CellValue>) -> String + Send + Sync>;

pub struct TableColumn<T> {
    pub key: String,
    pub label: String,
    pub kind: ColumnKind,
    accessor: Accessor<T>,
    formatter: Option<Formatter>,
}

impl<T> Clone for TableColumn<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            kind: self.kind,
            accessor: self.accessor.clone(),
            formatter: self.formatter.clone(),
        }
    }
}

impl<T> TableColumn<T> {
    /// Column backed by a typed accessor
    pub fn new<A>(key: &str, label: &str, accessor: A) -> Self
    where
        A: Fn(&T) -> Option<CellValue> + Send + Sync + 'static,
    {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: ColumnKind::Text,
            accessor: Arc::new(accessor),
            formatter: None,
        }
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// The formatter also receives absent values
    pub fn format<P>(mut self, formatter: P) -> Self
    where
        P: Fn(Option<&CellValue>) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn value(&self, row: &T) -> Option<CellValue> {
        (self.accessor)(row)
    }
}

impl<T: Serialize> TableColumn<T> {
    /// Column reading a dotted path (`role.name`) from the row's JSON form
    pub fn path(key: &str, label: &str) -> Self {
        let segments: Vec<String> = key.split('.').map(str::to_string).collect();
        Self::new(key, label, move |row: &T| {
            let value = serde_json::to_value(row).ok()?;
            lookup(&value, &segments)
        })
    }
}

fn lookup(root: &Value, segments: &[String]) -> Option<CellValue> {
    let mut current = root;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match current {
        Value::Null => None,
        Value::String(s) => Some(CellValue::Text(s.clone())),
        Value::Number(n) => n.as_f64().map(CellValue::Number),
        Value::Bool(b) => Some(CellValue::Bool(*b)),
        other => Some(CellValue::Text(other.to_string())),
    }
}

/// Text shown in one cell
pub fn resolve_cell<T>(column: &TableColumn<T>, row: &T) -> String {
    let value = column.value(row);
    match &column.formatter {
        Some(format) => format(value.as_ref()),
        None => value
            .map(|v| v.display())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub id: RowId,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Loading,
    Empty(String),
    Rows(Vec<RenderedRow>),
}

pub fn render_body<T: Identified>(
    columns: &[TableColumn<T>],
    rows: &[T],
    loading: bool,
    empty_message: &str,
) -> TableBody {
    if loading {
        return TableBody::Loading;
    }
    if rows.is_empty() {
        return TableBody::Empty(empty_message.to_string());
    }
    TableBody::Rows(
        rows.iter()
            .map(|row| RenderedRow {
                id: row.row_id(),
                cells: columns.iter().map(|c| resolve_cell(c, row)).collect(),
            })
            .collect(),
    )
}

/// Per-row action button, dispatched by `name` with the row id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableAction {
    pub name: &'static str,
    pub label: &'static str,
    pub icon: Option<&'static str>,
    pub class: Option<&'static str>,
}

impl TableAction {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            icon: None,
            class: None,
        }
    }

    pub const fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    pub const fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }
}

#[component]
pub fn DataTable<T>(
    columns: Vec<TableColumn<T>>,
    #[prop(into)] rows: Signal<Vec<T>>,
    #[prop(optional, into)] actions: Signal<Vec<TableAction>>,
    #[prop(optional, into)] loading: Signal<bool>,
    #[prop(into)] empty_message: String,
    #[prop(optional)] on_action: Option<Callback<(&'static str, RowId)>>,
) -> impl IntoView
where
    T: Identified + Clone + Send + Sync + 'static,
{
    let header_cells = columns
        .iter()
        .map(|c| view! { <th class=c.kind.class()>{c.label.clone()}</th> })
        .collect_view();
    let columns = StoredValue::new(columns);
    let column_count = columns.with_value(Vec::len);

    let body = move || {
        let current_actions = actions.get();
        let span = column_count + usize::from(!current_actions.is_empty());
        let rendered = columns.with_value(|cols| {
            rows.with(|rows| render_body(cols, rows, loading.get(), &empty_message))
        });

        match rendered {
            TableBody::Loading => view! {
                <tr>
                    <td class="data-table__loading" colspan=span>"Chargement..."</td>
                </tr>
            }
            .into_any(),
            TableBody::Empty(message) => view! {
                <tr>
                    <td class="data-table__empty" colspan=span>{message}</td>
                </tr>
            }
            .into_any(),
            TableBody::Rows(rendered) => rendered
                .into_iter()
                .map(|row| {
                    let id = row.id;
                    let kinds: Vec<ColumnKind> = columns.with_value(|c| c.iter().map(|c| c.kind).collect());
                    let cells = row
                        .cells
                        .into_iter()
                        .zip(kinds)
                        .map(|(text, kind)| view! { <td class=kind.class()>{text}</td> })
                        .collect_view();
                    let buttons = (!current_actions.is_empty()).then(|| {
                        let buttons = current_actions
                            .iter()
                            .map(|action| {
                                let name = action.name;
                                let class = format!(
                                    "data-table__action {}",
                                    action.class.unwrap_or_default()
                                );
                                view! {
                                    <button
                                        type="button"
                                        class=class
                                        title=action.label
                                        on:click=move |ev| {
                                            ev.stop_propagation();
                                            if let Some(cb) = on_action {
                                                cb.run((name, id));
                                            }
                                        }
                                    >
                                        {action.icon.unwrap_or(action.label)}
                                    </button>
                                }
                            })
                            .collect_view();
                        view! { <td class="data-table__actions">{buttons}</td> }
                    });
                    view! {
                        <tr
                            class="data-table__row"
                            on:click=move |_| log::debug!("row {} clicked", id)
                        >
                            {cells}
                            {buttons}
                        </tr>
                    }
                })
                .collect_view()
                .into_any(),
        }
    };

    view! {
        <div class="data-table">
            <table>
                <thead>
                    <tr>
                        {header_cells}
                        <Show when=move || actions.with(|a| !a.is_empty())>
                            <th class="data-table__actions">"Actions"</th>
                        </Show>
                    </tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Row {
        id: RowId,
        username: String,
        role: Option<Role>,
        stock_actuel: Option<f64>,
    }

    #[derive(Debug, Clone, Serialize)]
    struct Role {
        name: String,
    }

    impl Identified for Row {
        fn row_id(&self) -> RowId {
            self.id
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                username: "admin".into(),
                role: Some(Role { name: "ADMIN".into() }),
                stock_actuel: Some(12.0),
            },
            Row {
                id: 2,
                username: "nouveau".into(),
                role: None,
                stock_actuel: None,
            },
        ]
    }

    #[test]
    fn test_dotted_path_and_placeholder() {
        let column = TableColumn::<Row>::path("role.name", "Rôle");
        let rows = rows();
        assert_eq!(resolve_cell(&column, &rows[0]), "ADMIN");
        assert_eq!(resolve_cell(&column, &rows[1]), PLACEHOLDER);

        let missing = TableColumn::<Row>::path("role.name.first", "X");
        assert_eq!(resolve_cell(&missing, &rows[0]), PLACEHOLDER);
    }

    #[test]
    fn test_typed_accessor_and_formatter() {
        let stock = TableColumn::new("stockActuel", "Stock", |r: &Row| r.stock_actuel.map(CellValue::from))
            .kind(ColumnKind::Number);
        let rows = rows();
        assert_eq!(resolve_cell(&stock, &rows[0]), "12");
        assert_eq!(resolve_cell(&stock, &rows[1]), PLACEHOLDER);

        let formatted = stock.clone().format(|v| match v.and_then(CellValue::as_f64) {
            Some(n) => format!("{:.2} u", n),
            None => "aucun".to_string(),
        });
        assert_eq!(resolve_cell(&formatted, &rows[0]), "12.00 u");
        assert_eq!(resolve_cell(&formatted, &rows[1]), "aucun");
    }

    #[test]
    fn test_body_states() {
        let columns = vec![
            TableColumn::<Row>::path("id", "ID"),
            TableColumn::<Row>::path("username", "Username"),
        ];
        assert_eq!(render_body(&columns, &rows(), true, "Vide"), TableBody::Loading);
        assert_eq!(
            render_body::<Row>(&columns, &[], false, "Aucun utilisateur"),
            TableBody::Empty("Aucun utilisateur".into())
        );

        match render_body(&columns, &rows(), false, "Vide") {
            TableBody::Rows(rendered) => {
                assert_eq!(rendered.len(), 2);
                assert_eq!(rendered[1].id, 2);
                assert_eq!(rendered[1].cells, vec!["2".to_string(), "nouveau".to_string()]);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }
}
