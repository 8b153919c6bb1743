//! Generic CRUD page engine
//!
//! One instance drives a full list + filter + create/update/view + delete
//! workflow for a resource, given only its service handle and descriptors.
//! State lives behind a mutex that is never held across a network await;
//! every operation captures a generation counter before suspending and
//! discards its result if the page moved on in the meantime.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::error::{AppError, AppResult, FieldError};

use super::field::{Column, Field};
use super::schema::Schema;
use super::service::{ListQuery, ResourceService};
use super::{FormValues, Row};

/// Row-level action registered by a resource page; returns an optional
/// navigation intent.
pub struct ExtendAction {
    pub key: &'static str,
    pub title: &'static str,
    pub on_click: Box<dyn Fn(&Row) -> Option<String> + Send + Sync>,
}

/// Declarative configuration of one resource page.
pub struct PageConfig {
    pub name: &'static str,
    pub title: &'static str,
    pub unit_name: &'static str,
    pub columns: Vec<Column>,
    pub create_fields: Vec<Field>,
    pub update_fields: Vec<Field>,
    pub view_fields: Vec<Field>,
    pub filter_fields: Vec<Field>,
    pub create_schema: Schema,
    pub update_schema: Schema,
    pub extend_actions: Vec<ExtendAction>,
    /// Invoked when the filter form is dismissed; pages hook option-cache
    /// invalidation here.
    pub on_close_filter: Option<Box<dyn Fn() + Send + Sync>>,
}

impl PageConfig {
    pub fn new(name: &'static str, title: &'static str) -> Self {
        Self {
            name,
            title,
            unit_name: "",
            columns: Vec::new(),
            create_fields: Vec::new(),
            update_fields: Vec::new(),
            view_fields: Vec::new(),
            filter_fields: Vec::new(),
            create_schema: Schema::new(),
            update_schema: Schema::new(),
            extend_actions: Vec::new(),
            on_close_filter: None,
        }
    }
}

/// Dialog state of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    None,
    Create {
        values: FormValues,
        errors: Vec<FieldError>,
    },
    Update {
        id: i64,
        values: FormValues,
        errors: Vec<FieldError>,
    },
    View {
        id: i64,
    },
}

/// A delete awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    One(i64),
    Many(Vec<i64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

struct PageState {
    rows: Vec<Row>,
    total: i64,
    page: i64,
    page_size: i64,
    filter: FormValues,
    dialog: Dialog,
    selection: Vec<i64>,
    pending_delete: Option<PendingDelete>,
    notice: Option<Notice>,
    loading: bool,
    generation: u64,
}

pub struct CrudPage {
    pub config: PageConfig,
    service: Arc<dyn ResourceService>,
    state: Mutex<PageState>,
}

impl std::fmt::Debug for CrudPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudPage").finish_non_exhaustive()
    }
}

impl CrudPage {
    pub fn new(config: PageConfig, service: Arc<dyn ResourceService>, page_size: i64) -> Self {
        Self {
            config,
            service,
            state: Mutex::new(PageState {
                rows: Vec::new(),
                total: 0,
                page: 1,
                page_size,
                filter: FormValues::new(),
                dialog: Dialog::None,
                selection: Vec::new(),
                pending_delete: None,
                notice: None,
                loading: false,
                generation: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    /// Fetch the current page of the listing. An empty result set is valid
    /// and simply clears the rows.
    pub async fn load(&self) -> AppResult<()> {
        let (query, my_gen) = {
            let mut state = self.state();
            state.generation += 1;
            state.loading = true;
            (
                ListQuery {
                    filter: state.filter.clone(),
                    page: state.page,
                    page_size: state.page_size,
                },
                state.generation,
            )
        };

        let outcome = self.service.list(&query).await;

        let mut state = self.state();
        if state.generation != my_gen {
            // The page moved on while the request was in flight.
            return Ok(());
        }
        state.loading = false;
        match outcome {
            Ok(page) => {
                state.rows = page.data;
                state.total = page.total_count;
                Ok(())
            }
            Err(err) => absorb(&mut state, err),
        }
    }

    pub async fn set_page(&self, page: i64) -> AppResult<()> {
        self.state().page = page.max(1);
        self.load().await
    }

    /// Open the create dialog pre-filled with field defaults.
    pub fn open_create(&self) {
        let values = self
            .config
            .create_fields
            .iter()
            .filter_map(|field| {
                field
                    .default_value
                    .clone()
                    .map(|value| (field.name.to_string(), value))
            })
            .collect();
        self.state().dialog = Dialog::Create {
            values,
            errors: Vec::new(),
        };
    }

    /// Open the update dialog pre-filled from the listed row.
    pub fn open_update(&self, id: i64) {
        let mut state = self.state();
        let Some(row) = find_row(&state.rows, id).cloned() else {
            state.notice = Some(Notice::error("Record not found"));
            return;
        };
        let values = self
            .config
            .update_fields
            .iter()
            .filter_map(|field| {
                row.get(field.name)
                    .cloned()
                    .or_else(|| field.default_value.clone())
                    .map(|value| (field.name.to_string(), value))
            })
            .collect();
        state.dialog = Dialog::Update {
            id,
            values,
            errors: Vec::new(),
        };
    }

    /// Open the read-only view and return its rendered fields. The view
    /// field set may be reduced compared to edit.
    pub fn open_view(&self, id: i64) -> Option<Vec<(&'static str, String)>> {
        let mut state = self.state();
        let row = find_row(&state.rows, id).cloned()?;
        let rendered = self
            .config
            .view_fields
            .iter()
            .map(|field| {
                let value = row.get(field.name).cloned().unwrap_or(Value::Null);
                (field.label, field.display(&value))
            })
            .collect();
        state.dialog = Dialog::View { id };
        Some(rendered)
    }

    /// Set one form value in the open dialog, clearing that field's error.
    pub fn set_field(&self, name: &str, value: Value) {
        let mut state = self.state();
        if let Dialog::Create { values, errors } | Dialog::Update { values, errors, .. } =
            &mut state.dialog
        {
            values.insert(name.to_string(), value);
            errors.retain(|error| error.field != name);
        }
    }

    /// Close the open dialog; any in-flight result for it is discarded when
    /// it arrives.
    pub fn close_dialog(&self) {
        let mut state = self.state();
        state.dialog = Dialog::None;
        state.generation += 1;
    }

    /// Discard results of in-flight operations (navigating away from the
    /// page).
    pub fn invalidate(&self) {
        self.state().generation += 1;
    }

    /// Submit the open create/update dialog. Schema validation runs first
    /// and keeps the dialog open with field errors; server rejections keep
    /// it open with the server's message; success closes it and reloads the
    /// list after the mutation completed.
    pub async fn submit(&self) -> AppResult<()> {
        enum Submit {
            Create,
            Update(i64),
        }

        let (kind, values, my_gen) = {
            let mut state = self.state();
            let my_gen = state.generation;
            match &mut state.dialog {
                Dialog::Create { values, errors } => {
                    if let Err(failures) = self.config.create_schema.validate(values) {
                        *errors = failures;
                        return Ok(());
                    }
                    (Submit::Create, values.clone(), my_gen)
                }
                Dialog::Update { id, values, errors } => {
                    if let Err(failures) = self.config.update_schema.validate(values) {
                        *errors = failures;
                        return Ok(());
                    }
                    (Submit::Update(*id), values.clone(), my_gen)
                }
                _ => return Ok(()),
            }
        };

        let outcome = match kind {
            Submit::Create => self.service.create(&values).await.map(|_| "Created"),
            Submit::Update(id) => self.service.update(id, &values).await.map(|_| "Updated"),
        };

        {
            let mut state = self.state();
            if state.generation != my_gen {
                return Ok(());
            }
            match outcome {
                Ok(verb) => {
                    state.dialog = Dialog::None;
                    state.notice = Some(Notice::success(format!("{} successfully", verb)));
                }
                // The dialog stays open so the input is not lost.
                Err(err) => return absorb(&mut state, err),
            }
        }

        // Refresh only after the mutation completed, so the listing reflects
        // it.
        self.load().await
    }

    /// Stage a single-row delete; nothing is sent until confirmed.
    pub fn request_delete(&self, id: i64) {
        self.state().pending_delete = Some(PendingDelete::One(id));
    }

    /// Stage a bulk delete of the current selection.
    pub fn request_delete_selected(&self) {
        let mut state = self.state();
        if state.selection.is_empty() {
            state.notice = Some(Notice::error("No rows selected"));
            return;
        }
        state.pending_delete = Some(PendingDelete::Many(state.selection.clone()));
    }

    pub fn cancel_delete(&self) {
        self.state().pending_delete = None;
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.state().pending_delete.clone()
    }

    /// Dispatch the staged delete. On failure the rows stay intact and the
    /// error is surfaced; on success the listing and counts refresh.
    pub async fn confirm_delete(&self) -> AppResult<()> {
        let (pending, my_gen) = {
            let mut state = self.state();
            let Some(pending) = state.pending_delete.take() else {
                return Ok(());
            };
            (pending, state.generation)
        };

        let outcome = match &pending {
            PendingDelete::One(id) => self.service.delete(*id).await,
            PendingDelete::Many(ids) => self.service.delete_many(ids).await,
        };

        {
            let mut state = self.state();
            if state.generation != my_gen {
                return Ok(());
            }
            match outcome {
                Ok(()) => {
                    if matches!(pending, PendingDelete::Many(_)) {
                        state.selection.clear();
                    }
                    state.notice = Some(Notice::success("Deleted successfully"));
                }
                Err(err) => return absorb(&mut state, err),
            }
        }

        self.load().await
    }

    /// Merge submitted filter values into the list query and reload from
    /// the first page.
    pub async fn apply_filter(&self, values: FormValues) -> AppResult<()> {
        {
            let mut state = self.state();
            for (name, value) in values {
                state.filter.insert(name, value);
            }
            state.page = 1;
        }
        self.load().await
    }

    /// Clear all filters, fire the page's close-filter hook (option-cache
    /// invalidation) and reload.
    pub async fn clear_filter(&self) -> AppResult<()> {
        {
            let mut state = self.state();
            state.filter.clear();
            state.page = 1;
        }
        if let Some(hook) = &self.config.on_close_filter {
            hook();
        }
        self.load().await
    }

    pub fn toggle_select(&self, id: i64) {
        let mut state = self.state();
        if let Some(index) = state.selection.iter().position(|s| *s == id) {
            state.selection.remove(index);
        } else {
            state.selection.push(id);
        }
    }

    pub fn selection(&self) -> Vec<i64> {
        self.state().selection.clone()
    }

    /// Run a page-registered row action; returns its navigation intent.
    pub fn run_extend_action(&self, key: &str, id: i64) -> Option<String> {
        let row = find_row(&self.state().rows, id).cloned()?;
        self.config
            .extend_actions
            .iter()
            .find(|action| action.key == key)
            .and_then(|action| (action.on_click)(&row))
    }

    pub fn rows(&self) -> Vec<Row> {
        self.state().rows.clone()
    }

    pub fn total(&self) -> i64 {
        self.state().total
    }

    pub fn page(&self) -> i64 {
        self.state().page
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn filter(&self) -> FormValues {
        self.state().filter.clone()
    }

    pub fn dialog(&self) -> Dialog {
        self.state().dialog.clone()
    }

    /// Pop the pending transient notification, if any.
    pub fn take_notice(&self) -> Option<Notice> {
        self.state().notice.take()
    }
}

/// Mutation and listing failures are notification-local; only session-fatal
/// errors propagate out of the engine.
fn absorb(state: &mut PageState, err: AppError) -> AppResult<()> {
    if err.is_session_fatal() {
        return Err(err);
    }
    state.loading = false;
    state.notice = Some(Notice::error(err.to_string()));
    Ok(())
}

fn find_row(rows: &[Row], id: i64) -> Option<&Row> {
    rows.iter()
        .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
}
