//! Generic CRUD page engine and its declarative configuration model
//!
//! A resource page is data: column and field descriptors, validation
//! schemas and a [`service::ResourceService`] handle. The engine in
//! [`engine`] turns that data into the full list/filter/create/update/
//! view/delete workflow without any per-resource code.

pub mod engine;
pub mod field;
pub mod options;
pub mod schema;
pub mod service;

/// One listed record, as returned by the remote API.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Form and filter values keyed by field name, in field order.
pub type FormValues = indexmap::IndexMap<String, serde_json::Value>;

pub use engine::{CrudPage, Dialog, Notice, NoticeKind, PageConfig};
pub use field::{Column, Field, FieldKind, SelectOption};
pub use options::OptionCache;
pub use schema::{Rule, Schema};
pub use service::{HttpResourceService, ListQuery, ResourceService};
