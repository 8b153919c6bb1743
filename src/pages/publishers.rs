//! Publishers page

use regex::Regex;

use crate::crud::{Column, CrudPage, Field, PageConfig, Rule, Schema};

use super::PageContext;

pub fn page(ctx: &PageContext) -> CrudPage {
    let mut config = PageConfig::new("publishers", "Publishers");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("name", "Name").width(200).flex(),
        Column::new("address", "Address").flex(),
        Column::new("phone", "Phone").width(150),
        Column::new("email", "Email").width(200),
    ];

    let fields = vec![
        Field::text("name", "Name").required().col_span(12),
        Field::text("address", "Address").col_span(6),
        Field::text("phone", "Phone").col_span(6),
        Field::text("email", "Email").col_span(6),
    ];
    config.create_fields = fields.clone();
    config.update_fields = fields.clone();
    config.view_fields = fields;

    config.filter_fields = vec![Field::text("name", "Name").col_span(6)];

    let phone = || Regex::new(r"^\+?[0-9 .\-]{6,20}$").expect("phone pattern");
    let schema = move || {
        Schema::new()
            .field("name", vec![Rule::Required("Publisher name is required")])
            .field("email", vec![Rule::Email("Invalid email format")])
            .field("phone", vec![Rule::Pattern(phone(), "Invalid phone number")])
    };
    config.create_schema = schema();
    config.update_schema = schema();

    CrudPage::new(config, ctx.service("publishers"), ctx.list.page_size)
}
