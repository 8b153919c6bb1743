//! Categories page

use crate::crud::{Column, CrudPage, Field, PageConfig, Rule, Schema};

use super::PageContext;

pub fn page(ctx: &PageContext) -> CrudPage {
    let mut config = PageConfig::new("categories", "Categories");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("name", "Name").width(200).flex(),
        Column::new("description", "Description").flex(),
    ];

    let fields = vec![
        Field::text("name", "Name").required().col_span(12),
        Field::textarea("description", "Description").col_span(12),
    ];
    config.create_fields = fields.clone();
    config.update_fields = fields.clone();
    config.view_fields = fields;

    config.filter_fields = vec![Field::text("name", "Name").col_span(6)];

    config.create_schema =
        Schema::new().field("name", vec![Rule::Required("Category name is required")]);
    config.update_schema =
        Schema::new().field("name", vec![Rule::Required("Category name is required")]);

    CrudPage::new(config, ctx.service("categories"), ctx.list.page_size)
}
