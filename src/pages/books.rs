//! Books page
//!
//! The richest configuration: relation pickers for publisher, authors and
//! categories (option lists loaded from their listing endpoints), a price
//! column and a row action into copy management.

use serde_json::Value;

use crate::crud::engine::ExtendAction;
use crate::crud::{Column, CrudPage, Field, PageConfig, Row, Rule, Schema};
use crate::error::AppResult;

use super::{money_cell, PageContext};

fn format_price(row: &Row) -> String {
    money_cell(row, "price")
}

fn join_names(row: &Row, field: &str) -> String {
    row.get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn format_authors(row: &Row) -> String {
    join_names(row, "authors")
}

fn format_categories(row: &Row) -> String {
    join_names(row, "categories")
}

fn format_copies(row: &Row) -> String {
    row.get("numberOfCopiesAvailable")
        .and_then(Value::as_i64)
        .map(|n| format!("{} copies", n))
        .unwrap_or_default()
}

pub async fn page(ctx: &PageContext) -> AppResult<CrudPage> {
    let authors = ctx.named_options("authors/options", "authors", "name").await?;
    let publishers = ctx
        .named_options("publishers/options", "publishers", "name")
        .await?;
    let categories = ctx
        .named_options("categories/options", "categories", "name")
        .await?;

    let mut config = PageConfig::new("books", "Books");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("title", "Title").width(300).flex(),
        Column::new("price", "Price").width(100).format(format_price),
        Column::new("publisherName", "Publisher").width(150),
        Column::new("authors", "Authors").width(150).format(format_authors),
        Column::new("categories", "Categories")
            .width(150)
            .format(format_categories),
        Column::new("numberOfCopiesAvailable", "Copies available")
            .width(150)
            .format(format_copies),
        Column::new("description", "Description").flex(),
    ];

    config.create_fields = vec![
        Field::text("title", "Title").required().col_span(12),
        Field::number("price", "Price").required().col_span(6),
        Field::select("publisherId", "Publisher", publishers.clone())
            .required()
            .col_span(6),
        Field::multi_autocomplete("authorIds", "Authors", authors.clone())
            .required()
            .col_span(6),
        Field::multi_autocomplete("categoryIds", "Categories", categories.clone())
            .required()
            .col_span(6),
        Field::textarea("description", "Description").col_span(12),
    ];

    config.update_fields = vec![
        Field::textarea("title", "Title").required().col_span(12),
        Field::number("price", "Price").required().col_span(6),
        Field::select("publisherId", "Publisher", publishers.clone())
            .required()
            .col_span(6),
        Field::multi_autocomplete("authorIds", "Authors", authors.clone())
            .required()
            .col_span(6),
        Field::multi_autocomplete("categoryIds", "Categories", categories.clone())
            .required()
            .col_span(6),
        Field::textarea("description", "Description").col_span(12),
    ];

    // Relation editors are left out of the read-only view.
    config.view_fields = vec![
        Field::textarea("title", "Title").read_only().col_span(12),
        Field::number("price", "Price").read_only().col_span(6),
        Field::select("publisherId", "Publisher", publishers.clone())
            .read_only()
            .col_span(6),
        Field::textarea("description", "Description").read_only().col_span(12),
    ];

    config.filter_fields = vec![
        Field::text("title", "Title").col_span(6),
        Field::select("publisherId", "Publisher", publishers).col_span(6),
        Field::select("authorId", "Author", authors).col_span(6),
        Field::select("categoryId", "Category", categories).col_span(6),
    ];

    let schema = || {
        Schema::new()
            .field("title", vec![Rule::Required("Book title is required")])
            .field(
                "price",
                vec![
                    Rule::Required("Price is required"),
                    Rule::Min(0.0, "Price cannot be negative"),
                ],
            )
            .field("publisherId", vec![Rule::Required("Publisher is required")])
            .field(
                "authorIds",
                vec![
                    Rule::Required("Authors are required"),
                    Rule::NonEmpty("Pick at least one author"),
                ],
            )
            .field(
                "categoryIds",
                vec![
                    Rule::Required("Categories are required"),
                    Rule::NonEmpty("Pick at least one category"),
                ],
            )
    };
    config.create_schema = schema();
    config.update_schema = schema();

    config.extend_actions = vec![ExtendAction {
        key: "copies",
        title: "Manage copies",
        on_click: Box::new(|row| {
            row.get("id")
                .and_then(Value::as_i64)
                .map(|id| format!("/books/{}", id))
        }),
    }];

    // Dropping the filter must not leave stale category options behind.
    let cache = ctx.options.clone();
    config.on_close_filter = Some(Box::new(move || {
        cache.invalidate("categories/options");
    }));

    Ok(CrudPage::new(config, ctx.service("books"), ctx.list.page_size))
}
