//! Client self-service pages
//!
//! Reduced surfaces for signed-in readers: browse the catalog, create book
//! requests, review their own loans and fines. Browsing pages carry no
//! create/update forms; the listing endpoints already scope results to the
//! caller.

use serde_json::Value;

use crate::crud::{Column, CrudPage, Field, PageConfig, Row, Rule, Schema, SelectOption};
use crate::error::AppResult;

use super::{date_cell, money_cell, PageContext};

fn format_price(row: &Row) -> String {
    money_cell(row, "price")
}

fn format_authors(row: &Row) -> String {
    row.get("authors")
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

fn format_due_date(row: &Row) -> String {
    date_cell(row, "dueDate")
}

fn format_amount(row: &Row) -> String {
    money_cell(row, "amount")
}

fn format_request_date(row: &Row) -> String {
    date_cell(row, "requestDate")
}

pub async fn books_page(ctx: &PageContext) -> AppResult<CrudPage> {
    let categories = ctx
        .named_options("categories/options", "categories", "name")
        .await?;

    let mut config = PageConfig::new("client/books", "Book catalog");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("title", "Title").width(300).flex(),
        Column::new("authors", "Authors").width(200).format(format_authors),
        Column::new("price", "Price").width(100).format(format_price),
        Column::new("numberOfCopiesAvailable", "Available").width(100),
    ];

    config.view_fields = vec![
        Field::textarea("title", "Title").read_only().col_span(12),
        Field::number("price", "Price").read_only().col_span(6),
        Field::textarea("description", "Description").read_only().col_span(12),
    ];

    config.filter_fields = vec![
        Field::text("title", "Title").col_span(6),
        Field::select("categoryId", "Category", categories).col_span(6),
    ];

    Ok(CrudPage::new(
        config,
        ctx.service("client/books"),
        ctx.list.page_size,
    ))
}

pub fn book_loans_page(ctx: &PageContext) -> CrudPage {
    let mut config = PageConfig::new("client/bookLoans", "My loans");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("bookTitle", "Book").width(300).flex(),
        Column::new("dueDate", "Due on").width(120).format(format_due_date),
        Column::new("status", "Status").width(100),
    ];

    config.filter_fields = vec![Field::select(
        "status",
        "Status",
        vec![
            SelectOption::new("Borrowed", "Borrowed"),
            SelectOption::new("Returned", "Returned"),
            SelectOption::new("Overdue", "Overdue"),
        ],
    )
    .col_span(6)];

    CrudPage::new(config, ctx.service("client/bookLoans"), ctx.list.page_size)
}

pub async fn book_requests_page(ctx: &PageContext) -> AppResult<CrudPage> {
    let books = ctx
        .named_options("client-books/options", "client/books", "title")
        .await?;

    let mut config = PageConfig::new("client/bookRequests", "My requests");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("bookTitle", "Book").width(300).flex(),
        Column::new("requestDate", "Requested on")
            .width(130)
            .format(format_request_date),
        Column::new("status", "Status").width(100),
    ];

    config.create_fields = vec![
        Field::select("bookId", "Book", books).required().col_span(12),
        Field::textarea("note", "Note").col_span(12),
    ];

    config.view_fields = vec![
        Field::text("bookTitle", "Book").read_only().col_span(12),
        Field::text("status", "Status").read_only().col_span(6),
        Field::textarea("note", "Note").read_only().col_span(12),
    ];

    config.create_schema =
        Schema::new().field("bookId", vec![Rule::Required("Book is required")]);

    Ok(CrudPage::new(
        config,
        ctx.service("client/bookRequests"),
        ctx.list.page_size,
    ))
}

pub fn fines_page(ctx: &PageContext) -> CrudPage {
    let mut config = PageConfig::new("client/fines", "My fines");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("bookTitle", "Book").width(300).flex(),
        Column::new("amount", "Amount").width(120).format(format_amount),
        Column::new("reason", "Reason").flex(),
        Column::new("status", "Status").width(100),
    ];

    config.filter_fields = vec![Field::select(
        "status",
        "Status",
        vec![
            SelectOption::new("Unpaid", "Unpaid"),
            SelectOption::new("Paid", "Paid"),
        ],
    )
    .col_span(6)];

    CrudPage::new(config, ctx.service("client/fines"), ctx.list.page_size)
}
