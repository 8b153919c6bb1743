//! Loan and fine administration pages

use crate::crud::{Column, CrudPage, Field, FieldKind, PageConfig, Row, Rule, Schema, SelectOption};
use crate::error::AppResult;

use super::{date_cell, money_cell, PageContext};

fn format_loan_date(row: &Row) -> String {
    date_cell(row, "loanDate")
}

fn format_due_date(row: &Row) -> String {
    date_cell(row, "dueDate")
}

fn format_return_date(row: &Row) -> String {
    date_cell(row, "returnDate")
}

fn format_amount(row: &Row) -> String {
    money_cell(row, "amount")
}

fn format_created_date(row: &Row) -> String {
    date_cell(row, "createdDate")
}

pub async fn book_loans_page(ctx: &PageContext) -> AppResult<CrudPage> {
    let books = ctx.named_options("books/options", "books", "title").await?;
    let accounts = ctx
        .named_options("accounts/options", "accounts", "name")
        .await?;

    let mut config = PageConfig::new("bookLoans", "Book loans");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("bookTitle", "Book").width(250).flex(),
        Column::new("borrowerName", "Borrower").width(200),
        Column::new("loanDate", "Loaned on").width(120).format(format_loan_date),
        Column::new("dueDate", "Due on").width(120).format(format_due_date),
        Column::new("returnDate", "Returned on")
            .width(120)
            .format(format_return_date),
        Column::new("status", "Status").width(100),
    ];

    config.create_fields = vec![
        Field::select("bookId", "Book", books.clone()).required().col_span(6),
        Field::select("accountId", "Borrower", accounts.clone())
            .required()
            .col_span(6),
        Field::date("loanDate", "Loaned on").required().col_span(6),
        Field::date("dueDate", "Due on").required().col_span(6),
    ];

    config.update_fields = vec![
        Field::date("dueDate", "Due on").required().col_span(6),
        Field::date("returnDate", "Returned on").col_span(6),
        Field::select(
            "status",
            "Status",
            vec![
                SelectOption::new("Borrowed", "Borrowed"),
                SelectOption::new("Returned", "Returned"),
                SelectOption::new("Overdue", "Overdue"),
            ],
        )
        .col_span(6),
    ];

    config.view_fields = vec![
        Field::select("bookId", "Book", books).read_only().col_span(6),
        Field::select("accountId", "Borrower", accounts)
            .read_only()
            .col_span(6),
        Field::date("loanDate", "Loaned on").read_only().col_span(6),
        Field::date("dueDate", "Due on").read_only().col_span(6),
        Field::text("status", "Status").read_only().col_span(6),
    ];

    config.filter_fields = vec![
        Field::text("borrowerName", "Borrower").col_span(6),
        Field::select(
            "status",
            "Status",
            vec![
                SelectOption::new("Borrowed", "Borrowed"),
                SelectOption::new("Returned", "Returned"),
                SelectOption::new("Overdue", "Overdue"),
            ],
        )
        .col_span(6),
    ];

    config.create_schema = Schema::new()
        .field("bookId", vec![Rule::Required("Book is required")])
        .field("accountId", vec![Rule::Required("Borrower is required")])
        .field("loanDate", vec![Rule::Required("Loan date is required")])
        .field("dueDate", vec![Rule::Required("Due date is required")]);
    config.update_schema =
        Schema::new().field("dueDate", vec![Rule::Required("Due date is required")]);

    Ok(CrudPage::new(
        config,
        ctx.service("bookLoans"),
        ctx.list.page_size,
    ))
}

pub fn fines_page(ctx: &PageContext) -> CrudPage {
    let mut config = PageConfig::new("fines", "Fines");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("borrowerName", "Borrower").width(200).flex(),
        Column::new("bookTitle", "Book").width(250),
        Column::new("amount", "Amount").width(120).format(format_amount),
        Column::new("reason", "Reason").flex(),
        Column::new("status", "Status").width(100),
        Column::new("createdDate", "Issued on")
            .width(120)
            .format(format_created_date),
    ];

    config.create_fields = vec![
        Field::number("bookLoanId", "Loan").required().col_span(6),
        Field::number("amount", "Amount").required().col_span(6),
        Field::textarea("reason", "Reason").col_span(12),
    ];

    config.update_fields = vec![
        Field::number("amount", "Amount").required().col_span(6),
        Field::select(
            "status",
            "Status",
            vec![
                SelectOption::new("Unpaid", "Unpaid"),
                SelectOption::new("Paid", "Paid"),
                SelectOption::new("Waived", "Waived"),
            ],
        )
        .col_span(6),
        Field::textarea("reason", "Reason").col_span(12),
    ];

    config.view_fields = vec![
        Field::number("amount", "Amount").read_only().col_span(6),
        Field::text("status", "Status").read_only().col_span(6),
        Field::textarea("reason", "Reason").read_only().col_span(12),
        Field::new("createdDate", "Issued on", FieldKind::Label).col_span(6),
    ];

    config.filter_fields = vec![
        Field::text("borrowerName", "Borrower").col_span(6),
        Field::select(
            "status",
            "Status",
            vec![
                SelectOption::new("Unpaid", "Unpaid"),
                SelectOption::new("Paid", "Paid"),
                SelectOption::new("Waived", "Waived"),
            ],
        )
        .col_span(6),
    ];

    let schema = || {
        Schema::new()
            .field("amount", vec![
                Rule::Required("Amount is required"),
                Rule::Min(0.0, "Amount cannot be negative"),
            ])
    };
    config.create_schema = schema().field("bookLoanId", vec![Rule::Required("Loan is required")]);
    config.update_schema = schema();

    CrudPage::new(config, ctx.service("fines"), ctx.list.page_size)
}
