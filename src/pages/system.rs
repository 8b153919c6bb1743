//! Role, account and staff administration pages

use crate::crud::{Column, CrudPage, Field, FieldKind, PageConfig, Rule, Schema, SelectOption};
use crate::error::AppResult;
use crate::models::principal::permissions;

use super::PageContext;

/// Grantable permission codes as picker options.
fn permission_options() -> Vec<SelectOption> {
    [
        permissions::PUBLISHER_ADMIN,
        permissions::AUTHOR_ADMIN,
        permissions::CATEGORY_ADMIN,
        permissions::BOOK_CREATE,
        permissions::BOOK_LOAN_ADMIN,
        permissions::FINE_ADMIN,
        permissions::BOOK_CLIENT,
        permissions::BOOK_LOAN_CLIENT,
        permissions::BOOK_REQUEST_CLIENT,
        permissions::FINE_CLIENT,
        permissions::USER_GET_ALL,
        permissions::ROLE_UPDATE,
        permissions::STAFF_GET_ALL,
    ]
    .into_iter()
    .map(|code| SelectOption::new(code, code))
    .collect()
}

pub fn roles_page(ctx: &PageContext) -> CrudPage {
    let mut config = PageConfig::new("roles", "Roles");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("name", "Name").width(200).flex(),
        Column::new("description", "Description").flex(),
    ];

    let fields = vec![
        Field::text("name", "Name").required().col_span(12),
        Field::textarea("description", "Description").col_span(12),
        Field::new("permissions", "Permissions", FieldKind::MultiSelect)
            .with_options(permission_options())
            .col_span(12),
    ];
    config.create_fields = fields.clone();
    config.update_fields = fields.clone();
    config.view_fields = fields;

    config.filter_fields = vec![Field::text("name", "Name").col_span(6)];

    let schema =
        || Schema::new().field("name", vec![Rule::Required("Role name is required")]);
    config.create_schema = schema();
    config.update_schema = schema();

    CrudPage::new(config, ctx.service("roles"), ctx.list.page_size)
}

pub fn accounts_page(ctx: &PageContext) -> CrudPage {
    let mut config = PageConfig::new("accounts", "Accounts");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("name", "Username").width(150),
        Column::new("fullName", "Full name").width(200).flex(),
        Column::new("email", "Email").width(200),
    ];

    config.create_fields = vec![
        Field::text("name", "Username").required().col_span(6),
        Field::text("password", "Password").required().col_span(6),
        Field::text("fullName", "Full name").col_span(6),
        Field::text("email", "Email").col_span(6),
    ];

    config.update_fields = vec![
        Field::text("fullName", "Full name").col_span(6),
        Field::text("email", "Email").col_span(6),
    ];

    config.view_fields = vec![
        Field::text("name", "Username").read_only().col_span(6),
        Field::text("fullName", "Full name").read_only().col_span(6),
        Field::text("email", "Email").read_only().col_span(6),
    ];

    config.filter_fields = vec![
        Field::text("name", "Username").col_span(6),
        Field::text("email", "Email").col_span(6),
    ];

    config.create_schema = Schema::new()
        .field(
            "name",
            vec![
                Rule::Required("Username is required"),
                Rule::MinLength(3, "Username must be at least 3 characters"),
            ],
        )
        .field(
            "password",
            vec![
                Rule::Required("Password is required"),
                Rule::MinLength(4, "Password must be at least 4 characters"),
            ],
        )
        .field("email", vec![Rule::Email("Invalid email format")]);
    config.update_schema =
        Schema::new().field("email", vec![Rule::Email("Invalid email format")]);

    CrudPage::new(config, ctx.service("accounts"), ctx.list.page_size)
}

pub async fn staffs_page(ctx: &PageContext) -> AppResult<CrudPage> {
    let roles = ctx.named_options("roles/options", "roles", "name").await?;

    let mut config = PageConfig::new("staffs", "Staff");

    config.columns = vec![
        Column::new("id", "ID").width(50),
        Column::new("name", "Username").width(150),
        Column::new("fullName", "Full name").width(200).flex(),
        Column::new("roleName", "Role").width(150),
        Column::new("email", "Email").width(200),
    ];

    config.create_fields = vec![
        Field::text("name", "Username").required().col_span(6),
        Field::text("password", "Password").required().col_span(6),
        Field::text("fullName", "Full name").col_span(6),
        Field::select("roleId", "Role", roles.clone()).required().col_span(6),
        Field::text("email", "Email").col_span(6),
    ];

    config.update_fields = vec![
        Field::text("fullName", "Full name").col_span(6),
        Field::select("roleId", "Role", roles.clone()).col_span(6),
        Field::text("email", "Email").col_span(6),
    ];

    config.view_fields = vec![
        Field::text("name", "Username").read_only().col_span(6),
        Field::text("fullName", "Full name").read_only().col_span(6),
        Field::select("roleId", "Role", roles).read_only().col_span(6),
    ];

    config.filter_fields = vec![Field::text("name", "Username").col_span(6)];

    config.create_schema = Schema::new()
        .field(
            "name",
            vec![
                Rule::Required("Username is required"),
                Rule::MinLength(3, "Username must be at least 3 characters"),
            ],
        )
        .field(
            "password",
            vec![
                Rule::Required("Password is required"),
                Rule::MinLength(4, "Password must be at least 4 characters"),
            ],
        )
        .field("roleId", vec![Rule::Required("Role is required")]);
    config.update_schema = Schema::new();

    Ok(CrudPage::new(
        config,
        ctx.service("staffs"),
        ctx.list.page_size,
    ))
}
