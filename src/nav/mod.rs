//! Permission-gated navigation model
//!
//! The admin menu is a static declarative tree of leaf entries (with a
//! target route) and group entries (with children). Visibility is decided
//! by a pure guard over the principal's granted permission codes.

pub mod menu;

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::models::principal::permissions::*;
use crate::models::PermissionCode;

pub use menu::TopNav;

/// Client-visible routes.
pub mod routes {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const BOOKS: &str = "/books";
    pub const AUTHORS: &str = "/authors";
    pub const CATEGORIES: &str = "/categories";
    pub const PUBLISHERS: &str = "/publishers";
    pub const BOOK_LOANS: &str = "/bookLoans";
    pub const FINES: &str = "/fines";
    pub const CLIENT_BOOKS: &str = "/client/books";
    pub const CLIENT_BOOK_LOANS: &str = "/client/bookLoans";
    pub const CLIENT_BOOK_REQUESTS: &str = "/client/bookRequests";
    pub const CLIENT_FINES: &str = "/client/fines";
    pub const SYSTEM_ROLES: &str = "/system/roles";
    pub const SYSTEM_ACCOUNTS: &str = "/system/accounts";
    pub const SYSTEM_STAFFS: &str = "/system/staffs";
    pub const SETTINGS_MY_ACCOUNT: &str = "/settings/my-account";
    pub const SETTINGS_CHANGE_PASSWORD: &str = "/settings/change-password";
}

/// One entry of the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Leaf {
        key: &'static str,
        title: &'static str,
        route: &'static str,
        permissions: &'static [&'static str],
    },
    Group {
        key: &'static str,
        title: &'static str,
        permissions: &'static [&'static str],
        children: Vec<NavItem>,
    },
}

impl NavItem {
    pub fn key(&self) -> &'static str {
        match self {
            NavItem::Leaf { key, .. } | NavItem::Group { key, .. } => key,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NavItem::Leaf { title, .. } | NavItem::Group { title, .. } => title,
        }
    }

    fn permissions(&self) -> &'static [&'static str] {
        match self {
            NavItem::Leaf { permissions, .. } | NavItem::Group { permissions, .. } => permissions,
        }
    }

    /// A leaf is shown iff its own check passes; a group iff its own check
    /// passes or at least one child is visible.
    pub fn is_visible(&self, granted: &HashSet<PermissionCode>) -> bool {
        match self {
            NavItem::Leaf { permissions, .. } => is_visible(granted, permissions),
            NavItem::Group {
                permissions,
                children,
                ..
            } => {
                is_visible(granted, permissions)
                    || children.iter().any(|child| child.is_visible(granted))
            }
        }
    }
}

/// Permission guard: an item with no requirement is public; otherwise any
/// one granted code from the required set suffices.
pub fn is_visible(granted: &HashSet<PermissionCode>, required: &[&str]) -> bool {
    if required.is_empty() {
        return true;
    }
    required
        .iter()
        .any(|code| granted.contains(&PermissionCode::from(*code)))
}

/// Filter a tree down to the visible entries, recursively pruning group
/// children that fail their own check.
pub fn visible_tree(items: &[NavItem], granted: &HashSet<PermissionCode>) -> Vec<NavItem> {
    items
        .iter()
        .filter(|item| item.is_visible(granted))
        .map(|item| match item {
            NavItem::Leaf { .. } => item.clone(),
            NavItem::Group {
                key,
                title,
                permissions,
                children,
            } => NavItem::Group {
                key,
                title,
                permissions,
                children: children
                    .iter()
                    .filter(|child| child.is_visible(granted))
                    .cloned()
                    .collect(),
            },
        })
        .collect()
}

fn leaf(
    key: &'static str,
    title: &'static str,
    route: &'static str,
    permissions: &'static [&'static str],
) -> NavItem {
    NavItem::Leaf {
        key,
        title,
        route,
        permissions,
    }
}

static ADMIN_MENU: Lazy<Vec<NavItem>> = Lazy::new(|| {
    vec![
        leaf("publishers", "Publishers", routes::PUBLISHERS, &[PUBLISHER_ADMIN]),
        leaf("authors", "Authors", routes::AUTHORS, &[AUTHOR_ADMIN]),
        leaf("categories", "Categories", routes::CATEGORIES, &[CATEGORY_ADMIN]),
        leaf("books", "Books", routes::BOOKS, &[BOOK_CREATE]),
        leaf("bookLoans", "Book loans", routes::BOOK_LOANS, &[BOOK_LOAN_ADMIN]),
        leaf("fines", "Fines", routes::FINES, &[FINE_ADMIN]),
        leaf("client-books", "Book catalog", routes::CLIENT_BOOKS, &[BOOK_CLIENT]),
        leaf(
            "client-loans",
            "My loans",
            routes::CLIENT_BOOK_LOANS,
            &[BOOK_LOAN_CLIENT],
        ),
        leaf(
            "client-requests",
            "My requests",
            routes::CLIENT_BOOK_REQUESTS,
            &[BOOK_REQUEST_CLIENT],
        ),
        leaf("client-fines", "My fines", routes::CLIENT_FINES, &[FINE_CLIENT]),
        NavItem::Group {
            key: "admin",
            title: "Administration",
            permissions: &[USER_GET_ALL],
            children: vec![
                leaf("roles", "Roles", routes::SYSTEM_ROLES, &[ROLE_UPDATE]),
                leaf("accounts", "Accounts", routes::SYSTEM_ACCOUNTS, &[USER_GET_ALL]),
                leaf("staffs", "Staff", routes::SYSTEM_STAFFS, &[STAFF_GET_ALL]),
            ],
        },
        NavItem::Group {
            key: "settings",
            title: "Settings",
            permissions: &[],
            children: vec![
                leaf("my-account", "My account", routes::SETTINGS_MY_ACCOUNT, &[]),
                leaf(
                    "change-password",
                    "Change password",
                    routes::SETTINGS_CHANGE_PASSWORD,
                    &[],
                ),
            ],
        },
    ]
});

/// The static administration menu.
pub fn admin_menu() -> &'static [NavItem] {
    &ADMIN_MENU
}
