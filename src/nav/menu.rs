//! Top navigation state
//!
//! Headless counterpart of the admin top bar: holds the permission-filtered
//! menu, per-group open/closed state (groups are keyed independently, any
//! number may be open) and the active-route highlight. Route changes are
//! owned by the router; this type only records them.

use std::collections::HashSet;

use crate::models::{PermissionCode, Principal};

use super::{visible_tree, NavItem};

pub struct TopNav {
    items: &'static [NavItem],
    granted: HashSet<PermissionCode>,
    visible: Vec<NavItem>,
    open_groups: HashSet<&'static str>,
    active_route: String,
    recomputes: u64,
}

impl TopNav {
    pub fn new(items: &'static [NavItem]) -> Self {
        Self {
            items,
            granted: HashSet::new(),
            visible: visible_tree(items, &HashSet::new()),
            open_groups: HashSet::new(),
            active_route: String::new(),
            recomputes: 0,
        }
    }

    /// Refilter the menu for a principal. Memoized on the granted set: a
    /// principal change that grants the same codes reuses the current tree.
    pub fn set_principal(&mut self, principal: Option<&Principal>) {
        let granted = principal
            .map(|p| p.permissions.clone())
            .unwrap_or_default();
        if granted == self.granted {
            return;
        }
        self.visible = visible_tree(self.items, &granted);
        self.granted = granted;
        self.open_groups.clear();
        self.recomputes += 1;
    }

    /// The filtered menu in declaration order.
    pub fn visible(&self) -> &[NavItem] {
        &self.visible
    }

    /// Record the route the router landed on.
    pub fn set_route(&mut self, route: &str) {
        self.active_route = route.to_string();
    }

    /// A leaf is highlighted iff its route equals the current one exactly.
    pub fn is_active(&self, route: &str) -> bool {
        self.active_route == route
    }

    /// Toggle a group's menu open/closed.
    pub fn toggle_group(&mut self, key: &'static str) {
        if !self.open_groups.remove(key) {
            self.open_groups.insert(key);
        }
    }

    pub fn is_group_open(&self, key: &str) -> bool {
        self.open_groups.contains(key)
    }

    /// Select a visible leaf by key and return its route as a navigation
    /// intent. Selecting a leaf inside an open group closes that group.
    pub fn select(&mut self, key: &str) -> Option<&'static str> {
        for item in &self.visible {
            match item {
                NavItem::Leaf {
                    key: leaf_key,
                    route,
                    ..
                } if *leaf_key == key => return Some(*route),
                NavItem::Group {
                    key: group_key,
                    children,
                    ..
                } => {
                    for child in children {
                        if let NavItem::Leaf {
                            key: leaf_key,
                            route,
                            ..
                        } = child
                        {
                            if *leaf_key == key {
                                self.open_groups.remove(group_key);
                                return Some(*route);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn recomputes(&self) -> u64 {
        self.recomputes
    }
}
