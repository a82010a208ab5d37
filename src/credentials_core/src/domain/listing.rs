use std::cmp::Ordering;

use serde::Deserialize;

use crate::domain::account::Account;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Email,
    FirstName,
    LastName,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ListOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl ListOrder {
    /// Compares by the configured field, falling back to id so the order is total.
    pub fn compare(&self, a: &Account, b: &Account) -> Ordering {
        let ordering = match self.field {
            SortField::Email => a.email().cmp(b.email()),
            SortField::FirstName => a.first_name().cmp(b.first_name()),
            SortField::LastName => a.last_name().cmp(b.last_name()),
            SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        };
        let ordering = match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.id().cmp(&b.id()))
    }
}

/// Zero-based page index and fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Debug, Clone)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
    pub page: PageRequest,
    /// Live accounts across all pages.
    pub total: usize,
}

impl AccountPage {
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page.size)
    }

    pub fn has_more(&self) -> bool {
        self.page.page + 1 < self.page_count()
    }
}
