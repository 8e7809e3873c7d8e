//! Page-number pagination: `?page=&page_size=` in, a
//! `{next, previous, count, results}` envelope out.

use serde::{Deserialize, Serialize};

use crate::config::settings;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    pub size: u32,
}

impl PageParams {
    /// Applies defaults and the configured page-size cap.
    pub fn resolve(&self) -> Page {
        let number = self.page.unwrap_or(1).max(1);
        let size = self
            .page_size
            .unwrap_or(settings().page_size)
            .clamp(1, settings().max_page_size);
        Page { number, size }
    }
}

impl Page {
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub next: Option<String>,
    pub previous: Option<String>,
    pub count: i64,
    pub results: Vec<T>,
}

fn page_url(path: &str, number: u32, size: u32) -> String {
    format!("{path}?page={number}&page_size={size}")
}

/// Wraps one page of results in the pagination envelope. `path` is the
/// request path used to build the `next`/`previous` links.
pub fn envelope<T>(path: &str, page: Page, count: i64, results: Vec<T>) -> Paginated<T> {
    let seen = i64::from(page.number) * i64::from(page.size);
    let next = if seen < count {
        Some(page_url(path, page.number + 1, page.size))
    } else {
        None
    };
    let previous = if page.number > 1 {
        Some(page_url(path, page.number - 1, page.size))
    } else {
        None
    };
    Paginated {
        next,
        previous,
        count,
        results,
    }
}
