//! Page requests and page metadata.
//!
//! [`prepare_page`] runs the count query for a statement and rewrites its
//! bound SQL to the requested page:
//!
//! ```ignore
//! let page = prepare_page(&conn, &statement, &bound, &PostgresDialect, PageRequest::new(2, 25)?)
//!     .await?;
//! println!("{} of {} pages", page.info.page, page.info.total_pages);
//! let rows = client.query(page.bound_sql.sql(), &params).await?;
//! ```

use crate::config::MappedStatement;
use crate::connection::Connection;
use crate::count::get_count;
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::mapping::BoundSql;
use serde::Serialize;

/// A 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    /// Page numbers start at 1. Returns error if page < 1 or per_page < 1.
    pub fn new(page: u64, per_page: u64) -> OrmResult<Self> {
        if page < 1 {
            return Err(OrmError::validation(format!("page must be >= 1, got {page}")));
        }
        if per_page < 1 {
            return Err(OrmError::validation(format!(
                "per_page must be >= 1, got {per_page}"
            )));
        }
        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

/// Position of a page within the full result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.per_page);
        Self {
            page: request.page,
            per_page: request.per_page,
            total_items,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }

    /// Whether the requested page lies past the last row.
    pub fn is_out_of_range(&self) -> bool {
        self.page > self.total_pages.max(1)
    }
}

/// Page metadata plus the bound SQL that fetches the page's rows.
#[derive(Debug, Clone)]
pub struct PreparedPage {
    pub info: PageInfo,
    pub bound_sql: BoundSql,
}

/// Count the rows of `bound_sql` and rewrite it to the requested page.
///
/// When the dialect has no paging syntax the bound SQL is returned as is.
pub async fn prepare_page<C: Connection>(
    connection: &C,
    statement: &MappedStatement,
    bound_sql: &BoundSql,
    dialect: &dyn Dialect,
    request: PageRequest,
) -> OrmResult<PreparedPage> {
    let total = get_count(
        bound_sql.sql(),
        connection,
        statement,
        bound_sql.parameter_object(),
        bound_sql,
        dialect,
    )
    .await?;
    let info = PageInfo::new(request, total.max(0) as u64);

    let bound_sql = match dialect.limit_sql(bound_sql.sql(), request.offset(), request.limit()) {
        Some(page_sql) => {
            tracing::debug!(
                target: "pgorm_paginate.sql",
                statement = statement.id(),
                total,
                sql = %statement.configuration().sql_for_log(&page_sql),
                "page sql"
            );
            bound_sql.with_sql(page_sql)
        }
        None => {
            tracing::warn!(
                target: "pgorm_paginate.sql",
                statement = statement.id(),
                dialect = dialect.name(),
                "dialect does not support limit; returning unpaged SQL"
            );
            bound_sql.clone()
        }
    };

    Ok(PreparedPage { info, bound_sql })
}
