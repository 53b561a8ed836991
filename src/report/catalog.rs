//! The fixed set of reports and the SQL behind each one.
//!
//! Article views count only successful reads: `GET` requests answered with
//! `200 OK` whose path is `/article/<slug>`. The error-rate report looks at
//! every request, whatever its path or method.

use std::fmt;

/// One of the three reports the tool can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ReportKind {
    /// The three most viewed articles.
    TopArticles,
    /// Every author with at least one article view, most viewed first.
    TopAuthors,
    /// Days on which more than 1% of requests were answered `404 NOT FOUND`.
    ErrorDays,
}

impl ReportKind {
    /// All reports, in menu order.
    pub const ALL: [ReportKind; 3] = [Self::TopArticles, Self::TopAuthors, Self::ErrorDays];

    /// Returns the catalog entry for this report.
    pub fn definition(self) -> &'static ReportDefinition {
        match self {
            Self::TopArticles => &TOP_ARTICLES,
            Self::TopAuthors => &TOP_AUTHORS,
            Self::ErrorDays => &ERROR_DAYS,
        }
    }

    /// Returns the 1-based menu position of this report.
    pub fn menu_index(self) -> usize {
        match self {
            Self::TopArticles => 1,
            Self::TopAuthors => 2,
            Self::ErrorDays => 3,
        }
    }

    /// Looks a report up by its 1-based menu position.
    pub fn from_menu_index(index: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.menu_index() == index)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().name)
    }
}

/// A catalog entry: a self-contained, unparameterized read query plus labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDefinition {
    /// Command-line name.
    pub name: &'static str,
    /// Menu label.
    pub label: &'static str,
    /// The query. Columns are printed in selection order.
    pub sql: &'static str,
}

/// Views per article title, top 3.
///
/// Ties on the view count come back in whatever order the server produces.
pub const TOP_ARTICLES_SQL: &str = r#"
SELECT articles.title, count(log.id) AS views
FROM log
JOIN articles ON log.path = '/article/' || articles.slug
WHERE log.method = 'GET'
  AND log.status = '200 OK'
  AND log.path LIKE '/article/%'
GROUP BY articles.title
ORDER BY views DESC
LIMIT 3
"#;

/// Views per author name, summed over all of their articles.
///
/// The inner joins drop authors whose articles were never viewed.
pub const TOP_AUTHORS_SQL: &str = r#"
SELECT authors.name, count(log.id) AS views
FROM log
JOIN articles ON log.path = '/article/' || articles.slug
JOIN authors ON articles.author = authors.id
WHERE log.method = 'GET'
  AND log.status = '200 OK'
  AND log.path LIKE '/article/%'
GROUP BY authors.name
ORDER BY views DESC
"#;

/// Share of `404 NOT FOUND` responses per calendar day, for days above 1%.
///
/// The percentage is rounded to two places and sent back as text so the
/// scale survives (`20.00`, not `20`). An empty day resolves to `0.0`.
pub const ERROR_DAYS_SQL: &str = r#"
WITH daily AS (
    SELECT date_trunc('day', log.time) AS log_day,
           count(*) AS total,
           sum(CASE WHEN log.status = '404 NOT FOUND' THEN 1 ELSE 0 END) AS errors
    FROM log
    GROUP BY log_day
),
rates AS (
    SELECT log_day,
           COALESCE(100.0 * errors / NULLIF(total, 0), 0.0) AS error_pct
    FROM daily
)
SELECT to_char(log_day, 'YYYY-MM-DD') AS error_day,
       round(error_pct, 2)::text AS error_pct
FROM rates
WHERE rates.error_pct > 1.0
ORDER BY log_day
"#;

pub static TOP_ARTICLES: ReportDefinition = ReportDefinition {
    name: "top-articles",
    label: "Find Three Most Popular Articles of All Time",
    sql: TOP_ARTICLES_SQL,
};

pub static TOP_AUTHORS: ReportDefinition = ReportDefinition {
    name: "top-authors",
    label: "Find Most Popular Article Authors of All Time",
    sql: TOP_AUTHORS_SQL,
};

pub static ERROR_DAYS: ReportDefinition = ReportDefinition {
    name: "error-days",
    label: "Display Days Where >1% of Requests Errored Out",
    sql: ERROR_DAYS_SQL,
};
