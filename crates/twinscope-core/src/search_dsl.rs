/// Saved-filter query parser.
///
/// Supports the following syntax:
/// ```text
/// neural networks        → title contains every word
/// @author:goodfellow     → filter by creator name
/// #ml                    → filter by tag
/// coll:thesis            → filter by collection
/// type:book              → filter by item type
/// y:2016                 → exact year
/// y:2010-2016  y:>2010   → year range
/// has:doi  has:isbn      → existence filter
/// NOT #reviewed          → negate next token
/// ```
use crate::models::RecordCard;

/// A parsed saved-filter query.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Free-text terms, matched against the title.
    pub terms: Vec<String>,
    /// Filters extracted from DSL tokens.
    pub filters: Vec<SearchFilter>,
}

/// A single filter extracted from DSL.
#[derive(Debug, Clone)]
pub enum SearchFilter {
    Author(String),
    Tag(String),
    Collection(String),
    ItemType(String),
    Year(YearFilter),
    HasDoi,
    HasIsbn,
    HasCreators,
    Not(Box<SearchFilter>),
}

#[derive(Debug, Clone)]
pub enum YearFilter {
    Exact(i32),
    Range(i32, i32),
    GreaterThan(i32),
    LessThan(i32),
}

impl SearchQuery {
    /// Parse a DSL query string.
    pub fn parse(input: &str) -> Self {
        let mut query = SearchQuery::default();
        let mut negate_next = false;

        for token in tokenize(input) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            if token.eq_ignore_ascii_case("NOT") {
                negate_next = true;
                continue;
            }

            match parse_token(token) {
                Some(f) => {
                    let f = if negate_next {
                        SearchFilter::Not(Box::new(f))
                    } else {
                        f
                    };
                    query.filters.push(f);
                }
                None => query.terms.push(token.to_lowercase()),
            }
            negate_next = false;
        }

        query
    }

    /// Check whether a record matches every term and filter.
    pub fn matches(&self, record: &RecordCard) -> bool {
        let title = record.title().to_lowercase();
        self.terms.iter().all(|t| title.contains(t.as_str()))
            && self.filters.iter().all(|f| filter_matches(f, record))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.filters.is_empty()
    }
}

fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn parse_token(token: &str) -> Option<SearchFilter> {
    if let Some(rest) = token.strip_prefix("@author:").or_else(|| token.strip_prefix('@')) {
        return Some(SearchFilter::Author(rest.to_lowercase()));
    }

    if let Some(rest) = token.strip_prefix('#') {
        return Some(SearchFilter::Tag(rest.to_string()));
    }

    if let Some(rest) = token
        .strip_prefix("coll:")
        .or_else(|| token.strip_prefix("collection:"))
    {
        return Some(SearchFilter::Collection(rest.to_string()));
    }

    if let Some(rest) = token.strip_prefix("type:") {
        return Some(SearchFilter::ItemType(rest.to_lowercase()));
    }

    if let Some(rest) = token.strip_prefix("y:") {
        return parse_year_filter(rest).map(SearchFilter::Year);
    }

    if let Some(rest) = token.strip_prefix("has:") {
        return match rest {
            "doi" => Some(SearchFilter::HasDoi),
            "isbn" => Some(SearchFilter::HasIsbn),
            "creators" | "authors" => Some(SearchFilter::HasCreators),
            _ => None,
        };
    }

    None
}

fn parse_year_filter(s: &str) -> Option<YearFilter> {
    if let Some(rest) = s.strip_prefix(">=") {
        return rest.parse().ok().map(YearFilter::GreaterThan);
    }
    if let Some(rest) = s.strip_prefix('>') {
        return rest.parse::<i32>().ok()?.checked_add(1).map(YearFilter::GreaterThan);
    }
    if let Some(rest) = s.strip_prefix("<=") {
        return rest.parse().ok().map(YearFilter::LessThan);
    }
    if let Some(rest) = s.strip_prefix('<') {
        return rest.parse::<i32>().ok()?.checked_sub(1).map(YearFilter::LessThan);
    }

    let sep = if s.contains("..") { Some("..") } else if s.contains('-') { Some("-") } else { None };
    if let Some(sep) = sep {
        let (from, to) = s.split_once(sep)?;
        return match (from.parse(), to.parse()) {
            (Ok(from), Ok(to)) => Some(YearFilter::Range(from, to)),
            _ => None,
        };
    }

    s.parse().ok().map(YearFilter::Exact)
}

/// First run of four ASCII digits in a free-form date string.
fn record_year(record: &RecordCard) -> Option<i32> {
    let date = record.metadata.date.as_deref()?;
    let bytes = date.as_bytes();
    bytes
        .windows(4)
        .position(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|start| date[start..start + 4].parse().ok())
}

fn filter_matches(filter: &SearchFilter, record: &RecordCard) -> bool {
    match filter {
        SearchFilter::Author(name) => record
            .creators
            .iter()
            .any(|c| c.full_name().contains(name.as_str())),
        SearchFilter::Tag(tag) => record
            .organization
            .tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag)),
        SearchFilter::Collection(name) => record.organization.in_collection(name),
        SearchFilter::ItemType(item_type) => record.item_type.to_lowercase() == *item_type,
        SearchFilter::Year(yf) => match record_year(record) {
            Some(year) => match yf {
                YearFilter::Exact(y) => year == *y,
                YearFilter::Range(from, to) => year >= *from && year <= *to,
                YearFilter::GreaterThan(y) => year >= *y,
                YearFilter::LessThan(y) => year <= *y,
            },
            None => false,
        },
        SearchFilter::HasDoi => record.metadata.doi.is_some(),
        SearchFilter::HasIsbn => record.metadata.isbn.is_some(),
        SearchFilter::HasCreators => !record.creators.is_empty(),
        SearchFilter::Not(inner) => !filter_matches(inner, record),
    }
}
