//! Pagination over NationBuilder's `results`/`next` convention.
//!
//! Every paginated endpoint answers with a JSON object holding a `results`
//! array and a `next` reference: an absolute path (query string included)
//! to append to the origin, or `null` once the last page is reached.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::NationBuilderClient;
use crate::error::{NbError, Result};
use crate::response::ApiResponse;
use crate::table::Table;

/// One opaque record as returned by the API.
pub type Item = Map<String, Value>;

/// A single page of results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// The items on this page, in server order.
    pub results: Vec<Item>,
    /// Reference to the following page, `None` on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

impl Page {
    /// Parse a page out of a response body.
    ///
    /// # Errors
    ///
    /// Returns [`NbError::MalformedPage`] if the body is not an object with
    /// a `results` array of objects.
    pub fn from_response(response: &ApiResponse) -> Result<Self> {
        serde_json::from_slice(response.body()).map_err(|e| NbError::MalformedPage {
            url: redact_token(response.url()),
            reason: e.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns true if the server reported another page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// All items gathered for one logical query, in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    items: Vec<Item>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    /// Append a page's items after everything gathered so far.
    pub fn extend_page(&mut self, page: Page) {
        self.items.extend(page.results);
    }

    /// Convert into a table with one column per observed field.
    #[must_use]
    pub fn to_table(&self) -> Table {
        Table::from_items(&self.items)
    }
}

impl From<Vec<Item>> for ResultSet {
    fn from(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl IntoIterator for ResultSet {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Shape in which gathered results are handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultFormat {
    /// The raw [`ResultSet`].
    #[default]
    Items,
    /// A [`Table`] built from the result set.
    Table,
}

/// Gathered results in the requested [`ResultFormat`].
#[derive(Debug, Clone)]
pub enum Results {
    Items(ResultSet),
    Table(Table),
}

impl Results {
    /// Number of items (or rows).
    pub fn len(&self) -> usize {
        match self {
            Self::Items(items) => items.len(),
            Self::Table(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Follows `next` references until the server reports the last page.
///
/// By default the walker trusts the server entirely: a server that keeps
/// returning a `next` reference (including one that cycles back to an
/// earlier page) is followed forever. Use [`PageWalker::with_max_pages`] to
/// put a ceiling on the number of pages fetched.
///
/// # Example
///
/// ```no_run
/// use nbee::{NationBuilderClient, PageWalker};
///
/// # async fn example() -> nbee::Result<()> {
/// let client = NationBuilderClient::new("my-nation", "api-key")?;
/// let first = client.get("people").await?;
/// let people = PageWalker::new(&client).walk(&first).await?;
/// println!("{} people", people.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PageWalker<'a> {
    client: &'a NationBuilderClient,
    max_pages: Option<u32>,
}

impl<'a> PageWalker<'a> {
    pub fn new(client: &'a NationBuilderClient) -> Self {
        Self {
            client,
            max_pages: None,
        }
    }

    /// Fail with [`NbError::PageLimitExceeded`] instead of fetching more
    /// than `max_pages` pages, counting the initial one.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Gather the initial page and every page after it.
    ///
    /// # Errors
    ///
    /// Returns an error if a page is malformed, a follow-up request fails,
    /// or the page cap is exceeded.
    #[tracing::instrument(skip(self, first), fields(max_pages = ?self.max_pages))]
    pub async fn walk(&self, first: &ApiResponse) -> Result<ResultSet> {
        let page = Page::from_response(first)?;
        let mut next = page.next.clone();
        let mut results = ResultSet::new();
        results.extend_page(page);
        let mut pages: u32 = 1;

        while let Some(reference) = next {
            if let Some(max_pages) = self.max_pages {
                if pages >= max_pages {
                    tracing::warn!(
                        "Reached pagination limit of {} pages, stopping",
                        max_pages
                    );
                    return Err(NbError::PageLimitExceeded { max_pages });
                }
            }

            let response = self.client.fetch_next(&reference).await?;
            tracing::info!("{}", response.rate_status());

            let page = Page::from_response(&response)?;
            next = page.next.clone();
            results.extend_page(page);
            pages = pages.saturating_add(1);
        }

        tracing::debug!(pages, items = results.len(), "pagination complete");
        Ok(results)
    }

    /// Gather every page and return it in the requested format.
    ///
    /// # Errors
    ///
    /// See [`PageWalker::walk`].
    pub async fn collect(&self, first: &ApiResponse, format: ResultFormat) -> Result<Results> {
        let results = self.walk(first).await?;
        Ok(match format {
            ResultFormat::Items => Results::Items(results),
            ResultFormat::Table => Results::Table(results.to_table()),
        })
    }
}

/// Strip the access token from a URL before it lands in an error message.
fn redact_token(url: &url::Url) -> String {
    let mut url = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "access_token")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
}
