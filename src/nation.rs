//! Entry point tying a client, safe mode and the site directory together.

use std::collections::HashMap;
use std::path::Path;

use reqwest::StatusCode;

use crate::client::NationBuilderClient;
use crate::config::Credentials;
use crate::error::{NbError, Result};
use crate::pagination::{Item, Page, PageWalker, ResultFormat, Results};
use crate::resource::{Endpoint, Resource};
use crate::resources::{Events, Lists, People, Tags};
use crate::response::ApiResponse;
use crate::safe_mode::SafeMode;

/// One nation: the client, its safe-mode switch, the default site and the
/// directory of sites fetched with [`Nation::index_sites`].
///
/// Safe mode starts active, so every write made through resources handed
/// out by this nation is blocked until [`Nation::set_safe_mode`] turns it
/// off.
///
/// # Example
///
/// ```no_run
/// use nbee::{Nation, ResultFormat};
///
/// # async fn example() -> nbee::Result<()> {
/// let Some(mut nation) = Nation::from_file("nb_credentials.txt")? else {
///     return Ok(());
/// };
/// nation.index_sites().await?;
///
/// let first = nation.people().index(&[]).await?;
/// let everyone = nation.all_results(&first, ResultFormat::Table).await?;
/// println!("{} people", everyone.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Nation {
    client: NationBuilderClient,
    safe_mode: SafeMode,
    default_site: Option<String>,
    sites: HashMap<String, Item>,
}

impl Nation {
    pub fn new(client: NationBuilderClient, default_site: Option<String>) -> Self {
        Self {
            client,
            safe_mode: SafeMode::default(),
            default_site,
            sites: HashMap::new(),
        }
    }

    /// Build a nation from parsed credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        let client = NationBuilderClient::new(&credentials.slug, &credentials.api_key)?;
        Ok(Self::new(client, credentials.default_site.clone()))
    }

    /// Build a nation from a credentials file.
    ///
    /// Returns `Ok(None)` when the file lacks a slug or an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Option<Self>> {
        Credentials::from_file(path)?
            .map(|credentials| Self::from_credentials(&credentials))
            .transpose()
    }

    /// Build a nation from `NATIONBUILDER_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`NbError::ConfigMissing`] if the slug or API key variable is
    /// unset, or an error if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self> {
        Self::from_credentials(&Credentials::from_env()?)
    }

    /// Build a nation and fill its site directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, the sites
    /// request fails in transport, or a 200 body is not a page.
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        let mut nation = Self::from_credentials(credentials)?;
        nation.index_sites().await?;
        Ok(nation)
    }

    pub fn client(&self) -> &NationBuilderClient {
        &self.client
    }

    pub fn safe_mode(&self) -> &SafeMode {
        &self.safe_mode
    }

    /// Turn safe mode on or off for this nation and all its resources.
    pub fn set_safe_mode(&self, active: bool) {
        self.safe_mode.set(active);
    }

    pub fn default_site(&self) -> Option<&str> {
        self.default_site.as_deref()
    }

    /// Resource client for a catalogue endpoint, using the default site for
    /// site-scoped endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`NbError::NoDefaultSite`] for a site-scoped endpoint when no
    /// default site is set.
    pub fn resource(&self, endpoint: Endpoint) -> Result<Resource> {
        let path = endpoint.resolve(self.default_site())?;
        Ok(self.resource_at(path, endpoint))
    }

    /// Resource client for a catalogue endpoint under an explicit site.
    pub fn resource_for_site(&self, endpoint: Endpoint, site: &str) -> Result<Resource> {
        let path = endpoint.resolve(Some(site))?;
        Ok(self.resource_at(path, endpoint))
    }

    fn resource_at(&self, path: String, endpoint: Endpoint) -> Resource {
        Resource::new(
            self.client.clone(),
            path,
            endpoint.verbs,
            self.safe_mode.clone(),
        )
    }

    fn nation_resource(&self, endpoint: Endpoint) -> Resource {
        self.resource_at(endpoint.path.to_string(), endpoint)
    }

    pub fn people(&self) -> People {
        People::new(self.nation_resource(Endpoint::PEOPLE))
    }

    pub fn tags(&self) -> Tags {
        Tags::new(self.nation_resource(Endpoint::TAGS))
    }

    pub fn lists(&self) -> Lists {
        Lists::new(self.nation_resource(Endpoint::LISTS))
    }

    /// Events under the default site.
    pub fn events(&self) -> Result<Events> {
        Ok(Events::new(self.resource(Endpoint::EVENTS)?))
    }

    /// Events under a named site.
    pub fn events_for(&self, site: &str) -> Result<Events> {
        Ok(Events::new(self.resource_for_site(Endpoint::EVENTS, site)?))
    }

    pub async fn campaign_data(&self) -> Result<ApiResponse> {
        self.nation_resource(Endpoint::CAMPAIGN_DATA).index(&[]).await
    }

    pub async fn paths(&self) -> Result<ApiResponse> {
        self.nation_resource(Endpoint::PATHS).index(&[]).await
    }

    /// Fetch the site list and record every site under its `name`.
    ///
    /// Entries with a name already in the directory are overwritten. On a
    /// non-200 status the directory is left untouched. The response is
    /// returned either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or a 200 body is not a page.
    #[tracing::instrument(skip(self))]
    pub async fn index_sites(&mut self) -> Result<ApiResponse> {
        let response = self.client.get(Endpoint::SITES.path).await?;

        if response.status() != StatusCode::OK {
            tracing::warn!(status = response.status().as_u16(), "Sites Request Fail");
            return Ok(response);
        }

        let page = Page::from_response(&response)?;
        for site in page.results {
            let name = site.get("name").and_then(|n| n.as_str()).map(str::to_string);
            match name {
                Some(name) => {
                    self.sites.insert(name, site);
                }
                None => tracing::debug!("skipping site without a name"),
            }
        }
        tracing::info!(sites = self.sites.len(), "Sites Request Successful, Sites Loaded");

        Ok(response)
    }

    /// The site directory, keyed by site name.
    pub fn sites(&self) -> &HashMap<String, Item> {
        &self.sites
    }

    pub fn site(&self, name: &str) -> Option<&Item> {
        self.sites.get(name)
    }

    /// Make a site from the directory the default for site-scoped endpoints.
    ///
    /// The directory is fetched first if it is empty. The site's `slug`
    /// becomes the default site, falling back to its name.
    ///
    /// # Errors
    ///
    /// Returns [`NbError::UnknownSite`] if no site carries that name.
    pub async fn set_site(&mut self, name: &str) -> Result<()> {
        if self.sites.is_empty() {
            self.index_sites().await?;
        }

        let site = self
            .sites
            .get(name)
            .ok_or_else(|| NbError::UnknownSite(name.to_string()))?;
        let slug = site
            .get("slug")
            .and_then(|s| s.as_str())
            .unwrap_or(name)
            .to_string();

        tracing::info!(site = %slug, "default site set");
        self.default_site = Some(slug);
        Ok(())
    }

    /// Walk every page following `first` and return the gathered results.
    pub async fn all_results(&self, first: &ApiResponse, format: ResultFormat) -> Result<Results> {
        PageWalker::new(&self.client).collect(first, format).await
    }

    /// GET an arbitrary URL, without the auth suffix.
    pub async fn get_absolute(&self, url: &str) -> Result<ApiResponse> {
        self.client.get_absolute(url).await
    }
}
