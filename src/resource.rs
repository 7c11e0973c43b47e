//! Configurable resource client.
//!
//! A [`Resource`] is an endpoint path plus the set of HTTP verbs that path
//! accepts. Reads go straight to the request issuer; writes are routed
//! through the shared [`SafeMode`] switch.

use std::fmt;

use reqwest::Method;
use serde_json::Value;

use crate::client::NationBuilderClient;
use crate::error::{NbError, Result};
use crate::pagination::{PageWalker, ResultFormat, Results};
use crate::response::ApiResponse;
use crate::safe_mode::{Guarded, SafeMode};

/// HTTP verbs a resource accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verbs {
    pub get: bool,
    pub post: bool,
    pub put: bool,
    pub delete: bool,
}

impl Verbs {
    pub const READ_ONLY: Self = Self {
        get: true,
        post: false,
        put: false,
        delete: false,
    };

    pub const READ_WRITE: Self = Self {
        get: true,
        post: true,
        put: true,
        delete: true,
    };

    /// GET and POST only, e.g. imports and exports.
    pub const READ_CREATE: Self = Self {
        get: true,
        post: true,
        put: false,
        delete: false,
    };

    pub fn allows(&self, method: &Method) -> bool {
        match *method {
            Method::GET => self.get,
            Method::POST => self.post,
            Method::PUT => self.put,
            Method::DELETE => self.delete,
            _ => false,
        }
    }
}

/// A known NationBuilder endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Short name used on the command line.
    pub name: &'static str,
    /// Path under the API base, or under `sites/{site}/pages/` when
    /// `site_scoped` is set.
    pub path: &'static str,
    pub verbs: Verbs,
    pub site_scoped: bool,
}

impl Endpoint {
    const fn nation(name: &'static str, path: &'static str, verbs: Verbs) -> Self {
        Self {
            name,
            path,
            verbs,
            site_scoped: false,
        }
    }

    const fn site(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            verbs: Verbs::READ_WRITE,
            site_scoped: true,
        }
    }

    pub const CAMPAIGN_DATA: Self = Self::nation("campaign_data", "campaign_data", Verbs::READ_ONLY);
    pub const CONTACT_TYPES: Self =
        Self::nation("contact_types", "settings/contact_types", Verbs::READ_WRITE);
    pub const DONATIONS: Self = Self::nation("donations", "donations", Verbs::READ_WRITE);
    pub const IMPORTS: Self = Self::nation("imports", "imports", Verbs::READ_CREATE);
    pub const EXPORTS: Self = Self::nation("exports", "exports", Verbs::READ_CREATE);
    pub const LISTS: Self = Self::nation("lists", "lists", Verbs::READ_WRITE);
    pub const PATHS: Self = Self::nation("paths", "paths", Verbs::READ_WRITE);
    pub const PEOPLE: Self = Self::nation("people", "people", Verbs::READ_WRITE);
    pub const TAGS: Self = Self::nation("tags", "tags", Verbs::READ_ONLY);
    pub const PRECINCTS: Self = Self::nation("precincts", "precincts", Verbs::READ_WRITE);
    pub const SURVEY_RESPONSES: Self =
        Self::nation("survey_responses", "survey_responses", Verbs::READ_CREATE);
    pub const SITES: Self = Self::nation("sites", "sites", Verbs::READ_ONLY);

    pub const BASIC_PAGES: Self = Self::site("basic_pages", "basic_pages");
    pub const BLOGS: Self = Self::site("blogs", "blogs");
    pub const CALENDARS: Self = Self::site("calendars", "calendars");
    pub const EVENTS: Self = Self::site("events", "events");
    pub const PETITIONS: Self = Self::site("petitions", "petitions");
    pub const SURVEYS: Self = Self::site("surveys", "surveys");

    pub const ALL: &'static [Self] = &[
        Self::CAMPAIGN_DATA,
        Self::CONTACT_TYPES,
        Self::DONATIONS,
        Self::IMPORTS,
        Self::EXPORTS,
        Self::LISTS,
        Self::PATHS,
        Self::PEOPLE,
        Self::TAGS,
        Self::PRECINCTS,
        Self::SURVEY_RESPONSES,
        Self::SITES,
        Self::BASIC_PAGES,
        Self::BLOGS,
        Self::CALENDARS,
        Self::EVENTS,
        Self::PETITIONS,
        Self::SURVEYS,
    ];

    /// Look up an endpoint by its short name.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.name == name)
    }

    /// Resolve the path under the API base.
    ///
    /// # Errors
    ///
    /// Returns [`NbError::NoDefaultSite`] for a site-scoped endpoint when no
    /// site is given.
    pub fn resolve(&self, site: Option<&str>) -> Result<String> {
        if !self.site_scoped {
            return Ok(self.path.to_string());
        }
        let site = site.ok_or(NbError::NoDefaultSite)?;
        Ok(format!("sites/{site}/pages/{}", self.path))
    }
}

/// Client for one endpoint path and its verb set.
#[derive(Debug, Clone)]
pub struct Resource {
    client: NationBuilderClient,
    path: String,
    verbs: Verbs,
    safe_mode: SafeMode,
}

impl Resource {
    pub fn new(
        client: NationBuilderClient,
        path: impl Into<String>,
        verbs: Verbs,
        safe_mode: SafeMode,
    ) -> Self {
        Self {
            client,
            path: path.into().trim_matches('/').to_string(),
            verbs,
            safe_mode,
        }
    }

    /// Path under the API base.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn verbs(&self) -> Verbs {
        self.verbs
    }

    pub fn client(&self) -> &NationBuilderClient {
        &self.client
    }

    /// GET the collection (first page only).
    pub async fn index(&self, query: &[(&str, &str)]) -> Result<ApiResponse> {
        self.get("", query).await
    }

    /// GET a single record.
    pub async fn show(&self, id: impl fmt::Display) -> Result<ApiResponse> {
        self.get(&id.to_string(), &[]).await
    }

    /// GET a path below this resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is write-only or the transport fails.
    pub async fn get(&self, sub_path: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        self.check(&Method::GET)?;
        self.client
            .request(Method::GET, &self.child(sub_path), query, None)
            .await
    }

    /// GET the collection and walk every page.
    pub async fn all(&self, query: &[(&str, &str)], format: ResultFormat) -> Result<Results> {
        self.all_at("", query, format).await
    }

    /// GET a paginated path below this resource and walk every page.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails or a page is malformed.
    pub async fn all_at(
        &self,
        sub_path: &str,
        query: &[(&str, &str)],
        format: ResultFormat,
    ) -> Result<Results> {
        let first = self.get(sub_path, query).await?;
        PageWalker::new(&self.client).collect(&first, format).await
    }

    /// POST a new record to the collection.
    pub async fn create(&self, body: &Value) -> Result<Guarded<ApiResponse>> {
        self.write(Method::POST, self.child(""), Some(body)).await
    }

    /// PUT changes to a single record.
    pub async fn update(&self, id: impl fmt::Display, body: &Value) -> Result<Guarded<ApiResponse>> {
        self.write(Method::PUT, self.child(&id.to_string()), Some(body))
            .await
    }

    /// DELETE a single record.
    pub async fn destroy(&self, id: impl fmt::Display) -> Result<Guarded<ApiResponse>> {
        self.write(Method::DELETE, self.child(&id.to_string()), None)
            .await
    }

    /// POST to a path below this resource.
    pub async fn post_to(&self, sub_path: &str, body: Option<&Value>) -> Result<Guarded<ApiResponse>> {
        self.write(Method::POST, self.child(sub_path), body).await
    }

    /// PUT to a path below this resource.
    pub async fn put_to(&self, sub_path: &str, body: &Value) -> Result<Guarded<ApiResponse>> {
        self.write(Method::PUT, self.child(sub_path), Some(body)).await
    }

    /// DELETE a path below this resource.
    pub async fn delete_at(&self, sub_path: &str) -> Result<Guarded<ApiResponse>> {
        self.write(Method::DELETE, self.child(sub_path), None).await
    }

    async fn write(
        &self,
        method: Method,
        path: String,
        body: Option<&Value>,
    ) -> Result<Guarded<ApiResponse>> {
        self.check(&method)?;

        let operation = format!("{method} {path}");
        let client = &self.client;
        let path = path.as_str();
        self.safe_mode
            .guard(&operation, move || client.request(method, path, &[], body))
            .await
            .transpose()
    }

    fn check(&self, method: &Method) -> Result<()> {
        if self.verbs.allows(method) {
            Ok(())
        } else {
            Err(NbError::UnsupportedVerb {
                endpoint: self.path.clone(),
                method: method.to_string(),
            })
        }
    }

    fn child(&self, sub_path: &str) -> String {
        let sub_path = sub_path.trim_matches('/');
        if sub_path.is_empty() {
            self.path.clone()
        } else {
            format!("{}/{}", self.path, sub_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(path: &str, verbs: Verbs) -> Resource {
        let client = NationBuilderClient::new("demo", "token").unwrap();
        Resource::new(client, path, verbs, SafeMode::default())
    }

    #[test]
    fn test_verbs_allows() {
        assert!(Verbs::READ_ONLY.allows(&Method::GET));
        assert!(!Verbs::READ_ONLY.allows(&Method::DELETE));
        assert!(Verbs::READ_CREATE.allows(&Method::POST));
        assert!(!Verbs::READ_CREATE.allows(&Method::PUT));
        assert!(!Verbs::READ_WRITE.allows(&Method::PATCH));
    }

    #[test]
    fn test_child_paths() {
        let people = resource("/people/", Verbs::READ_WRITE);
        assert_eq!(people.path(), "people");
        assert_eq!(people.child(""), "people");
        assert_eq!(people.child("12/taggings"), "people/12/taggings");
        assert_eq!(people.child("/count"), "people/count");
    }

    #[test]
    fn test_endpoint_resolve() {
        assert_eq!(Endpoint::PEOPLE.resolve(None).unwrap(), "people");
        assert_eq!(
            Endpoint::CONTACT_TYPES.resolve(Some("ignored")).unwrap(),
            "settings/contact_types"
        );
        assert_eq!(
            Endpoint::EVENTS.resolve(Some("2019")).unwrap(),
            "sites/2019/pages/events"
        );
        assert!(matches!(
            Endpoint::BLOGS.resolve(None),
            Err(NbError::NoDefaultSite)
        ));
    }

    #[test]
    fn test_endpoint_by_name() {
        assert_eq!(Endpoint::by_name("survey_responses"), Some(Endpoint::SURVEY_RESPONSES));
        assert_eq!(Endpoint::by_name("nope"), None);
        assert_eq!(Endpoint::ALL.len(), 18);
    }

    #[tokio::test]
    async fn test_unsupported_verb_is_rejected_before_sending() {
        let tags = resource("tags", Verbs::READ_ONLY);
        let err = tags.destroy("volunteer").await.unwrap_err();
        match err {
            NbError::UnsupportedVerb { endpoint, method } => {
                assert_eq!(endpoint, "tags");
                assert_eq!(method, "DELETE");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_safe_mode_blocks_writes_without_network() {
        let people = resource("people", Verbs::READ_WRITE);
        let outcome = people
            .update(1, &serde_json::json!({"person": {"first_name": "Ada"}}))
            .await
            .unwrap();

        match outcome {
            Guarded::Blocked { operation } => assert_eq!(operation, "PUT people/1"),
            Guarded::Executed(_) => panic!("write ran while safe mode was active"),
        }
    }
}
