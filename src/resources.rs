//! Resource-specific operations on top of [`Resource`].
//!
//! These wrappers only exist where an endpoint has operations beyond the
//! generic index/show/create/update/destroy set; they dereference to the
//! underlying [`Resource`].

use std::fmt;
use std::ops::Deref;

use serde_json::{json, Value};

use crate::error::Result;
use crate::resource::Resource;
use crate::response::ApiResponse;
use crate::safe_mode::Guarded;

macro_rules! resource_wrapper {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(Resource);

        impl $name {
            pub fn new(resource: Resource) -> Self {
                Self(resource)
            }

            pub fn into_inner(self) -> Resource {
                self.0
            }
        }

        impl Deref for $name {
            type Target = Resource;

            fn deref(&self) -> &Resource {
                &self.0
            }
        }
    };
}

resource_wrapper!(
    /// The People API.
    People
);

resource_wrapper!(
    /// The Tags API.
    Tags
);

resource_wrapper!(
    /// The Lists API.
    Lists
);

resource_wrapper!(
    /// Events under one site's pages.
    Events
);

impl People {
    /// GET `people/count`.
    pub async fn count(&self) -> Result<ApiResponse> {
        self.get("count", &[]).await
    }

    /// The access token owner's own record.
    pub async fn me(&self) -> Result<ApiResponse> {
        self.get("me", &[]).await
    }

    /// Find a person by email address.
    pub async fn match_email(&self, email: &str) -> Result<ApiResponse> {
        self.get("match", &[("email", email)]).await
    }

    /// Memberships held by one person.
    pub async fn memberships(&self, person_id: impl fmt::Display) -> Result<ApiResponse> {
        self.get(&format!("{person_id}/memberships"), &[]).await
    }

    /// Add a tag to a person.
    pub async fn tag_person(
        &self,
        person_id: impl fmt::Display,
        tag: &str,
    ) -> Result<Guarded<ApiResponse>> {
        let body = json!({ "tagging": { "tag": tag } });
        self.put_to(&format!("{person_id}/taggings"), &body).await
    }

    /// Remove a tag from a person.
    pub async fn untag_person(
        &self,
        person_id: impl fmt::Display,
        tag: &str,
    ) -> Result<Guarded<ApiResponse>> {
        let tag = urlencoding::encode(tag);
        self.delete_at(&format!("{person_id}/taggings/{tag}")).await
    }
}

impl Tags {
    /// People carrying a tag.
    pub async fn tag_people(&self, tag: &str) -> Result<ApiResponse> {
        let tag = urlencoding::encode(tag);
        self.get(&format!("{tag}/people"), &[]).await
    }
}

impl Lists {
    /// People on a list.
    pub async fn list_people(&self, list_id: impl fmt::Display) -> Result<ApiResponse> {
        self.get(&format!("{list_id}/people"), &[]).await
    }

    /// Add people to a list. `body` is passed through as-is, typically
    /// `{"people_ids": [..]}`.
    pub async fn add_people(
        &self,
        list_id: impl fmt::Display,
        body: Option<&Value>,
    ) -> Result<Guarded<ApiResponse>> {
        self.post_to(&format!("{list_id}/people"), body).await
    }
}

/// Filters for listing events. Unset filters are not sent.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub tags: Option<String>,
    pub starting: Option<String>,
    pub until: Option<String>,
    pub calendar_id: Option<String>,
}

impl EventQuery {
    fn pairs(&self) -> Vec<(&str, &str)> {
        [
            ("tags", &self.tags),
            ("starting", &self.starting),
            ("until", &self.until),
            ("calendar_id", &self.calendar_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

impl Events {
    /// List events (first page) matching the filters.
    pub async fn list(&self, query: &EventQuery) -> Result<ApiResponse> {
        self.index(&query.pairs()).await
    }

    /// RSVPs for one event.
    pub async fn rsvps(&self, event_id: impl fmt::Display) -> Result<ApiResponse> {
        self.get(&format!("{event_id}/rsvps"), &[]).await
    }

    /// RSVP a person to an event.
    pub async fn create_rsvp(
        &self,
        event_id: impl fmt::Display,
        body: &Value,
    ) -> Result<Guarded<ApiResponse>> {
        self.post_to(&format!("{event_id}/rsvps"), Some(body)).await
    }
}
