//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use serde_json::{json, Value};

use crate::Item;

/// Site slug used for page-type endpoints in the default scenario.
pub const DEFAULT_SITE: &str = "main";

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// Complete test scenario with interrelated data.
pub struct DefaultScenario {
    /// (path, items) pairs served as paginated collections.
    pub collections: Vec<(String, Vec<Item>)>,
    /// (path, document) pairs served as single records.
    pub records: Vec<(String, Value)>,
}

impl Fixtures {
    // =========================================================================
    // People Fixtures
    // =========================================================================

    /// Create a person record.
    pub fn person(id: u64, first_name: &str, email: &str) -> Item {
        item(json!({
            "id": id,
            "first_name": first_name,
            "email": email,
            "tags": [],
        }))
    }

    /// Create `count` people with ids 1..=count.
    pub fn people(count: u64) -> Vec<Item> {
        (1..=count)
            .map(|id| Self::person(id, &format!("Person {id}"), &format!("person{id}@example.com")))
            .collect()
    }

    // =========================================================================
    // Site Fixtures
    // =========================================================================

    /// Create a site record.
    pub fn site(id: u64, name: &str, slug: &str) -> Item {
        item(json!({
            "id": id,
            "name": name,
            "slug": slug,
            "domain": format!("{slug}.example.com"),
        }))
    }

    // =========================================================================
    // Other Fixtures
    // =========================================================================

    /// Create a tag record.
    pub fn tag(name: &str) -> Item {
        item(json!({ "name": name }))
    }

    /// Create an event record.
    pub fn event(id: u64, name: &str, start_time: &str) -> Item {
        item(json!({
            "id": id,
            "name": name,
            "status": "published",
            "start_time": start_time,
        }))
    }

    // =========================================================================
    // Scenario Fixtures
    // =========================================================================

    /// Create a default scenario: five people, three tags, two sites and
    /// two events on the main site.
    pub fn default_scenario() -> DefaultScenario {
        let mut ada = Self::person(1, "Ada", "ada@example.com");
        ada.insert("phone".to_string(), json!("555-0100"));

        let mut people = Self::people(5);
        people[0] = ada;

        DefaultScenario {
            collections: vec![
                ("people".to_string(), people),
                (
                    "tags".to_string(),
                    vec![Self::tag("volunteer"), Self::tag("donor"), Self::tag("door knock")],
                ),
                (
                    "sites".to_string(),
                    vec![
                        Self::site(1, "Main Site", DEFAULT_SITE),
                        Self::site(2, "Campaign 2019", "2019"),
                    ],
                ),
                (
                    format!("sites/{DEFAULT_SITE}/pages/events"),
                    vec![
                        Self::event(10, "Town Hall", "2026-11-01T18:00:00-05:00"),
                        Self::event(11, "Canvass", "2026-11-08T10:00:00-05:00"),
                    ],
                ),
            ],
            records: vec![
                ("people/count".to_string(), json!({ "people_count": 5 })),
                (
                    "people/me".to_string(),
                    json!({ "person": { "id": 1, "first_name": "Ada" } }),
                ),
            ],
        }
    }
}

fn item(value: Value) -> Item {
    match value {
        Value::Object(map) => map,
        _ => Item::new(),
    }
}
