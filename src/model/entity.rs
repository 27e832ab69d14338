use std::fmt;
use std::str::FromStr;

use crate::error::ConsoleError;

use super::StatusField;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Feedback,
    Requirements,
    SuccessStories,
    ContactMessages,
    Websites,
    Identities,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Feedback,
        EntityKind::Requirements,
        EntityKind::SuccessStories,
        EntityKind::ContactMessages,
        EntityKind::Websites,
        EntityKind::Identities,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Feedback => "feedback",
            EntityKind::Requirements => "requirements",
            EntityKind::SuccessStories => "success-stories",
            EntityKind::ContactMessages => "contact-messages",
            EntityKind::Websites => "websites",
            EntityKind::Identities => "identities",
        }
    }

    pub fn spec(self) -> &'static EntitySpec {
        match self {
            EntityKind::Feedback => &FEEDBACK,
            EntityKind::Requirements => &REQUIREMENTS,
            EntityKind::SuccessStories => &SUCCESS_STORIES,
            EntityKind::ContactMessages => &CONTACT_MESSAGES,
            EntityKind::Websites => &WEBSITES,
            EntityKind::Identities => &IDENTITIES,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        let kind = match norm.as_str() {
            "feedback" => EntityKind::Feedback,
            "requirements" | "requirement" => EntityKind::Requirements,
            "success-stories" | "stories" | "testimonials" => EntityKind::SuccessStories,
            "contact-messages" | "messages" | "contact" => EntityKind::ContactMessages,
            "websites" | "website" | "projects" => EntityKind::Websites,
            "identities" | "users" => EntityKind::Identities,
            _ => {
                return Err(ConsoleError::UnknownEntity {
                    name: s.to_string(),
                    expected: EntityKind::ALL.map(|k| k.name()).join(", "),
                });
            }
        };
        Ok(kind)
    }
}

/// What a screen does to its local collection after a confirmed mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconcile {
    /// Patch or evict the affected rows locally.
    Patch,
    /// Patch locally, then refetch because the screen shows per-status aggregates.
    Reload,
}

/// Fields accepted by the submission form of an entity.
#[derive(Clone, Copy, Debug)]
pub struct FormSpec {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub email_field: Option<&'static str>,
    /// Visitors may submit without a credential.
    pub public: bool,
}

impl FormSpec {
    pub fn accepts(&self, field: &str) -> bool {
        self.required.contains(&field) || self.optional.contains(&field)
    }
}

/// One row of the entity table: everything a generic screen needs to know about an entity.
#[derive(Debug)]
pub struct EntitySpec {
    pub kind: EntityKind,
    pub collection: &'static str,
    pub title: &'static str,
    pub search_fields: &'static [&'static str],
    pub facet: Option<StatusField>,
    pub workflows: &'static [StatusField],
    pub reconcile: Reconcile,
    pub single_delete_phrase: &'static str,
    pub bulk_delete_phrase: &'static str,
    pub headline_field: &'static str,
    pub detail_fields: &'static [&'static str],
    pub form: Option<FormSpec>,
    pub read_only: bool,
}

impl EntitySpec {
    pub fn workflow(&self, field: &str) -> Option<&StatusField> {
        self.workflows.iter().find(|w| w.field == field)
    }

    /// The workflow used when the caller does not name one.
    pub fn primary_workflow(&self) -> Option<&StatusField> {
        self.workflows.first()
    }

    /// Every status-like field: the facet plus workflows, deduplicated by field name.
    pub fn status_fields(&self) -> Vec<&StatusField> {
        let mut out: Vec<&StatusField> = Vec::new();
        for f in self.facet.iter().chain(self.workflows.iter()) {
            if !out.iter().any(|o| o.field == f.field) {
                out.push(f);
            }
        }
        out
    }
}

pub const SINGLE_DELETE_PHRASE: &str = "DELETE";
pub const BULK_DELETE_PHRASE: &str = "DELETE SELECTED";

const FEEDBACK_CATEGORY: StatusField = StatusField::enumeration(
    "category",
    "category",
    &["general", "bug", "feature", "praise", "other"],
    "general",
);

const REQUIREMENT_STATUS: StatusField = StatusField::enumeration(
    "status",
    "status",
    &["pending", "in_review", "approved", "rejected"],
    "pending",
);

const STORY_STATUS: StatusField = StatusField::enumeration(
    "status",
    "status",
    &["pending", "approved", "rejected"],
    "pending",
);

const MESSAGE_READ: StatusField = StatusField::flag("is_read", "read", "read", "unread");

const WEBSITE_STATUS: StatusField = StatusField::enumeration(
    "status",
    "status",
    &["active", "pending", "inactive"],
    "pending",
);

const WEBSITE_STAGE: StatusField = StatusField::enumeration(
    "development_stage",
    "stage",
    &[
        "planning",
        "design",
        "development",
        "testing",
        "deployment",
        "maintenance",
        "deployed",
    ],
    "planning",
);

pub static FEEDBACK: EntitySpec = EntitySpec {
    kind: EntityKind::Feedback,
    collection: "feedback",
    title: "Feedback",
    search_fields: &["name", "email", "message", "category"],
    facet: Some(FEEDBACK_CATEGORY),
    workflows: &[],
    reconcile: Reconcile::Patch,
    single_delete_phrase: SINGLE_DELETE_PHRASE,
    bulk_delete_phrase: BULK_DELETE_PHRASE,
    headline_field: "name",
    detail_fields: &["email", "category", "rating", "message"],
    form: Some(FormSpec {
        required: &["name", "email", "message"],
        optional: &["category", "rating"],
        email_field: Some("email"),
        public: true,
    }),
    read_only: false,
};

pub static REQUIREMENTS: EntitySpec = EntitySpec {
    kind: EntityKind::Requirements,
    collection: "requirements",
    title: "Requirements",
    search_fields: &["name", "email", "company", "project_type", "description"],
    facet: Some(REQUIREMENT_STATUS),
    workflows: &[REQUIREMENT_STATUS],
    reconcile: Reconcile::Reload,
    single_delete_phrase: SINGLE_DELETE_PHRASE,
    bulk_delete_phrase: BULK_DELETE_PHRASE,
    headline_field: "name",
    detail_fields: &[
        "email",
        "company",
        "project_type",
        "budget",
        "timeline",
        "description",
    ],
    form: Some(FormSpec {
        required: &["name", "email", "project_type", "description"],
        optional: &["company", "phone", "budget", "timeline"],
        email_field: Some("email"),
        public: true,
    }),
    read_only: false,
};

pub static SUCCESS_STORIES: EntitySpec = EntitySpec {
    kind: EntityKind::SuccessStories,
    collection: "success_stories",
    title: "Success stories",
    search_fields: &["client_name", "title", "story", "industry"],
    facet: Some(STORY_STATUS),
    workflows: &[STORY_STATUS],
    reconcile: Reconcile::Reload,
    single_delete_phrase: SINGLE_DELETE_PHRASE,
    bulk_delete_phrase: BULK_DELETE_PHRASE,
    headline_field: "title",
    detail_fields: &["client_name", "industry", "email", "rating", "story"],
    form: Some(FormSpec {
        required: &["client_name", "title", "story"],
        optional: &["industry", "email", "website_url", "rating"],
        email_field: Some("email"),
        public: true,
    }),
    read_only: false,
};

pub static CONTACT_MESSAGES: EntitySpec = EntitySpec {
    kind: EntityKind::ContactMessages,
    collection: "contact_messages",
    title: "Contact messages",
    search_fields: &["name", "email", "subject", "message"],
    facet: Some(MESSAGE_READ),
    workflows: &[MESSAGE_READ],
    reconcile: Reconcile::Patch,
    single_delete_phrase: SINGLE_DELETE_PHRASE,
    bulk_delete_phrase: BULK_DELETE_PHRASE,
    headline_field: "subject",
    detail_fields: &["name", "email", "phone", "message"],
    form: Some(FormSpec {
        required: &["name", "email", "message"],
        optional: &["subject", "phone"],
        email_field: Some("email"),
        public: true,
    }),
    read_only: false,
};

pub static WEBSITES: EntitySpec = EntitySpec {
    kind: EntityKind::Websites,
    collection: "websites",
    title: "Websites",
    search_fields: &["name", "domain", "client_name", "description"],
    facet: Some(WEBSITE_STATUS),
    workflows: &[WEBSITE_STATUS, WEBSITE_STAGE],
    reconcile: Reconcile::Reload,
    single_delete_phrase: SINGLE_DELETE_PHRASE,
    bulk_delete_phrase: BULK_DELETE_PHRASE,
    headline_field: "name",
    detail_fields: &["domain", "client_name", "url", "description"],
    form: Some(FormSpec {
        required: &["name", "domain"],
        optional: &["client_name", "url", "description"],
        email_field: None,
        public: false,
    }),
    read_only: false,
};

pub static IDENTITIES: EntitySpec = EntitySpec {
    kind: EntityKind::Identities,
    collection: "identities",
    title: "Identities",
    search_fields: &["handle", "display_name", "email", "id"],
    facet: None,
    workflows: &[],
    reconcile: Reconcile::Patch,
    single_delete_phrase: SINGLE_DELETE_PHRASE,
    bulk_delete_phrase: BULK_DELETE_PHRASE,
    headline_field: "handle",
    detail_fields: &["display_name", "email", "admin"],
    form: None,
    read_only: true,
};

#[cfg(test)]
#[path = "../tests/model/entity_tests.rs"]
mod tests;
