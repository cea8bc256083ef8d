//! In-memory form and submission storage.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use formcraft_core::{FormPatch, FormPayload, FormSchema, slugify};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Random characters appended to a title slug.
const SLUG_SUFFIX_LEN: usize = 8;
const SLUG_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// Slug candidates tried before giving up.
pub const MAX_SLUG_ATTEMPTS: usize = 10;
pub const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Form not found")]
    NotFound,
    #[error("Failed to generate unique slug")]
    SlugExhausted,
    #[error("{0}")]
    Invalid(String),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// A form as stored by the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredForm {
    pub id: String,
    pub slug: String,
    #[serde(flatten)]
    pub schema: FormSchema,
    pub status: FormStatus,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    pub submission_count: u64,
}

/// Body of a public submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionData {
    /// Field id to submitted value.
    pub form_data: Map<String, Value>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Who sent a submission.
#[derive(Debug, Clone, Default)]
pub struct Submitter {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub form_id: String,
    pub form_data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub submitted_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// `{title-slug}-{8 random [a-z0-9]}`.
pub fn generate_slug(title: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SLUG_SUFFIX_LEN)
        .map(|_| SLUG_ALPHABET[rng.gen_range(0..SLUG_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", slugify(title), suffix)
}

fn validate_title(title: &str) -> RepoResult<()> {
    let len = title.chars().count();
    if len == 0 || len > MAX_TITLE_LEN {
        return Err(RepositoryError::Invalid(format!(
            "Title must be between 1 and {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

/// Forms keyed by id, with a slug index.
#[derive(Debug, Default)]
pub struct FormRepository {
    forms: DashMap<String, StoredForm>,
    /// slug -> id
    slugs: DashMap<String, String>,
    submissions: DashMap<String, Submission>,
}

impl FormRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn create(&self, payload: FormPayload, status: FormStatus) -> RepoResult<StoredForm> {
        let title = payload.title.clone();
        self.create_with(payload, status, || generate_slug(&title))
    }

    /// Create a form, drawing slug candidates from `next_slug`.
    pub fn create_with(
        &self,
        payload: FormPayload,
        status: FormStatus,
        mut next_slug: impl FnMut() -> String,
    ) -> RepoResult<StoredForm> {
        validate_title(&payload.title)?;
        let id = Uuid::new_v4().to_string();
        let slug = self.reserve_slug(&id, &mut next_slug)?;

        let now = Utc::now();
        let form = StoredForm {
            id: id.clone(),
            slug,
            schema: payload.into_schema(),
            status,
            version: 1,
            created_at: now,
            updated_at: now,
            published_at: (status == FormStatus::Published).then_some(now),
            archived_at: None,
            submission_count: 0,
        };
        self.forms.insert(id, form.clone());
        Ok(form)
    }

    fn reserve_slug(&self, id: &str, next_slug: &mut impl FnMut() -> String) -> RepoResult<String> {
        for _ in 0..MAX_SLUG_ATTEMPTS {
            let candidate = next_slug();
            if let Entry::Vacant(entry) = self.slugs.entry(candidate.clone()) {
                entry.insert(id.to_string());
                return Ok(candidate);
            }
        }
        Err(RepositoryError::SlugExhausted)
    }

    pub fn slug_exists(&self, slug: &str) -> bool {
        self.slugs.contains_key(slug)
    }

    pub fn get(&self, id: &str) -> Option<StoredForm> {
        self.forms.get(id).map(|form| form.clone())
    }

    /// Look up by slug. Only published forms are visible.
    pub fn get_published(&self, slug: &str) -> Option<StoredForm> {
        let id = self.slugs.get(slug)?.clone();
        self.get(&id).filter(|form| form.status == FormStatus::Published)
    }

    /// Newest first.
    pub fn list(&self, skip: usize, limit: usize) -> Vec<StoredForm> {
        let mut forms: Vec<StoredForm> = self.forms.iter().map(|entry| entry.value().clone()).collect();
        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        forms.into_iter().skip(skip).take(limit).collect()
    }

    /// Apply a patch and optional status change, bumping the version.
    pub fn update(&self, id: &str, patch: &FormPatch, status: Option<FormStatus>) -> RepoResult<StoredForm> {
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }
        let mut form = self.forms.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let now = Utc::now();

        patch.apply_to(&mut form.schema);
        form.schema.normalize();
        if let Some(status) = status {
            form.status = status;
            match status {
                FormStatus::Published => form.published_at = Some(now),
                FormStatus::Archived => form.archived_at = Some(now),
                FormStatus::Draft => {}
            }
        }
        form.version += 1;
        form.updated_at = now;
        Ok(form.clone())
    }

    pub fn publish(&self, id: &str) -> RepoResult<StoredForm> {
        self.update(id, &FormPatch::default(), Some(FormStatus::Published))
    }

    /// Soft delete.
    pub fn archive(&self, id: &str) -> RepoResult<StoredForm> {
        self.update(id, &FormPatch::default(), Some(FormStatus::Archived))
    }

    /// Remove a form with its submissions and release its slug.
    pub fn delete(&self, id: &str) -> RepoResult<()> {
        let (_, form) = self.forms.remove(id).ok_or(RepositoryError::NotFound)?;
        self.slugs.remove(&form.slug);
        self.submissions.retain(|_, submission| submission.form_id != id);
        Ok(())
    }

    /// Store a submission for a published form and count it.
    pub fn submit(&self, form_id: &str, data: SubmissionData, submitter: Submitter) -> RepoResult<Submission> {
        let mut form = self
            .forms
            .get_mut(form_id)
            .filter(|form| form.status == FormStatus::Published)
            .ok_or(RepositoryError::NotFound)?;
        form.submission_count += 1;

        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            form_id: form_id.to_string(),
            form_data: data.form_data,
            metadata: data.metadata,
            submitted_at: Utc::now(),
            ip_address: submitter.ip_address,
            user_agent: submitter.user_agent,
        };
        self.submissions.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    /// Submissions of one form, newest first.
    pub fn list_submissions(&self, form_id: &str, skip: usize, limit: usize) -> RepoResult<Vec<Submission>> {
        if !self.forms.contains_key(form_id) {
            return Err(RepositoryError::NotFound);
        }
        let mut submissions: Vec<Submission> = self
            .submissions
            .iter()
            .filter(|entry| entry.form_id == form_id)
            .map(|entry| entry.value().clone())
            .collect();
        submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(submissions.into_iter().skip(skip).take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_core::Patch;

    fn payload(title: &str) -> FormPayload {
        FormPayload::from_schema(&FormSchema::new(title))
    }

    #[test]
    fn test_slug_format() {
        let slug = generate_slug("Contact Us");
        let (base, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(base, "contact-us");
        assert_eq!(suffix.len(), SLUG_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| SLUG_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_create_defaults() {
        let repo = FormRepository::new();
        let form = repo.create(payload("Survey"), FormStatus::Draft).unwrap();
        assert_eq!(form.version, 1);
        assert_eq!(form.status, FormStatus::Draft);
        assert!(form.published_at.is_none());
        assert!(repo.slug_exists(&form.slug));
    }

    #[test]
    fn test_slug_collision_retries_then_gives_up() {
        let repo = FormRepository::new();
        repo.create_with(payload("A"), FormStatus::Draft, || "taken".to_string())
            .unwrap();

        let mut candidates = vec!["fresh".to_string(), "taken".to_string()];
        let form = repo
            .create_with(payload("B"), FormStatus::Draft, || candidates.pop().unwrap_or_default())
            .unwrap();
        assert_eq!(form.slug, "fresh");

        let mut calls = 0;
        let result = repo.create_with(payload("C"), FormStatus::Draft, || {
            calls += 1;
            "taken".to_string()
        });
        assert_eq!(result.unwrap_err(), RepositoryError::SlugExhausted);
        assert_eq!(calls, MAX_SLUG_ATTEMPTS);
    }

    #[test]
    fn test_title_validation() {
        let repo = FormRepository::new();
        assert!(matches!(
            repo.create(payload(""), FormStatus::Draft),
            Err(RepositoryError::Invalid(_))
        ));
        assert!(repo.create(payload(&"x".repeat(201)), FormStatus::Draft).is_err());
    }

    #[test]
    fn test_update_tri_state() {
        let repo = FormRepository::new();
        let mut schema = FormSchema::new("Bg");
        schema.background_image = Some("bg.png".to_string());
        schema.editor_content = Some("<p>x</p>".to_string());
        let form = repo
            .create(FormPayload::from_schema(&schema), FormStatus::Draft)
            .unwrap();

        let keep = FormPatch {
            title: Some("Renamed".to_string()),
            ..FormPatch::default()
        };
        let updated = repo.update(&form.id, &keep, None).unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.schema.background_image.as_deref(), Some("bg.png"));

        let clear = FormPatch {
            background_image: Patch::Clear,
            ..FormPatch::default()
        };
        let updated = repo.update(&form.id, &clear, None).unwrap();
        assert_eq!(updated.schema.background_image, None);
        assert_eq!(updated.schema.editor_content.as_deref(), Some("<p>x</p>"));
    }

    #[test]
    fn test_publish_and_public_lookup() {
        let repo = FormRepository::new();
        let form = repo.create(payload("Public"), FormStatus::Draft).unwrap();
        assert!(repo.get_published(&form.slug).is_none());

        let published = repo.publish(&form.id).unwrap();
        assert!(published.published_at.is_some());
        assert_eq!(repo.get_published(&form.slug).unwrap().id, form.id);

        repo.archive(&form.id).unwrap();
        assert!(repo.get_published(&form.slug).is_none());
    }

    #[test]
    fn test_list_and_delete() {
        let repo = FormRepository::new();
        let first = repo.create(payload("One"), FormStatus::Draft).unwrap();
        let second = repo.create(payload("Two"), FormStatus::Draft).unwrap();

        let listed = repo.list(0, 50);
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at >= listed[1].created_at);
        assert_eq!(repo.list(1, 50).len(), 1);

        repo.delete(&first.id).unwrap();
        assert!(!repo.slug_exists(&first.slug));
        assert_eq!(repo.delete(&first.id), Err(RepositoryError::NotFound));
        assert_eq!(repo.list(0, 50)[0].id, second.id);
    }

    fn answers(email: &str) -> SubmissionData {
        let mut form_data = Map::new();
        form_data.insert("email".to_string(), Value::from(email));
        SubmissionData {
            form_data,
            metadata: None,
        }
    }

    #[test]
    fn test_submit_counts_and_lists() {
        let repo = FormRepository::new();
        let form = repo.create(payload("Signup"), FormStatus::Draft).unwrap();
        assert_eq!(
            repo.submit(&form.id, answers("a@x.io"), Submitter::default()).unwrap_err(),
            RepositoryError::NotFound
        );
        assert_eq!(repo.get(&form.id).unwrap().submission_count, 0);

        repo.publish(&form.id).unwrap();
        let first = repo.submit(&form.id, answers("a@x.io"), Submitter::default()).unwrap();
        assert_eq!(first.form_id, form.id);
        assert_eq!(first.form_data["email"], "a@x.io");
        repo.submit(&form.id, answers("b@x.io"), Submitter::default()).unwrap();
        assert_eq!(repo.get(&form.id).unwrap().submission_count, 2);

        let listed = repo.list_submissions(&form.id, 0, 100).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].submitted_at >= listed[1].submitted_at);
        assert_eq!(repo.list_submissions(&form.id, 1, 100).unwrap().len(), 1);
        assert_eq!(
            repo.list_submissions("missing", 0, 100).unwrap_err(),
            RepositoryError::NotFound
        );
    }

    #[test]
    fn test_archived_form_rejects_submissions() {
        let repo = FormRepository::new();
        let form = repo.create(payload("Closed"), FormStatus::Published).unwrap();
        repo.submit(&form.id, answers("a@x.io"), Submitter::default()).unwrap();
        repo.archive(&form.id).unwrap();
        assert!(repo.submit(&form.id, answers("b@x.io"), Submitter::default()).is_err());
        assert_eq!(repo.list_submissions(&form.id, 0, 100).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_drops_submissions() {
        let repo = FormRepository::new();
        let form = repo.create(payload("Gone"), FormStatus::Published).unwrap();
        let other = repo.create(payload("Kept"), FormStatus::Published).unwrap();
        repo.submit(&form.id, answers("a@x.io"), Submitter::default()).unwrap();
        repo.submit(&other.id, answers("b@x.io"), Submitter::default()).unwrap();

        repo.delete(&form.id).unwrap();
        assert_eq!(repo.submissions.len(), 1);
        assert_eq!(repo.list_submissions(&other.id, 0, 100).unwrap().len(), 1);
    }
}
