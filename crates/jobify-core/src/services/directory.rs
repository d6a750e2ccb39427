//! Job directory query engine: listing, search, and enriched views.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use jobify_models::{Application, Bookmark, CompanyId, CompanyPublic, JobId, JobPublic};
use jobify_store::{CompanyFilter, JobFilter, Page, Store};

use crate::error::{CoreError, CoreResult};

/// Cap on the related-jobs set in a job detail view.
const RELATED_JOBS_LIMIT: usize = 10;

/// Raw listing/search parameters as supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct JobListingParams {
    pub title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub company_name: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Include expired postings (company dashboards)
    pub include_inactive: bool,
}

impl JobListingParams {
    fn into_parts(self) -> (JobFilter, Page) {
        let page = Page::new(self.page, self.limit);
        let filter = JobFilter {
            title: self.title,
            location: self.location,
            job_type: self.job_type,
            category: self.category,
            tag: self.tag,
            featured: self.featured,
            company_name: self.company_name,
            active_only: !self.include_inactive,
        };
        (filter, page)
    }
}

/// One job in a listing, joined to its company for the logo URL. A job
/// with no matching company keeps its place with `logo: null`.
#[derive(Debug, Clone, Serialize)]
pub struct JobListingEntry {
    #[serde(flatten)]
    pub job: JobPublic,
    pub logo: Option<String>,
}

/// A page of the job directory with the filtered total.
#[derive(Debug, Clone, Serialize)]
pub struct JobListingPage {
    pub jobs: Vec<JobListingEntry>,
    /// Count of the filtered query, not the whole collection
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Composite job detail view.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub job: JobPublic,
    /// Absent when the denormalized company_name matches no company
    pub company: Option<CompanyPublic>,
    /// Jobs sharing at least one tag, self excluded
    pub related_jobs: Vec<JobPublic>,
}

/// One company in a listing, with its open (active) posting count.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyListingEntry {
    #[serde(flatten)]
    pub company: CompanyPublic,
    pub open_jobs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyListingPage {
    pub companies: Vec<CompanyListingEntry>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// An application joined to its job for candidate dashboards. The entry
/// survives a missing job; only the detail goes absent.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedJobView {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<JobPublic>,
}

/// Listing, search, and enrichment over the job directory.
#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<dyn Store>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// List or search jobs. Free-text terms are validated before any store
    /// round-trip; the logo join is an outer join.
    pub async fn list_jobs(&self, params: JobListingParams) -> CoreResult<JobListingPage> {
        let (filter, page) = params.into_parts();
        filter.validate()?;

        let total = self.store.jobs().count(&filter).await?;
        let jobs = self.store.jobs().find(&filter, page).await?;

        // One lookup per distinct company name on the page
        let mut logos: HashMap<String, Option<String>> = HashMap::new();
        let mut entries = Vec::with_capacity(jobs.len());
        for job in jobs {
            let logo = match logos.get(&job.company_name) {
                Some(cached) => cached.clone(),
                None => {
                    let logo = self
                        .store
                        .companies()
                        .get_by_name(&job.company_name)
                        .await?
                        .and_then(|c| c.logo);
                    logos.insert(job.company_name.clone(), logo.clone());
                    logo
                }
            };
            entries.push(JobListingEntry {
                job: job.to_public(),
                logo,
            });
        }

        Ok(JobListingPage {
            jobs: entries,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// Composite job detail: public job fields, the owning company's public
    /// fields, and related jobs by tag intersection.
    pub async fn job_detail(&self, id: &JobId) -> CoreResult<JobDetail> {
        let job = self
            .store
            .jobs()
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("job {}", id)))?;

        let company = self
            .store
            .companies()
            .get_by_name(&job.company_name)
            .await?
            .map(|c| c.to_public());
        if company.is_none() {
            debug!(job_id = %id, company_name = %job.company_name, "job has no matching company");
        }

        let related = self
            .store
            .jobs()
            .find_related_by_tags(&job.job_tags, &job.id, RELATED_JOBS_LIMIT)
            .await?;

        Ok(JobDetail {
            job: job.to_public(),
            company,
            related_jobs: related.into_iter().map(|j| j.to_public()).collect(),
        })
    }

    /// List companies, each with its open-job count.
    pub async fn list_companies(
        &self,
        name: Option<String>,
        id: Option<CompanyId>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> CoreResult<CompanyListingPage> {
        let filter = CompanyFilter { name, id };
        let page = Page::new(page, limit);

        let total = self.store.companies().count(&filter).await?;
        let companies = self.store.companies().find(&filter, page).await?;

        let mut entries = Vec::with_capacity(companies.len());
        for company in companies {
            let open_jobs = self
                .store
                .jobs()
                .count(&JobFilter {
                    company_name: Some(company.company_name.clone()),
                    active_only: true,
                    ..Default::default()
                })
                .await?;
            entries.push(CompanyListingEntry {
                company: company.to_public(),
                open_jobs,
            });
        }

        Ok(CompanyListingPage {
            companies: entries,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// A candidate's applications, each joined to its job detail.
    pub async fn applied_jobs(&self, candidate_email: &str) -> CoreResult<Vec<AppliedJobView>> {
        let applications = self
            .store
            .applications()
            .find_by_candidate(candidate_email)
            .await?;

        let ids: Vec<JobId> = applications.iter().map(|a| a.job_id.clone()).collect();
        let jobs = self.store.jobs().get_many(&ids).await?;
        let by_id: HashMap<&str, &jobify_models::Job> =
            jobs.iter().map(|j| (j.id.as_str(), j)).collect();

        Ok(applications
            .into_iter()
            .map(|application| {
                let job = by_id
                    .get(application.job_id.as_str())
                    .map(|j| j.to_public());
                AppliedJobView { application, job }
            })
            .collect())
    }

    /// A candidate's bookmarks.
    pub async fn bookmarks(&self, candidate_email: &str) -> CoreResult<Vec<Bookmark>> {
        Ok(self
            .store
            .bookmarks()
            .find_by_candidate(candidate_email)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use jobify_models::{
        Application, Company, Entitlements, Job, PlanTier, SalaryRange,
    };
    use jobify_store::{
        ApplicationStore, BookmarkStore, CandidateStore, CompanyStore, JobPatch, JobStore,
        MemoryStore, OrderStore, StoreResult, UserStore,
    };

    fn job(id: &str, company: &str, minutes_ago: i64) -> Job {
        Job {
            id: JobId::from(id),
            company_name: company.to_string(),
            contact_email: format!("jobs@{}.test", company.to_lowercase()),
            job_title: format!("Role {}", id),
            job_tags: ["rust"].iter().map(|s| s.to_string()).collect(),
            category: "engineering".to_string(),
            job_type: "full-time".to_string(),
            location: "Remote".to_string(),
            salary: SalaryRange::default(),
            expiration_date: Utc::now() + Duration::days(30),
            active: true,
            featured: false,
            applications: 0,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    fn company(id: &str, name: &str, logo: Option<&str>) -> Company {
        Company {
            id: CompanyId::from(id),
            company_name: name.to_string(),
            email: format!("billing@{}.test", name.to_lowercase()),
            logo: logo.map(|l| l.to_string()),
            website: None,
            description: None,
            location: None,
            plan: PlanTier::None,
            entitlements: Entitlements::default(),
            featured: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_listing_joins_logos_with_outer_join() {
        let store = Arc::new(MemoryStore::new());
        CompanyStore::insert(&*store, &company("c1", "Acme", Some("https://cdn.test/acme.png")))
            .await
            .unwrap();
        JobStore::insert(&*store, &job("j1", "Acme", 0)).await.unwrap();
        JobStore::insert(&*store, &job("j2", "Ghost Corp", 1)).await.unwrap();

        let directory = DirectoryService::new(store);
        let page = directory.list_jobs(JobListingParams::default()).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.jobs.len(), 2);
        let by_id: HashMap<&str, &JobListingEntry> =
            page.jobs.iter().map(|e| (e.job.id.as_str(), e)).collect();
        assert_eq!(by_id["j1"].logo.as_deref(), Some("https://cdn.test/acme.png"));
        // Job without a matching company stays, with a null logo
        assert!(by_id["j2"].logo.is_none());
    }

    #[tokio::test]
    async fn test_detail_with_missing_company_is_not_an_error() {
        let store = Arc::new(MemoryStore::new());
        JobStore::insert(&*store, &job("j1", "Ghost Corp", 0)).await.unwrap();

        let directory = DirectoryService::new(store);
        let detail = directory.job_detail(&JobId::from("j1")).await.unwrap();
        assert_eq!(detail.job.id.as_str(), "j1");
        assert!(detail.company.is_none());
    }

    #[tokio::test]
    async fn test_detail_related_jobs_by_tag_intersection() {
        let store = Arc::new(MemoryStore::new());
        let mut a = job("a", "Acme", 0);
        a.job_tags = ["rust", "api"].iter().map(|s| s.to_string()).collect();
        let mut b = job("b", "Acme", 1);
        b.job_tags = ["api", "cloud"].iter().map(|s| s.to_string()).collect();
        let mut c = job("c", "Acme", 2);
        c.job_tags = BTreeSet::from(["frontend".to_string()]);
        for j in [&a, &b, &c] {
            JobStore::insert(&*store, j).await.unwrap();
        }

        let directory = DirectoryService::new(store);
        let detail = directory.job_detail(&a.id).await.unwrap();
        let related: Vec<&str> = detail.related_jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(related, vec!["b"]);
    }

    #[tokio::test]
    async fn test_missing_job_detail_is_not_found() {
        let directory = DirectoryService::new(Arc::new(MemoryStore::new()));
        let err = directory.job_detail(&JobId::from("nope")).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_company_listing_reports_open_job_counts() {
        let store = Arc::new(MemoryStore::new());
        CompanyStore::insert(&*store, &company("c1", "Acme", None)).await.unwrap();
        JobStore::insert(&*store, &job("j1", "Acme", 0)).await.unwrap();
        let mut expired = job("j2", "Acme", 1);
        expired.active = false;
        JobStore::insert(&*store, &expired).await.unwrap();

        let directory = DirectoryService::new(store);
        let page = directory.list_companies(None, None, None, None).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.companies[0].open_jobs, 1);
    }

    #[tokio::test]
    async fn test_applied_jobs_keep_entries_with_missing_job() {
        let store = Arc::new(MemoryStore::new());
        JobStore::insert(&*store, &job("j1", "Acme", 0)).await.unwrap();
        ApplicationStore::insert(&*store, &Application::new(JobId::from("j1"), "a@x.com"))
            .await
            .unwrap();
        ApplicationStore::insert(&*store, &Application::new(JobId::from("gone"), "a@x.com"))
            .await
            .unwrap();

        let directory = DirectoryService::new(store);
        let views = directory.applied_jobs("a@x.com").await.unwrap();
        assert_eq!(views.len(), 2);
        let with_job = views.iter().filter(|v| v.job.is_some()).count();
        assert_eq!(with_job, 1);
    }

    /// Store probe counting job queries, for the "no query on invalid
    /// search" property.
    struct CountingStore {
        inner: MemoryStore,
        job_queries: AtomicU32,
    }

    #[async_trait]
    impl JobStore for CountingStore {
        async fn insert(&self, j: &Job) -> StoreResult<()> {
            JobStore::insert(&self.inner, j).await
        }
        async fn get(&self, id: &JobId) -> StoreResult<Option<Job>> {
            self.job_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.jobs().get(id).await
        }
        async fn find(&self, f: &JobFilter, p: Page) -> StoreResult<Vec<Job>> {
            self.job_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.jobs().find(f, p).await
        }
        async fn count(&self, f: &JobFilter) -> StoreResult<u64> {
            self.job_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.jobs().count(f).await
        }
        async fn get_many(&self, ids: &[JobId]) -> StoreResult<Vec<Job>> {
            self.job_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.jobs().get_many(ids).await
        }
        async fn find_related_by_tags(
            &self,
            tags: &BTreeSet<String>,
            exclude: &JobId,
            limit: usize,
        ) -> StoreResult<Vec<Job>> {
            self.job_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.jobs().find_related_by_tags(tags, exclude, limit).await
        }
        async fn apply_patch(&self, id: &JobId, patch: &JobPatch) -> StoreResult<bool> {
            self.inner.jobs().apply_patch(id, patch).await
        }
        async fn increment_applications(&self, id: &JobId) -> StoreResult<u32> {
            self.inner.jobs().increment_applications(id).await
        }
        async fn find_expired(&self, now: DateTime<Utc>) -> StoreResult<Vec<Job>> {
            self.inner.jobs().find_expired(now).await
        }
        async fn deactivate(&self, id: &JobId) -> StoreResult<bool> {
            self.inner.jobs().deactivate(id).await
        }
    }

    impl jobify_store::Store for CountingStore {
        fn jobs(&self) -> &dyn JobStore {
            self
        }
        fn companies(&self) -> &dyn CompanyStore {
            self.inner.companies()
        }
        fn applications(&self) -> &dyn ApplicationStore {
            self.inner.applications()
        }
        fn bookmarks(&self) -> &dyn BookmarkStore {
            self.inner.bookmarks()
        }
        fn users(&self) -> &dyn UserStore {
            self.inner.users()
        }
        fn orders(&self) -> &dyn OrderStore {
            self.inner.orders()
        }
        fn candidates(&self) -> &dyn CandidateStore {
            self.inner.candidates()
        }
    }

    #[tokio::test]
    async fn test_invalid_search_term_performs_no_query() {
        let store = Arc::new(CountingStore {
            inner: MemoryStore::new(),
            job_queries: AtomicU32::new(0),
        });
        let directory = DirectoryService::new(Arc::clone(&store) as Arc<dyn Store>);

        let err = directory
            .list_jobs(JobListingParams {
                title: Some("ab".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Store(jobify_store::StoreError::InvalidQuery(_))));
        assert_eq!(store.job_queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pagination_beyond_last_page_is_empty() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..15 {
            JobStore::insert(&*store, &job(&format!("j{:02}", i), "Acme", i)).await.unwrap();
        }

        let directory = DirectoryService::new(store);
        let page2 = directory
            .list_jobs(JobListingParams {
                page: Some(2),
                limit: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page2.jobs.len(), 5);
        assert_eq!(page2.total, 15);

        let page9 = directory
            .list_jobs(JobListingParams {
                page: Some(9),
                limit: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(page9.jobs.is_empty());
        assert_eq!(page9.total, 15);
    }
}
