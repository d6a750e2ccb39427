//! Application state.

use std::sync::Arc;

use jobify_core::{
    AccountService, ApplicationWorkflow, DevGateway, DirectoryService, EntitlementService, LogSink,
    NotificationSink, PaymentInitiator, PostingService,
};
use jobify_store::{MemoryStore, Store};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn Store>,
    pub directory: DirectoryService,
    pub workflow: ApplicationWorkflow,
    pub entitlements: EntitlementService,
    pub postings: PostingService,
    pub accounts: AccountService,
}

impl AppState {
    /// Create application state with the default collaborators: the
    /// in-memory store, the logging notification sink, and the local
    /// payment gateway.
    pub fn new(config: ApiConfig) -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let sink: Arc<dyn NotificationSink> = Arc::new(LogSink);
        let gateway: Arc<dyn PaymentInitiator> =
            Arc::new(DevGateway::new(config.payment_base_url.clone()));
        Self::with_collaborators(config, store, sink, gateway)
    }

    /// Create application state with explicit collaborators. Production
    /// wiring and tests inject their own store, sink, and gateway here.
    pub fn with_collaborators(
        config: ApiConfig,
        store: Arc<dyn Store>,
        sink: Arc<dyn NotificationSink>,
        gateway: Arc<dyn PaymentInitiator>,
    ) -> Self {
        let directory = DirectoryService::new(Arc::clone(&store));
        let workflow = ApplicationWorkflow::new(Arc::clone(&store), sink);
        let entitlements = EntitlementService::new(Arc::clone(&store), gateway);
        let postings = PostingService::new(Arc::clone(&store));
        let accounts = AccountService::new(Arc::clone(&store));

        Self {
            config,
            store,
            directory,
            workflow,
            entitlements,
            postings,
            accounts,
        }
    }
}
