/**
 * Application State
 *
 * Shared state handed to every handler and to the resolver middleware.
 * Everything is behind `Arc` so the state clones cheaply per request.
 */

use std::sync::Arc;

use crate::cache::{Dispatcher, TagCache};
use crate::content::sitemap::UrlContext;
use crate::content::ContentService;
use crate::server::config::AppConfig;
use crate::store::ContentStore;
use crate::tenancy::resolver::ResolverConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ContentStore>,
    pub cache: Arc<TagCache>,
    pub dispatcher: Dispatcher,
    pub resolver: Arc<ResolverConfig>,
    pub content: ContentService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ContentStore>) -> Self {
        let cache = Arc::new(TagCache::new());
        let dispatcher = Dispatcher::new(cache.clone());
        let resolver = Arc::new(ResolverConfig::new(
            config.addressing_mode,
            &config.root_domain,
            &config.app_hostname(),
        ));
        let content = ContentService::new(store.clone(), cache.clone());

        Self {
            config: Arc::new(config),
            store,
            cache,
            dispatcher,
            resolver,
            content,
        }
    }

    /// URL-building context for absolute links and sitemap entries
    pub fn url_context(&self) -> UrlContext {
        UrlContext {
            mode: self.config.addressing_mode,
            app_url: self.config.app_url.clone(),
            root_domain: self.config.root_domain.clone(),
        }
    }
}
