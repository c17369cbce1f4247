use anyhow::Result;
use polyglot_blog::config::Config;
use polyglot_blog::i18n::LocaleStore;
use polyglot_blog::routing::{NavRequest, NavigationResolver, Outcome};
use polyglot_blog::storage;
use polyglot_blog::translation::{reload_on_locale_change, TranslationLoader};
use std::sync::Arc;
use tracing::info;

/// Redirect chains terminate after one hop by construction; anything longer
/// is a routing bug worth failing loudly on.
const MAX_REDIRECTS: usize = 5;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyglot_blog=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!("resolving against API at {}", config.api_base_url);

    let storage = storage::open_or_memory(&config.storage_path);
    let locale_store = Arc::new(LocaleStore::with_default(
        Arc::clone(&storage),
        config.default_locale,
    ));

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .build()?;
    let loader = Arc::new(TranslationLoader::new(http, config.locales_base_url.clone()));
    reload_on_locale_change(Arc::clone(&loader), &locale_store);
    loader.ensure_loaded(locale_store.get()).await;

    let resolver = NavigationResolver::new(Arc::clone(&locale_store));

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        info!("no paths given; try: polyglot-blog / /zh/posts /about '/xx/about?lang=en'");
        return Ok(());
    }

    for path in paths {
        let mut request = NavRequest::from_location(&path);
        let mut rendered = false;
        for hop in 0..MAX_REDIRECTS {
            match resolver.resolve(&request) {
                Outcome::Render {
                    page,
                    locale,
                    params,
                } => {
                    if params.is_empty() {
                        println!("{path} -> render {page:?} [{locale}]");
                    } else {
                        println!("{path} -> render {page:?} [{locale}] params={params:?}");
                    }
                    rendered = true;
                    break;
                }
                Outcome::Redirect { to } => {
                    println!("{path} -> redirect {to} (hop {})", hop + 1);
                    request = NavRequest::from_location(&to);
                }
            }
        }
        anyhow::ensure!(rendered, "redirect loop resolving '{path}'");
    }

    Ok(())
}
