//! Tour search tools
//!
//! `search_tours` runs the whole pipeline: filters from arguments (and an
//! optional shareable link), sort, optional shuffle and the requested number
//! of pages. The server variant keeps the session between calls so
//! `load_more`, `shuffle_tours` and `clear_filters` operate on the same view.

use crate::catalog::{CatalogSource, CatalogStore};
use crate::cli::{ClearFiltersArgs, LoadMoreArgs, SearchArgs, ShuffleArgs};
use crate::config::AppConfig;
use crate::error::{normalize_query, AppError};
use crate::mcp::{McpResponse, ServerContext, ToolResult};
use crate::search::{FilterState, Page, Session, SortKey, DEFAULT_SUGGESTION_LIMIT};
use crate::tools::format::{format_page, page_to_json};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use tracing::{debug, warn};

/// Seeded when asked, OS entropy otherwise
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Filter state from tool arguments. The link seeds the state, explicit
/// arguments override it field by field.
pub fn filter_state_from_args(args: &SearchArgs) -> Result<FilterState, AppError> {
    let mut state = match args.link.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(link) if link.contains("://") => FilterState::from_url(link)?,
        Some(query) => FilterState::from_query_string(query),
        None => FilterState::default(),
    };

    if let Some(island) = &args.island {
        state.island = Some(island.trim().to_lowercase());
    }
    if let Some(activity) = &args.activity {
        state.activity = Some(activity.trim().to_string());
    }
    if let Some(query) = &args.query {
        state.search = Some(normalize_query(query));
    }
    if let Some(sort) = &args.sort {
        state.sort = SortKey::parse_lenient(sort);
    }
    if args.min_price.is_some() {
        state.price.min = args.min_price;
    }
    if args.max_price.is_some() {
        state.price.max = args.max_price;
    }

    state.validate()?;
    Ok(state)
}

/// Start a session on a loaded catalog with the configured options
pub fn new_session(
    config: &AppConfig,
    catalog: CatalogStore,
    rng: &mut StdRng,
) -> Result<Session, AppError> {
    Ok(Session::new(
        catalog,
        config.filter_engine()?,
        config.session_options(),
        rng,
    ))
}

/// Keywords offered on an empty result: from the search text, else the activity
pub fn empty_state_suggestions(session: &Session) -> Vec<String> {
    let filters = session.filters();
    let synonyms = session.engine().matcher().synonyms();
    filters
        .search_filter()
        .or_else(|| filters.activity_filter())
        .map(|term| synonyms.suggest(&term, DEFAULT_SUGGESTION_LIMIT))
        .unwrap_or_default()
}

/// Render a page as markdown or JSON
pub fn render_page(
    session: &Session,
    page: &Page,
    config: &AppConfig,
    json: bool,
) -> Result<ToolResult, AppError> {
    let suggestions = if page.is_empty_result() {
        empty_state_suggestions(session)
    } else {
        Vec::new()
    };

    if json {
        let value = page_to_json(page, session.filters(), &suggestions);
        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| AppError::Internal(format!("Failed to serialize page: {}", e)))?;
        Ok(ToolResult::text(text))
    } else {
        Ok(ToolResult::text(format_page(
            page,
            session.filters(),
            &config.badges,
            &suggestions,
        )))
    }
}

/// Apply filters, optionally shuffle, reveal `pages` pages
fn run_search(
    session: &mut Session,
    filters: FilterState,
    args: &SearchArgs,
    rng: &mut StdRng,
) -> Result<Page, AppError> {
    session.apply(filters)?;
    if args.shuffle {
        session.shuffle(rng);
    }

    // Stops at the last page whatever `pages` asks for
    let pages = args.pages.unwrap_or(1).max(1);
    for _ in 1..pages {
        if !session.cursor().has_more(session.view().len()) {
            break;
        }
        session.load_more();
    }

    Ok(session.visible_page())
}

/// One-shot search (CLI). A catalog that cannot be loaded is an error here;
/// the server degrades to an empty catalog instead.
pub async fn execute_search(args: SearchArgs, config: &AppConfig) -> Result<ToolResult, AppError> {
    let filters = filter_state_from_args(&args)?;
    debug!("Search request: {:?}", filters);

    let source = match args.catalog.as_deref() {
        Some(raw) => CatalogSource::parse(raw),
        None => config.catalog_source(),
    };
    let catalog = CatalogStore::load(&source, config.http_timeout()).await?;

    let mut rng = rng_for(args.seed);
    let mut session = new_session(config, catalog, &mut rng)?;
    let page = run_search(&mut session, filters, &args, &mut rng)?;

    render_page(&session, &page, config, args.json)
}

/// Prefix shown when the server is running on an empty fallback catalog
fn with_catalog_warning(result: ToolResult, context: &ServerContext) -> ToolResult {
    match context.catalog_error() {
        Some(err) => result.with_notice(format!("Unable to load tours ({}). Showing an empty catalog.", err)),
        None => result,
    }
}

/// Handle search_tours tool call (server)
pub async fn handle_search(id: Option<Value>, args: Value, context: &mut ServerContext) -> McpResponse {
    McpResponse::from_tool_result(id, handle_search_impl(args, context).await)
}

async fn handle_search_impl(args: Value, context: &mut ServerContext) -> Result<ToolResult, AppError> {
    let search_args: SearchArgs = serde_json::from_value(args)
        .map_err(|e| AppError::InvalidInput(format!("Invalid arguments: {}", e)))?;
    let filters = filter_state_from_args(&search_args)?;

    if let Some(raw) = search_args.catalog.as_deref() {
        context.load_catalog(CatalogSource::parse(raw)).await?;
    }

    let mut rng = rng_for(search_args.seed);
    let config = context.config().clone();
    let session = context.session().await?;
    let page = run_search(session, filters, &search_args, &mut rng)?;
    let result = render_page(session, &page, &config, search_args.json)?;

    Ok(with_catalog_warning(result, context))
}

/// Handle load_more tool call (server)
pub async fn handle_load_more(id: Option<Value>, args: Value, context: &mut ServerContext) -> McpResponse {
    McpResponse::from_tool_result(id, handle_load_more_impl(args, context).await)
}

async fn handle_load_more_impl(args: Value, context: &mut ServerContext) -> Result<ToolResult, AppError> {
    let load_args: LoadMoreArgs = serde_json::from_value(args)
        .map_err(|e| AppError::InvalidInput(format!("Invalid arguments: {}", e)))?;

    let config = context.config().clone();
    let session = context.session().await?;
    let page = session.load_more();
    if page.tours.is_empty() {
        debug!("load_more: view exhausted at {}", page.offset);
    }
    render_page(session, &page, &config, load_args.json)
}

/// Handle shuffle_tours tool call (server)
pub async fn handle_shuffle(id: Option<Value>, args: Value, context: &mut ServerContext) -> McpResponse {
    McpResponse::from_tool_result(id, handle_shuffle_impl(args, context).await)
}

async fn handle_shuffle_impl(args: Value, context: &mut ServerContext) -> Result<ToolResult, AppError> {
    let shuffle_args: ShuffleArgs = serde_json::from_value(args)
        .map_err(|e| AppError::InvalidInput(format!("Invalid arguments: {}", e)))?;

    let mut rng = rng_for(shuffle_args.seed);
    let config = context.config().clone();
    let session = context.session().await?;
    let page = if shuffle_args.stratified {
        session.shuffle_stratified(&mut rng)
    } else {
        session.shuffle(&mut rng)
    };
    render_page(session, &page, &config, shuffle_args.json)
}

/// Handle clear_filters tool call (server). With a term it acts as a quick
/// filter: every other filter is cleared and only the search text is set.
pub async fn handle_clear_filters(
    id: Option<Value>,
    args: Value,
    context: &mut ServerContext,
) -> McpResponse {
    McpResponse::from_tool_result(id, handle_clear_filters_impl(args, context).await)
}

async fn handle_clear_filters_impl(
    args: Value,
    context: &mut ServerContext,
) -> Result<ToolResult, AppError> {
    let clear_args: ClearFiltersArgs = serde_json::from_value(args)
        .map_err(|e| AppError::InvalidInput(format!("Invalid arguments: {}", e)))?;

    let config = context.config().clone();
    let session = context.session().await?;
    let mut page = session.clear_filters();
    if let Some(term) = clear_args.term.as_deref().filter(|t| !t.trim().is_empty()) {
        page = session.quick_filter(term).map_err(|e| {
            warn!("Quick filter rejected: {}", e);
            e
        })?;
    }
    render_page(session, &page, &config, clear_args.json)
}
