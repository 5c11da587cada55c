use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use indicatif::ProgressBar;
use serde_json::Value;

use crate::adapters::transport::fixture_transport::FixtureTransport;
use crate::adapters::transport::graphql_transport::GraphqlTransport;
use crate::cli::table_printer::{render_footer, render_table};
use crate::cli::{LogsArgs, context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::{OverseeError, Result};
use crate::core::models::log_entry::LogEntry;
use crate::core::models::query::{QueryDocument, QueryKey, QueryResult, QueryStatus};
use crate::core::models::table::PaginationConfig;
use crate::core::services::audit_query::{LogFilter, audit_log_query};
use crate::core::services::log_columns::log_columns;
use crate::core::services::query_cache::QueryCache;
use crate::core::services::table_view::TableView;
use crate::core::traits::transport::QueryTransport;

/// Execute the `oversee-view logs` command.
///
/// Builds the table first so column and page-size mistakes fail before any
/// network call, then fetches the audit log and shows the requested page.
/// With `--interactive`, keeps paging from stdin until `q` or end of input.
pub fn execute(args: &LogsArgs) -> Result<()> {
    let config = AppConfig::load(context::config_path())?;

    if args.page == 0 {
        return Err(OverseeError::Configuration {
            detail: "--page starts at 1".into(),
        });
    }

    let page_size = args.page_size.unwrap_or(config.table.page_size);
    let keys = args
        .columns
        .clone()
        .unwrap_or_else(|| config.table.columns.clone());
    let human_timestamps = args.human_timestamps || config.table.human_timestamps;

    let columns = log_columns(&keys, human_timestamps)?;
    let table = TableView::new(Vec::<LogEntry>::new(), columns, PaginationConfig { page_size })?
        .with_row_key(|entry: &LogEntry| entry.id.clone());

    let filter = LogFilter {
        service_name: args.service.clone(),
        operation: args.operation.clone(),
        actor_id: args.actor_id.clone(),
        actor_type: args.actor_type.clone(),
    };

    match &args.fixture {
        Some(path) => run(FixtureTransport::new(Path::new(path)), table, &filter, args),
        None => {
            let endpoint = args
                .endpoint
                .clone()
                .unwrap_or_else(|| config.server.endpoint.clone());
            let transport =
                GraphqlTransport::new(&endpoint, Duration::from_secs(config.server.timeout_secs))?;
            run(transport, table, &filter, args)
        }
    }
}

/// One query session: a cache, the audit query, and the table it feeds.
struct Session<C> {
    runtime: tokio::runtime::Runtime,
    cache: QueryCache<LogEntry, C>,
    document: QueryDocument,
    variables: Value,
    key: QueryKey,
}

impl<C: QueryTransport> Session<C> {
    fn new(transport: C, filter: &LogFilter) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let cache = QueryCache::new(transport);
        let (document, variables) = audit_log_query(filter);
        let key = QueryKey::new(&document, &variables);

        // Spinner while the entry is loading, cleared on any settled state.
        let spinner: Rc<RefCell<Option<ProgressBar>>> = Rc::new(RefCell::new(None));
        cache.subscribe(&key, move |result| {
            let mut slot = spinner.borrow_mut();
            if result.status() == QueryStatus::Loading {
                *slot = Some(output::spinner("Loading audit logs..."));
                return;
            }
            if let Some(sp) = slot.take() {
                sp.finish_and_clear();
            }
            if let Some(rows) = result.data() {
                log::debug!("{} audit entries loaded", rows.len());
            }
            if let Some(info) = result.error() {
                log::debug!("audit query failed ({:?}): {info}", info.kind);
            }
        });

        Ok(Self {
            runtime,
            cache,
            document,
            variables,
            key,
        })
    }

    fn fetch(&self) -> Result<Rc<Vec<LogEntry>>> {
        let result = self
            .runtime
            .block_on(self.cache.execute(&self.document, self.variables.clone()));
        match result {
            QueryResult::Success(rows) => Ok(rows),
            QueryResult::Error(info) => Err(info.into_error()),
            // `execute` only returns once the entry has settled.
            QueryResult::Loading => unreachable!("execute returned a loading result"),
        }
    }

    fn refresh(&self) -> Result<Rc<Vec<LogEntry>>> {
        self.cache.invalidate(&self.key);
        self.fetch()
    }
}

fn run<C: QueryTransport>(
    transport: C,
    mut table: TableView<LogEntry>,
    filter: &LogFilter,
    args: &LogsArgs,
) -> Result<()> {
    let session = Session::new(transport, filter)?;
    table.set_rows(session.fetch()?);

    let mut reached = 1;
    while reached < args.page && table.next_page() {
        reached += 1;
    }

    print_page(&table, filter);
    if reached < args.page {
        output::warning(&format!(
            "Page {} does not exist; showing the last page",
            args.page
        ));
    }

    if args.interactive {
        interact(&session, &mut table, filter)?;
    }

    Ok(())
}

fn interact<C: QueryTransport>(
    session: &Session<C>,
    table: &mut TableView<LogEntry>,
    filter: &LogFilter,
) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\n  [n]ext  [p]revious  [r]efresh  [q]uit > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            break;
        };

        match line.trim() {
            "n" | "next" => {
                if !table.next_page() {
                    output::warning("Already on the last page");
                    continue;
                }
            }
            "p" | "prev" | "previous" => {
                if !table.previous_page() {
                    output::warning("Already on the first page");
                    continue;
                }
            }
            "r" | "refresh" => match session.refresh() {
                Ok(rows) => {
                    output::success(&format!("Refreshed ({} entries)", rows.len()));
                    table.set_rows(rows);
                }
                Err(e) => {
                    // Keep the previous table on a failed refresh.
                    output::error(&format!("Error: {e}"));
                    continue;
                }
            },
            "q" | "quit" => break,
            "" => continue,
            other => {
                output::warning(&format!("Unknown command '{other}'"));
                continue;
            }
        }

        print_page(table, filter);
    }

    Ok(())
}

fn print_page(table: &TableView<LogEntry>, filter: &LogFilter) {
    let state = table.pagination_state();

    output::header(&format!("Audit Logs{}", describe_filter(filter)));

    if state.total_rows == 0 {
        output::warning("No audit entries found");
        if !filter.is_empty() {
            println!("  Try removing the search filters to see all entries.");
        }
        return;
    }

    println!();
    print!("{}", render_table(&table.table_model()));
    println!();
    println!("{}", render_footer(&state));
}

fn describe_filter(filter: &LogFilter) -> String {
    let parts: Vec<String> = filter
        .criteria()
        .map(|(name, value)| match name {
            "service_name" => format!("service={value}"),
            _ => format!("{name}={value}"),
        })
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_description() {
        assert_eq!(describe_filter(&LogFilter::default()), "");
        let filter = LogFilter {
            service_name: Some("billing".into()),
            operation: Some("refund".into()),
            ..LogFilter::default()
        };
        assert_eq!(
            describe_filter(&filter),
            " (service=billing, operation=refund)"
        );

        let actor = LogFilter {
            actor_id: Some("user-42".into()),
            actor_type: Some("user".into()),
            ..LogFilter::default()
        };
        assert_eq!(
            describe_filter(&actor),
            " (actor_id=user-42, actor_type=user)"
        );
    }
}
