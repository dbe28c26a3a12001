use anyhow::Result;
use clap::{Parser, Subcommand};
use go_out_mcp::api::{GoOutClient, IsGdShortener};
use go_out_mcp::config::{find_config_file, load_config, Config};
use go_out_mcp::mcp::{McpServer, ToolRegistry};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Go-Out MCP - expose the Go-Out event platform as MCP tools
#[derive(Parser, Debug)]
#[command(name = "go-out-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server and CLI for the Go-Out event platform", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configuration)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (for Claude Desktop and other MCP clients)
    Serve {
        /// Run in stdio mode
        #[arg(long, default_value_t = true)]
        stdio: bool,

        /// Run in streamable HTTP mode (overrides --stdio)
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, short, default_value_t = 3000)]
        port: u16,

        /// Host to bind to for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// List events with their statistics
    Events {
        /// List past events instead of active ones
        #[arg(long)]
        past: bool,

        /// Search filter for event titles
        #[arg(long, short, default_value = "")]
        search: String,

        /// Maximum events to return
        #[arg(long, short)]
        limit: Option<usize>,

        /// Number of events to skip
        #[arg(long, default_value_t = 0)]
        skip: usize,
    },

    /// List an event's participants, one row per person
    #[command(alias = "p")]
    Participants {
        /// Event ID
        event_id: String,

        /// Status filter: All, Pending, Accepted, Rejected, Hidden
        #[arg(long, default_value = "All")]
        status: String,

        /// With status All, leave out hidden participants
        #[arg(long)]
        exclude_hidden: bool,

        /// Max orders per status
        #[arg(long, short)]
        limit: Option<usize>,

        #[arg(long, default_value_t = 0)]
        skip: usize,
    },

    /// Show ticket statistics for an event
    #[command(alias = "stats")]
    Statistics {
        /// Event ID
        event_id: String,
    },

    /// Show salesman and tracking-link statistics for an event
    Salesmen {
        /// Event ID
        event_id: String,

        /// Search filter for salesman names
        #[arg(long, short, default_value = "")]
        search: String,

        /// Pagination offset
        #[arg(long, default_value_t = 0)]
        skip_num: usize,
    },

    /// List participants referred by one salesman
    BySalesman {
        /// Event ID
        event_id: String,

        /// Salesman phone number
        salesman_id: String,

        /// Status filter: All, Pending, Accepted, Rejected, Hidden
        #[arg(long, default_value = "All")]
        status: String,

        /// With status All, leave out hidden participants
        #[arg(long)]
        exclude_hidden: bool,

        /// Max participants to return
        #[arg(long, short)]
        limit: Option<usize>,

        #[arg(long, default_value_t = 0)]
        skip: usize,
    },

    /// Shorten one or more URLs with is.gd
    Shorten {
        /// URLs to shorten
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// List the available tools
    Tools {
        /// Include input schemas
        #[arg(long, short)]
        detailed: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Commands {
    /// Whether this command talks to the Go-Out API
    fn needs_token(&self) -> bool {
        matches!(
            self,
            Commands::Serve { .. }
                | Commands::Events { .. }
                | Commands::Participants { .. }
                | Commands::Statistics { .. }
                | Commands::Salesmen { .. }
                | Commands::BySalesman { .. }
        )
    }

    /// Tool name and arguments for commands that map onto a tool
    fn tool_call(&self) -> Option<(&'static str, Value)> {
        let call = match self {
            Commands::Events {
                past,
                search,
                limit,
                skip,
            } => {
                let mut args = json!({ "isActive": !past, "search": search, "skip": skip });
                if let Some(limit) = limit {
                    args["limit"] = json!(limit);
                }
                ("get_events", args)
            }
            Commands::Participants {
                event_id,
                status,
                exclude_hidden,
                limit,
                skip,
            } => {
                let mut args = json!({
                    "eventId": event_id,
                    "status": status,
                    "includeHidden": !exclude_hidden,
                    "skip": skip,
                });
                if let Some(limit) = limit {
                    args["limit"] = json!(limit);
                }
                ("get_event_participants", args)
            }
            Commands::Statistics { event_id } => {
                ("get_event_statistics", json!({ "eventId": event_id }))
            }
            Commands::Salesmen {
                event_id,
                search,
                skip_num,
            } => (
                "get_salesman_statistics",
                json!({ "eventId": event_id, "search": search, "skipNum": skip_num }),
            ),
            Commands::BySalesman {
                event_id,
                salesman_id,
                status,
                exclude_hidden,
                limit,
                skip,
            } => {
                let mut args = json!({
                    "eventId": event_id,
                    "salesmanId": salesman_id,
                    "status": status,
                    "includeHidden": !exclude_hidden,
                    "skip": skip,
                });
                if let Some(limit) = limit {
                    args["limit"] = json!(limit);
                }
                ("get_participants_by_salesman", args)
            }
            Commands::Shorten { urls } => ("shorten_links", json!({ "urls": urls })),
            Commands::Serve { .. } | Commands::Tools { .. } | Commands::Config => return None,
        };
        Some(call)
    }
}

fn print_env_vars() {
    println!("Go-Out MCP - Environment Variables");
    println!();
    println!("API:");
    println!("  GOOUT_TOKEN                 Bearer token for the Go-Out API (required)");
    println!("  GOOUT_BASE_URL              API base URL (default: https://www.go-out.co/endOne)");
    println!("  GOOUT_API__TIMEOUT_SECS     Request timeout in seconds (default: 30)");
    println!();
    println!("Defaults:");
    println!("  GOOUT_DEFAULTS__EVENTS_PAGE_SIZE     Events per upstream page (default: 5)");
    println!("  GOOUT_DEFAULTS__EVENTS_LIMIT         Events returned by default (default: 20)");
    println!("  GOOUT_DEFAULTS__PARTICIPANTS_LIMIT   Participants limit (default: 50)");
    println!("  GOOUT_DEFAULTS__MAX_EVENTS_TO_FETCH  Events scanned per call (default: 200)");
    println!("  GOOUT_DEFAULTS__SALESMAN_SCAN_LIMIT  Orders scanned per salesman lookup (default: 1000)");
    println!();
    println!("Shortener:");
    println!("  GOOUT_SHORTENER__ENDPOINT   URL shortener endpoint (default: https://is.gd/create.php)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export GOOUT_TOKEN=\"your-token-here\"");
    std::process::exit(0);
}

fn init_tracing(verbose: u8, quiet: bool, json_logs: bool) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if quiet { "error" } else { log_level };

    // stdout carries the MCP protocol and command output
    let json_layer = json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("go_out_mcp={}", env_filter)),
        ))
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn build_registry(config: &Config) -> Result<ToolRegistry> {
    let api = GoOutClient::new(
        config.api.base_url.clone(),
        config.api.token.as_deref().unwrap_or_default(),
        Duration::from_secs(config.api.timeout_secs),
    )?;
    let shortener = IsGdShortener::new(config.shortener.endpoint.clone())?;

    Ok(ToolRegistry::with_api(
        Arc::new(api),
        Arc::new(shortener),
        config.defaults.clone(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
    }

    init_tracing(cli.verbose, cli.quiet, cli.log_json);

    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let mut config = load_config(config_path.as_deref())?;
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }

    let command = cli.command.unwrap_or(Commands::Serve {
        stdio: true,
        http: false,
        port: 3000,
        host: "127.0.0.1".to_string(),
    });

    if command.needs_token() {
        config.validate()?;
    }

    match command {
        Commands::Serve {
            stdio,
            http,
            port,
            host,
        } => {
            let server = McpServer::new(build_registry(&config)?)?;

            if http || !stdio {
                let addr = format!("{}:{}", host, port);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        Commands::Tools { detailed } => {
            let registry = build_registry(&config)?;
            for tool in registry.all() {
                println!("{} - {}", tool.name, tool.description);
                if detailed {
                    println!("{}", serde_json::to_string_pretty(&tool.input_schema)?);
                    println!();
                }
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }

        tool_command => run_tool(&config, &tool_command).await?,
    }

    Ok(())
}

/// Run a data command through the tool registry and print the envelope
async fn run_tool(config: &Config, command: &Commands) -> Result<()> {
    let Some((tool, args)) = command.tool_call() else {
        return Ok(());
    };

    let registry = build_registry(config)?;
    let response = registry.call(tool, args).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if response["success"] != json!(true) {
        std::process::exit(1);
    }
    Ok(())
}
