//! orgtree CLI - manage an organization chart stored in a hosted database

use clap::Parser;

use orgtree::cli::{self, CacheCommands, Cli, Commands, GlobalOptions};
use orgtree::error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        if err.is_retryable() {
            eprintln!("This looks temporary; retry the command in a moment.");
        }
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("orgtree version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Show { root, depth } => cli::node::show(&opts, root.as_deref(), depth).await,
        Commands::Find { id } => cli::node::find(&opts, &id).await,
        Commands::Root { node } => cli::node::create_root(&opts, node).await,
        Commands::Add {
            parent_id,
            node,
            dry_run,
        } => cli::node::add(&opts, &parent_id, node, dry_run).await,
        Commands::Update { id, patch, dry_run } => {
            cli::node::update(&opts, &id, patch.into(), dry_run).await
        }
        Commands::Remove { id, yes, dry_run } => cli::node::remove(&opts, &id, yes, dry_run).await,
        Commands::Contact { name } => cli::directory::contact(&opts, &name),
        Commands::Location { name, title } => cli::directory::location(&opts, &name, &title),
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Status => cli::cache::status(opts.format_or_default()),
            CacheCommands::Clear => cli::cache::clear(opts.format_or_default()),
            CacheCommands::Path => cli::cache::path(),
        },
        Commands::Completion { shell } => {
            cli::completion::generate(shell);
            Ok(())
        }
    }
}
