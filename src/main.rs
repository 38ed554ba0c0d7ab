use anyhow::Result;
use clap::{Parser, Subcommand};
use commit_view::areas::config::{DEFAULT_PAGE_SIZE, GraphMode};
use commit_view::artifacts::core::output::LogOutput;
use commit_view::artifacts::log::filter::CaseSensitivity;
use commit_view::commands::porcelain::log::{LogOptions, log};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "commit-view",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A filterable commit list for the terminal",
    long_about = "Renders the commit history of a repository the way an interactive \
    commits panel shows it: a window of rows with graph, author, bisect and \
    cherry-pick markers, filtered by a needle and keeping a selected commit.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "log",
        about = "Show a window of the commit list",
        long_about = "This command loads the history of the repository at the given path \
        (the current directory by default) and prints the rows of the commits panel \
        between --start and --start + --length."
    )]
    Log {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
        #[arg(long, default_value_t = 0, help = "First row of the window")]
        start: usize,
        #[arg(long, default_value_t = 100, help = "Number of rows in the window")]
        length: usize,
        #[arg(long, help = "Only show commits whose subject contains this text")]
        filter: Option<String>,
        #[arg(long = "case", value_enum, default_value_t, help = "How --filter treats case")]
        case_sensitivity: CaseSensitivity,
        #[arg(long, help = "Commit to select (full or abbreviated hash)")]
        select: Option<String>,
        #[arg(long, value_enum, default_value_t, help = "When to draw the commit graph")]
        graph: GraphMode,
        #[arg(long, help = "Show the wide columns of a maximised panel")]
        expanded: bool,
        #[arg(long, help = "Show the history of all branches")]
        all: bool,
        #[arg(long, help = "Load the whole history instead of paging")]
        no_limit: bool,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, help = "Commits loaded per page")]
        limit: usize,
        #[arg(long, help = "strftime pattern of the date column")]
        time_format: Option<String>,
        #[arg(long, help = "Highlight the commit a diff is taken against")]
        diff: Option<String>,
        #[arg(long = "cherry-pick", help = "Mark a commit as copied for cherry-picking")]
        cherry_pick: Vec<String>,
        #[arg(long, help = "Mark a commit as good in a running bisect")]
        bisect_good: Vec<String>,
        #[arg(long, help = "Mark a commit as bad in a running bisect")]
        bisect_bad: Option<String>,
        #[arg(long, help = "Mark a commit as skipped in a running bisect")]
        bisect_skipped: Vec<String>,
        #[arg(long, help = "The commit a running bisect has checked out")]
        bisect_current: Option<String>,
        #[arg(long, help = "Show :shortcode: sequences in subjects as emoji")]
        parse_emoji: bool,
        #[arg(long, help = "Disable colors")]
        no_color: bool,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Log {
            path,
            start,
            length,
            filter,
            case_sensitivity,
            select,
            graph,
            expanded,
            all,
            no_limit,
            limit,
            time_format,
            diff,
            cherry_pick,
            bisect_good,
            bisect_bad,
            bisect_skipped,
            bisect_current,
            parse_emoji,
            no_color,
        } => {
            let path = match path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            let options = LogOptions {
                path,
                start,
                length,
                filter,
                case_sensitivity,
                select,
                graph,
                expanded,
                all,
                no_limit,
                limit,
                time_format,
                diff,
                cherry_picked: cherry_pick,
                bisect_good,
                bisect_bad,
                bisect_skipped,
                bisect_current,
                parse_emoji,
                color: !no_color,
            };

            let lines = log(&options)?;
            let mut output = LogOutput::detect();
            for line in &lines {
                output.write_line(line)?;
            }
            output.finish()?;
        }
    }

    Ok(())
}
