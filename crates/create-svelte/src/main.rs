//! db-create-svelte - Project scaffolding for Svelte applications

use clap::{ArgAction, CommandFactory, Parser};
use colored::Colorize;
use scaffold_core::{
    ErrorCategory, PackageManager, ProductConfig, ProjectRequest, ScaffoldError, Scaffolder, SystemRunner,
    TemplateVariant,
};
use std::error::Error as _;
use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;

mod logging;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

const ISSUES_URL: &str = "https://github.com/dbMongola/db-create-svelte/issues/new";

const AFTER_HELP: &str = "\
    Only <project-directory> is required.

    --mpa selects the multi-page template.

    If you have any problems, do not hesitate to file an issue:
      https://github.com/dbMongola/db-create-svelte/issues/new";

/// Svelte product configuration
#[derive(Clone)]
pub struct SvelteConfig;

impl ProductConfig for SvelteConfig {
    fn name(&self) -> &'static str {
        "db-create-svelte"
    }

    fn display_name(&self) -> &'static str {
        "Svelte"
    }

    fn version(&self) -> &'static str {
        CLI_VERSION
    }

    fn default_template_source(&self) -> &'static str {
        "dbMongola/svelte-template"
    }

    fn template_source_env(&self) -> &'static str {
        "DB_CREATE_SVELTE_TEMPLATE"
    }

    fn registry_url_env(&self) -> &'static str {
        "DB_CREATE_SVELTE_REGISTRY"
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        &["svelte"]
    }

    fn upgrade_command(&self) -> &'static str {
        "npm install -g db-create-svelte"
    }

    fn issues_url(&self) -> &'static str {
        ISSUES_URL
    }

    fn next_steps(&self, project: &str, _dir: &Path) -> Vec<String> {
        vec![format!("cd {}", project), "npm start".to_string()]
    }
}

#[derive(Parser, Debug)]
#[command(name = "db-create-svelte")]
#[command(about = "Create a new Svelte project from a template")]
#[command(version, disable_version_flag = true)]
#[command(override_usage = "db-create-svelte <project-directory> [options]")]
#[command(after_help = AFTER_HELP)]
pub struct Args {
    /// Project directory to create
    #[arg(value_name = "project-directory")]
    pub project_directory: Option<String>,

    /// Print the version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Show the package manager's install log
    #[arg(long)]
    pub verbose: bool,

    /// Print environment debug info and exit
    #[arg(long)]
    pub info: bool,

    /// Use the multi-page template
    #[arg(long)]
    pub mpa: bool,

    /// Install dependencies with cnpm instead of npm
    #[arg(long = "use-cnpm")]
    pub use_cnpm: bool,
}

/// What this invocation should do, decided before any work starts
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    /// Print the environment report
    Info,
    /// No project directory was given
    MissingProject,
    Scaffold(ProjectRequest),
}

impl Args {
    pub fn mode(self) -> Mode {
        if self.info {
            return Mode::Info;
        }
        match self.project_directory {
            None => Mode::MissingProject,
            Some(name) => Mode::Scaffold(ProjectRequest {
                name,
                package_manager: if self.use_cnpm {
                    PackageManager::Cnpm
                } else {
                    PackageManager::Npm
                },
                verbose: self.verbose,
                variant: if self.mpa {
                    TemplateVariant::MultiPage
                } else {
                    TemplateVariant::SinglePage
                },
            }),
        }
    }
}

/// Drop options this version does not know, so newer flags don't break older installs.
/// An unknown option written without `=value` also takes the next non-option token
/// with it, since that token is most likely its value.
/// Returns the arguments to parse and the tokens that were dropped.
pub fn strip_unknown_options<I>(argv: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = OsString>,
{
    let command = Args::command();
    let mut longs: Vec<String> = vec!["help".to_string()];
    let mut shorts: Vec<char> = vec!['h'];
    for arg in command.get_arguments() {
        if let Some(long) = arg.get_long() {
            longs.push(long.to_string());
        }
        if let Some(short) = arg.get_short() {
            shorts.push(short);
        }
    }

    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    let mut positional_only = false;
    let mut takes_value = false;

    for (i, raw) in argv.into_iter().enumerate() {
        let token = raw.to_string_lossy().into_owned();
        let is_option = !positional_only && token != "-" && token.starts_with('-');

        if takes_value {
            takes_value = false;
            if !is_option {
                dropped.push(token);
                continue;
            }
        }

        let known = if i == 0 || !is_option {
            true
        } else if token == "--" {
            positional_only = true;
            true
        } else if let Some(long) = token.strip_prefix("--") {
            let name = long.split('=').next().unwrap_or(long);
            longs.iter().any(|l| l == name)
        } else {
            token[1..].chars().all(|c| shorts.contains(&c))
        };

        if known {
            kept.push(token);
        } else {
            takes_value = !token.contains('=');
            dropped.push(token);
        }
    }

    (kept, dropped)
}

#[tokio::main]
async fn main() -> ExitCode {
    let (argv, ignored) = strip_unknown_options(std::env::args_os());
    let args = Args::parse_from(argv);

    if let Err(e) = logging::init_logging(args.verbose) {
        eprintln!("{e}");
    }
    for option in &ignored {
        tracing::debug!(%option, "ignoring unknown option");
    }

    let config = SvelteConfig;
    let runner = SystemRunner;

    match args.mode() {
        Mode::Info => {
            print_info(&config, &runner).await;
            ExitCode::SUCCESS
        }
        Mode::MissingProject => {
            print_missing_project(&config);
            ExitCode::from(1)
        }
        Mode::Scaffold(request) => match scaffold(&config, &runner, &request).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => handle_error(&config, e),
        },
    }
}

async fn scaffold(
    config: &SvelteConfig,
    runner: &SystemRunner,
    request: &ProjectRequest,
) -> Result<(), ScaffoldError> {
    let scaffolder = Scaffolder::new(config, runner)?;
    let report = scaffolder.run(request).await?;
    tracing::info!(
        root = %report.root.display(),
        advisories = report.advisories.len(),
        fetch = ?report.fetch,
        "scaffold finished"
    );
    Ok(())
}

async fn print_info(config: &SvelteConfig, runner: &SystemRunner) {
    println!("{}", "\nEnvironment Info:".bold());
    println!();
    println!("  current version of {}: {}", config.name(), config.version());
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        println!("  running from {}", dir.display());
    }
    println!();

    let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let report = scaffold_core::collect_env_report(config, runner, &cwd).await;
    print!("{}", report);
}

fn print_missing_project(config: &SvelteConfig) {
    let name = config.name();
    eprintln!("Please specify the project directory:");
    println!("  {} {}", name.cyan(), "<project-directory>".green());
    println!();
    println!("For example:");
    println!("  {} {}", name.cyan(), "my-svelte-app".green());
    println!();
    println!(
        "Run {} to see all options.",
        format!("{} --help", name).cyan()
    );
}

/// Translate a `ScaffoldError` into a user message and exit code
fn handle_error(config: &SvelteConfig, err: ScaffoldError) -> ExitCode {
    tracing::debug!(category = ?err.category(), "scaffold failed");

    eprintln!();
    eprintln!("{}", err.to_string().red());
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
        source = cause.source();
    }
    if let Some(command) = err.command() {
        eprintln!();
        eprintln!("  {} {}", "command:".dimmed(), command);
    }
    if let Some(hint) = err.hint() {
        eprintln!();
        eprintln!("{}", hint);
    }
    if err.category() == ErrorCategory::Internal {
        eprintln!();
        eprintln!("If the problem persists, file an issue: {}", config.issues_url());
    }

    ExitCode::from(err.exit_code())
}
