// UI layer: one handler per command. Handlers resolve the config, run the
// API calls behind a spinner and print to the given writer, so tests can
// capture the output. Errors are returned to `main`, which owns the exit
// status.

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::CommandFactory;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{base_name, ApiClient, RecordPage};
use crate::cli::{Cli, Command, ConfigArgs, FilesArgs};
use crate::config::ConfigStore;
use crate::error::CmdimError;

/// Separator printed around each listed record.
pub const RULE: &str = "----------------------------------------";

const SET_NOTE: &str = "
Note:
- Make sure that you provided the link to PocketBase valid record
- Example: https://your-pocketbase-instance.com/api/collections/{record-name}/records
- Make sure that your record is valid and has the fields \"name\", \"file\", \"link\", \"created\"
- Use \"cmdim check\" to check if the PocketBase Instance is running
";

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let store = cli
        .config
        .map(ConfigStore::at)
        .unwrap_or_else(ConfigStore::from_home);
    log::debug!(path:? = store.path(); "using config file");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Config(args) => config_command(&store, &args, &mut out),
        Command::Check => check_command(&store, &mut out),
        Command::Files(args) => files_command(&store, &args, &mut out),
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cmdim", &mut out);
            Ok(())
        }
    }
}

/// HTTP status behind a failed command, if the failure came from the API.
pub fn failure_status(err: &anyhow::Error) -> Option<u16> {
    err.chain()
        .find_map(|e| e.downcast_ref::<CmdimError>())
        .and_then(CmdimError::status)
}

/// `config`: each present flag is handled in turn (set, get, path). With no
/// flags, prompt for the URL when attached to a terminal.
pub fn config_command(store: &ConfigStore, args: &ConfigArgs, out: &mut impl Write) -> Result<()> {
    if let Some(url) = args.set.as_deref().filter(|u| !u.is_empty()) {
        save_url(store, url, out)?;
    }
    if args.get {
        let url = store.get().context("Error loading config")?;
        writeln!(out, "{url}")?;
    }
    if args.path {
        writeln!(out, "{}", store.path().display())?;
    }
    if args.is_empty() {
        if io::stdin().is_terminal() {
            prompt_for_url(store, out)?;
        } else {
            writeln!(out, "Nothing to do. See `cmdim config --help`.")?;
        }
    }
    Ok(())
}

fn save_url(store: &ConfigStore, url: &str, out: &mut impl Write) -> Result<()> {
    store
        .set(url)
        .with_context(|| format!("Error saving config to {}", store.path().display()))?;
    writeln!(out, "PocketBase Instance URL set to: {url}")?;
    writeln!(out, "{SET_NOTE}")?;
    Ok(())
}

fn prompt_for_url(store: &ConfigStore, out: &mut impl Write) -> Result<()> {
    let mut input = Input::<String>::new();
    input.with_prompt("PocketBase collection URL");
    if let Ok(current) = store.get() {
        if !current.is_empty() {
            input.with_initial_text(current);
        }
    }
    let url = input.interact_text()?;
    save_url(store, url.trim(), out)
}

/// `check`: probe the configured instance. Any failure is an error.
pub fn check_command(store: &ConfigStore, out: &mut impl Write) -> Result<()> {
    let url = store.instance_url().context("Error loading config")?;
    let api = ApiClient::new(url.as_str())?;
    with_spinner("Checking PocketBase Instance...", || api.check())
        .context("Error checking PocketBase Instance")?;
    writeln!(out, "PocketBase Instance is running at: {url}")?;
    Ok(())
}

/// `files`: upload, list, delete, in that order. The first failure stops
/// the command.
pub fn files_command(store: &ConfigStore, args: &FilesArgs, out: &mut impl Write) -> Result<()> {
    let upload = args.upload.as_deref().filter(|p| !p.as_os_str().is_empty());
    let delete = args.delete.as_deref().filter(|id| !id.is_empty());
    if upload.is_none() && !args.list && delete.is_none() {
        writeln!(out, "Nothing to do. See `cmdim files --help`.")?;
        return Ok(());
    }

    let url = store.instance_url().context("Error loading config")?;
    let api = ApiClient::new(url)?;

    if let Some(path) = upload {
        upload_file(&api, path, out)?;
    }
    if args.list {
        list_files(&api, out)?;
    }
    if let Some(id) = delete {
        delete_file(&api, id, out)?;
    }
    Ok(())
}

fn upload_file(api: &ApiClient, path: &Path, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Uploading file: {}", path.display())?;
    let record = with_spinner("Uploading...", || api.create_record(path))
        .with_context(|| format!("Could not upload {}", path.display()))?;
    writeln!(out, "Successfully uploaded {}", base_name(path))?;

    let link = with_spinner("Saving link...", || api.link_record(&record)).with_context(|| {
        format!(
            "File uploaded as record {} but its link could not be stored",
            record.id
        )
    })?;
    writeln!(out, "Link: {link}")?;
    Ok(())
}

fn list_files(api: &ApiClient, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Listing files...")?;
    let page = with_spinner("Fetching files...", || api.list()).context("Could not list files")?;
    render_page(&page, out)?;
    Ok(())
}

fn delete_file(api: &ApiClient, id: &str, out: &mut impl Write) -> Result<()> {
    with_spinner("Deleting...", || api.delete(id))
        .with_context(|| format!("Could not delete file {id}"))?;
    writeln!(out, "File deleted successfully")?;
    Ok(())
}

/// Print one block per record, or "No files found".
pub fn render_page(page: &RecordPage, out: &mut impl Write) -> io::Result<()> {
    if page.items.is_empty() {
        return writeln!(out, "No files found");
    }
    writeln!(out, "\nFiles:")?;
    writeln!(out, "{RULE}")?;
    for file in &page.items {
        writeln!(out, "ID: {}", file.id)?;
        writeln!(out, "Name: {}", file.file)?;
        writeln!(out, "Link: {}", file.link)?;
        writeln!(out, "Created: {}", file.created)?;
        writeln!(out, "{RULE}")?;
    }
    Ok(())
}

/// Run `f` while a spinner is drawn on stderr. The spinner stays hidden
/// when stderr is not a terminal.
fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> crate::Result<T>) -> crate::Result<T> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}
