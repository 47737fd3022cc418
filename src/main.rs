use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use workspace_explorer::kernel::hub::{topics, HubMessage};
use workspace_explorer::kernel::services::adapters::{
    get_storage_path, load_or_init_config, FileStorage, HttpBackend, MemoryStorage,
};
use workspace_explorer::kernel::services::ports::{Backend, Storage};
use workspace_explorer::kernel::{Action, ContextTarget};
use workspace_explorer::models::{NodeId, TreeView};
use workspace_explorer::Explorer;

mod logging;

/// Browse and edit a remote IDE workspace from the command line.
#[derive(Parser, Debug)]
#[command(name = "wsx", version)]
struct Cli {
    /// Settings file; defaults to the cache directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the server base URL from the settings.
    #[arg(long, global = true)]
    server: Option<String>,
    /// Switches (and persists) the selected workspace first.
    #[arg(short, long, global = true)]
    workspace: Option<String>,
    /// Seconds to wait for the backend to settle.
    #[arg(long, global = true, default_value_t = 30)]
    wait: u64,
    /// Mirror logs to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the project tree of the selected workspace.
    Tree,
    /// List workspace names.
    Workspaces,
    /// Rename the node at PATH.
    Rename { path: String, name: String },
    /// Copy the node at PATH into the folder or project at TARGET.
    Copy { path: String, target: String },
    /// Move the node at PATH into the folder or project at TARGET.
    Move { path: String, target: String },
    /// Delete nodes.
    Delete {
        paths: Vec<String>,
        #[arg(long)]
        unpublish: bool,
    },
    /// Create a folder inside PARENT.
    Mkdir { parent: String, name: String },
    /// Create a file inside PARENT.
    Touch {
        parent: String,
        name: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    CreateProject { name: String },
    LinkProject { name: String, path: String },
    CreateWorkspace { name: String },
    /// Delete the selected workspace.
    DeleteWorkspace,
    /// Publish a resource path such as `/workspace/demo/*`.
    Publish { path: String },
    Unpublish { path: String },
    PublishAll,
    UnpublishAll,
    /// Print the context menu of PATH (or the background) as JSON.
    Menu { path: Option<String> },
}

/// Status, alert and publish notifications the explorer posts.
struct Notifications {
    receivers: Vec<(&'static str, Receiver<HubMessage>)>,
    errors: usize,
}

impl Notifications {
    fn subscribe(explorer: &mut Explorer) -> Self {
        let hub = explorer.hub_mut();
        let receivers = [topics::STATUS_MESSAGE, topics::STATUS_ERROR, topics::ALERT]
            .into_iter()
            .map(|topic| (topic, hub.subscribe(topic, true)))
            .collect();
        Self {
            receivers,
            errors: 0,
        }
    }

    fn flush(&mut self) {
        for (topic, rx) in &self.receivers {
            for message in rx.try_iter() {
                let text = message.str_field("message").unwrap_or_default();
                match *topic {
                    topics::STATUS_MESSAGE => println!("{text}"),
                    topics::ALERT => {
                        self.errors += 1;
                        let title = message.str_field("title").unwrap_or("Error");
                        eprintln!("{title}: {text}");
                    }
                    _ => {
                        self.errors += 1;
                        eprintln!("error: {text}");
                    }
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logging = logging::init(cli.verbose);

    let mut config = load_or_init_config(cli.config.as_deref()).context("loading settings")?;
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    let http = HttpBackend::new(&config.server).context("configuring backend")?;
    tracing::info!(server = %http.base_url(), "wsx starting");

    let storage: Box<dyn Storage> = match get_storage_path() {
        Some(path) => Box::new(FileStorage::open(path)),
        None => Box::new(MemoryStorage::new()),
    };
    let mut explorer = Explorer::new(&config, Backend::from_service(Arc::new(http)), storage)
        .context("starting runtime")?;
    let mut notifications = Notifications::subscribe(&mut explorer);
    let wait = Duration::from_secs(cli.wait);

    explorer.init();
    settle(&mut explorer, wait)?;
    if let Some(name) = cli.workspace.clone() {
        explorer.dispatch(Action::SwitchWorkspace { name });
        settle(&mut explorer, wait)?;
    }
    notifications.flush();

    let command = cli.command.unwrap_or(Command::Tree);
    let print_tree = run(&mut explorer, command)?;
    settle(&mut explorer, wait)?;
    notifications.flush();
    if print_tree {
        print_rows(&explorer);
    }

    if notifications.errors > 0 {
        bail!("{} error(s) reported", notifications.errors);
    }
    Ok(())
}

fn settle(explorer: &mut Explorer, wait: Duration) -> Result<()> {
    if explorer.run_until_idle(wait) {
        Ok(())
    } else {
        Err(anyhow!("backend did not answer within {}s", wait.as_secs()))
    }
}

fn node_at(explorer: &Explorer, path: &str) -> Result<NodeId> {
    explorer
        .tree()
        .find_by_path(path)
        .ok_or_else(|| anyhow!("no node at '{path}'"))
}

/// Returns whether the tree should be printed afterwards.
fn run(explorer: &mut Explorer, command: Command) -> Result<bool> {
    match command {
        Command::Tree => return Ok(true),
        Command::Workspaces => {
            let selected = explorer.selected_workspace().to_string();
            for name in &explorer.state().workspace_names {
                let marker = if *name == selected { "*" } else { " " };
                println!("{marker} {name}");
            }
            return Ok(false);
        }
        Command::Rename { path, name } => {
            let node = node_at(explorer, &path)?;
            explorer.tree_mut().user_rename(node, &name)?;
        }
        Command::Copy { path, target } => {
            let node = node_at(explorer, &path)?;
            let parent = node_at(explorer, &target)?;
            explorer.tree_mut().user_copy(node, parent, None)?;
        }
        Command::Move { path, target } => {
            let node = node_at(explorer, &path)?;
            let parent = node_at(explorer, &target)?;
            explorer.tree_mut().user_move(node, parent, None)?;
        }
        Command::Delete { paths, unpublish } => {
            let nodes = paths
                .iter()
                .map(|path| node_at(explorer, path))
                .collect::<Result<Vec<_>>>()?;
            explorer.dispatch(Action::DeleteNodes { nodes, unpublish });
        }
        Command::Mkdir { parent, name } => {
            let parent = node_at(explorer, &parent)?;
            explorer.dispatch(Action::CreateFolder { parent, name });
        }
        Command::Touch {
            parent,
            name,
            content,
        } => {
            let parent = node_at(explorer, &parent)?;
            explorer.dispatch(Action::CreateFile {
                parent,
                name,
                content,
            });
        }
        Command::CreateProject { name } => {
            explorer.dispatch(Action::CreateProject { name });
        }
        Command::LinkProject { name, path } => {
            explorer.dispatch(Action::LinkProject { name, path });
        }
        Command::CreateWorkspace { name } => {
            explorer.dispatch(Action::CreateWorkspace { name });
            return Ok(false);
        }
        Command::DeleteWorkspace => {
            explorer.dispatch(Action::DeleteWorkspace);
        }
        Command::Publish { path } => {
            explorer.dispatch(Action::Publish { path });
            return Ok(false);
        }
        Command::Unpublish { path } => {
            explorer.dispatch(Action::Unpublish { path });
            return Ok(false);
        }
        Command::PublishAll => {
            explorer.dispatch(Action::PublishAll);
            return Ok(false);
        }
        Command::UnpublishAll => {
            explorer.dispatch(Action::UnpublishAll);
            return Ok(false);
        }
        Command::Menu { path } => {
            let target = match path {
                Some(path) => ContextTarget::Node(node_at(explorer, &path)?),
                None => ContextTarget::Background,
            };
            let menu = explorer
                .context_menu(target)
                .ok_or_else(|| anyhow!("no context menu here"))?;
            println!("{}", serde_json::to_string_pretty(&menu)?);
            return Ok(false);
        }
    }
    // Gestures queue tree events; pump them into the store.
    explorer.pump();
    Ok(true)
}

fn print_rows(explorer: &Explorer) {
    println!("{}", explorer.selected_workspace());
    for row in explorer.tree().rows().into_iter().filter(|r| !r.hidden) {
        let indent = "  ".repeat(row.depth as usize + 1);
        let marker = row.status.map(|s| s.marker()).unwrap_or_default();
        if marker.is_empty() {
            println!("{indent}{}", row.text);
        } else {
            println!("{indent}{} [{marker}]", row.text);
        }
    }
}
