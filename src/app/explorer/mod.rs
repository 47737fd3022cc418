//! 资源管理器：统一管理内核 store、消息总线与后端请求
//!
//! Everything here runs on the thread that owns the [`Explorer`]. Tree
//! gestures, hub messages and backend responses queue up on channels and
//! are fed to the store by [`Explorer::pump`].

use std::io;
use std::sync::mpsc::{self, Receiver};

use crate::kernel::hub::topics;
use crate::kernel::services::adapters::{AppMessage, AsyncRuntime};
use crate::kernel::services::ports::{load_selected_workspace, Backend, ExplorerConfig, Storage};
use crate::kernel::{Action, ContextTarget, ExplorerState, HubMessage, Menu, MessageHub, Store};
use crate::models::{ProjectTree, TreeEvent, TreeEventKind, TreeView};

mod bridge;
mod tick;

const MAX_TREE_DRAIN_PER_TICK: usize = 256;
const MAX_HUB_DRAIN_PER_TICK: usize = 256;
const MAX_RESPONSE_DRAIN_PER_TICK: usize = 256;

pub struct Explorer {
    store: Store<ProjectTree>,
    hub: MessageHub,
    runtime: AsyncRuntime,
    responses: Receiver<AppMessage>,
    tree_events: Receiver<TreeEvent>,
    inbox: Receiver<HubMessage>,
    storage: Box<dyn Storage>,
}

impl Explorer {
    pub fn new(
        config: &ExplorerConfig,
        backend: Backend,
        mut storage: Box<dyn Storage>,
    ) -> io::Result<Self> {
        let selected = load_selected_workspace(storage.as_mut(), &config.default_workspace);
        tracing::info!(workspace = %selected, "explorer starting");

        let mut tree = ProjectTree::new();
        let (tree_tx, tree_events) = mpsc::channel();
        for kind in [
            TreeEventKind::Select,
            TreeEventKind::DoubleClick,
            TreeEventKind::Rename,
            TreeEventKind::Copy,
            TreeEventKind::Move,
        ] {
            tree.on(kind, tree_tx.clone());
        }

        let mut hub = MessageHub::new(config.hub_prefix.clone());
        let (inbox_tx, inbox) = mpsc::channel();
        for topic in topics::CONSUMED {
            hub.on_did_receive_message(topic, inbox_tx.clone(), true);
        }

        let (tx, responses) = mpsc::channel();
        let runtime = AsyncRuntime::new(backend, tx)?;

        Ok(Self {
            store: Store::new(ExplorerState::new(config, selected), tree),
            hub,
            runtime,
            responses,
            tree_events,
            inbox,
            storage,
        })
    }

    /// Lists workspaces, loads the selected one and fetches templates.
    pub fn init(&mut self) -> bool {
        self.dispatch(Action::Init)
    }

    pub fn state(&self) -> &ExplorerState {
        self.store.state()
    }

    pub fn store(&self) -> &Store<ProjectTree> {
        &self.store
    }

    pub fn tree(&self) -> &ProjectTree {
        self.store.tree()
    }

    /// Gestures on the tree; their events are handled on the next pump.
    pub fn tree_mut(&mut self) -> &mut ProjectTree {
        self.store.tree_mut()
    }

    pub fn hub(&self) -> &MessageHub {
        &self.hub
    }

    /// Subscribe to the explorer's notifications or post to it.
    pub fn hub_mut(&mut self) -> &mut MessageHub {
        &mut self.hub
    }

    /// Posts on a global topic; consumed topics reach the store on the next
    /// pump.
    pub fn post(&mut self, topic: &str, data: serde_json::Value) -> usize {
        self.hub.post_message(topic, data, true)
    }

    pub fn context_menu(&mut self, target: ContextTarget) -> Option<Menu> {
        self.store.context_menu(target)
    }

    pub fn selected_workspace(&self) -> &str {
        &self.store.state().selected_workspace
    }

    pub fn root(&self) -> crate::models::NodeId {
        self.store.tree().root()
    }
}
