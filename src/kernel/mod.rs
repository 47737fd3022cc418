//! Headless explorer core (state/action/effect).

pub mod action;
pub mod context_menu;
pub mod effect;
pub mod hub;
pub mod rollback;
pub mod services;
pub mod spinner;
pub mod state;
pub mod store;

pub use action::Action;
pub use context_menu::{ContextTarget, Menu, MenuItem};
pub use effect::{BackendRequest, Effect, RequestId};
pub use hub::{HubMessage, MessageHub};
pub use rollback::{OpId, OpKind, PendingOps};
pub use state::{DialogState, ExplorerState, MenuTemplate, TemplateCatalog, TemplateDescriptor};
pub use store::{DispatchResult, Store};
