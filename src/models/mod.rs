//! 数据模型层

pub mod tree;
pub mod workspace;

pub use tree::{
    ClipboardMode, FileStatus, NewNode, NodeData, NodeId, NodeKind, ProjectTree, TreeError,
    TreeEvent, TreeEventKind, TreeNode, TreeRow, TreeView,
};
pub use workspace::{
    build_projects, file_extension, is_valid_name, rebase_path, strip_workspace,
    with_trailing_slash, FileIcons, FileMetadata, ProjectDescriptor, ResourceDescriptor,
    WorkspaceDescriptor,
};
