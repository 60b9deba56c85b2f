//! Menu state: screens, rows, cursor and the active-node stack

pub mod node;
pub mod option;
pub mod selection;
pub mod stack;

pub use node::{MenuNode, MenuTree, NodeId, NodeState};
pub use option::{
    ActionFn, ExternalProcess, LAUNCH_FAILED, MenuOption, OptionKind, Populate, ReturnValue, Step,
};
pub use selection::Selectable;
pub use stack::{ActiveStack, RunFrame};
