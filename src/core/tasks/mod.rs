pub mod handle;
pub mod manager;
pub mod queue;
pub mod types;

pub use handle::TaskHandle;
pub use manager::TaskManager;
pub use queue::{
    ProgressCommand,
    ProgressQueue,
};
pub use types::StateUpdate;
