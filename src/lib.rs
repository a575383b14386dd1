//! Client-side learning-state synchronization core for a language-learning
//! app: the reducers that own vocabulary list/word state, the orchestration
//! layer that maps REST calls onto reducer actions (with cancellation for
//! the overview fetch and a command queue behind optimistic mastery
//! updates), and quiz scoring reconciliation. Rendering and routing live
//! elsewhere; they drain [`core::tasks::TaskManager::poll_updates`] and
//! apply each action to the matching state machine.

pub mod api;
pub mod core;
pub mod persistence;
pub mod quiz;
pub mod state;

pub use crate::core::{
    ClientConfig,
    LexitrackError,
};
