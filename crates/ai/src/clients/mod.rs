#[cfg(feature = "openai_client")]
pub mod openai;

use crate::chat_completions::ChatCompletion;
use dyn_clone::DynClone;

/// A boxable completion backend. The relay holds one as `Box<dyn Client>`.
pub trait Client: DynClone + ChatCompletion + Send + Sync {}

dyn_clone::clone_trait_object!(Client);
