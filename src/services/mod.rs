// Service exports
pub mod maps;
pub mod stores;

pub use maps::{HttpScriptSource, LoadState, MapsError, MapsLoader, ScriptSource};
pub use stores::{StoreComparison, StoreSearchPage, StoreSearchParams, StoresClient, StoresError};
