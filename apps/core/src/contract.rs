use serde::{Deserialize, Serialize};

use crate::model::ItemDto;
use crate::widget::{RequiredPart, RoverParts};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddRequest {
    pub identity: String,
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityRequest {
    pub identity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetDisabledRequest {
    pub identity: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderRequest {
    pub identities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum EngineRequest {
    Add(AddRequest),
    Forget(IdentityRequest),
    Get(IdentityRequest),
    All,
    Size,
    SetDisabled(SetDisabledRequest),
    SetPresentationOrder(OrderRequest),
    Activate(IdentityRequest),
    Deactivate,
    IsActivated(IdentityRequest),
    ActiveItem,
    ActivateFirst,
    ActivateLast,
    ActivateNext,
    ActivatePrev,
    ActivateByKey(KeyRequest),
    ResetTypeAhead,
    Search(SearchRequest),
    Navigation,
    Mount(RoverParts),
    Flush,
    State,
}

/// Externally observable engine fields after a request was applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineState {
    pub pending: bool,
    pub active_identity: Option<String>,
    pub nav_cursor: Option<usize>,
    pub size: usize,
    pub last_query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemResponse {
    pub item: Option<ItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemsResponse {
    pub items: Vec<ItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SizeResponse {
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivatedResponse {
    pub activated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MountResponse {
    pub missing: Vec<RequiredPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlushResponse {
    pub ran: bool,
    pub rebuilds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum EngineResponse {
    State(EngineState),
    Item(ItemResponse),
    Items(ItemsResponse),
    Size(SizeResponse),
    Activated(ActivatedResponse),
    Mounted(MountResponse),
    Flushed(FlushResponse),
}
