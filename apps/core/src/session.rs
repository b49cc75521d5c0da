use crate::config::{validate, Config};
use crate::contract::{
    ActivatedResponse, EngineRequest, EngineResponse, EngineState, FlushResponse, ItemResponse,
    ItemsResponse, MountResponse, SizeResponse,
};
use crate::engine::OptionCollection;
use crate::model::{Item, ItemDto};
use crate::widget::check_parts;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// One widget's engine, driven through the request contract.
#[derive(Debug)]
pub struct Session {
    config: Config,
    engine: OptionCollection,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, SessionError> {
        validate(&config).map_err(SessionError::Config)?;
        let engine = OptionCollection::new(config.engine.clone());
        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &OptionCollection {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut OptionCollection {
        &mut self.engine
    }

    /// Ends the current turn: runs the rebuild scheduled during it, if any.
    pub fn end_turn(&mut self) -> bool {
        self.engine.flush()
    }

    pub fn handle_command(&mut self, request: EngineRequest) -> Result<EngineResponse, SessionError> {
        let engine = &mut self.engine;
        match request {
            EngineRequest::Add(add) => {
                if add.identity.is_empty() {
                    return Err(SessionError::InvalidRequest(
                        "identity must not be empty".to_string(),
                    ));
                }
                engine.add(&add.identity, &add.value, add.disabled);
            }
            EngineRequest::Forget(target) => engine.forget(&target.identity),
            EngineRequest::Get(target) => {
                return Ok(EngineResponse::Item(ItemResponse {
                    item: engine.get(&target.identity).map(ItemDto::from),
                }));
            }
            EngineRequest::All => return Ok(items_response(engine.all())),
            EngineRequest::Size => {
                return Ok(EngineResponse::Size(SizeResponse {
                    size: engine.size(),
                }));
            }
            EngineRequest::SetDisabled(change) => engine.set_disabled(&change.identity, change.disabled),
            EngineRequest::SetPresentationOrder(order) => {
                engine.set_presentation_order(&order.identities)
            }
            EngineRequest::Activate(target) => engine.activate(&target.identity),
            EngineRequest::Deactivate => engine.deactivate(),
            EngineRequest::IsActivated(target) => {
                return Ok(EngineResponse::Activated(ActivatedResponse {
                    activated: engine.is_activated(&target.identity),
                }));
            }
            EngineRequest::ActiveItem => {
                return Ok(EngineResponse::Item(ItemResponse {
                    item: engine.active_item().map(ItemDto::from),
                }));
            }
            EngineRequest::ActivateFirst => engine.activate_first(),
            EngineRequest::ActivateLast => engine.activate_last(),
            EngineRequest::ActivateNext => engine.activate_next(),
            EngineRequest::ActivatePrev => engine.activate_prev(),
            EngineRequest::ActivateByKey(key) => {
                let mut chars = key.key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => engine.activate_by_key(c),
                    _ => {
                        return Err(SessionError::InvalidRequest(format!(
                            "key must be exactly one character, got {:?}",
                            key.key
                        )));
                    }
                }
            }
            EngineRequest::ResetTypeAhead => engine.reset_type_ahead(),
            EngineRequest::Search(search) => return Ok(items_response(engine.search(&search.query))),
            EngineRequest::Navigation => return Ok(items_response(engine.navigation())),
            EngineRequest::Mount(parts) => {
                return Ok(EngineResponse::Mounted(MountResponse {
                    missing: check_parts(&parts),
                }));
            }
            EngineRequest::Flush => {
                let ran = engine.flush();
                return Ok(EngineResponse::Flushed(FlushResponse {
                    ran,
                    rebuilds: engine.rebuild_count(),
                }));
            }
            EngineRequest::State => {}
        }

        Ok(EngineResponse::State(self.state()))
    }

    pub fn state(&mut self) -> EngineState {
        EngineState {
            pending: self.engine.pending(),
            active_identity: self.engine.active_identity().map(str::to_string),
            nav_cursor: self.engine.nav_cursor(),
            size: self.engine.size(),
            last_query: self.engine.last_query().to_string(),
        }
    }
}

fn items_response(items: Vec<Item>) -> EngineResponse {
    EngineResponse::Items(ItemsResponse {
        items: items.into_iter().map(ItemDto::from).collect(),
    })
}
