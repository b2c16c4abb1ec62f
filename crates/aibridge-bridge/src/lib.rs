//! aibridge Bridge
//!
//! Message protocol and component wiring between an embedded web classifier
//! and native code.
//!
//! - [`MessageBridge`] decodes `{functionCall, args}` messages
//! - [`PersonalImageClassifier`] and [`PersonalAudioClassifier`] turn them into
//!   [`ClassifierEvent`]s on an [`EventBus`]
//! - [`AiComponent`] binds a [`WebSurface`], a resource router and the bridge

pub mod bootstrap;
pub mod bridge;
pub mod classifier;
pub mod component;
pub mod event_bus;
pub mod message;
pub mod view;

pub use bootstrap::BootstrapPage;
pub use bridge::{Dispatched, MessageBridge};
pub use classifier::{
    ranked_predictions, sink_for, ClassifierEvent, PersonalAudioClassifier,
    PersonalImageClassifier, Prediction,
};
pub use component::AiComponent;
pub use event_bus::EventBus;
pub use message::{Call, FunctionCall, FunctionCallMessage};
pub use view::{SurfaceSettings, WebSurface};
