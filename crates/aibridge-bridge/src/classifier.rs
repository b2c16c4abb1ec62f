//! Concrete classifier components
//!
//! Each variant implements [`ClassifierEventSink`] and turns bridge
//! notifications into [`ClassifierEvent`]s on the component's event bus.

use crate::event_bus::EventBus;
use aibridge_core::{codes, ClassifierEventSink, LabelSet, Variant};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One label with its confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

/// Events raised to the app
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ClassifierEvent {
    /// The classifier is loaded and ready
    ClassifierReady {
        component: &'static str,
        labels: LabelSet,
    },

    /// A classification arrived
    GotClassification {
        component: &'static str,
        result: Value,
        top: Option<Prediction>,
    },

    /// The web content reported an error
    Error {
        component: &'static str,
        code: i32,
        description: Option<&'static str>,
    },
}

/// Decode a classification result into predictions, best first.
///
/// Accepts either `[[label, confidence], ...]` or `{label: confidence}`.
/// Returns `None` when the result has neither shape.
pub fn ranked_predictions(result: &Value) -> Option<Vec<Prediction>> {
    let mut predictions: Vec<Prediction> = match result {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let pair = item.as_array()?;
                Some(Prediction {
                    label: pair.first()?.as_str()?.to_string(),
                    confidence: pair.get(1)?.as_f64()?,
                })
            })
            .collect::<Option<_>>()?,
        Value::Object(map) => map
            .iter()
            .map(|(label, confidence)| {
                Some(Prediction {
                    label: label.clone(),
                    confidence: confidence.as_f64()?,
                })
            })
            .collect::<Option<_>>()?,
        _ => return None,
    };

    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Some(predictions)
}

fn top_prediction(result: &Value) -> Option<Prediction> {
    ranked_predictions(result).and_then(|p| p.into_iter().next())
}

fn error_event(component: &'static str, code: i32) -> ClassifierEvent {
    ClassifierEvent::Error {
        component,
        code,
        description: codes::describe(code),
    }
}

/// Image classifier backed by a transfer-learned or personal model
#[derive(Debug)]
pub struct PersonalImageClassifier {
    bus: Arc<EventBus>,
    last: RwLock<Option<Prediction>>,
}

impl PersonalImageClassifier {
    const NAME: &'static str = "PersonalImageClassifier";

    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            last: RwLock::new(None),
        }
    }

    /// Best prediction of the most recent classification
    pub fn last_prediction(&self) -> Option<Prediction> {
        self.last.read().clone()
    }
}

impl ClassifierEventSink for PersonalImageClassifier {
    fn classifier_ready(&self, labels: &[String]) {
        info!(component = Self::NAME, labels = labels.len(), "classifier ready");
        self.bus.publish(ClassifierEvent::ClassifierReady {
            component: Self::NAME,
            labels: labels.to_vec(),
        });
    }

    fn got_classification(&self, result: &Value) {
        let top = top_prediction(result);
        if let Some(prediction) = &top {
            debug!(component = Self::NAME, label = %prediction.label, confidence = prediction.confidence, "classification");
        }
        *self.last.write() = top.clone();
        self.bus.publish(ClassifierEvent::GotClassification {
            component: Self::NAME,
            result: result.clone(),
            top,
        });
    }

    fn on_error(&self, code: i32) {
        warn!(component = Self::NAME, code, "classifier error");
        self.bus.publish(error_event(Self::NAME, code));
    }
}

/// Audio classifier backed by a personal model
#[derive(Debug)]
pub struct PersonalAudioClassifier {
    bus: Arc<EventBus>,
}

impl PersonalAudioClassifier {
    const NAME: &'static str = "PersonalAudioClassifier";

    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }
}

impl ClassifierEventSink for PersonalAudioClassifier {
    fn classifier_ready(&self, labels: &[String]) {
        info!(component = Self::NAME, labels = labels.len(), "classifier ready");
        self.bus.publish(ClassifierEvent::ClassifierReady {
            component: Self::NAME,
            labels: labels.to_vec(),
        });
    }

    fn got_classification(&self, result: &Value) {
        self.bus.publish(ClassifierEvent::GotClassification {
            component: Self::NAME,
            result: result.clone(),
            top: top_prediction(result),
        });
    }

    fn on_error(&self, code: i32) {
        warn!(component = Self::NAME, code, "classifier error");
        self.bus.publish(error_event(Self::NAME, code));
    }
}

/// The sink implementation bound to `variant`
pub fn sink_for(variant: Variant, bus: Arc<EventBus>) -> Arc<dyn ClassifierEventSink> {
    match variant {
        Variant::PersonalImageClassifier => Arc::new(PersonalImageClassifier::new(bus)),
        Variant::PersonalAudioClassifier => Arc::new(PersonalAudioClassifier::new(bus)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ranked_predictions_from_pairs() {
        let ranked = ranked_predictions(&json!([["dog", 0.2], ["cat", 0.7], ["bird", 0.1]])).unwrap();
        let labels: Vec<_> = ranked.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn test_ranked_predictions_from_object() {
        let ranked = ranked_predictions(&json!({"rose": 0.3, "tulip": 0.6})).unwrap();
        assert_eq!(ranked[0].label, "tulip");
    }

    #[test]
    fn test_ranked_predictions_rejects_other_shapes() {
        assert!(ranked_predictions(&json!("cat")).is_none());
        assert!(ranked_predictions(&json!([["cat", "high"]])).is_none());
    }

    #[tokio::test]
    async fn test_image_classifier_publishes_and_tracks_top() {
        let bus = Arc::new(EventBus::default());
        let mut events = bus.subscribe();
        let classifier = PersonalImageClassifier::new(bus.clone());

        classifier.got_classification(&json!([["cat", 0.9], ["dog", 0.1]]));

        assert_eq!(classifier.last_prediction().unwrap().label, "cat");
        match events.recv().await.unwrap() {
            ClassifierEvent::GotClassification { component, top, .. } => {
                assert_eq!(component, "PersonalImageClassifier");
                assert_eq!(top.unwrap().confidence, 0.9);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_event_carries_description() {
        let bus = Arc::new(EventBus::default());
        let mut events = bus.subscribe();
        let sink = sink_for(Variant::PersonalAudioClassifier, bus.clone());

        sink.on_error(codes::CLASSIFICATION_FAILED);

        assert_eq!(
            events.recv().await.unwrap(),
            ClassifierEvent::Error {
                component: "PersonalAudioClassifier",
                code: -2,
                description: Some("classification failed"),
            }
        );
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ClassifierEvent::ClassifierReady {
            component: "PersonalImageClassifier",
            labels: vec!["cat".to_string()],
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "ClassifierReady");
        assert_eq!(value["data"]["labels"], json!(["cat"]));
    }
}
