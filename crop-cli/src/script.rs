//! Replay script format.

use std::path::Path;

use crop_core::{CropOptions, ElementGeometry, InputEvent};
use serde::{Deserialize, Serialize};

use crate::ReplayError;

/// A recorded session: page geometry, options and the steps to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Container geometry at construction.
    pub container: ElementGeometry,
    /// Separate image geometry, if bounds come from an image element.
    #[serde(default)]
    pub image: Option<ElementGeometry>,
    /// Widget options, in the same camelCase form the browser receives.
    #[serde(default)]
    pub options: CropOptions,
    /// Steps in delivery order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One recorded occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// A pointer or touch event.
    Event {
        /// The event.
        event: InputEvent,
    },
    /// The viewport resized; layout changed to the given geometry.
    Resize {
        /// New container geometry, if it changed.
        #[serde(default)]
        container: Option<ElementGeometry>,
        /// New image geometry, if it changed.
        #[serde(default)]
        image: Option<ElementGeometry>,
    },
    /// The browser ran the pending animation frame.
    AnimationFrame,
    /// An attribute of the container or image changed.
    Mutation {
        /// New container geometry, if it changed.
        #[serde(default)]
        container: Option<ElementGeometry>,
        /// New image geometry, if it changed.
        #[serde(default)]
        image: Option<ElementGeometry>,
    },
    /// The widget was torn down.
    Remove,
}

impl ReplayScript {
    /// Parse a script from JSON and validate its options.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the options invalid.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let script: Self = serde_json::from_str(json)?;
        script.options.validate()?;
        Ok(script)
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crop_core::HandleCount;

    #[test]
    fn minimal_script_uses_defaults() {
        let script = ReplayScript::from_json(
            r#"{"container": {"left": 0, "top": 0, "width": 400, "height": 300}}"#,
        )
        .expect("valid script");
        assert!(script.image.is_none());
        assert!(script.steps.is_empty());
        assert_eq!(script.options, CropOptions::default());
    }

    #[test]
    fn steps_are_tagged() {
        let script = ReplayScript::from_json(
            r#"{
                "container": {"left": 0, "top": 0, "width": 400, "height": 300},
                "options": {"handles": 4},
                "steps": [
                    {"step": "event", "event": {"type": "pointer_move", "data": {"x": 1, "y": 2}}},
                    {"step": "resize", "container": {"left": 0, "top": 0, "width": 800, "height": 600}},
                    {"step": "animation_frame"},
                    {"step": "mutation"},
                    {"step": "remove"}
                ]
            }"#,
        )
        .expect("valid script");

        assert_eq!(script.options.handles, HandleCount::Four);
        assert_eq!(script.steps.len(), 5);
        assert_eq!(
            script.steps[0],
            Step::Event {
                event: InputEvent::move_to(1.0, 2.0)
            }
        );
        assert!(matches!(
            script.steps[3],
            Step::Mutation {
                container: None,
                image: None
            }
        ));
    }

    #[test]
    fn invalid_options_are_rejected() {
        let result = ReplayScript::from_json(
            r#"{"container": {"left": 0, "top": 0, "width": 1, "height": 1},
                "options": {"forceAspect": 0}}"#,
        );
        assert!(matches!(result, Err(ReplayError::Crop(_))));
    }
}
