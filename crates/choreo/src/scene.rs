//! Declarative scene files.
//!
//! A [`Scene`] describes an animation tree as data, so it can be loaded from
//! JSON or TOML and built through the combinator facade.
//!
//! ```toml
//! name = "blink"
//!
//! [root]
//! kind = "sequence"
//!
//! [[root.children]]
//! kind = "property"
//! key_path = "opacity"
//! to = { number = 0.0 }
//! duration = 0.25
//!
//! [[root.children]]
//! kind = "wait"
//! seconds = 1.0
//! ```

use std::fs;
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animate::{self, Keyframes, Tween};
use crate::animation::Animation;
use crate::curve::TimingCurve;
use crate::error::{Error, Result};
use crate::geometry::Path;
use crate::options::Options;
use crate::span::DurationSpan;
use crate::value::KeyframeValue;

/// One node of a scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SceneNode {
    /// See [`animate::wait`].
    Wait { seconds: f64 },
    /// See [`animate::key_path`].
    Property {
        key_path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<KeyframeValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        by: Option<KeyframeValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<KeyframeValue>,
        duration: f64,
        #[serde(default)]
        options: Options,
    },
    /// See [`animate::keyframes`].
    Keyframes {
        key_path: String,
        values: Vec<KeyframeValue>,
        #[serde(default)]
        key_times: Vec<f64>,
        #[serde(default)]
        curves: Vec<TimingCurve>,
        duration: f64,
        #[serde(default)]
        options: Options,
    },
    /// See [`animate::move_along`].
    MoveAlong {
        path: Path,
        #[serde(default)]
        key_times: Vec<f64>,
        #[serde(default)]
        curves: Vec<TimingCurve>,
        duration: f64,
        #[serde(default)]
        options: Options,
    },
    /// See [`animate::group`].
    Group {
        children: Vec<SceneNode>,
        #[serde(default)]
        span: DurationSpan,
        #[serde(default)]
        options: Options,
        #[serde(default)]
        normalized: bool,
    },
    /// See [`animate::sequence`].
    Sequence {
        children: Vec<SceneNode>,
        #[serde(default)]
        span: DurationSpan,
        #[serde(default)]
        options: Options,
    },
    /// See [`animate::replay`]; no count repeats forever.
    Repeat {
        child: Box<SceneNode>,
        #[serde(default)]
        count: Option<u32>,
    },
    /// See [`animate::autoreverse`].
    Autoreverse { child: Box<SceneNode> },
}

impl SceneNode {
    /// Builds the animation this node describes.
    ///
    /// # Errors
    /// Returns the first construction error found, depth-first.
    pub fn build(&self) -> Result<Animation> {
        match self {
            Self::Wait { seconds } => Ok(animate::wait(*seconds)),
            Self::Property {
                key_path,
                from,
                by,
                to,
                duration,
                options,
            } => {
                let mut tween = Tween::<KeyframeValue>::new(*duration).options(*options);
                if let Some(v) = from {
                    tween = tween.from(v.clone());
                }
                if let Some(v) = by {
                    tween = tween.by(v.clone());
                }
                if let Some(v) = to {
                    tween = tween.to(v.clone());
                }
                animate::key_path(key_path, tween)
            }
            Self::Keyframes {
                key_path,
                values,
                key_times,
                curves,
                duration,
                options,
            } => animate::keyframes(
                key_path,
                values.iter().cloned(),
                Keyframes::new(*duration)
                    .key_times(key_times.clone())
                    .curves(curves.clone())
                    .options(*options),
            ),
            Self::MoveAlong {
                path,
                key_times,
                curves,
                duration,
                options,
            } => animate::move_along(
                path,
                Keyframes::new(*duration)
                    .key_times(key_times.clone())
                    .curves(curves.clone())
                    .options(*options),
            ),
            Self::Group {
                children,
                span,
                options,
                normalized,
            } => {
                let built = children.iter().map(Self::build).collect::<Result<Vec<_>>>()?;
                let builder = animate::group(built).span(*span).options(*options);
                Ok(if *normalized {
                    builder.normalized().build()
                } else {
                    builder.build()
                })
            }
            Self::Sequence {
                children,
                span,
                options,
            } => {
                let built = children.iter().map(Self::build).collect::<Result<Vec<_>>>()?;
                animate::sequence(built).span(*span).options(*options).build()
            }
            Self::Repeat { child, count } => {
                let inner = child.build()?;
                Ok(match count {
                    Some(n) => animate::replay(&inner, *n),
                    None => animate::replay_forever(&inner),
                })
            }
            Self::Autoreverse { child } => Ok(animate::autoreverse(&child.build()?)),
        }
    }
}

/// A named animation tree loaded from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub name: String,
    pub root: SceneNode,
}

impl Scene {
    /// Parses a scene from JSON text.
    ///
    /// # Errors
    /// Returns [`SceneError::Json`] if the text is not a valid scene.
    pub fn from_json(json: &str) -> std::result::Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a scene from TOML text.
    ///
    /// # Errors
    /// Returns [`SceneError::Toml`] if the text is not a valid scene.
    pub fn from_toml(toml: &str) -> std::result::Result<Self, SceneError> {
        Ok(toml::from_str(toml)?)
    }

    /// Loads a scene from a file (format inferred by extension).
    ///
    /// # Errors
    /// Returns `SceneError` if reading or parsing fails, or the extension is
    /// neither `json` nor `toml`.
    pub fn from_file(path: impl AsRef<FsPath>) -> std::result::Result<Self, SceneError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            Some("toml") => Self::from_toml(&fs::read_to_string(path)?),
            Some(ext) => Err(SceneError::UnsupportedFormat(ext.into())),
            None => Err(SceneError::UnsupportedFormat("unknown".into())),
        }
    }

    /// Builds the scene's animation tree.
    ///
    /// # Errors
    /// Returns [`SceneError::Build`] if any node cannot be constructed.
    pub fn build(&self) -> std::result::Result<Animation, SceneError> {
        Ok(self.root.build()?)
    }
}

/// Error loading or building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Build error: {0}")]
    Build(#[from] Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Seconds;

    const BLINK: &str = r#"
name = "blink"

[root]
kind = "sequence"

[[root.children]]
kind = "property"
key_path = "opacity"
to = { number = 0.0 }
duration = 0.25

[[root.children]]
kind = "wait"
seconds = 1.0
"#;

    #[test]
    fn test_toml_scene() {
        let scene = Scene::from_toml(BLINK).unwrap();
        assert_eq!(scene.name, "blink");
        let animation = scene.build().unwrap();
        assert_eq!(animation.base_duration(), Seconds::new(1.25));
        assert_eq!(animation.children()[1].begin_time(), Seconds::new(0.25));
    }

    #[test]
    fn test_json_scene() {
        let json = r#"{
            "root": {
                "kind": "repeat",
                "count": 3,
                "child": { "kind": "wait", "seconds": 2.0 }
            }
        }"#;
        let scene = Scene::from_json(json).unwrap();
        assert_eq!(scene.name, "");
        assert_eq!(scene.build().unwrap().accumulated_duration(), Seconds::new(8.0));
    }

    #[test]
    fn test_group_span_and_options() {
        let json = r#"{
            "root": {
                "kind": "group",
                "span": { "constant": 2.0 },
                "options": { "autoreverses": true, "curve": "ease-in" },
                "children": [{ "kind": "wait", "seconds": 1.0 }]
            }
        }"#;
        let animation = Scene::from_json(json).unwrap().build().unwrap();
        assert_eq!(animation.base_duration(), Seconds::new(2.0));
        assert_eq!(animation.timing().duration, 1.0);
    }

    #[test]
    fn test_unreachable_child_is_a_build_error() {
        let json = r#"{
            "root": {
                "kind": "sequence",
                "children": [
                    { "kind": "repeat", "child": { "kind": "wait", "seconds": 1.0 } },
                    { "kind": "wait", "seconds": 1.0 }
                ]
            }
        }"#;
        let err = Scene::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(
            err,
            SceneError::Build(Error::UnreachableChild { index: 0, len: 2 })
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = Scene::from_json(r#"{"root": {"kind": "teleport"}}"#).unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Scene::from_file("scene.yaml").unwrap_err();
        assert!(matches!(err, SceneError::UnsupportedFormat(ext) if ext == "yaml"));
    }
}
