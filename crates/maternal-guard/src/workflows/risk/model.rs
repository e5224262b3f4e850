//! Loader and evaluator for the pinned risk model artifact.
//!
//! The artifact is a JSON tree ensemble: every tree votes for a class code and the
//! most common code wins, ties going to the lowest code. Loading validates the
//! artifact completely so a broken or mismatched file fails at startup rather than
//! on the first request.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::classifier::{ModelError, RiskLevel, RiskModel};

/// Artifact format this build understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Feature names in the order the model expects them.
pub const FEATURE_ORDER: [&str; 6] = [
    "age",
    "systolic_bp",
    "diastolic_bp",
    "heart_rate",
    "oxygen_level",
    "temperature",
];

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    #[serde(default)]
    name: Option<String>,
    features: Vec<String>,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, Deserialize)]
struct DecisionTree {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: i64,
    },
}

/// Startup-fatal problems with the model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported model format version {found} (expected {})", SUPPORTED_FORMAT_VERSION)]
    UnsupportedVersion { found: u32 },
    #[error("model features {found:?} do not match expected order {:?}", FEATURE_ORDER)]
    FeatureMismatch { found: Vec<String> },
    #[error("model artifact contains no trees")]
    Empty,
    #[error("model declares class {0}, which has no risk level")]
    UnmappedClass(i64),
    #[error("tree {tree}: {detail}")]
    InvalidTree { tree: usize, detail: String },
}

/// Majority-vote decision tree ensemble backing the production classifier.
#[derive(Debug, Clone)]
pub struct TreeEnsembleModel {
    name: String,
    trees: Vec<DecisionTree>,
}

impl TreeEnsembleModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelLoadError> {
        if artifact.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedVersion {
                found: artifact.format_version,
            });
        }

        if artifact.features.len() != FEATURE_ORDER.len()
            || artifact
                .features
                .iter()
                .zip(FEATURE_ORDER)
                .any(|(found, expected)| found != expected)
        {
            return Err(ModelLoadError::FeatureMismatch {
                found: artifact.features,
            });
        }

        if artifact.trees.is_empty() {
            return Err(ModelLoadError::Empty);
        }

        if let Some(code) = artifact
            .classes
            .iter()
            .copied()
            .find(|code| RiskLevel::from_code(*code).is_none())
        {
            return Err(ModelLoadError::UnmappedClass(code));
        }

        for (index, tree) in artifact.trees.iter().enumerate() {
            validate_tree(tree, &artifact.classes)
                .map_err(|detail| ModelLoadError::InvalidTree { tree: index, detail })?;
        }

        Ok(Self {
            name: artifact.name.unwrap_or_else(|| "unnamed".to_string()),
            trees: artifact.trees,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl RiskModel for TreeEnsembleModel {
    fn predict(&self, features: [f64; 6]) -> Result<i64, ModelError> {
        if let Some(position) = features.iter().position(|value| !value.is_finite()) {
            return Err(ModelError::MalformedInput(format!(
                "feature '{}' is not a finite number",
                FEATURE_ORDER[position]
            )));
        }

        let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.evaluate(&features)).or_default() += 1;
        }

        // Codes iterate ascending; ties keep the first (lowest) code.
        votes
            .into_iter()
            .fold(None, |best: Option<(i64, usize)>, (code, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((code, count)),
            })
            .map(|(code, _)| code)
            .ok_or_else(|| ModelError::Unavailable("model has no trees".to_string()))
    }
}

impl DecisionTree {
    fn evaluate(&self, features: &[f64; 6]) -> i64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { class } => return *class,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Children must point forward so evaluation always terminates at a leaf.
fn validate_tree(tree: &DecisionTree, classes: &[i64]) -> Result<(), String> {
    if tree.nodes.is_empty() {
        return Err("tree has no nodes".to_string());
    }

    for (index, node) in tree.nodes.iter().enumerate() {
        match node {
            TreeNode::Leaf { class } => {
                if !classes.contains(class) {
                    return Err(format!("node {index} emits undeclared class {class}"));
                }
            }
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= FEATURE_ORDER.len() {
                    return Err(format!("node {index} splits on unknown feature {feature}"));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {index} has a non-finite threshold"));
                }
                for child in [left, right] {
                    if *child <= index || *child >= tree.nodes.len() {
                        return Err(format!("node {index} points to invalid child {child}"));
                    }
                }
            }
        }
    }

    Ok(())
}
