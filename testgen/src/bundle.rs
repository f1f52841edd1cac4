//! JSON input bundle: model, tree and optional options in one document.

use crate::GenerationOptions;
use mbt_registry::{ModelDocument, ModelIndex, RegistryError};
use mbt_tree::{ExecutionTree, TreeDocument, TreeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("invalid bundle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    Registry(#[from] RegistryError),

    #[error("invalid execution tree: {0}")]
    Tree(#[from] TreeError),
}

/// Everything a generation run reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelBundle {
    pub model: ModelDocument,
    pub tree: TreeDocument,
    pub options: Option<GenerationOptions>,
}

impl ModelBundle {
    pub fn from_json(text: &str) -> Result<Self, BundleError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the model index and the execution tree.
    pub fn into_parts(
        self,
    ) -> Result<(ModelIndex, ExecutionTree, Option<GenerationOptions>), BundleError> {
        let index = self.model.build()?;
        let tree = self.tree.build(&index)?;
        Ok((index, tree, self.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TargetLanguage;

    #[test]
    fn test_bundle_round_trip_into_parts() {
        let json = r#"{
            "model": {
                "system_name": "Bank",
                "transitions": [{"name": "login"}]
            },
            "tree": {"children": [{"event": "login"}]},
            "options": {"language": "cpp"}
        }"#;
        let (index, tree, options) = ModelBundle::from_json(json).unwrap().into_parts().unwrap();
        assert_eq!(index.system_name(), "Bank");
        assert_eq!(tree.tests_for_code_generation().len(), 1);
        assert_eq!(options.unwrap().language, TargetLanguage::Cpp);
    }

    #[test]
    fn test_unknown_event_is_a_tree_error() {
        let json = r#"{"tree": {"children": [{"event": "deposit"}]}}"#;
        let err = ModelBundle::from_json(json).unwrap().into_parts().unwrap_err();
        assert!(matches!(err, BundleError::Tree(_)));
    }
}
