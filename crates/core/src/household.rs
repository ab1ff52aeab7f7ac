// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kids and the TOML manifest used to configure a household

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chore::{ChoreDef, ValidationError};
use crate::id::KidId;

/// A kid chores can be assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kid {
    pub id: KidId,
    pub name: String,
}

impl Kid {
    pub fn new(id: impl Into<KidId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Kids and chores read from a configuration file
///
/// ```toml
/// [[kids]]
/// id = "ada"
/// name = "Ada"
///
/// [[chores]]
/// id = "dishes"
/// name = "Dishes"
/// assigned_kids = ["ada"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdManifest {
    #[serde(default)]
    pub kids: Vec<Kid>,
    #[serde(default)]
    pub chores: Vec<ChoreDef>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid manifest: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Parse and validate a household manifest
///
/// Chores may only reference kids declared in the same manifest or in
/// `known_kids` (kids the household already has).
pub fn parse_manifest(content: &str, known_kids: &[KidId]) -> Result<HouseholdManifest, ManifestError> {
    let manifest: HouseholdManifest = toml::from_str(content)?;

    for chore in &manifest.chores {
        chore.validate()?;
        for kid in &chore.assigned_kids {
            let declared = manifest.kids.iter().any(|k| &k.id == kid);
            if !declared && !known_kids.contains(kid) {
                return Err(ValidationError::UnknownKid(kid.clone()).into());
            }
        }
    }

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
        [[kids]]
        id = "ada"
        name = "Ada"

        [[kids]]
        id = "bo"
        name = "Bo"

        [[chores]]
        id = "dishes"
        name = "Dishes"
        assigned_kids = ["ada", "bo"]
        criteria = "rotation_simple"
    "#;

    #[test]
    fn parses_kids_and_chores() {
        let manifest = parse_manifest(MANIFEST, &[]).unwrap();
        assert_eq!(manifest.kids.len(), 2);
        assert_eq!(manifest.chores[0].assigned_kids.len(), 2);
    }

    #[test]
    fn rejects_unknown_kids() {
        let content = r#"
            [[chores]]
            id = "dishes"
            name = "Dishes"
            assigned_kids = ["zed"]
        "#;
        let err = parse_manifest(content, &[KidId::from("ada")]).unwrap_err();
        assert!(matches!(
            err,
            ManifestError::Invalid(ValidationError::UnknownKid(ref k)) if k.as_str() == "zed"
        ));
    }

    #[test]
    fn accepts_kids_the_household_already_knows() {
        let content = r#"
            [[chores]]
            id = "dishes"
            name = "Dishes"
            assigned_kids = ["ada"]
        "#;
        assert!(parse_manifest(content, &[KidId::from("ada")]).is_ok());
    }

    #[test]
    fn surfaces_validation_errors() {
        let content = r#"
            [[kids]]
            id = "ada"
            name = "Ada"

            [[chores]]
            id = "dishes"
            name = "Dishes"
            assigned_kids = ["ada"]
            criteria = "rotation_smart"
        "#;
        assert!(matches!(
            parse_manifest(content, &[]),
            Err(ManifestError::Invalid(ValidationError::RotationNeedsTwoKids { .. }))
        ));
    }
}
