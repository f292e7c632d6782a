//! Rule declarations as they appear in catalog files.
//!
//! A declaration is one of `single`, `template` or `group` (selected by the
//! `kind` field). [`RuleDecl::build`] validates it and produces the matching
//! engine rule.

use std::collections::BTreeSet;

use hardn_core::{Dword, RootScope, RuleTarget, ValidationError};
use hardn_rules::{
    CompositeRule, Dimension, PathTemplate, Rule, RuleMeta, SingleTargetRule,
    TemplateExpansionRule,
};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

fn default_scope() -> RootScope {
    RootScope::CurrentUser
}

/// One declared rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleDecl {
    /// A literal target.
    Single {
        short_name: String,
        #[serde(default)]
        long_name: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default = "default_scope")]
        scope: RootScope,
        path: String,
        value_name: String,
        hardened_value: Dword,
    },
    /// A two-hole path template over two vocabularies.
    Template {
        short_name: String,
        #[serde(default)]
        long_name: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default = "default_scope")]
        scope: RootScope,
        path_template: String,
        dimension_a: Vec<String>,
        dimension_b: Vec<String>,
        value_name: String,
        hardened_value: Dword,
    },
    /// An ordered group of nested declarations.
    Group {
        short_name: String,
        #[serde(default)]
        long_name: Option<String>,
        #[serde(default)]
        description: Option<String>,
        members: Vec<RuleDecl>,
    },
}

impl RuleDecl {
    /// The declared short name.
    pub fn short_name(&self) -> &str {
        match self {
            Self::Single { short_name, .. }
            | Self::Template { short_name, .. }
            | Self::Group { short_name, .. } => short_name,
        }
    }

    /// Insert this declaration's name and every nested name into `seen`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateName`] on the first name already present.
    pub(crate) fn collect_names(&self, seen: &mut BTreeSet<String>) -> CatalogResult<()> {
        if !seen.insert(self.short_name().to_ascii_lowercase()) {
            return Err(CatalogError::DuplicateName(self.short_name().to_string()));
        }
        if let Self::Group { members, .. } = self {
            for member in members {
                member.collect_names(seen)?;
            }
        }
        Ok(())
    }

    /// Validate the declaration and build the rule it describes. Groups are
    /// built recursively; a failing member is reported under its own name.
    pub fn build(&self) -> CatalogResult<Box<dyn Rule>> {
        match self {
            Self::Group {
                short_name,
                long_name,
                description,
                members,
            } => {
                let meta =
                    meta(short_name, long_name, description).map_err(|e| self.invalid(e))?;
                let members = members
                    .iter()
                    .map(RuleDecl::build)
                    .collect::<CatalogResult<Vec<_>>>()?;
                Ok(Box::new(CompositeRule::new(meta, members)))
            }
            Self::Single {
                short_name,
                long_name,
                description,
                scope,
                path,
                value_name,
                hardened_value,
            } => {
                let build = || -> Result<Box<dyn Rule>, ValidationError> {
                    let meta = meta(short_name, long_name, description)?;
                    let target = RuleTarget::new(*scope, path.as_str(), value_name.as_str())?;
                    Ok(Box::new(SingleTargetRule::new(meta, target, *hardened_value)))
                };
                build().map_err(|e| self.invalid(e))
            }
            Self::Template {
                short_name,
                long_name,
                description,
                scope,
                path_template,
                dimension_a,
                dimension_b,
                value_name,
                hardened_value,
            } => {
                let build = || -> Result<Box<dyn Rule>, ValidationError> {
                    let rule = TemplateExpansionRule::new(
                        meta(short_name, long_name, description)?,
                        *scope,
                        PathTemplate::new(path_template.as_str())?,
                        Dimension::new("dimension_a", dimension_a.iter().cloned())?,
                        Dimension::new("dimension_b", dimension_b.iter().cloned())?,
                        value_name.as_str(),
                        *hardened_value,
                    )?;
                    Ok(Box::new(rule))
                };
                build().map_err(|e| self.invalid(e))
            }
        }
    }

    fn invalid(&self, source: ValidationError) -> CatalogError {
        CatalogError::InvalidRule {
            rule: self.short_name().to_string(),
            source,
        }
    }
}

fn meta(
    short_name: &str,
    long_name: &Option<String>,
    description: &Option<String>,
) -> Result<RuleMeta, ValidationError> {
    let mut meta = RuleMeta::named(short_name)?;
    if let Some(long_name) = long_name {
        meta = meta.with_long_name(long_name.as_str());
    }
    if let Some(description) = description {
        meta = meta.with_description(description.as_str());
    }
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> RuleDecl {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn single_defaults_to_current_user() {
        let decl = parse(
            r#"
kind: single
short_name: OfficeActiveX
path: 'SOFTWARE\Microsoft\Office\Common\Security'
value_name: DisableAllActiveX
hardened_value: 1
"#,
        );
        let rule = decl.build().unwrap();
        assert_eq!(rule.name(), "OfficeActiveX");
        let targets = rule.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].scope(), RootScope::CurrentUser);
        assert_eq!(targets[0].path(), "SOFTWARE\\Microsoft\\Office\\Common\\Security");
    }

    #[test]
    fn template_builds_cross_product() {
        let decl = parse(
            r#"
kind: template
short_name: OfficeMacros
long_name: Office Macros
scope: HKCU
path_template: 'Office\{}\{}\Security'
dimension_a: ["14.0", "15.0"]
dimension_b: [Word, Excel]
value_name: VBAWarnings
hardened_value: 4
"#,
        );
        let rule = decl.build().unwrap();
        assert_eq!(rule.long_name(), "Office Macros");
        assert_eq!(rule.targets().len(), 4);
    }

    #[test]
    fn template_error_names_the_rule() {
        let decl = parse(
            r#"
kind: template
short_name: Broken
path_template: 'Office\{}\Security'
dimension_a: ["14.0"]
dimension_b: [Word]
value_name: VBAWarnings
hardened_value: 4
"#,
        );
        let err = decl.build().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidRule { ref rule, source: ValidationError::InvalidPathTemplate { .. } } if rule == "Broken"
        ));
    }

    #[test]
    fn nested_member_error_names_the_member() {
        let decl = parse(
            r#"
kind: group
short_name: Outer
members:
  - kind: single
    short_name: Inner
    path: 'A'
    value_name: ''
    hardened_value: 1
"#,
        );
        match decl.build().unwrap_err() {
            CatalogError::InvalidRule { rule, .. } => assert_eq!(rule, "Inner"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn group_keeps_member_order() {
        let decl = parse(
            r#"
kind: group
short_name: Group
members:
  - { kind: single, short_name: A, path: K, value_name: A, hardened_value: 1 }
  - { kind: single, short_name: B, path: K, value_name: B, hardened_value: 1 }
"#,
        );
        let rule = decl.build().unwrap();
        let names: Vec<String> = rule
            .targets()
            .iter()
            .map(|t| t.value_name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn duplicate_names_are_found_in_nested_groups() {
        let decl = parse(
            r#"
kind: group
short_name: Group
members:
  - { kind: single, short_name: group, path: K, value_name: A, hardened_value: 1 }
"#,
        );
        let mut seen = BTreeSet::new();
        assert!(matches!(
            decl.collect_names(&mut seen),
            Err(CatalogError::DuplicateName(name)) if name == "group"
        ));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<RuleDecl, _> = serde_yaml::from_str("kind: wildcard\nshort_name: X\n");
        assert!(result.is_err());
    }
}
